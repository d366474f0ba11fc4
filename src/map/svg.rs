//! SVG serialization of a [`Surface`], painting layers in surface order.

use crate::map::projection::{VIEWBOX_HEIGHT, VIEWBOX_WIDTH};
use crate::map::surface::{
    Anchor, Layer, Legend, PinnedTooltip, Surface, Tooltip, TotalMarker, STROKE_COLOR,
    STROKE_WIDTH,
};
use glam::DVec2;
use std::fmt::{self, Write};

const GRADIENT_ID: &str = "legend-gradient";
const FONT: &str = "font-family=\"Arial\"";

/// Render the surface as a standalone SVG document sized to its mount area
pub fn to_svg(surface: &Surface) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_svg(&mut out, surface)?;
    Ok(out)
}

fn write_svg(out: &mut String, surface: &Surface) -> fmt::Result {
    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {VIEWBOX_WIDTH} {VIEWBOX_HEIGHT}\" \
         preserveAspectRatio=\"xMidYMid meet\" width=\"{}\" height=\"{}\">",
        surface.view.width, surface.view.height
    )?;

    for layer in surface.order() {
        match layer {
            Layer::Regions => write_regions(out, surface)?,
            Layer::Legend => {
                if let Some(legend) = &surface.legend {
                    write_legend(out, legend)?;
                }
            }
            Layer::TotalMarker => {
                if let Some(total) = &surface.total {
                    write_total(out, total)?;
                }
            }
            Layer::PinnedTooltips => {
                for pinned in &surface.pinned {
                    write_pinned(out, pinned)?;
                }
            }
            Layer::Tooltip => write_tooltip(out, &surface.tooltip)?,
        }
    }

    writeln!(out, "</svg>")
}

fn path_data(rings: &[Vec<DVec2>]) -> Result<String, fmt::Error> {
    let mut d = String::new();
    for ring in rings.iter().filter(|r| !r.is_empty()) {
        for (i, p) in ring.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            write!(d, "{cmd}{:.1},{:.1}", p.x, p.y)?;
        }
        d.push('Z');
    }
    Ok(d)
}

fn write_regions(out: &mut String, surface: &Surface) -> fmt::Result {
    for region in &surface.regions {
        let rings: Vec<Vec<DVec2>> = region.rings().cloned().collect();
        writeln!(
            out,
            "<g class=\"state-group\"><path class=\"state\" data-name=\"{}\" d=\"{}\" fill=\"{}\" \
             fill-opacity=\"{}\" fill-rule=\"evenodd\" stroke=\"{STROKE_COLOR}\" stroke-width=\"{STROKE_WIDTH}\"/></g>",
            escape(&region.name),
            path_data(&rings)?,
            region.fill,
            region.fill_opacity
        )?;
    }
    Ok(())
}

fn write_legend(out: &mut String, legend: &Legend) -> fmt::Result {
    // Vertical gradient, stop offsets measured from the bottom
    writeln!(
        out,
        "<defs><linearGradient id=\"{GRADIENT_ID}\" x1=\"0%\" y1=\"100%\" x2=\"0%\" y2=\"0%\">"
    )?;
    for (t, color) in &legend.stops {
        writeln!(out, "<stop offset=\"{:.0}%\" stop-color=\"{color}\"/>", t * 100.0)?;
    }
    writeln!(out, "</linearGradient></defs>")?;

    let DVec2 { x, y } = legend.origin;
    writeln!(out, "<g class=\"legend\" transform=\"translate({x}, {y})\">")?;
    writeln!(
        out,
        "<rect width=\"{}\" height=\"{}\" style=\"fill: url(#{GRADIENT_ID})\"/>",
        legend.width, legend.height
    )?;
    for tick in &legend.ticks {
        writeln!(
            out,
            "<g class=\"tick\" transform=\"translate({}, {:.1})\"><line x2=\"6\" stroke=\"#000\"/>\
             <text x=\"9\" dy=\"0.32em\" font-size=\"12\" {FONT}>{}</text></g>",
            legend.width, tick.offset, tick.label
        )?;
    }
    writeln!(
        out,
        "<text id=\"legend-title\" transform=\"translate(0, -10)\" {FONT} font-weight=\"bold\">{}</text>",
        escape(&legend.title)
    )?;
    writeln!(out, "</g>")
}

fn write_total(out: &mut String, total: &TotalMarker) -> fmt::Result {
    let points: Vec<String> = total
        .points
        .iter()
        .map(|p| format!("{:.1},{:.1}", p.x, p.y))
        .collect();
    writeln!(
        out,
        "<polygon class=\"total-marker\" points=\"{}\" fill=\"#000\"><title>{}</title></polygon>",
        points.join(" "),
        escape(&total.content.text())
    )
}

fn write_label(out: &mut String, class: &str, position: DVec2, anchor: Anchor, title: &str, body: &str) -> fmt::Result {
    let text_anchor = match anchor {
        Anchor::Left => "start",
        Anchor::Right => "end",
    };
    writeln!(
        out,
        "<text class=\"{class}\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"{text_anchor}\" font-size=\"14\" {FONT}>\
         <tspan font-weight=\"bold\">{}</tspan>: {}</text>",
        position.x,
        position.y,
        escape(title),
        escape(body)
    )
}

fn write_pinned(out: &mut String, pinned: &PinnedTooltip) -> fmt::Result {
    write_label(
        out,
        "pinned-tooltip",
        pinned.position,
        Anchor::Left,
        &pinned.content.title,
        &pinned.content.body,
    )
}

fn write_tooltip(out: &mut String, tooltip: &Tooltip) -> fmt::Result {
    if !tooltip.visible {
        return Ok(());
    }
    write_label(
        out,
        "tooltip",
        tooltip.position,
        tooltip.anchor,
        &tooltip.content.title,
        &tooltip.content.body,
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
