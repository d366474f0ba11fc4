use crate::map::scale::{format_tick, LinearScale, SequentialScale};
use crate::map::surface::{Legend, Tick, TooltipContent, TotalMarker};
use crate::model::{DataPoint, Range};
use glam::DVec2;

/// Top-left corner of the legend bar, right of the map
pub const LEGEND_ORIGIN: DVec2 = DVec2::new(815.0, 300.0);
pub const LEGEND_WIDTH: f64 = 20.0;
pub const LEGEND_HEIGHT: f64 = 400.0;
const GRADIENT_STOPS: usize = 11;

/// Width and half height of the total marker triangle
const MARKER_WIDTH: f64 = 12.0;
const MARKER_HALF_HEIGHT: f64 = 6.0;

/// Build the gradient legend for a color scale.
/// domain[0] sits at the bottom of the bar, domain[1] at the top.
pub fn build_legend(scale: &SequentialScale, title: &str, tick_count: usize) -> Legend {
    let [d0, d1] = scale.domain();
    let axis = LinearScale::new([d0, d1], [LEGEND_HEIGHT, 0.0]);

    let stops = (0..GRADIENT_STOPS)
        .map(|i| {
            let t = i as f64 / (GRADIENT_STOPS - 1) as f64;
            (t, scale.color(d0 + t * (d1 - d0)))
        })
        .collect();

    let ticks = axis
        .ticks(tick_count)
        .into_iter()
        .map(|value| Tick {
            value,
            offset: axis.apply(value),
            label: format_tick(value),
        })
        .collect();

    Legend {
        origin: LEGEND_ORIGIN,
        width: LEGEND_WIDTH,
        height: LEGEND_HEIGHT,
        stops,
        ticks,
        title: title.to_string(),
        scale: axis,
    }
}

/// Marker for the national total, pointing at the bar from the left.
/// Positioned by the clamped estimate; `None` without an estimate.
pub fn build_total_marker(
    legend: &Legend,
    range: &Range,
    total: &DataPoint,
    content: TooltipContent,
) -> Option<TotalMarker> {
    let value = total.est?;
    let y = legend.origin.y + legend.scale.apply(range.clamp(value));
    let tip = DVec2::new(legend.origin.x, y);

    Some(TotalMarker {
        points: [
            tip + DVec2::new(-MARKER_WIDTH, -MARKER_HALF_HEIGHT),
            tip + DVec2::new(-MARKER_WIDTH, MARKER_HALF_HEIGHT),
            tip,
        ],
        value,
        content,
    })
}
