use crate::app::App;
use crate::map::surface::{Anchor, TooltipContent};
use crate::map::{Layer, Rgb, Surface};
use crate::raster::{rasterize, PixelCanvas};
use glam::DVec2;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into map area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let title = app.parameter_label().unwrap_or("Deutschland");
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let map_widget = MapWidget {
        surface: app.widget.surface(),
        cursor_pos: app.mouse_pos.and_then(|(col, row)| {
            let cx = col.checked_sub(1)?;
            let cy = row.checked_sub(1)?;
            (cx < inner.width && cy < inner.height).then_some((cx, cy))
        }),
    };
    frame.render_widget(map_widget, inner);
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Renders the rasterized surface with its text overlays
struct MapWidget<'a> {
    surface: &'a Surface,
    cursor_pos: Option<(u16, u16)>,
}

impl MapWidget<'_> {
    fn render_canvas(&self, canvas: &PixelCanvas, area: Rect, buf: &mut Buffer) {
        for (col, row, cell) in canvas.cells() {
            if col >= area.width as usize || row >= area.height as usize {
                continue;
            }
            let target = &mut buf[(area.x + col as u16, area.y + row as u16)];
            match (cell.upper, cell.lower) {
                (None, None) => {}
                (Some(upper), None) => {
                    target.set_char('▀').set_fg(to_color(upper));
                }
                (None, Some(lower)) => {
                    target.set_char('▄').set_fg(to_color(lower));
                }
                (Some(upper), Some(lower)) => {
                    target.set_char('▀').set_fg(to_color(upper)).set_bg(to_color(lower));
                }
            }
        }
    }

    /// Cell of a viewbox point
    fn cell_of(&self, point: DVec2) -> (i32, i32) {
        let pixel = self.surface.view.to_pixel(point);
        (pixel.x.floor() as i32, (pixel.y / 2.0).floor() as i32)
    }

    /// Write text starting at a cell, clipped to the area
    fn put_text(&self, col: i32, row: i32, text: &str, style: Style, area: Rect, buf: &mut Buffer) {
        if row < 0 || row >= area.height as i32 {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let x = col + i as i32;
            if x < 0 {
                continue;
            }
            if x >= area.width as i32 {
                break;
            }
            buf[(area.x + x as u16, area.y + row as u16)].set_char(ch).set_style(style);
        }
    }

    /// Tooltip box; shifted back inside the area when it would overflow
    fn put_tooltip(&self, position: DVec2, anchor: Anchor, content: &TooltipContent, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let text = format!(" {} ", content.text());
        let len = text.chars().count() as i32;
        let (col, row) = self.cell_of(position);
        let col = match anchor {
            Anchor::Left => col,
            Anchor::Right => col - len,
        };
        let col = col.min(area.width as i32 - len).max(0);
        let row = row.clamp(0, area.height as i32 - 1);

        let style = Style::default().fg(Color::White).bg(Color::Rgb(40, 40, 40));
        self.put_text(col, row, &text, style, area, buf);
        // Bold title
        self.put_text(
            col + 1,
            row,
            &content.title,
            style.add_modifier(Modifier::BOLD),
            area,
            buf,
        );
    }

    fn render_legend_text(&self, area: Rect, buf: &mut Buffer) {
        let Some(legend) = &self.surface.legend else {
            return;
        };
        let label_style = Style::default().fg(Color::White);
        let right = legend.origin + DVec2::new(legend.width, 0.0);
        let (label_col, _) = self.cell_of(right);

        for tick in &legend.ticks {
            let (_, row) = self.cell_of(legend.origin + DVec2::new(0.0, tick.offset));
            self.put_text(label_col + 1, row, &format!("─{}", tick.label), label_style, area, buf);
        }

        // Title above the bar, right-aligned with it
        let (_, title_row) = self.cell_of(legend.origin);
        let len = legend.title.chars().count() as i32;
        self.put_text(
            label_col - len,
            title_row - 1,
            &legend.title,
            label_style.add_modifier(Modifier::BOLD),
            area,
            buf,
        );
    }
}

impl Widget for MapWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Terminal shrunk below the border
        if area.is_empty() {
            return;
        }
        let canvas = rasterize(self.surface, area.width as usize, area.height as usize);
        self.render_canvas(&canvas, area, buf);

        // Text layers follow the surface's paint order
        for layer in self.surface.order() {
            match layer {
                Layer::Regions | Layer::TotalMarker => {}
                Layer::Legend => self.render_legend_text(area, buf),
                Layer::PinnedTooltips => {
                    for pinned in &self.surface.pinned {
                        self.put_tooltip(pinned.position, Anchor::Left, &pinned.content, area, buf);
                    }
                }
                Layer::Tooltip => {
                    let tooltip = &self.surface.tooltip;
                    if tooltip.visible {
                        self.put_tooltip(tooltip.position, tooltip.anchor, &tooltip.content, area, buf);
                    }
                }
            }
        }

        // Render cursor marker
        if let Some((cx, cy)) = self.cursor_pos {
            buf[(area.x + cx, area.y + cy)].set_char('╋').set_fg(Color::Red);
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" ", Style::default()),
        Span::styled(
            format!("{}/{}", app.current() + 1, app.payload_count().max(1)),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.language().code(), Style::default().fg(Color::Magenta)),
    ];

    if let Some((lon, lat)) = app.mouse_coords() {
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            format!("{:.2}°N, {:.2}°E", lat, lon),
            Style::default().fg(Color::Cyan),
        ));
    }

    if let Some(message) = &app.message {
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(message.as_str(), Style::default().fg(Color::Red)));
    }

    spans.push(Span::styled(
        " | click:pin n/p:payload l:lang s:svg q:quit",
        Style::default().fg(Color::DarkGray),
    ));

    let paragraph = Paragraph::new(Line::from(spans));
    frame.render_widget(paragraph, area);
}
