use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use eat_map::app::{App, SVG_EXPORT_PATH};
use eat_map::data::{builtin_regions, load_regions};
use eat_map::map::svg;
use eat_map::model::{parse_payloads, RegionShape, RenderPayload};
use eat_map::settings::Settings;
use eat_map::widget::ChoroplethWidget;
use eat_map::{log as logger, ui};
use log::{info, warn};
use ratatui::DefaultTerminal;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_LOG_FILE: &str = "eat_map.log";

/// Choropleth map of the German federal states
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// JSON file with one render payload or an array of them
    payload: PathBuf,
    /// GeoJSON FeatureCollection with the state boundaries
    #[arg(long)]
    boundaries: Option<PathBuf>,
    /// Settings file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Write the first payload as SVG to this path instead of starting the terminal map
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Pixel width of the SVG mount area
    #[arg(long, default_value_t = 900.0)]
    width: f64,
    /// Pixel height of the SVG mount area
    #[arg(long, default_value_t = 1000.0)]
    height: f64,
    /// Log file used while the terminal map runs
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => Settings::load_from_path(path)?,
        None => Settings::load()?,
    };

    // The terminal map owns stdout/stderr, so it logs to a file
    let log_file = match &cli.svg {
        Some(_) => cli.log_file.clone(),
        None => Some(cli.log_file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))),
    };
    logger::init(Some(&settings.log_level), log_file.as_deref())?;

    let regions = regions(&cli, &settings);
    let payloads = read_payloads(&cli.payload)?;
    info!("Loaded {} payload(s) from {}", payloads.len(), cli.payload.display());

    if let Some(out) = &cli.svg {
        return export(&regions, &settings, payloads, out, cli.width, cli.height);
    }

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, &regions, &settings, payloads);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Boundaries from the command line or settings; built-in outlines otherwise
fn regions(cli: &Cli, settings: &Settings) -> Vec<RegionShape> {
    let Some(path) = cli.boundaries.as_ref().or(settings.boundaries.as_ref()) else {
        return builtin_regions();
    };
    load_regions(path, &settings.name_property).unwrap_or_else(|err| {
        warn!("{err:#}; using built-in outlines");
        builtin_regions()
    })
}

fn read_payloads(path: &Path) -> Result<Vec<RenderPayload>> {
    let mut bytes =
        fs::read(path).with_context(|| format!("Could not read payload file {}", path.display()))?;
    parse_payloads(&mut bytes).with_context(|| format!("Invalid payload in {}", path.display()))
}

/// Headless mode: render the first payload and write it as SVG
fn export(
    regions: &[RegionShape],
    settings: &Settings,
    payloads: Vec<RenderPayload>,
    out: &Path,
    width: f64,
    height: f64,
) -> Result<()> {
    let mut widget = ChoroplethWidget::mount(regions, width, height, settings.render_options());
    if let Some(payload) = payloads.into_iter().next() {
        widget.render(payload)?;
    }
    let document = svg::to_svg(widget.surface()).context("Could not serialise map")?;
    fs::write(out, document)
        .with_context(|| format!("Could not write {}", out.display()))?;
    info!("Wrote {}", out.display());
    Ok(())
}

/// Handle mouse events for hovering and pinning
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => app.mouse_move(mouse.column, mouse.row),
        MouseEventKind::Down(MouseButton::Left) => app.mouse_click(mouse.column, mouse.row),
        _ => {}
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    regions: &[RegionShape],
    settings: &Settings,
    payloads: Vec<RenderPayload>,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(
        size.width as usize,
        size.height as usize,
        regions,
        settings.render_options(),
        payloads,
    );

    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                            KeyCode::Char('n') | KeyCode::Right => app.next_payload(),
                            KeyCode::Char('p') | KeyCode::Left => app.prev_payload(),
                            KeyCode::Char('l') | KeyCode::Char('L') => app.toggle_language(),
                            KeyCode::Char('s') | KeyCode::Char('S') => {
                                if let Err(err) = app.export_svg(Path::new(SVG_EXPORT_PATH)) {
                                    warn!("{err:#}");
                                    app.message = Some(format!("{err:#}"));
                                }
                            }
                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::FocusLost => app.mouse_leave(),
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
