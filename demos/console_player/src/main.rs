//! Console Incident Player
//!
//! Plays an incident timeline in the terminal:
//! - Events and category names loaded from JSON files
//! - Stats counters, a dot map and a bar timeline kept in sync by the
//!   playback controller
//! - Space toggles auto-advance, arrows move along the timeline
//!
//! Usage: `console_player [events.json] [names.json] [locale] [config.ron]`

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::cell::RefCell;
use std::io::{stdout, Stdout, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use topograph_core::{load_index, load_names, CategoryNames, EventIndex};
use topograph_playback::{Controller, PlaybackConfig, PlaybackState};
use topograph_views::{GeoBounds, MapView, StatsView, Surface, TimelineView};
use tracing_subscriber::EnvFilter;

const FRAME_MS: u64 = 33;
const BAR_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

struct Args {
    events: PathBuf,
    names: PathBuf,
    locale: String,
    config: Option<PathBuf>,
}

impl Args {
    fn from_env() -> Self {
        let mut args = std::env::args().skip(1);
        Self {
            events: args
                .next()
                .map(PathBuf::from)
                .unwrap_or_else(|| data_path("events.json")),
            names: args
                .next()
                .map(PathBuf::from)
                .unwrap_or_else(|| data_path("names.json")),
            locale: args.next().unwrap_or_else(system_locale),
            config: args.next().map(PathBuf::from).or_else(|| {
                let default = data_path("config.ron");
                default.exists().then_some(default)
            }),
        }
    }
}

fn data_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

/// `uk_UA.UTF-8` → `uk-UA`
fn system_locale() -> String {
    std::env::var("LC_ALL")
        .or_else(|_| std::env::var("LANG"))
        .ok()
        .and_then(|tag| tag.split('.').next().map(|s| s.replace('_', "-")))
        .filter(|tag| !tag.is_empty() && tag != "C" && tag != "POSIX")
        .unwrap_or_else(|| "en".to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::from_env();
    let config = match &args.config {
        Some(path) => PlaybackConfig::load(path)?,
        None => PlaybackConfig::default(),
    };

    let index = load_index(&args.events, &config.loading)?;
    let names = load_names(&args.names)?.select(&args.locale)?;
    tracing::info!(
        days = index.day_count(),
        records = index.record_count(),
        language = names.language(),
        "data loaded"
    );

    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = run_player(&mut stdout, &index, names, &config);

    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    result
}

/// Map grid size for a terminal size
fn map_surface(columns: u16, rows: u16) -> Surface {
    let width = columns.saturating_sub(4).clamp(10, 100);
    let height = rows.saturating_sub(14).clamp(5, 30);
    Surface::new(f64::from(width), f64::from(height))
}

fn run_player(
    stdout: &mut Stdout,
    index: &EventIndex,
    names: CategoryNames,
    config: &PlaybackConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let (columns, rows) = terminal::size()?;

    let timeline = Rc::new(RefCell::new(TimelineView::new(index, config.window_days)));
    let map = Rc::new(RefCell::new(MapView::new(
        GeoBounds::UKRAINE,
        map_surface(columns, rows),
        config.animation(),
    )));
    let stats = Rc::new(RefCell::new(StatsView::new(names, config.animation())));

    let mut controller = Controller::new(index, config);
    controller.attach(Rc::clone(&timeline));
    controller.attach(Rc::clone(&map));
    controller.attach(Rc::clone(&stats));
    controller.render_initial();

    let origin = Instant::now();
    let mut last_frame = origin;

    loop {
        if event::poll(Duration::from_millis(FRAME_MS))? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    KeyCode::Char(' ') => {
                        controller.toggle_play();
                    }
                    KeyCode::Left | KeyCode::Right => {
                        let mut timeline = timeline.borrow_mut();
                        if let Some(bar) = timeline.selected_bar() {
                            let target = if key.code == KeyCode::Left {
                                bar.checked_sub(1)
                            } else {
                                Some(bar + 1)
                            };
                            if let Some(target) = target {
                                timeline.click(target);
                            }
                        }
                    }
                    KeyCode::Home => {
                        controller.select_ordinal(0);
                    }
                    KeyCode::End => {
                        controller.select_ordinal(controller.days().len().saturating_sub(1));
                    }
                    _ => {}
                },
                Event::Resize(columns, rows) => {
                    map.borrow_mut().resize(map_surface(columns, rows));
                }
                _ => {}
            }
        }
        controller.pump_requests();

        let now = Instant::now();
        controller.advance(now.duration_since(last_frame));
        last_frame = now;

        let frame_time = now.duration_since(origin);
        stats.borrow_mut().frame(frame_time);
        map.borrow_mut().frame(frame_time);

        render(
            stdout,
            &controller,
            &timeline.borrow(),
            &map.borrow(),
            &stats.borrow(),
        )?;
    }
}

fn render(
    stdout: &mut Stdout,
    controller: &Controller<'_>,
    timeline: &TimelineView,
    map: &MapView,
    stats: &StatsView,
) -> Result<(), Box<dyn std::error::Error>> {
    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

    // Header
    let status = match controller.state() {
        PlaybackState::Idle => "no data",
        PlaybackState::Selected => "paused ",
        PlaybackState::Advancing => "playing",
    };
    let slider = timeline
        .slider()
        .map(|s| format!("{} ({}/{})", s.label, s.value + 1, s.max + 1))
        .unwrap_or_else(|| "-".to_string());
    queue!(
        stdout,
        SetForegroundColor(Color::Yellow),
        Print("  CRIME TOPOGRAPHY\r\n\r\n"),
        ResetColor,
        Print(format!("  [{status}]  {slider}\r\n\r\n"))
    )?;

    // Stats
    for item in stats.items() {
        let name = item
            .name
            .unwrap_or_else(|| stats.label(item.code));
        queue!(
            stdout,
            SetForegroundColor(Color::Cyan),
            Print(format!("  {:>10}", item.text)),
            ResetColor,
            Print(format!("  {name}\r\n"))
        )?;
    }
    queue!(stdout, Print("\r\n"))?;

    // Map
    let surface = map.projection().surface();
    let (width, height) = (surface.width as usize, surface.height as usize);
    let mut grid = vec![vec!['·'; width]; height];
    for point in map.drawn() {
        // The south and east borders project onto `height` / `width`
        if point.x < 0.0 || point.y < 0.0 || width == 0 || height == 0 {
            continue;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        if x <= width && y <= height {
            grid[y.min(height - 1)][x.min(width - 1)] = '●';
        }
    }
    queue!(stdout, SetForegroundColor(Color::Red))?;
    for row in grid {
        let line: String = row.into_iter().collect();
        queue!(stdout, Print(format!("  {line}\r\n")))?;
    }
    queue!(stdout, ResetColor, Print("\r\n"))?;

    // Timeline
    let selected = timeline.selected_bar();
    queue!(stdout, Print("  "))?;
    for (i, bar) in timeline.bars().iter().enumerate() {
        let level = (usize::from(bar.height_percent) * (BAR_GLYPHS.len() - 1)) / 100;
        let color = if Some(i) == selected {
            Color::Red
        } else {
            Color::DarkGrey
        };
        queue!(stdout, SetForegroundColor(color), Print(BAR_GLYPHS[level]))?;
    }
    queue!(
        stdout,
        ResetColor,
        Print("\r\n\r\n  space: play/pause   ←/→: day   home/end   q: quit\r\n")
    )?;

    stdout.flush()?;
    Ok(())
}
