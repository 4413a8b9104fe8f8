use anyhow::{Context as _, Result};
use clap::Parser;
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Points},
        *,
    },
};
use shuttle_world_core::{
    HeadingUnits, Position, PopulationStats, Renderer, Rgb, Simulation, SimulationConfig,
};
use std::{
    collections::VecDeque,
    io::{self, Stdout},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file with simulation settings
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Number of agents, overriding the config file
    #[arg(short, long)]
    agents: Option<usize>,

    /// Seed for agent placement, overriding the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Convert headings from degrees before taking cos/sin
    #[arg(long)]
    degrees: bool,

    /// Milliseconds between simulation ticks
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Run this many ticks without a terminal UI and print the final snapshot as JSON
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
}

struct App {
    /// The core simulation.
    simulation: Simulation,
    /// Flag to control the main loop.
    should_quit: bool,
    /// Ticks are skipped while paused.
    paused: bool,
    /// Wall-clock gaps between the most recent ticks.
    tick_intervals: VecDeque<Duration>,
}

/// Number of tick intervals averaged for the rate readout.
const RATE_WINDOW: usize = 60;

impl App {
    fn new(simulation: Simulation) -> Self {
        App {
            simulation,
            should_quit: false,
            paused: false,
            tick_intervals: VecDeque::with_capacity(RATE_WINDOW),
        }
    }

    /// Handles one step of the simulation.
    fn tick(&mut self) {
        if !self.paused {
            self.simulation.tick();
        }
    }

    fn record_interval(&mut self, interval: Duration) {
        if self.tick_intervals.len() == RATE_WINDOW {
            self.tick_intervals.pop_front();
        }
        self.tick_intervals.push_back(interval);
    }

    /// Average tick rate over the recent window, in ticks per second.
    fn ticks_per_second(&self) -> f64 {
        let total: Duration = self.tick_intervals.iter().sum();
        if self.paused || total.is_zero() {
            return 0.0;
        }
        self.tick_intervals.len() as f64 / total.as_secs_f64()
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(&args)?;
    let simulation = Simulation::seeded(&config).context("building simulation")?;

    if let Some(ticks) = args.headless {
        return run_headless(simulation, ticks);
    }

    // Set up the terminal
    let mut terminal = setup_terminal()?;

    let mut app = App::new(simulation);
    let result = run_app(&mut terminal, &mut app, Duration::from_millis(args.tick_ms));

    // Restore the terminal even if the loop failed
    restore_terminal(&mut terminal)?;
    result
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

/// Reads the config file (if any) and applies command line overrides.
fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => read_config_file(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(agents) = args.agents {
        config.agent_count = agents;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.degrees {
        config.heading_units = HeadingUnits::Degrees;
    }
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<SimulationConfig> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Config file does not exist: {}",
            path.display()
        ));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: SimulationConfig = toml::from_str(&text)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    info!(path = %path.display(), "Loaded simulation config");
    Ok(config)
}

/// Runs a fixed number of ticks and prints the final snapshot on stdout.
fn run_headless(mut simulation: Simulation, ticks: u64) -> Result<()> {
    let mut clamps = 0;
    let mut turnarounds = 0;
    for _ in 0..ticks {
        let report = simulation.tick();
        clamps += report.clamps;
        turnarounds += report.turnarounds;
    }

    let stats = simulation.stats();
    if stats.agents == 0 {
        warn!("Headless run finished with an empty population");
    }
    info!(
        ticks,
        clamps,
        turnarounds,
        heading_to_a = stats.heading_to_a,
        heading_to_b = stats.heading_to_b,
        mean_counter_a = stats.mean_counter_a,
        mean_counter_b = stats.mean_counter_b,
        "Headless run finished"
    );

    let stdout = io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &simulation.snapshot())?;
    println!();
    Ok(())
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    KeyCode::Char(' ') => app.toggle_pause(),
                    _ => {}
                }
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick_rate {
            app.tick();
            app.record_interval(elapsed);
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Area for the field
            Constraint::Length(3), // Area for population stats
            Constraint::Length(2), // Area for status/help
        ])
        .split(frame.area());

    render_field(frame, main_layout[0], &app.simulation);
    render_stats(frame, main_layout[1], &app.simulation);

    let help = if app.paused {
        "Paused. Press space to resume, 'q' or 'Esc' to quit.".to_string()
    } else {
        format!(
            "{:.0} ticks/s. Press space to pause, 'q' or 'Esc' to quit.",
            app.ticks_per_second()
        )
    };
    let help_text = Paragraph::new(help)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, main_layout[2]);
}

/// Draws simulation primitives onto a ratatui canvas.
///
/// Screen y grows downward while canvas y grows upward, so y is flipped.
struct CanvasRenderer<'a, 'b> {
    ctx: &'a mut Context<'b>,
    height: f64,
}

impl CanvasRenderer<'_, '_> {
    fn point(&self, position: Position) -> (f64, f64) {
        (f64::from(position.x), self.height - f64::from(position.y))
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

impl Renderer for CanvasRenderer<'_, '_> {
    fn draw_dot(&mut self, position: Position, color: Rgb) {
        let coords = [self.point(position)];
        self.ctx.draw(&Points {
            coords: &coords,
            color: to_color(color),
        });
    }

    fn draw_circle(&mut self, center: Position, radius: u32, color: Rgb) {
        let (x, y) = self.point(center);
        self.ctx.draw(&Circle {
            x,
            y,
            radius: f64::from(radius),
            color: to_color(color),
        });
    }

    fn draw_line(&mut self, from: Position, to: Position, color: Rgb) {
        let (x1, y1) = self.point(from);
        let (x2, y2) = self.point(to);
        self.ctx.draw(&CanvasLine::new(x1, y1, x2, y2, to_color(color)));
    }
}

/// Renders the field, bases, agents and shout links onto the frame.
fn render_field(frame: &mut Frame, area: Rect, simulation: &Simulation) {
    let field = simulation.field();
    let width = f64::from(field.width());
    let height = f64::from(field.height());

    let canvas = Canvas::default()
        .block(Block::default().title("Shuttle World").borders(Borders::ALL))
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            let mut renderer = CanvasRenderer { ctx, height };
            simulation.render(&mut renderer);
        });

    frame.render_widget(canvas, area);
}

/// Renders the population summary line.
fn render_stats(frame: &mut Frame, area: Rect, simulation: &Simulation) {
    let PopulationStats {
        agents,
        heading_to_a,
        heading_to_b,
        mean_counter_a,
        mean_counter_b,
    } = simulation.stats();
    let base_a = simulation.base_a().id();
    let base_b = simulation.base_b().id();

    let line = Line::from(vec![
        Span::raw(format!("Tick {}  Agents {}  ", simulation.current_tick(), agents)),
        Span::styled(
            format!("→{base_a}: {heading_to_a} (avg age {mean_counter_a:.1})  "),
            Style::default().fg(to_color(base_a.color())),
        ),
        Span::styled(
            format!("→{base_b}: {heading_to_b} (avg age {mean_counter_b:.1})"),
            Style::default().fg(to_color(base_b.color())),
        ),
    ]);

    let stats = Paragraph::new(line).block(Block::default().title("Population").borders(Borders::ALL));
    frame.render_widget(stats, area);
}
