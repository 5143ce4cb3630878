use clap::Parser;
use color_eyre::Result;
use ping_tui::{
    app::App,
    chart::ChartProjector,
    cli::Cli,
    config::Config,
    metrics::{monitor::MonitorSettings, pool::WorkerPool, registry::MonitorRegistry},
    probe::system_ping::SystemPingProber,
    tui::{
        event::poll_key,
        screens::monitoring::MonitoringScreen,
        terminal::{self, Tui},
    },
};
use std::fs::OpenOptions;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);
    config.validate()?;

    init_logging(&config);
    tracing::info!("ping-tui v{} starting", env!("CARGO_PKG_VERSION"));

    let prober = SystemPingProber::new();
    let ping_available = prober.tool().is_available();

    let pool = WorkerPool::new(config.workers)?;
    let settings: MonitorSettings = config.monitor_settings();
    let registry = Arc::new(MonitorRegistry::new(pool, Arc::new(prober), settings));

    let mut app = App::new(
        registry.clone(),
        ChartProjector::new(config.history_size, config.scale_floor_ms),
    );
    app.ping_available = ping_available;
    for host in &config.hosts {
        app.add_host(host);
    }

    let mut terminal = match terminal::setup_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            registry.shutdown_all();
            return Err(e.into());
        }
    };
    let result = run(&mut terminal, &mut app, config.render_interval);

    registry.shutdown_all();
    terminal::restore_terminal(&mut terminal)?;
    result
}

fn run(terminal: &mut Tui, app: &mut App, render_interval: Duration) -> Result<()> {
    let mut last_draw: Option<Instant> = None;

    while !app.should_quit {
        let due = last_draw.map_or(true, |at| at.elapsed() >= render_interval);
        if due {
            let projection = app.projection();
            let hosts = app.hosts();
            let view: &App = app;
            terminal.draw(|frame| {
                MonitoringScreen::render(frame, view, &projection, &hosts);
            })?;
            last_draw = Some(Instant::now());
        }

        let wait = last_draw
            .map(|at| render_interval.saturating_sub(at.elapsed()))
            .unwrap_or_default();
        if let Some(key) = poll_key(wait)? {
            app.handle_key(key);
            // redraw right away so input feels immediate
            last_draw = None;
        }
    }

    Ok(())
}

/// Logs go to a file: the terminal belongs to the UI.
fn init_logging(config: &Config) {
    let Some(path) = config.log_file.clone().or_else(Config::default_log_path) else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}
