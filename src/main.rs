//! XR Gallery host
//!
//! Runs the gallery session on a fixed tick, fed by a line-editor REPL
//! standing in for keyboard and mouse, and optionally by a gamepad that
//! emulates both XR controllers.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use colored::*;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xr_gallery::cli::{self, DesktopInput, ReplCommand, HELP};
use xr_gallery::config::{AppConfig, ConfigWatcher};
use xr_gallery::console::{ConsoleLayer, SharedConsole};
use xr_gallery::content::{catalog_or_empty, ContentResolver, FsContentResolver};
use xr_gallery::input::gamepad::GamepadBridge;
use xr_gallery::menu::{group_galleries, MenuOutcome};
use xr_gallery::navigation::NavigationMode;
use xr_gallery::session::{FrameReport, GallerySession};

/// XR Gallery - walk a circular image gallery from the terminal or a gamepad
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Navigation mode override (desktop or xr)
    #[arg(short, long, value_parser = cli::parse_mode)]
    mode: Option<NavigationMode>,

    /// Use the first connected gamepad as XR controllers
    #[arg(long)]
    gamepad: bool,

    /// Do not start the interactive prompt
    #[arg(long)]
    no_repl: bool,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Print the gallery catalog grouped by letter and exit
    #[arg(long)]
    list_galleries: bool,

    /// Write a default configuration file if none exists and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config_exists = Path::new(&args.config).exists();
    let config = if config_exists {
        AppConfig::load(&args.config).await?
    } else {
        AppConfig::default()
    };

    let console = SharedConsole::new(config.console.capacity, config.console.visible_lines);
    init_logging(&args.log_level, args.log_json, &console, config.console.min_level())?;

    info!("Starting XR Gallery v{}...", env!("CARGO_PKG_VERSION"));

    if args.init_config {
        if config_exists {
            warn!("{} already exists, leaving it untouched", args.config);
        } else {
            config.save(&args.config).await?;
            info!("✅ Default configuration written to {}", args.config);
        }
        return Ok(());
    }

    if config_exists {
        info!("Configuration file: {}", args.config);
    } else {
        warn!("{} not found, using default configuration", args.config);
    }

    let resolver: Arc<dyn ContentResolver> = Arc::new(FsContentResolver::new(
        &config.gallery.root,
        config.gallery.catalog.as_ref().map(PathBuf::from),
    ));

    if args.list_galleries {
        print_catalog(resolver.as_ref()).await;
        return Ok(());
    }

    let mut session = GallerySession::new(&config, Arc::clone(&resolver), console);

    let bridge = if args.gamepad {
        match GamepadBridge::new() {
            Ok(bridge) => Some(bridge),
            Err(e) => {
                warn!("Gamepad unavailable, continuing without: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    match args.mode {
        Some(mode) => session.set_mode(mode),
        None if bridge.is_some() => session.set_mode(NavigationMode::Xr),
        None => {}
    }
    info!("Navigation mode: {}", session.mode());

    session.request_catalog();
    if let Some(initial) = &config.gallery.initial {
        session.request_gallery(initial.clone());
    }

    let (repl_tx, repl_rx) = mpsc::unbounded_channel();
    if args.no_repl {
        drop(repl_tx);
    } else {
        cli::spawn_repl(repl_tx)?;
        println!("{}", HELP.dimmed());
    }

    let watcher = if config_exists {
        match ConfigWatcher::new(args.config.clone()).await {
            Ok((watcher, _)) => Some(watcher),
            Err(e) => {
                warn!("Config hot-reload disabled: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    let host = Host {
        session,
        input: DesktopInput::new(),
        bridge,
        frame_limit: args.frames,
    };
    host.run(config.host.tick_hz, repl_rx, watcher, shutdown_signal()).await;

    info!("XR Gallery shutdown complete");
    Ok(())
}

/// Everything the main loop mutates
struct Host {
    session: GallerySession,
    input: DesktopInput,
    bridge: Option<GamepadBridge>,
    frame_limit: Option<u64>,
}

impl Host {
    async fn run(
        mut self,
        tick_hz: u32,
        mut repl_rx: mpsc::UnboundedReceiver<ReplCommand>,
        mut watcher: Option<ConfigWatcher>,
        shutdown: impl std::future::Future<Output = ()>,
    ) {
        let period = Duration::from_secs_f64(1.0 / f64::from(tick_hz.max(1)));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last = Instant::now();

        info!("✅ Gallery running at {} Hz", tick_hz);

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let now = Instant::now();
                    let dt = now.duration_since(last).as_secs_f32();
                    last = now;

                    let xr = self.bridge.as_mut().and_then(GamepadBridge::poll);
                    let raw = self.input.take_frame(xr);
                    let report = self.session.tick(dt, &raw);
                    log_report(&report);

                    if self.frame_limit.is_some_and(|limit| report.frame >= limit) {
                        info!("Frame limit reached after {} frames", report.frame);
                        break;
                    }
                }

                Some(command) = repl_rx.recv() => {
                    if !self.handle_command(command) {
                        break;
                    }
                }

                Some(new_config) = next_reload(&mut watcher) => {
                    info!("📝 Applying reloaded configuration");
                    self.session.apply_config(&new_config);
                }

                _ = &mut shutdown => {
                    break;
                }
            }
        }
    }

    /// Returns false when the host should stop
    fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => return false,
            ReplCommand::Mode(mode) => self.session.set_mode(mode),
            ReplCommand::Load(folder) => self.session.request_gallery(folder),
            ReplCommand::Status => print_status(&self.session),
            ReplCommand::Help => println!("{}", HELP),
            other => {
                self.input.apply(&other);
            }
        }
        true
    }
}

async fn next_reload(watcher: &mut Option<ConfigWatcher>) -> Option<AppConfig> {
    match watcher {
        Some(watcher) => watcher.next_config().await,
        None => std::future::pending().await,
    }
}

fn log_report(report: &FrameReport) {
    for event in &report.events {
        debug!("Frame {}: {:?}", report.frame, event);
    }
    for outcome in &report.menu_outcomes {
        match outcome {
            MenuOutcome::LoadGallery(name) => info!("📂 Gallery selected: {}", name),
            MenuOutcome::EnteredLetter(letter) => info!("Menu: letter {}", letter),
            other => debug!("Menu: {:?}", other),
        }
    }
}

fn print_status(session: &GallerySession) {
    let state = session.navigation().state();
    let menu = session.menu();

    println!("\n{}", "=== Gallery Status ===".bold().cyan());
    println!("  {} {}", "Mode:".bold(), session.mode().to_string().green());
    println!(
        "  {} ({:.2}, {:.2}, {:.2}) yaw {:.1}° pitch {:.1}°",
        "Position:".bold(),
        state.position.x,
        state.position.y,
        state.position.z,
        state.yaw.to_degrees(),
        state.pitch.to_degrees()
    );
    if state.is_clutching() {
        println!("  {}", "Clutch engaged".yellow());
    }

    println!("  {} {:?}", "Menu:".bold(), menu.state());
    for (index, item) in menu.items().iter().enumerate() {
        let label = item.node.label();
        let line = if item.highlighted {
            format!("> {}", label).green().bold()
        } else if menu.is_visible(index) {
            format!("  {}", label).normal()
        } else {
            format!("  {}", label).dimmed()
        };
        println!("    [{}] {}", index, line);
    }

    match session.gallery().folder() {
        Some(folder) => {
            let info = session.gallery().info_text().unwrap_or_else(|| "empty".to_string());
            println!("  {} {} - {}", "Gallery:".bold(), folder.cyan(), info);
        }
        None => println!("  {} {}", "Gallery:".bold(), "none".dimmed()),
    }
    if let Some(loading) = session.loading() {
        println!("  {} {}", "Loading:".bold(), loading.yellow());
    }

    let console = session.console().lock();
    if console.is_visible() {
        println!("  {}", "Console:".bold());
        for line in console.window() {
            println!("    {}", line.dimmed());
        }
    }
    println!();
}

async fn print_catalog(resolver: &dyn ContentResolver) {
    let galleries = catalog_or_empty(resolver).await;
    let groups = group_galleries(&galleries);

    println!("\n{}", "=== Galleries ===".bold().cyan());
    if groups.is_empty() {
        println!("  {}", "(none found)".yellow());
    }
    for (letter, names) in &groups {
        println!("  {} {}", letter.to_string().bold().green(), format!("({})", names.len()).dimmed());
        for name in names {
            println!("    {}", name);
        }
    }
    println!("\n  Total: {}\n", galleries.len().to_string().green());
}

fn init_logging(level: &str, json: bool, console: &SharedConsole, console_level: Level) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let text = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
    });
    let json = json.then(|| tracing_subscriber::fmt::layer().json().with_target(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .with(ConsoleLayer::new(console.clone(), console_level))
        .init();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
