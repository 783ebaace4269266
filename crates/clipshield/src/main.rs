//! `clipshield` - CLI for the clipboard guard
//!
//! This binary runs the clipboard monitor in the foreground and provides
//! one-shot scan, check and configuration commands.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::{info, warn};

use clipshield::cli::{
    read_input, render_config, render_detections, to_json, CheckCommand, Cli, Command,
    ConfigCommand, MaskedDetection, RunCommand, ScanCommand,
};
use clipshield::platform::{self, SystemClipboard, SystemNotifier, SystemPasteSource};
use clipshield::runtime::{self, MonitorHandle};
use clipshield::scheduler::TokioScheduler;
use clipshield::{
    detect, init_logging, scan, Config, Monitor, MonitorOptions, MonitorState, MonitorStatus,
    SharedSettings,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Run(run_cmd) => handle_run(&config, &run_cmd, cli.quiet)?,
        Command::Scan(scan_cmd) => handle_scan(&config, &scan_cmd)?,
        Command::Check(check_cmd) => handle_check(&config, check_cmd)?,
        Command::Config(config_cmd) => handle_config(&config, config_cmd)?,
    }
    Ok(())
}

fn handle_run(
    config: &Config,
    cmd: &RunCommand,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    platform::init()?;
    info!(platform = platform::platform_name(), "Starting clipshield");
    if config.patterns.enabled().is_empty() {
        warn!("All detection patterns are disabled, nothing will be cleared");
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let settings = SharedSettings::new(config.settings_snapshot());
        let (handle, events) = runtime::channel();

        let mut monitor = Monitor::new(
            settings.clone(),
            SystemClipboard::new()?,
            TokioScheduler::new(handle.sender()),
            SystemNotifier,
        )
        .with_options(MonitorOptions::from(config));

        if config.monitor.paste_detection && !cmd.no_paste_detection {
            if let Err(e) = platform::check_paste_permission() {
                warn!(error = %e, "Countdowns will not be shortened by pastes");
                if e.is_permission_error() && platform::request_paste_permission() {
                    info!("Permission granted");
                }
            }
            monitor = monitor.with_paste_source(SystemPasteSource::new(), handle.paste_sink());
        }

        if !quiet {
            tokio::spawn(print_status(monitor.subscribe()));
            println!(
                "clipshield is watching the clipboard (pid {}). Ctrl-C to stop, \
                 SIGUSR1 to clear now, SIGUSR2 to pause or resume.",
                std::process::id()
            );
        }
        spawn_signal_handlers(&handle, &settings)?;

        let monitor = runtime::run(monitor, events).await;
        info!(cleared = monitor.detection_count(), "clipshield stopped");
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Forward process signals to the monitor.
fn spawn_signal_handlers(handle: &MonitorHandle, settings: &SharedSettings) -> std::io::Result<()> {
    let mut clear_signal = signal(SignalKind::user_defined1())?;
    let mut toggle_signal = signal(SignalKind::user_defined2())?;

    let shutdown = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
        }
        shutdown.shutdown();
    });

    let handle = handle.clone();
    let settings = settings.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(()) = clear_signal.recv() => handle.clear_now(),
                Some(()) = toggle_signal.recv() => {
                    let enabled = settings.toggle_enabled();
                    info!(enabled, "Monitoring toggled");
                    handle.settings_changed();
                }
                else => break,
            }
        }
    });
    Ok(())
}

/// Print state changes, skipping per-second countdown ticks.
async fn print_status(mut status: watch::Receiver<MonitorStatus>) {
    let mut last: Option<(std::mem::Discriminant<MonitorState>, bool, bool)> = None;
    while status.changed().await.is_ok() {
        let current = status.borrow_and_update().clone();
        let accelerated = matches!(
            current.state,
            MonitorState::Counting {
                accelerated: true,
                ..
            }
        );
        let key = (
            std::mem::discriminant(&current.state),
            current.enabled,
            accelerated,
        );
        if last != Some(key) {
            println!("{current}");
            last = Some(key);
        }
    }
}

fn handle_scan(config: &Config, cmd: &ScanCommand) -> clipshield::Result<()> {
    let clipboard = SystemClipboard::new()?;
    let outcome = scan(&clipboard, &config.patterns.enabled(), cmd.dry_run)?;

    if cmd.json {
        println!("{}", to_json(&outcome)?);
    } else {
        println!("{outcome}");
    }
    Ok(())
}

fn handle_check(config: &Config, cmd: CheckCommand) -> clipshield::Result<()> {
    let text = read_input(cmd.text, std::io::stdin().lock())?;

    let detections = detect(&text, &config.patterns.enabled());
    if cmd.json {
        let masked: Vec<MaskedDetection> = detections.iter().map(MaskedDetection::from).collect();
        println!("{}", to_json(&masked)?);
    } else {
        println!("{}", render_detections(&detections));
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> clipshield::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", to_json(config)?);
            } else {
                println!("{}", render_config(config));
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
