//! volknob - drive the default output volume from a HID volume knob.
//!
//! Subscribes to consumer-control input, turns knob and media-key events
//! into volume and mute changes on the default output device, and runs the
//! event loop until the process is signalled.

use anyhow::{Context, Result};
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

mod config;
#[cfg(target_os = "macos")]
mod signals;

use config::Config;
use volknob_core::READY_TARGET;

fn main() -> Result<()> {
    let config = Config::default();

    init_logging(&config)?;

    debug!(version = env!("CARGO_PKG_VERSION"), "Starting volknob");

    config.validate().context("Invalid configuration")?;

    run(&config)
}

/// Set up logging. Warnings and errors go to stderr, everything else to
/// stdout.
fn init_logging(config: &Config) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(config, env.as_deref())?)
        .with_writer(std::io::stderr.with_max_level(Level::WARN).or_else(std::io::stdout))
        .init();

    Ok(())
}

/// A valid `RUST_LOG` value replaces the default directives. The ready line
/// is enabled either way.
fn log_filter(config: &Config, env: Option<&str>) -> Result<EnvFilter> {
    let filter = match env.map(EnvFilter::try_new) {
        Some(Ok(filter)) => filter,
        _ => {
            let mut filter = EnvFilter::new("warn");
            for directive in &config.log_directives {
                filter = filter.add_directive(directive.parse()?);
            }
            filter
        }
    };

    Ok(filter.add_directive(format!("{READY_TARGET}=info").parse()?))
}

#[cfg(target_os = "macos")]
fn run(config: &Config) -> Result<()> {
    use tracing::info;
    use volknob_core::{InputEventRouter, VolumeController};
    use volknob_macos::{CoreAudioHardware, HidManager, RunLoopHandle, run_loop};

    let controller = VolumeController::new(CoreAudioHardware::new());
    let mut manager = HidManager::new().context("Failed to create HID manager")?;
    let mut router = InputEventRouter::new(controller, config.step);
    router.start(&mut manager);

    let main_loop = RunLoopHandle::current();
    signals::spawn_shutdown_watcher(move || main_loop.stop())?;

    run_loop::run_current();

    info!("Shutting down");
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn run(_config: &Config) -> Result<()> {
    anyhow::bail!("volknob requires CoreAudio and IOKit, which this platform does not provide")
}
