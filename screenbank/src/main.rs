/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info, warn};

use screenbank::config::RotationConfig;
use screenbank::driver::{CommandDriver, DriverAdapter};
use screenbank::logging;
use screenbank::manager::Manager;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Screenbank – rotates images across a bank of USB display screens.
///
/// Example:
///   screenbank /etc/screenbank/screens.yaml
///   screenbank --debug --driver ./artista-sim screens.yaml
#[derive(Debug, Parser)]
#[command(
    name = "screenbank",
    about = "Screenbank – image rotation across a bank of USB screens",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML screen/image configuration file.
    config: PathBuf,

    /// Only log the current screen assignments each tick; change nothing.
    #[arg(short = 'd', long = "debug", default_value_t = false)]
    debug: bool,

    /// Device-control program to use instead of the configured one.
    #[arg(long = "driver")]
    driver: Option<PathBuf>,

    /// Blank every connected screen and exit.
    #[arg(short = 'b', long = "blank", default_value_t = false)]
    blank: bool,

    /// Fill the screens, run a single tick and exit.
    #[arg(long = "once", default_value_t = false)]
    once: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // ── Load configuration ────────────────────────────────────────────────────
    // The log device comes from the config file, so logging is set up after it.
    let mut config = match RotationConfig::load_from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            logging::init_default();
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if cli.debug {
        config.settings.debug = true;
    }
    if let Some(driver) = cli.driver {
        config.driver = driver;
    }

    if let Err(e) = logging::init(&config.log_device, config.settings.debug) {
        eprintln!("screenbank: {:#}", e);
        process::exit(1);
    }

    info!("Screenbank starting up...");
    info!("Loaded rotation configuration from: {}", cli.config.display());
    for warning in config.warnings() {
        warn!("{}", warning);
    }
    info!(
        config       = %cli.config.display(),
        image_dir    = %config.settings.image_dir.display(),
        tick_s       = config.settings.tick_interval.as_secs_f64(),
        random_start = config.settings.random_start,
        debug        = config.settings.debug,
        driver       = %config.driver.display(),
        "Configuration"
    );
    info!(
        "Managing {} screen(s): {:?} with {} image(s)",
        config.screens.len(),
        config.screens,
        config.images.len()
    );
    for image in &config.images {
        debug!(
            "  Image: {} | {}s | {}",
            image.id,
            image.duration_s,
            image.file.display()
        );
    }

    let driver = CommandDriver::new(&config.driver);

    // ── One-shot operations ───────────────────────────────────────────────────
    if cli.blank {
        match blank(&driver) {
            Ok(()) => {
                info!("All screens blanked");
                return;
            }
            Err(e) => {
                error!("{:#}", e);
                process::exit(1);
            }
        }
    }

    let mut manager = Manager::from_config(&config, driver);
    manager.start(Instant::now());

    if cli.once {
        match manager.tick(Instant::now()) {
            Ok(outcome) => info!(outcome = ?outcome, "Single tick done"),
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        }
        return;
    }

    // ── Tick loop ─────────────────────────────────────────────────────────────
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    match manager.run(shutdown).await {
        Ok(()) => info!("Screenbank stopped"),
        Err(e) => {
            error!("Banging out: {}", e);
            process::exit(1);
        }
    }
}

fn blank(driver: &CommandDriver) -> anyhow::Result<()> {
    driver
        .blank_all()
        .with_context(|| format!("Failed to blank screens via {}", driver.program().display()))
}
