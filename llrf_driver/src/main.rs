//! # LLRF AMC Driver Binary
//!
//! Brings up one LLRF AMC port driver and periodically re-triggers the
//! CHECK parameter until shutdown, logging the published lock states.
//!
//! # Usage
//!
//! ```bash
//! # Run with the simulation controller
//! llrf_driver --port llrf0 --simulate
//!
//! # Run from a config file
//! llrf_driver --config config/llrf.toml
//!
//! # Demonstrate a failing initialization
//! llrf_driver --port llrf0 -s --sim-init-fail -v
//! ```

#![deny(warnings)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use llrf_common::config::DriverConfig;
use llrf_common::driver::PortDriver;
use llrf_common::status::LockState;
use llrf_driver::controllers::sim::{SimController, SimHandle};
use llrf_driver::mediator::PARAM_CHECK;
use llrf_driver::registry::PortHandle;
use llrf_driver::{registry, shell};

/// LLRF AMC driver - parameter mediation for the LLRF AMC cards
#[derive(Parser, Debug)]
#[command(name = "llrf_driver")]
#[command(version)]
#[command(about = "LLRF AMC port driver with periodic lock-status checks")]
#[command(long_about = None)]
struct Args {
    /// Path to driver configuration file (llrf.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Port name for the driver instance (overrides config)
    #[arg(short, long)]
    port: Option<String>,

    /// Force the simulation controller
    #[arg(short = 's', long)]
    simulate: bool,

    /// Script the first simulated initialization to fail
    #[arg(long)]
    sim_init_fail: bool,

    /// Interval between CHECK triggers in milliseconds (overrides config)
    #[arg(long)]
    check_interval: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("Driver startup failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    setup_tracing(&args);

    info!("LLRF AMC driver v{} starting...", env!("CARGO_PKG_VERSION"));

    // Config file first, CLI overrides on top.
    let mut config = match args.config {
        Some(ref path) => {
            info!("Loading configuration from {:?}", path);
            DriverConfig::load(path)?
        }
        None => DriverConfig {
            port: "llrf0".to_string(),
            ..DriverConfig::default()
        },
    };
    if let Some(ref port) = args.port {
        config.port = port.clone();
    }
    if let Some(interval) = args.check_interval {
        config.check_interval_ms = interval;
    }
    config.validate()?;

    llrf_common::logging::set_log_level(config.log_level as i64)?;

    if args.simulate {
        info!("Simulation mode enabled");
    } else if config.controller != "simulation" {
        warn!(
            "Controller backend '{}' is not built in; falling back to simulation",
            config.controller
        );
    }

    // The simulation controller is the only built-in backend; create
    // it directly so a scripted init failure can be queued.
    let (controller, sim) = SimController::new();
    if args.sim_init_fail {
        info!("Scripting first init() to fail");
        sim.push_init_result(false);
    }

    let handle = shell::configure(&config.port, Box::new(controller))?;
    {
        let driver = handle.lock();
        info!(
            "Driver up on port {}: INIT_STAT={:?}, DC_STAT={:?}, UC_STAT={:?}",
            config.port,
            driver.init_status()?,
            driver.dc_status()?,
            driver.uc_status()?
        );
    }

    // Setup signal handler.
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            info!("Received shutdown signal");
            running.store(false, Ordering::SeqCst);
        })?;
    }

    if config.check_interval_ms == 0 {
        info!("Periodic check disabled; waiting for shutdown");
        while running.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(100));
        }
    } else {
        run_check_loop(&handle, &sim, config.check_interval_ms, &running)?;
    }

    registry::remove_port(&config.port);
    info!("LLRF AMC driver shutdown complete");
    Ok(())
}

/// Re-trigger CHECK at the configured interval until shutdown.
fn run_check_loop(
    handle: &PortHandle,
    sim: &SimHandle,
    interval_ms: u64,
    running: &AtomicBool,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting periodic lock check every {}ms", interval_ms);

    let check_index = {
        let driver = handle.lock();
        driver
            .params()
            .index_of(PARAM_CHECK)
            .ok_or("CHECK parameter missing")?
    };

    let mut cycles: u64 = 0;
    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(interval_ms));
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let mut driver = handle.lock();
        driver.write_u32_digital(check_index, 1, 0x01)?;
        cycles += 1;

        // Log every 10th cycle to keep the output readable.
        if cycles % 10 == 1 {
            info!(
                "Lock check #{}: DC_STAT={:?}, UC_STAT={:?} (queries so far: {})",
                cycles,
                driver.dc_status()?,
                driver.uc_status()?,
                sim.lock_queries()
            );
        }

        // Exercise the simulation a little: drop the up converter
        // lock every 50 cycles so state changes are visible.
        if cycles % 50 == 0 {
            sim.set_up_locked(LockState::NotLocked);
        }
    }

    info!("Lock check loop stopped after {} cycles", cycles);
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
