//! Administrative commands.
//!
//! The host runtime's shell registers two commands for this driver:
//! `configure` brings up a driver on a port, `set_log_level` adjusts
//! the process-wide log verbosity.

use llrf_common::controller::LlrfController;
use llrf_common::error::DriverResult;
use llrf_common::logging::{self, LogLevel};
use tracing::info;

use crate::controllers::create_controller;
use crate::mediator::LlrfAmcDriver;
use crate::registry::{self, PortHandle};

/// Configure a driver on `port` with the given controller handle.
///
/// Construction registers the five parameters and runs the initial
/// hardware initialization; the driver is then inserted into the
/// global port registry.
///
/// # Errors
/// Propagates construction failures and `DriverError::PortInUse` for
/// duplicate port names. A failed hardware initialization is not a
/// construction failure.
pub fn configure(port: &str, controller: Box<dyn LlrfController>) -> DriverResult<PortHandle> {
    let driver = LlrfAmcDriver::new(port, controller)?;
    let handle = registry::register_port(driver)?;
    info!("Configured LLRF AMC driver on port {port}");
    Ok(handle)
}

/// Configure a driver on `port` with a controller backend by name.
///
/// # Errors
/// Additionally returns `DriverError::ControllerNotFound` for unknown
/// backend names.
pub fn configure_backend(port: &str, backend: &str) -> DriverResult<PortHandle> {
    let controller = create_controller(backend)?;
    configure(port, controller)
}

/// Set the process-wide log level from its raw integer form
/// (0: Debug, 1: Warning, 2: Error, 3: None).
///
/// # Errors
/// Returns `DriverError::InvalidLogLevel` for out-of-range values;
/// the level is left unchanged.
pub fn set_log_level(raw: i64) -> DriverResult<LogLevel> {
    let level = logging::set_log_level(raw)?;
    info!("Driver log level set to {level:?}");
    Ok(level)
}
