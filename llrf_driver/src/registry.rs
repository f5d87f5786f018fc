//! Port registry: one driver instance per configured port name.
//!
//! Provides a `PortRegistry` struct plus free functions wrapping a
//! process-global instance for the shell commands, which address
//! drivers by port name.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::{Mutex, RwLock};

use llrf_common::driver::PortDriver;
use llrf_common::error::{DriverError, DriverResult};

use crate::mediator::LlrfAmcDriver;

/// Shared, lockable handle to a registered driver.
pub type PortHandle = Arc<Mutex<LlrfAmcDriver>>;

/// Registry of configured port drivers.
pub struct PortRegistry {
    ports: RwLock<HashMap<String, PortHandle>>,
}

impl PortRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            ports: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a driver under its port name.
    ///
    /// # Errors
    /// Returns `DriverError::PortInUse` if a driver is already
    /// registered on that port. Port names arrive from runtime
    /// configuration, so a duplicate is an error, not a panic.
    pub fn insert(&self, driver: LlrfAmcDriver) -> DriverResult<PortHandle> {
        let port = driver.port().to_string();
        let mut ports = self.ports.write();
        if ports.contains_key(&port) {
            return Err(DriverError::PortInUse(port));
        }
        let handle = Arc::new(Mutex::new(driver));
        ports.insert(port, Arc::clone(&handle));
        Ok(handle)
    }

    /// Look up the driver on a port.
    pub fn get(&self, port: &str) -> Option<PortHandle> {
        self.ports.read().get(port).cloned()
    }

    /// Remove and return the driver on a port.
    pub fn remove(&self, port: &str) -> Option<PortHandle> {
        self.ports.write().remove(port)
    }

    /// List the configured port names.
    pub fn ports(&self) -> Vec<String> {
        self.ports.read().keys().cloned().collect()
    }
}

impl Default for PortRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-global port registry used by the shell commands.
static GLOBAL_PORTS: LazyLock<PortRegistry> = LazyLock::new(PortRegistry::new);

/// Insert a driver into the global registry.
///
/// # Errors
/// Returns `DriverError::PortInUse` for duplicate port names.
pub fn register_port(driver: LlrfAmcDriver) -> DriverResult<PortHandle> {
    GLOBAL_PORTS.insert(driver)
}

/// Look up a driver in the global registry.
pub fn lookup_port(port: &str) -> Option<PortHandle> {
    GLOBAL_PORTS.get(port)
}

/// Remove a driver from the global registry.
pub fn remove_port(port: &str) -> Option<PortHandle> {
    GLOBAL_PORTS.remove(port)
}
