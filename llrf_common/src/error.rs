//! Error types for driver operations.

use thiserror::Error;

/// Error types for LLRF AMC driver operations.
///
/// Construction-time variants (`InvalidPortName`, `PortInUse`,
/// `ControllerNotFound`, `ParamExists`, `Config`) are fatal to the
/// operation that raised them and propagate. `InitFailed` and
/// `WriteProtected` are recoverable: status parameters are downgraded
/// and the failure is returned to the caller, never fatal to the
/// process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The controller's initialization sequence did not complete.
    #[error("Initialization failed on port {0}")]
    InitFailed(String),

    /// External write attempt against a status output parameter.
    #[error("Parameter {param} on port {port} is read-only")]
    WriteProtected {
        /// Name of the rejected parameter.
        param: String,
        /// Port the parameter belongs to.
        port: String,
    },

    /// No parameter with the given index exists.
    #[error("Unknown parameter index {0}")]
    UnknownParameter(usize),

    /// A parameter with the given name is already registered.
    #[error("Parameter {0} already exists")]
    ParamExists(String),

    /// Port names must be non-empty.
    #[error("Port name must not be empty")]
    InvalidPortName,

    /// A driver is already configured on the given port.
    #[error("Port {0} is already in use")]
    PortInUse(String),

    /// No controller backend with the given name is available.
    #[error("Controller not found: {0}")]
    ControllerNotFound(String),

    /// Log level outside the accepted 0..=3 range.
    #[error("Invalid log level {0} (expected 0: Debug, 1: Warning, 2: Error, 3: None)")]
    InvalidLogLevel(i64),

    /// Configuration load or validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;
