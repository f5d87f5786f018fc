//! Common re-exports for driver crates.

pub use crate::config::DriverConfig;
pub use crate::controller::LlrfController;
pub use crate::driver::{ParamIndex, PortDriver};
pub use crate::error::{DriverError, DriverResult};
pub use crate::logging::LogLevel;
pub use crate::status::{InitStatus, LockState, LockStatus, STATUS_MASK, TRIGGER_MASK};
