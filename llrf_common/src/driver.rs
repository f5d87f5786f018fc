//! Port driver capability trait.
//!
//! The host process-variable runtime dispatches digital writes to the
//! driver registered on a port through this interface. One concrete
//! type per driver; no deep hierarchy.

use crate::error::DriverResult;

/// Opaque runtime-assigned parameter index.
pub type ParamIndex = usize;

/// Interface a port driver registers with the host runtime.
pub trait PortDriver: Send {
    /// The port/unit identifier this driver is bound to.
    fn port(&self) -> &str;

    /// Handle a digital write against one of the driver's parameters.
    ///
    /// `mask` selects the significant bits of `value`. Writes to
    /// indexes the driver does not special-case are delegated to the
    /// default masked-store handling of its parameter storage.
    ///
    /// # Errors
    /// Returns an error for rejected writes (write-protected
    /// parameters, unknown indexes) and for failed controller
    /// operations.
    fn write_u32_digital(&mut self, index: ParamIndex, value: u32, mask: u32) -> DriverResult<()>;
}
