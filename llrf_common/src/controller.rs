//! Hardware controller capability trait.
//!
//! This module defines `LlrfController`, the boundary to the external
//! LLRF AMC hardware abstraction library. Register access, clock-domain
//! locking and initialization sequencing live entirely behind this
//! trait; the driver only invokes it and republishes the outcomes.

use crate::status::LockState;

/// Capability interface of the LLRF AMC hardware abstraction object.
///
/// One handle is shared across all operations of a mediator instance.
/// Mutating methods take `&mut self`, encoding the external library's
/// single-threaded contract; the host runtime serializes writes to a
/// given port.
///
/// # Lifecycle
///
/// 1. Module names are queried once at driver construction.
/// 2. `init()` is invoked once at construction and again on each INIT
///    trigger.
/// 3. Lock queries are invoked on CHECK triggers and after a failed
///    `init()`.
pub trait LlrfController: Send {
    /// Perform the full initialization/locking sequence for both
    /// converter paths.
    ///
    /// Synchronous and blocking; may take non-trivial wall-clock time.
    /// Returns overall success. An unsuccessful initialization is an
    /// in-contract outcome the hardware reports, not a transport
    /// error.
    fn init(&mut self) -> bool;

    /// Point-in-time lock query for the down converter.
    fn down_conv_locked(&self) -> LockState;

    /// Point-in-time lock query for the up converter.
    fn up_conv_locked(&self) -> LockState;

    /// Static module name of the down converter card.
    fn down_conv_name(&self) -> &str;

    /// Static module name of the up converter card.
    fn up_conv_name(&self) -> &str;
}
