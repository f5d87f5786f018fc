//! # LLRF AMC Driver Library
//!
//! Port driver mediating between a process-variable surface and the
//! LLRF AMC hardware controller. Five digital parameters are exposed:
//! INIT and CHECK as write-triggers, INIT_STAT, DC_STAT and UC_STAT as
//! write-protected status outputs.
//!
//! # Module Structure
//!
//! - [`params`] - Parameter table (host-runtime storage + notifications)
//! - [`mediator`] - The parameter mediator (port driver)
//! - [`registry`] - One driver per configured port name
//! - [`shell`] - Administrative commands (configure, set_log_level)
//! - [`controllers`] - Controller backends (simulation)
//!
//! # Architecture
//!
//! ```text
//! write request ──► LlrfAmcDriver ──► LlrfController (external)
//!                        │                  │
//!                        ▼                  ▼
//!                   ParamTable ◄── derived status values
//!                        │
//!                        ▼
//!               subscriber notifications
//! ```

#![deny(warnings)]
#![deny(missing_docs)]

pub mod controllers;
pub mod mediator;
pub mod params;
pub mod registry;
pub mod shell;

// Re-export key types for convenience
pub use crate::controllers::sim::{SimController, SimHandle};
pub use crate::mediator::LlrfAmcDriver;
pub use crate::params::ParamTable;
pub use crate::registry::PortRegistry;
