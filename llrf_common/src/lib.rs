//! LLRF AMC Common Library
//!
//! This crate provides the shared types and utilities for the LLRF AMC
//! driver workspace.
//!
//! # Module Structure
//!
//! - [`status`] - Three-valued status types and their wire encoding
//! - [`controller`] - Hardware controller capability trait
//! - [`driver`] - Port driver capability trait
//! - [`error`] - Error types for driver operations
//! - [`logging`] - Process-wide log level configuration
//! - [`config`] - Driver configuration loading
//! - [`prelude`] - Common re-exports for convenience

#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod status;
