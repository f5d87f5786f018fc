//! Controller backends.
//!
//! Production deployments attach the external hardware abstraction
//! library behind [`llrf_common::controller::LlrfController`]; this
//! crate ships the simulation backend used by the binary's simulation
//! mode and by the tests.

pub mod sim;

use llrf_common::controller::LlrfController;
use llrf_common::error::{DriverError, DriverResult};

use crate::controllers::sim::SimController;

/// Create a controller backend by configured name.
///
/// # Errors
/// Returns `DriverError::ControllerNotFound` for unknown names.
pub fn create_controller(name: &str) -> DriverResult<Box<dyn LlrfController>> {
    match name {
        "simulation" => {
            let (controller, _handle) = SimController::new();
            Ok(Box::new(controller))
        }
        other => Err(DriverError::ControllerNotFound(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_backend_is_available() {
        let controller = create_controller("simulation").expect("should create");
        assert_eq!(controller.down_conv_name(), "AmcCarrierDownConvert");
    }

    #[test]
    fn unknown_backend_errors() {
        let result = create_controller("ethercat");
        assert!(matches!(result, Err(DriverError::ControllerNotFound(_))));
    }
}
