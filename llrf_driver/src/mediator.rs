//! The parameter mediator: the LLRF AMC port driver.
//!
//! Translates writes on the INIT and CHECK trigger parameters into
//! controller operations and republishes the outcomes on the
//! write-protected status parameters INIT_STAT, DC_STAT and UC_STAT.
//!
//! Each operation follows a two-checkpoint notification protocol:
//! all related status fields are set to InProgress and flushed before
//! the blocking controller call, and set to their final values and
//! flushed after it. Subscribers never observe a half-updated derived
//! state.

use std::sync::Arc;

use llrf_common::controller::LlrfController;
use llrf_common::driver::{ParamIndex, PortDriver};
use llrf_common::error::{DriverError, DriverResult};
use llrf_common::logging::{self, LogLevel};
use llrf_common::status::{InitStatus, LockStatus, STATUS_MASK, TRIGGER_MASK};

use crate::params::ParamTable;

/// Driver name used in log context.
pub const DRIVER_NAME: &str = "llrf_amc";

/// Name of the initialization trigger parameter.
pub const PARAM_INIT: &str = "INIT";
/// Name of the initialization status parameter.
pub const PARAM_INIT_STAT: &str = "INIT_STAT";
/// Name of the lock re-check trigger parameter.
pub const PARAM_CHECK: &str = "CHECK";
/// Name of the down converter lock status parameter.
pub const PARAM_DC_STAT: &str = "DC_STAT";
/// Name of the up converter lock status parameter.
pub const PARAM_UC_STAT: &str = "UC_STAT";

const FN_WRITE: &str = "write_u32_digital";

/// The LLRF AMC parameter mediator.
///
/// One instance per configured port name; owns exactly one controller
/// handle and the port's parameter table.
pub struct LlrfAmcDriver {
    port: String,
    controller: Box<dyn LlrfController>,
    params: Arc<ParamTable>,
    init_index: ParamIndex,
    init_stat_index: ParamIndex,
    check_index: ParamIndex,
    dc_stat_index: ParamIndex,
    uc_stat_index: ParamIndex,
}

impl LlrfAmcDriver {
    /// Create the driver on the given port and run the initial
    /// hardware initialization.
    ///
    /// Registers the five parameters, logs the converter module names
    /// and invokes the controller's initialization once. A failed
    /// initialization is recorded on the status parameters but does
    /// not fail construction.
    ///
    /// # Errors
    /// Returns `DriverError::InvalidPortName` for an empty port name
    /// and propagates parameter registration failures.
    pub fn new(port: &str, mut controller: Box<dyn LlrfController>) -> DriverResult<Self> {
        if port.is_empty() {
            return Err(DriverError::InvalidPortName);
        }

        let params = Arc::new(ParamTable::new(port));
        let init_index = params.create_param(PARAM_INIT, TRIGGER_MASK, false)?;
        let init_stat_index = params.create_param(PARAM_INIT_STAT, STATUS_MASK, true)?;
        let check_index = params.create_param(PARAM_CHECK, TRIGGER_MASK, false)?;
        let dc_stat_index = params.create_param(PARAM_DC_STAT, STATUS_MASK, true)?;
        let uc_stat_index = params.create_param(PARAM_UC_STAT, STATUS_MASK, true)?;

        logging::log(
            LogLevel::Debug,
            &format!(
                "Down converter module name : {}",
                controller.down_conv_name()
            ),
        );
        logging::log(
            LogLevel::Debug,
            &format!(
                "Up converter module name   : {}",
                controller.up_conv_name()
            ),
        );

        logging::log(LogLevel::Debug, "Initializing the LLRF AMC cards...");
        let success = controller.init();

        if success {
            logging::log(LogLevel::Debug, "Initialization succeeded!");

            // A successful init() guarantees both converter cards are
            // locked.
            params.set_internal(init_stat_index, InitStatus::Succeeded.to_bits())?;
            params.set_internal(dc_stat_index, LockStatus::Locked.to_bits())?;
            params.set_internal(uc_stat_index, LockStatus::Locked.to_bits())?;
        } else {
            logging::log(LogLevel::Error, "Initialization failed!");

            // After a failed init() each converter must be checked
            // individually; one of them may still be locked.
            params.set_internal(init_stat_index, InitStatus::Failed.to_bits())?;
            params.set_internal(
                dc_stat_index,
                LockStatus::from(controller.down_conv_locked()).to_bits(),
            )?;
            params.set_internal(
                uc_stat_index,
                LockStatus::from(controller.up_conv_locked()).to_bits(),
            )?;
        }

        Ok(Self {
            port: port.to_string(),
            controller,
            params,
            init_index,
            init_stat_index,
            check_index,
            dc_stat_index,
            uc_stat_index,
        })
    }

    /// Handle to the port's parameter table, for monitoring readers.
    pub fn params(&self) -> Arc<ParamTable> {
        Arc::clone(&self.params)
    }

    /// Current INIT_STAT value.
    pub fn init_status(&self) -> DriverResult<InitStatus> {
        let bits = self.params.get(self.init_stat_index)?;
        InitStatus::from_bits(bits).ok_or(DriverError::UnknownParameter(self.init_stat_index))
    }

    /// Current DC_STAT value.
    pub fn dc_status(&self) -> DriverResult<LockStatus> {
        let bits = self.params.get(self.dc_stat_index)?;
        LockStatus::from_bits(bits).ok_or(DriverError::UnknownParameter(self.dc_stat_index))
    }

    /// Current UC_STAT value.
    pub fn uc_status(&self) -> DriverResult<LockStatus> {
        let bits = self.params.get(self.uc_stat_index)?;
        LockStatus::from_bits(bits).ok_or(DriverError::UnknownParameter(self.uc_stat_index))
    }

    fn trace(&self, index: ParamIndex, message: &str) {
        logging::log(
            LogLevel::Debug,
            &format!(
                "{DRIVER_NAME}::{FN_WRITE}, function {index}, port {} : {message}",
                self.port
            ),
        );
    }

    /// INIT trigger: re-run the full initialization sequence.
    fn handle_init_write(&mut self) -> DriverResult<()> {
        // Checkpoint 1: all three status fields go InProgress before
        // the blocking call.
        self.params
            .set_internal(self.init_stat_index, InitStatus::InProgress.to_bits())?;
        self.params
            .set_internal(self.dc_stat_index, LockStatus::InProgress.to_bits())?;
        self.params
            .set_internal(self.uc_stat_index, LockStatus::InProgress.to_bits())?;
        self.params.flush_notifications();

        self.trace(self.init_index, "Calling controller init()");
        let success = self.controller.init();

        let result = if success {
            self.trace(self.init_index, "Call to controller init() succeeded!");

            self.params
                .set_internal(self.init_stat_index, InitStatus::Succeeded.to_bits())?;
            self.params
                .set_internal(self.dc_stat_index, LockStatus::Locked.to_bits())?;
            self.params
                .set_internal(self.uc_stat_index, LockStatus::Locked.to_bits())?;

            Ok(())
        } else {
            logging::log(
                LogLevel::Error,
                &format!(
                    "{DRIVER_NAME}::{FN_WRITE}, function {}, port {} : Call to controller init() failed!",
                    self.init_index, self.port
                ),
            );

            self.params
                .set_internal(self.init_stat_index, InitStatus::Failed.to_bits())?;

            // Lock states are queried freshly, never assumed NotLocked;
            // a converter can stay locked from an earlier run.
            self.trace(self.init_index, "Calling controller down_conv_locked()");
            self.params.set_internal(
                self.dc_stat_index,
                LockStatus::from(self.controller.down_conv_locked()).to_bits(),
            )?;

            self.trace(self.init_index, "Calling controller up_conv_locked()");
            self.params.set_internal(
                self.uc_stat_index,
                LockStatus::from(self.controller.up_conv_locked()).to_bits(),
            )?;

            Err(DriverError::InitFailed(self.port.clone()))
        };

        // Checkpoint 2: final values published together.
        self.params.flush_notifications();
        result
    }

    /// CHECK trigger: re-sample both lock states without re-running
    /// initialization. Never touches INIT_STAT.
    fn handle_check_write(&mut self) -> DriverResult<()> {
        self.params
            .set_internal(self.dc_stat_index, LockStatus::InProgress.to_bits())?;
        self.params
            .set_internal(self.uc_stat_index, LockStatus::InProgress.to_bits())?;
        self.params.flush_notifications();

        self.trace(self.check_index, "Calling controller down_conv_locked()");
        self.params.set_internal(
            self.dc_stat_index,
            LockStatus::from(self.controller.down_conv_locked()).to_bits(),
        )?;

        self.trace(self.check_index, "Calling controller up_conv_locked()");
        self.params.set_internal(
            self.uc_stat_index,
            LockStatus::from(self.controller.up_conv_locked()).to_bits(),
        )?;

        self.params.flush_notifications();
        Ok(())
    }

    /// Protected write: reject and leave the value unchanged.
    fn reject_protected_write(&self, index: ParamIndex) -> DriverResult<()> {
        let param = self.params.name_of(index)?;
        logging::log(
            LogLevel::Error,
            &format!(
                "{DRIVER_NAME}::{FN_WRITE}, function {index}, port {} : Parameter {param} is read-only.",
                self.port
            ),
        );
        Err(DriverError::WriteProtected {
            param,
            port: self.port.clone(),
        })
    }
}

impl PortDriver for LlrfAmcDriver {
    fn port(&self) -> &str {
        &self.port
    }

    fn write_u32_digital(&mut self, index: ParamIndex, value: u32, mask: u32) -> DriverResult<()> {
        if index == self.init_index {
            self.handle_init_write()
        } else if index == self.check_index {
            self.handle_check_write()
        } else if index == self.init_stat_index
            || index == self.dc_stat_index
            || index == self.uc_stat_index
        {
            self.reject_protected_write(index)
        } else {
            // Future parameters take the table's default handling.
            self.params.default_write(index, value, mask)?;
            self.params.flush_notifications();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::sim::SimController;
    use llrf_common::status::LockState;

    #[test]
    fn empty_port_name_fails_construction() {
        let (controller, _handle) = SimController::new();
        let result = LlrfAmcDriver::new("", Box::new(controller));
        assert!(matches!(result, Err(DriverError::InvalidPortName)));
    }

    #[test]
    fn construction_runs_init_once() {
        let (controller, handle) = SimController::new();
        let driver = LlrfAmcDriver::new("llrf0", Box::new(controller)).expect("construct");
        assert_eq!(handle.init_calls(), 1);
        assert_eq!(driver.init_status(), Ok(InitStatus::Succeeded));
    }

    #[test]
    fn failed_construction_init_reports_partial_lock() {
        let (controller, handle) = SimController::new();
        handle.push_init_result(false);
        handle.set_down_locked(LockState::Locked);
        handle.set_up_locked(LockState::NotLocked);

        let driver = LlrfAmcDriver::new("llrf0", Box::new(controller)).expect("construct");
        assert_eq!(driver.init_status(), Ok(InitStatus::Failed));
        assert_eq!(driver.dc_status(), Ok(LockStatus::Locked));
        assert_eq!(driver.uc_status(), Ok(LockStatus::NotLocked));
    }

    #[test]
    fn five_parameters_are_registered() {
        let (controller, _handle) = SimController::new();
        let driver = LlrfAmcDriver::new("llrf0", Box::new(controller)).expect("construct");
        let params = driver.params();
        for name in [
            PARAM_INIT,
            PARAM_INIT_STAT,
            PARAM_CHECK,
            PARAM_DC_STAT,
            PARAM_UC_STAT,
        ] {
            assert!(params.index_of(name).is_some(), "missing parameter {name}");
        }
    }
}
