//! Simulation controller backend.
//!
//! A scripted stand-in for the hardware abstraction library. Init
//! outcomes can be queued ahead of time and lock states set
//! externally through a [`SimHandle`], which stays usable after the
//! controller itself has been boxed into a driver.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use llrf_common::controller::LlrfController;
use llrf_common::status::LockState;

/// Default down converter module name reported by the simulation.
pub const SIM_DOWN_CONV_NAME: &str = "AmcCarrierDownConvert";
/// Default up converter module name reported by the simulation.
pub const SIM_UP_CONV_NAME: &str = "AmcCarrierUpConvert";

struct SimScript {
    /// Queued init outcomes; when empty, init() succeeds.
    init_results: VecDeque<bool>,
    down_locked: LockState,
    up_locked: LockState,
}

struct SimShared {
    script: Mutex<SimScript>,
    init_calls: AtomicU32,
    lock_queries: AtomicU32,
}

/// Scripted simulation of the LLRF AMC hardware abstraction object.
pub struct SimController {
    shared: Arc<SimShared>,
}

/// External handle for scripting a [`SimController`] and inspecting
/// its call counters.
#[derive(Clone)]
pub struct SimHandle {
    shared: Arc<SimShared>,
}

impl SimController {
    /// Create a simulation controller and its scripting handle.
    ///
    /// Initial state: init() succeeds, both converters not locked
    /// until a successful init().
    pub fn new() -> (Self, SimHandle) {
        let shared = Arc::new(SimShared {
            script: Mutex::new(SimScript {
                init_results: VecDeque::new(),
                down_locked: LockState::NotLocked,
                up_locked: LockState::NotLocked,
            }),
            init_calls: AtomicU32::new(0),
            lock_queries: AtomicU32::new(0),
        });
        (
            Self {
                shared: Arc::clone(&shared),
            },
            SimHandle { shared },
        )
    }
}

impl LlrfController for SimController {
    fn init(&mut self) -> bool {
        self.shared.init_calls.fetch_add(1, Ordering::SeqCst);
        let mut script = self.shared.script.lock();
        let success = script.init_results.pop_front().unwrap_or(true);
        if success {
            // A successful initialization locks both converter paths.
            script.down_locked = LockState::Locked;
            script.up_locked = LockState::Locked;
        }
        success
    }

    fn down_conv_locked(&self) -> LockState {
        self.shared.lock_queries.fetch_add(1, Ordering::SeqCst);
        self.shared.script.lock().down_locked
    }

    fn up_conv_locked(&self) -> LockState {
        self.shared.lock_queries.fetch_add(1, Ordering::SeqCst);
        self.shared.script.lock().up_locked
    }

    fn down_conv_name(&self) -> &str {
        SIM_DOWN_CONV_NAME
    }

    fn up_conv_name(&self) -> &str {
        SIM_UP_CONV_NAME
    }
}

impl SimHandle {
    /// Queue the outcome of the next init() call.
    pub fn push_init_result(&self, success: bool) {
        self.shared.script.lock().init_results.push_back(success);
    }

    /// Set the down converter lock state seen by subsequent queries.
    pub fn set_down_locked(&self, state: LockState) {
        self.shared.script.lock().down_locked = state;
    }

    /// Set the up converter lock state seen by subsequent queries.
    pub fn set_up_locked(&self, state: LockState) {
        self.shared.script.lock().up_locked = state;
    }

    /// Number of init() calls so far.
    pub fn init_calls(&self) -> u32 {
        self.shared.init_calls.load(Ordering::SeqCst)
    }

    /// Number of lock queries so far (both converters combined).
    pub fn lock_queries(&self) -> u32 {
        self.shared.lock_queries.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_defaults_to_success_and_locks_both() {
        let (mut controller, handle) = SimController::new();
        assert_eq!(controller.down_conv_locked(), LockState::NotLocked);
        assert!(controller.init());
        assert_eq!(controller.down_conv_locked(), LockState::Locked);
        assert_eq!(controller.up_conv_locked(), LockState::Locked);
        assert_eq!(handle.init_calls(), 1);
    }

    #[test]
    fn scripted_failure_leaves_lock_states_untouched() {
        let (mut controller, handle) = SimController::new();
        handle.push_init_result(false);
        handle.set_down_locked(LockState::Locked);

        assert!(!controller.init());
        assert_eq!(controller.down_conv_locked(), LockState::Locked);
        assert_eq!(controller.up_conv_locked(), LockState::NotLocked);
    }

    #[test]
    fn scripted_results_apply_in_order() {
        let (mut controller, handle) = SimController::new();
        handle.push_init_result(false);
        handle.push_init_result(true);

        assert!(!controller.init());
        assert!(controller.init());
        // Queue drained: back to the default outcome.
        assert!(controller.init());
        assert_eq!(handle.init_calls(), 3);
    }
}
