//! Status value types for the driver's process-variable surface.
//!
//! This module defines:
//! - `InitStatus` - Initialization outcome published on INIT_STAT
//! - `LockStatus` - Converter lock state published on DC_STAT/UC_STAT
//! - `LockState` - Two-valued lock state as reported by the controller
//!
//! The enums are closed tagged variants; the wire-level bit patterns
//! live only in `to_bits`/`from_bits` so internal logic never touches
//! raw bitmasks.

/// Write mask for the two-bit status parameters (INIT_STAT, xC_STAT).
pub const STATUS_MASK: u32 = 0x03;

/// Write mask for the single-bit trigger parameters (INIT, CHECK).
pub const TRIGGER_MASK: u32 = 0x01;

/// Initialization status, published on the INIT_STAT parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InitStatus {
    /// The last initialization attempt failed.
    Failed = 0,
    /// The last initialization attempt succeeded.
    Succeeded = 1,
    /// An initialization attempt is outstanding.
    InProgress = 2,
}

impl InitStatus {
    /// Encode as the wire-level bit pattern under [`STATUS_MASK`].
    pub const fn to_bits(self) -> u32 {
        self as u32
    }

    /// Decode from a wire-level bit pattern. Bits outside
    /// [`STATUS_MASK`] are ignored; the unused fourth pattern decodes
    /// to `None`.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits & STATUS_MASK {
            0 => Some(Self::Failed),
            1 => Some(Self::Succeeded),
            2 => Some(Self::InProgress),
            _ => None,
        }
    }
}

/// Converter lock status, published on the DC_STAT and UC_STAT
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LockStatus {
    /// The converter has not achieved stable synchronized operation.
    NotLocked = 0,
    /// The converter is locked.
    Locked = 1,
    /// A lock query or initialization is outstanding.
    InProgress = 2,
}

impl LockStatus {
    /// Encode as the wire-level bit pattern under [`STATUS_MASK`].
    pub const fn to_bits(self) -> u32 {
        self as u32
    }

    /// Decode from a wire-level bit pattern. Bits outside
    /// [`STATUS_MASK`] are ignored; the unused fourth pattern decodes
    /// to `None`.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits & STATUS_MASK {
            0 => Some(Self::NotLocked),
            1 => Some(Self::Locked),
            2 => Some(Self::InProgress),
            _ => None,
        }
    }
}

/// Point-in-time lock state as reported by the hardware controller.
///
/// The controller boundary is two-valued; `InProgress` exists only on
/// the parameter surface, so it can never leak in from a lock query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// The converter is not locked.
    NotLocked,
    /// The converter is locked.
    Locked,
}

impl From<LockState> for LockStatus {
    fn from(state: LockState) -> Self {
        match state {
            LockState::NotLocked => Self::NotLocked,
            LockState::Locked => Self::Locked,
        }
    }
}
