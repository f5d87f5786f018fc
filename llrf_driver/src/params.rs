//! Parameter table: host-runtime storage for a port's parameters.
//!
//! Named u32 cells with runtime-assigned indexes, masked writes and
//! change notifications. Parameters are created once at driver
//! construction and live for the table's entire lifetime. Reads may be
//! concurrent with an in-flight write; the table carries its own
//! internal lock for storage consistency.
//!
//! Change notifications are queued on mutation and delivered only by
//! an explicit [`ParamTable::flush_notifications`], so a driver can
//! set all related fields of a derived state before subscribers
//! observe any of them.

use parking_lot::Mutex;

use llrf_common::driver::ParamIndex;
use llrf_common::error::{DriverError, DriverResult};

/// Subscriber callback invoked with (index, value) on flush.
pub type NotifyCallback = Box<dyn Fn(ParamIndex, u32) + Send + Sync>;

/// One named parameter cell.
#[derive(Debug)]
struct ParamCell {
    /// Stable name, immutable after creation.
    name: String,
    /// Current stored value.
    value: u32,
    /// Significant bits of this parameter.
    mask: u32,
    /// Whether external writes are rejected.
    read_only: bool,
}

#[derive(Default)]
struct TableInner {
    cells: Vec<ParamCell>,
    /// Indexes with unflushed changes, in first-change order.
    pending: Vec<ParamIndex>,
}

/// Parameter storage for one port.
pub struct ParamTable {
    port: String,
    inner: Mutex<TableInner>,
    subscribers: Mutex<Vec<NotifyCallback>>,
}

impl ParamTable {
    /// Create an empty table for the given port.
    pub fn new(port: &str) -> Self {
        Self {
            port: port.to_string(),
            inner: Mutex::new(TableInner::default()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// The port this table belongs to.
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Register a parameter and return its runtime-assigned index.
    ///
    /// # Errors
    /// Returns `DriverError::ParamExists` if the name is taken.
    pub fn create_param(&self, name: &str, mask: u32, read_only: bool) -> DriverResult<ParamIndex> {
        let mut inner = self.inner.lock();
        if inner.cells.iter().any(|c| c.name == name) {
            return Err(DriverError::ParamExists(name.to_string()));
        }
        inner.cells.push(ParamCell {
            name: name.to_string(),
            value: 0,
            mask,
            read_only,
        });
        Ok(inner.cells.len() - 1)
    }

    /// Look up a parameter index by name.
    pub fn index_of(&self, name: &str) -> Option<ParamIndex> {
        self.inner.lock().cells.iter().position(|c| c.name == name)
    }

    /// Name of the parameter at `index`.
    pub fn name_of(&self, index: ParamIndex) -> DriverResult<String> {
        let inner = self.inner.lock();
        inner
            .cells
            .get(index)
            .map(|c| c.name.clone())
            .ok_or(DriverError::UnknownParameter(index))
    }

    /// Current value of the parameter at `index`.
    pub fn get(&self, index: ParamIndex) -> DriverResult<u32> {
        let inner = self.inner.lock();
        inner
            .cells
            .get(index)
            .map(|c| c.value)
            .ok_or(DriverError::UnknownParameter(index))
    }

    /// Internal masked store, bypassing write protection.
    ///
    /// Only the driver's own logic may use this path; the parameter's
    /// declared mask selects the bits written. A change queues the
    /// index for the next flush.
    pub fn set_internal(&self, index: ParamIndex, value: u32) -> DriverResult<()> {
        let mut inner = self.inner.lock();
        let cell = inner
            .cells
            .get(index)
            .ok_or(DriverError::UnknownParameter(index))?;
        let mask = cell.mask;
        self.store(&mut inner, index, value, mask)
    }

    /// Default external write handling: masked store + queue.
    ///
    /// # Errors
    /// Returns `DriverError::WriteProtected` for read-only parameters,
    /// leaving the value unchanged.
    pub fn default_write(&self, index: ParamIndex, value: u32, mask: u32) -> DriverResult<()> {
        let mut inner = self.inner.lock();
        let cell = inner
            .cells
            .get(index)
            .ok_or(DriverError::UnknownParameter(index))?;
        if cell.read_only {
            return Err(DriverError::WriteProtected {
                param: cell.name.clone(),
                port: self.port.clone(),
            });
        }
        self.store(&mut inner, index, value, mask)
    }

    fn store(
        &self,
        inner: &mut TableInner,
        index: ParamIndex,
        value: u32,
        mask: u32,
    ) -> DriverResult<()> {
        let cell = &mut inner.cells[index];
        let new_value = (cell.value & !mask) | (value & mask);
        if new_value != cell.value {
            cell.value = new_value;
            if !inner.pending.contains(&index) {
                inner.pending.push(index);
            }
        }
        Ok(())
    }

    /// Register a subscriber for change notifications.
    pub fn subscribe(&self, callback: NotifyCallback) {
        self.subscribers.lock().push(callback);
    }

    /// Deliver queued change notifications to all subscribers.
    ///
    /// Each pending parameter is reported once with the value stored
    /// at flush time. The storage lock is released before callbacks
    /// run, so subscribers may read the table; they must not register
    /// new subscribers from within a callback.
    pub fn flush_notifications(&self) {
        let changed: Vec<(ParamIndex, u32)> = {
            let mut inner = self.inner.lock();
            let pending = std::mem::take(&mut inner.pending);
            pending
                .into_iter()
                .map(|idx| (idx, inner.cells[idx].value))
                .collect()
        };
        if changed.is_empty() {
            return;
        }
        let subscribers = self.subscribers.lock();
        for (index, value) in changed {
            for callback in subscribers.iter() {
                callback(index, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn create_and_read_back() {
        let table = ParamTable::new("llrf0");
        let idx = table.create_param("INIT", 0x01, false).expect("create");
        assert_eq!(table.index_of("INIT"), Some(idx));
        assert_eq!(table.get(idx), Ok(0));
        assert_eq!(table.name_of(idx), Ok("INIT".to_string()));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let table = ParamTable::new("llrf0");
        table.create_param("INIT", 0x01, false).expect("create");
        assert_eq!(
            table.create_param("INIT", 0x01, false),
            Err(DriverError::ParamExists("INIT".to_string()))
        );
    }

    #[test]
    fn masked_store_preserves_unmasked_bits() {
        let table = ParamTable::new("llrf0");
        let idx = table.create_param("VAL", 0xFF, false).expect("create");
        table.default_write(idx, 0x0F, 0x0F).expect("write");
        // Second write touches only the upper nibble.
        table.default_write(idx, 0xA0, 0xF0).expect("write");
        assert_eq!(table.get(idx), Ok(0xAF));
    }

    #[test]
    fn read_only_rejects_external_write() {
        let table = ParamTable::new("llrf0");
        let idx = table.create_param("INIT_STAT", 0x03, true).expect("create");
        table.set_internal(idx, 1).expect("internal write");

        let result = table.default_write(idx, 2, 0x03);
        assert_eq!(
            result,
            Err(DriverError::WriteProtected {
                param: "INIT_STAT".to_string(),
                port: "llrf0".to_string(),
            })
        );
        // Value unchanged after the rejected write.
        assert_eq!(table.get(idx), Ok(1));
    }

    #[test]
    fn internal_write_bypasses_protection_and_applies_mask() {
        let table = ParamTable::new("llrf0");
        let idx = table.create_param("DC_STAT", 0x03, true).expect("create");
        table.set_internal(idx, 0xFF).expect("internal write");
        assert_eq!(table.get(idx), Ok(0x03));
    }

    #[test]
    fn unknown_index_errors() {
        let table = ParamTable::new("llrf0");
        assert_eq!(table.get(5), Err(DriverError::UnknownParameter(5)));
        assert_eq!(
            table.default_write(5, 0, 0x01),
            Err(DriverError::UnknownParameter(5))
        );
    }

    #[test]
    fn flush_reports_each_change_once_with_final_value() {
        let table = ParamTable::new("llrf0");
        let idx = table.create_param("STAT", 0x03, true).expect("create");

        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (count_cb, seen_cb) = (Arc::clone(&count), Arc::clone(&seen));
        table.subscribe(Box::new(move |index, value| {
            count_cb.fetch_add(1, Ordering::SeqCst);
            seen_cb.lock().push((index, value));
        }));

        // Two mutations before the flush coalesce into one report
        // carrying the value at flush time.
        table.set_internal(idx, 2).expect("write");
        table.set_internal(idx, 1).expect("write");
        table.flush_notifications();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(seen.lock().as_slice(), &[(idx, 1)]);

        // Nothing pending: flush is a no-op.
        table.flush_notifications();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Unchanged value does not queue a notification.
        table.set_internal(idx, 1).expect("write");
        table.flush_notifications();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
