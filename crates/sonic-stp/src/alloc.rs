//! MSTP instance id allocator.
//!
//! One slot per id in `[min, max]`; a slot is used exactly while the
//! instance exists. Allocation is first-fit so freed ids are reused lowest
//! first. The table lives in the shared store and is only mutated under
//! its write lock.

use sonic_sai::api::mstp::MstpInstanceId;
use sonic_sai::{SaiError, SaiResult};

/// Fixed-capacity instance slot table.
#[derive(Debug, Clone)]
pub struct InstanceTable {
    min: u16,
    slots: Vec<bool>,
}

impl InstanceTable {
    /// Creates a table for ids `min..=max`, all free.
    ///
    /// An empty range (`min > max`) yields a table that never allocates.
    pub fn new(min: u16, max: u16) -> Self {
        let len = if min > max {
            0
        } else {
            usize::from(max - min) + 1
        };
        Self {
            min,
            slots: vec![false; len],
        }
    }

    /// Number of ids the table manages.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of ids currently allocated.
    pub fn used_count(&self) -> usize {
        self.slots.iter().filter(|used| **used).count()
    }

    /// Returns true if `id` lies in the managed range.
    pub fn in_range(&self, id: MstpInstanceId) -> bool {
        self.index(id).is_some()
    }

    /// Returns true if `id` is allocated.
    pub fn is_used(&self, id: MstpInstanceId) -> bool {
        self.index(id).is_some_and(|idx| self.slots[idx])
    }

    /// Allocates the lowest free id.
    ///
    /// # Errors
    ///
    /// `TableFull` when every id is in use.
    pub fn allocate(&mut self) -> SaiResult<MstpInstanceId> {
        let idx = self
            .slots
            .iter()
            .position(|used| !used)
            .ok_or_else(|| {
                stp_error!("STP instances DB is full");
                SaiError::table_full("STP instances")
            })?;

        self.slots[idx] = true;
        let id = self.id_at(idx);
        stp_debug!("Generated STP id [{}]", id);
        Ok(id)
    }

    /// Releases `id`. Ids outside the range or already free are ignored.
    pub fn free(&mut self, id: MstpInstanceId) {
        match self.index(id) {
            Some(idx) => {
                stp_notice!("Removing instance id [{}] from STP db", id);
                self.slots[idx] = false;
            }
            None => {
                stp_warn!("Ignoring free of out of range STP id [{}]", id);
            }
        }
    }

    /// Allocated ids in ascending order.
    pub fn used_ids(&self) -> impl Iterator<Item = MstpInstanceId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, used)| **used)
            .map(|(idx, _)| self.id_at(idx))
    }

    fn index(&self, id: MstpInstanceId) -> Option<usize> {
        let offset = usize::from(id.as_u16().checked_sub(self.min)?);
        (offset < self.slots.len()).then_some(offset)
    }

    fn id_at(&self, idx: usize) -> MstpInstanceId {
        // idx < capacity <= u16 range above min
        MstpInstanceId::new(self.min + idx as u16)
    }
}
