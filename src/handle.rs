//! Opaque-handle interface.
//!
//! A [`HandleTable`] owns values and hands out [`Handle`]s. Stale or
//! never-issued handles are rejected with an error instead of touching
//! freed storage, and released slots are recycled under a new generation.

use serde::{Serialize, Deserialize};
use crate::error::BigFixedError;
use crate::fixed::{self, BigFixedInt};

/// Reference to a value stored in a [`HandleTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle {
    index: u32,
    generation: u32,
}

struct Slot {
    generation: u32,
    value: Option<BigFixedInt>,
}

impl Slot {
    fn get(&self, handle: Handle) -> Result<&BigFixedInt, BigFixedError> {
        match &self.value {
            Some(value) if self.generation == handle.generation => Ok(value),
            _ => Err(BigFixedError::InvalidHandle(handle)),
        }
    }

    fn get_mut(&mut self, handle: Handle) -> Result<&mut BigFixedInt, BigFixedError> {
        match &mut self.value {
            Some(value) if self.generation == handle.generation => Ok(value),
            _ => Err(BigFixedError::InvalidHandle(handle)),
        }
    }
}

/// Index for a fresh slot appended after `len` existing ones.
fn next_index(len: usize) -> Result<u32, BigFixedError> {
    u32::try_from(len).map_err(|_| BigFixedError::HandleTableFull(len))
}

/// Owner of every value reachable through a [`Handle`].
#[derive(Default)]
pub struct HandleTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Store a value and return its handle.
    pub fn insert(&mut self, value: BigFixedInt) -> Result<Handle, BigFixedError> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            self.live += 1;
            return Ok(Handle { index, generation: slot.generation });
        }
        let index = next_index(self.slots.len())?;
        self.slots.push(Slot { generation: 0, value: Some(value) });
        self.live += 1;
        Ok(Handle { index, generation: 0 })
    }

    /// Create a zero value in `radix`.
    pub fn construct(&mut self, radix: u64) -> Result<Handle, BigFixedError> {
        let value = BigFixedInt::new(radix)?;
        self.insert(value)
    }

    /// Drop the value behind `handle`. Returns `false` if it was already
    /// released or never issued; releasing twice is harmless.
    pub fn release(&mut self, handle: Handle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index as usize) else {
            return false;
        };
        if slot.get(handle).is_err() {
            return false;
        }
        slot.value = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        true
    }

    pub fn get(&self, handle: Handle) -> Result<&BigFixedInt, BigFixedError> {
        self.slots
            .get(handle.index as usize)
            .ok_or(BigFixedError::InvalidHandle(handle))?
            .get(handle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut BigFixedInt, BigFixedError> {
        self.slots
            .get_mut(handle.index as usize)
            .ok_or(BigFixedError::InvalidHandle(handle))?
            .get_mut(handle)
    }

    /// Run `op` with `target` mutable and `operand` shared.
    fn with_pair<F>(&mut self, target: Handle, operand: Handle, op: F) -> Result<(), BigFixedError>
    where
        F: FnOnce(&mut BigFixedInt, &BigFixedInt) -> Result<(), BigFixedError>,
    {
        self.get(target)?;
        self.get(operand)?;
        if target.index == operand.index {
            return Err(BigFixedError::AliasedOperands(target));
        }

        let (t, o) = (target.index as usize, operand.index as usize);
        let (target_slot, operand_slot) = if t < o {
            let (low, high) = self.slots.split_at_mut(o);
            (&mut low[t], &high[0])
        } else {
            let (low, high) = self.slots.split_at_mut(t);
            (&mut high[0], &low[o])
        };
        op(target_slot.get_mut(target)?, operand_slot.get(operand)?)
    }

    /// Add a small integer to the value behind `handle`.
    pub fn add_u64(&mut self, handle: Handle, value: u64) -> Result<(), BigFixedError> {
        self.get_mut(handle)?.add_u64(value)
    }

    /// `a += b`.
    pub fn add_into(&mut self, a: Handle, b: Handle) -> Result<(), BigFixedError> {
        self.with_pair(a, b, fixed::add_into)
    }

    /// `a -= b`; requires `a >= b`.
    pub fn subtract_into(&mut self, a: Handle, b: Handle) -> Result<(), BigFixedError> {
        self.with_pair(a, b, fixed::subtract_into)
    }

    /// `a = ⌊a / b⌋`.
    pub fn divide_into(&mut self, a: Handle, b: Handle) -> Result<(), BigFixedError> {
        self.with_pair(a, b, fixed::divide_into)
    }

    /// New handle holding `⌊a / b⌋`.
    pub fn divide(&mut self, a: Handle, b: Handle) -> Result<Handle, BigFixedError> {
        let quotient = fixed::divide(self.get(a)?, self.get(b)?)?;
        self.insert(quotient)
    }

    /// -1, 0 or +1.
    pub fn compare(&self, a: Handle, b: Handle) -> Result<i8, BigFixedError> {
        fixed::compare(self.get(a)?, self.get(b)?)
    }

    /// New handle holding an independent copy.
    pub fn clone_value(&mut self, handle: Handle) -> Result<Handle, BigFixedError> {
        let copy = self.get(handle)?.try_clone()?;
        self.insert(copy)
    }
}
