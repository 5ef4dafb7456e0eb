use std::sync::Mutex;

use super::lock;

/// Single-use admission tickets.
///
/// The count only ever goes down: a patient who leaves does not hand its ticket back.
#[derive(Debug)]
pub struct AdmissionGate {
    capacity: usize,
    remaining: Mutex<usize>,
}

impl AdmissionGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            remaining: Mutex::new(capacity),
        }
    }

    /// Takes a ticket if one is left. Never blocks, never retries.
    pub fn try_admit(&self) -> bool {
        let mut remaining = lock(&self.remaining);
        if *remaining > 0 {
            *remaining -= 1;
            true
        } else {
            false
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        *lock(&self.remaining)
    }

    pub fn consumed(&self) -> usize {
        self.capacity - self.remaining()
    }
}
