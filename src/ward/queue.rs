use std::collections::{HashSet, VecDeque};

use crate::framework::ContractViolation;
use crate::model::PatientId;

/// FIFO of admitted patients waiting for a doctor.
///
/// The queue has no lock of its own; it lives inside the patient table of
/// [`EntityStore`](super::EntityStore) and is guarded by that lock. An id can be queued
/// once per run, and `history` keeps the order in which ids went in.
#[derive(Debug, Default)]
pub struct WaitQueue {
    entries: VecDeque<PatientId>,
    seen: HashSet<PatientId>,
    history: Vec<PatientId>,
}

impl WaitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` and returns its position (1-based) in the line.
    pub fn enqueue(&mut self, id: PatientId) -> Result<usize, ContractViolation> {
        if !self.seen.insert(id) {
            return Err(ContractViolation::AlreadyQueued(id));
        }
        self.entries.push_back(id);
        self.history.push(id);
        Ok(self.entries.len())
    }

    /// Pops the front. Callers must already hold an availability unit, so an empty
    /// queue here means the signalling protocol was broken.
    pub fn claim_next(&mut self) -> Result<PatientId, ContractViolation> {
        self.entries.pop_front().ok_or(ContractViolation::EmptyQueue)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every id ever enqueued, in arrival order.
    pub fn history(&self) -> &[PatientId] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_in_first_claimed() {
        let mut queue = WaitQueue::new();
        assert_eq!(queue.enqueue(PatientId(3)).unwrap(), 1);
        assert_eq!(queue.enqueue(PatientId(1)).unwrap(), 2);
        assert_eq!(queue.claim_next().unwrap(), PatientId(3));
        assert_eq!(queue.claim_next().unwrap(), PatientId(1));
        assert!(queue.is_empty());
        assert_eq!(queue.history(), &[PatientId(3), PatientId(1)]);
    }

    #[test]
    fn empty_claim_is_a_violation() {
        let mut queue = WaitQueue::new();
        assert_eq!(queue.claim_next(), Err(ContractViolation::EmptyQueue));
    }

    #[test]
    fn an_id_is_queued_once() {
        let mut queue = WaitQueue::new();
        queue.enqueue(PatientId(0)).unwrap();
        assert_eq!(
            queue.enqueue(PatientId(0)),
            Err(ContractViolation::AlreadyQueued(PatientId(0)))
        );
        queue.claim_next().unwrap();
        assert!(queue.enqueue(PatientId(0)).is_err());
    }
}
