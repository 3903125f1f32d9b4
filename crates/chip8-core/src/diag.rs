//! Observability counters for conditions the reference behavior absorbs
//! silently.

use crate::fault::{FaultClass, FaultCode};

/// Saturating counters and last-event fields owned by the machine.
///
/// Unknown words stay a no-op by default (the compatibility contract) but
/// every occurrence is recorded here so hosts can surface ROM bugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DiagCounters {
    /// Cycles that entered fetch, including ones that ended in a fault.
    pub cycle_count: u64,
    /// Saturating count of unmapped instruction words encountered.
    pub unknown_word_count: u32,
    /// The most recent unmapped word, if any.
    pub last_unknown_word: Option<u16>,
    /// Fetch address of the most recent unmapped word.
    pub last_unknown_pc: u16,
    /// Saturating count of stack-class faults.
    pub stack_fault_count: u32,
    /// Saturating count of memory-class faults.
    pub memory_fault_count: u32,
    /// Saturating count of fetch-class faults.
    pub fetch_fault_count: u32,
    /// The most recent fault, if any.
    pub last_fault_code: Option<FaultCode>,
    /// Fetch address of the most recent fault.
    pub last_fault_pc: u16,
}

impl DiagCounters {
    /// Creates a zeroed counter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one cycle entering fetch.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_cycle(&mut self) {
        self.cycle_count = self.cycle_count.saturating_add(1);
    }

    /// Records an unmapped instruction word and where it was fetched.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_unknown_word(&mut self, word: u16, pc: u16) {
        self.unknown_word_count = self.unknown_word_count.saturating_add(1);
        self.last_unknown_word = Some(word);
        self.last_unknown_pc = pc;
    }

    /// Records a fault occurrence, updating the last-fault fields and the
    /// class counter.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_fault(&mut self, code: FaultCode, pc: u16) {
        self.last_fault_code = Some(code);
        self.last_fault_pc = pc;
        match code.class() {
            FaultClass::Stack => {
                self.stack_fault_count = self.stack_fault_count.saturating_add(1);
            }
            FaultClass::Memory => {
                self.memory_fault_count = self.memory_fault_count.saturating_add(1);
            }
            FaultClass::Fetch => {
                self.fetch_fault_count = self.fetch_fault_count.saturating_add(1);
            }
        }
    }

    /// Resets every field to its default value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
