use thiserror::Error;

/// Fault classes used for diagnostics aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Call-stack discipline violation.
    Stack,
    /// Out-of-range data access through the index register.
    Memory,
    /// Instruction fetch outside the address space.
    Fetch,
}

/// Fatal conditions raised by the interpreter's fail-fast policy.
///
/// The reference behavior performs these accesses unchecked; this core
/// rejects them and latches the fault so no corrupted state is observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultCode {
    /// Call issued with all 16 stack slots already occupied.
    #[error("call stack overflow")]
    StackOverflow,
    /// Return issued with an empty call stack.
    #[error("return from empty call stack")]
    StackUnderflow,
    /// Sprite or register-block read past the end of memory.
    #[error("memory read out of range")]
    MemoryReadOutOfRange,
    /// BCD or register-block write past the end of memory.
    #[error("memory write out of range")]
    MemoryWriteOutOfRange,
    /// Instruction fetch with the program counter outside memory.
    #[error("program counter out of range")]
    ProgramCounterOutOfRange,
}

impl FaultCode {
    /// Returns the diagnostics fault class for this fault code.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::StackOverflow | Self::StackUnderflow => FaultClass::Stack,
            Self::MemoryReadOutOfRange | Self::MemoryWriteOutOfRange => FaultClass::Memory,
            Self::ProgramCounterOutOfRange => FaultClass::Fetch,
        }
    }
}

/// Error raised when a ROM image cannot be accepted into memory.
///
/// The reference silently skips a failed load; this core reports it and
/// leaves memory untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RomError {
    /// Image is larger than the program region can hold.
    #[error("rom image of {len} bytes exceeds the {capacity}-byte program region")]
    Oversize {
        /// Length of the rejected image in bytes.
        len: usize,
        /// Capacity of the program region in bytes.
        capacity: usize,
    },
}
