//! Core interpreter crate for the CHIP-8 virtual machine.
//!
//! The machine is single-threaded and fully synchronous: one
//! [`Chip8::cycle`] call runs fetch, decode, dispatch, and timer decay to
//! completion before any state is observable. Rendering, input collection,
//! ROM file reads, and pacing belong to the host.

/// Fault taxonomy and ROM load errors.
pub mod fault;
pub use fault::{FaultClass, FaultCode, RomError};

/// Memory model primitives and the fixed region map.
pub mod memory;
pub use memory::{
    decode_memory_region, glyph_address, validate_fetch, validate_read_span, validate_write_span,
    AddressSpace, MemoryRegion, RegionDescriptor, FIXED_MEMORY_REGIONS, GLYPHS_END, GLYPHS_START,
    GLYPH_HEIGHT, GLYPH_SPRITES, GLYPH_TABLE_BYTES, INTERPRETER_END, INTERPRETER_START,
    MEMORY_BYTES, PROGRAM_END, PROGRAM_START, RESERVED_END, RESERVED_START, ROM_CAPACITY_BYTES,
};

/// Architectural CPU state model primitives.
pub mod state;
pub use state::{
    RegisterFile, RunState, FLAG_REGISTER, GENERAL_REGISTER_COUNT, INSTRUCTION_BYTES, STACK_DEPTH,
};

/// Monochrome framebuffer and sprite blitting.
pub mod display;
pub use display::{FrameBuffer, FRAME_HEIGHT, FRAME_WIDTH, SPRITE_WIDTH};

/// Hex keypad pressed/released vector.
pub mod keypad;
pub use keypad::{Keypad, KEY_COUNT};

/// Delay and sound countdown timers.
pub mod timers;
pub use timers::Timers;

/// Injectable byte-valued random source.
pub mod random;
pub use random::{RandomSource, SeededRandom, SequenceRandom};

/// Instruction word fields and dispatch classification tables.
pub mod opcode;
pub use opcode::{Opcode, OpcodePattern, Operation, OPCODE_TABLE};

/// Observability counters for silently absorbed conditions.
pub mod diag;
pub use diag::DiagCounters;

/// Instruction disassembly for traces and diagnostics.
pub mod disasm;
pub use disasm::disassemble;

/// Operation handlers.
mod execute;

/// Host-facing machine type and cycle loop.
pub mod machine;
pub use machine::{Chip8, CoreConfig, CycleOutcome, ShiftSource};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
