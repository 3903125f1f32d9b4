//! Architectural CPU state model primitives.

mod registers;
mod run_state;

pub use registers::{
    RegisterFile, FLAG_REGISTER, GENERAL_REGISTER_COUNT, INSTRUCTION_BYTES, STACK_DEPTH,
};
pub use run_state::RunState;
