//! Operation handlers for the instruction set.
//!
//! Handlers validate stack and span bounds before touching any state, so a
//! faulting instruction commits no partial side effects. The program
//! counter has already advanced past the instruction when a handler runs;
//! jump and call targets overwrite that pre-incremented value.

#![allow(
    clippy::pedantic,
    clippy::nursery,
    clippy::cast_possible_truncation,
    unknown_lints,
    missing_docs
)]

use crate::fault::FaultCode;
use crate::machine::{Chip8, ShiftSource};
use crate::memory::glyph_address;
use crate::opcode::{Opcode, Operation};
use crate::state::INSTRUCTION_BYTES;

/// Control-flow signal a handler reports back to the cycle loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExecSignal {
    /// The operation completed.
    Retired,
    /// Key-wait found no pressed key and rewound the program counter.
    WaitingForKey,
}

/// Executes one classified operation against the machine state.
pub(crate) fn execute(
    machine: &mut Chip8,
    op: Operation,
    code: Opcode,
) -> Result<ExecSignal, FaultCode> {
    match op {
        Operation::ClearScreen => machine.frame.clear(),
        Operation::Return => {
            let return_addr = machine.regs.pop()?;
            machine.regs.set_pc(return_addr);
        }
        Operation::Jump => machine.regs.set_pc(code.nnn()),
        Operation::Call => {
            let return_addr = machine.regs.pc();
            machine.regs.push(return_addr)?;
            machine.regs.set_pc(code.nnn());
        }
        Operation::SkipIfEqualImm => {
            let taken = machine.regs.v(code.x()) == code.nn();
            skip_if(machine, taken);
        }
        Operation::SkipIfNotEqualImm => {
            let taken = machine.regs.v(code.x()) != code.nn();
            skip_if(machine, taken);
        }
        Operation::SkipIfEqualReg => {
            let taken = machine.regs.v(code.x()) == machine.regs.v(code.y());
            skip_if(machine, taken);
        }
        Operation::SkipIfNotEqualReg => {
            let taken = machine.regs.v(code.x()) != machine.regs.v(code.y());
            skip_if(machine, taken);
        }
        Operation::LoadImm => machine.regs.set_v(code.x(), code.nn()),
        Operation::AddImm => {
            let value = machine.regs.v(code.x()).wrapping_add(code.nn());
            machine.regs.set_v(code.x(), value);
        }
        Operation::Copy => {
            let value = machine.regs.v(code.y());
            machine.regs.set_v(code.x(), value);
        }
        Operation::Or => {
            let value = machine.regs.v(code.x()) | machine.regs.v(code.y());
            machine.regs.set_v(code.x(), value);
        }
        Operation::And => {
            let value = machine.regs.v(code.x()) & machine.regs.v(code.y());
            machine.regs.set_v(code.x(), value);
        }
        Operation::Xor => {
            let value = machine.regs.v(code.x()) ^ machine.regs.v(code.y());
            machine.regs.set_v(code.x(), value);
        }
        Operation::Add => exec_add(machine, code),
        Operation::Sub => exec_sub(machine, code),
        Operation::SubReversed => exec_sub_reversed(machine, code),
        Operation::ShiftRight => exec_shift_right(machine, code),
        Operation::ShiftLeft => exec_shift_left(machine, code),
        Operation::LoadIndex => machine.regs.set_i(code.nnn()),
        Operation::JumpWithOffset => {
            let target = code.nnn().wrapping_add(u16::from(machine.regs.v(0x0)));
            machine.regs.set_pc(target);
        }
        Operation::AddToIndex => {
            let value = machine.regs.i().wrapping_add(u16::from(machine.regs.v(code.x())));
            machine.regs.set_i(value);
        }
        Operation::Random => {
            let value = machine.rng.next_byte() & code.nn();
            machine.regs.set_v(code.x(), value);
        }
        Operation::Draw => exec_draw(machine, code)?,
        Operation::SkipIfKeyPressed => {
            let taken = machine.keypad.is_pressed(machine.regs.v(code.x()));
            skip_if(machine, taken);
        }
        Operation::SkipIfKeyReleased => {
            let taken = !machine.keypad.is_pressed(machine.regs.v(code.x()));
            skip_if(machine, taken);
        }
        Operation::ReadDelayTimer => {
            let value = machine.timers.delay();
            machine.regs.set_v(code.x(), value);
        }
        Operation::WaitForKey => return Ok(exec_wait_for_key(machine, code)),
        Operation::SetDelayTimer => machine.timers.set_delay(machine.regs.v(code.x())),
        Operation::SetSoundTimer => machine.timers.set_sound(machine.regs.v(code.x())),
        Operation::GlyphAddress => {
            let addr = glyph_address(machine.regs.v(code.x()));
            machine.regs.set_i(addr);
        }
        Operation::StoreBcd => exec_store_bcd(machine, code)?,
        Operation::StoreRegisters => exec_store_registers(machine, code)?,
        Operation::LoadRegisters => exec_load_registers(machine, code)?,
    }

    Ok(ExecSignal::Retired)
}

/// Conditional skips advance the program counter one extra instruction.
fn skip_if(machine: &mut Chip8, condition: bool) {
    if condition {
        machine.regs.advance_pc(INSTRUCTION_BYTES);
    }
}

/// `VX += VY`, flag 1 when the 9-bit sum exceeds 255.
fn exec_add(machine: &mut Chip8, code: Opcode) {
    let sum = u16::from(machine.regs.v(code.x())) + u16::from(machine.regs.v(code.y()));
    machine.regs.set_v(code.x(), (sum & 0x00FF) as u8);
    machine.regs.set_flag(u8::from(sum > 0x00FF));
}

/// `VX -= VY`, flag 1 means no borrow occurred.
fn exec_sub(machine: &mut Chip8, code: Opcode) {
    let minuend = machine.regs.v(code.x());
    let subtrahend = machine.regs.v(code.y());
    machine.regs.set_flag(u8::from(minuend > subtrahend));
    machine.regs.set_v(code.x(), minuend.wrapping_sub(subtrahend));
}

/// `VX = VY - VX`, the symmetric no-borrow convention.
fn exec_sub_reversed(machine: &mut Chip8, code: Opcode) {
    let minuend = machine.regs.v(code.y());
    let subtrahend = machine.regs.v(code.x());
    machine.regs.set_flag(u8::from(minuend > subtrahend));
    machine.regs.set_v(code.x(), minuend.wrapping_sub(subtrahend));
}

/// The shift pair honors the configured source register. The default
/// reads and writes `VX` only; the `Vy` variant reproduces interpreters
/// that shift `VY` into `VX`.
fn shift_source_value(machine: &Chip8, code: Opcode) -> u8 {
    match machine.config.shift_source {
        ShiftSource::Vx => machine.regs.v(code.x()),
        ShiftSource::Vy => machine.regs.v(code.y()),
    }
}

fn exec_shift_right(machine: &mut Chip8, code: Opcode) {
    let source = shift_source_value(machine, code);
    machine.regs.set_flag(source & 0x01);
    machine.regs.set_v(code.x(), source >> 1);
}

fn exec_shift_left(machine: &mut Chip8, code: Opcode) {
    let source = shift_source_value(machine, code);
    machine.regs.set_flag(source >> 7);
    machine.regs.set_v(code.x(), source << 1);
}

/// Sprite blit: N bytes from the index register, XORed at
/// `(VX mod 64, VY mod 32)` with per-axis wraparound, collision into the
/// flag register.
fn exec_draw(machine: &mut Chip8, code: Opcode) -> Result<(), FaultCode> {
    let sprite = machine.memory.span(machine.regs.i(), usize::from(code.n()))?;
    let collision =
        machine
            .frame
            .draw_sprite(machine.regs.v(code.x()), machine.regs.v(code.y()), sprite);
    machine.regs.set_flag(u8::from(collision));
    Ok(())
}

/// Key-wait busy-waits by rewinding the program counter so the same
/// instruction re-executes next cycle; it never blocks internally.
fn exec_wait_for_key(machine: &mut Chip8, code: Opcode) -> ExecSignal {
    if let Some(key) = machine.keypad.first_pressed() {
        machine.regs.set_v(code.x(), key);
        ExecSignal::Retired
    } else {
        machine.regs.rewind_pc(INSTRUCTION_BYTES);
        ExecSignal::WaitingForKey
    }
}

/// Decimal digits of `VX` at `I`, `I+1`, `I+2`.
fn exec_store_bcd(machine: &mut Chip8, code: Opcode) -> Result<(), FaultCode> {
    let value = machine.regs.v(code.x());
    let digits = [value / 100, (value / 10) % 10, value % 10];
    machine
        .memory
        .span_mut(machine.regs.i(), digits.len())?
        .copy_from_slice(&digits);
    Ok(())
}

/// Registers `V0..=VX` into memory at the index register, which itself is
/// left unchanged.
fn exec_store_registers(machine: &mut Chip8, code: Opcode) -> Result<(), FaultCode> {
    let block = machine.regs.v_through(code.x());
    machine
        .memory
        .span_mut(machine.regs.i(), block.len())?
        .copy_from_slice(block);
    Ok(())
}

/// Registers `V0..=VX` from memory at the index register, which itself is
/// left unchanged.
fn exec_load_registers(machine: &mut Chip8, code: Opcode) -> Result<(), FaultCode> {
    let count = usize::from(code.x()) + 1;
    let block = machine.memory.span(machine.regs.i(), count)?;
    machine.regs.load_v_through(block);
    Ok(())
}
