//! Instruction disassembly for traces and diagnostics.
//!
//! Renders assigned instruction words in the conventional assembly format.
//! Unassigned words render as `None` so callers can print a raw-word
//! fallback, mirroring how dispatch treats them.

use crate::opcode::{Opcode, Operation};

/// Disassembles one instruction word into `MNEMONIC operands` form.
///
/// Returns `None` for words the dispatch tables do not assign.
#[must_use]
pub fn disassemble(word: u16) -> Option<String> {
    let op = Operation::classify(word)?;
    let code = Opcode::new(word);
    let mnemonic = op.mnemonic();
    let operands = operands(op, code);

    if operands.is_empty() {
        Some(mnemonic.to_owned())
    } else {
        Some(format!("{mnemonic} {operands}"))
    }
}

fn operands(op: Operation, code: Opcode) -> String {
    let x = code.x();
    let y = code.y();
    match op {
        Operation::ClearScreen | Operation::Return => String::new(),
        Operation::Jump | Operation::Call => format!("{:#05X}", code.nnn()),
        Operation::JumpWithOffset => format!("V0, {:#05X}", code.nnn()),
        Operation::SkipIfEqualImm
        | Operation::SkipIfNotEqualImm
        | Operation::LoadImm
        | Operation::AddImm
        | Operation::Random => format!("V{x:X}, {:#04X}", code.nn()),
        Operation::SkipIfEqualReg
        | Operation::SkipIfNotEqualReg
        | Operation::Copy
        | Operation::Or
        | Operation::And
        | Operation::Xor
        | Operation::Add
        | Operation::Sub
        | Operation::SubReversed => format!("V{x:X}, V{y:X}"),
        Operation::ShiftRight
        | Operation::ShiftLeft
        | Operation::SkipIfKeyPressed
        | Operation::SkipIfKeyReleased => format!("V{x:X}"),
        Operation::LoadIndex => format!("I, {:#05X}", code.nnn()),
        Operation::AddToIndex => format!("I, V{x:X}"),
        Operation::Draw => format!("V{x:X}, V{y:X}, {}", code.n()),
        Operation::ReadDelayTimer => format!("V{x:X}, DT"),
        Operation::WaitForKey => format!("V{x:X}, K"),
        Operation::SetDelayTimer => format!("DT, V{x:X}"),
        Operation::SetSoundTimer => format!("ST, V{x:X}"),
        Operation::GlyphAddress => format!("F, V{x:X}"),
        Operation::StoreBcd => format!("B, V{x:X}"),
        Operation::StoreRegisters => format!("[I], V{x:X}"),
        Operation::LoadRegisters => format!("V{x:X}, [I]"),
    }
}
