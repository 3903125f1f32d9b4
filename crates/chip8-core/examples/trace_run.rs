//! Headless trace demo: runs an embedded program and prints a disassembled
//! instruction trace followed by the framebuffer and diagnostics.

use chip8_core::{disassemble, Chip8, CoreConfig, CycleOutcome, FRAME_HEIGHT, FRAME_WIDTH};
use proptest as _;
use rand as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

/// Draws the glyphs for `7`, `4`, and `8` side by side, then parks in a
/// jump-to-self loop.
const PROGRAM: &[u16] = &[
    0x00E0, // CLS
    0x6102, // LD V1, 2   (x)
    0x6205, // LD V2, 5   (y)
    0x6307, // LD V3, 7
    0xF329, // LD F, V3
    0xD125, // DRW V1, V2, 5
    0x7106, // ADD V1, 6
    0x6304, // LD V3, 4
    0xF329, // LD F, V3
    0xD125, // DRW V1, V2, 5
    0x7106, // ADD V1, 6
    0x6308, // LD V3, 8
    0xF329, // LD F, V3
    0xD125, // DRW V1, V2, 5
    0x121C, // JP 0x21C (self)
];

fn rom(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

fn render(machine: &Chip8) -> String {
    let mut out = String::new();
    for y in 0..FRAME_HEIGHT {
        for x in 0..FRAME_WIDTH {
            out.push(if machine.frame().pixel(x, y) { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}

fn main() {
    let mut machine = Chip8::with_config(CoreConfig {
        rng_seed: Some(0),
        ..CoreConfig::default()
    });
    machine
        .load_rom(&rom(PROGRAM))
        .expect("embedded program fits the program region");

    for _ in 0..PROGRAM.len() {
        let pc = machine.registers().pc();
        let word = machine
            .memory()
            .fetch_word(pc)
            .expect("trace program stays inside memory");

        match machine.cycle() {
            CycleOutcome::Executed(_) => {
                let line = disassemble(word).expect("program words are assigned");
                println!("{pc:#05X}  {word:04X}  {line}");
            }
            CycleOutcome::UnknownWord(raw) => {
                println!("{pc:#05X}  {raw:04X}  .word {raw:#06X}");
            }
            CycleOutcome::WaitingForKey => println!("{pc:#05X}  {word:04X}  ; waiting for key"),
            CycleOutcome::Fault(cause) => {
                println!("{pc:#05X}  {word:04X}  ; fault: {cause}");
                break;
            }
        }
    }

    println!();
    print!("{}", render(&machine));
    println!();

    let diag = machine.diag();
    println!(
        "cycles={} lit={} unknown={}",
        diag.cycle_count,
        machine.frame().lit_pixels(),
        diag.unknown_word_count
    );
}
