//! Behavior-contract scenarios driven end to end through the cycle loop.

#![allow(
    clippy::pedantic,
    clippy::nursery,
    clippy::cast_possible_truncation,
    clippy::too_many_lines
)]

use chip8_core::{
    glyph_address, Chip8, CoreConfig, CycleOutcome, FaultCode, Operation, RomError,
    PROGRAM_START, ROM_CAPACITY_BYTES,
};
use proptest::prelude::*;
use rand as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn machine_with_rom(image: &[u8]) -> Chip8 {
    let mut machine = Chip8::with_config(CoreConfig {
        rng_seed: Some(0),
        ..CoreConfig::default()
    });
    machine.load_rom(image).expect("test rom fits");
    machine
}

fn rom(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

fn run(machine: &mut Chip8, cycles: usize) {
    for _ in 0..cycles {
        machine.cycle();
    }
}

#[rstest]
#[case(0xFF, 0x01, 0x00, 1)]
#[case(0x01, 0x01, 0x02, 0)]
#[case(0x80, 0x80, 0x00, 1)]
fn add_reports_the_9bit_carry_in_vf(
    #[case] vx: u8,
    #[case] vy: u8,
    #[case] expected: u8,
    #[case] flag: u8,
) {
    let mut machine = machine_with_rom(&rom(&[
        0x6000 | u16::from(vx),
        0x6100 | u16::from(vy),
        0x8014,
    ]));
    run(&mut machine, 3);
    assert_eq!(machine.registers().v(0x0), expected);
    assert_eq!(machine.registers().flag(), flag);
}

#[rstest]
#[case(0x05, 0x03, 0x02, 1)]
#[case(0x03, 0x05, 0xFE, 0)]
#[case(0x07, 0x07, 0x00, 0)]
fn sub_reports_no_borrow_in_vf(
    #[case] vx: u8,
    #[case] vy: u8,
    #[case] expected: u8,
    #[case] flag: u8,
) {
    let mut machine = machine_with_rom(&rom(&[
        0x6000 | u16::from(vx),
        0x6100 | u16::from(vy),
        0x8015,
    ]));
    run(&mut machine, 3);
    assert_eq!(machine.registers().v(0x0), expected);
    assert_eq!(machine.registers().flag(), flag);
}

#[rstest]
#[case(0x03, 0x05, 0x02, 1)]
#[case(0x05, 0x03, 0xFE, 0)]
fn reverse_sub_uses_the_symmetric_convention(
    #[case] vx: u8,
    #[case] vy: u8,
    #[case] expected: u8,
    #[case] flag: u8,
) {
    let mut machine = machine_with_rom(&rom(&[
        0x6000 | u16::from(vx),
        0x6100 | u16::from(vy),
        0x8017,
    ]));
    run(&mut machine, 3);
    assert_eq!(machine.registers().v(0x0), expected);
    assert_eq!(machine.registers().flag(), flag);
}

#[rstest]
#[case(0x8011, 0b1010_1010 | 0b0000_1111)]
#[case(0x8012, 0b1010_1010 & 0b0000_1111)]
#[case(0x8013, 0b1010_1010 ^ 0b0000_1111)]
fn bitwise_ops_have_no_flag_side_effects(#[case] word: u16, #[case] expected: u8) {
    let mut machine = machine_with_rom(&rom(&[0x60AA, 0x610F, 0x6F01, word]));
    run(&mut machine, 4);
    assert_eq!(machine.registers().v(0x0), expected);
    // VF was staged to 1 and must survive untouched.
    assert_eq!(machine.registers().flag(), 1);
}

#[test]
fn draw_wraps_columns_and_reports_collision_on_redraw() {
    // V0=60, V1=0, I -> 0xFF sprite byte, then the same draw twice.
    let image = rom(&[0x603C, 0x6100, 0xA20A, 0xD011, 0xD011, 0xFF00]);
    let mut machine = machine_with_rom(&image);

    run(&mut machine, 4);
    assert_eq!(machine.frame().lit_pixels(), 8);
    for x in [60, 61, 62, 63, 0, 1, 2, 3] {
        assert!(machine.frame().pixel(x, 0), "column {x} should be lit");
    }
    assert_eq!(machine.registers().flag(), 0);

    machine.cycle();
    assert_eq!(machine.frame().lit_pixels(), 0);
    assert_eq!(machine.registers().flag(), 1);
}

#[test]
fn bcd_writes_three_decimal_digits_at_the_index() {
    let mut machine = machine_with_rom(&rom(&[0x60FF, 0xA300, 0xF033]));
    run(&mut machine, 3);
    assert_eq!(machine.memory().byte(0x300), Some(2));
    assert_eq!(machine.memory().byte(0x301), Some(5));
    assert_eq!(machine.memory().byte(0x302), Some(5));
    assert_eq!(machine.registers().i(), 0x300);
}

proptest! {
    #[test]
    fn block_transfer_round_trips_for_every_register_count(
        last in 0_u8..16,
        values in proptest::array::uniform16(any::<u8>()),
    ) {
        let store = 0xF055 | (u16::from(last) << 8);
        let load = 0xF065 | (u16::from(last) << 8);

        let mut machine = machine_with_rom(&rom(&[store]));
        for (index, value) in values.iter().enumerate() {
            machine.registers_mut().set_v(index as u8, *value);
        }
        machine.registers_mut().set_i(0x300);
        prop_assert_eq!(machine.cycle(), CycleOutcome::Executed(Operation::StoreRegisters));
        prop_assert_eq!(machine.registers().i(), 0x300);

        // Reset clears every register while preserving memory, then the
        // block load restores exactly V0..=Vlast.
        machine.reset();
        machine.load_rom(&rom(&[load])).expect("test rom fits");
        machine.registers_mut().set_i(0x300);
        prop_assert_eq!(machine.cycle(), CycleOutcome::Executed(Operation::LoadRegisters));
        prop_assert_eq!(machine.registers().i(), 0x300);

        for index in 0..16_u8 {
            let expected = if index <= last { values[usize::from(index)] } else { 0 };
            prop_assert_eq!(machine.registers().v(index), expected);
        }
    }
}

#[test]
fn clear_screen_turns_all_2048_cells_off() {
    // Draw the glyph for 7 at the origin, then CLS.
    let image = rom(&[0x6000, 0x6100, 0x6207, 0xF229, 0xD015, 0x00E0]);
    let mut machine = machine_with_rom(&image);

    run(&mut machine, 5);
    assert!(machine.frame().lit_pixels() > 0);

    machine.cycle();
    assert_eq!(machine.frame().lit_pixels(), 0);
}

#[test]
fn key_wait_busy_waits_until_a_key_arrives() {
    let mut machine = machine_with_rom(&rom(&[0xF50A]));

    for _ in 0..3 {
        assert_eq!(machine.cycle(), CycleOutcome::WaitingForKey);
        assert_eq!(machine.registers().pc(), PROGRAM_START);
        assert_eq!(machine.registers().v(0x5), 0);
    }

    machine.keypad_mut().press(0x5);
    assert_eq!(machine.cycle(), CycleOutcome::Executed(Operation::WaitForKey));
    assert_eq!(machine.registers().v(0x5), 0x5);
    assert_eq!(machine.registers().pc(), PROGRAM_START + 2);
}

#[test]
fn key_wait_captures_the_lowest_pressed_index() {
    let mut machine = machine_with_rom(&rom(&[0xF00A]));
    machine.keypad_mut().press(0xC);
    machine.keypad_mut().press(0x5);
    machine.cycle();
    assert_eq!(machine.registers().v(0x0), 0x5);
}

#[test]
fn key_wait_cycles_still_tick_timers() {
    let mut machine = machine_with_rom(&rom(&[0xF00A]));
    machine.timers_mut().set_delay(4);
    run(&mut machine, 2);
    assert_eq!(machine.timers().delay(), 2);
}

#[test]
fn delay_timer_decays_once_per_cycle_and_floors_at_zero() {
    // Jump-to-self keeps the program counter parked while timers decay.
    let mut machine = machine_with_rom(&rom(&[0x1000 | PROGRAM_START]));
    machine.timers_mut().set_delay(10);

    for remaining in (0..10_u8).rev() {
        machine.cycle();
        assert_eq!(machine.timers().delay(), remaining);
    }

    machine.cycle();
    assert_eq!(machine.timers().delay(), 0);
}

#[test]
fn sound_timer_is_set_by_its_opcode_and_decays() {
    let image = rom(&[0x6105, 0xF118, 0x1000 | (PROGRAM_START + 4)]);
    let mut machine = machine_with_rom(&image);

    run(&mut machine, 2);
    // The writing cycle itself ends with a decay step.
    assert_eq!(machine.timers().sound(), 4);
    run(&mut machine, 4);
    assert_eq!(machine.timers().sound(), 0);
}

#[test]
fn delay_timer_reads_the_pre_decay_value_into_vx() {
    let mut machine = machine_with_rom(&rom(&[0xF607]));
    machine.timers_mut().set_delay(7);
    machine.cycle();
    assert_eq!(machine.registers().v(0x6), 7);
    assert_eq!(machine.timers().delay(), 6);
}

#[rstest]
#[case(0x3407, 0x07, 0x00, true)]
#[case(0x3407, 0x08, 0x00, false)]
#[case(0x4407, 0x07, 0x00, false)]
#[case(0x4407, 0x08, 0x00, true)]
#[case(0x5450, 0x09, 0x09, true)]
#[case(0x5450, 0x09, 0x0A, false)]
#[case(0x9450, 0x09, 0x0A, true)]
#[case(0x9450, 0x09, 0x09, false)]
fn conditional_skips_advance_one_extra_instruction(
    #[case] word: u16,
    #[case] v4: u8,
    #[case] v5: u8,
    #[case] skips: bool,
) {
    let mut machine = machine_with_rom(&rom(&[word]));
    machine.registers_mut().set_v(0x4, v4);
    machine.registers_mut().set_v(0x5, v5);
    machine.cycle();

    let expected = PROGRAM_START + if skips { 4 } else { 2 };
    assert_eq!(machine.registers().pc(), expected);
}

#[test]
fn key_test_pair_skips_on_pressed_and_released_respectively() {
    // SKP skips exactly when the key is pressed.
    let mut pressed = machine_with_rom(&rom(&[0xE09E]));
    pressed.registers_mut().set_v(0x0, 0x3);
    pressed.keypad_mut().press(0x3);
    pressed.cycle();
    assert_eq!(pressed.registers().pc(), PROGRAM_START + 4);

    let mut released = machine_with_rom(&rom(&[0xE09E]));
    released.registers_mut().set_v(0x0, 0x3);
    released.cycle();
    assert_eq!(released.registers().pc(), PROGRAM_START + 2);

    // SKNP is the complement.
    let mut not_pressed = machine_with_rom(&rom(&[0xE0A1]));
    not_pressed.registers_mut().set_v(0x0, 0x3);
    not_pressed.cycle();
    assert_eq!(not_pressed.registers().pc(), PROGRAM_START + 4);

    let mut held = machine_with_rom(&rom(&[0xE0A1]));
    held.registers_mut().set_v(0x0, 0x3);
    held.keypad_mut().press(0x3);
    held.cycle();
    assert_eq!(held.registers().pc(), PROGRAM_START + 2);
}

#[test]
fn call_pushes_the_advanced_pc_and_return_pops_it() {
    let mut image = rom(&[0x2208]);
    image.resize(8, 0);
    image.extend_from_slice(&rom(&[0x00EE]));
    let mut machine = machine_with_rom(&image);

    machine.cycle();
    assert_eq!(machine.registers().pc(), 0x208);
    assert_eq!(machine.registers().stack_depth(), 1);

    machine.cycle();
    assert_eq!(machine.registers().pc(), PROGRAM_START + 2);
    assert_eq!(machine.registers().stack_depth(), 0);
}

#[test]
fn jump_with_offset_adds_v0_to_the_address() {
    let mut machine = machine_with_rom(&rom(&[0x6004, 0xB200]));
    run(&mut machine, 2);
    assert_eq!(machine.registers().pc(), 0x204);
}

#[test]
fn seventeenth_nested_call_faults_fast() {
    // CALL 0x200 re-enters itself, pushing one frame per cycle.
    let mut machine = machine_with_rom(&rom(&[0x2000 | PROGRAM_START]));

    for _ in 0..16 {
        assert_eq!(machine.cycle(), CycleOutcome::Executed(Operation::Call));
    }
    assert_eq!(machine.registers().stack_depth(), 16);

    assert_eq!(machine.cycle(), CycleOutcome::Fault(FaultCode::StackOverflow));
    assert_eq!(machine.registers().stack_depth(), 16);
    assert_eq!(machine.diag().stack_fault_count, 1);
}

#[test]
fn sprite_read_past_memory_faults_without_partial_effects() {
    let mut machine = machine_with_rom(&rom(&[0xAFFF, 0xD012]));
    machine.registers_mut().set_flag(1);

    machine.cycle();
    assert_eq!(
        machine.cycle(),
        CycleOutcome::Fault(FaultCode::MemoryReadOutOfRange)
    );
    // The flag is not reset and no cell was toggled by the aborted draw.
    assert_eq!(machine.registers().flag(), 1);
    assert_eq!(machine.frame().lit_pixels(), 0);
    assert_eq!(machine.diag().memory_fault_count, 1);
}

#[test]
fn bcd_write_past_memory_faults_without_partial_effects() {
    let mut image = rom(&[0x60FF, 0xAFFE, 0xF033]);
    image.resize(ROM_CAPACITY_BYTES, 0);
    image[ROM_CAPACITY_BYTES - 2] = 0xAB;
    image[ROM_CAPACITY_BYTES - 1] = 0xCD;
    let mut machine = machine_with_rom(&image);

    run(&mut machine, 2);
    assert_eq!(
        machine.cycle(),
        CycleOutcome::Fault(FaultCode::MemoryWriteOutOfRange)
    );
    assert_eq!(machine.memory().byte(0xFFE), Some(0xAB));
    assert_eq!(machine.memory().byte(0xFFF), Some(0xCD));
}

#[test]
fn glyph_address_uses_the_low_nibble_of_vx() {
    let mut machine = machine_with_rom(&rom(&[0x600A, 0xF029]));
    run(&mut machine, 2);
    assert_eq!(machine.registers().i(), glyph_address(0xA));

    let mut masked = machine_with_rom(&rom(&[0x60BA, 0xF029]));
    run(&mut masked, 2);
    assert_eq!(masked.registers().i(), glyph_address(0xA));
}

#[test]
fn add_to_index_has_no_flag_side_effect() {
    let mut machine = machine_with_rom(&rom(&[0x6310, 0xA100, 0xF31E]));
    machine.registers_mut().set_flag(1);
    run(&mut machine, 3);
    assert_eq!(machine.registers().i(), 0x110);
    assert_eq!(machine.registers().flag(), 1);
}

#[test]
fn oversize_rom_is_reported_and_rejected() {
    let mut machine = Chip8::new();
    let image = vec![0; ROM_CAPACITY_BYTES + 1];
    assert_eq!(
        machine.load_rom(&image),
        Err(RomError::Oversize {
            len: ROM_CAPACITY_BYTES + 1,
            capacity: ROM_CAPACITY_BYTES,
        })
    );
}
