//! Host-facing machine type: construction, configuration, and the cycle.

use crate::diag::DiagCounters;
use crate::display::FrameBuffer;
use crate::execute::{execute, ExecSignal};
use crate::fault::{FaultCode, RomError};
use crate::keypad::Keypad;
use crate::memory::AddressSpace;
use crate::opcode::{Opcode, Operation};
use crate::random::{RandomSource, SeededRandom};
use crate::state::{RegisterFile, RunState, INSTRUCTION_BYTES};
use crate::timers::Timers;

/// Source register for the shift pair, the documented point of divergence
/// between historical interpreters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ShiftSource {
    /// Shift `VX` in place (the reference behavior, default).
    #[default]
    Vx,
    /// Shift `VY` into `VX` (the historical variant).
    Vy,
}

/// Immutable configuration for a machine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Shift-instruction source register selection.
    pub shift_source: ShiftSource,
    /// Fixed seed for the default random source; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

/// Host-visible result of one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// An assigned operation executed.
    Executed(Operation),
    /// The fetched word maps to no operation; it was ignored, counted, and
    /// execution continues at the next address.
    UnknownWord(u16),
    /// Key-wait found no pressed key and will re-execute next cycle.
    WaitingForKey,
    /// A fail-fast condition was raised and is now latched.
    Fault(FaultCode),
}

/// One CHIP-8 interpreter instance.
///
/// Each instance owns its memory, registers, framebuffer, keypad, timers,
/// and random source exclusively; independent instances never alias. The
/// only state transition is [`Chip8::cycle`], which runs synchronously to
/// completion.
pub struct Chip8 {
    pub(crate) regs: RegisterFile,
    pub(crate) memory: AddressSpace,
    pub(crate) frame: FrameBuffer,
    pub(crate) keypad: Keypad,
    pub(crate) timers: Timers,
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) config: CoreConfig,
    run_state: RunState,
    diag: DiagCounters,
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8 {
    /// Creates a machine with the default configuration and an
    /// entropy-seeded random source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    /// Creates a machine with an explicit configuration.
    #[must_use]
    #[allow(clippy::option_if_let_else)]
    pub fn with_config(config: CoreConfig) -> Self {
        let rng: Box<dyn RandomSource> = match config.rng_seed {
            Some(seed) => Box::new(SeededRandom::from_seed(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };

        Self {
            regs: RegisterFile::default(),
            memory: AddressSpace::new(),
            frame: FrameBuffer::new(),
            keypad: Keypad::new(),
            timers: Timers::new(),
            rng,
            config,
            run_state: RunState::Running,
            diag: DiagCounters::new(),
        }
    }

    /// Replaces the random source, the injection seam for deterministic
    /// tests and replay fixtures.
    #[must_use]
    pub fn with_random_source(mut self, source: Box<dyn RandomSource>) -> Self {
        self.rng = source;
        self
    }

    /// Copies a ROM image into the program region. A reload replaces the
    /// previous image; registers and timers are not reset implicitly.
    ///
    /// # Errors
    ///
    /// Returns [`RomError::Oversize`] when the image does not fit; memory
    /// is untouched on rejection.
    pub fn load_rom(&mut self, image: &[u8]) -> Result<(), RomError> {
        self.memory.load_rom(image)
    }

    /// Runs exactly one fetch/decode/execute step followed by one timer
    /// decay step, synchronously and completely.
    ///
    /// Unknown words and key-waits still reach the timer step; a fault
    /// aborts the cycle, latches, and is returned again by every later
    /// call until [`Chip8::reset`].
    #[allow(clippy::option_if_let_else)]
    pub fn cycle(&mut self) -> CycleOutcome {
        if let Some(cause) = self.run_state.latched_fault() {
            return CycleOutcome::Fault(cause);
        }

        let pc = self.regs.pc();
        self.diag.record_cycle();

        let word = match self.memory.fetch_word(pc) {
            Ok(word) => word,
            Err(cause) => return self.latch_fault(cause, pc),
        };
        self.regs.advance_pc(INSTRUCTION_BYTES);

        let outcome = match Operation::classify(word) {
            None => {
                self.diag.record_unknown_word(word, pc);
                CycleOutcome::UnknownWord(word)
            }
            Some(op) => match execute(self, op, Opcode::new(word)) {
                Ok(ExecSignal::Retired) => CycleOutcome::Executed(op),
                Ok(ExecSignal::WaitingForKey) => CycleOutcome::WaitingForKey,
                Err(cause) => return self.latch_fault(cause, pc),
            },
        };

        self.timers.tick();
        outcome
    }

    fn latch_fault(&mut self, cause: FaultCode, pc: u16) -> CycleOutcome {
        self.run_state = RunState::FaultLatched(cause);
        self.diag.record_fault(cause, pc);
        CycleOutcome::Fault(cause)
    }

    /// Restores registers, timers, keypad, framebuffer, run state, and
    /// diagnostics to their construction values while preserving the
    /// memory image, glyph table and loaded ROM included.
    pub fn reset(&mut self) {
        self.regs = RegisterFile::default();
        self.frame = FrameBuffer::new();
        self.keypad = Keypad::new();
        self.timers = Timers::new();
        self.run_state = RunState::Running;
        self.diag = DiagCounters::new();
    }

    /// The framebuffer, for the rendering collaborator.
    #[must_use]
    pub const fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// The keypad, read-only.
    #[must_use]
    pub const fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// The keypad, for the input collaborator to write before each cycle.
    pub const fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    /// The timer pair, read-only; hosts sound a buzzer while the sound
    /// timer is non-zero.
    #[must_use]
    pub const fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Mutable timer access for hosts and tests that need to stage timer
    /// state directly.
    pub const fn timers_mut(&mut self) -> &mut Timers {
        &mut self.timers
    }

    /// The register file, read-only.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Mutable register access for hosts and tests that stage scenarios
    /// directly instead of through a program.
    pub const fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.regs
    }

    /// The address space, read-only.
    #[must_use]
    pub const fn memory(&self) -> &AddressSpace {
        &self.memory
    }

    /// Diagnostics counters.
    #[must_use]
    pub const fn diag(&self) -> &DiagCounters {
        &self.diag
    }

    /// Current run state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> CoreConfig {
        self.config
    }
}
