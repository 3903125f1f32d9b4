//! Sixteen-key pressed/released vector written by the host input layer.

/// Number of keys on the hex keypad (`0x0..=0xF`).
pub const KEY_COUNT: usize = 16;

/// Pressed/released state for the hex keypad.
///
/// The host writes this before each cycle; the core only reads it, through
/// the key-test and key-wait operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Keypad {
    pressed: [bool; KEY_COUNT],
}

impl Keypad {
    /// Creates a keypad with every key released.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pressed: [false; KEY_COUNT],
        }
    }

    /// Sets the state of one key. Key indices are 4-bit; the high nibble
    /// is ignored.
    pub const fn set_key(&mut self, key: u8, pressed: bool) {
        self.pressed[(key & 0x0F) as usize] = pressed;
    }

    /// Marks a key pressed.
    pub const fn press(&mut self, key: u8) {
        self.set_key(key, true);
    }

    /// Marks a key released.
    pub const fn release(&mut self, key: u8) {
        self.set_key(key, false);
    }

    /// Releases every key.
    pub const fn release_all(&mut self) {
        self.pressed = [false; KEY_COUNT];
    }

    /// Returns `true` when the key is currently pressed.
    #[must_use]
    pub const fn is_pressed(&self, key: u8) -> bool {
        self.pressed[(key & 0x0F) as usize]
    }

    /// Scans keys `0x0..=0xF` in ascending order and returns the first
    /// pressed index, the order the key-wait operation requires.
    #[must_use]
    pub fn first_pressed(&self) -> Option<u8> {
        (0..u8::try_from(KEY_COUNT).unwrap_or(16)).find(|&key| self.is_pressed(key))
    }
}
