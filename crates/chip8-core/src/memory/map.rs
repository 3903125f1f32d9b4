//! Fixed memory-region map and decoding helpers.

/// Inclusive start address of the interpreter-reserved region.
pub const INTERPRETER_START: u16 = 0x000;
/// Inclusive end address of the interpreter-reserved region.
pub const INTERPRETER_END: u16 = 0x04F;
/// Inclusive start address of the built-in glyph table.
pub const GLYPHS_START: u16 = 0x050;
/// Inclusive end address of the built-in glyph table.
pub const GLYPHS_END: u16 = 0x09F;
/// Inclusive start address of the reserved region above the glyph table.
pub const RESERVED_START: u16 = 0x0A0;
/// Inclusive end address of the reserved region above the glyph table.
pub const RESERVED_END: u16 = 0x1FF;
/// Inclusive start address of the program region; execution begins here.
pub const PROGRAM_START: u16 = 0x200;
/// Inclusive end address of the program region.
pub const PROGRAM_END: u16 = 0xFFF;

/// Size in bytes of the flat address space.
pub const MEMORY_BYTES: usize = 4096;
/// Maximum ROM image size accepted by a load.
pub const ROM_CAPACITY_BYTES: usize = MEMORY_BYTES - PROGRAM_START as usize;
/// Height in bytes of one built-in glyph sprite.
pub const GLYPH_HEIGHT: u16 = 5;

/// Region classification for interpreter addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryRegion {
    /// Interpreter-reserved region (`0x000..=0x04F`).
    Interpreter,
    /// Built-in glyph table (`0x050..=0x09F`).
    Glyphs,
    /// Reserved region between glyphs and the program (`0x0A0..=0x1FF`).
    Reserved,
    /// Program region (`0x200..=0xFFF`).
    Program,
}

/// Canonical fixed-region descriptor for the memory map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionDescriptor {
    /// Region classification.
    pub region: MemoryRegion,
    /// Inclusive start address.
    pub start: u16,
    /// Inclusive end address.
    pub end: u16,
}

impl MemoryRegion {
    /// Returns the inclusive bounds for this region.
    #[must_use]
    pub const fn bounds(self) -> (u16, u16) {
        match self {
            Self::Interpreter => (INTERPRETER_START, INTERPRETER_END),
            Self::Glyphs => (GLYPHS_START, GLYPHS_END),
            Self::Reserved => (RESERVED_START, RESERVED_END),
            Self::Program => (PROGRAM_START, PROGRAM_END),
        }
    }

    /// Returns `true` when `addr` belongs to this region.
    #[must_use]
    pub const fn contains(self, addr: u16) -> bool {
        let (start, end) = self.bounds();
        addr >= start && addr <= end
    }

    /// Returns the canonical descriptor for this region.
    #[must_use]
    pub const fn descriptor(self) -> RegionDescriptor {
        let (start, end) = self.bounds();
        RegionDescriptor {
            region: self,
            start,
            end,
        }
    }
}

/// Canonical fixed region layout in ascending address order.
pub const FIXED_MEMORY_REGIONS: [RegionDescriptor; 4] = [
    MemoryRegion::Interpreter.descriptor(),
    MemoryRegion::Glyphs.descriptor(),
    MemoryRegion::Reserved.descriptor(),
    MemoryRegion::Program.descriptor(),
];

const _: () = assert_fixed_region_layout();

const fn assert_fixed_region_layout() {
    let mut index = 0;
    while index < FIXED_MEMORY_REGIONS.len() {
        let descriptor = FIXED_MEMORY_REGIONS[index];
        assert!(
            descriptor.start <= descriptor.end,
            "region start cannot be greater than end"
        );

        if index > 0 {
            let previous = FIXED_MEMORY_REGIONS[index - 1];
            assert!(
                previous.end + 1 == descriptor.start,
                "fixed regions must be contiguous"
            );
        }

        index += 1;
    }

    assert!(
        FIXED_MEMORY_REGIONS[0].start == 0x000
            && FIXED_MEMORY_REGIONS[3].end as usize == MEMORY_BYTES - 1,
        "fixed regions must cover the full address space"
    );
}

/// Decodes an interpreter address into its fixed memory region.
///
/// `None` means the address lies outside the 4096-byte space.
#[must_use]
pub const fn decode_memory_region(addr: u16) -> Option<MemoryRegion> {
    match addr {
        INTERPRETER_START..=INTERPRETER_END => Some(MemoryRegion::Interpreter),
        GLYPHS_START..=GLYPHS_END => Some(MemoryRegion::Glyphs),
        RESERVED_START..=RESERVED_END => Some(MemoryRegion::Reserved),
        PROGRAM_START..=PROGRAM_END => Some(MemoryRegion::Program),
        _ => None,
    }
}

/// Returns the glyph-table address of the 5-byte sprite for a hex digit.
///
/// Only the low nibble of `digit` participates, so the result always lands
/// inside the glyph region.
#[must_use]
pub const fn glyph_address(digit: u8) -> u16 {
    GLYPHS_START + GLYPH_HEIGHT * (digit & 0x0F) as u16
}
