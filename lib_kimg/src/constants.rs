/// Largest palette the hardware can show with one card per color bit.
pub const MAX_PALETTE_SIZE: usize = 16;

/// Bytes per display row on a card (320 pixels).
pub const MAX_COL_BYTES: usize = 40;
pub const MAX_ROWS: usize = 200;
pub const MAX_IMAGE_SIZE: usize = MAX_COL_BYTES * 8 * MAX_ROWS;

pub const MAX_CARDS: usize = 4;
pub const CARD_MEMORY_SIZE: usize = 8192;

pub const MIN_BASE_ADDRESS: u16 = 0x2000;
pub const MAX_BASE_ADDRESS: u16 = 0xA000;
pub const DEFAULT_BASE_ADDRESS: u16 = MIN_BASE_ADDRESS;

pub const IHEX_BYTES_PER_RECORD: usize = 32;
pub const PAP_BYTES_PER_RECORD: usize = 24;
pub const ASM_BYTES_PER_LINE: usize = 16;

pub const PALETTE_SIGNATURE: &str = "GIMP Palette";
pub const HEADER_DATA_MARKER: &str = "static unsigned char header_data[] = {";
pub const HEADER_DATA_END: &str = "};";
