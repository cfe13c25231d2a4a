/// Maximum tile zoom level. 2^26 tiles per axis interleave into 52 bits.
pub const MAX_ZOOM: i32 = 26;

/// Bit offset of the zoom field in a tile hash.
pub const ZOOM_SHIFT: u32 = 52;

/// Mask for the interleaved x/y bits of a tile hash.
pub const TILE_MASK: u64 = (1 << ZOOM_SHIFT) - 1;

/// Open Location Code alphabet with a leading '0' so zero padding survives packing.
pub const PLUSCODE_ALPHABET: &[u8; 21] = b"023456789CFGHJMPQRVWX";

/// Radix of a packed plus code hash
pub const PLUSCODE_RADIX: u64 = PLUSCODE_ALPHABET.len() as u64;

/// Longest plus code (without separator) we pack. 21^14 is the largest power that fits an i64.
pub const MAX_CODE_LENGTH: i32 = 14;

/// Shortest plus code we accept as a precision.
pub const MIN_CODE_LENGTH: i32 = 4;

/// Code length from which odd lengths become valid.
pub const CODE_PRECISION_NORMAL: i32 = 8;

/// Plus code separator character.
pub const SEPARATOR: char = '+';

/// Number of digits before the separator.
pub const SEPARATOR_POSITION: usize = 8;

/// Padding character for codes shorter than the separator position.
pub const PADDING_CHAR: char = '0';
