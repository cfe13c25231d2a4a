//! Morton (Z-order) bit interleaving for tile indices.

const MAGIC: [u64; 6] = [
    0x5555_5555_5555_5555,
    0x3333_3333_3333_3333,
    0x0F0F_0F0F_0F0F_0F0F,
    0x00FF_00FF_00FF_00FF,
    0x0000_FFFF_0000_FFFF,
    0x0000_0000_FFFF_FFFF,
];

const SHIFT: [u32; 5] = [1, 2, 4, 8, 16];

fn spread(value: u32) -> u64 {
    let mut v = value as u64;
    v = (v | (v << SHIFT[4])) & MAGIC[4];
    v = (v | (v << SHIFT[3])) & MAGIC[3];
    v = (v | (v << SHIFT[2])) & MAGIC[2];
    v = (v | (v << SHIFT[1])) & MAGIC[1];
    (v | (v << SHIFT[0])) & MAGIC[0]
}

/// Interleaves `even` into the even bit positions and `odd` into the odd ones.
pub fn interleave(even: u32, odd: u32) -> u64 {
    spread(even) | (spread(odd) << 1)
}

/// Extracts the even bit positions of `value`.
///
/// Pass `value >> 1` to recover the odd positions.
pub fn deinterleave(value: u64) -> u32 {
    let mut v = value & MAGIC[0];
    v = (v | (v >> SHIFT[0])) & MAGIC[1];
    v = (v | (v >> SHIFT[1])) & MAGIC[2];
    v = (v | (v >> SHIFT[2])) & MAGIC[3];
    v = (v | (v >> SHIFT[3])) & MAGIC[4];
    v = (v | (v >> SHIFT[4])) & MAGIC[5];
    v as u32
}
