//! Fixed Huffman table for NEF lossless delta lengths.

/// Largest magnitude class the table can encode.
pub const MAX_MAGNITUDE_CLASS: u32 = 14;

/// A prefix code, right-aligned in `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffCode {
    pub length: u32,
    pub value: u32,
}

const fn code(length: u32, value: u32) -> HuffCode {
    HuffCode { length, value }
}

/// Indexed by magnitude class. Shorter codes go to the classes that
/// natural images produce most often (around 7 bits of delta).
static CODE_TABLE: [HuffCode; MAX_MAGNITUDE_CLASS as usize + 1] = [
    code(6, 0x3e),
    code(7, 0x7e),
    code(6, 0x3d),
    code(5, 0x1c),
    code(4, 0x0c),
    code(3, 0x04),
    code(3, 0x02),
    code(2, 0x00),
    code(3, 0x03),
    code(3, 0x05),
    code(4, 0x0d),
    code(5, 0x1d),
    code(6, 0x3c),
    code(8, 0xfe),
    code(8, 0xff),
];

/// Returns the code for `magnitude_class`, or `None` past class 14.
#[inline]
pub fn lookup(magnitude_class: u32) -> Option<HuffCode> {
    CODE_TABLE.get(magnitude_class as usize).copied()
}
