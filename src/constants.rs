use crate::ops::common::Buf12;

// Sign mask for the flags field. A value of zero in this bit indicates a
// positive Decimal value, and a value of one in this bit indicates a
// negative Decimal value.
pub const SIGN_MASK: u32 = 0x8000_0000;
pub const UNSIGN_MASK: u32 = 0x7FFF_FFFF;

// Scale mask for the flags field. This byte in the flags field contains
// the power of 10 to divide the Decimal value by. The scale byte must
// contain a value between 0 and 28 inclusive.
pub const SCALE_MASK: u32 = 0x00FF_0000;
pub const U32_MASK: u64 = u32::MAX as _;

// Number of bits scale is shifted by.
pub const SCALE_SHIFT: u32 = 16;
// Number of bits sign is shifted by.
pub const SIGN_SHIFT: u32 = 31;

// Everything that is neither the sign nor the scale must be zero.
pub const UNUSED_BITS_MASK: u32 = !(SIGN_MASK | SCALE_MASK);

// The maximum string buffer size used for serialization purposes. 31 is optimal, however we align
// to the byte boundary for simplicity.
pub const MAX_STR_BUFFER_SIZE: usize = 32;

// The maximum supported precision
pub const MAX_PRECISION: u8 = 28;
pub const MAX_PRECISION_U32: u32 = MAX_PRECISION as _;
pub const MAX_PRECISION_I32: i32 = MAX_PRECISION as _;

// 2^96 - 1
pub const MAX_I128_REPR: i128 = 0x0000_0000_FFFF_FFFF_FFFF_FFFF_FFFF_FFFF;

// The maximum power of 10 that a 32 bit integer can store
pub const MAX_I32_SCALE: i32 = 9;
// The maximum power of 10 that a 64 bit integer can store
pub const MAX_I64_SCALE: u32 = 19;

// Scale of the 64-bit currency interchange format
pub const CURRENCY_SCALE: u32 = 4;

pub const TEN_TO_POWER_NINE: u32 = 1_000_000_000;

// Fast access for 10^n where n is 0-9
pub const POWERS_10: [u32; 10] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

// Fast access for 10^n where n is 0-19
pub const POWERS_10_U64: [u64; 20] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
    10_000_000_000_000_000_000,
];

// The largest 96-bit values that can be multiplied by 10^1..=10^9 without leaving 96 bits,
// i.e. floor(2^96 / 10^n).
pub const POWER_OVERFLOW_VALUES: [Buf12; 9] = [
    Buf12::from_words(2576980377, 2576980377, 429496729),
    Buf12::from_words(687194767, 4123168604, 42949672),
    Buf12::from_words(2645699854, 1271310319, 4294967),
    Buf12::from_words(694066715, 3133608139, 429496),
    Buf12::from_words(2216890319, 2890341191, 42949),
    Buf12::from_words(2369172679, 4154504685, 4294),
    Buf12::from_words(4102387834, 2133437386, 429),
    Buf12::from_words(410238783, 4078814305, 42),
    Buf12::from_words(3047500985, 1266874889, 4),
];

// Upper word of floor(2^96 / 10)
pub const OVERFLOW_MAX_1_HI: u32 = 429496729;

// Exponent biases once the implicit leading one is accounted for
pub const DOUBLE_BIAS: i32 = 1022;
pub const SINGLE_BIAS: i32 = 126;

pub const TWO_POW_64: f64 = 18446744073709551616.0;

// 10^0 through 10^80 as exactly as f64 can hold them
pub const DOUBLE_POWERS_10: [f64; 81] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16, 1e17, 1e18, 1e19,
    1e20, 1e21, 1e22, 1e23, 1e24, 1e25, 1e26, 1e27, 1e28, 1e29, 1e30, 1e31, 1e32, 1e33, 1e34, 1e35, 1e36, 1e37,
    1e38, 1e39, 1e40, 1e41, 1e42, 1e43, 1e44, 1e45, 1e46, 1e47, 1e48, 1e49, 1e50, 1e51, 1e52, 1e53, 1e54, 1e55,
    1e56, 1e57, 1e58, 1e59, 1e60, 1e61, 1e62, 1e63, 1e64, 1e65, 1e66, 1e67, 1e68, 1e69, 1e70, 1e71, 1e72, 1e73,
    1e74, 1e75, 1e76, 1e77, 1e78, 1e79, 1e80,
];
