//! Fixed-width binary digit strings.

/// Default width: one digit per DIP switch of a group bank
pub const DEFAULT_WIDTH: usize = 5;

/// Render the low `width` bits of `value`, most significant first
///
/// Bits above `width` are dropped.
pub fn to_binary_digits(value: u32, width: usize) -> String {
    (0..width)
        .rev()
        .map(|bit| {
            if bit < 32 && value & (1 << bit) != 0 {
                '1'
            } else {
                '0'
            }
        })
        .collect()
}
