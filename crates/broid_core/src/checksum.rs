// checksum.rs: Fletcher-style byte reduction used for string fields

/// Reduce a string to a single byte.
///
/// Weak and order-sensitive: two running sums modulo 15 packed into the high
/// and low nibble. Collisions are expected. The empty string yields 0.
pub fn fletcher8(val: &str) -> u8 {
    let mut s1: u32 = 0;
    let mut s2: u32 = 0;
    for &b in val.as_bytes() {
        s1 = s1.wrapping_add(b as u32);
        s2 = s2.wrapping_add(s1);
    }
    (((s2 % 15) << 4) | (s1 % 15)) as u8
}
