/// Ceiling of the base-2 logarithm: the smallest `k` such that `2^k >= n`.
///
/// Used for both the total address width (from the depth) and the bank selector
/// width (from the write port count), so that both sides of every address split
/// agree on where the selector bits start.
pub fn log2c(n: u32) -> u32 {
    assert!(n > 0, "log2c is undefined for zero");
    u32::BITS - (n - 1).leading_zeros()
}
