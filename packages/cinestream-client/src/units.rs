//! Fixed-point amount formatting.

/// Render `value` scaled down by `10^decimals`.
///
/// Trailing fractional zeros are dropped but one digit is always kept, so
/// `10 * 10^18` with 18 decimals renders as `10.0`.
pub fn format_units(value: u128, decimals: u32) -> String {
    if decimals == 0 {
        return format!("{value}.0");
    }
    let digits = format!("{value:0>width$}", width = decimals as usize + 1);
    let (whole, frac) = digits.split_at(digits.len() - decimals as usize);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{frac}")
    }
}
