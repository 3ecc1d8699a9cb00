//! Rounding shared by the weather and profit figures
//!
//! Halves round towards positive infinity, so `-4800.5` becomes `-4800` and
//! `27.5` becomes `28`. `f64::round` would send the negative half away from zero.

/// Nearest integer, halves rounded up
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
