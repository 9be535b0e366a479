/// Clamp that tolerates `max < min` by letting `min` win, and maps NaN to `min`.
pub(crate) fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() || value < min {
        return min;
    }
    if value > max {
        return max.max(min);
    }
    value
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
