// Formatting helpers for attribute values.

/// Formats a number the way it reads in the source data: integral values
/// without a fractional part, everything else with the shortest round-trip form.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
