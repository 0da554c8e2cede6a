//! Small shared helpers.

/// Format a sales total with thousands separators and at most two decimal
/// places, e.g. `4,778,414.63`. Trailing zero cents are dropped.
pub(crate) fn format_total(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let (int_part, frac_part) = (cents / 100, (cents % 100).abs());

    let digits = int_part.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if int_part < 0 {
        grouped.insert(0, '-');
    }

    if frac_part == 0 {
        grouped
    } else if frac_part % 10 == 0 {
        format!("{grouped}.{}", frac_part / 10)
    } else {
        format!("{grouped}.{frac_part:02}")
    }
}
