//! Terminal output utilities.

/// Left-aligned label followed by a right-aligned value.
///
/// # Arguments
/// * `label` - The row label
/// * `value` - The value to format
/// * `width` - The minimum width of the value column
pub fn format_field<T: ToString>(label: &str, value: T, width: usize) -> String {
    let value_str = value.to_string();
    format!("{label:<24}{value_str:>width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_field_short() {
        assert_eq!(
            format_field("rows_total", 42, 6),
            "rows_total                  42"
        );
    }

    #[test]
    fn test_format_field_long_value() {
        assert_eq!(
            format_field("status", "unchanged", 4),
            "status                  unchanged"
        );
    }
}
