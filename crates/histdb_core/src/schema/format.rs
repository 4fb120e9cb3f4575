//! Text rendering of bin values and axis edges.
//!
//! Bin values are rounded to 6 significant digits using the same layout as
//! C's `%.6g`. Edges use the shortest representation that parses back to the
//! identical `f64`.

/// Significant digits kept for bin values.
pub const BIN_SIGNIFICANT_DIGITS: usize = 6;

/// Formats one bin value like `%.6g`.
pub fn format_bin_value(value: f64) -> String {
    format_general(value, BIN_SIGNIFICANT_DIGITS)
}

/// Formats one edge value with full round-trip precision.
pub fn format_edge_value(value: f64) -> String {
    value.to_string()
}

pub fn serialize_bins(bins: &[f64]) -> String {
    join(bins, format_bin_value)
}

pub fn serialize_edges(edges: &[f64]) -> String {
    join(edges, format_edge_value)
}

fn join(values: &[f64], format: fn(f64) -> String) -> String {
    values
        .iter()
        .map(|value| format(*value))
        .collect::<Vec<_>>()
        .join(",")
}

fn format_general(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    // %g switches to exponent notation outside [1e-4, 10^precision).
    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        );
    }

    let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{value:.decimals$}")).to_string()
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::{format_bin_value, format_edge_value, serialize_bins, serialize_edges};

    #[test]
    fn bin_values_follow_six_significant_digits() {
        assert_eq!(format_bin_value(3.0), "3");
        assert_eq!(format_bin_value(2.5), "2.5");
        assert_eq!(format_bin_value(1.0 / 3.0), "0.333333");
        assert_eq!(format_bin_value(100000.0), "100000");
        assert_eq!(format_bin_value(1234567.0), "1.23457e+06");
        assert_eq!(format_bin_value(0.0001), "0.0001");
        assert_eq!(format_bin_value(0.00001234567), "1.23457e-05");
        assert_eq!(format_bin_value(-42.123456), "-42.1235");
        assert_eq!(format_bin_value(999999.7), "1e+06");
        assert_eq!(format_bin_value(0.0), "0");
    }

    #[test]
    fn bin_values_round_trip_within_six_digits() {
        for value in [0.123456789, 98765.4321, 1.0e-9, 6.02214076e23, -7.77777777] {
            let parsed: f64 = format_bin_value(value).parse().unwrap();
            let relative = ((parsed - value) / value).abs();
            assert!(relative <= 5.0e-6, "{value} -> {parsed}");
            assert_eq!(format_bin_value(value), format_bin_value(value));
        }
    }

    #[test]
    fn edge_values_round_trip_exactly() {
        for value in [0.1, 1.0 / 3.0, 1.0e-300, 123456789.123456789, -0.0, 2.0f64.powi(60)] {
            let parsed: f64 = format_edge_value(value).parse().unwrap();
            assert_eq!(parsed.to_bits(), value.to_bits());
        }
    }

    #[test]
    fn sequences_are_comma_joined() {
        assert_eq!(serialize_edges(&[0.0, 1.0, 2.0]), "0,1,2");
        assert_eq!(serialize_edges(&[0.1, 0.25]), "0.1,0.25");
        assert_eq!(serialize_bins(&[0.0, 1.0 / 3.0, 12.0]), "0,0.333333,12");
        assert_eq!(serialize_bins(&[]), "");
    }
}
