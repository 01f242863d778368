//! Display formatting for metric values.

/// Format a fraction as a percentage with edge handling: values just above
/// zero and just below one are shown as bounds rather than rounding to a
/// misleading "0%" or "100%". NaN is the missing-class sentinel and
/// renders as "N/A".
pub fn percent_with_edge(fraction: f64) -> String {
    if fraction.is_nan() {
        return "N/A".to_string();
    }
    if fraction <= 0.0 {
        return "0%".to_string();
    }
    if fraction < 0.01 {
        return "< 1%".to_string();
    }
    if fraction > 0.99 && fraction < 1.0 {
        return "> 99%".to_string();
    }
    let percent = fraction * 100.0;
    if (percent - percent.round()).abs() < 0.05 {
        format!("{}%", percent.round())
    } else {
        format!("{percent:.1}%")
    }
}

pub fn square_meter_to_kilometer(value: f64) -> f64 {
    value / 1_000_000.0
}

/// Round down to two decimals, so displayed area never overstates overlap
pub fn round_lower(value: f64) -> f64 {
    (value * 100.0).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_edges() {
        assert_eq!(percent_with_edge(0.0), "0%");
        assert_eq!(percent_with_edge(0.004), "< 1%");
        assert_eq!(percent_with_edge(0.1), "10%");
        assert_eq!(percent_with_edge(0.355), "35.5%");
        assert_eq!(percent_with_edge(0.995), "> 99%");
        assert_eq!(percent_with_edge(1.0), "100%");
    }

    #[test]
    fn nan_renders_as_not_available() {
        assert_eq!(percent_with_edge(f64::NAN), "N/A");
    }

    #[test]
    fn area_conversion_and_rounding() {
        assert_eq!(square_meter_to_kilometer(33_706_000_000.0), 33_706.0);
        assert_eq!(round_lower(123.456), 123.45);
        assert_eq!(round_lower(10.0), 10.0);
    }
}
