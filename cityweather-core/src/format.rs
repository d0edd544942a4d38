//! Display helpers shared by the detail views.

use chrono::{NaiveDate, NaiveDateTime};

pub const KELVIN_OFFSET: f64 = 273.15;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Round to one decimal, halves going up (towards positive infinity).
pub fn round_tenths(value: f64) -> f64 {
    // `+ 0.0` turns -0.0 into 0.0
    (value * 10.0 + 0.5).floor() / 10.0 + 0.0
}

/// Kelvin in, `"26.9°c"` out.
pub fn format_celsius(kelvin: f64) -> String {
    format!("{:.1}°c", round_tenths(kelvin_to_celsius(kelvin)))
}

/// `"Monday, January 1, 2024"`.
pub fn format_forecast_date(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%A, %B %-d, %Y").to_string()
}

/// `"Mon Jan 01 2024"`.
pub fn format_header_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Probability 0.0..=1.0 as a whole percentage.
pub fn format_pop(pop: f64) -> String {
    format!("{}%", (pop.clamp(0.0, 1.0) * 100.0).round() as u8)
}

pub fn or_na<T: std::fmt::Display>(value: Option<T>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v} {unit}"),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_300_kelvin() {
        assert_eq!(format_celsius(300.0), "26.9°c");
    }

    #[test]
    fn rounds_halves_up() {
        assert_eq!(round_tenths(1.25), 1.3);
        assert_eq!(round_tenths(-1.25), -1.2);
        assert_eq!(round_tenths(2.04), 2.0);
    }

    #[test]
    fn freezing_point_renders_without_sign() {
        assert_eq!(format_celsius(273.15), "0.0°c");
        assert_eq!(format_celsius(273.12), "0.0°c");
    }

    #[test]
    fn below_freezing() {
        assert_eq!(format_celsius(263.15), "-10.0°c");
    }

    #[test]
    fn forecast_date_is_long_form() {
        let ts = NaiveDateTime::parse_from_str("2024-01-01 12:00:00", "%Y-%m-%d %H:%M:%S")
            .expect("valid timestamp");
        assert_eq!(format_forecast_date(&ts), "Monday, January 1, 2024");
    }

    #[test]
    fn header_date_is_short_form() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");
        assert_eq!(format_header_date(date), "Tue Mar 05 2024");
    }

    #[test]
    fn pop_is_a_percentage() {
        assert_eq!(format_pop(0.37), "37%");
        assert_eq!(format_pop(1.4), "100%");
    }

    #[test]
    fn missing_values_render_as_na() {
        assert_eq!(or_na(Some(60), "%"), "60 %");
        assert_eq!(or_na::<u8>(None, "%"), "n/a");
    }
}
