//! Numeric dimensions (`16px`, `1.5rem`, `20%`, `0.5`) and their formatting

use crate::config::compile_time::units;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A number with an optional unit suffix
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub value: f64,
    pub unit: String,
}

fn dimension_regex() -> &'static Regex {
    static DIMENSION: OnceLock<Regex> = OnceLock::new();
    DIMENSION.get_or_init(|| {
        Regex::new(r"^([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)([a-zA-Z]+|%)?$")
            .expect("dimension pattern is valid")
    })
}

impl Dimension {
    pub fn new(value: f64, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_ascii_lowercase(),
        }
    }

    pub fn unitless(value: f64) -> Self {
        Self {
            value,
            unit: String::new(),
        }
    }

    pub fn is_unitless(&self) -> bool {
        self.unit.is_empty()
    }

    pub fn is_length(&self) -> bool {
        units::LENGTH_UNITS.contains(&self.unit.as_str())
    }

    /// Value expressed in px, for units that convert through the base font size
    pub fn to_px(&self, base_font_size: f64) -> Option<f64> {
        match self.unit.as_str() {
            "px" => Some(self.value),
            "rem" | "em" => Some(self.value * base_font_size),
            "pt" => Some(self.value * units::PX_PER_PT),
            _ => None,
        }
    }

    /// Convert into `unit`; same-unit and unitless values convert trivially
    pub fn convert_to(&self, unit: &str, base_font_size: f64) -> Option<Dimension> {
        let target = unit.to_ascii_lowercase();
        if self.unit == target || self.is_unitless() {
            return Some(Dimension {
                value: self.value,
                unit: target,
            });
        }

        let px = self.to_px(base_font_size)?;
        let value = match target.as_str() {
            "px" => px,
            "rem" | "em" => px / base_font_size,
            "pt" => px / units::PX_PER_PT,
            _ => return None,
        };

        Some(Dimension {
            value,
            unit: target,
        })
    }

    pub fn format(&self, precision: u32) -> String {
        format_dimension(self.value, &self.unit, precision)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_number(self.value, 4), self.unit)
    }
}

/// Strict parse: `None` when the text is not `<number><unit?>`
pub fn try_parse_dimension(value: &str) -> Option<Dimension> {
    let captures = dimension_regex().captures(value.trim())?;
    let number: f64 = captures.get(1)?.as_str().parse().ok()?;
    if !number.is_finite() {
        return None;
    }
    let unit = captures.get(2).map(|m| m.as_str()).unwrap_or("");
    Some(Dimension::new(number, unit))
}

/// Lenient parse: anything that is not a dimension becomes a unitless number (0 if not numeric)
pub fn parse_dimension(value: &str) -> Dimension {
    try_parse_dimension(value).unwrap_or_else(|| {
        let number = value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0);
        Dimension::unitless(number)
    })
}

/// Round to `precision` decimals and drop trailing zeros
pub fn format_number(value: f64, precision: u32) -> String {
    let formatted = format!("{:.*}", precision as usize, value);
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };

    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

pub fn format_dimension(value: f64, unit: &str, precision: u32) -> String {
    format!("{}{}", format_number(value, precision), unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimension("16px"), Dimension::new(16.0, "px"));
        assert_eq!(parse_dimension(" 1.5rem "), Dimension::new(1.5, "rem"));
        assert_eq!(parse_dimension("-.5em"), Dimension::new(-0.5, "em"));
        assert_eq!(parse_dimension("20%"), Dimension::new(20.0, "%"));
        assert_eq!(parse_dimension("0.25"), Dimension::unitless(0.25));
    }

    #[test]
    fn test_lenient_fallback() {
        assert_eq!(parse_dimension("abc"), Dimension::unitless(0.0));
        assert_eq!(parse_dimension(""), Dimension::unitless(0.0));
        assert_eq!(try_parse_dimension("abc"), None);
        assert_eq!(try_parse_dimension("1px 2px"), None);
    }

    #[test]
    fn test_unit_conversion() {
        let rem = Dimension::new(1.5, "rem");
        assert_eq!(rem.to_px(16.0), Some(24.0));

        let px = Dimension::new(8.0, "px");
        assert_eq!(px.convert_to("rem", 16.0), Some(Dimension::new(0.5, "rem")));

        let pt = Dimension::new(12.0, "pt");
        let converted = pt.convert_to("px", 16.0).unwrap();
        assert!((converted.value - 16.0).abs() < 1e-9);

        assert_eq!(Dimension::new(50.0, "%").convert_to("px", 16.0), None);
        assert_eq!(
            Dimension::unitless(2.0).convert_to("rem", 16.0),
            Some(Dimension::new(2.0, "rem"))
        );
    }

    #[test]
    fn test_formatting_trims_zeros() {
        assert_eq!(format_dimension(1.5, "rem", 4), "1.5rem");
        assert_eq!(format_dimension(2.0, "px", 4), "2px");
        assert_eq!(format_dimension(1.0 / 3.0, "rem", 4), "0.3333rem");
        assert_eq!(format_number(-0.00001, 4), "0");
        assert_eq!(format_number(1200.0, 0), "1200");
        assert_eq!(format_number(4.5, 2), "4.5");
    }

    #[test]
    fn test_units_are_normalized() {
        assert_eq!(Dimension::new(1.0, "REM").unit, "rem");
        assert_eq!(Dimension::new(1.0, "lh").unit, "lh");
        assert!(Dimension::new(1.0, "px").is_length());
        assert!(!Dimension::new(1.0, "vw").is_length());
    }
}
