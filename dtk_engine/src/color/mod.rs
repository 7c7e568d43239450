//! Color values
//!
//! Parsing of the CSS color forms tokens use, formatting back to hex or `rgba()`,
//! and the perceptual spaces in [`space`].

pub mod space;

pub use space::{contrast_ratio, relative_luminance, Oklab, Oklch};

use crate::catalog::FunctionError;
use dtk_core::parser::{format_number, unquote};

/// Gamma-encoded sRGB with alpha, every channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub alpha: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        alpha: 1.0,
    };

    pub const BLACK: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        alpha: 1.0,
    };

    pub fn new(r: f64, g: f64, b: f64, alpha: f64) -> Self {
        Self { r, g, b, alpha }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            1.0,
        )
    }

    pub fn clamped(self) -> Self {
        let clamp = |c: f64| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) };
        Self {
            r: clamp(self.r),
            g: clamp(self.g),
            b: clamp(self.b),
            alpha: clamp(self.alpha),
        }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Snapped to the nearest 8-bit color, as it will be written out
    pub fn quantized(self) -> Self {
        let (r, g, b) = self.to_rgb8();
        Self::from_rgb8(r, g, b).with_alpha(self.alpha)
    }

    /// 8-bit channels, rounded
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let c = self.clamped();
        let byte = |v: f64| (v * 255.0).round() as u8;
        (byte(c.r), byte(c.g), byte(c.b))
    }

    /// `#rrggbb`, lowercase; alpha is dropped
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// `rgba(r, g, b, a)` with 8-bit channels
    pub fn to_rgba_string(self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!(
            "rgba({}, {}, {}, {})",
            r,
            g,
            b,
            format_number(self.clamped().alpha, 3)
        )
    }

    /// Parses `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let expanded: String = match digits.len() {
            3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            _ => return None,
        };

        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        let mut color = Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?);
        if expanded.len() == 8 {
            color.alpha = f64::from(channel(6)?) / 255.0;
        }
        Some(color)
    }
}

/// Parse any supported color notation
pub fn parse_color(text: &str) -> Result<Rgba, FunctionError> {
    let trimmed = unquote(text);
    let lower = trimmed.to_ascii_lowercase();
    let invalid = || FunctionError::InvalidColor(trimmed.to_string());

    if lower.starts_with('#') {
        return Rgba::from_hex(&lower).ok_or_else(invalid);
    }

    if let Some(body) = function_body(&lower, &["rgb", "rgba"]) {
        return parse_rgb_body(body).ok_or_else(invalid);
    }

    if let Some(body) = function_body(&lower, &["hsl", "hsla"]) {
        return parse_hsl_body(body).ok_or_else(invalid);
    }

    named_color(&lower).ok_or_else(invalid)
}

fn function_body<'a>(text: &'a str, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| {
        text.strip_prefix(name)?
            .trim_start()
            .strip_prefix('(')?
            .strip_suffix(')')
    })
}

/// Components from `a, b, c[, d]` or `a b c[ / d]`
fn components(body: &str) -> Option<(Vec<&str>, Option<&str>)> {
    let (main, slash_alpha) = match body.split_once('/') {
        Some((main, alpha)) => (main, Some(alpha.trim())),
        None => (body, None),
    };

    let parts: Vec<&str> = if main.contains(',') {
        main.split(',').map(str::trim).collect()
    } else {
        main.split_whitespace().collect()
    };

    match (parts.len(), slash_alpha) {
        (3, alpha) => Some((parts, alpha)),
        (4, None) => {
            let alpha = parts.get(3).copied();
            Some((parts[..3].to_vec(), alpha))
        }
        _ => None,
    }
}

fn parse_alpha(text: Option<&str>) -> Option<f64> {
    match text {
        None => Some(1.0),
        Some(t) => match t.strip_suffix('%') {
            Some(pct) => pct.trim().parse::<f64>().ok().map(|v| v / 100.0),
            None => t.parse::<f64>().ok(),
        },
    }
    .map(|a| a.clamp(0.0, 1.0))
}

fn parse_rgb_body(body: &str) -> Option<Rgba> {
    let (parts, alpha) = components(body)?;
    let channel = |t: &str| -> Option<f64> {
        match t.strip_suffix('%') {
            Some(pct) => pct.trim().parse::<f64>().ok().map(|v| v / 100.0),
            None => t.parse::<f64>().ok().map(|v| v / 255.0),
        }
    };

    Some(
        Rgba::new(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            parse_alpha(alpha)?,
        )
        .clamped(),
    )
}

fn parse_hsl_body(body: &str) -> Option<Rgba> {
    let (parts, alpha) = components(body)?;
    let hue = parts[0].trim_end_matches("deg").parse::<f64>().ok()?;
    let percent = |t: &str| -> Option<f64> {
        t.trim_end_matches('%')
            .parse::<f64>()
            .ok()
            .map(|v| (v / 100.0).clamp(0.0, 1.0))
    };
    let s = percent(parts[1])?;
    let l = percent(parts[2])?;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h = space::normalize_hue(hue) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;

    Some(Rgba::new(r + m, g + m, b + m, parse_alpha(alpha)?).clamped())
}

fn named_color(name: &str) -> Option<Rgba> {
    let rgb = match name {
        "transparent" => return Some(Rgba::new(0.0, 0.0, 0.0, 0.0)),
        "white" => (255, 255, 255),
        "black" => (0, 0, 0),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "aqua" | "cyan" => (0, 255, 255),
        "fuchsia" | "magenta" => (255, 0, 255),
        "rebeccapurple" => (102, 51, 153),
        _ => return None,
    };
    Some(Rgba::from_rgb8(rgb.0, rgb.1, rgb.2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_hex_forms() {
        assert_eq!(parse_color("#fff").unwrap(), Rgba::WHITE);
        assert_eq!(parse_color("#0D6EFD").unwrap().to_hex(), "#0d6efd");
        let translucent = parse_color("#ff000080").unwrap();
        assert_eq!(translucent.to_hex(), "#ff0000");
        assert!((translucent.alpha - 128.0 / 255.0).abs() < 1e-9);
        assert_eq!(parse_color("#f008").unwrap().to_hex(), "#ff0000");
    }

    #[test]
    fn test_functional_forms() {
        assert_eq!(parse_color("rgb(255, 0, 0)").unwrap().to_hex(), "#ff0000");
        assert_eq!(parse_color("rgba(0 128 255 / 50%)").unwrap().alpha, 0.5);
        assert_eq!(parse_color("rgba(0, 0, 0, 0.25)").unwrap().alpha, 0.25);
        assert_eq!(parse_color("hsl(0, 100%, 50%)").unwrap().to_hex(), "#ff0000");
        assert_eq!(parse_color("hsl(120deg 100% 25%)").unwrap().to_hex(), "#008000");
    }

    #[test]
    fn test_named_and_quoted() {
        assert_eq!(parse_color("White").unwrap(), Rgba::WHITE);
        assert_eq!(parse_color("'black'").unwrap(), Rgba::BLACK);
        assert_eq!(parse_color("transparent").unwrap().alpha, 0.0);
    }

    #[test]
    fn test_invalid_colors() {
        assert_matches!(parse_color("#ggg"), Err(FunctionError::InvalidColor(_)));
        assert_matches!(parse_color("#12345"), Err(FunctionError::InvalidColor(_)));
        assert_matches!(parse_color("rgb(1, 2)"), Err(FunctionError::InvalidColor(_)));
        assert_matches!(parse_color("16px"), Err(FunctionError::InvalidColor(_)));
    }

    #[test]
    fn test_output_formats() {
        let color = Rgba::from_rgb8(13, 110, 253).with_alpha(0.5);
        assert_eq!(color.to_hex(), "#0d6efd");
        assert_eq!(color.to_rgba_string(), "rgba(13, 110, 253, 0.5)");
    }
}
