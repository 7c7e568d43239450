//! Perceptual color spaces
//!
//! OKLab and its polar form OKLCH, using Björn Ottosson's reference matrices.
//! All conversions go through linear-light sRGB.

use super::Rgba;

/// sRGB transfer function, encoded -> linear
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB transfer function, linear -> encoded
pub fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    pub l: f64,
    pub c: f64,
    /// Degrees in [0, 360)
    pub h: f64,
    pub alpha: f64,
}

impl Oklab {
    pub fn from_rgba(color: Rgba) -> Self {
        let r = srgb_to_linear(color.r);
        let g = srgb_to_linear(color.g);
        let b = srgb_to_linear(color.b);

        let l = 0.412_221_470_8 * r + 0.536_332_536_3 * g + 0.051_445_992_9 * b;
        let m = 0.211_903_498_2 * r + 0.680_699_545_1 * g + 0.107_396_956_6 * b;
        let s = 0.088_302_461_9 * r + 0.281_718_837_6 * g + 0.629_978_700_5 * b;

        let l_ = l.cbrt();
        let m_ = m.cbrt();
        let s_ = s.cbrt();

        Self {
            l: 0.210_454_255_3 * l_ + 0.793_617_785_0 * m_ - 0.004_072_046_8 * s_,
            a: 1.977_998_495_1 * l_ - 2.428_592_205_0 * m_ + 0.450_593_709_9 * s_,
            b: 0.025_904_037_1 * l_ + 0.782_771_766_2 * m_ - 0.808_675_766_0 * s_,
            alpha: color.alpha,
        }
    }

    /// Back to sRGB, clamping each channel into gamut
    pub fn to_rgba(self) -> Rgba {
        let l_ = self.l + 0.396_337_777_4 * self.a + 0.215_803_757_3 * self.b;
        let m_ = self.l - 0.105_561_345_8 * self.a - 0.063_854_172_8 * self.b;
        let s_ = self.l - 0.089_484_177_5 * self.a - 1.291_485_548_0 * self.b;

        let l = l_ * l_ * l_;
        let m = m_ * m_ * m_;
        let s = s_ * s_ * s_;

        let r = 4.076_741_662_1 * l - 3.307_711_591_3 * m + 0.230_969_929_2 * s;
        let g = -1.268_438_004_6 * l + 2.609_757_401_1 * m - 0.341_319_396_5 * s;
        let b = -0.004_196_086_3 * l - 0.703_418_614_7 * m + 1.707_614_701_0 * s;

        Rgba::new(
            linear_to_srgb(r),
            linear_to_srgb(g),
            linear_to_srgb(b),
            self.alpha,
        )
        .clamped()
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`
    pub fn mix(self, other: Oklab, t: f64) -> Self {
        Self {
            l: self.l + (other.l - self.l) * t,
            a: self.a + (other.a - self.a) * t,
            b: self.b + (other.b - self.b) * t,
            alpha: self.alpha + (other.alpha - self.alpha) * t,
        }
    }

    pub fn to_oklch(self) -> Oklch {
        let c = (self.a * self.a + self.b * self.b).sqrt();
        let h = if c < 1e-9 {
            0.0
        } else {
            normalize_hue(self.b.atan2(self.a).to_degrees())
        };
        Oklch {
            l: self.l,
            c,
            h,
            alpha: self.alpha,
        }
    }
}

impl Oklch {
    pub fn from_rgba(color: Rgba) -> Self {
        Oklab::from_rgba(color).to_oklch()
    }

    pub fn to_oklab(self) -> Oklab {
        let radians = self.h.to_radians();
        Oklab {
            l: self.l,
            a: self.c * radians.cos(),
            b: self.c * radians.sin(),
            alpha: self.alpha,
        }
    }

    pub fn to_rgba(self) -> Rgba {
        self.to_oklab().to_rgba()
    }

    pub fn with_lightness(self, l: f64) -> Self {
        Self {
            l: l.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn with_chroma(self, c: f64) -> Self {
        Self {
            c: c.max(0.0),
            ..self
        }
    }

    pub fn with_hue(self, h: f64) -> Self {
        Self {
            h: normalize_hue(h),
            ..self
        }
    }
}

pub fn normalize_hue(h: f64) -> f64 {
    let wrapped = h.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// WCAG 2.x relative luminance
pub fn relative_luminance(color: Rgba) -> f64 {
    0.2126 * srgb_to_linear(color.r)
        + 0.7152 * srgb_to_linear(color.g)
        + 0.0722 * srgb_to_linear(color.b)
}

/// WCAG contrast ratio, always >= 1
pub fn contrast_ratio(a: Rgba, b: Rgba) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn test_white_and_black_in_oklab() {
        let white = Oklab::from_rgba(Rgba::WHITE);
        assert!(close(white.l, 1.0, 1e-4));
        assert!(close(white.a, 0.0, 1e-4));
        assert!(close(white.b, 0.0, 1e-4));

        let black = Oklab::from_rgba(Rgba::BLACK);
        assert!(close(black.l, 0.0, 1e-9));
    }

    #[test]
    fn test_roundtrip_is_stable() {
        for hex in ["#0d6efd", "#6366f1", "#ff0000", "#123456", "#fafafa"] {
            let color = Rgba::from_hex(hex).unwrap();
            assert_eq!(Oklab::from_rgba(color).to_rgba().to_hex(), hex);
            assert_eq!(Oklch::from_rgba(color).to_rgba().to_hex(), hex);
        }
    }

    #[test]
    fn test_red_hue_angle() {
        let red = Oklch::from_rgba(Rgba::from_hex("#ff0000").unwrap());
        assert!(close(red.l, 0.628, 1e-3));
        assert!(close(red.c, 0.2577, 1e-3));
        assert!(close(red.h, 29.23, 0.05));
    }

    #[test]
    fn test_contrast_extremes() {
        assert!(close(contrast_ratio(Rgba::BLACK, Rgba::WHITE), 21.0, 1e-9));
        assert!(close(contrast_ratio(Rgba::WHITE, Rgba::BLACK), 21.0, 1e-9));
        let gray = Rgba::from_hex("#777777").unwrap();
        assert_eq!(contrast_ratio(gray, gray), 1.0);
    }

    #[test]
    fn test_hue_normalization() {
        assert_eq!(normalize_hue(-30.0), 330.0);
        assert_eq!(normalize_hue(720.0), 0.0);
    }
}
