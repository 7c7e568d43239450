//! Color family
//!
//! Every transform converts into OKLab/OKLCH, works on lightness, chroma or hue,
//! and converts back to a clamped sRGB hex string.

use super::args::{amount_value, degrees, Args};
use crate::catalog::{FunctionCatalog, FunctionContext, FunctionError, FunctionFamily, FunctionResult};
use crate::color::{Oklab, Oklch, Rgba};
use std::sync::Arc;

/// Lightness and relative chroma for each palette step; 500 is the base color
const SCALE_LADDER: &[(u32, f64, f64)] = &[
    (50, 0.97, 0.15),
    (100, 0.93, 0.30),
    (200, 0.87, 0.50),
    (300, 0.78, 0.70),
    (400, 0.68, 0.85),
    (600, 0.48, 0.95),
    (700, 0.40, 0.85),
    (800, 0.32, 0.70),
    (900, 0.25, 0.55),
    (950, 0.18, 0.45),
];

pub(crate) fn register(catalog: &mut FunctionCatalog) {
    let family = FunctionFamily::Color;
    let entries: [(&str, &str, &str, fn(&[String], &FunctionContext) -> FunctionResult); 15] = [
        ("tint", "tint(color, amount)", "Mix toward white in OKLab", tint),
        ("shade", "shade(color, amount)", "Mix toward black in OKLab", shade),
        ("mix", "mix(a, b, ratio=50%)", "Interpolate two colors in OKLab", mix),
        (
            "adjust",
            "adjust(color, channel, delta) | adjust(color, { lightness, chroma, hue })",
            "Shift OKLCH lightness, chroma or hue",
            adjust,
        ),
        ("alpha", "alpha(color, opacity)", "Set opacity, returns rgba()", alpha),
        ("complement", "complement(color)", "Rotate hue by 180 degrees", complement),
        ("saturate", "saturate(color, amount)", "Scale chroma up by amount", saturate),
        ("desaturate", "desaturate(color, amount)", "Scale chroma down by amount", desaturate),
        ("invert", "invert(color)", "Invert lightness and opponent axes in OKLab", invert),
        ("grayscale", "grayscale(color)", "Drop all chroma", grayscale),
        ("darkMode", "darkMode(color)", "Mirror lightness, keep hue and chroma", dark_mode),
        ("colorScale", "colorScale(color, step)", "Palette step 50-950 from a base color", color_scale),
        ("lighten", "lighten(color, amount)", "Raise OKLCH lightness", lighten),
        ("darken", "darken(color, amount)", "Lower OKLCH lightness", darken),
        ("hueRotate", "hueRotate(color, degrees)", "Rotate OKLCH hue", hue_rotate),
    ];

    for (name, signature, description, function) in entries {
        catalog.insert(name, family, signature, description, Arc::new(function));
    }
}

fn mix_toward(color: Rgba, target: Rgba, t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 {
        return color.to_hex();
    }
    Oklab::from_rgba(color)
        .mix(Oklab::from_rgba(target), t)
        .to_rgba()
        .to_hex()
}

fn map_lch(args: &[String], transform: impl FnOnce(Oklch) -> Oklch) -> FunctionResult {
    let args = Args::new(args);
    let color = args.color(0, "color")?;
    Ok(transform(Oklch::from_rgba(color)).to_rgba().to_hex())
}

fn map_lch_amount(args: &[String], transform: impl FnOnce(Oklch, f64) -> Oklch) -> FunctionResult {
    let args = Args::new(args);
    let color = args.color(0, "color")?;
    let amount = args.amount(1, "amount")?;
    Ok(transform(Oklch::from_rgba(color), amount).to_rgba().to_hex())
}

pub fn tint(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(2)?;
    Ok(mix_toward(args.color(0, "color")?, Rgba::WHITE, args.amount(1, "amount")?))
}

pub fn shade(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(2)?;
    Ok(mix_toward(args.color(0, "color")?, Rgba::BLACK, args.amount(1, "amount")?))
}

pub fn mix(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(3)?;
    let a = args.color(0, "a")?;
    let b = args.color(1, "b")?;
    let ratio = match args.optional(2) {
        Some(_) => args.amount(2, "ratio")?,
        None => 0.5,
    }
    .clamp(0.0, 1.0);

    if ratio <= 0.0 {
        return Ok(a.to_hex());
    }
    if ratio >= 1.0 {
        return Ok(b.to_hex());
    }
    Ok(mix_toward(a, b, ratio))
}

/// Channel deltas: lightness and chroma are OKLCH units, hue is degrees
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Adjustment {
    lightness: f64,
    chroma: f64,
    hue: f64,
}

impl Adjustment {
    fn set(&mut self, channel: &str, delta: &serde_json::Value) -> Result<(), FunctionError> {
        match channel.to_ascii_lowercase().as_str() {
            "lightness" | "l" => self.lightness = amount_value(delta)?,
            "chroma" | "c" => self.chroma = number_value(delta)?,
            "hue" | "h" => {
                self.hue = match delta {
                    serde_json::Value::String(s) => degrees(s)?,
                    other => number_value(other)?,
                }
            }
            other => {
                return Err(FunctionError::invalid_argument(
                    "channel",
                    format!("'{}' is not one of lightness, chroma, hue", other),
                ))
            }
        }
        Ok(())
    }

    fn apply(self, lch: Oklch) -> Oklch {
        lch.with_lightness(lch.l + self.lightness)
            .with_chroma(lch.c + self.chroma)
            .with_hue(lch.h + self.hue)
    }
}

fn number_value(value: &serde_json::Value) -> Result<f64, FunctionError> {
    match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| FunctionError::InvalidNumber(n.to_string())),
        serde_json::Value::String(s) => super::args::number(s),
        other => Err(FunctionError::InvalidNumber(other.to_string())),
    }
}

pub fn adjust(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let parsed = Args::new(args);
    let color = parsed.color(0, "color")?;
    let mut adjustment = Adjustment::default();

    if let Some(options) = parsed.options() {
        parsed.at_most(2)?;
        for (channel, delta) in &options {
            adjustment.set(channel, delta)?;
        }
    } else {
        parsed.at_most(3)?;
        let channel = parsed.required(1, "channel")?;
        let delta = parsed.required(2, "delta")?;
        adjustment.set(channel, &serde_json::Value::String(delta.to_string()))?;
    }

    Ok(adjustment.apply(Oklch::from_rgba(color)).to_rgba().to_hex())
}

pub fn alpha(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(2)?;
    let color = args.color(0, "color")?;
    let opacity = args.amount(1, "opacity")?;
    Ok(color.with_alpha(opacity).to_rgba_string())
}

pub fn complement(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    map_lch(args, |lch| lch.with_hue(lch.h + 180.0))
}

pub fn saturate(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    map_lch_amount(args, |lch, amount| lch.with_chroma(lch.c * (1.0 + amount)))
}

pub fn desaturate(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    map_lch_amount(args, |lch, amount| lch.with_chroma(lch.c * (1.0 - amount)))
}

pub fn invert(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    let lab = Oklab::from_rgba(args.color(0, "color")?);
    Ok(Oklab {
        l: 1.0 - lab.l,
        a: -lab.a,
        b: -lab.b,
        alpha: lab.alpha,
    }
    .to_rgba()
    .to_hex())
}

pub fn grayscale(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    map_lch(args, |lch| lch.with_chroma(0.0))
}

pub fn dark_mode(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    map_lch(args, |lch| lch.with_lightness(1.0 - lch.l))
}

pub fn color_scale(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(2)?;
    let color = args.color(0, "color")?;
    let step_text = args.required(1, "step")?;
    let step: u32 = step_text
        .parse()
        .map_err(|_| FunctionError::UnknownStep(step_text.to_string()))?;

    if step == 500 {
        return Ok(color.to_hex());
    }

    let (_, lightness, chroma_factor) = SCALE_LADDER
        .iter()
        .find(|(s, _, _)| *s == step)
        .ok_or_else(|| FunctionError::UnknownStep(step_text.to_string()))?;

    let lch = Oklch::from_rgba(color);
    Ok(lch
        .with_lightness(*lightness)
        .with_chroma(lch.c * chroma_factor)
        .to_rgba()
        .to_hex())
}

pub fn lighten(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    map_lch_amount(args, |lch, amount| lch.with_lightness(lch.l + amount))
}

pub fn darken(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    map_lch_amount(args, |lch, amount| lch.with_lightness(lch.l - amount))
}

pub fn hue_rotate(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let parsed = Args::new(args);
    let color = parsed.color(0, "color")?;
    let delta = degrees(parsed.required(1, "degrees")?)?;
    let lch = Oklch::from_rgba(color);
    Ok(lch.with_hue(lch.h + delta).to_rgba().to_hex())
}
