//! Contrast and accessibility family
//!
//! WCAG 2.x relative luminance and contrast ratios. Predicates return the
//! strings `"true"` / `"false"`.

use super::args::{bool_string, Args};
use crate::catalog::{FunctionCatalog, FunctionContext, FunctionError, FunctionFamily, FunctionResult};
use crate::color::{contrast_ratio as ratio_of, relative_luminance, Oklch, Rgba};
use dtk_core::config::compile_time::{contrast, formatting};
use dtk_core::parser::format_number;
use std::sync::Arc;

pub(crate) fn register(catalog: &mut FunctionCatalog) {
    let family = FunctionFamily::Contrast;
    let entries: [(&str, &str, &str, fn(&[String], &FunctionContext) -> FunctionResult); 8] = [
        (
            "contrastRatio",
            "contrastRatio(a, b)",
            "WCAG contrast ratio between two colors",
            contrast_ratio,
        ),
        (
            "meetsContrast",
            "meetsContrast(fg, bg, level=AA, size=normal)",
            "Whether a pair passes WCAG AA/AAA",
            meets_contrast,
        ),
        (
            "accessibleText",
            "accessibleText(bg, light=#ffffff, dark=#000000)",
            "Pick the candidate text color with more contrast",
            accessible_text,
        ),
        (
            "ensureContrast",
            "ensureContrast(fg, bg, ratio=4.5)",
            "Nudge foreground lightness until the ratio is met",
            ensure_contrast,
        ),
        ("luminance", "luminance(color)", "WCAG relative luminance", luminance),
        ("isLight", "isLight(color)", "Luminance above the black/white pivot", is_light),
        ("isDark", "isDark(color)", "Luminance at or below the pivot", is_dark),
        (
            "accessiblePair",
            "accessiblePair(bg, level=AA)",
            "Hue-matched foreground that passes on the background",
            accessible_pair,
        ),
    ];

    for (name, signature, description, function) in entries {
        catalog.insert(name, family, signature, description, Arc::new(function));
    }
}

/// Required ratio for a WCAG level and text size
pub fn threshold(level: &str, size: &str) -> Result<f64, FunctionError> {
    let large = match size.to_ascii_lowercase().as_str() {
        "normal" | "small" => false,
        "large" | "bold" => true,
        other => {
            return Err(FunctionError::invalid_argument(
                "size",
                format!("'{}' is not normal or large", other),
            ))
        }
    };

    match (level.to_ascii_uppercase().as_str(), large) {
        ("AA", false) => Ok(contrast::AA_NORMAL),
        ("AAA", false) => Ok(contrast::AAA_NORMAL),
        ("AA", true) => Ok(contrast::AA_LARGE),
        ("AAA", true) => Ok(contrast::AAA_LARGE),
        (other, _) => Err(FunctionError::invalid_argument(
            "level",
            format!("'{}' is not AA or AAA", other),
        )),
    }
}

fn is_light_color(color: Rgba) -> bool {
    relative_luminance(color) > contrast::LIGHTNESS_PIVOT
}

/// Closest lightness to `fg` (same hue and chroma) that reaches `target` on `bg`
pub fn adjust_for_contrast(fg: Rgba, bg: Rgba, target: f64) -> Rgba {
    if ratio_of(fg, bg) >= target {
        return fg;
    }

    let lch = Oklch::from_rgba(fg);
    let toward_dark = is_light_color(bg);
    let extreme = if toward_dark { 0.0 } else { 1.0 };
    let passes = |l: f64| ratio_of(lch.with_lightness(l).to_rgba().quantized(), bg) >= target;

    if !passes(extreme) {
        let extreme_color = lch.with_lightness(extreme).to_rgba().quantized();
        let fallback = if toward_dark { Rgba::BLACK } else { Rgba::WHITE };
        return if ratio_of(fallback, bg) >= ratio_of(extreme_color, bg) {
            fallback
        } else {
            extreme_color
        };
    }

    let mut failing = lch.l;
    let mut passing = extreme;
    for _ in 0..contrast::MAX_CONTRAST_SEARCH_STEPS {
        let mid = (failing + passing) / 2.0;
        if passes(mid) {
            passing = mid;
        } else {
            failing = mid;
        }
    }

    lch.with_lightness(passing).to_rgba().quantized()
}

pub fn contrast_ratio(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(2)?;
    let ratio = ratio_of(args.color(0, "a")?, args.color(1, "b")?);
    Ok(format_number(ratio, formatting::RATIO_PRECISION))
}

pub fn meets_contrast(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(4)?;
    let fg = args.color(0, "fg")?;
    let bg = args.color(1, "bg")?;
    let required = threshold(
        args.optional(2).unwrap_or("AA"),
        args.optional(3).unwrap_or("normal"),
    )?;
    Ok(bool_string(ratio_of(fg, bg) >= required))
}

pub fn accessible_text(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(3)?;
    let bg = args.color(0, "bg")?;
    let light = match args.optional(1) {
        Some(_) => args.color(1, "light")?,
        None => Rgba::WHITE,
    };
    let dark = match args.optional(2) {
        Some(_) => args.color(2, "dark")?,
        None => Rgba::BLACK,
    };

    let pick = if ratio_of(light, bg) >= ratio_of(dark, bg) {
        light
    } else {
        dark
    };
    Ok(pick.to_hex())
}

pub fn ensure_contrast(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(3)?;
    let fg = args.color(0, "fg")?;
    let bg = args.color(1, "bg")?;
    let target = match args.optional(2) {
        Some(_) => args.number(2, "ratio")?,
        None => contrast::AA_NORMAL,
    };

    if !(1.0..=21.0).contains(&target) {
        return Err(FunctionError::invalid_argument(
            "ratio",
            format!("{} is outside 1..21", target),
        ));
    }

    Ok(adjust_for_contrast(fg, bg, target).to_hex())
}

pub fn luminance(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(1)?;
    Ok(format_number(
        relative_luminance(args.color(0, "color")?),
        formatting::DEFAULT_PRECISION,
    ))
}

pub fn is_light(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(1)?;
    Ok(bool_string(is_light_color(args.color(0, "color")?)))
}

pub fn is_dark(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(1)?;
    Ok(bool_string(!is_light_color(args.color(0, "color")?)))
}

pub fn accessible_pair(args: &[String], _ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(2)?;
    let bg = args.color(0, "bg")?;
    let target = threshold(args.optional(1).unwrap_or("AA"), "normal")?;
    Ok(adjust_for_contrast(bg, bg, target).to_hex())
}
