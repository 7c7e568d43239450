//! Typography family
//!
//! Fluid sizes interpolate linearly between two viewport widths and are emitted as
//! `clamp(min, <slope>vw + <intercept>, max)`.

use super::args::{dimension_value, Args};
use crate::catalog::{FunctionCatalog, FunctionContext, FunctionError, FunctionFamily, FunctionResult};
use dtk_core::parser::{format_number, Dimension};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Named modular-scale ratios
pub const NAMED_RATIOS: &[(&str, f64)] = &[
    ("minorSecond", 1.067),
    ("majorSecond", 1.125),
    ("minorThird", 1.2),
    ("majorThird", 1.25),
    ("perfectFourth", 1.333),
    ("augmentedFourth", 1.414),
    ("perfectFifth", 1.5),
    ("goldenRatio", 1.618),
    ("majorSixth", 1.667),
    ("minorSeventh", 1.778),
    ("majorSeventh", 1.875),
    ("octave", 2.0),
];

/// Named type-scale steps
pub const TYPE_STEPS: &[(&str, i32)] = &[
    ("xs", -2),
    ("sm", -1),
    ("base", 0),
    ("md", 0),
    ("lg", 1),
    ("xl", 2),
    ("2xl", 3),
    ("3xl", 4),
    ("4xl", 5),
    ("5xl", 6),
];

const DEFAULT_LINE_HEIGHT: f64 = 1.5;
const DEFAULT_GRID_PX: f64 = 4.0;
const DEFAULT_MEASURE_CHARS: f64 = 66.0;
const AVERAGE_GLYPH_EM: f64 = 0.5;
const TRACKING_PER_PX: f64 = 0.001;
const MAX_TRACKING_EM: f64 = 0.05;
const NEUTRAL_TRACKING_PX: f64 = 16.0;

pub(crate) fn register(catalog: &mut FunctionCatalog) {
    let family = FunctionFamily::Typography;
    let entries: [(&str, &str, &str, fn(&[String], &FunctionContext) -> FunctionResult); 8] = [
        (
            "fluidType",
            "fluidType(min, max, minViewport=320px, maxViewport=1280px)",
            "Viewport-interpolated font size as a rem clamp()",
            fluid_type,
        ),
        (
            "modularScale",
            "modularScale(base, step, ratio=majorThird)",
            "base x ratio^step",
            modular_scale,
        ),
        (
            "typeScale",
            "typeScale(step, base=1rem, ratio=majorThird)",
            "Named step (xs..5xl) on a modular scale",
            type_scale,
        ),
        (
            "fluidSpace",
            "fluidSpace(min, max, minViewport=320px, maxViewport=1280px)",
            "Viewport-interpolated spacing in the input unit",
            fluid_space,
        ),
        (
            "lineHeight",
            "lineHeight(fontSize, ratio=1.5, grid=4px)",
            "Unitless line height snapped to a baseline grid",
            line_height,
        ),
        (
            "optimalMeasure",
            "optimalMeasure(fontSize, chars=66)",
            "Comfortable line length in rem",
            optimal_measure,
        ),
        (
            "responsiveType",
            "responsiveType(base, ratio=1.25, minViewport=320px, maxViewport=1280px)",
            "fluidType from base to base x ratio",
            responsive_type,
        ),
        (
            "letterSpacing",
            "letterSpacing(fontSize)",
            "Optical tracking in em for a font size",
            letter_spacing,
        ),
    ];

    for (name, signature, description, function) in entries {
        catalog.insert(name, family, signature, description, Arc::new(function));
    }
}

/// Resolve a ratio name or number
pub fn ratio_value(text: &str) -> Result<f64, FunctionError> {
    if let Some((_, ratio)) = NAMED_RATIOS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(text))
    {
        return Ok(*ratio);
    }

    match text.parse::<f64>() {
        Ok(ratio) if ratio.is_finite() && ratio > 0.0 => Ok(ratio),
        _ => Err(FunctionError::UnknownRatio(text.to_string())),
    }
}

fn length_px(d: &Dimension, ctx: &FunctionContext) -> Result<f64, FunctionError> {
    if d.is_unitless() {
        return Ok(d.value);
    }
    d.to_px(ctx.base_font_size())
        .ok_or_else(|| FunctionError::InvalidDimension(format!("{}{}", d.value, d.unit)))
}

fn viewport_px(text: &str, ctx: &FunctionContext) -> Result<f64, FunctionError> {
    length_px(&super::args::dimension(text)?, ctx)
}

/// Viewport bounds from positional arguments or a trailing options object
fn viewport_bounds(
    args: &Args<'_>,
    first: usize,
    ctx: &FunctionContext,
) -> Result<(f64, f64), FunctionError> {
    let options: Map<String, Value> = args.options().unwrap_or_default();
    let from_options = |key: &str| -> Result<Option<f64>, FunctionError> {
        options
            .get(key)
            .map(|value| length_px(&dimension_value(value)?, ctx))
            .transpose()
    };

    let positional = |position: usize| -> Result<Option<f64>, FunctionError> {
        if position >= args.positional_len() {
            return Ok(None);
        }
        args.optional(position)
            .map(|text| viewport_px(text, ctx))
            .transpose()
    };

    let min_vw = match from_options("minViewport")? {
        Some(v) => v,
        None => positional(first)?.unwrap_or(ctx.min_viewport()),
    };
    let max_vw = match from_options("maxViewport")? {
        Some(v) => v,
        None => positional(first + 1)?.unwrap_or(ctx.max_viewport()),
    };

    if max_vw <= min_vw {
        return Err(FunctionError::invalid_argument(
            "maxViewport",
            format!("must exceed minViewport ({}px), got {}px", min_vw, max_vw),
        ));
    }

    Ok((min_vw, max_vw))
}

/// Linear size between two viewports, formatted in `unit` (`unit_px` px per unit)
fn fluid_clamp(
    min_px: f64,
    max_px: f64,
    min_vw: f64,
    max_vw: f64,
    unit: &str,
    unit_px: f64,
    ctx: &FunctionContext,
) -> String {
    let slope = (max_px - min_px) / (max_vw - min_vw);
    let intercept = (min_px - slope * min_vw) / unit_px;
    let (low, high) = if min_px <= max_px {
        (min_px, max_px)
    } else {
        (max_px, min_px)
    };

    let offset = ctx.format(intercept.abs(), unit);
    let sign = if intercept < 0.0 && offset != format!("0{}", unit) {
        "-"
    } else {
        "+"
    };
    format!(
        "clamp({}, {}vw {} {}, {})",
        ctx.format(low / unit_px, unit),
        format_number(slope * 100.0, ctx.precision()),
        sign,
        offset,
        ctx.format(high / unit_px, unit),
    )
}

pub fn fluid_type(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(4)?;
    let min_px = length_px(&args.dimension(0, "min")?, ctx)?;
    let max_px = length_px(&args.dimension(1, "max")?, ctx)?;
    let (min_vw, max_vw) = viewport_bounds(&args, 2, ctx)?;
    Ok(fluid_clamp(
        min_px,
        max_px,
        min_vw,
        max_vw,
        "rem",
        ctx.base_font_size(),
        ctx,
    ))
}

pub fn fluid_space(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(4)?;
    let min = args.dimension(0, "min")?;
    let max = args.dimension(1, "max")?;
    let min_px = length_px(&min, ctx)?;
    let max_px = length_px(&max, ctx)?;
    let (min_vw, max_vw) = viewport_bounds(&args, 2, ctx)?;

    let (unit, unit_px) = match min.unit.as_str() {
        "rem" | "em" => (min.unit.as_str(), ctx.base_font_size()),
        _ => ("px", 1.0),
    };
    Ok(fluid_clamp(min_px, max_px, min_vw, max_vw, unit, unit_px, ctx))
}

pub fn modular_scale(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(3)?;
    let base = args.dimension(0, "base")?;
    let step = args.number(1, "step")?;
    let ratio = ratio_value(args.optional(2).unwrap_or(ctx.default_ratio()))?;
    Ok(ctx.format(base.value * ratio.powf(step), &base.unit))
}

pub fn type_scale(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(3)?;
    let name = args.required(0, "step")?;
    let step = TYPE_STEPS
        .iter()
        .find(|(step, _)| step.eq_ignore_ascii_case(name))
        .map(|(_, step)| *step)
        .ok_or_else(|| FunctionError::UnknownStep(name.to_string()))?;

    let base = match args.optional(1) {
        Some(_) => args.dimension(1, "base")?,
        None => Dimension::new(1.0, "rem"),
    };
    let ratio = ratio_value(args.optional(2).unwrap_or(ctx.default_ratio()))?;
    Ok(ctx.format(base.value * ratio.powi(step), &base.unit))
}

pub fn line_height(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(3)?;
    let font_px = length_px(&args.dimension(0, "fontSize")?, ctx)?;
    if font_px <= 0.0 {
        return Err(FunctionError::invalid_argument("fontSize", "must be positive"));
    }
    let ratio = match args.optional(1) {
        Some(_) => args.number(1, "ratio")?,
        None => DEFAULT_LINE_HEIGHT,
    };
    let grid = match args.optional(2) {
        Some(_) => length_px(&args.dimension(2, "grid")?, ctx)?,
        None => DEFAULT_GRID_PX,
    };
    if grid <= 0.0 {
        return Err(FunctionError::invalid_argument("grid", "must be positive"));
    }

    let line_box = ((font_px * ratio / grid).round() * grid).max(grid);
    Ok(format_number(line_box / font_px, ctx.precision()))
}

pub fn optimal_measure(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(2)?;
    let font_px = length_px(&args.dimension(0, "fontSize")?, ctx)?;
    let chars = match args.optional(1) {
        Some(_) => args.number(1, "chars")?,
        None => DEFAULT_MEASURE_CHARS,
    };
    let width_px = chars * AVERAGE_GLYPH_EM * font_px;
    Ok(ctx.format(width_px / ctx.base_font_size(), "rem"))
}

pub fn responsive_type(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(4)?;
    let base_px = length_px(&args.dimension(0, "base")?, ctx)?;
    let ratio = match args.optional(1) {
        Some(text) if args.positional_len() > 1 => ratio_value(text)?,
        _ => 1.25,
    };
    let (min_vw, max_vw) = viewport_bounds(&args, 2, ctx)?;
    Ok(fluid_clamp(
        base_px,
        base_px * ratio,
        min_vw,
        max_vw,
        "rem",
        ctx.base_font_size(),
        ctx,
    ))
}

pub fn letter_spacing(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(1)?;
    let font_px = length_px(&args.dimension(0, "fontSize")?, ctx)?;
    let tracking = ((NEUTRAL_TRACKING_PX - font_px) * TRACKING_PER_PX)
        .clamp(-MAX_TRACKING_EM, MAX_TRACKING_EM);
    Ok(ctx.format(tracking, "em"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn call(f: fn(&[String], &FunctionContext) -> FunctionResult, args: &[&str]) -> FunctionResult {
        let owned: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        f(&owned, &FunctionContext::default())
    }

    #[test]
    fn test_fluid_type_form() {
        assert_eq!(
            call(fluid_type, &["1rem", "2rem"]).unwrap(),
            "clamp(1rem, 1.6667vw + 0.6667rem, 2rem)"
        );
        assert_eq!(
            call(fluid_type, &["16px", "32px"]).unwrap(),
            "clamp(1rem, 1.6667vw + 0.6667rem, 2rem)"
        );
    }

    #[test]
    fn test_fluid_type_viewports() {
        let positional = call(fluid_type, &["1rem", "2rem", "400px", "1200px"]).unwrap();
        let object = call(
            fluid_type,
            &["1rem", "2rem", "{ minViewport: 400px, maxViewport: 1200px }"],
        )
        .unwrap();
        assert_eq!(positional, object);
        assert_eq!(positional, "clamp(1rem, 2vw + 0.5rem, 2rem)");

        assert_matches!(
            call(fluid_type, &["1rem", "2rem", "1200px", "400px"]),
            Err(FunctionError::InvalidArgument { name: "maxViewport", .. })
        );
    }

    #[test]
    fn test_fluid_shrinking_and_negative_intercept() {
        assert_eq!(
            call(fluid_type, &["2rem", "1rem"]).unwrap(),
            "clamp(1rem, -1.6667vw + 2.3333rem, 2rem)"
        );
        assert_eq!(
            call(fluid_type, &["1rem", "5rem"]).unwrap(),
            "clamp(1rem, 6.6667vw - 0.3333rem, 5rem)"
        );
    }

    #[test]
    fn test_fluid_space_keeps_unit() {
        assert_eq!(
            call(fluid_space, &["16px", "32px"]).unwrap(),
            "clamp(16px, 1.6667vw + 10.6667px, 32px)"
        );
        assert_eq!(
            call(fluid_space, &["1rem", "2rem"]).unwrap(),
            "clamp(1rem, 1.6667vw + 0.6667rem, 2rem)"
        );
    }

    #[test]
    fn test_modular_and_type_scale() {
        assert_eq!(call(modular_scale, &["1rem", "2"]).unwrap(), "1.5625rem");
        assert_eq!(call(modular_scale, &["16px", "1", "perfectFifth"]).unwrap(), "24px");
        assert_eq!(call(modular_scale, &["1rem", "-1", "2"]).unwrap(), "0.5rem");
        assert_matches!(
            call(modular_scale, &["1rem", "1", "wobbly"]),
            Err(FunctionError::UnknownRatio(_))
        );

        assert_eq!(call(type_scale, &["base"]).unwrap(), "1rem");
        assert_eq!(call(type_scale, &["xl"]).unwrap(), "1.5625rem");
        assert_eq!(call(type_scale, &["sm", "16px", "octave"]).unwrap(), "8px");
        assert_matches!(call(type_scale, &["huge"]), Err(FunctionError::UnknownStep(_)));
    }

    #[test]
    fn test_line_height_snaps_to_grid() {
        assert_eq!(call(line_height, &["16px"]).unwrap(), "1.5");
        assert_eq!(call(line_height, &["18px"]).unwrap(), "1.5556");
        assert_eq!(call(line_height, &["1rem", "1.2", "8px"]).unwrap(), "1");
    }

    #[test]
    fn test_measure_and_tracking() {
        assert_eq!(call(optimal_measure, &["16px"]).unwrap(), "33rem");
        assert_eq!(call(optimal_measure, &["1rem", "60"]).unwrap(), "30rem");

        assert_eq!(call(letter_spacing, &["16px"]).unwrap(), "0em");
        assert_eq!(call(letter_spacing, &["32px"]).unwrap(), "-0.016em");
        assert_eq!(call(letter_spacing, &["12px"]).unwrap(), "0.004em");
        assert_eq!(call(letter_spacing, &["6rem"]).unwrap(), "-0.05em");
    }

    #[test]
    fn test_responsive_type() {
        assert_eq!(
            call(responsive_type, &["1rem"]).unwrap(),
            call(fluid_type, &["1rem", "1.25rem"]).unwrap()
        );
        assert_eq!(
            call(responsive_type, &["1rem", "2"]).unwrap(),
            call(fluid_type, &["1rem", "2rem"]).unwrap()
        );
    }
}
