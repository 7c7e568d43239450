//! Math family
//!
//! Unit-aware arithmetic on dimensions. px, rem, em and pt convert through the
//! configured base font size; results take the left operand's unit.

use super::args::{dimension, Args};
use crate::catalog::{FunctionCatalog, FunctionContext, FunctionError, FunctionFamily, FunctionResult};
use dtk_core::parser::Dimension;
use std::sync::Arc;

pub(crate) fn register(catalog: &mut FunctionCatalog) {
    let family = FunctionFamily::Math;
    let entries: [(&str, &str, &str, fn(&[String], &FunctionContext) -> FunctionResult); 15] = [
        ("multiply", "multiply(value, factor)", "Scale a dimension", multiply),
        ("divide", "divide(value, divisor)", "Divide a dimension", divide),
        ("add", "add(a, b)", "Sum in the left operand's unit", add),
        ("subtract", "subtract(a, b)", "Difference in the left operand's unit", subtract),
        ("round", "round(value, precision=0)", "Round to a number of decimals", round),
        ("floor", "floor(value, precision=0)", "Round down", floor),
        ("ceil", "ceil(value, precision=0)", "Round up", ceil),
        ("min", "min(a, b, ...)", "Smallest operand", min),
        ("max", "max(a, b, ...)", "Largest operand", max),
        ("clamp", "clamp(value, min, max)", "Constrain a value to a range", clamp),
        ("convert", "convert(value, unit)", "Convert between px, rem, em and pt", convert),
        ("mod", "mod(a, b)", "Remainder of a / b", modulo),
        ("abs", "abs(value)", "Absolute value", abs),
        ("negate", "negate(value)", "Flip the sign", negate),
        ("percent", "percent(part, whole)", "part / whole as a percentage", percent),
    ];

    for (name, signature, description, function) in entries {
        catalog.insert(name, family, signature, description, Arc::new(function));
    }
}

fn label(d: &Dimension) -> String {
    d.to_string()
}

/// `other` expressed in `target`'s unit; unitless operands adopt the other unit
fn align(target: &Dimension, other: &Dimension, ctx: &FunctionContext) -> Result<(f64, f64, String), FunctionError> {
    if target.unit == other.unit {
        return Ok((target.value, other.value, target.unit.clone()));
    }
    if target.is_unitless() {
        return Ok((target.value, other.value, other.unit.clone()));
    }
    if other.is_unitless() {
        return Ok((target.value, other.value, target.unit.clone()));
    }

    let converted = other
        .convert_to(&target.unit, ctx.base_font_size())
        .ok_or_else(|| FunctionError::incompatible_units(&label(target), &label(other)))?;
    Ok((target.value, converted.value, target.unit.clone()))
}

fn binary(args: &[String]) -> Result<(Dimension, Dimension), FunctionError> {
    let args = Args::new(args);
    args.at_most(2)?;
    Ok((args.dimension(0, "a")?, args.dimension(1, "b")?))
}

fn unary(args: &[String]) -> Result<Dimension, FunctionError> {
    let args = Args::new(args);
    args.at_most(1)?;
    args.dimension(0, "value")
}

pub fn add(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let (a, b) = binary(args)?;
    let (a, b, unit) = align(&a, &b, ctx)?;
    Ok(ctx.format(a + b, &unit))
}

pub fn subtract(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let (a, b) = binary(args)?;
    let (a, b, unit) = align(&a, &b, ctx)?;
    Ok(ctx.format(a - b, &unit))
}

pub fn multiply(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let (value, factor) = binary(args)?;
    match (value.is_unitless(), factor.is_unitless()) {
        (_, true) => Ok(ctx.format(value.value * factor.value, &value.unit)),
        (true, false) => Ok(ctx.format(value.value * factor.value, &factor.unit)),
        (false, false) => Err(FunctionError::incompatible_units(
            &label(&value),
            &label(&factor),
        )),
    }
}

pub fn divide(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let (value, divisor) = binary(args)?;
    if divisor.value == 0.0 {
        return Err(FunctionError::division_by_zero("divide"));
    }

    if divisor.is_unitless() {
        return Ok(ctx.format(value.value / divisor.value, &value.unit));
    }
    if value.is_unitless() {
        return Err(FunctionError::incompatible_units(
            &label(&value),
            &label(&divisor),
        ));
    }

    let (a, b, _) = align(&value, &divisor, ctx)?;
    Ok(ctx.format(a / b, ""))
}

pub fn modulo(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let (a, b) = binary(args)?;
    if b.value == 0.0 {
        return Err(FunctionError::division_by_zero("mod"));
    }
    let (a, b, unit) = align(&a, &b, ctx)?;
    Ok(ctx.format(a % b, &unit))
}

fn rounded(args: &[String], ctx: &FunctionContext, op: fn(f64) -> f64) -> FunctionResult {
    let args = Args::new(args);
    args.at_most(2)?;
    let value = args.dimension(0, "value")?;
    let places = match args.optional(1) {
        Some(_) => args.number(1, "precision")?,
        None => 0.0,
    };
    if !(0.0..=f64::from(ctx.precision())).contains(&places) || places.fract() != 0.0 {
        return Err(FunctionError::invalid_argument(
            "precision",
            format!("must be a whole number between 0 and {}", ctx.precision()),
        ));
    }

    let factor = 10f64.powi(places as i32);
    Ok(ctx.format(op(value.value * factor) / factor, &value.unit))
}

pub fn round(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    rounded(args, ctx, f64::round)
}

pub fn floor(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    rounded(args, ctx, f64::floor)
}

pub fn ceil(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    rounded(args, ctx, f64::ceil)
}

/// Fold operands into the first operand's unit, keeping the one `pick` prefers
fn extreme(args: &[String], ctx: &FunctionContext, pick: fn(f64, f64) -> bool) -> FunctionResult {
    let first = Args::new(args).dimension(0, "a")?;
    let mut best = first.value;
    let mut unit = first.unit.clone();

    for text in &args[1..] {
        let other = dimension(text)?;
        let reference = Dimension::new(best, &unit);
        let (current, candidate, aligned_unit) = align(&reference, &other, ctx)?;
        unit = aligned_unit;
        best = if pick(candidate, current) { candidate } else { current };
    }

    Ok(ctx.format(best, &unit))
}

pub fn min(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    extreme(args, ctx, |candidate, current| candidate < current)
}

pub fn max(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    extreme(args, ctx, |candidate, current| candidate > current)
}

pub fn clamp(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let parsed = Args::new(args);
    parsed.at_most(3)?;
    let value = parsed.dimension(0, "value")?;
    let low = parsed.dimension(1, "min")?;
    let high = parsed.dimension(2, "max")?;

    let (v, lo, unit) = align(&value, &low, ctx)?;
    let (_, hi, _) = align(&Dimension::new(v, &unit), &high, ctx)?;
    if lo > hi {
        return Err(FunctionError::invalid_argument(
            "min",
            format!("{} is greater than max {}", label(&low), label(&high)),
        ));
    }

    Ok(ctx.format(v.clamp(lo, hi), &unit))
}

pub fn convert(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let parsed = Args::new(args);
    parsed.at_most(2)?;
    let value = parsed.dimension(0, "value")?;
    let unit = parsed.required(1, "unit")?;

    let converted = value
        .convert_to(unit, ctx.base_font_size())
        .ok_or_else(|| FunctionError::incompatible_units(&label(&value), unit))?;
    Ok(ctx.format(converted.value, &converted.unit))
}

pub fn abs(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let value = unary(args)?;
    Ok(ctx.format(value.value.abs(), &value.unit))
}

pub fn negate(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let value = unary(args)?;
    Ok(ctx.format(-value.value, &value.unit))
}

pub fn percent(args: &[String], ctx: &FunctionContext) -> FunctionResult {
    let parsed = Args::new(args);
    parsed.at_most(2)?;
    let part = parsed.dimension(0, "part")?;
    let whole = parsed.dimension(1, "whole")?;
    if whole.value == 0.0 {
        return Err(FunctionError::division_by_zero("percent"));
    }
    let (part, whole, _) = align(&part, &whole, ctx)?;
    Ok(ctx.format(part / whole * 100.0, "%"))
}
