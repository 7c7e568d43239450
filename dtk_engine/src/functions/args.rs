//! Argument access and typed parsing shared by every function family

use crate::catalog::FunctionError;
use crate::color::{parse_color, Rgba};
use dtk_core::parser::{parse_object_literal, try_parse_dimension, unquote, Dimension};
use serde_json::{Map, Value};

/// Positional arguments of one call
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    values: &'a [String],
}

impl<'a> Args<'a> {
    pub fn new(values: &'a [String]) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn all(&self) -> &'a [String] {
        self.values
    }

    /// Reject calls with more than `max` arguments
    pub fn at_most(&self, max: usize) -> Result<(), FunctionError> {
        if self.values.len() > max {
            Err(FunctionError::TooManyArguments {
                max,
                found: self.values.len(),
            })
        } else {
            Ok(())
        }
    }

    /// Unquoted argument at `position`, `None` when absent or empty
    pub fn optional(&self, position: usize) -> Option<&'a str> {
        self.values
            .get(position)
            .map(|s| unquote(s))
            .filter(|s| !s.is_empty())
    }

    pub fn required(&self, position: usize, name: &'static str) -> Result<&'a str, FunctionError> {
        self.optional(position)
            .ok_or(FunctionError::MissingArgument { name, position })
    }

    pub fn color(&self, position: usize, name: &'static str) -> Result<Rgba, FunctionError> {
        parse_color(self.required(position, name)?)
    }

    pub fn dimension(
        &self,
        position: usize,
        name: &'static str,
    ) -> Result<Dimension, FunctionError> {
        dimension(self.required(position, name)?)
    }

    pub fn number(&self, position: usize, name: &'static str) -> Result<f64, FunctionError> {
        number(self.required(position, name)?)
    }

    pub fn amount(&self, position: usize, name: &'static str) -> Result<f64, FunctionError> {
        amount(self.required(position, name)?)
    }

    /// Trailing `{ key: value }` options object, if the last argument is one
    pub fn options(&self) -> Option<Map<String, Value>> {
        self.values.last().and_then(|last| parse_object_literal(last))
    }

    /// Positional count excluding a trailing options object
    pub fn positional_len(&self) -> usize {
        if self.options().is_some() {
            self.values.len() - 1
        } else {
            self.values.len()
        }
    }
}

pub fn dimension(text: &str) -> Result<Dimension, FunctionError> {
    try_parse_dimension(text).ok_or_else(|| FunctionError::InvalidDimension(text.to_string()))
}

/// Plain number; a unit suffix is rejected
pub fn number(text: &str) -> Result<f64, FunctionError> {
    match try_parse_dimension(text) {
        Some(d) if d.is_unitless() => Ok(d.value),
        _ => Err(FunctionError::InvalidNumber(text.to_string())),
    }
}

/// Angle in degrees; accepts `deg`, `turn` and `rad` suffixes
pub fn degrees(text: &str) -> Result<f64, FunctionError> {
    let d = dimension(text)?;
    match d.unit.as_str() {
        "" | "deg" => Ok(d.value),
        "turn" => Ok(d.value * 360.0),
        "rad" => Ok(d.value.to_degrees()),
        _ => Err(FunctionError::invalid_argument(
            "angle",
            format!("'{}' is not an angle", text),
        )),
    }
}

/// Fraction from `20%` or `0.2`; bare numbers above 1 read as percentages
pub fn amount(text: &str) -> Result<f64, FunctionError> {
    let d = dimension(text)?;
    match d.unit.as_str() {
        "%" => Ok(d.value / 100.0),
        "" if d.value.abs() > 1.0 => Ok(d.value / 100.0),
        "" => Ok(d.value),
        _ => Err(FunctionError::invalid_argument(
            "amount",
            format!("'{}' must be a percentage or a fraction", text),
        )),
    }
}

/// Amount taken from an options object entry
pub fn amount_value(value: &Value) -> Result<f64, FunctionError> {
    match value {
        Value::Number(n) => {
            let v = n.as_f64().unwrap_or(0.0);
            Ok(if v.abs() > 1.0 { v / 100.0 } else { v })
        }
        Value::String(s) => amount(s),
        other => Err(FunctionError::InvalidNumber(other.to_string())),
    }
}

/// Dimension taken from an options object entry; bare numbers are unitless
pub fn dimension_value(value: &Value) -> Result<Dimension, FunctionError> {
    match value {
        Value::Number(n) => Ok(Dimension::unitless(n.as_f64().unwrap_or(0.0))),
        Value::String(s) => dimension(s),
        other => Err(FunctionError::InvalidDimension(other.to_string())),
    }
}

pub fn bool_string(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}
