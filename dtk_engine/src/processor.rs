//! Expression processor
//!
//! Evaluates one token value in a single pass: references are substituted first and
//! a referenced token whose text is a call is evaluated while it is still on the
//! reference chain. A value that is a call expression is then evaluated depth-first.
//! Two guards keep evaluation finite: the reference chain carried by
//! [`ReferenceResolver`] and the call-signature stack threaded through
//! [`ExpressionProcessor::evaluate`]. Neither ever escapes a call.

use crate::catalog::{FunctionCatalog, FunctionContext};
use dtk_core::logging::{codes, DiagnosticCollector, LogEvent};
use dtk_core::parser::{is_function_call, parse_function_call};
use dtk_core::references::{contains_reference, ReferenceResolver};
use dtk_core::tree::TokenTree;
use dtk_core::log_debug;
use serde_json::Value;

/// Evaluates values against one tree with one catalog
#[derive(Debug, Clone, Copy)]
pub struct ExpressionProcessor<'a> {
    catalog: &'a FunctionCatalog,
    context: &'a FunctionContext,
    resolver: ReferenceResolver<'a>,
}

impl<'a> ExpressionProcessor<'a> {
    pub fn new(
        catalog: &'a FunctionCatalog,
        context: &'a FunctionContext,
        tree: &'a TokenTree,
    ) -> Self {
        Self {
            catalog,
            context,
            resolver: ReferenceResolver::new(tree),
        }
    }

    /// Resolve a token value. Non-string values pass through untouched.
    ///
    /// A value whose references run into a cycle is returned as written.
    pub fn process(&self, value: &Value, collector: &mut DiagnosticCollector) -> Value {
        let Value::String(source) = value else {
            return value.clone();
        };

        let cycles_before = collector.count(codes::references::REFERENCE_CYCLE);
        let mut stack = Vec::new();
        let resolved = self.resolver.resolve_value_with(
            value,
            &mut Vec::new(),
            collector,
            &mut |text: String, collector: &mut DiagnosticCollector| {
                self.evaluate_expanded(text, &mut stack, collector)
            },
        );

        if collector.count(codes::references::REFERENCE_CYCLE) > cycles_before {
            log_debug!("Value left as written after a reference cycle",
                "value" => source
            );
            return value.clone();
        }

        match resolved {
            Value::String(text) if is_function_call(&text) => {
                Value::String(self.evaluate(&text, &mut stack, collector))
            }
            other => other,
        }
    }

    /// Resolve a string value; typed whole-value references come back as text
    pub fn process_str(&self, value: &str, collector: &mut DiagnosticCollector) -> String {
        match self.process(&Value::String(value.to_string()), collector) {
            Value::String(text) => text,
            typed => typed.to_string(),
        }
    }

    /// Text of a referenced token, evaluated when it is a call with nothing left to resolve
    fn evaluate_expanded(
        &self,
        text: String,
        stack: &mut Vec<String>,
        collector: &mut DiagnosticCollector,
    ) -> String {
        if is_function_call(&text) && !contains_reference(&text) {
            self.evaluate(&text, stack, collector)
        } else {
            text
        }
    }

    /// Evaluate one call expression.
    ///
    /// `expr` is taken as already reference-resolved; placeholders still in it reach
    /// functions as plain text. `stack` holds the signatures of calls currently being
    /// evaluated. On any failure the expression text comes back unchanged and a
    /// diagnostic is recorded.
    pub fn evaluate(
        &self,
        expr: &str,
        stack: &mut Vec<String>,
        collector: &mut DiagnosticCollector,
    ) -> String {
        let Some(call) = parse_function_call(expr) else {
            return expr.to_string();
        };

        let signature = call.signature();
        if stack.contains(&signature) {
            collector.record(
                LogEvent::warning_with_code(
                    codes::functions::REENTRANT_CALL,
                    &format!("Re-entrant call to '{}'", call.name),
                )
                .with_context("call", &signature)
                .with_context("depth", &stack.len().to_string()),
            );
            return expr.to_string();
        }

        stack.push(signature);
        let result = self.apply(expr, &call.name, &call.args, stack, collector);
        stack.pop();
        result
    }

    fn apply(
        &self,
        expr: &str,
        name: &str,
        raw_args: &[String],
        stack: &mut Vec<String>,
        collector: &mut DiagnosticCollector,
    ) -> String {
        let args: Vec<String> = raw_args
            .iter()
            .map(|arg| {
                if is_function_call(arg) {
                    self.evaluate(arg, stack, collector)
                } else {
                    arg.clone()
                }
            })
            .collect();

        let Some(outcome) = self.catalog.call(name, &args, self.context) else {
            return self.unknown_function(expr, name, &args, collector);
        };

        match outcome {
            Ok(value) => {
                log_debug!("Function evaluated",
                    "call" => expr,
                    "result" => &value
                );
                value
            }
            Err(_) if self.context.config().is_css_passthrough(name) => {
                self.css_passthrough(expr, name, &args, collector)
            }
            Err(error) => {
                collector.record(
                    LogEvent::warning_with_code(
                        codes::functions::FUNCTION_FAILED,
                        &format!("{} failed: {}", name, error),
                    )
                    .with_context("call", expr)
                    .with_context("function", name),
                );
                expr.to_string()
            }
        }
    }

    fn unknown_function(
        &self,
        expr: &str,
        name: &str,
        args: &[String],
        collector: &mut DiagnosticCollector,
    ) -> String {
        if self.context.config().is_css_passthrough(name) {
            return self.css_passthrough(expr, name, args, collector);
        }

        collector.record(
            LogEvent::warning_with_code(
                codes::functions::UNKNOWN_FUNCTION,
                &format!("Unknown function '{}'", name),
            )
            .with_context("call", expr)
            .with_context("function", name),
        );
        expr.to_string()
    }

    /// Native CSS call rebuilt from its evaluated arguments
    fn css_passthrough(
        &self,
        expr: &str,
        name: &str,
        args: &[String],
        collector: &mut DiagnosticCollector,
    ) -> String {
        collector.record(
            LogEvent::debug_with_code(
                codes::functions::CSS_PASSTHROUGH,
                &format!("'{}' is a CSS function, left for the browser", name),
            )
            .with_context("call", expr),
        );
        format!("{}({})", name, args.join(", "))
    }
}
