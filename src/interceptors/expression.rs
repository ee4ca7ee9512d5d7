//! Property expression expansion.

use super::{ConfigSourceInterceptor, InterceptorContext};
use crate::core::ConfigValue;
use crate::error::{ConfigError, Result};

/// Maximum nesting of expressions before expansion is aborted.
const MAX_DEPTH: usize = 32;

/// Expands `${key}` and `${key:default}` references inside values.
///
/// - `${key}` is replaced by the value of `key`; a missing key is an error.
/// - `${key:default}` falls back to `default`, which may itself contain
///   expressions.
/// - `$${` produces a literal `${`.
///
/// Referenced keys are resolved through the part of the chain below this
/// interceptor, so profiles, relocations and fallbacks apply to them.
#[derive(Debug, Default)]
pub struct ExpressionInterceptor;

impl ExpressionInterceptor {
    /// Create an expression interceptor.
    pub fn new() -> Self {
        Self
    }

    fn expand(
        &self,
        context: &dyn InterceptorContext,
        name: &str,
        input: &str,
        depth: usize,
    ) -> Result<String> {
        if depth > MAX_DEPTH {
            return Err(ConfigError::expression(
                name,
                format!("expression nesting exceeds {} levels", MAX_DEPTH),
            ));
        }

        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(i) = rest.find('$') {
            out.push_str(&rest[..i]);
            let tail = &rest[i..];
            if let Some(after) = tail.strip_prefix("$${") {
                out.push_str("${");
                rest = after;
            } else if let Some(after) = tail.strip_prefix("${") {
                let end = closing_brace(after).ok_or_else(|| {
                    ConfigError::expression(name, format!("unclosed expression in '{}'", input))
                })?;
                out.push_str(&self.resolve(context, name, &after[..end], depth)?);
                rest = &after[end + 1..];
            } else {
                out.push('$');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        Ok(out)
    }

    fn resolve(
        &self,
        context: &dyn InterceptorContext,
        name: &str,
        body: &str,
        depth: usize,
    ) -> Result<String> {
        let (key, default) = match default_separator(body) {
            Some(index) => (&body[..index], Some(&body[index + 1..])),
            None => (body, None),
        };
        let key = self.expand(context, name, key, depth + 1)?;
        if key.is_empty() {
            return Err(ConfigError::expression(name, "empty expression '${}'"));
        }

        match context.proceed(&key)? {
            Some(value) => self.expand(context, &key, value.value(), depth + 1),
            None => match default {
                Some(default) => self.expand(context, name, default, depth + 1),
                None => Err(ConfigError::no_such_element(key)),
            },
        }
    }
}

/// Index of the `}` closing an expression body, accounting for nesting.
fn closing_brace(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(index),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Index of the first `:` not inside a nested expression.
fn default_separator(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => return Some(index),
            _ => {}
        }
    }
    None
}

impl ConfigSourceInterceptor for ExpressionInterceptor {
    fn get_value(
        &self,
        context: &dyn InterceptorContext,
        name: &str,
    ) -> Result<Option<ConfigValue>> {
        let Some(value) = context.proceed(name)? else {
            return Ok(None);
        };
        if !value.value().contains('$') {
            return Ok(Some(value));
        }

        let expanded = self.expand(context, name, value.value(), 0)?;
        Ok(Some(value.with_value(expanded)))
    }
}
