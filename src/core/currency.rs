use crate::domain::model::Field;
use crate::utils::error::{Result, ServiceError};
use serde_json::Value;

/// Formats an amount the way the en_US monetary locale does: `$1,234.50`,
/// `-$3.00`. Amounts are rounded half away from zero to whole cents.
/// Returns `None` when the amount is not finite or its cents overflow `u64`.
pub fn format_currency(amount: f64) -> Option<String> {
    let cents = to_cents(amount)?;
    let sign = if amount.is_sign_negative() && cents != 0 {
        "-"
    } else {
        ""
    };

    Some(format!(
        "{}${}.{:02}",
        sign,
        group_thousands(cents / 100),
        cents % 100
    ))
}

fn to_cents(amount: f64) -> Option<u64> {
    let cents = (amount.abs() * 100.0).round();
    // `u64::MAX as f64` rounds up to 2^64, which itself does not fit.
    if cents.is_finite() && cents < u64::MAX as f64 {
        Some(cents as u64)
    } else {
        None
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Reads a field value as an amount. Absent and falsy values (`null`,
/// `false`, `0`, `""`, `"0"`) count as zero.
pub fn amount_from_value(field: Field, value: Option<&Value>) -> Result<f64> {
    let invalid = |reason: String| ServiceError::InvalidFieldValueError { field, reason };

    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(0.0),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(amount) if to_cents(amount).is_some() => Ok(amount),
            _ => Err(invalid(format!("{} is out of range for an amount", n))),
        },
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            match trimmed.parse::<f64>() {
                Ok(amount) if amount.is_finite() => match to_cents(amount) {
                    Some(_) => Ok(amount),
                    None => Err(invalid(format!("'{}' is out of range for an amount", s))),
                },
                _ => Err(invalid(format!("'{}' is not a number", s))),
            }
        }
        Some(other) => Err(invalid(format!(
            "expected a number, got {}",
            value_kind(other)
        ))),
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
