//! Numeric coercion of indicator cells.
//!
//! B_i: Source cells are numbers. When they are not, the cell becomes
//! missing and is counted; a bad cell never fails the whole load.

use serde_json::Value;

/// Result of coercing one attribute cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Coerced {
    Number(f64),
    /// Explicit null or absent cell
    Null,
    /// Present but not numeric
    Invalid,
}

impl Coerced {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(v),
            Self::Null | Self::Invalid => None,
        }
    }
}

/// Coerce a JSON cell to a finite number.
pub(crate) fn coerce(cell: Option<&Value>) -> Coerced {
    let number = match cell {
        None | Some(Value::Null) => return Coerced::Null,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Array(_) | Value::Object(_)) => None,
    };
    match number {
        Some(v) if v.is_finite() => Coerced::Number(v),
        _ => Coerced::Invalid,
    }
}
