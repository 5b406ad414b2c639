use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The single dynamic value kind held by the operand stack, locals and
/// `const` immediates. Comparisons produce booleans; everything else is
/// a 64-bit float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Boolean(bool),
}

impl Value {
    /// Numeric view, with booleans reading as 1.0/0.0.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Number(n) => n,
            Value::Boolean(true) => 1.0,
            Value::Boolean(false) => 0.0,
        }
    }

    /// Truthiness as consumed by `br_if`.
    #[inline]
    pub fn is_truthy(self) -> bool {
        match self {
            Value::Number(n) => n != 0.0,
            Value::Boolean(b) => b,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}
