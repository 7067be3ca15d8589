//! Numeric scores (confidences and thresholds) that keep their source form.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;

/// A confidence value or threshold as written in the input.
///
/// Integral inputs stay integers so `1` renders as `1`, while fractional
/// inputs render in shortest round-trip form with an exponent outside
/// `1e-4..1e16` (`1.0`, `0.95`, `1e-05`). Comparisons use the numeric value.
#[derive(Clone, Copy, Debug)]
pub enum Score {
    /// Whole number read from an integer literal.
    Integer(i64),
    /// Number read from a fractional or exponent literal.
    Float(f64),
}

impl Score {
    /// Zero as an integer.
    pub const ZERO: Self = Self::Integer(0);

    /// Returns the value used for comparisons.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(self) -> f64 {
        match self {
            Self::Integer(n) => n as f64,
            Self::Float(v) => v,
        }
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for Score {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl PartialEq for Score {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value().partial_cmp(&other.value())
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => Display::fmt(n, f),
            Self::Float(v) => f.write_str(&render_float(*v)),
        }
    }
}

#[allow(clippy::float_cmp)]
fn render_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".into();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.into();
    }
    let sign = if v.is_sign_negative() { "-" } else { "" };
    if v == 0.0 {
        return format!("{sign}0.0");
    }

    // `{:e}` yields the shortest round-trip digits, e.g. `9.5e-1`.
    let scientific = format!("{:e}", v.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return v.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return v.to_string();
    };
    let digits = mantissa.replace('.', "");

    let body = if (-4..16).contains(&exponent) {
        if exponent < 0 {
            let zeros = usize::try_from(-exponent - 1).unwrap_or_default();
            format!("0.{}{digits}", "0".repeat(zeros))
        } else {
            let point = usize::try_from(exponent).unwrap_or_default() + 1;
            if digits.len() > point {
                format!("{}.{}", &digits[..point], &digits[point..])
            } else {
                format!("{digits}{}.0", "0".repeat(point - digits.len()))
            }
        }
    } else {
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{exponent_sign}{:02}", exponent.unsigned_abs())
    };
    format!("{sign}{body}")
}

impl Serialize for Score {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Integer(n) => n.serialize(serializer),
            Self::Float(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = Number::deserialize(deserializer)?;
        match (number.as_i64(), number.as_f64()) {
            (Some(n), _) => Ok(Self::Integer(n)),
            (None, Some(v)) => Ok(Self::Float(v)),
            (None, None) => Err(serde::de::Error::custom(format!(
                "{number} is not representable as a score"
            ))),
        }
    }
}
