use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{
    de::{self, Visitor},
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use sqlx::Type;
use thiserror::Error;

pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

// f64 holds every integer up to 2^53 exactly. Anything larger cannot round-trip through JSON numbers.
const MAX_MINOR_UNITS: f64 = 9_007_199_254_740_992.0;

//--------------------------------------     FeeAmount       ---------------------------------------------------------
/// A fee amount, held as an integer number of minor currency units (e.g. paise).
///
/// On the wire, amounts are decimal numbers in major units (`1500`, `1500.5`). Whole amounts serialize as JSON
/// integers. Values with more than two decimal places are rounded to the nearest minor unit.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[sqlx(transparent)]
pub struct FeeAmount(i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeAmountError {
    #[error("Amount is not a finite number")]
    NotFinite,
    #[error("Amount {0} is too large to be represented")]
    OutOfRange(String),
    #[error("Amount is not a valid number: {0}")]
    InvalidFormat(String),
}

impl From<i64> for FeeAmount {
    fn from(minor_units: i64) -> Self {
        Self(minor_units)
    }
}

impl FeeAmount {
    /// The amount in minor units.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_major(major: i64) -> Self {
        Self(major * MINOR_UNITS_PER_MAJOR)
    }

    /// Converts a decimal amount in major units, rounding to the nearest minor unit.
    pub fn try_from_major_f64(major: f64) -> Result<Self, FeeAmountError> {
        if !major.is_finite() {
            return Err(FeeAmountError::NotFinite);
        }
        #[allow(clippy::cast_precision_loss)]
        let minor = (major * MINOR_UNITS_PER_MAJOR as f64).round();
        if minor.abs() >= MAX_MINOR_UNITS {
            return Err(FeeAmountError::OutOfRange(major.to_string()));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(minor as i64))
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / MINOR_UNITS_PER_MAJOR as f64
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// The shortest decimal representation in major units: `1500`, `1500.5`, `1500.55`.
    pub fn to_gateway_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / MINOR_UNITS_PER_MAJOR.unsigned_abs();
        let minor = abs % MINOR_UNITS_PER_MAJOR.unsigned_abs();
        match minor {
            0 => format!("{sign}{major}"),
            m if m % 10 == 0 => format!("{sign}{major}.{}", m / 10),
            m => format!("{sign}{major}.{m:02}"),
        }
    }
}

impl Display for FeeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = MINOR_UNITS_PER_MAJOR.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / units, abs % units)
    }
}

impl FromStr for FeeAmount {
    type Err = FeeAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<f64>().map_err(|e| FeeAmountError::InvalidFormat(format!("{s}. {e}")))?;
        Self::try_from_major_f64(value)
    }
}

impl Serialize for FeeAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MINOR_UNITS_PER_MAJOR == 0 {
            serializer.serialize_i64(self.0 / MINOR_UNITS_PER_MAJOR)
        } else {
            serializer.serialize_f64(self.to_major_f64())
        }
    }
}

struct FeeAmountVisitor;

impl<'de> Visitor<'de> for FeeAmountVisitor {
    type Value = FeeAmount;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal amount in major currency units")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        v.checked_mul(MINOR_UNITS_PER_MAJOR)
            .map(FeeAmount)
            .ok_or_else(|| E::custom(FeeAmountError::OutOfRange(v.to_string())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let v = i64::try_from(v).map_err(|_| E::custom(FeeAmountError::OutOfRange(v.to_string())))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        FeeAmount::try_from_major_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        FeeAmount::from_str(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for FeeAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FeeAmountVisitor)
    }
}
