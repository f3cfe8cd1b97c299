// ── Unit and value transforms ──
//
// Pure mappings between the raw values the cloud stores (enum codes,
// Celsius, grace-period codes) and the values callers see. Schema entries
// bind these to raw keys; see `property`.

use std::sync::Arc;

use serde_json::{Number, Value};

use crate::error::CoreError;
use crate::model::TempUnit;
use crate::property::PropertyHost;

/// Getter transform: host plus the raw value (`None` when the entry has no
/// source key or the key is absent).
pub type GetFn =
    Arc<dyn Fn(&dyn PropertyHost, Option<&Value>) -> Result<Value, CoreError> + Send + Sync>;

/// Setter transform: host plus the caller's value, returning the raw value
/// to store.
pub type SetFn = Arc<dyn Fn(&dyn PropertyHost, Value) -> Result<Value, CoreError> + Send + Sync>;

// ── Enum tables ─────────────────────────────────────────────────────

/// User-facing side of an enum table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Text(&'static str),
    Int(i64),
}

impl Label {
    pub fn to_value(self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.to_owned()),
            Self::Int(n) => Value::Number(n.into()),
        }
    }

    /// Whether `value` names this label, either in the label's own type or
    /// as its string rendering.
    fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Text(s), Value::String(v)) => s == v,
            (Self::Int(n), Value::String(v)) => v.trim().parse::<i64>() == Ok(n),
            (Self::Int(n), Value::Number(_)) => as_code(value) == Some(n),
            _ => false,
        }
    }
}

/// Static code-to-label table such as the grace period or an event state.
#[derive(Debug)]
pub struct EnumTable {
    pub name: &'static str,
    pub entries: &'static [(i64, Label)],
}

impl EnumTable {
    pub fn label(&self, code: i64) -> Option<Label> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
    }

    /// Decode a raw code. Unknown or missing codes decode to `Null`.
    pub fn lookup(&self, raw: Option<&Value>) -> Value {
        raw.and_then(as_code)
            .and_then(|code| self.label(code))
            .map_or(Value::Null, Label::to_value)
    }

    /// Encode a label back to its code; the first matching entry wins.
    pub fn reverse_lookup(&self, label: &Value) -> Result<i64, CoreError> {
        self.entries
            .iter()
            .find(|(_, l)| l.matches(label))
            .map(|(code, _)| *code)
            .ok_or_else(|| {
                CoreError::range(format!("{label} is not a valid {} value", self.name))
            })
    }

    /// All labels in table order.
    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().map(|(_, l)| l.to_value()).collect()
    }
}

/// Normalize a raw enum code: integers, integral floats, numeric strings
/// and booleans (`false` is 0, `true` is 1).
pub fn as_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract().abs() < f64::EPSILON)
                .map(|f| {
                    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
                    let code = f as i64;
                    code
                })
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

// ── Numeric helpers ─────────────────────────────────────────────────

pub fn celsius_to_fahrenheit(x: f64, is_delta: bool) -> f64 {
    x * 9.0 / 5.0 + if is_delta { 0.0 } else { 32.0 }
}

pub fn fahrenheit_to_celsius(x: f64, is_delta: bool) -> f64 {
    (x - if is_delta { 0.0 } else { 32.0 }) * 5.0 / 9.0
}

pub fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}

/// JSON number from a float; non-finite values become `Null`.
pub fn number(x: f64) -> Value {
    Number::from_f64(x).map_or(Value::Null, Value::Number)
}

fn present(raw: Option<&Value>) -> Option<&Value> {
    raw.filter(|v| !v.is_null())
}

fn require_f64(value: &Value, what: &str) -> Result<f64, CoreError> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| CoreError::range(format!("{what} expects a number, got {value}")))
}

// ── Transform constructors ──────────────────────────────────────────

pub(crate) fn getter<F>(f: F) -> GetFn
where
    F: Fn(&dyn PropertyHost, Option<&Value>) -> Result<Value, CoreError> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub(crate) fn setter<F>(f: F) -> SetFn
where
    F: Fn(&dyn PropertyHost, Value) -> Result<Value, CoreError> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub fn identity() -> GetFn {
    getter(|_, raw| Ok(raw.cloned().unwrap_or(Value::Null)))
}

pub fn identity_set() -> SetFn {
    setter(|_, value| Ok(value))
}

pub fn enum_get(table: &'static EnumTable) -> GetFn {
    getter(move |_, raw| Ok(table.lookup(raw)))
}

pub fn enum_set(table: &'static EnumTable) -> SetFn {
    setter(move |_, value| table.reverse_lookup(&value).map(Value::from))
}

/// Derived accessor listing the labels of a table.
pub fn enum_values(table: &'static EnumTable) -> GetFn {
    getter(move |_, _| Ok(Value::Array(table.values())))
}

/// Numeric reading rounded to a fixed number of decimals.
pub fn rounded(decimals: i32) -> GetFn {
    getter(move |_, raw| match present(raw) {
        Some(v) => Ok(number(round_to(require_f64(v, "reading")?, decimals))),
        None => Ok(Value::Null),
    })
}

/// Raw 0/1 or boolean flag exposed as a boolean.
pub fn flag() -> GetFn {
    getter(|_, raw| {
        Ok(match present(raw) {
            Some(Value::Bool(b)) => Value::Bool(*b),
            Some(v) => as_code(v).map_or(Value::Null, |c| Value::Bool(c != 0)),
            None => Value::Null,
        })
    })
}

// ── Temperature ─────────────────────────────────────────────────────

/// Celsius from the store, converted to the host's configured unit.
pub fn to_native_temp(is_delta: bool) -> GetFn {
    getter(move |host, raw| {
        let Some(v) = present(raw) else {
            return Ok(Value::Null);
        };
        let celsius = require_f64(v, "temperature")?;
        Ok(number(native(host.temp_unit()?, celsius, is_delta)))
    })
}

/// A value in the host's configured unit, converted back to Celsius.
pub fn from_native_temp(is_delta: bool) -> SetFn {
    setter(move |host, value| {
        let x = require_f64(&value, "temperature")?;
        let celsius = match host.temp_unit()? {
            Some(TempUnit::DegF) => fahrenheit_to_celsius(x, is_delta),
            Some(TempUnit::DegC) | None => x,
        };
        Ok(number(celsius))
    })
}

/// Temperature reading in the configured unit, at the tag's precision.
pub fn temp_reading() -> GetFn {
    getter(|host, raw| {
        let Some(v) = present(raw) else {
            return Ok(Value::Null);
        };
        let celsius = require_f64(v, "temperature")?;
        let decimals = if host.high_precision_temp() { 2 } else { 1 };
        Ok(number(round_to(
            native(host.temp_unit()?, celsius, false),
            decimals,
        )))
    })
}

fn native(unit: Option<TempUnit>, celsius: f64, is_delta: bool) -> f64 {
    match unit {
        Some(TempUnit::DegF) => celsius_to_fahrenheit(celsius, is_delta),
        Some(TempUnit::DegC) | None => celsius,
    }
}
