//! Dynamic options objects.
//!
//! Parses an untyped `serde_json::Value` (for example an options object read
//! from a request or a config file) into an [`IterConfig`], reporting the same
//! error kinds as the typed builder.

use serde_json::{Map, Number, Value};
use variate_engine::{Seed, StateBuffer};

use crate::config::{IterConfig, DEFAULT_ITER};
use crate::error::IterError;

/// Parses an options object.
///
/// Recognised keys are `iter`, `copy`, `seed` and `state`; unknown keys are
/// ignored. A `prng` key is always rejected because a function cannot be
/// expressed in an options object.
///
/// # Errors
///
/// - `InvalidOptions` if `value` is not an object
/// - `InvalidOption` for a field of the wrong type or shape
/// - Engine errors for seeds and states that are well-formed but out of range
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use variate_iter::{options::parse_options, ErrorKind};
///
/// let config = parse_options(&json!({ "iter": 10, "seed": [1234, 5678] })).unwrap();
/// assert_eq!(config.iter(), 10);
///
/// let err = parse_options(&json!({ "seed": 4294967296_u64 })).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::OutOfRange);
/// ```
pub fn parse_options(value: &Value) -> Result<IterConfig, IterError> {
    let object = value.as_object().ok_or_else(|| IterError::InvalidOptions {
        value: value.to_string(),
    })?;

    let mut builder = IterConfig::builder().iter(parse_iter(object)?);
    if let Some(copy) = parse_copy(object)? {
        builder = builder.copy(copy);
    }
    if let Some(seed) = parse_seed(object)? {
        builder = builder.seed(seed);
    }
    if let Some(state) = parse_state(object)? {
        builder = builder.state(state);
    }
    if let Some(prng) = object.get("prng") {
        return Err(IterError::InvalidOption {
            name: "prng",
            reason: format!("must be a function. Option: `{}`", prng),
        });
    }
    builder.build()
}

fn parse_iter(object: &Map<String, Value>) -> Result<u64, IterError> {
    match object.get("iter") {
        None => Ok(DEFAULT_ITER),
        Some(Value::Number(n)) => integer(n).ok_or_else(|| not_nonnegative_integer(n)),
        Some(other) => Err(invalid("iter", "must be a nonnegative integer", other)),
    }
}

fn not_nonnegative_integer(n: &Number) -> IterError {
    IterError::InvalidOption {
        name: "iter",
        reason: format!("must be a nonnegative integer. Option: `{}`", n),
    }
}

fn parse_copy(object: &Map<String, Value>) -> Result<Option<bool>, IterError> {
    match object.get("copy") {
        None => Ok(None),
        Some(Value::Bool(copy)) => Ok(Some(*copy)),
        Some(other) => Err(invalid("copy", "must be a boolean", other)),
    }
}

fn parse_seed(object: &Map<String, Value>) -> Result<Option<Seed>, IterError> {
    const EXPECTED: &str = "must be either a positive integer or a non-empty array of integers";

    let value = match object.get("seed") {
        None => return Ok(None),
        Some(value) => value,
    };
    match value {
        Value::Number(n) => match integer(n) {
            Some(word) if word > 0 => Ok(Some(Seed::Scalar(word))),
            _ => Err(invalid("seed", EXPECTED, value)),
        },
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(|item| match item {
                Value::Number(n) => integer(n),
                _ => None,
            })
            .collect::<Option<Vec<u64>>>()
            .map(|words| Some(Seed::Words(words)))
            .ok_or_else(|| invalid("seed", EXPECTED, value)),
        _ => Err(invalid("seed", EXPECTED, value)),
    }
}

fn parse_state(object: &Map<String, Value>) -> Result<Option<StateBuffer>, IterError> {
    const EXPECTED: &str = "must be an array of unsigned 32-bit integers";

    let value = match object.get("state") {
        None => return Ok(None),
        Some(value) => value,
    };
    let items = value
        .as_array()
        .ok_or_else(|| invalid("state", EXPECTED, value))?;
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|word| u32::try_from(word).ok())
                .ok_or_else(|| invalid("state", EXPECTED, value))
        })
        .collect::<Result<Vec<u32>, _>>()
        .map(|words| Some(StateBuffer::from(words)))
}

/// Nonnegative integral value of `n`, saturating at `u64::MAX`.
///
/// Integral floats such as `10.0` are accepted.
fn integer(n: &Number) -> Option<u64> {
    if let Some(value) = n.as_u64() {
        return Some(value);
    }
    match n.as_f64() {
        Some(x) if x.is_finite() && x >= 0.0 && x.fract() == 0.0 => Some(x as u64),
        _ => None,
    }
}

fn invalid(name: &'static str, expected: &str, value: &Value) -> IterError {
    IterError::InvalidOption {
        name,
        reason: format!("{}. Option: `{}`", expected, value),
    }
}
