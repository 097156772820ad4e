//! Typed value coercion
//!
//! Config values are stored as strings. These helpers convert them to
//! booleans, integers with size suffixes, and floats, and normalize
//! values for keys with a known type.

use crate::error::ConfigError;

/// Default for a known config key, tagged with its type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    U64(u64),
    Float(f32),
    Double(f64),
    Str(&'static str),
}

impl DefaultValue {
    /// Type label for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            DefaultValue::Bool(_) => "bool",
            DefaultValue::Int(_) => "int",
            DefaultValue::Long(_) => "long",
            DefaultValue::U64(_) => "u64",
            DefaultValue::Float(_) => "float",
            DefaultValue::Double(_) => "double",
            DefaultValue::Str(_) => "string",
        }
    }

    /// Render the default in canonical form
    pub fn render(&self) -> String {
        match self {
            DefaultValue::Bool(b) => canonical_bool(*b).to_string(),
            DefaultValue::Int(n) => n.to_string(),
            DefaultValue::Long(n) => n.to_string(),
            DefaultValue::U64(n) => n.to_string(),
            DefaultValue::Float(n) => n.to_string(),
            DefaultValue::Double(n) => n.to_string(),
            DefaultValue::Str(s) => s.to_string(),
        }
    }

    /// Coerce `value` through this key's type and render the result in
    /// canonical form. `key` is only used for error messages.
    pub fn normalize(&self, key: &str, value: Option<&str>) -> Result<String, ConfigError> {
        match self {
            DefaultValue::Bool(_) => {
                let b = config_bool(key, value)?;
                Ok(canonical_bool(b).to_string())
            }
            DefaultValue::Int(_) => {
                let n = config_int(key, value)?;
                let n = i32::try_from(n).map_err(|_| ConfigError::bad_value(key))?;
                Ok(n.to_string())
            }
            DefaultValue::Long(_) => Ok(config_int(key, value)?.to_string()),
            DefaultValue::U64(_) => Ok(config_u64(key, value)?.to_string()),
            DefaultValue::Float(_) => Ok((config_double(key, value)? as f32).to_string()),
            DefaultValue::Double(_) => Ok(config_double(key, value)?.to_string()),
            DefaultValue::Str(_) => Ok(value.unwrap_or("true").to_string()),
        }
    }
}

fn canonical_bool(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Parse a boolean config value.
///
/// A key with no `=` means true; an empty value means false. The words
/// true/yes/on and false/no/off are accepted case-insensitively, and any
/// other text is parsed as an integer and compared against zero.
pub fn config_bool(key: &str, value: Option<&str>) -> Result<bool, ConfigError> {
    let value = match value {
        None => return Ok(true),
        Some(v) => v,
    };
    if value.is_empty() {
        return Ok(false);
    }
    if value.eq_ignore_ascii_case("true")
        || value.eq_ignore_ascii_case("yes")
        || value.eq_ignore_ascii_case("on")
    {
        return Ok(true);
    }
    if value.eq_ignore_ascii_case("false")
        || value.eq_ignore_ascii_case("no")
        || value.eq_ignore_ascii_case("off")
    {
        return Ok(false);
    }
    Ok(config_int(key, Some(value))? != 0)
}

/// Parse an integer config value.
///
/// Accepts decimal, `0x` hex and `0`-prefixed octal, with an optional
/// case-insensitive `k`, `m`, or `g` suffix scaling by powers of 1024.
/// Overflow is an error rather than a silent wrap.
pub fn config_int(key: &str, value: Option<&str>) -> Result<i64, ConfigError> {
    let value = value.filter(|v| !v.is_empty());
    let value = match value {
        None => return Err(ConfigError::bad_value(key)),
        Some(v) => v,
    };
    let (base, rest) = match split_integer(value) {
        Some(parts) => parts,
        None => return Err(ConfigError::bad_value(key)),
    };
    let factor = match unit_factor(rest.trim()) {
        Some(f) => f,
        None => return Err(ConfigError::bad_value(key)),
    };
    base.checked_mul(factor)
        .ok_or_else(|| ConfigError::bad_value(key))
}

/// Parse an unsigned integer config value. Same syntax as [`config_int`]
/// but negative values are rejected.
pub fn config_u64(key: &str, value: Option<&str>) -> Result<u64, ConfigError> {
    let n = config_int(key, value)?;
    u64::try_from(n).map_err(|_| ConfigError::bad_value(key))
}

/// Parse a floating point config value. No size suffixes.
pub fn config_double(key: &str, value: Option<&str>) -> Result<f64, ConfigError> {
    let value = value.filter(|v| !v.is_empty());
    let value = match value {
        None => return Err(ConfigError::bad_value(key)),
        Some(v) => v,
    };
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::bad_value(key))
}

/// Split a numeric literal off the front of `s`. Returns the parsed
/// number and the unconsumed remainder, or None if no digits were found.
fn split_integer(s: &str) -> Option<(i64, &str)> {
    let s = s.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (radix, digits) = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        if hex.starts_with(|c: char| c.is_ascii_hexdigit()) {
            (16, hex)
        } else {
            // "0x" with no hex digit parses as a lone zero, leaving the
            // "x" for the suffix check to reject
            return Some((0, &rest[1..]));
        }
    } else if rest.len() > 1 && rest.starts_with('0') {
        (8, rest)
    } else {
        (10, rest)
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for d in digits[..end].chars().filter_map(|c| c.to_digit(radix)) {
        value = value.checked_mul(radix as i64)?.checked_add(d as i64)?;
    }
    if negative {
        value = value.checked_neg()?;
    }
    Some((value, &digits[end..]))
}

/// Map a size suffix to its multiplier
fn unit_factor(suffix: &str) -> Option<i64> {
    if suffix.is_empty() {
        Some(1)
    } else if suffix.eq_ignore_ascii_case("k") {
        Some(1024)
    } else if suffix.eq_ignore_ascii_case("m") {
        Some(1024 * 1024)
    } else if suffix.eq_ignore_ascii_case("g") {
        Some(1024 * 1024 * 1024)
    } else {
        None
    }
}
