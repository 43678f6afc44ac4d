//! Decoders for string-encoded composite values
//!
//! The document encodes some values as strings or small arrays: an IPv4
//! address, a magnitude with a unit suffix (`"30kW"`), and an enumerated
//! `[index, label]` pair. Validation never works on the encoded form
//! directly; each is decoded into a structured value here, and the encoded
//! form exists only in the document itself.

use cellstack_catalog::{EnumTable, IndexedLabel};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static IPV4_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})$").expect("static pattern")
});

static UNIT_VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]?\d+(?:\.\d+)?)\s*(\S*)$").expect("static pattern"));

/// What went wrong decoding an encoded value. Rendered into an Issue message
/// by the structural checks.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Invalid IPv4 address: {0}")]
    InvalidIpv4(String),

    #[error("IPv4 host address must have non-zero first and last octets: {0}")]
    UnusableIpv4(String),

    #[error("Expected a number followed by the unit {expected}, got: {found}")]
    NotANumberWithUnit { expected: &'static str, found: String },

    #[error("Missing unit, expected {expected}")]
    MissingUnit { expected: &'static str },

    #[error("Wrong unit: expected {expected}, found {found}")]
    WrongUnit { expected: &'static str, found: String },

    #[error("Expected an [index, label] pair")]
    NotAnIndexPair,

    #[error("Not an allowed choice: [{index}, {label}]")]
    UnknownIndexPair { index: String, label: String },
}

/// Check a dotted-quad IPv4 host address. Octets are 0-255, with the
/// convention that the first and last octet may not be zero (a usable host
/// address, not strict RFC validity).
pub fn check_ipv4(raw: &str) -> Result<(), DecodeError> {
    let captures = IPV4_RE
        .captures(raw)
        .ok_or_else(|| DecodeError::InvalidIpv4(raw.to_string()))?;

    let mut octets = [0u16; 4];
    for (i, octet) in octets.iter_mut().enumerate() {
        let parsed: u16 = captures[i + 1]
            .parse()
            .map_err(|_| DecodeError::InvalidIpv4(raw.to_string()))?;
        if parsed > 255 {
            return Err(DecodeError::InvalidIpv4(raw.to_string()));
        }
        *octet = parsed;
    }
    if octets[0] == 0 || octets[3] == 0 {
        return Err(DecodeError::UnusableIpv4(raw.to_string()));
    }
    Ok(())
}

/// A decoded magnitude-with-unit value.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitValue {
    pub magnitude: f64,
    pub unit: String,
}

/// Decode `"30kW"` into a [`UnitValue`], insisting on `expected` as the unit.
pub fn decode_unit_value(raw: &str, expected: &'static str) -> Result<UnitValue, DecodeError> {
    let captures = UNIT_VALUE_RE.captures(raw.trim()).ok_or_else(|| {
        DecodeError::NotANumberWithUnit { expected, found: raw.to_string() }
    })?;

    let magnitude: f64 = captures[1].parse().map_err(|_| {
        DecodeError::NotANumberWithUnit { expected, found: raw.to_string() }
    })?;
    let unit = captures[2].to_string();

    if unit.is_empty() {
        return Err(DecodeError::MissingUnit { expected });
    }
    if unit != expected {
        return Err(DecodeError::WrongUnit { expected, found: unit });
    }
    Ok(UnitValue { magnitude, unit })
}

/// A decoded `[index, label]` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPair {
    pub index: String,
    pub label: String,
}

/// Decode a two-element string array into an [`IndexPair`] and check that it
/// is a member of `table` (not merely shaped like one).
pub fn decode_index_pair(value: &Value, table: EnumTable) -> Result<IndexPair, DecodeError> {
    let items = value.as_array().ok_or(DecodeError::NotAnIndexPair)?;
    let [index, label] = items.as_slice() else {
        return Err(DecodeError::NotAnIndexPair);
    };
    let (Some(index), Some(label)) = (index.as_str(), label.as_str()) else {
        return Err(DecodeError::NotAnIndexPair);
    };

    let members = table.indexed().unwrap_or(&[]);
    let is_member = members
        .iter()
        .any(|m: &IndexedLabel| m.index == index && m.label == label);
    if !is_member {
        return Err(DecodeError::UnknownIndexPair {
            index: index.to_string(),
            label: label.to_string(),
        });
    }
    Ok(IndexPair { index: index.to_string(), label: label.to_string() })
}
