use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

/// One discovered bulb, as of its most recent announcement.
///
/// Every field comes straight from the announcement's attribute lines,
/// lower-cased and trimmed. A record is only constructed when all fields
/// are present and well-formed; there are no partial records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    /// Stable device identifier, e.g. `0x00000000124d7643`
    pub id: String,
    /// Control endpoint URI, e.g. `yeelight://192.168.1.9:55443`
    pub location: String,
    pub server: String,
    pub model: String,
    pub fw_ver: String,
    /// Capability tokens, order as announced
    pub support: Vec<String>,
    pub power: String,
    pub bright: String,
    pub color_mode: String,
    pub ct: i32,
    pub rgb: i32,
    pub hue: i32,
    pub sat: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field {field} is not an integer: {value:?}")]
    InvalidInteger { field: &'static str, value: String },
}

/// Parse an announcement by scanning for attribute lines.
///
/// The first line (HTTP-style status) is skipped; every following
/// `key: value` line up to the first blank line is an attribute. Lines
/// without a colon are ignored. This tolerates devices that send more or
/// fewer boilerplate headers than the common four-line preamble.
pub fn parse_announcement(raw: &str) -> Result<DeviceRecord, ParseError> {
    let mut attrs = HashMap::new();

    for line in raw.lines().skip(1) {
        if line.trim().is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            attrs.insert(
                key.trim().to_lowercase(),
                value.trim().to_lowercase(),
            );
        }
    }

    build_record(&attrs)
}

/// Parse an announcement with the fixed line offsets of the original
/// scanner: drop the first 4 lines and the trailing segment after the
/// final line feed, treat everything in between as attributes.
///
/// Kept only for compatibility testing. Any response whose preamble is
/// not exactly four lines silently misaligns; prefer
/// [`parse_announcement`].
pub fn parse_announcement_compat(raw: &str) -> Result<DeviceRecord, ParseError> {
    let lines: Vec<&str> = raw.split('\n').collect();
    let mut attrs = HashMap::new();

    if lines.len() > 5 {
        for line in &lines[4..lines.len() - 1] {
            let (key, value) = line.split_once(':').unwrap_or((line, line));
            attrs.insert(
                key.trim().to_lowercase(),
                value.trim().to_lowercase(),
            );
        }
    }

    build_record(&attrs)
}

fn build_record(attrs: &HashMap<String, String>) -> Result<DeviceRecord, ParseError> {
    let field = |name: &'static str| -> Result<&str, ParseError> {
        attrs
            .get(name)
            .map(String::as_str)
            .ok_or(ParseError::MissingField(name))
    };
    let int_field = |name: &'static str| -> Result<i32, ParseError> {
        let value = field(name)?;
        value.parse().map_err(|_| ParseError::InvalidInteger {
            field: name,
            value: value.to_string(),
        })
    };

    Ok(DeviceRecord {
        id: field("id")?.to_string(),
        location: field("location")?.to_string(),
        server: field("server")?.to_string(),
        model: field("model")?.to_string(),
        fw_ver: field("fw_ver")?.to_string(),
        support: field("support")?.split(' ').map(str::to_string).collect(),
        power: field("power")?.to_string(),
        bright: field("bright")?.to_string(),
        color_mode: field("color_mode")?.to_string(),
        ct: int_field("ct")?,
        rgb: int_field("rgb")?,
        hue: int_field("hue")?,
        sat: int_field("sat")?,
        name: field("name")?.to_string(),
    })
}
