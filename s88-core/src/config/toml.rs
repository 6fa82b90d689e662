//! Simple TOML parser for bus configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! feedback bus configuration. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer in decimal or `0x` hex)
//! - `[s88]` and `[s88.<label>]` section headers, one per bus
//! - Comments (# ...)
//!
//! Example:
//!
//! ```text
//! version = 1
//!
//! [s88.yard]
//! first_vpin = 200
//! pins = 16          # two modules
//! data_pin = 2
//! clock_pin = 3
//! load_pin = 4
//! reset_pin = 5
//! interval_us = 400  # optional
//! ```

use heapless::String as HString;
use s88_hal::LineId;

use super::types::{BusConfig, ConfigError, S88Config, MAX_LABEL_LEN};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Invalid value type or out of range
    InvalidValue,
    /// Key not recognised in this section
    UnknownKey,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// A bus section lacks a required key
    MissingField,
    /// Parsed configuration failed validation
    Config(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Config(e)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    S88,
}

const FIELD_FIRST_VPIN: u8 = 1 << 0;
const FIELD_PIN_COUNT: u8 = 1 << 1;
const FIELD_DATA_PIN: u8 = 1 << 2;
const FIELD_CLOCK_PIN: u8 = 1 << 3;
const FIELD_LOAD_PIN: u8 = 1 << 4;
const FIELD_RESET_PIN: u8 = 1 << 5;

const REQUIRED_FIELDS: u8 = FIELD_FIRST_VPIN
    | FIELD_PIN_COUNT
    | FIELD_DATA_PIN
    | FIELD_CLOCK_PIN
    | FIELD_LOAD_PIN
    | FIELD_RESET_PIN;

/// Bus section being built
struct PendingBus {
    config: S88Config,
    seen: u8,
}

impl PendingBus {
    fn new(label: HString<MAX_LABEL_LEN>) -> Self {
        let config = S88Config {
            label,
            ..S88Config::default()
        };
        Self { config, seen: 0 }
    }
}

/// Parse TOML configuration into BusConfig
///
/// The result is validated before it is returned.
pub fn parse_config(input: &str) -> Result<BusConfig, ParseError> {
    let mut config = BusConfig::new();
    let mut section = Section::Root;
    let mut current: Option<PendingBus> = None;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            save_section(&mut config, current.take())?;

            let label = parse_section_header(&line[1..line.len() - 1])?;
            current = Some(PendingBus::new(label));
            section = Section::S88;
            continue;
        }

        let (key, value) = line.split_once('=').ok_or(ParseError::InvalidValue)?;
        let key = key.trim();
        let value = value.trim();

        match (section, current.as_mut()) {
            (Section::S88, Some(bus)) => apply_bus_key(bus, key, value)?,
            _ => apply_root_key(&mut config, key, value)?,
        }
    }

    save_section(&mut config, current.take())?;
    config.validate()?;

    Ok(config)
}

/// Move a finished bus section into the config
fn save_section(config: &mut BusConfig, bus: Option<PendingBus>) -> Result<(), ParseError> {
    let Some(bus) = bus else {
        return Ok(());
    };

    if bus.seen & REQUIRED_FIELDS != REQUIRED_FIELDS {
        return Err(ParseError::MissingField);
    }

    config
        .devices
        .push(bus.config)
        .map_err(|_| ParseError::TooManyItems)
}

/// Parse the inside of a `[...]` header, returning the bus label
fn parse_section_header(header: &str) -> Result<HString<MAX_LABEL_LEN>, ParseError> {
    let header = header.trim();

    let label = match header.split_once('.') {
        None if header == "s88" => "",
        Some(("s88", label)) => unquote(label.trim()).unwrap_or(label.trim()),
        _ => return Err(ParseError::InvalidSection),
    };

    if label.contains('.') {
        return Err(ParseError::InvalidSection);
    }

    HString::try_from(label).map_err(|_| ParseError::InvalidSection)
}

fn apply_root_key(config: &mut BusConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "version" => config.version = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_bus_key(bus: &mut PendingBus, key: &str, value: &str) -> Result<(), ParseError> {
    let field = match key {
        "label" => {
            let label = unquote(value).ok_or(ParseError::InvalidValue)?;
            bus.config.label = HString::try_from(label).map_err(|_| ParseError::InvalidValue)?;
            0
        }
        "first_vpin" => {
            bus.config.first_vpin = parse_int(value)?;
            FIELD_FIRST_VPIN
        }
        "pin_count" | "pins" => {
            bus.config.pin_count = parse_int(value)?;
            FIELD_PIN_COUNT
        }
        "data_pin" => {
            bus.config.data_pin = parse_line(value)?;
            FIELD_DATA_PIN
        }
        "clock_pin" => {
            bus.config.clock_pin = parse_line(value)?;
            FIELD_CLOCK_PIN
        }
        "load_pin" | "ps_pin" => {
            bus.config.load_pin = parse_line(value)?;
            FIELD_LOAD_PIN
        }
        "reset_pin" => {
            bus.config.reset_pin = parse_line(value)?;
            FIELD_RESET_PIN
        }
        "interval_us" => {
            bus.config.interval_us = parse_int(value)?;
            0
        }
        _ => return Err(ParseError::UnknownKey),
    };

    bus.seen |= field;
    Ok(())
}

fn parse_line(value: &str) -> Result<LineId, ParseError> {
    parse_int(value)
}

/// Parse an unsigned integer, decimal or `0x` hex, with `_` separators
fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ParseError> {
    let mut digits: HString<16> = HString::new();
    for c in value.chars().filter(|c| *c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }

    let parsed = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse::<u32>(),
    }
    .map_err(|_| ParseError::InvalidValue)?;

    T::try_from(parsed).map_err(|_| ParseError::InvalidValue)
}

/// Strip surrounding double quotes
fn unquote(value: &str) -> Option<&str> {
    value.strip_prefix('"')?.strip_suffix('"')
}

/// Remove a trailing `# comment`, ignoring `#` inside quoted strings
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}
