//! Minimal TOML parser for `device.toml`
//!
//! Handles only the subset the device configuration uses. It does NOT
//! support the full TOML spec.
//!
//! Supported features:
//! - `[section]` headers
//! - `key = value` pairs with decimal or `0x` hexadecimal integers
//! - Comments (`# ...`), whole-line or trailing
//!
//! Unknown sections and keys are skipped so newer files still load.

use super::types::{DeviceConfig, MAX_I2C_ADDRESS, MIN_I2C_ADDRESS};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Section header is not closed with `]`
    InvalidSection { line: usize },
    /// Line is neither a header nor `key = value`
    InvalidLine { line: usize },
    /// Value is not an integer of the right range
    InvalidValue { line: usize },
    /// Value parsed but is not usable (e.g. zero period)
    OutOfRange { line: usize },
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Timing,
    Display,
    Clock,
    Unknown,
}

/// Parse `device.toml` content, starting from defaults
pub fn parse_config(input: &str) -> Result<DeviceConfig, ConfigError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw_line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or(ConfigError::InvalidSection { line: line_no })?;
            section = parse_section_header(name);
            continue;
        }

        let (key, value) =
            parse_key_value(line).ok_or(ConfigError::InvalidLine { line: line_no })?;
        apply_value(section, key, value, &mut config, line_no)?;
    }

    Ok(config)
}

fn parse_section_header(name: &str) -> Section {
    match name.trim() {
        "timing" => Section::Timing,
        "display" => Section::Display,
        "clock" => Section::Clock,
        _ => Section::Unknown,
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a decimal or `0x`-prefixed hexadecimal integer
fn parse_int<T: TryFrom<u64>>(value: &str, line: usize) -> Result<T, ConfigError> {
    let value = strip_underscores(value);
    let parsed = match value.as_str().strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.as_str().parse::<u64>(),
    }
    .map_err(|_| ConfigError::InvalidValue { line })?;

    T::try_from(parsed).map_err(|_| ConfigError::InvalidValue { line })
}

fn parse_nonzero(value: &str, line: usize) -> Result<u32, ConfigError> {
    match parse_int::<u32>(value, line)? {
        0 => Err(ConfigError::OutOfRange { line }),
        n => Ok(n),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DeviceConfig,
    line: usize,
) -> Result<(), ConfigError> {
    match section {
        Section::Timing => {
            let t = &mut config.timing;
            match key {
                "dwell_ms" => t.dwell_ms = parse_int(value, line)?,
                "read_timeout_ms" => t.read_timeout_ms = parse_nonzero(value, line)?,
                "handshake_pulse_ms" => t.handshake_pulse_ms = parse_int(value, line)?,
                "heartbeat_period_ms" => t.heartbeat_period_ms = parse_nonzero(value, line)?,
                "strobe_every" => t.strobe_every = parse_nonzero(value, line)?,
                "strobe_pulse_ms" => t.strobe_pulse_ms = parse_int(value, line)?,
                _ => {}
            }
        }
        Section::Display => {
            if key == "i2c_address" {
                let address: u8 = parse_int(value, line)?;
                if !(MIN_I2C_ADDRESS..=MAX_I2C_ADDRESS).contains(&address) {
                    return Err(ConfigError::OutOfRange { line });
                }
                config.display.i2c_address = address;
            }
        }
        Section::Clock => {
            if key == "epoch_offset_s" {
                config.clock.epoch_offset_s = parse_int(value, line)?;
            }
        }
        Section::Root | Section::Unknown => {}
    }

    Ok(())
}

/// TOML allows `_` separators in integers (`5_000`)
fn strip_underscores(value: &str) -> heapless::String<24> {
    let mut out = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        // Overlong values fail to parse later anyway
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), DeviceConfig::default());
        assert_eq!(
            parse_config("# only a comment\n\n").unwrap(),
            DeviceConfig::default()
        );
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# Duoline device configuration
[timing]
dwell_ms = 3_000        # shorter hold
read_timeout_ms = 250
handshake_pulse_ms = 10
heartbeat_period_ms = 50
strobe_every = 5
strobe_pulse_ms = 15

[display]
i2c_address = 0x3F

[clock]
epoch_offset_s = 1700000000
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.timing.dwell_ms, 3000);
        assert_eq!(config.timing.read_timeout_ms, 250);
        assert_eq!(config.timing.handshake_pulse_ms, 10);
        assert_eq!(config.timing.heartbeat_period_ms, 50);
        assert_eq!(config.timing.strobe_every, 5);
        assert_eq!(config.timing.strobe_pulse_ms, 15);
        assert_eq!(config.display.i2c_address, 0x3F);
        assert_eq!(config.clock.epoch_offset_s, 1_700_000_000);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("[timing]\ndwell_ms = 100\n").unwrap();
        assert_eq!(config.timing.dwell_ms, 100);
        assert_eq!(config.timing.read_timeout_ms, DEFAULT_READ_TIMEOUT_MS);
        assert_eq!(config.display.i2c_address, DEFAULT_LCD_ADDRESS);
    }

    #[test]
    fn test_unknown_sections_and_keys_skipped() {
        let config = parse_config("[network]\nport = 80\n[timing]\nfuture_key = 1\n").unwrap();
        assert_eq!(config, DeviceConfig::default());
    }

    #[test]
    fn test_invalid_value() {
        assert_eq!(
            parse_config("[timing]\ndwell_ms = soon\n"),
            Err(ConfigError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[timing]\ndwell_ms = -5\n"),
            Err(ConfigError::InvalidValue { line: 2 })
        );
    }

    #[test]
    fn test_zero_period_rejected() {
        assert_eq!(
            parse_config("[timing]\n\nstrobe_every = 0\n"),
            Err(ConfigError::OutOfRange { line: 3 })
        );
    }

    #[test]
    fn test_address_range() {
        assert_eq!(
            parse_config("[display]\ni2c_address = 0x78\n"),
            Err(ConfigError::OutOfRange { line: 2 })
        );
        assert_eq!(
            parse_config("[display]\ni2c_address = 0x03\n"),
            Err(ConfigError::OutOfRange { line: 2 })
        );
        assert_eq!(
            parse_config("[display]\ni2c_address = 0x77\n").map(|c| c.display.i2c_address),
            Ok(0x77)
        );
        assert_eq!(
            parse_config("[display]\ni2c_address = 0x100\n"),
            Err(ConfigError::InvalidValue { line: 2 })
        );
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(
            parse_config("[timing\n"),
            Err(ConfigError::InvalidSection { line: 1 })
        );
        assert_eq!(
            parse_config("[timing]\ndwell_ms\n"),
            Err(ConfigError::InvalidLine { line: 2 })
        );
    }
}
