//! Configuration type definitions

/// Default hold time after showing text
pub const DEFAULT_DWELL_MS: u32 = 5000;

/// Default serial read window after a wake
pub const DEFAULT_READ_TIMEOUT_MS: u32 = 333;

/// Default handshake pulse after a successful read
pub const DEFAULT_HANDSHAKE_PULSE_MS: u32 = 20;

/// Default heartbeat tick
pub const DEFAULT_HEARTBEAT_PERIOD_MS: u32 = 100;

/// Default number of ticks between strobes
pub const DEFAULT_STROBE_EVERY: u32 = 10;

/// Default strobe pulse width
pub const DEFAULT_STROBE_PULSE_MS: u32 = 20;

/// Default PCF8574 backpack address
pub const DEFAULT_LCD_ADDRESS: u8 = 0x27;

/// Lowest usable 7-bit I2C address (0x00..=0x07 are reserved)
pub const MIN_I2C_ADDRESS: u8 = 0x08;

/// Highest usable 7-bit I2C address (0x78..=0x7F are reserved)
pub const MAX_I2C_ADDRESS: u8 = 0x77;

/// Pipeline and heartbeat timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Display hold after rendering text (ms)
    pub dwell_ms: u32,
    /// Bounded serial read window (ms)
    pub read_timeout_ms: u32,
    /// Handshake pulse width after a read (ms)
    pub handshake_pulse_ms: u32,
    /// Heartbeat tick period (ms)
    pub heartbeat_period_ms: u32,
    /// Strobe on every Nth heartbeat tick
    pub strobe_every: u32,
    /// Strobe pulse width (ms)
    pub strobe_pulse_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            dwell_ms: DEFAULT_DWELL_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            handshake_pulse_ms: DEFAULT_HANDSHAKE_PULSE_MS,
            heartbeat_period_ms: DEFAULT_HEARTBEAT_PERIOD_MS,
            strobe_every: DEFAULT_STROBE_EVERY,
            strobe_pulse_ms: DEFAULT_STROBE_PULSE_MS,
        }
    }
}

/// Character display hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// 7-bit I2C address of the LCD backpack
    pub i2c_address: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            i2c_address: DEFAULT_LCD_ADDRESS,
        }
    }
}

/// Wall clock settings
///
/// There is no RTC; status timestamps are uptime plus this offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Unix time at boot (seconds)
    pub epoch_offset_s: u64,
}

impl ClockConfig {
    /// Unix timestamp for a given uptime
    pub fn unix_time(&self, uptime_s: u64) -> u64 {
        self.epoch_offset_s.saturating_add(uptime_s)
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    pub timing: TimingConfig,
    pub display: DisplayConfig,
    pub clock: ClockConfig,
}
