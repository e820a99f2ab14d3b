//! HD44780 LCD over a PCF8574 I2C backpack
//!
//! The backpack exposes the controller in 4-bit mode. Each byte on the
//! I2C bus sets all eight expander pins:
//!
//! ```text
//! bit  7  6  5  4  3   2  1   0
//!      D7 D6 D5 D4 BL  EN RW  RS
//! ```
//!
//! Every controller byte goes out as two nibbles, each latched by an
//! EN high-to-low edge.

use duoline_core::traits::{CharDisplay, DISPLAY_COLUMNS, DISPLAY_ROWS};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

/// Expander pin masks
mod pin {
    pub const RS: u8 = 0x01;
    pub const EN: u8 = 0x04;
    pub const BACKLIGHT: u8 = 0x08;
}

/// HD44780 instructions
#[allow(dead_code)]
mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const HOME: u8 = 0x02;
    pub const ENTRY_MODE_INCREMENT: u8 = 0x06;
    pub const DISPLAY_OFF: u8 = 0x08;
    pub const DISPLAY_ON: u8 = 0x0C;
    pub const FUNCTION_4BIT_2LINE: u8 = 0x28;
    pub const SET_DDRAM: u8 = 0x80;
}

/// DDRAM address of the first column of each row
const ROW_OFFSETS: [u8; DISPLAY_ROWS as usize] = [0x00, 0x40];

/// Errors from the LCD driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hd44780Error<E> {
    /// I2C transfer failed
    Bus(E),
    /// Row outside the panel
    InvalidRow(u8),
}

impl<E> From<E> for Hd44780Error<E> {
    fn from(err: E) -> Self {
        Hd44780Error::Bus(err)
    }
}

/// 16x2 HD44780 driver
pub struct Hd44780<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    backlight: bool,
}

impl<I2C, D> Hd44780<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver; call [`init`](Self::init) before use
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            backlight: true,
        }
    }

    /// Power-on initialization into 4-bit, two-line mode
    pub async fn init(&mut self) -> Result<(), Hd44780Error<I2C::Error>> {
        // Controller needs >40 ms after Vcc rises
        self.delay.delay_ms(50).await;

        // Reset sequence: three 8-bit function sets, then switch to 4-bit
        self.write_nibble(0x30, 0).await?;
        self.delay.delay_ms(5).await;
        self.write_nibble(0x30, 0).await?;
        self.delay.delay_us(150).await;
        self.write_nibble(0x30, 0).await?;
        self.write_nibble(0x20, 0).await?;

        self.command(cmd::FUNCTION_4BIT_2LINE).await?;
        self.command(cmd::DISPLAY_OFF).await?;
        self.clear_display().await?;
        self.command(cmd::ENTRY_MODE_INCREMENT).await?;
        self.command(cmd::DISPLAY_ON).await?;
        Ok(())
    }

    /// Switch the backlight; applied on the next bus write
    pub fn set_backlight(&mut self, on: bool) {
        self.backlight = on;
    }

    /// Move the cursor
    pub async fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), Hd44780Error<I2C::Error>> {
        let offset = *ROW_OFFSETS
            .get(usize::from(row))
            .ok_or(Hd44780Error::InvalidRow(row))?;
        self.command(cmd::SET_DDRAM | (offset + col)).await
    }

    async fn clear_display(&mut self) -> Result<(), Hd44780Error<I2C::Error>> {
        self.command(cmd::CLEAR).await?;
        // Clear is the one slow instruction
        self.delay.delay_ms(2).await;
        Ok(())
    }

    async fn command(&mut self, value: u8) -> Result<(), Hd44780Error<I2C::Error>> {
        self.write_byte(value, 0).await
    }

    async fn data(&mut self, value: u8) -> Result<(), Hd44780Error<I2C::Error>> {
        self.write_byte(value, pin::RS).await
    }

    async fn write_byte(&mut self, value: u8, mode: u8) -> Result<(), Hd44780Error<I2C::Error>> {
        self.write_nibble(value & 0xF0, mode).await?;
        self.write_nibble(value << 4, mode).await
    }

    /// Put the high nibble of `bits` on D4..D7 and pulse EN
    async fn write_nibble(&mut self, bits: u8, mode: u8) -> Result<(), Hd44780Error<I2C::Error>> {
        let light = if self.backlight { pin::BACKLIGHT } else { 0 };
        let frame = (bits & 0xF0) | mode | light;

        self.i2c
            .write(self.address, &[frame | pin::EN, frame])
            .await?;
        // Most instructions settle within 37 us
        self.delay.delay_us(50).await;
        Ok(())
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D> CharDisplay for Hd44780<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = Hd44780Error<I2C::Error>;

    async fn clear(&mut self) -> Result<(), Self::Error> {
        self.clear_display().await
    }

    async fn write_line(&mut self, row: u8, text: &[u8]) -> Result<(), Self::Error> {
        self.set_cursor(row, 0).await?;
        for &byte in text.iter().take(DISPLAY_COLUMNS) {
            self.data(byte).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::convert::Infallible;
    use std::vec::Vec;

    use embassy_futures::block_on;
    use embedded_hal_async::i2c::{ErrorType, Operation};

    use super::*;

    /// Captures every written frame
    #[derive(Default)]
    struct MockI2c {
        writes: Vec<(u8, Vec<u8>)>,
    }

    impl ErrorType for MockI2c {
        type Error = Infallible;
    }

    impl I2c for MockI2c {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Infallible> {
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    /// Rebuild controller bytes from latched nibbles
    fn decoded(writes: &[(u8, Vec<u8>)]) -> Vec<(bool, u8)> {
        writes
            .chunks(2)
            .map(|pair| {
                let high = pair[0].1[1];
                let low = pair[1].1[1];
                (high & pin::RS != 0, (high & 0xF0) | (low >> 4))
            })
            .collect()
    }

    #[test]
    fn test_nibble_framing() {
        let mut lcd = Hd44780::new(MockI2c::default(), NoDelay, 0x27);
        block_on(lcd.data(b'A')).unwrap();

        let (i2c, _) = lcd.release();
        assert_eq!(i2c.writes.len(), 2);
        // 'A' = 0x41: high nibble 0x4, low nibble 0x1, RS and backlight set
        assert_eq!(i2c.writes[0], (0x27, std::vec![0x4D, 0x49]));
        assert_eq!(i2c.writes[1], (0x27, std::vec![0x1D, 0x19]));
    }

    #[test]
    fn test_write_line_sets_cursor_and_clamps() {
        let mut lcd = Hd44780::new(MockI2c::default(), NoDelay, 0x27);
        block_on(lcd.write_line(1, b"0123456789abcdefXYZ")).unwrap();

        let (i2c, _) = lcd.release();
        let bytes = decoded(&i2c.writes);
        assert_eq!(bytes[0], (false, 0xC0));
        assert!(bytes[1..].iter().all(|&(rs, _)| rs));
        let text: Vec<u8> = bytes[1..].iter().map(|&(_, b)| b).collect();
        assert_eq!(text, b"0123456789abcdef");
    }

    #[test]
    fn test_clear_command() {
        let mut lcd = Hd44780::new(MockI2c::default(), NoDelay, 0x3F);
        block_on(lcd.clear()).unwrap();

        let (i2c, _) = lcd.release();
        assert_eq!(decoded(&i2c.writes), [(false, cmd::CLEAR)]);
        assert!(i2c.writes.iter().all(|(addr, _)| *addr == 0x3F));
    }

    #[test]
    fn test_invalid_row() {
        let mut lcd = Hd44780::new(MockI2c::default(), NoDelay, 0x27);
        assert_eq!(
            block_on(lcd.write_line(2, b"x")),
            Err(Hd44780Error::InvalidRow(2))
        );
    }

    #[test]
    fn test_init_ends_with_display_on() {
        let mut lcd = Hd44780::new(MockI2c::default(), NoDelay, 0x27);
        block_on(lcd.init()).unwrap();

        let (i2c, _) = lcd.release();
        // Four single-nibble reset writes, then whole commands
        let bytes = decoded(&i2c.writes[4..]);
        assert_eq!(
            bytes,
            [
                (false, cmd::FUNCTION_4BIT_2LINE),
                (false, cmd::DISPLAY_OFF),
                (false, cmd::CLEAR),
                (false, cmd::ENTRY_MODE_INCREMENT),
                (false, cmd::DISPLAY_ON),
            ]
        );
    }

    #[test]
    fn test_backlight_off() {
        let mut lcd = Hd44780::new(MockI2c::default(), NoDelay, 0x27);
        lcd.set_backlight(false);
        block_on(lcd.command(cmd::HOME)).unwrap();

        let (i2c, _) = lcd.release();
        assert!(i2c
            .writes
            .iter()
            .all(|(_, frame)| frame.iter().all(|b| b & pin::BACKLIGHT == 0)));
    }
}
