//! Parallel output bank (LED bar)

/// Eight digital outputs driven together from one byte
///
/// Bit 0 maps to the first pin. Writes cannot fail: the bank is plain
/// GPIO on every supported board.
pub trait OutputBank {
    /// Drive every pin from the bits of `value`
    fn write(&mut self, value: u8);

    /// Last value written
    fn value(&self) -> u8;
}
