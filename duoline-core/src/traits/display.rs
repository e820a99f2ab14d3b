//! Character display trait for the 16x2 LCD

/// Visible columns per row
pub const DISPLAY_COLUMNS: usize = 16;

/// Number of rows
pub const DISPLAY_ROWS: u8 = 2;

/// Trait for a two-row character display
///
/// Implementations own the bus. The renderer only ever clears the panel
/// and then writes each row from column 0.
#[allow(async_fn_in_trait)]
pub trait CharDisplay {
    /// Bus or controller error
    type Error;

    /// Blank both rows and home the cursor
    async fn clear(&mut self) -> Result<(), Self::Error>;

    /// Write `text` starting at column 0 of `row`
    ///
    /// - `row`: 0 (top) or 1 (bottom)
    /// - `text`: at most [`DISPLAY_COLUMNS`] bytes, written verbatim
    async fn write_line(&mut self, row: u8, text: &[u8]) -> Result<(), Self::Error>;
}
