//! Renderer owning the character display

use crate::render::Layout;
use crate::traits::CharDisplay;

/// Owns the display and remembers what it last showed
pub struct Renderer<D> {
    display: D,
    shown: Layout,
}

impl<D: CharDisplay> Renderer<D> {
    /// Wrap a display; nothing is drawn until the first [`show`](Self::show)
    pub fn new(display: D) -> Self {
        Self {
            display,
            shown: Layout::blank(),
        }
    }

    /// Clear the panel and draw both rows
    ///
    /// The layout is remembered even when the bus write fails, so a
    /// later status read reflects what was intended.
    pub async fn show(&mut self, layout: Layout) -> Result<(), D::Error> {
        self.shown = layout;
        self.display.clear().await?;
        self.display.write_line(0, &self.shown.top).await?;
        self.display.write_line(1, &self.shown.bottom).await
    }

    /// Layout last passed to [`show`](Self::show)
    pub fn shown(&self) -> &Layout {
        &self.shown
    }

    /// Borrow the underlying display
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Release the display
    pub fn into_inner(self) -> D {
        self.display
    }
}
