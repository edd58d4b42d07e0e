/// Scroll state of the task list.
///
/// The offset only moves when the cursor would otherwise leave the visible
/// window, and then by the smallest amount. Pointer selection of a visible
/// row therefore never scrolls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListViewport {
    pub offset: usize,
    pub height: usize,
}

impl ListViewport {
    /// Record the list height from the last layout and clamp the offset
    pub fn resize(&mut self, height: usize, len: usize) {
        self.height = height;
        self.offset = self.offset.min(len.saturating_sub(height));
    }

    /// Minimal scroll that keeps `cursor` visible
    pub fn reveal(&mut self, cursor: Option<usize>) {
        let Some(cursor) = cursor else {
            return;
        };
        if self.height == 0 {
            return;
        }
        if cursor < self.offset {
            self.offset = cursor;
        } else if cursor >= self.offset + self.height {
            self.offset = cursor.saturating_sub(self.height - 1);
        }
    }

    /// Row index under a line of the visible window
    pub fn row_at(&self, line: usize, len: usize) -> Option<usize> {
        if line >= self.height {
            return None;
        }
        let index = self.offset + line;
        (index < len).then_some(index)
    }

    /// Visible index range
    pub fn window(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(len);
        start..len.min(self.offset + self.height)
    }
}
