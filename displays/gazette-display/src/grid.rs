//! In-memory character grid
//!
//! Provides a text-mode surface that maps pixel positions onto character
//! cells. Used as the backing store of console surfaces and in tests.

use heapless::String;

use crate::geometry::Geometry;
use crate::surface::{DisplayError, DisplaySurface};

/// Character grid surface with `ROWS` lines of `COLS` characters
///
/// A draw at pixel `(x, y)` lands in row `y / font_height` and column
/// `x / cell_width`.
#[derive(Clone)]
pub struct TextGrid<const ROWS: usize, const COLS: usize> {
    /// Current content
    lines: [String<COLS>; ROWS],
    /// Layout reported to the renderer
    geometry: Geometry,
    /// Horizontal size of one character cell in pixels
    cell_width: u16,
    /// Whether the grid changed since the last `mark_clean`
    dirty: bool,
    /// Number of clears since creation
    clears: u32,
}

impl<const ROWS: usize, const COLS: usize> TextGrid<ROWS, COLS> {
    /// Create an empty grid
    ///
    /// A `cell_width` of zero is treated as one pixel.
    pub fn new(geometry: Geometry, cell_width: u16) -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            geometry,
            cell_width: cell_width.max(1),
            dirty: true,
            clears: 0,
        }
    }

    /// Map a pixel position onto a (row, column) cell
    pub fn cell_at(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        let row = (y / self.geometry.font_height.max(1)) as usize;
        let col = (x / self.cell_width) as usize;
        if row < ROWS && col < COLS {
            Some((row, col))
        } else {
            None
        }
    }

    /// Get the content of a specific row
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    /// Get all lines as an iterator
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }

    /// Rows that currently hold text
    pub fn populated(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim_end().is_empty())
    }

    /// Check if the grid needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the grid as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Number of clears since creation
    pub fn clear_count(&self) -> u32 {
        self.clears
    }
}

impl<const ROWS: usize, const COLS: usize> DisplaySurface for TextGrid<ROWS, COLS> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        for line in &mut self.lines {
            line.clear();
        }
        self.clears = self.clears.wrapping_add(1);
        self.dirty = true;
        Ok(())
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str) -> Result<(), DisplayError> {
        let (row, col) = self
            .cell_at(x, y)
            .ok_or(DisplayError::InvalidCoordinates)?;

        let line = &mut self.lines[row];
        // Pad with spaces up to the starting column
        while line.chars().count() < col {
            let _ = line.push(' ');
        }
        // Drop whatever was under the new text
        if let Some((idx, _)) = line.char_indices().nth(col) {
            line.truncate(idx);
        }
        for ch in text.chars() {
            if line.push(ch).is_err() {
                break;
            }
        }

        self.dirty = true;
        Ok(())
    }

    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn rows(&self) -> u16 {
        ROWS.min(u16::MAX as usize) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Grid = TextGrid<13, 24>;

    fn grid() -> Grid {
        TextGrid::new(Geometry::reference(), 16)
    }

    #[test]
    fn test_draw_maps_pixels_to_cells() {
        let mut grid = grid();
        grid.draw_text(10, 100, "hello").unwrap();

        assert_eq!(grid.line(5), Some("hello"));
        assert_eq!(grid.cell_at(10, 100), Some((5, 0)));
    }

    #[test]
    fn test_draw_pads_to_column() {
        let mut grid = grid();
        grid.draw_text(32, 20, "ab").unwrap();
        assert_eq!(grid.line(1), Some("  ab"));
    }

    #[test]
    fn test_draw_overwrites_tail() {
        let mut grid = grid();
        grid.draw_text(0, 0, "abcdef").unwrap();
        grid.draw_text(32, 0, "XY").unwrap();
        assert_eq!(grid.line(0), Some("abXY"));
    }

    #[test]
    fn test_draw_truncates_long_text() {
        let mut grid = grid();
        grid.draw_text(0, 0, "0123456789012345678901234567").unwrap();
        assert_eq!(grid.line(0).map(str::len), Some(24));
    }

    #[test]
    fn test_draw_out_of_range() {
        let mut grid = grid();
        assert_eq!(
            grid.draw_text(0, 13 * 20, "x"),
            Err(DisplayError::InvalidCoordinates)
        );
        assert_eq!(
            grid.draw_text(24 * 16, 0, "x"),
            Err(DisplayError::InvalidCoordinates)
        );
    }

    #[test]
    fn test_clear_counts_and_empties() {
        let mut grid = grid();
        grid.draw_text(10, 80, "banner").unwrap();
        grid.mark_clean();
        assert!(!grid.is_dirty());

        grid.clear().unwrap();
        assert!(grid.is_dirty());
        assert_eq!(grid.clear_count(), 1);
        assert_eq!(grid.populated().count(), 0);
    }

    #[test]
    fn test_reports_row_capacity() {
        assert_eq!(grid().rows(), 13);
    }

    #[test]
    fn test_populated_rows() {
        let mut grid = grid();
        grid.draw_text(10, 80, "banner").unwrap();
        grid.draw_text(10, 120, "line").unwrap();

        let rows: heapless::Vec<usize, 4> = grid.populated().map(|(row, _)| row).collect();
        assert_eq!(rows.as_slice(), &[4, 6]);
    }
}
