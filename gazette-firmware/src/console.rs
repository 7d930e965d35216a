//! Console display surface
//!
//! Stands in for the TFT on the native board. Every draw updates an
//! in-memory character grid and echoes the affected row to the writer, so
//! the terminal shows the same text the panel would.

use std::io::Write;

use gazette_display::{DisplayError, DisplaySurface, Geometry, TextGrid};

/// Rows the console grid can hold
pub const CONSOLE_ROWS: usize = 16;

/// Columns the console grid can hold
pub const CONSOLE_COLS: usize = 64;

/// Character surface printed to a writer
pub struct ConsoleSurface<W> {
    grid: TextGrid<CONSOLE_ROWS, CONSOLE_COLS>,
    out: W,
}

impl<W: Write> ConsoleSurface<W> {
    /// Create a surface with the given layout
    pub fn new(geometry: Geometry, cell_width: u16, out: W) -> Self {
        Self {
            grid: TextGrid::new(geometry, cell_width),
            out,
        }
    }

    /// Backing grid
    pub fn grid(&self) -> &TextGrid<CONSOLE_ROWS, CONSOLE_COLS> {
        &self.grid
    }

    /// Give the writer back
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn emit<W: Write>(out: &mut W, args: std::fmt::Arguments<'_>) -> Result<(), DisplayError> {
    out.write_fmt(args)
        .and_then(|_| out.flush())
        .map_err(|_| DisplayError::Communication)
}

impl<W: Write> DisplaySurface for ConsoleSurface<W> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.grid.clear()?;
        emit(&mut self.out, format_args!("{:-^40}\n", " clear "))?;
        self.grid.mark_clean();
        Ok(())
    }

    fn draw_text(&mut self, x: u16, y: u16, text: &str) -> Result<(), DisplayError> {
        self.grid.draw_text(x, y, text)?;

        let Some((row, _)) = self.grid.cell_at(x, y) else {
            return Err(DisplayError::InvalidCoordinates);
        };
        let line = self.grid.line(row).unwrap_or("");
        emit(&mut self.out, format_args!("[{row:>2}] {line}\n"))?;
        self.grid.mark_clean();
        Ok(())
    }

    fn geometry(&self) -> Geometry {
        self.grid.geometry()
    }

    fn rows(&self) -> u16 {
        self.grid.rows()
    }
}
