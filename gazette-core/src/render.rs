//! Render dispatcher
//!
//! Bridges delivered publications to the display: paginates the payload
//! against the persistent render cursor and applies the resulting
//! instructions to the surface in order.

use gazette_display::{DisplayError, DisplaySurface, Geometry, MAX_LINE_CHARS};
use heapless::String;

use crate::messaging::{MessageHandler, Topic};
use crate::paginate::{paginate, ChunkPolicy, Instruction, RenderCursor};

/// Character drawn in place of bytes the font cannot show
pub const REPLACEMENT_CHAR: char = '?';

/// What one call to [`RenderDispatcher::render`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderSummary {
    /// Lines drawn
    pub lines: u16,
    /// Screen clears issued
    pub clears: u16,
    /// Payload bytes left undrawn by the chunk policy
    pub dropped: usize,
}

/// Owns the display surface and the render cursor
pub struct RenderDispatcher<S> {
    surface: S,
    cursor: RenderCursor,
    geometry: Geometry,
    policy: ChunkPolicy,
}

impl<S: DisplaySurface> RenderDispatcher<S> {
    /// Create a dispatcher for an initialized surface
    ///
    /// The cursor starts below the header. Fails if the surface reports a
    /// geometry the paginator cannot work with, or one whose body lines
    /// would run past the surface's last row.
    pub fn new(surface: S, policy: ChunkPolicy) -> Result<Self, DisplayError> {
        let geometry = surface.geometry();
        geometry
            .fits(surface.rows())
            .map_err(|_| DisplayError::InvalidCoordinates)?;

        Ok(Self {
            surface,
            cursor: RenderCursor::below_header(&geometry),
            geometry,
            policy,
        })
    }

    /// Clear the surface, draw the static banner and park the cursor below it
    pub fn draw_header(&mut self, banner: &str, banner_y: u16) -> Result<(), DisplayError> {
        self.surface.clear()?;
        if !banner.is_empty() {
            self.surface
                .draw_text(self.geometry.text_x, banner_y, banner)?;
        }
        self.cursor = RenderCursor::below_header(&self.geometry);
        Ok(())
    }

    /// Render one payload
    ///
    /// The cursor is committed after every instruction that reached the
    /// surface, so a failing draw leaves it at the last visible line.
    pub fn render(&mut self, payload: &[u8]) -> Result<RenderSummary, DisplayError> {
        let mut summary = RenderSummary::default();
        let mut pages = paginate(payload, self.cursor, &self.geometry, self.policy);

        while let Some(instruction) = pages.next() {
            match instruction {
                Instruction::Clear => {
                    self.surface.clear()?;
                    summary.clears += 1;
                }
                Instruction::DrawChunk { text, row } => {
                    let line = printable(text);
                    self.surface
                        .draw_text(self.geometry.text_x, row, line.as_str())?;
                    summary.lines += 1;
                }
            }
            self.cursor = pages.cursor();
        }

        summary.dropped = pages.remaining().len();
        Ok(summary)
    }

    /// Current render cursor
    pub fn cursor(&self) -> RenderCursor {
        self.cursor
    }

    /// Geometry the dispatcher paginates against
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Borrow the surface
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: DisplaySurface> MessageHandler for RenderDispatcher<S> {
    type Error = DisplayError;

    fn on_message(&mut self, _topic: &Topic, payload: &[u8]) -> Result<(), Self::Error> {
        self.render(payload).map(|_| ())
    }
}

/// Convert a chunk to display text, one character per byte
fn printable(chunk: &[u8]) -> String<MAX_LINE_CHARS> {
    let mut line = String::new();
    for &byte in chunk.iter().take(MAX_LINE_CHARS) {
        let ch = if byte.is_ascii_graphic() || byte == b' ' {
            byte as char
        } else {
            REPLACEMENT_CHAR
        };
        // Capacity matches the take() above
        let _ = line.push(ch);
    }
    line
}
