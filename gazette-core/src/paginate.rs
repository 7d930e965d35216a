//! Payload pagination
//!
//! Splits a payload into fixed-width lines placed at successive rows,
//! wrapping back below the header once the cursor passes the bottom of the
//! visible area.
//!
//! Pagination is a pure function of the payload, the cursor at entry, the
//! geometry and the chunk policy. It yields instructions lazily and never
//! allocates, so the renderer can apply them one by one.

use gazette_display::Geometry;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// When to stop cutting a payload into lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChunkPolicy {
    /// Behaviour of the original TFT application
    ///
    /// Lines are cut only while a full line remains and the remaining
    /// length is not an exact multiple of the line width. Payloads shorter
    /// than one line, and payloads whose length is a multiple of the width,
    /// draw nothing; a partial last line is dropped.
    #[default]
    Compatible,
    /// Cut lines while any byte remains, the last one possibly short
    Complete,
}

impl ChunkPolicy {
    /// Whether another line is cut from `remaining` bytes
    pub fn continues(self, remaining: usize, width: usize) -> bool {
        if width == 0 {
            return false;
        }
        match self {
            ChunkPolicy::Compatible => remaining >= width && remaining % width > 0,
            ChunkPolicy::Complete => remaining > 0,
        }
    }
}

/// Vertical position of the next line of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderCursor {
    /// Pixel row the next line is drawn at
    pub row: u16,
}

impl RenderCursor {
    /// Cursor at the first line below the header
    pub const fn below_header(geometry: &Geometry) -> Self {
        Self {
            row: geometry.header_offset,
        }
    }

    /// Cursor at an arbitrary row
    pub const fn at(row: u16) -> Self {
        Self { row }
    }

    /// Whether the next line would fall past the visible area
    pub fn overflows(&self, geometry: &Geometry) -> bool {
        self.row > geometry.max_height
    }

    fn advance(&mut self, geometry: &Geometry) {
        self.row = self.row.saturating_add(geometry.font_height);
    }

    fn reset(&mut self, geometry: &Geometry) {
        self.row = geometry.header_offset;
    }
}

/// A single drawing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction<'p> {
    /// Clear the surface; the cursor is back at the header offset
    Clear,
    /// Draw `text` at pixel row `row`
    DrawChunk { text: &'p [u8], row: u16 },
}

/// Lazy pagination of one payload
///
/// Created by [`paginate`].
#[derive(Debug, Clone)]
pub struct Paginate<'p> {
    remaining: &'p [u8],
    cursor: RenderCursor,
    geometry: Geometry,
    policy: ChunkPolicy,
}

/// Paginate `payload` starting at `cursor`
pub fn paginate<'p>(
    payload: &'p [u8],
    cursor: RenderCursor,
    geometry: &Geometry,
    policy: ChunkPolicy,
) -> Paginate<'p> {
    Paginate {
        remaining: payload,
        cursor,
        geometry: *geometry,
        policy,
    }
}

impl<'p> Paginate<'p> {
    /// Cursor after the instructions yielded so far
    pub fn cursor(&self) -> RenderCursor {
        self.cursor
    }

    /// Bytes not yet placed on a line
    pub fn remaining(&self) -> &'p [u8] {
        self.remaining
    }
}

impl<'p> Iterator for Paginate<'p> {
    type Item = Instruction<'p>;

    fn next(&mut self) -> Option<Self::Item> {
        let width = self.geometry.max_width_chars as usize;
        if !self.policy.continues(self.remaining.len(), width) {
            return None;
        }

        // Wrap before drawing; the chunk follows on the next call
        if self.cursor.overflows(&self.geometry) {
            self.cursor.reset(&self.geometry);
            return Some(Instruction::Clear);
        }

        let take = width.min(self.remaining.len());
        let (text, rest) = self.remaining.split_at(take);
        self.remaining = rest;

        let row = self.cursor.row;
        self.cursor.advance(&self.geometry);

        Some(Instruction::DrawChunk { text, row })
    }
}
