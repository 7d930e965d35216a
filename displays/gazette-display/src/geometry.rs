//! Text layout geometry
//!
//! All vertical values are pixel offsets. The reference TFT layout uses a
//! 20 px font, 20 characters per line, a five-line header and wraps once the
//! cursor passes line twelve.

/// Longest line any surface may ask the renderer to produce
pub const MAX_LINE_CHARS: usize = 64;

/// Geometry validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// Font height must be non-zero
    ZeroFontHeight,
    /// Visible height must be non-zero
    ZeroMaxHeight,
    /// Line width must be non-zero
    ZeroLineWidth,
    /// Line width exceeds `MAX_LINE_CHARS`
    LineTooWide,
    /// Header leaves no room for text
    HeaderTooTall,
    /// Cursor could not move past the wrap point without overflowing
    TooTall,
    /// Wrap point lies beyond the last row of the surface
    TooManyLines,
}

/// Fixed text layout of a display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    /// Vertical distance between two lines of text
    pub font_height: u16,
    /// Last vertical position text may be drawn at before the screen wraps
    pub max_height: u16,
    /// Characters that fit on one line
    pub max_width_chars: u16,
    /// First text line below the static header
    pub header_offset: u16,
    /// Left margin for text lines
    pub text_x: u16,
}

impl Geometry {
    /// Layout of the reference 320x240 TFT
    pub const fn reference() -> Self {
        Self::from_lines(20, 12, 20, 5, 10)
    }

    /// Build a geometry from line counts
    ///
    /// `max_lines` and `header_lines` are multiplied by `font_height`.
    pub const fn from_lines(
        font_height: u16,
        max_lines: u16,
        max_width_chars: u16,
        header_lines: u16,
        text_x: u16,
    ) -> Self {
        Self {
            font_height,
            max_height: max_lines.saturating_mul(font_height),
            max_width_chars,
            header_offset: header_lines.saturating_mul(font_height),
            text_x,
        }
    }

    /// Check the invariants the renderer relies on
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.font_height == 0 {
            return Err(GeometryError::ZeroFontHeight);
        }
        if self.max_height == 0 {
            return Err(GeometryError::ZeroMaxHeight);
        }
        if self.max_width_chars == 0 {
            return Err(GeometryError::ZeroLineWidth);
        }
        if self.max_width_chars as usize > MAX_LINE_CHARS {
            return Err(GeometryError::LineTooWide);
        }
        // The line after the wrap point must still be representable
        if self.max_height.checked_add(self.font_height).is_none() {
            return Err(GeometryError::TooTall);
        }
        // A header below the wrap point would clear forever
        if self.header_offset > self.max_height {
            return Err(GeometryError::HeaderTooTall);
        }
        Ok(())
    }

    /// Check that every body line lands on one of `rows` surface rows
    ///
    /// The lowest line is drawn at `max_height`, row `max_height / font_height`.
    pub fn fits(&self, rows: u16) -> Result<(), GeometryError> {
        self.validate()?;
        if self.max_height / self.font_height >= rows {
            return Err(GeometryError::TooManyLines);
        }
        Ok(())
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::reference()
    }
}
