//! Display surface abstraction for Gazette
//!
//! This crate provides:
//! - `DisplaySurface` trait for character-oriented drawing surfaces
//! - `Geometry` describing the fixed text layout of a surface
//! - `TextGrid`, an in-memory surface that maps pixel positions onto cells
//!
//! # Architecture
//!
//! The renderer in `gazette-core` only needs to clear the screen and draw a
//! line of text at a pixel position. Controller setup, fonts and pixel
//! primitives stay with the board-specific implementation.

#![no_std]
#![deny(unsafe_code)]

pub mod geometry;
pub mod grid;
pub mod surface;

pub use geometry::{Geometry, GeometryError, MAX_LINE_CHARS};
pub use grid::TextGrid;
pub use surface::{DisplayError, DisplaySurface};
