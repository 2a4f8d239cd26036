// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement supplied by the drawing surface.

/// Size of a run of text as drawn by the target surface.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TextExtents {
    /// Advance width.
    pub width: f64,
    /// Distance from the baseline to the top of the font.
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the font.
    pub descent: f64,
}

/// Source of text extents for label centering.
pub trait TextMetrics {
    /// Measure `text` in the surface's current font.
    fn text_extents(&self, text: &str) -> TextExtents;
}

/// Fixed-advance metrics, for headless rendering and tests.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MonospaceMetrics {
    /// Width of every glyph.
    pub advance: f64,
    /// Font ascent.
    pub ascent: f64,
    /// Font descent.
    pub descent: f64,
}

impl Default for MonospaceMetrics {
    /// Metrics of the X11 core `fixed` font (6×13).
    fn default() -> Self {
        Self {
            advance: 6.0,
            ascent: 11.0,
            descent: 2.0,
        }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn text_extents(&self, text: &str) -> TextExtents {
        let glyphs = text.chars().count();
        TextExtents {
            width: self.advance * f64::from(u32::try_from(glyphs).unwrap_or(u32::MAX)),
            ascent: self.ascent,
            descent: self.descent,
        }
    }
}
