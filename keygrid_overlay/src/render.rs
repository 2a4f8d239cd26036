// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-list generation.

use alloc::vec::Vec;

use keygrid_address::{CellId, GridCell, GridGeometry, PixelPoint, SubCellId};
use keygrid_navigator::NavigationState;
use kurbo::{Line, Point, Rect};

use crate::metrics::TextMetrics;

/// Semantic colour of a draw command. Backends map roles to concrete colours.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorRole {
    /// Cell and sub-cell borders.
    GridLine,
    /// Id of an ordinary cell.
    Label,
    /// Background of the highlighted cell.
    ActiveFill,
    /// Id of the highlighted cell.
    ActiveLabel,
    /// Letters of unselected sub-cells.
    SubcellLabel,
    /// Background of the selected sub-cell.
    SubcellFill,
    /// Letter of the selected sub-cell.
    SubcellActiveLabel,
}

impl ColorRole {
    /// Number of roles.
    pub const COUNT: usize = 7;

    /// Every role, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::GridLine,
        Self::Label,
        Self::ActiveFill,
        Self::ActiveLabel,
        Self::SubcellLabel,
        Self::SubcellFill,
        Self::SubcellActiveLabel,
    ];

    /// Default colour as `0xRRGGBB`.
    pub const fn default_rgb(self) -> u32 {
        match self {
            Self::GridLine | Self::ActiveFill | Self::SubcellActiveLabel => 0xFF_FF_FF,
            Self::Label | Self::SubcellFill => 0xFF_A5_00,
            Self::ActiveLabel | Self::SubcellLabel => 0x33_33_33,
        }
    }

    /// Position of this role in [`ColorRole::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::GridLine => 0,
            Self::Label => 1,
            Self::ActiveFill => 2,
            Self::ActiveLabel => 3,
            Self::SubcellLabel => 4,
            Self::SubcellFill => 5,
            Self::SubcellActiveLabel => 6,
        }
    }
}

/// Text drawn by a [`DrawCommand::Text`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Label {
    /// A two-character cell id.
    Cell(CellId),
    /// A one-character sub-cell letter.
    Subcell(SubCellId),
}

impl Label {
    /// The label text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cell(id) => id.as_str(),
            Self::Subcell(sub) => sub.as_str(),
        }
    }
}

/// One drawing primitive, in surface pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Fill a rectangle.
    FillRect {
        /// Area to fill.
        rect: Rect,
        /// Fill colour.
        color: ColorRole,
    },
    /// Stroke a one-pixel line.
    Line {
        /// Line endpoints.
        line: Line,
        /// Stroke colour.
        color: ColorRole,
    },
    /// Draw a label with its baseline starting at `origin`.
    Text {
        /// Left end of the baseline.
        origin: Point,
        /// What to draw.
        label: Label,
        /// Text colour.
        color: ColorRole,
    },
}

/// Build the draw list for the whole overlay.
///
/// Cells are emitted row-major. Each cell gets its top and left border (the
/// neighbours supply the rest) and its centered id. The highlighted cell is
/// filled first and labelled in [`ColorRole::ActiveLabel`]; when
/// [`NavigationState::shows_subgrid`] holds, its 3×3 sub-grid follows.
pub fn render(
    state: &NavigationState,
    geometry: &GridGeometry,
    metrics: &impl TextMetrics,
) -> Vec<DrawCommand> {
    let mut out = Vec::with_capacity(geometry.cell_count() * 3 + 32);
    let highlighted = state.highlighted_cell();
    let subgrid = state.shows_subgrid();

    for cell in geometry.cells() {
        let is_active = highlighted.is_some_and(|code| code.matches(cell.id));
        let rect = square(cell.origin, cell.size);

        if is_active {
            out.push(DrawCommand::FillRect {
                rect,
                color: ColorRole::ActiveFill,
            });
        }
        push_borders(&mut out, rect);
        out.push(DrawCommand::Text {
            origin: centered(metrics, cell.id.as_str(), rect),
            label: Label::Cell(cell.id),
            color: if is_active {
                ColorRole::ActiveLabel
            } else {
                ColorRole::Label
            },
        });

        if is_active && subgrid {
            push_subgrid(&mut out, &cell, state.highlighted_subcell(), metrics);
        }
    }
    out
}

fn push_subgrid(
    out: &mut Vec<DrawCommand>,
    cell: &GridCell,
    selected: Option<SubCellId>,
    metrics: &impl TextMetrics,
) {
    for sub in cell.subcells() {
        let rect = square(sub.origin, sub.size);
        let is_selected = selected == Some(sub.id);
        if is_selected {
            out.push(DrawCommand::FillRect {
                rect,
                color: ColorRole::SubcellFill,
            });
        }
        push_borders(out, rect);
        out.push(DrawCommand::Text {
            origin: centered(metrics, sub.id.as_str(), rect),
            label: Label::Subcell(sub.id),
            color: if is_selected {
                ColorRole::SubcellActiveLabel
            } else {
                ColorRole::SubcellLabel
            },
        });
    }
}

fn push_borders(out: &mut Vec<DrawCommand>, rect: Rect) {
    out.push(DrawCommand::Line {
        line: Line::new((rect.x0, rect.y0), (rect.x0, rect.y1)),
        color: ColorRole::GridLine,
    });
    out.push(DrawCommand::Line {
        line: Line::new((rect.x0, rect.y0), (rect.x1, rect.y0)),
        color: ColorRole::GridLine,
    });
}

fn square(origin: PixelPoint, size: u32) -> Rect {
    let x = f64::from(origin.x);
    let y = f64::from(origin.y);
    let size = f64::from(size);
    Rect::new(x, y, x + size, y + size)
}

fn centered(metrics: &impl TextMetrics, text: &str, rect: Rect) -> Point {
    let extents = metrics.text_extents(text);
    let center = rect.center();
    Point::new(
        center.x - extents.width / 2.0,
        center.y + (extents.ascent - extents.descent) / 2.0,
    )
}
