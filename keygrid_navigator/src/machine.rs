// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The keystroke state machine.
//!
//! [`Navigator::handle_key`] is a pure decision step: it updates
//! [`NavigationState`] and returns the [`Effect`]s the host must carry out, in
//! order. It never touches the display itself.
//!
//! | Phase          | Input              | Next phase     | Effects                                   |
//! |----------------|--------------------|----------------|-------------------------------------------|
//! | any            | `Escape`           | `Empty`        | `Close`                                   |
//! | any            | `Enter`            | `Empty`        | (`Highlight`, `Redraw`, `Warp`?), `Close`, `Click` |
//! | any            | ignored key        | unchanged      | `Ignore`                                  |
//! | `Empty`        | char               | `OneChar`      | none                                      |
//! | `OneChar`      | char               | `CellSelected` | `Highlight`, `Redraw`, `Warp`?            |
//! | `CellSelected` | sub-cell letter    | `Empty`        | `Highlight`, `Redraw`, `Warp`?, `Close`, `Click` |
//! | `CellSelected` | other char         | unchanged      | `Ignore`                                  |
//!
//! `Warp` is only emitted when the typed code names a cell on screen. `Close`
//! always precedes `Click`, so the synthetic click reaches the window beneath
//! the overlay instead of the overlay itself.

use keygrid_address::{GridGeometry, PixelPoint, SubCellId};
use keygrid_event_state::{ClickMode, Key};
use smallvec::SmallVec;

use crate::buffer::{CellCode, TypedBuffer};

/// Where the machine is in resolving an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing typed.
    Empty,
    /// One character typed.
    OneChar,
    /// Two characters typed; a cell is highlighted and the sub-grid is shown.
    CellSelected,
}

/// A key event reduced to what the state machine distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Input {
    /// A lowercase ASCII letter or digit.
    Char(u8),
    /// Confirm the current target.
    Enter,
    /// Abort without clicking.
    Escape,
    /// Anything the machine does not react to.
    Ignored,
}

impl Input {
    /// Classify a logical key. Letters are lowercased; non-alphanumerics are ignored.
    pub fn classify(key: Key) -> Self {
        match key {
            Key::Enter => Self::Enter,
            Key::Escape => Self::Escape,
            Key::Char(c) if c.is_ascii_alphanumeric() => {
                u8::try_from(c.to_ascii_lowercase()).map_or(Self::Ignored, Self::Char)
            }
            Key::Char(_) | Key::Other => Self::Ignored,
        }
    }
}

/// A side effect requested by the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// The highlighted cell and/or sub-cell changed.
    Highlight {
        /// Newly highlighted cell code.
        cell: Option<CellCode>,
        /// Newly highlighted sub-cell.
        subcell: Option<SubCellId>,
    },
    /// Redraw the overlay from the current state.
    Redraw,
    /// Move the pointer.
    Warp(PixelPoint),
    /// Perform a click in the given mode at the current pointer position.
    Click(ClickMode),
    /// Hide the overlay.
    Close,
    /// The input was discarded.
    Ignore,
}

/// Effects of one transition, in execution order.
pub type Effects = SmallVec<[Effect; 6]>;

/// Navigation state for one overlay session, plus the session-spanning click mode.
///
/// Invariant: `highlighted_subcell` is set only while `highlighted_cell` is set
/// and three characters are buffered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationState {
    buffer: TypedBuffer,
    highlighted_cell: Option<CellCode>,
    highlighted_subcell: Option<SubCellId>,
    click_mode: ClickMode,
}

impl NavigationState {
    /// Characters typed so far.
    pub const fn buffer(&self) -> &TypedBuffer {
        &self.buffer
    }

    /// The highlighted cell code, once two characters have been typed.
    pub const fn highlighted_cell(&self) -> Option<CellCode> {
        self.highlighted_cell
    }

    /// The highlighted sub-cell, during the resolving transition.
    pub const fn highlighted_subcell(&self) -> Option<SubCellId> {
        self.highlighted_subcell
    }

    /// The active click mode.
    pub const fn click_mode(&self) -> ClickMode {
        self.click_mode
    }

    /// Whether the sub-grid of the highlighted cell should be shown.
    ///
    /// True while a sub-cell is highlighted, or while the buffer holds exactly the
    /// highlighted code and is waiting for a sub-cell letter.
    pub fn shows_subgrid(&self) -> bool {
        let Some(cell) = self.highlighted_cell else {
            return false;
        };
        self.highlighted_subcell.is_some()
            || (self.buffer.len() == 2 && self.buffer.as_bytes() == cell.as_bytes())
    }

    /// Current phase, derived from the buffer length.
    pub const fn phase(&self) -> Phase {
        match self.buffer.len() {
            0 => Phase::Empty,
            1 => Phase::OneChar,
            _ => Phase::CellSelected,
        }
    }

    /// A display-only state that highlights `cell` with its sub-grid shown and,
    /// optionally, `subcell` selected.
    ///
    /// Hosts use it to paint the target of a transition after the live state
    /// has already been cleared.
    pub fn highlighting(cell: CellCode, subcell: Option<SubCellId>) -> Self {
        let mut buffer = TypedBuffer::new();
        for byte in cell.as_bytes() {
            buffer.push(byte);
        }
        if let Some(sub) = subcell {
            buffer.push(sub.as_str().as_bytes()[0]);
        }
        Self {
            buffer,
            highlighted_cell: Some(cell),
            highlighted_subcell: subcell,
            click_mode: ClickMode::default(),
        }
    }

    /// Discard typed characters and highlights. The click mode is kept.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.highlighted_cell = None;
        self.highlighted_subcell = None;
    }
}

/// The keystroke state machine bound to one screen geometry.
#[derive(Clone, Debug)]
pub struct Navigator {
    state: NavigationState,
    geometry: GridGeometry,
}

impl Navigator {
    /// A navigator in the `Empty` phase with [`ClickMode::Left`].
    pub fn new(geometry: GridGeometry) -> Self {
        Self {
            state: NavigationState::default(),
            geometry,
        }
    }

    /// Read-only view of the current state.
    pub const fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Geometry used to resolve codes.
    pub const fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Replace the geometry, for example after a screen resize.
    pub fn set_geometry(&mut self, geometry: GridGeometry) {
        self.geometry = geometry;
    }

    /// The active click mode.
    pub const fn click_mode(&self) -> ClickMode {
        self.state.click_mode
    }

    /// Switch the click mode. Takes effect on the next resolved address.
    pub fn set_click_mode(&mut self, mode: ClickMode) {
        #[cfg(feature = "tracing")]
        tracing::debug!(?mode, "click mode changed");
        self.state.click_mode = mode;
    }

    /// Return to `Empty`, e.g. when the overlay is hidden from outside.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// Classify `key` and run one transition.
    pub fn handle_key(&mut self, key: Key) -> Effects {
        self.step(Input::classify(key))
    }

    /// Run one transition.
    pub fn step(&mut self, input: Input) -> Effects {
        let phase = self.state.phase();
        #[cfg(feature = "tracing")]
        tracing::trace!(?phase, ?input, buffer = self.state.buffer.as_str(), "navigator step");

        match (phase, input) {
            (_, Input::Escape) => {
                self.state.clear();
                Effects::from_slice(&[Effect::Close])
            }
            (_, Input::Enter) => self.confirm(),
            (_, Input::Ignored) => Effects::from_slice(&[Effect::Ignore]),
            (Phase::Empty, Input::Char(c)) => {
                self.state.buffer.push(c);
                Effects::new()
            }
            (Phase::OneChar, Input::Char(c)) => self.select_cell(c),
            (Phase::CellSelected, Input::Char(c)) => self.select_subcell(c),
        }
    }

    fn select_cell(&mut self, c: u8) -> Effects {
        self.state.buffer.push(c);
        let code = self.state.buffer.code();
        self.state.highlighted_cell = code;
        self.state.highlighted_subcell = None;

        let mut effects = Effects::new();
        effects.push(Effect::Highlight {
            cell: code,
            subcell: None,
        });
        effects.push(Effect::Redraw);
        if let Some(center) = code.and_then(|code| self.cell_center(code)) {
            effects.push(Effect::Warp(center));
        }
        effects
    }

    fn select_subcell(&mut self, c: u8) -> Effects {
        let Some(sub) = SubCellId::from_char(char::from(c)) else {
            #[cfg(feature = "tracing")]
            tracing::trace!(key = %char::from(c), "not a sub-cell letter");
            return Effects::from_slice(&[Effect::Ignore]);
        };

        self.state.buffer.push(c);
        self.state.highlighted_subcell = Some(sub);
        let cell = self.state.highlighted_cell;

        let mut effects = Effects::new();
        effects.push(Effect::Highlight {
            cell,
            subcell: Some(sub),
        });
        effects.push(Effect::Redraw);
        let target = cell
            .and_then(CellCode::cell_id)
            .and_then(|id| self.geometry.subcell_center(id, sub));
        if let Some(target) = target {
            effects.push(Effect::Warp(target));
        }
        effects.push(Effect::Close);
        effects.push(Effect::Click(self.state.click_mode));
        self.state.clear();
        effects
    }

    fn confirm(&mut self) -> Effects {
        let mut effects = Effects::new();
        if self.state.buffer.len() >= 2 {
            let cell = self.state.highlighted_cell;
            self.state.highlighted_subcell = None;
            effects.push(Effect::Highlight {
                cell,
                subcell: None,
            });
            effects.push(Effect::Redraw);
            if let Some(center) = cell.and_then(|code| self.cell_center(code)) {
                effects.push(Effect::Warp(center));
            }
        }
        effects.push(Effect::Close);
        effects.push(Effect::Click(self.state.click_mode));
        self.state.clear();
        effects
    }

    fn cell_center(&self, code: CellCode) -> Option<PixelPoint> {
        code.cell_id().and_then(|id| self.geometry.cell_center(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigator() -> Navigator {
        Navigator::new(GridGeometry::with_cell_size(1000, 500, 50))
    }

    fn type_str(nav: &mut Navigator, s: &str) -> Effects {
        let mut last = Effects::new();
        for c in s.chars() {
            last = nav.handle_key(Key::Char(c));
        }
        last
    }

    fn count(effects: &[Effect], pred: impl Fn(&Effect) -> bool) -> usize {
        effects.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn first_char_only_buffers() {
        let mut nav = navigator();
        let fx = nav.handle_key(Key::Char('B'));
        assert!(fx.is_empty());
        assert_eq!(nav.state().phase(), Phase::OneChar);
        assert_eq!(nav.state().buffer().as_str(), "b");
        assert!(nav.state().highlighted_cell().is_none());
    }

    #[test]
    fn two_chars_highlight_and_warp_to_center() {
        let mut nav = navigator();
        let fx = type_str(&mut nav, "b0");
        let code = nav.state().highlighted_cell().unwrap();
        assert_eq!(code.as_str(), "b0");
        assert_eq!(
            fx.as_slice(),
            &[
                Effect::Highlight {
                    cell: Some(code),
                    subcell: None
                },
                Effect::Redraw,
                Effect::Warp(PixelPoint::new(525, 25)),
            ]
        );
        assert!(nav.state().shows_subgrid());
    }

    #[test]
    fn unresolved_code_still_highlights() {
        let mut nav = navigator();
        for code in ["zz", "u0", "7q"] {
            nav.reset();
            let fx = type_str(&mut nav, code);
            assert_eq!(
                nav.state().highlighted_cell().map(|c| c.as_bytes()),
                Some([code.as_bytes()[0], code.as_bytes()[1]]),
                "code {code}"
            );
            assert_eq!(count(&fx, |e| matches!(e, Effect::Warp(_))), 0, "code {code}");
            assert_eq!(nav.state().phase(), Phase::CellSelected, "code {code}");
        }
    }

    #[test]
    fn invalid_third_char_is_dropped() {
        let mut nav = navigator();
        type_str(&mut nav, "b0");
        for c in ['a', 'z', '5', 'q'] {
            let fx = nav.handle_key(Key::Char(c));
            assert_eq!(fx.as_slice(), &[Effect::Ignore], "char {c}");
            assert_eq!(nav.state().buffer().as_str(), "b0", "char {c}");
            assert!(nav.state().highlighted_subcell().is_none(), "char {c}");
        }
    }

    #[test]
    fn full_address_warps_then_closes_then_clicks() {
        let mut nav = navigator();
        type_str(&mut nav, "b0");
        let fx = nav.handle_key(Key::Char('r'));
        assert_eq!(
            &fx[1..],
            &[
                Effect::Redraw,
                Effect::Warp(PixelPoint::new(540, 8)),
                Effect::Close,
                Effect::Click(ClickMode::Left),
            ]
        );
        assert!(matches!(
            fx[0],
            Effect::Highlight {
                subcell: Some(s),
                ..
            } if s.as_char() == 'r'
        ));
        assert_eq!(nav.state().phase(), Phase::Empty);
        assert!(nav.state().highlighted_cell().is_none());
    }

    #[test]
    fn subcell_of_unresolved_cell_clicks_in_place() {
        let mut nav = navigator();
        type_str(&mut nav, "zz");
        let fx = nav.handle_key(Key::Char('g'));
        assert_eq!(count(&fx, |e| matches!(e, Effect::Warp(_))), 0);
        assert_eq!(count(&fx, |e| matches!(e, Effect::Click(_))), 1);
        assert_eq!(fx.last(), Some(&Effect::Click(ClickMode::Left)));
    }

    #[test]
    fn escape_aborts_from_every_phase() {
        for typed in ["", "a", "a1"] {
            let mut nav = navigator();
            type_str(&mut nav, typed);
            let fx = nav.handle_key(Key::Escape);
            assert_eq!(fx.as_slice(), &[Effect::Close], "typed {typed:?}");
            assert_eq!(nav.state().phase(), Phase::Empty, "typed {typed:?}");
            assert_eq!(count(&fx, |e| matches!(e, Effect::Click(_))), 0);
        }
    }

    #[test]
    fn enter_with_cell_warps_to_center_and_clicks() {
        let mut nav = navigator();
        nav.set_click_mode(ClickMode::Right);
        type_str(&mut nav, "c5");
        let fx = nav.handle_key(Key::Enter);
        assert_eq!(
            &fx[1..],
            &[
                Effect::Redraw,
                Effect::Warp(PixelPoint::new(275, 75)),
                Effect::Close,
                Effect::Click(ClickMode::Right),
            ]
        );
        assert_eq!(nav.state().phase(), Phase::Empty);
    }

    #[test]
    fn enter_on_unresolved_code_clicks_without_warping() {
        let mut nav = navigator();
        type_str(&mut nav, "zz");
        let fx = nav.handle_key(Key::Enter);
        assert_eq!(count(&fx, |e| matches!(e, Effect::Warp(_))), 0);
        assert_eq!(
            &fx[1..],
            &[Effect::Redraw, Effect::Close, Effect::Click(ClickMode::Left)]
        );
        assert_eq!(nav.state().phase(), Phase::Empty);
    }

    #[test]
    fn enter_without_cell_clicks_in_place() {
        for typed in ["", "c"] {
            let mut nav = navigator();
            type_str(&mut nav, typed);
            let fx = nav.handle_key(Key::Enter);
            assert_eq!(
                fx.as_slice(),
                &[Effect::Close, Effect::Click(ClickMode::Left)],
                "typed {typed:?}"
            );
        }
    }

    #[test]
    fn ignored_keys_leave_state_alone() {
        let mut nav = navigator();
        type_str(&mut nav, "a");
        for key in [Key::Other, Key::Char('-'), Key::Char(' '), Key::Char('é')] {
            assert_eq!(nav.handle_key(key).as_slice(), &[Effect::Ignore], "key {key:?}");
        }
        assert_eq!(nav.state().buffer().as_str(), "a");
    }

    #[test]
    fn click_mode_survives_reset() {
        let mut nav = navigator();
        nav.set_click_mode(ClickMode::Double);
        type_str(&mut nav, "a1");
        nav.reset();
        assert_eq!(nav.click_mode(), ClickMode::Double);
        let fx = type_str(&mut nav, "a1t");
        assert_eq!(fx.last(), Some(&Effect::Click(ClickMode::Double)));
    }

    #[test]
    fn highlighting_snapshot_matches_live_state() {
        let mut nav = navigator();
        type_str(&mut nav, "b0");
        let code = nav.state().highlighted_cell().unwrap();
        let snapshot = NavigationState::highlighting(code, None);
        assert_eq!(&snapshot, nav.state());

        let r = SubCellId::from_char('r').unwrap();
        let snapshot = NavigationState::highlighting(code, Some(r));
        assert!(snapshot.shows_subgrid());
        assert_eq!(snapshot.buffer().as_str(), "b0r");
        assert_eq!(snapshot.highlighted_subcell(), Some(r));
    }

    #[test]
    fn subgrid_hidden_until_cell_selected() {
        let mut nav = navigator();
        assert!(!nav.state().shows_subgrid());
        type_str(&mut nav, "a");
        assert!(!nav.state().shows_subgrid());
        type_str(&mut nav, "1");
        assert!(nav.state().shows_subgrid());
    }
}
