// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synthetic click planning.
//!
//! A [`ClickMode`] names the logical action the user wants when an address
//! resolves. [`ClickMode::plan`] turns it into a [`ClickPlan`]: the exact
//! sequence of button presses, releases, and waits a host must perform.
//!
//! ## Timing rules
//!
//! 1. **Settle**: every press is followed by [`PRESS_SETTLE`] before its
//!    release. Some platforms drop zero-duration clicks.
//! 2. **Double click**: the two press/release pairs are separated by
//!    [`DOUBLE_CLICK_GAP`], which must stay below the platform's double-click
//!    threshold or the pair is seen as two single clicks.
//!
//! ## Usage
//!
//! ```
//! use keygrid_event_state::click::{ClickMode, ClickStep, PRESS_SETTLE};
//!
//! let plan = ClickMode::Right.plan();
//! assert_eq!(
//!     plan.as_slice(),
//!     &[ClickStep::Press(3), ClickStep::Wait(PRESS_SETTLE), ClickStep::Release(3)],
//! );
//! assert_eq!(ClickMode::Double.plan().presses(), 2);
//! ```

use core::time::Duration;

use smallvec::SmallVec;

/// Mouse button number, as understood by the platform (1 = left, 2 = middle, 3 = right).
pub type PointerButton = u8;

/// Delay between a synthetic press and its release.
pub const PRESS_SETTLE: Duration = Duration::from_millis(10);

/// Delay between the two clicks of a double click.
pub const DOUBLE_CLICK_GAP: Duration = Duration::from_millis(80);

/// Which synthetic pointer action is performed when an address resolves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClickMode {
    /// Single primary-button click.
    #[default]
    Left,
    /// Single secondary-button click.
    Right,
    /// Single middle-button click.
    Middle,
    /// Two primary-button clicks in quick succession.
    Double,
}

impl ClickMode {
    /// Mode selected by the digit of the click-mode chord (`1`..=`4`).
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Self::Left),
            '2' => Some(Self::Right),
            '3' => Some(Self::Middle),
            '4' => Some(Self::Double),
            _ => None,
        }
    }

    /// Platform button number for this mode.
    pub const fn button(self) -> PointerButton {
        match self {
            Self::Left | Self::Double => 1,
            Self::Middle => 2,
            Self::Right => 3,
        }
    }

    /// How many press/release pairs this mode performs.
    pub const fn repeat(self) -> usize {
        match self {
            Self::Double => 2,
            Self::Left | Self::Right | Self::Middle => 1,
        }
    }

    /// The full press/wait/release sequence for this mode.
    pub fn plan(self) -> ClickPlan {
        let button = self.button();
        let mut steps = SmallVec::new();
        for n in 0..self.repeat() {
            if n > 0 {
                steps.push(ClickStep::Wait(DOUBLE_CLICK_GAP));
            }
            steps.push(ClickStep::Press(button));
            steps.push(ClickStep::Wait(PRESS_SETTLE));
            steps.push(ClickStep::Release(button));
        }
        ClickPlan { mode: self, steps }
    }
}

/// One action of a [`ClickPlan`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickStep {
    /// Press the given button.
    Press(PointerButton),
    /// Release the given button.
    Release(PointerButton),
    /// Sleep before the next step.
    Wait(Duration),
}

/// Ordered steps that synthesize one [`ClickMode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClickPlan {
    mode: ClickMode,
    steps: SmallVec<[ClickStep; 8]>,
}

impl ClickPlan {
    /// The mode this plan was built from.
    pub const fn mode(&self) -> ClickMode {
        self.mode
    }

    /// The steps in execution order.
    pub fn as_slice(&self) -> &[ClickStep] {
        &self.steps
    }

    /// Number of button presses in the plan.
    pub fn presses(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, ClickStep::Press(_)))
            .count()
    }

    /// Sum of all waits in the plan.
    pub fn total_wait(&self) -> Duration {
        self.steps
            .iter()
            .filter_map(|s| match s {
                ClickStep::Wait(d) => Some(*d),
                _ => None,
            })
            .sum()
    }
}

impl<'a> IntoIterator for &'a ClickPlan {
    type Item = &'a ClickStep;
    type IntoIter = core::slice::Iter<'a, ClickStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
