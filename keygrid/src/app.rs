// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The event loop and effect executor.
//!
//! [`App`] is the single state object of a running overlay. It owns the
//! platform, the navigator, the chord detector, and the lifecycle, and is the
//! only place where the pure decisions of those components turn into calls on
//! the [`Platform`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use keygrid_address::{GridGeometry, PixelPoint};
use keygrid_event_state::{ChordAction, ChordDetector, ClickMode, ClickStep, KeyPress};
use keygrid_navigator::{Effect, Lifecycle, NavigationState, Navigator};
use tracing::{debug, info, trace, warn};

use crate::Result;
use crate::config::Config;
use crate::platform::{Platform, PlatformEvent};

/// Sleep between polls when no event is pending.
pub const IDLE_POLL: Duration = Duration::from_millis(10);

/// A running overlay bound to one platform.
#[derive(Debug)]
pub struct App<P> {
    platform: P,
    navigator: Navigator,
    chords: ChordDetector,
    lifecycle: Lifecycle,
}

impl<P: Platform> App<P> {
    /// Hidden overlay sized to the platform's screen.
    pub fn new(platform: P, config: &Config) -> Self {
        let (width, height) = platform.screen_size();
        let chords = ChordDetector::new(platform.chord_bindings());
        Self {
            navigator: Navigator::new(GridGeometry::new(width, height)),
            chords,
            lifecycle: Lifecycle::new(config.idle_timeout_ms()),
            platform,
        }
    }

    /// The platform.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// The platform, mutably.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// The navigation state machine.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Whether the overlay is shown.
    pub fn is_visible(&self) -> bool {
        self.lifecycle.is_visible()
    }

    /// Poll and dispatch events until `shutdown` is set or the display fails.
    ///
    /// A visible overlay is torn down before returning.
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<()> {
        let start = Instant::now();
        let now = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            timeout_ms = self.lifecycle.timeout_ms(),
            "waiting for the toggle chord"
        );

        while !shutdown.load(Ordering::Relaxed) {
            self.tick(now())?;
            match self.platform.poll_event()? {
                Some(event) => self.handle_event(event, now())?,
                None => self.platform.pause(IDLE_POLL),
            }
        }

        info!("shutting down");
        self.close()
    }

    /// Enforce the idle timeout. Returns `true` if the overlay was hidden.
    pub fn tick(&mut self, now: u64) -> Result<bool> {
        if !self.lifecycle.expire(now) {
            return Ok(false);
        }
        info!("overlay idle, hiding");
        self.navigator.reset();
        self.platform.hide_overlay()?;
        Ok(true)
    }

    /// Process one event received at `now`.
    pub fn handle_event(&mut self, event: PlatformEvent, now: u64) -> Result<()> {
        match event {
            PlatformEvent::KeyPress { press, on_overlay } => {
                self.key_press(&press, on_overlay, now)
            }
            PlatformEvent::KeyRelease(keycode) => {
                self.chords.on_key_release(keycode);
                Ok(())
            }
            PlatformEvent::Expose if self.lifecycle.is_visible() => {
                self.paint(self.navigator.state().clone())
            }
            PlatformEvent::Expose => Ok(()),
        }
    }

    fn key_press(&mut self, press: &KeyPress, on_overlay: bool, now: u64) -> Result<()> {
        let focused = on_overlay && self.lifecycle.is_visible();

        match self.chords.on_key_press(press, focused) {
            // Hiding through the chord never clicks.
            ChordAction::ToggleOverlay if self.lifecycle.is_visible() => return self.close(),
            ChordAction::ToggleOverlay => return self.open(now),
            ChordAction::SetClickMode(mode) => {
                self.navigator.set_click_mode(mode);
                return Ok(());
            }
            ChordAction::None => {}
        }

        if !focused || self.chords.is_chord_input(press) {
            return Ok(());
        }
        let effects = self.navigator.handle_key(press.key);
        self.apply(&effects)
    }

    fn open(&mut self, now: u64) -> Result<()> {
        let (width, height) = self.platform.screen_size();
        self.navigator.set_geometry(GridGeometry::new(width, height));
        self.navigator.reset();
        self.platform.show_overlay()?;
        self.lifecycle.show(now);
        debug!(width, height, "overlay shown");
        self.paint(self.navigator.state().clone())
    }

    fn close(&mut self) -> Result<()> {
        self.navigator.reset();
        if self.lifecycle.hide() {
            self.platform.hide_overlay()?;
            debug!("overlay hidden");
        }
        Ok(())
    }

    fn paint(&mut self, view: NavigationState) -> Result<()> {
        let commands = keygrid_overlay::render(&view, self.navigator.geometry(), &self.platform);
        self.platform.draw(&commands)
    }

    /// Carry out the effects of one transition, in order.
    fn apply(&mut self, effects: &[Effect]) -> Result<()> {
        // The navigator has already settled into its next state, so the
        // highlight it reported is what gets painted.
        let mut view = self.navigator.state().clone();

        for effect in effects {
            match *effect {
                Effect::Highlight { cell, subcell } => {
                    debug!(
                        cell = cell.as_ref().map(|c| c.as_str()),
                        subcell = subcell.map(|s| s.as_str()),
                        "highlight"
                    );
                    view = match cell {
                        Some(cell) => NavigationState::highlighting(cell, subcell),
                        None => self.navigator.state().clone(),
                    };
                }
                Effect::Redraw => self.paint(view.clone())?,
                Effect::Warp(to) => self.warp(to),
                Effect::Close => self.close()?,
                Effect::Click(mode) => self.click(mode),
                Effect::Ignore => trace!("key ignored"),
            }
        }
        Ok(())
    }

    fn warp(&mut self, to: PixelPoint) {
        if let Err(err) = self.platform.warp_pointer(to) {
            warn!(%err, x = to.x, y = to.y, "pointer warp failed");
        }
    }

    fn click(&mut self, mode: ClickMode) {
        let plan = mode.plan();
        debug!(?mode, presses = plan.presses(), "click");
        for step in &plan {
            let result = match *step {
                ClickStep::Press(button) => self.platform.button(button, true),
                ClickStep::Release(button) => self.platform.button(button, false),
                ClickStep::Wait(duration) => {
                    self.platform.pause(duration);
                    Ok(())
                }
            };
            if let Err(err) = result {
                warn!(%err, ?mode, "synthetic click failed");
                return;
            }
        }
    }
}
