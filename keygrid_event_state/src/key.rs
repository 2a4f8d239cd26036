// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform-neutral key events.

/// Hardware keycode as reported by the platform (8..=255 on X11).
pub type Keycode = u8;

bitflags::bitflags! {
    /// Modifier mask reported alongside a key event.
    ///
    /// Bit positions match the X11 core protocol so that hosts can convert
    /// masks without a lookup table.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        /// Shift.
        const SHIFT   = 1 << 0;
        /// Caps Lock.
        const LOCK    = 1 << 1;
        /// Control.
        const CONTROL = 1 << 2;
        /// Mod1, usually Alt.
        const MOD1    = 1 << 3;
        /// Mod2, usually Num Lock.
        const MOD2    = 1 << 4;
        /// Mod3.
        const MOD3    = 1 << 5;
        /// Mod4, usually Super.
        const MOD4    = 1 << 6;
        /// Mod5.
        const MOD5    = 1 << 7;
    }
}

impl Modifiers {
    /// Alias for the modifier that Num Lock is conventionally bound to.
    pub const NUM_LOCK: Self = Self::MOD2;

    /// Lock-key bits that must not influence chord recognition.
    pub const LOCKS: Self = Self::LOCK.union(Self::NUM_LOCK);

    /// `self` combined with every Caps Lock / Num Lock state.
    ///
    /// A global key grab matches the modifier mask exactly, so a grab for
    /// `Control` alone misses the key while Num Lock is on. Registering all four
    /// variants makes the chord independent of lock state.
    pub const fn lock_variants(self) -> [Self; 4] {
        [
            self,
            self.union(Self::NUM_LOCK),
            self.union(Self::LOCK),
            self.union(Self::NUM_LOCK).union(Self::LOCK),
        ]
    }

    /// `self` with lock-key bits cleared.
    pub const fn without_locks(self) -> Self {
        self.difference(Self::LOCKS)
    }
}

/// Snapshot of every physical key, one bit per keycode.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyboardState([u8; 32]);

impl Default for KeyboardState {
    fn default() -> Self {
        Self([0; 32])
    }
}

impl core::fmt::Debug for KeyboardState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut list = f.debug_list();
        for keycode in 0..=u8::MAX {
            if self.is_down(keycode) {
                list.entry(&keycode);
            }
        }
        list.finish()
    }
}

impl KeyboardState {
    /// Wrap a raw 32-byte key bitmap (as returned by `QueryKeymap`).
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Whether `keycode` is physically held.
    pub const fn is_down(&self, keycode: Keycode) -> bool {
        self.0[(keycode / 8) as usize] & (1 << (keycode % 8)) != 0
    }

    /// Whether every keycode in `keycodes` is physically held.
    pub fn all_down(&self, keycodes: &[Keycode]) -> bool {
        keycodes.iter().all(|&k| self.is_down(k))
    }

    /// Mark `keycode` as held.
    pub fn press(&mut self, keycode: Keycode) {
        self.0[usize::from(keycode / 8)] |= 1 << (keycode % 8);
    }

    /// Mark `keycode` as released.
    pub fn release(&mut self, keycode: Keycode) {
        self.0[usize::from(keycode / 8)] &= !(1 << (keycode % 8));
    }
}

/// Logical meaning of a key, after the platform's keysym lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Return or keypad Enter.
    Enter,
    /// Escape.
    Escape,
    /// Anything else (function keys, arrows, bare modifiers, …).
    Other,
}

/// A key press with everything the chord detector and state machine need.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    /// Raw hardware keycode.
    pub keycode: Keycode,
    /// Logical key.
    pub key: Key,
    /// Modifier mask reported with the event.
    pub modifiers: Modifiers,
    /// Physical keyboard state at the time of the event.
    pub keyboard: KeyboardState,
}

impl KeyPress {
    /// A press with an empty keyboard snapshot apart from `keycode` itself.
    pub fn new(keycode: Keycode, key: Key, modifiers: Modifiers) -> Self {
        let mut keyboard = KeyboardState::default();
        keyboard.press(keycode);
        Self {
            keycode,
            key,
            modifiers,
            keyboard,
        }
    }

    /// Replace the keyboard snapshot.
    #[must_use]
    pub fn with_keyboard(mut self, keyboard: KeyboardState) -> Self {
        self.keyboard = keyboard;
        self
    }
}
