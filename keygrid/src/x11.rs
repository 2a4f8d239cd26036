// Copyright 2025 the Keygrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! X11 backend.
//!
//! The overlay is an override-redirect window covering the default screen,
//! made translucent through `_NET_WM_WINDOW_OPACITY`. The toggle chord is a
//! passive grab on the root window; the pointer is moved with `WarpPointer`
//! and clicks are synthesized through the XTEST extension.
//!
//! X11 auto-repeat delivers a release before every repeated press. A release
//! is only reported once a fresh keymap query shows the key physically up, so
//! held keys never re-arm the toggle chord.

use core::fmt;

use keygrid_address::PixelPoint;
use keygrid_event_state::{
    ChordBindings, Key, KeyPress, KeyboardState, Keycode, Modifiers, PointerButton,
};
use keygrid_overlay::{ColorRole, DrawCommand, MonospaceMetrics, TextExtents, TextMetrics};
use tracing::{debug, trace, warn};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::Event;
use x11rb::protocol::xproto::{
    self, Atom, AtomEnum, ChangeGCAux, ChangeWindowAttributesAux, Colormap, ConfigureWindowAux,
    ConnectionExt as _, CreateGCAux, CreateWindowAux, EventMask, Font, Gcontext, GrabMode,
    InputFocus, KeyPressEvent, KeyReleaseEvent, ModMask, PropMode, Rectangle, Segment, StackMode,
    Visualid, Window, WindowClass,
};
use x11rb::protocol::xtest::{self, ConnectionExt as _};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;
use x11rb::{CURRENT_TIME, NONE};

use crate::platform::{Platform, PlatformEvent};
use crate::{Error, Result};

/// `_NET_WM_WINDOW_OPACITY` of the overlay (25 %).
pub const OVERLAY_OPACITY: u32 = 0x4000_0000;

const FONT_NAME: &[u8] = b"fixed";

const XK_H: u32 = 0x0068;
const XK_T: u32 = 0x0074;
const XK_RETURN: u32 = 0xff0d;
const XK_KP_ENTER: u32 = 0xff8d;
const XK_ESCAPE: u32 = 0xff1b;

/// Longest string a single `PolyText8` item can carry.
const MAX_TEXT_ITEM: usize = 254;

/// The logical key a keysym stands for.
fn key_for_keysym(keysym: u32) -> Key {
    match keysym {
        XK_RETURN | XK_KP_ENTER => Key::Enter,
        XK_ESCAPE => Key::Escape,
        // Printable Latin-1 keysyms are their own code points.
        0x20..=0x7e => u8::try_from(keysym).map_or(Key::Other, |b| Key::Char(char::from(b))),
        _ => Key::Other,
    }
}

/// Keycode to keysym table fetched once at start-up.
#[derive(Debug)]
struct Keymap {
    min_keycode: Keycode,
    per_keycode: usize,
    keysyms: Vec<u32>,
}

impl Keymap {
    fn load(conn: &RustConnection) -> Result<Self> {
        let setup = conn.setup();
        let (min, max) = (setup.min_keycode, setup.max_keycode);
        let count = max.saturating_sub(min).saturating_add(1);
        let reply = conn.get_keyboard_mapping(min, count)?.reply()?;
        Ok(Self {
            min_keycode: min,
            per_keycode: usize::from(reply.keysyms_per_keycode),
            keysyms: reply.keysyms,
        })
    }

    /// Keysym in `column` of `keycode`'s row, or 0 (`NoSymbol`).
    fn keysym(&self, keycode: Keycode, column: usize) -> u32 {
        if column >= self.per_keycode || keycode < self.min_keycode {
            return 0;
        }
        let row = usize::from(keycode - self.min_keycode);
        self.keysyms
            .get(row * self.per_keycode + column)
            .copied()
            .unwrap_or(0)
    }

    /// First keycode producing `keysym` in any column.
    fn keycode_of(&self, keysym: u32) -> Option<Keycode> {
        if self.per_keycode == 0 {
            return None;
        }
        let row = self
            .keysyms
            .chunks(self.per_keycode)
            .position(|syms| syms.contains(&keysym))?;
        self.min_keycode.checked_add(u8::try_from(row).ok()?)
    }

    /// Keysym of a press, honouring Shift when the key has a shifted symbol.
    fn key(&self, keycode: Keycode, modifiers: Modifiers) -> Key {
        let shifted = usize::from(modifiers.contains(Modifiers::SHIFT));
        let keysym = match self.keysym(keycode, shifted) {
            0 => self.keysym(keycode, 0),
            sym => sym,
        };
        key_for_keysym(keysym)
    }
}

#[derive(Clone, Copy, Debug)]
struct ScreenInfo {
    root: Window,
    width: u16,
    height: u16,
    depth: u8,
    visual: Visualid,
    colormap: Colormap,
    black_pixel: u32,
}

/// [`Platform`] implementation on an X11 display.
pub struct X11Platform {
    conn: RustConnection,
    screen: ScreenInfo,
    keymap: Keymap,
    bindings: ChordBindings,
    gc: Gcontext,
    metrics: MonospaceMetrics,
    palette: [u32; ColorRole::COUNT],
    opacity_atom: Atom,
    overlay: Option<Window>,
    saved_focus: Window,
    has_xtest: bool,
}

impl fmt::Debug for X11Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("X11Platform")
            .field("screen", &self.screen)
            .field("bindings", &self.bindings)
            .field("overlay", &self.overlay)
            .field("has_xtest", &self.has_xtest)
            .finish_non_exhaustive()
    }
}

impl X11Platform {
    /// Connect to `display` (or `$DISPLAY`), grab the toggle chord, and
    /// allocate drawing resources.
    ///
    /// Fails only when the display is unusable. Missing colours, a missing
    /// font, failed grabs, and a missing XTEST extension are logged and
    /// degrade the overlay instead.
    pub fn connect(display: Option<&str>) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(display)?;
        let screen = {
            let s = conn
                .setup()
                .roots
                .get(screen_num)
                .ok_or(Error::NoScreen(screen_num))?;
            ScreenInfo {
                root: s.root,
                width: s.width_in_pixels,
                height: s.height_in_pixels,
                depth: s.root_depth,
                visual: s.root_visual,
                colormap: s.default_colormap,
                black_pixel: s.black_pixel,
            }
        };
        debug!(screen = screen_num, width = screen.width, height = screen.height, "connected");

        let keymap = Keymap::load(&conn)?;
        let bindings = ChordBindings::new([XK_H, XK_T].map(|keysym| {
            keymap.keycode_of(keysym).unwrap_or_else(|| {
                warn!(keysym, "no keycode for toggle chord key, chord disabled");
                0
            })
        }));

        let palette = alloc_palette(&conn, &screen)?;

        let font = conn.generate_id()?;
        conn.open_font(font, FONT_NAME)?;
        let gc = conn.generate_id()?;
        conn.create_gc(
            gc,
            screen.root,
            &CreateGCAux::new().font(font).foreground(screen.black_pixel),
        )?;
        let metrics = font_metrics(&conn, font)?;

        let opacity_atom = conn
            .intern_atom(false, b"_NET_WM_WINDOW_OPACITY")?
            .reply()?
            .atom;

        let has_xtest = conn
            .extension_information(xtest::X11_EXTENSION_NAME)?
            .is_some();
        if !has_xtest {
            warn!("XTEST extension missing, clicks will not be synthesized");
        }

        let platform = Self {
            conn,
            screen,
            keymap,
            bindings,
            gc,
            metrics,
            palette,
            opacity_atom,
            overlay: None,
            saved_focus: NONE,
            has_xtest,
        };
        platform.grab_chord()?;
        Ok(platform)
    }

    /// Grab every toggle key under every lock-key combination.
    fn grab_chord(&self) -> Result<()> {
        let root = self.screen.root;
        for keycode in self.bindings.toggle_keys.into_iter().filter(|&k| k != 0) {
            for mods in self.bindings.modifier.lock_variants() {
                let cookie = self.conn.grab_key(
                    true,
                    root,
                    ModMask::from(mods.bits()),
                    keycode,
                    GrabMode::ASYNC,
                    GrabMode::ASYNC,
                )?;
                if let Err(err) = cookie.check() {
                    warn!(%err, keycode, modifiers = mods.bits(), "key grab failed");
                }
            }
        }
        self.conn.change_window_attributes(
            root,
            &ChangeWindowAttributesAux::new()
                .event_mask(EventMask::KEY_PRESS | EventMask::KEY_RELEASE),
        )?;
        self.conn.flush()?;
        Ok(())
    }

    fn translate_key(&self, event: &KeyPressEvent) -> Result<PlatformEvent> {
        let keys = self.conn.query_keymap()?.reply()?.keys;
        let modifiers = Modifiers::from_bits_truncate(u16::from(event.state));
        let key = self.keymap.key(event.detail, modifiers);
        let press = KeyPress::new(event.detail, key, modifiers)
            .with_keyboard(KeyboardState::from_bytes(keys));
        Ok(PlatformEvent::KeyPress {
            press,
            on_overlay: self.overlay == Some(event.event),
        })
    }

    fn translate_release(&self, event: &KeyReleaseEvent) -> Result<Option<PlatformEvent>> {
        let keys = self.conn.query_keymap()?.reply()?.keys;
        Ok(physical_release(event.detail, &KeyboardState::from_bytes(keys)))
    }
}

/// A release of `keycode`, unless `keyboard` shows it still held.
fn physical_release(keycode: Keycode, keyboard: &KeyboardState) -> Option<PlatformEvent> {
    if keyboard.is_down(keycode) {
        return None;
    }
    Some(PlatformEvent::KeyRelease(keycode))
}

fn alloc_palette(conn: &RustConnection, screen: &ScreenInfo) -> Result<[u32; ColorRole::COUNT]> {
    let mut palette = [screen.black_pixel; ColorRole::COUNT];
    for role in ColorRole::ALL {
        let [_, r, g, b] = role.default_rgb().to_be_bytes();
        let wide = |c: u8| u16::from(c) * 257;
        match conn
            .alloc_color(screen.colormap, wide(r), wide(g), wide(b))?
            .reply()
        {
            Ok(reply) => palette[role.index()] = reply.pixel,
            Err(err) => warn!(%err, ?role, "cannot allocate colour, using black"),
        }
    }
    Ok(palette)
}

fn font_metrics(conn: &RustConnection, font: Font) -> Result<MonospaceMetrics> {
    match conn.query_font(font)?.reply() {
        Ok(info) => Ok(MonospaceMetrics {
            advance: f64::from(info.max_bounds.character_width),
            ascent: f64::from(info.font_ascent),
            descent: f64::from(info.font_descent),
        }),
        Err(err) => {
            warn!(%err, "cannot load the `fixed` font, labels may be misplaced");
            Ok(MonospaceMetrics::default())
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "X11 coordinates are 16-bit; out-of-range values saturate."
)]
fn coord(value: f64) -> i16 {
    value.round() as i16
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "X11 extents are 16-bit; negative and out-of-range values saturate."
)]
fn extent(value: f64) -> u16 {
    value.round() as u16
}

/// One `PolyText8` item: length, x delta, then the bytes.
fn text_item(text: &str) -> Vec<u8> {
    let bytes = &text.as_bytes()[..text.len().min(MAX_TEXT_ITEM)];
    let mut item = Vec::with_capacity(bytes.len() + 2);
    item.push(u8::try_from(bytes.len()).unwrap_or(u8::MAX));
    item.push(0);
    item.extend_from_slice(bytes);
    item
}

impl TextMetrics for X11Platform {
    fn text_extents(&self, text: &str) -> TextExtents {
        self.metrics.text_extents(text)
    }
}

impl Platform for X11Platform {
    fn screen_size(&self) -> (u32, u32) {
        (u32::from(self.screen.width), u32::from(self.screen.height))
    }

    fn chord_bindings(&self) -> ChordBindings {
        self.bindings
    }

    fn show_overlay(&mut self) -> Result<()> {
        if self.overlay.is_some() {
            return Ok(());
        }
        let s = self.screen;
        self.saved_focus = self.conn.get_input_focus()?.reply()?.focus;

        let window = self.conn.generate_id()?;
        self.conn.create_window(
            s.depth,
            window,
            s.root,
            0,
            0,
            s.width,
            s.height,
            0,
            WindowClass::INPUT_OUTPUT,
            s.visual,
            &CreateWindowAux::new()
                .override_redirect(1)
                .background_pixel(0)
                .border_pixel(0)
                .event_mask(EventMask::EXPOSURE | EventMask::KEY_PRESS | EventMask::KEY_RELEASE),
        )?;
        self.conn.change_property32(
            PropMode::REPLACE,
            window,
            self.opacity_atom,
            AtomEnum::CARDINAL,
            &[OVERLAY_OPACITY],
        )?;
        self.conn.map_window(window)?;
        self.conn
            .configure_window(window, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE))?;
        self.conn
            .set_input_focus(InputFocus::PARENT, window, CURRENT_TIME)?;
        self.conn.flush()?;
        self.overlay = Some(window);
        Ok(())
    }

    fn hide_overlay(&mut self) -> Result<()> {
        let Some(window) = self.overlay.take() else {
            return Ok(());
        };
        let focus = if self.saved_focus == NONE {
            self.screen.root
        } else {
            self.saved_focus
        };
        self.conn
            .set_input_focus(InputFocus::PARENT, focus, CURRENT_TIME)?;
        self.conn.destroy_window(window)?;
        self.conn.flush()?;
        Ok(())
    }

    fn poll_event(&mut self) -> Result<Option<PlatformEvent>> {
        while let Some(event) = self.conn.poll_for_event()? {
            match event {
                Event::KeyPress(ev) => return self.translate_key(&ev).map(Some),
                Event::KeyRelease(ev) => {
                    if let Some(release) = self.translate_release(&ev)? {
                        return Ok(Some(release));
                    }
                    trace!(keycode = ev.detail, "auto-repeat release dropped");
                }
                Event::Expose(ev) if ev.count == 0 && Some(ev.window) == self.overlay => {
                    return Ok(Some(PlatformEvent::Expose));
                }
                Event::Error(err) => warn!(?err, "X11 request failed"),
                _ => {}
            }
        }
        Ok(None)
    }

    fn draw(&mut self, commands: &[DrawCommand]) -> Result<()> {
        let Some(window) = self.overlay else {
            return Ok(());
        };
        self.conn.clear_area(false, window, 0, 0, 0, 0)?;

        let mut foreground = None;
        for command in commands {
            let (DrawCommand::FillRect { color, .. }
            | DrawCommand::Line { color, .. }
            | DrawCommand::Text { color, .. }) = command;
            if foreground != Some(*color) {
                self.conn.change_gc(
                    self.gc,
                    &ChangeGCAux::new().foreground(self.palette[color.index()]),
                )?;
                foreground = Some(*color);
            }
            match command {
                DrawCommand::FillRect { rect, .. } => {
                    let rectangle = Rectangle {
                        x: coord(rect.x0),
                        y: coord(rect.y0),
                        width: extent(rect.width()),
                        height: extent(rect.height()),
                    };
                    self.conn.poly_fill_rectangle(window, self.gc, &[rectangle])?;
                }
                DrawCommand::Line { line, .. } => {
                    let segment = Segment {
                        x1: coord(line.p0.x),
                        y1: coord(line.p0.y),
                        x2: coord(line.p1.x),
                        y2: coord(line.p1.y),
                    };
                    self.conn.poly_segment(window, self.gc, &[segment])?;
                }
                DrawCommand::Text { origin, label, .. } => {
                    self.conn.poly_text8(
                        window,
                        self.gc,
                        coord(origin.x),
                        coord(origin.y),
                        &text_item(label.as_str()),
                    )?;
                }
            }
        }
        self.conn.flush()?;
        Ok(())
    }

    fn warp_pointer(&mut self, to: PixelPoint) -> Result<()> {
        let x = i16::try_from(to.x).unwrap_or(i16::MAX);
        let y = i16::try_from(to.y).unwrap_or(i16::MAX);
        self.conn
            .warp_pointer(NONE, self.screen.root, 0, 0, 0, 0, x, y)?;
        self.conn.flush()?;
        Ok(())
    }

    fn button(&mut self, button: PointerButton, pressed: bool) -> Result<()> {
        if !self.has_xtest {
            return Err(Error::MissingExtension("XTEST"));
        }
        let kind = if pressed {
            xproto::BUTTON_PRESS_EVENT
        } else {
            xproto::BUTTON_RELEASE_EVENT
        };
        self.conn
            .xtest_fake_input(kind, button, CURRENT_TIME, NONE, 0, 0, 0)?;
        self.conn.flush()?;
        Ok(())
    }
}
