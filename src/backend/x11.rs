//! X11 window hosting an orphan-mode ribbon.

use std::{ops::Deref, rc::Rc};

use tracing::debug;
use x11rb::{
    connection::Connection as X11rbConnection,
    protocol::{
        Event,
        xproto::{
            self, AtomEnum, ConfigureWindowAux, ConnectionExt as _, CreateWindowAux, EventMask,
            ImageFormat, KeyButMask, PropMode, StackMode, VisualClass, WindowClass,
        },
    },
    rust_connection::RustConnection,
    wrapper::ConnectionExt as _,
};

use super::{CursorPos, MouseButton, Window, WindowEvent};
use crate::{
    error::{Error, Result, X11Error},
    render::Canvas,
};

x11rb::atom_manager! {
    pub Atoms: AtomCookie {
        UTF8_STRING,

        WM_PROTOCOLS,
        WM_DELETE_WINDOW,

        _NET_WM_NAME,
        _NET_WM_WINDOW_TYPE,
        _NET_WM_WINDOW_TYPE_SPLASH,
        _NET_WM_STATE,
        _NET_WM_STATE_ABOVE,
    }
}

#[derive(Clone)]
pub struct Connection {
    inner: Rc<RustConnection>,
    screen: usize,
}

impl Deref for Connection {
    type Target = RustConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Connection {
    pub fn connect() -> Result<Self> {
        if std::env::var_os("DISPLAY").is_none() {
            return Err(Error::NoDisplay);
        }
        let (conn, screen) = x11rb::connect(None)?;
        Ok(Self {
            inner: Rc::new(conn),
            screen,
        })
    }

    fn root(&self) -> Result<&xproto::Screen> {
        self.inner
            .setup()
            .roots
            .get(self.screen)
            .ok_or(Error::X11(X11Error::NoVisual))
    }

    /// Size of the default screen in pixels.
    pub fn screen_size(&self) -> Result<(u16, u16)> {
        let screen = self.root()?;
        Ok((screen.width_in_pixels, screen.height_in_pixels))
    }

    pub fn create_window(&self, x: i16, y: i16, width: u16, height: u16) -> Result<X11Window> {
        X11Window::create(self.clone(), x, y, width, height)
    }
}

const KEYCODE_ESC: u8 = 9;
const WM_CLASS: &[u8] = b"progress-ribbon\0progress-ribbon\0";

/// Undecorated, always-on-top window the ribbon is drawn into.
pub struct X11Window {
    atoms: Atoms,
    conn: Connection,
    window: xproto::Window,
    gc: xproto::Gcontext,
    width: u32,
    height: u32,
    mapped: bool,
}

impl X11Window {
    fn create(conn: Connection, x: i16, y: i16, width: u16, height: u16) -> Result<Self> {
        let atoms = Atoms::new(&conn.inner)?.reply()?;
        let screen = conn.root()?;
        let root = screen.root;

        let vid = true_color_visual(screen).ok_or(Error::X11(X11Error::NoVisual))?;

        let attrs = CreateWindowAux::new()
            .event_mask(
                EventMask::EXPOSURE
                    | EventMask::STRUCTURE_NOTIFY
                    | EventMask::KEY_PRESS
                    | EventMask::BUTTON_PRESS,
            )
            .border_pixel(0)
            .colormap(0);

        let window = conn.generate_id()?;
        conn.inner
            .create_window(
                24,
                window,
                root,
                x,
                y,
                width,
                height,
                0,
                WindowClass::INPUT_OUTPUT,
                vid,
                &attrs,
            )?
            .check()?;

        let gc = conn.generate_id()?;
        conn.create_gc(
            gc,
            window,
            &xproto::CreateGCAux::new().graphics_exposures(0),
        )?;

        // WM close arrives as a ClientMessage
        conn.change_property32(
            PropMode::REPLACE,
            window,
            atoms.WM_PROTOCOLS,
            AtomEnum::ATOM,
            &[atoms.WM_DELETE_WINDOW],
        )?;

        let win = X11Window {
            atoms,
            conn,
            window,
            gc,
            width: width.into(),
            height: height.into(),
            mapped: false,
        };
        win.set_property8(AtomEnum::WM_CLASS.into(), AtomEnum::STRING.into(), WM_CLASS)?;
        win.set_atoms(
            win.atoms._NET_WM_WINDOW_TYPE,
            &[win.atoms._NET_WM_WINDOW_TYPE_SPLASH],
        )?;
        win.set_atoms(win.atoms._NET_WM_STATE, &[win.atoms._NET_WM_STATE_ABOVE])?;
        debug!(window, width, height, "x11 window created");

        Ok(win)
    }

    fn set_property8(&self, property: u32, ty: u32, value: &[u8]) -> Result<()> {
        self.conn
            .change_property8(PropMode::REPLACE, self.window, property, ty, value)?
            .check()?;
        Ok(())
    }

    fn set_atoms(&self, property: u32, atoms: &[u32]) -> Result<()> {
        self.conn
            .change_property32(
                PropMode::REPLACE,
                self.window,
                property,
                AtomEnum::ATOM,
                atoms,
            )?
            .check()?;
        Ok(())
    }

    /// Moves and resizes the window in root coordinates.
    pub fn move_resize(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        self.conn.configure_window(
            self.window,
            &ConfigureWindowAux::new()
                .x(x)
                .y(y)
                .width(width)
                .height(height),
        )?;
        self.conn.flush()?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn translate(&mut self, ev: Event) -> Option<WindowEvent> {
        Some(match ev {
            Event::ClientMessage(msg) if msg.data.as_data32()[0] == self.atoms.WM_DELETE_WINDOW => {
                WindowEvent::CloseRequested
            }
            // ESC without modifiers dismisses the ribbon
            Event::KeyPress(press)
                if press.event == self.window
                    && press.detail == KEYCODE_ESC
                    && !press
                        .state
                        .intersects(KeyButMask::CONTROL | KeyButMask::SHIFT | KeyButMask::MOD1) =>
            {
                WindowEvent::CloseRequested
            }
            Event::Expose(ex) if ex.count == 0 => WindowEvent::RedrawRequested,
            Event::ConfigureNotify(e) if e.window == self.window => {
                let (width, height) = (u32::from(e.width), u32::from(e.height));
                if (width, height) == (self.width, self.height) {
                    return None;
                }
                self.width = width;
                self.height = height;
                WindowEvent::Resized {
                    width,
                    height,
                }
            }
            Event::ButtonPress(e) => {
                let button = mouse_button(e.detail)?;
                WindowEvent::ButtonPress(
                    button,
                    CursorPos {
                        x: e.event_x,
                        y: e.event_y,
                    },
                )
            }
            _ => return None,
        })
    }
}

impl Window for X11Window {
    fn set_title(&mut self, title: &str) -> Result<()> {
        self.set_property8(
            AtomEnum::WM_NAME.into(),
            AtomEnum::STRING.into(),
            title.as_bytes(),
        )?;
        self.set_property8(
            self.atoms._NET_WM_NAME,
            self.atoms.UTF8_STRING,
            title.as_bytes(),
        )
    }

    fn set_contents(&mut self, canvas: &Canvas) -> Result<()> {
        let invalid = || Error::InvalidSize {
            width: canvas.width(),
            height: canvas.height(),
        };
        let width: u16 = canvas.width().try_into().map_err(|_| invalid())?;
        let height: u16 = canvas.height().try_into().map_err(|_| invalid())?;
        let data = canvas.as_argb();
        self.conn
            .put_image(
                ImageFormat::Z_PIXMAP,
                self.window,
                self.gc,
                width,
                height,
                0,
                0,
                0,
                24,
                &data,
            )?
            .check()?;
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        self.conn.map_window(self.window)?;
        self.conn.configure_window(
            self.window,
            &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE),
        )?;
        self.conn.flush()?;
        self.mapped = true;
        Ok(())
    }

    fn hide(&mut self) -> Result<()> {
        self.conn.unmap_window(self.window)?;
        self.conn.flush()?;
        self.mapped = false;
        Ok(())
    }

    fn is_mapped(&self) -> bool {
        self.mapped
    }

    fn poll_for_event(&mut self) -> Result<Option<WindowEvent>> {
        while let Some(ev) = self.conn.poll_for_event()? {
            if let Some(ev) = self.translate(ev) {
                return Ok(Some(ev));
            }
        }
        Ok(None)
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// First 24-bit TrueColor visual with the usual RGB masks.
fn true_color_visual(screen: &xproto::Screen) -> Option<xproto::Visualid> {
    screen
        .allowed_depths
        .iter()
        .filter(|d| d.depth == 24)
        .flat_map(|d| d.visuals.iter())
        .find(|v| {
            v.class == VisualClass::TRUE_COLOR
                && (v.red_mask, v.green_mask, v.blue_mask) == (0xff_0000, 0x00_ff00, 0x00_00ff)
        })
        .map(|v| v.visual_id)
}

fn mouse_button(detail: u8) -> Option<MouseButton> {
    Some(match detail {
        1 => MouseButton::Left,
        2 => MouseButton::Middle,
        3 => MouseButton::Right,
        _ => return None,
    })
}
