//! Window and GL context creation, keyboard state, and presentation.
//!
//! [`GlWindow`] is a thin wrapper over winit + glutin: it owns the OS
//! window, the GL context and surface, and the loaded [`glow::Context`].
//! The context is made current on the event-loop thread at creation and
//! stays current for the window's whole lifetime; nothing here is shared
//! across threads.
//!
//! winit delivers keyboard input as events where GLFW-style code polls, so
//! the window keeps a set of currently-pressed key codes that the engine
//! feeds from keyboard events and app logic queries with
//! [`is_key_pressed`](GlWindow::is_key_pressed).

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::sync::Arc;

use glow::HasContext;
use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes};

use crate::error::Error;

/// An OS window with a current OpenGL 3.3 core context.
pub struct GlWindow {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    gl: Arc<glow::Context>,
    pressed: HashSet<KeyCode>,
    width: u32,
    height: u32,
    resized: bool,
    should_close: bool,
}

impl GlWindow {
    /// Create the window, GL context, and surface, and make the context
    /// current.
    ///
    /// Enables vsync when `vsync` is set, and switches on depth, stencil,
    /// and back-face culling as baseline GL state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Init`] if any step of window or context creation
    /// fails. Fatal; the engine never starts its loop.
    pub fn new(
        event_loop: &ActiveEventLoop,
        title: &str,
        (width, height): (u32, u32),
        vsync: bool,
    ) -> Result<Self, Error> {
        let window_attrs = WindowAttributes::default()
            .with_title(title)
            .with_inner_size(LogicalSize::new(width, height));

        let config_template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_depth_size(24)
            .with_stencil_size(8);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attrs))
            .build(event_loop, config_template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("display returned no GL configs")
            })
            .map_err(|e| Error::Init(format!("failed to build display: {e}")))?;

        let window = window.ok_or_else(|| Error::Init("failed to create window".into()))?;
        let gl_display = gl_config.display();

        let raw_handle = window
            .window_handle()
            .map_err(|e| Error::Init(format!("failed to get window handle: {e}")))?
            .into();

        let context_attrs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_handle));

        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attrs) }
            .map_err(|e| Error::Init(format!("failed to create GL context: {e}")))?;

        let inner = window.inner_size();
        let surface_attrs = glutin::surface::SurfaceAttributesBuilder::<WindowSurface>::new()
            .build(
                raw_handle,
                NonZeroU32::new(inner.width.max(1)).unwrap_or(NonZeroU32::MIN),
                NonZeroU32::new(inner.height.max(1)).unwrap_or(NonZeroU32::MIN),
            );

        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attrs) }
            .map_err(|e| Error::Init(format!("failed to create GL surface: {e}")))?;

        let gl_context = not_current
            .make_current(&gl_surface)
            .map_err(|e| Error::Init(format!("failed to make GL context current: {e}")))?;

        let interval = if vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            log::warn!("could not set swap interval: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| gl_display.get_proc_address(name))
        };

        // Baseline GL state: black clear, depth and stencil tests, cull
        // back faces.
        unsafe {
            gl.clear_color(0.0, 0.0, 0.0, 0.0);
            gl.enable(glow::DEPTH_TEST);
            gl.enable(glow::STENCIL_TEST);
            gl.enable(glow::CULL_FACE);
            gl.cull_face(glow::BACK);
        }

        log::info!("window created ({}x{})", inner.width, inner.height);

        Ok(Self {
            window,
            gl_context,
            gl_surface,
            gl: Arc::new(gl),
            pressed: HashSet::new(),
            width: inner.width,
            height: inner.height,
            resized: false,
            should_close: false,
        })
    }

    /// The loaded GL function table, shared with loaders and renderers.
    #[must_use]
    pub fn gl(&self) -> &Arc<glow::Context> {
        &self.gl
    }

    /// Whether `code` is currently held down.
    #[must_use]
    pub fn is_key_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    /// Feed one keyboard event into the pressed-key set.
    ///
    /// Releasing Escape requests window close, matching the scaffold's
    /// only built-in key binding.
    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        match event.state {
            ElementState::Pressed => {
                self.pressed.insert(code);
            }
            ElementState::Released => {
                self.pressed.remove(&code);
                if code == KeyCode::Escape {
                    self.request_close();
                }
            }
        }
    }

    /// Resize the GL surface to match the new window size and raise the
    /// resize flag.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.gl_surface.resize(
            &self.gl_context,
            NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN),
        );
        self.width = size.width;
        self.height = size.height;
        self.resized = true;
    }

    /// Whether the window was resized since the flag was last cleared.
    #[must_use]
    pub fn was_resized(&self) -> bool {
        self.resized
    }

    /// Set or clear the resize flag. App logic clears it after resetting
    /// the viewport.
    pub fn set_resized(&mut self, resized: bool) {
        self.resized = resized;
    }

    /// Current framebuffer width in physical pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Current framebuffer height in physical pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set the color used when clearing the frame.
    pub fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) };
    }

    /// Whether a close was requested (close button or Escape).
    #[must_use]
    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// Request window close. One-way: the flag is never cleared.
    pub fn request_close(&mut self) {
        self.should_close = true;
    }

    /// Present the back buffer. May block on vertical sync.
    pub fn swap_buffers(&self) {
        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            log::error!("failed to swap buffers: {e}");
        }
    }

    /// Replace the title-bar text.
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    /// Ask the OS for another redraw, keeping the loop running.
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
