//! The engine loop: owns the window and clock, drives app logic.
//!
//! [`run`] spins up a winit event loop in poll mode and redraws
//! continuously. Every redraw advances the [`FrameClock`]; input is
//! sampled on every iteration, while update and render run only on
//! iterations where at least one tick elapsed, so simulation speed stays
//! tied to the tick rate rather than to how fast the machine can spin
//! the loop.

use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::clock::{DEFAULT_TICK_RATE, FrameClock};
use crate::error::Error;
use crate::window::GlWindow;

/// App-side hooks called by the engine loop.
///
/// `init` runs once after the GL context exists, `cleanup` runs exactly
/// once when the loop exits, and the three per-frame hooks run in the
/// order `input`, `update`, `render`.
pub trait GameLogic {
    /// Create GPU resources. The window's GL context is current.
    ///
    /// # Errors
    ///
    /// Returning an error aborts the loop before the first frame.
    fn init(&mut self, window: &GlWindow) -> Result<(), Error>;

    /// Sample input state. Called every loop iteration, elapsed tick or
    /// not.
    fn input(&mut self, window: &GlWindow);

    /// Advance simulation state by one step.
    fn update(&mut self);

    /// Record and issue draw commands for one frame.
    ///
    /// # Errors
    ///
    /// Returning an error stops the loop; `cleanup` still runs.
    fn render(&mut self, window: &mut GlWindow) -> Result<(), Error>;

    /// Release GPU resources. Called exactly once, context still current.
    fn cleanup(&mut self);
}

struct Engine<L: GameLogic> {
    title: String,
    size: (u32, u32),
    vsync: bool,
    window: Option<GlWindow>,
    clock: Option<FrameClock>,
    logic: L,
    cleaned_up: bool,
    error: Option<Error>,
}

impl<L: GameLogic> Engine<L> {
    fn new(title: &str, size: (u32, u32), vsync: bool, logic: L) -> Self {
        Self {
            title: title.to_owned(),
            size,
            vsync,
            window: None,
            clock: None,
            logic,
            cleaned_up: false,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        log::error!("{error}");
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }

    /// One loop iteration: advance the clock, sample input, and on an
    /// elapsed tick run update and render once and present the frame.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(clock)) = (self.window.as_mut(), self.clock.as_mut()) else {
            return;
        };

        let step = clock.advance(Instant::now());
        self.logic.input(window);

        if !step.elapsed() {
            return;
        }

        if window.should_close() {
            event_loop.exit();
            return;
        }

        if let Some(fps) = step.fps_sample {
            window.set_title(&format!("{} - {fps} fps", self.title));
        }

        self.logic.update();
        if let Err(e) = self.logic.render(window) {
            self.fail(event_loop, e);
            return;
        }
        clock.count_frame();
        window.swap_buffers();
    }

    fn shut_down(&mut self) {
        if self.cleaned_up {
            return;
        }
        self.cleaned_up = true;
        self.logic.cleanup();
        self.window = None;
        log::info!("engine stopped");
    }
}

impl<L: GameLogic> ApplicationHandler for Engine<L> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window = match GlWindow::new(event_loop, &self.title, self.size, self.vsync) {
            Ok(window) => window,
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        };
        if let Err(e) = self.logic.init(&window) {
            self.fail(event_loop, e);
            return;
        }
        self.window = Some(window);
        self.clock = Some(FrameClock::new(DEFAULT_TICK_RATE, Instant::now()));
        log::info!("engine started at {DEFAULT_TICK_RATE} ticks/s");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(window) = self.window.as_mut() {
                    window.request_close();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(window) = self.window.as_mut() {
                    window.handle_key_event(&event);
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(window) = self.window.as_mut() {
                    window.resize(size);
                }
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shut_down();
    }
}

/// Run `logic` under the engine loop until the window closes or a hook
/// fails.
///
/// Installs the default logger if none is set yet, then blocks on the
/// event loop.
///
/// # Errors
///
/// Returns [`Error::Init`] if the event loop or window cannot be
/// created, or the first error an app hook reported.
pub fn run<L: GameLogic>(
    title: &str,
    size: (u32, u32),
    vsync: bool,
    logic: L,
) -> Result<(), Error> {
    let _ = env_logger::try_init();

    let event_loop =
        EventLoop::new().map_err(|e| Error::Init(format!("failed to create event loop: {e}")))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut engine = Engine::new(title, size, vsync, logic);
    event_loop
        .run_app(&mut engine)
        .map_err(|e| Error::Init(format!("event loop failed: {e}")))?;

    match engine.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
