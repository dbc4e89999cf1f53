//! A minimal real-time rendering scaffold over OpenGL via [glow].
//!
//! The crate opens a window with a GL 3.3 core context, compiles a
//! vertex/fragment shader pair, uploads vertex, index, and texture data
//! into tracked GPU objects, and drives a fixed-timestep loop that
//! samples keyboard state and issues one draw per frame. App behavior
//! plugs in through the [`GameLogic`] trait; [`run`] owns the window and
//! the loop.
//!
//! # Features
//!
//! - **Fixed-timestep loop**: updates are tied to a tick rate (1000
//!   ticks/s by default), with an FPS figure sampled once per second
//!   into the window title.
//! - **Shader management**: compile, link, and validate programs with
//!   named uniform locations cached up front.
//! - **Resource tracking**: every VAO, buffer, and texture created
//!   through [`ObjectLoader`] is registered and released exactly once by
//!   a consuming `cleanup`.
//! - **Keyboard polling**: event-driven input is folded into a
//!   pressed-key set that app logic queries each iteration.
//!
//! # Safety
//!
//! Loader, shader, and renderer methods are `unsafe` because they issue
//! raw GL calls: they require the window's GL context to be current on
//! the calling thread. The engine loop upholds this for all [`GameLogic`]
//! hooks.
//!
//! [glow]: https://docs.rs/glow

mod clock;
mod engine;
mod error;
mod loader;
mod render;
mod shader;
mod types;
mod ui;
mod util;
mod window;

pub use clock::{DEFAULT_TICK_RATE, FrameClock, Step};
pub use engine::{GameLogic, run};
pub use error::Error;
pub use loader::{ObjectLoader, POSITION_SLOT, TEX_COORD_SLOT};
pub use render::{Renderer, SAMPLER_UNIFORM};
pub use shader::{ShaderProgram, ShaderStage};
pub use types::{Model, Texture};
pub use ui::{UiQuad, QUAD_INDICES, QUAD_TEX_COORDS};
pub use util::load_resource;
pub use window::GlWindow;
