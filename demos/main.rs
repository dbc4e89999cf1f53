//! Demo app: a textured quad over a background that fades between dark
//! and bright while Up or Down is held.

use std::path::Path;
use std::sync::Arc;

use glow::HasContext;
use winit::keyboard::KeyCode;

use glint::{
    Error, GameLogic, GlWindow, Model, ObjectLoader, QUAD_INDICES, QUAD_TEX_COORDS, Renderer,
    UiQuad, load_resource, run,
};

const TITLE: &str = "Fade Quad";
const FADE_STEP: f32 = 0.01;
const TEXTURE_PATH: &str = "demos/texture.png";

#[derive(Default)]
struct FadeQuad {
    loader: Option<ObjectLoader>,
    renderer: Option<Renderer>,
    model: Option<Model>,
    color: f32,
    direction: f32,
}

impl FadeQuad {
    fn step_color(&mut self) {
        self.color = (self.color + self.direction * FADE_STEP).clamp(0.0, 1.0);
    }

    fn clear_color(&self) -> (f32, f32, f32) {
        (self.color * 0.15, self.color * 0.15, self.color * 0.3)
    }

    /// Upload the quad model and its texture. The loader is stored in
    /// `self` before the fallible loads, so handles registered by a
    /// partial failure still reach `cleanup` and get drained.
    fn load_scene(&mut self, gl: Arc<glow::Context>, texture_path: &Path) -> Result<(), Error> {
        let loader = self.loader.insert(ObjectLoader::new(gl));
        let quad = UiQuad::centered();
        let model = unsafe {
            let texture = loader.load_texture(texture_path)?;
            loader
                .load_textured_model(&quad.vertices(), &QUAD_TEX_COORDS, &QUAD_INDICES)?
                .with_texture(texture)
        };
        self.model = Some(model);
        Ok(())
    }
}

impl GameLogic for FadeQuad {
    fn init(&mut self, window: &GlWindow) -> Result<(), Error> {
        let gl = window.gl().clone();

        let vertex_src = load_resource("shaders/quad.vert")?;
        let fragment_src = load_resource("shaders/quad.frag")?;
        // The engine calls init with the GL context current. The
        // renderer is stored as soon as it exists for the same reason
        // the loader is: a later failure still tears it down.
        self.renderer =
            Some(unsafe { Renderer::init(gl.clone(), &vertex_src, &fragment_src) }?);

        self.load_scene(gl, Path::new(TEXTURE_PATH))
    }

    fn input(&mut self, window: &GlWindow) {
        self.direction = if window.is_key_pressed(KeyCode::ArrowUp) {
            1.0
        } else if window.is_key_pressed(KeyCode::ArrowDown) {
            -1.0
        } else {
            0.0
        };
    }

    fn update(&mut self) {
        self.step_color();
    }

    fn render(&mut self, window: &mut GlWindow) -> Result<(), Error> {
        let (Some(renderer), Some(model)) = (self.renderer.as_ref(), self.model.as_ref()) else {
            return Ok(());
        };

        if window.was_resized() {
            #[expect(clippy::cast_possible_wrap)]
            unsafe {
                window
                    .gl()
                    .viewport(0, 0, window.width() as i32, window.height() as i32);
            }
            window.set_resized(false);
        }

        let (r, g, b) = self.clear_color();
        window.set_clear_color(r, g, b, 0.0);
        unsafe { renderer.render(model) };
        Ok(())
    }

    fn cleanup(&mut self) {
        self.model = None;
        if let Some(renderer) = self.renderer.take() {
            unsafe { renderer.cleanup() };
        }
        if let Some(loader) = self.loader.take() {
            unsafe { loader.cleanup() };
        }
    }
}

fn main() {
    if let Err(e) = run(TITLE, (1280, 720), true, FadeQuad::default()) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;

    unsafe extern "system" fn stub_get_string(_name: u32) -> *const u8 {
        c"3.3".as_ptr().cast()
    }

    unsafe extern "system" fn stub_get_integer_v(_pname: u32, data: *mut i32) {
        unsafe { *data = 0 };
    }

    /// A GL function table whose only callable entries are the version
    /// queries issued at construction time. Usable for paths that fail
    /// before their first real GL call.
    fn headless_gl() -> Arc<glow::Context> {
        let gl = unsafe {
            glow::Context::from_loader_function(|name| match name {
                "glGetString" => stub_get_string as *const std::os::raw::c_void,
                "glGetIntegerv" => stub_get_integer_v as *const std::os::raw::c_void,
                _ => std::ptr::null(),
            })
        };
        Arc::new(gl)
    }

    #[test]
    fn failed_scene_load_keeps_the_loader_for_cleanup() {
        // The texture decode fails before the first GL call.
        let mut app = FadeQuad::default();
        let err = app
            .load_scene(headless_gl(), Path::new("demos/no-such-texture.png"))
            .unwrap_err();
        assert!(err.to_string().contains("no-such-texture.png"));
        // The registries survive the failure so cleanup can drain them.
        assert!(app.loader.is_some());
        assert!(app.model.is_none());
    }

    #[test]
    fn fading_up_saturates_at_full_brightness() {
        let mut app = FadeQuad {
            direction: 1.0,
            ..FadeQuad::default()
        };
        for _ in 0..200 {
            app.update();
        }
        assert_eq!(app.color, 1.0);
        assert_eq!(app.clear_color(), (0.15, 0.15, 0.3));
    }

    #[test]
    fn fading_down_never_goes_negative() {
        let mut app = FadeQuad {
            color: 0.05,
            direction: -1.0,
            ..FadeQuad::default()
        };
        for _ in 0..10 {
            app.update();
        }
        assert_eq!(app.color, 0.0);
        assert_eq!(app.clear_color(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn neutral_direction_holds_the_color() {
        let mut app = FadeQuad {
            color: 0.5,
            ..FadeQuad::default()
        };
        app.update();
        assert_eq!(app.color, 0.5);
    }
}
