//! The render dispatcher: clears the frame, binds program and model state,
//! and issues one draw call.
//!
//! All GPU bind state touched during [`Renderer::render`] is restored to
//! unbound before it returns, so callers never see bind state leak across
//! calls.

use std::sync::Arc;

use glow::HasContext;

use crate::error::Error;
use crate::loader::{POSITION_SLOT, TEX_COORD_SLOT};
use crate::shader::ShaderProgram;
use crate::types::Model;

/// Name of the texture sampler uniform in the fragment shader.
pub const SAMPLER_UNIFORM: &str = "u_texture";

/// Issues draw calls through a single shader program.
pub struct Renderer {
    gl: Arc<glow::Context>,
    shader: ShaderProgram,
}

impl Renderer {
    /// Compile and link the shader pair and register the sampler uniform.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// Any compile, link, validate, or uniform-resolution failure is fatal
    /// and propagated to the caller before the loop starts.
    pub unsafe fn init(
        gl: Arc<glow::Context>,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self, Error> {
        let mut shader = unsafe { ShaderProgram::new(Arc::clone(&gl)) }?;
        unsafe {
            shader.compile_vertex(vertex_src)?;
            shader.compile_fragment(fragment_src)?;
            shader.link()?;
            shader.create_uniform(SAMPLER_UNIFORM)?;
        }
        log::info!("shader program linked");
        Ok(Self { gl, shader })
    }

    /// Clear the frame and draw one model.
    ///
    /// Binds the shader, points the sampler at texture unit 0, binds the
    /// model's vertex array and texture (if any), issues a triangle-list
    /// draw sized by the model's count, then unbinds everything again.
    ///
    /// # Safety
    ///
    /// Requires a current GL context; the model's handles must still be
    /// alive.
    pub unsafe fn render(&self, model: &Model) {
        let gl = &self.gl;
        unsafe {
            self.clear();

            self.shader.bind();
            self.shader.set_uniform_i32(SAMPLER_UNIFORM, 0);

            gl.bind_vertex_array(Some(model.vao()));
            gl.enable_vertex_attrib_array(POSITION_SLOT);
            if let Some(texture) = model.texture() {
                gl.enable_vertex_attrib_array(TEX_COORD_SLOT);
                gl.active_texture(glow::TEXTURE0);
                gl.bind_texture(glow::TEXTURE_2D, Some(texture.handle()));
            }

            if model.is_indexed() {
                gl.draw_elements(glow::TRIANGLES, model.count(), glow::UNSIGNED_INT, 0);
            } else {
                gl.draw_arrays(glow::TRIANGLES, 0, model.count());
            }

            if model.texture().is_some() {
                gl.bind_texture(glow::TEXTURE_2D, None);
                gl.disable_vertex_attrib_array(TEX_COORD_SLOT);
            }
            gl.disable_vertex_attrib_array(POSITION_SLOT);
            gl.bind_vertex_array(None);

            self.shader.unbind();
        }
    }

    /// Clear the color and depth buffers.
    ///
    /// # Safety
    ///
    /// Requires a current GL context.
    pub unsafe fn clear(&self) {
        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT) };
    }

    /// Access the underlying shader program, e.g. to register additional
    /// uniforms during init.
    pub fn shader_mut(&mut self) -> &mut ShaderProgram {
        &mut self.shader
    }

    /// Tear down the shader program.
    ///
    /// # Safety
    ///
    /// Requires the creating GL context; call exactly once, after
    /// rendering has stopped.
    pub unsafe fn cleanup(self) {
        unsafe { self.shader.cleanup() };
    }
}
