//! Shader program compilation, linking, and uniform management.
//!
//! A [`ShaderProgram`] walks a fixed lifecycle: create the program, compile
//! and attach the vertex and fragment stages, link (which detaches the
//! stages and validates), register uniforms, then bind/unbind around draw
//! calls until [`cleanup`](ShaderProgram::cleanup) deletes the handle.
//!
//! Uniform locations are resolved once through
//! [`create_uniform`](ShaderProgram::create_uniform) and cached in a
//! name-to-location map; the `set_uniform_*` writers only consult the cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use glow::HasContext;

use crate::error::Error;

/// The two programmable stages this scaffold uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Per-vertex stage.
    Vertex,
    /// Per-fragment stage.
    Fragment,
}

impl ShaderStage {
    /// The GL enum for this stage.
    #[must_use]
    pub fn gl_type(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// A GPU shader program with cached uniform locations.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    program: glow::Program,
    vertex_shader: Option<glow::Shader>,
    fragment_shader: Option<glow::Shader>,
    uniforms: HashMap<String, glow::UniformLocation>,
}

impl ShaderProgram {
    /// Create an empty program.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Gpu`] if the program object cannot be allocated.
    pub unsafe fn new(gl: Arc<glow::Context>) -> Result<Self, Error> {
        let program = unsafe { gl.create_program() }.map_err(Error::Gpu)?;
        Ok(Self {
            gl,
            program,
            vertex_shader: None,
            fragment_shader: None,
            uniforms: HashMap::new(),
        })
    }

    /// Compile `source` as the vertex stage and attach it.
    ///
    /// # Safety
    ///
    /// Requires a current GL context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Compile`] carrying the stage and info log.
    pub unsafe fn compile_vertex(&mut self, source: &str) -> Result<(), Error> {
        let shader = unsafe { self.compile_stage(source, ShaderStage::Vertex) }?;
        self.vertex_shader = Some(shader);
        Ok(())
    }

    /// Compile `source` as the fragment stage and attach it.
    ///
    /// # Safety
    ///
    /// Requires a current GL context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Compile`] carrying the stage and info log.
    pub unsafe fn compile_fragment(&mut self, source: &str) -> Result<(), Error> {
        let shader = unsafe { self.compile_stage(source, ShaderStage::Fragment) }?;
        self.fragment_shader = Some(shader);
        Ok(())
    }

    /// Compile a single stage from source and attach it to the program.
    ///
    /// # Safety
    ///
    /// Requires a current GL context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Gpu`] if the shader object cannot be allocated and
    /// [`Error::Compile`] if compilation fails.
    pub unsafe fn compile_stage(
        &mut self,
        source: &str,
        stage: ShaderStage,
    ) -> Result<glow::Shader, Error> {
        let gl = &self.gl;
        unsafe {
            let shader = gl.create_shader(stage.gl_type()).map_err(Error::Gpu)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(Error::Compile { stage, log });
            }

            gl.attach_shader(self.program, shader);
            log::debug!("compiled {stage} shader");
            Ok(shader)
        }
    }

    /// Link the program, detach the compiled stages, then validate.
    ///
    /// # Safety
    ///
    /// Requires a current GL context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Link`] if linking fails and [`Error::Validate`] if
    /// the linked program fails validation.
    pub unsafe fn link(&mut self) -> Result<(), Error> {
        let gl = &self.gl;
        unsafe {
            gl.link_program(self.program);
            if !gl.get_program_link_status(self.program) {
                return Err(Error::Link(gl.get_program_info_log(self.program)));
            }

            // Stages can be detached and deleted once the program is linked.
            if let Some(shader) = self.vertex_shader.take() {
                gl.detach_shader(self.program, shader);
                gl.delete_shader(shader);
            }
            if let Some(shader) = self.fragment_shader.take() {
                gl.detach_shader(self.program, shader);
                gl.delete_shader(shader);
            }

            gl.validate_program(self.program);
            if !gl.get_program_validate_status(self.program) {
                return Err(Error::Validate(gl.get_program_info_log(self.program)));
            }
        }
        Ok(())
    }

    /// Resolve a uniform's location and cache it under `name`.
    ///
    /// # Safety
    ///
    /// Requires a current GL context; the program must be linked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UniformNotFound`] if the name is absent from the
    /// linked program (misspelled, or optimized out by the compiler).
    pub unsafe fn create_uniform(&mut self, name: &str) -> Result<(), Error> {
        let location = unsafe { self.gl.get_uniform_location(self.program, name) }
            .ok_or_else(|| Error::UniformNotFound(name.to_owned()))?;
        self.uniforms.insert(name.to_owned(), location);
        Ok(())
    }

    /// Write a scalar integer uniform (typically a texture unit index).
    ///
    /// The name must have been registered via
    /// [`create_uniform`](Self::create_uniform) first; unregistered names
    /// are a caller contract violation and are ignored in release builds.
    ///
    /// # Safety
    ///
    /// Requires a current GL context; the program must be bound.
    pub unsafe fn set_uniform_i32(&self, name: &str, value: i32) {
        debug_assert!(self.uniforms.contains_key(name), "uniform {name} not registered");
        if let Some(location) = self.uniforms.get(name) {
            unsafe { self.gl.uniform_1_i32(Some(location), value) };
        }
    }

    /// Write a 4x4 matrix uniform from a column-major array.
    ///
    /// Same registration contract as [`set_uniform_i32`](Self::set_uniform_i32).
    ///
    /// # Safety
    ///
    /// Requires a current GL context; the program must be bound.
    pub unsafe fn set_uniform_mat4(&self, name: &str, value: &[f32; 16]) {
        debug_assert!(self.uniforms.contains_key(name), "uniform {name} not registered");
        if let Some(location) = self.uniforms.get(name) {
            unsafe { self.gl.uniform_matrix_4_f32_slice(Some(location), false, value) };
        }
    }

    /// Make this program current.
    ///
    /// # Safety
    ///
    /// Requires a current GL context.
    pub unsafe fn bind(&self) {
        unsafe { self.gl.use_program(Some(self.program)) };
    }

    /// Clear the current program binding.
    ///
    /// # Safety
    ///
    /// Requires a current GL context.
    pub unsafe fn unbind(&self) {
        unsafe { self.gl.use_program(None) };
    }

    /// Unbind and delete the program.
    ///
    /// Consumes the manager so the handle is released exactly once.
    ///
    /// # Safety
    ///
    /// Requires the same GL context the program was created with; all
    /// rendering through this program must have stopped.
    pub unsafe fn cleanup(self) {
        unsafe {
            self.gl.use_program(None);
            self.gl.delete_program(self.program);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_maps_to_gl_enum() {
        assert_eq!(ShaderStage::Vertex.gl_type(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_type(), glow::FRAGMENT_SHADER);
    }

    #[test]
    fn stage_display_names() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
