//! Uploading vertex, index, and texture data into GPU-resident objects.
//!
//! The [`ObjectLoader`] owns every handle it allocates: vertex arrays,
//! buffers, and textures are appended to typed registries during the load
//! phase and drained exactly once by [`cleanup`](ObjectLoader::cleanup),
//! which consumes the loader. There is no partial-unload path; this is a
//! static-scene loader where everything is created during init and
//! destroyed at shutdown. Handles registered before a failed load are still
//! released on the same teardown path.

use std::path::Path;
use std::sync::Arc;

use glow::{HasContext, PixelUnpackData};

use crate::error::Error;
use crate::types::{Model, Texture};

/// Attribute slot for vertex positions (vec3).
pub const POSITION_SLOT: u32 = 0;
/// Attribute slot for texture coordinates (vec2).
pub const TEX_COORD_SLOT: u32 = 1;

/// Convert a length to the `i32` GL draw calls expect.
///
/// # Panics
///
/// Panics if `value > i32::MAX`, which is unreachable for realistic vertex
/// and index counts.
fn draw_count(value: usize) -> i32 {
    i32::try_from(value).expect("draw count exceeds i32::MAX")
}

/// Convert an image dimension to the `i32` GL texture calls expect.
///
/// # Panics
///
/// Panics if `value > i32::MAX`, unreachable for decodable image sizes.
fn gl_size(value: u32) -> i32 {
    i32::try_from(value).expect("dimension exceeds i32::MAX")
}

/// Loader and registry for GPU vertex arrays, buffers, and textures.
pub struct ObjectLoader {
    gl: Arc<glow::Context>,
    vaos: Vec<glow::VertexArray>,
    vbos: Vec<glow::Buffer>,
    textures: Vec<glow::Texture>,
}

impl ObjectLoader {
    /// Create an empty loader for the given context.
    #[must_use]
    pub fn new(gl: Arc<glow::Context>) -> Self {
        Self {
            gl,
            vaos: Vec::new(),
            vbos: Vec::new(),
            textures: Vec::new(),
        }
    }

    /// Upload an indexed, untextured model.
    ///
    /// `vertices` is a flat `x, y, z` array bound to attribute slot 0;
    /// `indices` sizes the draw call.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Gpu`] if a GL object cannot be allocated.
    pub unsafe fn load_model(&mut self, vertices: &[f32], indices: &[u32]) -> Result<Model, Error> {
        let vao = unsafe { self.create_vao() }?;
        unsafe {
            self.store_indices(indices)?;
            self.store_attribute(POSITION_SLOT, 3, vertices)?;
            self.gl.bind_vertex_array(None);
        }
        Ok(Model {
            vao,
            count: draw_count(indices.len()),
            indexed: true,
            texture: None,
        })
    }

    /// Upload an indexed model with texture coordinates in slot 1.
    ///
    /// The returned model carries no texture yet; associate one with
    /// [`Model::with_texture`].
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Gpu`] if a GL object cannot be allocated.
    pub unsafe fn load_textured_model(
        &mut self,
        vertices: &[f32],
        tex_coords: &[f32],
        indices: &[u32],
    ) -> Result<Model, Error> {
        let vao = unsafe { self.create_vao() }?;
        unsafe {
            self.store_indices(indices)?;
            self.store_attribute(POSITION_SLOT, 3, vertices)?;
            self.store_attribute(TEX_COORD_SLOT, 2, tex_coords)?;
            self.gl.bind_vertex_array(None);
        }
        Ok(Model {
            vao,
            count: draw_count(indices.len()),
            indexed: true,
            texture: None,
        })
    }

    /// Upload a non-indexed model from a flat `x, y, z` vertex array.
    ///
    /// The draw call covers `vertices.len() / 3` vertices as a triangle
    /// list.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Gpu`] if a GL object cannot be allocated.
    pub unsafe fn load_vertices(&mut self, vertices: &[f32]) -> Result<Model, Error> {
        let vao = unsafe { self.create_vao() }?;
        unsafe {
            self.store_attribute(POSITION_SLOT, 3, vertices)?;
            self.gl.bind_vertex_array(None);
        }
        Ok(Model {
            vao,
            count: draw_count(vertices.len() / 3),
            indexed: false,
            texture: None,
        })
    }

    /// Decode an image file into an RGBA8 GPU texture with mipmaps.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] carrying the path if the file cannot be
    /// opened or decoded, and [`Error::Gpu`] if the texture object cannot
    /// be allocated.
    pub unsafe fn load_texture(&mut self, path: impl AsRef<Path>) -> Result<Texture, Error> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| Error::load(path, e))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();

        let gl = &self.gl;
        let handle = unsafe { gl.create_texture() }.map_err(Error::Gpu)?;
        self.textures.push(handle);

        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(handle));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                // GL constant values are small enough that the cast is
                // always safe.
                #[expect(clippy::cast_possible_wrap)]
                {
                    glow::RGBA as i32
                },
                gl_size(width),
                gl_size(height),
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(&pixels)),
            );
            #[expect(clippy::cast_possible_wrap)]
            {
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_MIN_FILTER,
                    glow::LINEAR_MIPMAP_LINEAR as i32,
                );
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_MAG_FILTER,
                    glow::LINEAR as i32,
                );
            }
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        log::debug!("loaded texture {} ({width}x{height})", path.display());
        Ok(Texture { handle })
    }

    /// Number of vertex arrays allocated so far.
    #[must_use]
    pub fn vao_count(&self) -> usize {
        self.vaos.len()
    }

    /// Number of buffers allocated so far.
    #[must_use]
    pub fn buffer_count(&self) -> usize {
        self.vbos.len()
    }

    /// Number of textures allocated so far.
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Release every registered vertex array, buffer, and texture.
    ///
    /// Consumes the loader, so each handle is deleted exactly once and
    /// nothing can be loaded afterwards.
    ///
    /// # Safety
    ///
    /// Requires the same GL context the objects were created with; all
    /// rendering that references them must have stopped.
    pub unsafe fn cleanup(self) {
        let gl = &self.gl;
        log::debug!(
            "releasing {} vertex arrays, {} buffers, {} textures",
            self.vaos.len(),
            self.vbos.len(),
            self.textures.len()
        );
        unsafe {
            for vao in self.vaos {
                gl.delete_vertex_array(vao);
            }
            for vbo in self.vbos {
                gl.delete_buffer(vbo);
            }
            for texture in self.textures {
                gl.delete_texture(texture);
            }
        }
    }

    /// Allocate, register, and bind a new vertex array.
    unsafe fn create_vao(&mut self) -> Result<glow::VertexArray, Error> {
        let vao = unsafe { self.gl.create_vertex_array() }.map_err(Error::Gpu)?;
        self.vaos.push(vao);
        unsafe { self.gl.bind_vertex_array(Some(vao)) };
        Ok(vao)
    }

    /// Upload `indices` into a registered element buffer bound to the
    /// current vertex array.
    unsafe fn store_indices(&mut self, indices: &[u32]) -> Result<(), Error> {
        let gl = &self.gl;
        let vbo = unsafe { gl.create_buffer() }.map_err(Error::Gpu)?;
        self.vbos.push(vbo);
        unsafe {
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(indices),
                glow::STATIC_DRAW,
            );
        }
        Ok(())
    }

    /// Upload float data into a registered buffer wired to attribute
    /// `slot` with `components` floats per vertex (tightly packed).
    unsafe fn store_attribute(
        &mut self,
        slot: u32,
        components: i32,
        data: &[f32],
    ) -> Result<(), Error> {
        let gl = &self.gl;
        let vbo = unsafe { gl.create_buffer() }.map_err(Error::Gpu)?;
        self.vbos.push(vbo);
        unsafe {
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
            gl.vertex_attrib_pointer_f32(slot, components, glow::FLOAT, false, 0, 0);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::os::raw::c_void;

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
                "glGetString" => stub_get_string as *const c_void,
                "glGetIntegerv" => stub_get_integer_v as *const c_void,
                _ => std::ptr::null(),
            })
        };
        Arc::new(gl)
    }

    #[test]
    fn failed_texture_decode_registers_nothing() {
        // The decode fails before the first GL call, so no handle may be
        // registered.
        let mut loader = ObjectLoader::new(headless_gl());
        let err = unsafe { loader.load_texture("textures/no-such-file.png") }.unwrap_err();
        assert!(err.to_string().contains("no-such-file.png"));
        assert_eq!(loader.texture_count(), 0);
        assert_eq!(loader.vao_count(), 0);
        assert_eq!(loader.buffer_count(), 0);
    }

    #[test]
    fn draw_count_passes_small_lengths_through() {
        assert_eq!(draw_count(6), 6);
        assert_eq!(draw_count(0), 0);
    }

    #[test]
    #[should_panic(expected = "draw count exceeds i32::MAX")]
    fn draw_count_rejects_oversized_lengths() {
        let _ = draw_count(usize::try_from(i32::MAX).unwrap_or(usize::MAX) + 1);
    }

    #[test]
    fn gl_size_covers_texture_dimensions() {
        assert_eq!(gl_size(4096), 4096);
        assert_eq!(gl_size(1), 1);
    }
}
