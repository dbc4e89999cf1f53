//! GPU resource handle types produced by the [`ObjectLoader`].
//!
//! [`ObjectLoader`]: crate::loader::ObjectLoader

/// An uploaded GPU texture.
///
/// The handle is owned by the [`ObjectLoader`] that allocated it and is
/// released during the loader's cleanup; a [`Model`] may reference a texture
/// without owning it, which is why this type is `Copy`.
///
/// [`ObjectLoader`]: crate::loader::ObjectLoader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    pub(crate) handle: glow::Texture,
}

impl Texture {
    /// The raw GL texture handle.
    #[must_use]
    pub fn handle(&self) -> glow::Texture {
        self.handle
    }
}

/// A drawable set of vertex buffers grouped under one vertex array handle.
///
/// The draw count must match the buffers uploaded under the handle at
/// creation time; the loader guarantees this for models it produces.
#[derive(Debug, Clone, Copy)]
pub struct Model {
    pub(crate) vao: glow::VertexArray,
    pub(crate) count: i32,
    pub(crate) indexed: bool,
    pub(crate) texture: Option<Texture>,
}

impl Model {
    /// The vertex array handle grouping this model's attribute buffers.
    #[must_use]
    pub fn vao(&self) -> glow::VertexArray {
        self.vao
    }

    /// Number of elements the draw call covers: the index count for indexed
    /// models, the vertex count otherwise.
    #[must_use]
    pub fn count(&self) -> i32 {
        self.count
    }

    /// Whether the model draws through an index buffer.
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// The texture associated with this model, if any.
    #[must_use]
    pub fn texture(&self) -> Option<Texture> {
        self.texture
    }

    /// Associate a texture with this model. The model does not take
    /// ownership; the loader that allocated the texture releases it.
    #[must_use]
    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }
}
