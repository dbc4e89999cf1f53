//! Screen-space quad geometry for simple UI panels.
//!
//! A [`UiQuad`] describes a rectangle in normalized device coordinates.
//! It only produces vertex data; feeding that data to an
//! [`ObjectLoader`](crate::loader::ObjectLoader) and drawing the result
//! is up to the app.

/// Index list drawing the quad as two triangles.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 0, 2, 3];

/// Texture coordinates per corner, top-left origin, in the same corner
/// order as [`UiQuad::vertices`]: corners on the same row sample the
/// same `v`, corners in the same column the same `u`.
pub const QUAD_TEX_COORDS: [f32; 8] = [
    0.0, 0.0, // top left
    0.0, 1.0, // bottom left
    1.0, 0.0, // top right
    1.0, 1.0, // bottom right
];

/// A rectangle in normalized device coordinates, positioned by its
/// center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiQuad {
    /// Center x in NDC.
    pub x: f32,
    /// Center y in NDC.
    pub y: f32,
    /// Full width in NDC units.
    pub width: f32,
    /// Full height in NDC units.
    pub height: f32,
}

impl UiQuad {
    /// A quad covering the middle of the screen, one NDC unit on a side.
    #[must_use]
    pub fn centered() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }

    /// Corner positions as `x, y, z` triples at `z = 0`, in the corner
    /// order [`QUAD_INDICES`] expects.
    #[must_use]
    pub fn vertices(&self) -> [f32; 12] {
        let half_w = self.width * 0.5;
        let half_h = self.height * 0.5;
        [
            self.x - half_w,
            self.y + half_h,
            0.0, // top left
            self.x - half_w,
            self.y - half_h,
            0.0, // bottom left
            self.x + half_w,
            self.y + half_h,
            0.0, // top right
            self.x + half_w,
            self.y - half_h,
            0.0, // bottom right
        ]
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn centered_quad_spans_half_ndc_each_way() {
        let verts = UiQuad::centered().vertices();
        assert_eq!(verts[0], -0.5);
        assert_eq!(verts[1], 0.5);
        assert_eq!(verts[9], 0.5);
        assert_eq!(verts[10], -0.5);
        // All corners sit on the z = 0 plane.
        for corner in verts.chunks(3) {
            assert_eq!(corner[2], 0.0);
        }
    }

    #[test]
    fn offset_quad_moves_every_corner() {
        let quad = UiQuad {
            x: 0.25,
            y: -0.25,
            width: 0.5,
            height: 1.0,
        };
        let verts = quad.vertices();
        assert_eq!(&verts[0..2], &[0.0, 0.25]);
        assert_eq!(&verts[9..11], &[0.5, -0.75]);
    }

    #[test]
    fn tex_coords_follow_the_corner_grid() {
        let verts = UiQuad::centered().vertices();
        let corners: Vec<(f32, f32)> = verts.chunks(3).map(|c| (c[0], c[1])).collect();
        let uvs: Vec<(f32, f32)> = QUAD_TEX_COORDS.chunks(2).map(|c| (c[0], c[1])).collect();
        // Corners sharing a row sample the same v; corners sharing a
        // column sample the same u. A mismatch twists the image across
        // the quad.
        for i in 0..4 {
            for j in 0..4 {
                if corners[i].1 == corners[j].1 {
                    assert_eq!(uvs[i].1, uvs[j].1, "corners {i} and {j} share y");
                }
                if corners[i].0 == corners[j].0 {
                    assert_eq!(uvs[i].0, uvs[j].0, "corners {i} and {j} share x");
                }
            }
        }
        // Top-left origin: v grows downward, u grows rightward.
        assert_eq!(uvs[0], (0.0, 0.0));
        assert_eq!(uvs[3], (1.0, 1.0));
    }

    #[test]
    fn indices_reference_all_four_corners() {
        let mut used: Vec<u32> = QUAD_INDICES.to_vec();
        used.sort_unstable();
        used.dedup();
        assert_eq!(used, [0, 1, 2, 3]);
    }
}
