//! Read-only render view over the live particles.
//!
//! A renderer reads the view strictly between steps. Only positions,
//! colors and the live count are exposed.
//!
//! ```ignore
//! system.update(dt);
//! let view = system.render_view();
//! queue.write_buffer(&positions, 0, view.position_bytes());
//! queue.write_buffer(&colors, 0, view.color_bytes());
//! ```

use crate::data::ParticleData;
use bytemuck::{Pod, Zeroable};
use glam::Vec4;

/// Interleaved vertex for renderers that want one buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    /// World-space position, `w = 1`.
    pub position: [f32; 4],
    /// RGBA color.
    pub color: [f32; 4],
}

/// Borrowed view of the live prefix of a [`ParticleData`].
#[derive(Clone, Copy, Debug)]
pub struct RenderView<'a> {
    positions: &'a [Vec4],
    colors: &'a [Vec4],
}

impl<'a> RenderView<'a> {
    pub(crate) fn new(data: &'a ParticleData) -> Self {
        let n = data.alive_count();
        Self {
            positions: &data.positions()[..n],
            colors: &data.colors()[..n],
        }
    }

    /// Number of live particles.
    pub fn alive_count(&self) -> usize {
        self.positions.len()
    }

    /// Positions of the live particles.
    pub fn positions(&self) -> &'a [Vec4] {
        self.positions
    }

    /// Colors of the live particles.
    pub fn colors(&self) -> &'a [Vec4] {
        self.colors
    }

    /// Positions as raw bytes, ready for a vertex buffer upload.
    pub fn position_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.positions)
    }

    /// Colors as raw bytes.
    pub fn color_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.colors)
    }

    /// Interleave positions and colors into `out`.
    ///
    /// Writes `min(out.len(), alive_count)` vertices and returns that count.
    pub fn write_vertices(&self, out: &mut [ParticleVertex]) -> usize {
        let n = out.len().min(self.alive_count());
        for ((v, p), c) in out[..n].iter_mut().zip(self.positions).zip(self.colors) {
            *v = ParticleVertex {
                position: p.to_array(),
                color: c.to_array(),
            };
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_covers_alive_prefix() {
        let mut data = ParticleData::new(8).unwrap();
        for i in 0..3 {
            data.positions_mut()[i] = Vec4::new(i as f32, 0.0, 0.0, 1.0);
            data.colors_mut()[i] = Vec4::splat(0.5);
            data.wake(i);
        }
        let view = RenderView::new(&data);
        assert_eq!(view.alive_count(), 3);
        assert_eq!(view.positions().len(), 3);
        assert_eq!(view.position_bytes().len(), 3 * 16);
        assert_eq!(view.color_bytes().len(), 3 * 16);
    }

    #[test]
    fn test_write_vertices_truncates() {
        let mut data = ParticleData::new(4).unwrap();
        for i in 0..4 {
            data.positions_mut()[i] = Vec4::new(i as f32, 1.0, 2.0, 1.0);
            data.wake(i);
        }
        let view = RenderView::new(&data);
        let mut out = [ParticleVertex::default(); 2];
        assert_eq!(view.write_vertices(&mut out), 2);
        assert_eq!(out[1].position, [1.0, 1.0, 2.0, 1.0]);
    }
}
