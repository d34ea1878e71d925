use glam::Vec3;

use crate::error::{ClothError, ClothResult};
use crate::grid::ClothGrid;

/// Renderable cloth vertex: 32 bytes, tightly packed.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ClothVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub u: f32,
    pub v: f32,
}

/// Unit normal of triangle `(v1, v2, v3)`: `(v2 - v1) x (v3 - v2)`.
///
/// Degenerate triangles give `Vec3::ZERO`.
#[inline]
pub fn face_normal(v1: Vec3, v2: Vec3, v3: Vec3) -> Vec3 {
    (v2 - v1).cross(v3 - v2).normalize_or_zero()
}

/// Smoothed normal at `(row, column)` from up to four adjacent faces.
///
/// Faces that would fall outside the grid are skipped.
pub fn vertex_normal(grid: &ClothGrid, positions: &[Vec3], row: usize, column: usize) -> Vec3 {
    let n = grid.size();
    let last = n - 1;
    let p = grid.index(row, column);
    let pos = positions[p];
    let mut normal = Vec3::ZERO;

    // upper left
    if column != 0 && row != 0 {
        normal += face_normal(pos, positions[p - n], positions[p - 1]);
    }
    // upper right
    if column != last && row != 0 {
        normal += face_normal(pos, positions[p + 1], positions[p - n]);
    }
    // lower left
    if column != 0 && row != last {
        normal += face_normal(pos, positions[p - 1], positions[p + n]);
    }
    // lower right
    if column != last && row != last {
        normal += face_normal(pos, positions[p + n], positions[p + 1]);
    }

    normal.normalize_or_zero()
}

/// Vertex for the particle at `(row, column)`.
///
/// Texture coordinates come from the lattice position alone, so the texture
/// follows the cloth as it deforms.
pub fn vertex(grid: &ClothGrid, positions: &[Vec3], row: usize, column: usize) -> ClothVertex {
    let texture_space = 1.0 / (grid.size() - 1) as f32;
    ClothVertex {
        position: positions[grid.index(row, column)].to_array(),
        normal: vertex_normal(grid, positions, row, column).to_array(),
        u: texture_space * column as f32,
        v: texture_space * row as f32,
    }
}

/// Write one vertex per particle, row-major, into `out`.
pub fn fill_vertex_buffer(
    grid: &ClothGrid,
    positions: &[Vec3],
    out: &mut [ClothVertex],
) -> ClothResult<()> {
    check_len(grid.particle_count(), out.len())?;

    let n = grid.size();
    for row in 0..n {
        for column in 0..n {
            out[grid.index(row, column)] = vertex(grid, positions, row, column);
        }
    }

    Ok(())
}

/// The six indices of the cell whose top-left particle is `(row, column)`.
///
/// Triangle 1 is (top-left, top-right, bottom-left), triangle 2 is
/// (bottom-left, top-right, bottom-right). Seen from the side the vertex
/// normals point to, both wind clockwise.
pub fn cell_indices(grid: &ClothGrid, row: usize, column: usize) -> [u32; 6] {
    let top_left = grid.index(row, column) as u32;
    let top_right = top_left + 1;
    let bottom_left = top_left + grid.size() as u32;
    let bottom_right = bottom_left + 1;

    [top_left, top_right, bottom_left, bottom_left, top_right, bottom_right]
}

/// Write the static triangle list, cells in row-major order.
pub fn fill_index_buffer(grid: &ClothGrid, out: &mut [u32]) -> ClothResult<()> {
    check_len(grid.index_count(), out.len())?;

    let cells = grid.size() - 1;
    for (cell, chunk) in out.chunks_exact_mut(6).enumerate() {
        chunk.copy_from_slice(&cell_indices(grid, cell / cells, cell % cells));
    }

    Ok(())
}

fn check_len(expected: usize, actual: usize) -> ClothResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ClothError::BufferSize { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_32_bytes() {
        assert_eq!(std::mem::size_of::<ClothVertex>(), 32);
    }

    #[test]
    fn face_normal_of_degenerate_triangle_is_zero() {
        let p = Vec3::new(0.3, 0.1, -0.2);
        assert_eq!(face_normal(p, p, p), Vec3::ZERO);
    }

    #[test]
    fn corner_vertex_uses_single_face() {
        let grid = ClothGrid::new(2).unwrap();
        // Tilt the bottom-right corner so the two cell triangles disagree.
        let mut positions: Vec<Vec3> = (0..4).map(|i| grid.rest_position(i / 2, i % 2)).collect();
        positions[3].y = 0.5;

        // Top-left corner only has its lower-right face, which excludes particle 3.
        let n = vertex_normal(&grid, &positions, 0, 0);
        assert!((n - Vec3::Y).length() < 1e-6, "got {n}");
    }
}
