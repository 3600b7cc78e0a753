use super::{GeometryError, Spans};

#[derive(Clone, Debug, PartialEq)]
/// Boundary rectangles and grid lines of the three back faces of the plot box.
///
/// Faces are laid out on the planes `y = 0` (XZ), `z = 0` (XY) and `x = 0` (YZ),
/// always in that order.
pub struct PlotGrid {
    spans: Spans,
    tiles: u32,
    boundaries: Vec<[f32; 3]>,
    grid_lines: Vec<[f32; 3]>,
}

impl PlotGrid {
    pub fn new(spans: Spans, tile_count: u32) -> Result<Self, GeometryError> {
        spans.validate()?;
        if tile_count == 0 {
            return Err(GeometryError::NoTiles);
        }

        let mut grid = Self {
            spans,
            tiles: tile_count,
            boundaries: Vec::with_capacity(12),
            grid_lines: Vec::with_capacity(Self::grid_line_vertex_count(tile_count)),
        };

        grid.push_xz_face();
        grid.push_xy_face();
        grid.push_yz_face();

        tracing::trace!(
            "Grid generated: {} boundary vertices, {} grid line vertices",
            grid.boundaries.len(),
            grid.grid_lines.len()
        );

        Ok(grid)
    }

    /// Number of grid line vertices for a tile count: two axes per face,
    /// `tiles - 1` lines per axis, two vertices per line.
    #[must_use]
    pub const fn grid_line_vertex_count(tile_count: u32) -> usize {
        3 * 2 * 2 * tile_count.saturating_sub(1) as usize
    }

    #[must_use]
    pub const fn spans(&self) -> Spans {
        self.spans
    }

    /// The corners of the three boundary rectangles, four per face.
    #[must_use]
    pub fn boundaries(&self) -> &[[f32; 3]] {
        &self.boundaries
    }

    /// Interior grid lines as line-list vertex pairs.
    #[must_use]
    pub fn grid_lines(&self) -> &[[f32; 3]] {
        &self.grid_lines
    }

    /// The boundary rectangles as line-list vertex pairs, each rectangle closed.
    #[must_use]
    pub fn boundary_segments(&self) -> Vec<[f32; 3]> {
        self.boundaries
            .chunks_exact(4)
            .flat_map(|corners| {
                (0..4).flat_map(move |i| [corners[i], corners[(i + 1) % 4]])
            })
            .collect()
    }

    fn push_xz_face(&mut self) {
        let Spans { x, z, .. } = self.spans;

        self.boundaries.extend([[0.0, 0.0, 0.0], [x, 0.0, 0.0], [x, 0.0, z], [0.0, 0.0, z]]);

        // Parallel to Z, then parallel to X.
        for offset in Self::interior_offsets(x, self.tiles) {
            self.grid_lines.extend([[offset, 0.0, 0.0], [offset, 0.0, z]]);
        }
        for offset in Self::interior_offsets(z, self.tiles) {
            self.grid_lines.extend([[0.0, 0.0, offset], [x, 0.0, offset]]);
        }
    }

    fn push_xy_face(&mut self) {
        let Spans { x, y, .. } = self.spans;

        self.boundaries.extend([[0.0, 0.0, 0.0], [0.0, y, 0.0], [x, y, 0.0], [x, 0.0, 0.0]]);

        // Parallel to Y, then parallel to X.
        for offset in Self::interior_offsets(x, self.tiles) {
            self.grid_lines.extend([[offset, 0.0, 0.0], [offset, y, 0.0]]);
        }
        for offset in Self::interior_offsets(y, self.tiles) {
            self.grid_lines.extend([[0.0, offset, 0.0], [x, offset, 0.0]]);
        }
    }

    fn push_yz_face(&mut self) {
        let Spans { y, z, .. } = self.spans;

        self.boundaries.extend([[0.0, 0.0, 0.0], [0.0, 0.0, z], [0.0, y, z], [0.0, y, 0.0]]);

        // Parallel to Y, then parallel to Z.
        for offset in Self::interior_offsets(z, self.tiles) {
            self.grid_lines.extend([[0.0, 0.0, offset], [0.0, y, offset]]);
        }
        for offset in Self::interior_offsets(y, self.tiles) {
            self.grid_lines.extend([[0.0, offset, 0.0], [0.0, offset, z]]);
        }
    }

    /// Positions of the interior lines along an axis of the given span.
    #[allow(clippy::cast_precision_loss)]
    fn interior_offsets(span: f32, tiles: u32) -> impl Iterator<Item = f32> {
        let step = span / tiles as f32;
        (1..tiles).map(move |i| i as f32 * step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans() -> Spans {
        Spans::new(9.0, 9.0, 16.0)
    }

    #[test]
    fn boundaries_are_twelve_corners() {
        let grid = PlotGrid::new(spans(), 4).unwrap();
        assert_eq!(grid.boundaries().len(), 12);
        assert_eq!(
            &grid.boundaries()[..4],
            &[
                [0.0, 0.0, 0.0],
                [9.0, 0.0, 0.0],
                [9.0, 0.0, 16.0],
                [0.0, 0.0, 16.0]
            ]
        );
    }

    #[test]
    fn each_face_lies_on_its_plane() {
        let grid = PlotGrid::new(spans(), 3).unwrap();
        let faces: Vec<_> = grid.boundaries().chunks_exact(4).collect();

        assert!(faces[0].iter().all(|v| v[1] == 0.0));
        assert!(faces[1].iter().all(|v| v[2] == 0.0));
        assert!(faces[2].iter().all(|v| v[0] == 0.0));
    }

    #[test]
    fn grid_line_count_and_spacing() {
        let grid = PlotGrid::new(spans(), 4).unwrap();
        assert_eq!(grid.grid_lines().len(), 36);
        assert_eq!(grid.grid_lines().len(), PlotGrid::grid_line_vertex_count(4));

        // First lines of the XZ face: x = 2.25, 4.5, 6.75 running along Z.
        let xs: Vec<f32> = grid.grid_lines()[..6].iter().step_by(2).map(|v| v[0]).collect();
        assert_eq!(xs, vec![2.25, 4.5, 6.75]);
        assert_eq!(grid.grid_lines()[1], [2.25, 0.0, 16.0]);
    }

    #[test]
    fn single_tile_has_no_interior_lines() {
        let grid = PlotGrid::new(spans(), 1).unwrap();
        assert!(grid.grid_lines().is_empty());
        assert_eq!(grid.boundaries().len(), 12);
    }

    #[test]
    fn boundary_segments_close_each_rectangle() {
        let grid = PlotGrid::new(spans(), 2).unwrap();
        let segments = grid.boundary_segments();
        assert_eq!(segments.len(), 24);
        assert_eq!(segments[6], grid.boundaries()[3]);
        assert_eq!(segments[7], grid.boundaries()[0]);
    }

    #[test]
    fn rejects_zero_tiles() {
        assert_eq!(PlotGrid::new(spans(), 0), Err(GeometryError::NoTiles));
    }
}
