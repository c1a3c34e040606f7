/// Renderables, the scene that owns them, and the pyramid grid layout
use nalgebra::Vector3;

use crate::transform::Transform;

/// A drawable object: a geometry handle plus its own model transform.
///
/// `G` is whatever the frontend uses to refer to uploaded geometry. It is
/// handed back to the frontend untouched on every draw.
#[derive(Debug, Clone)]
pub struct Renderable<G> {
    geometry: G,
    pub transform: Transform,
}

impl<G> Renderable<G> {
    pub fn new(geometry: G) -> Self {
        Self {
            geometry,
            transform: Transform::new(),
        }
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }
}

/// Ordered collection of renderables; insertion order is draw order
#[derive(Debug, Clone)]
pub struct Scene<G> {
    renderables: Vec<Renderable<G>>,
}

impl<G> Scene<G> {
    pub fn new() -> Self {
        Self {
            renderables: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            renderables: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, renderable: Renderable<G>) {
        self.renderables.push(renderable);
    }

    pub fn len(&self) -> usize {
        self.renderables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderables.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Renderable<G>> {
        self.renderables.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Renderable<G>> {
        self.renderables.iter_mut()
    }
}

impl<G> Default for Scene<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, G> IntoIterator for &'a Scene<G> {
    type Item = &'a Renderable<G>;
    type IntoIter = std::slice::Iter<'a, Renderable<G>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Triangular stack of objects: row `i` holds `size - i` slots, centered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub size: usize,
    pub spacing: f32,
    pub depth: f32,
}

impl GridLayout {
    pub fn new(size: usize, spacing: f32) -> Self {
        Self {
            size,
            spacing,
            depth: 0.0,
        }
    }

    /// Number of slots in row `row` (zero past the top)
    pub fn row_width(&self, row: usize) -> usize {
        self.size.saturating_sub(row)
    }

    /// `size + (size - 1) + ... + 1`
    pub fn count(&self) -> usize {
        self.size * (self.size + 1) / 2
    }

    /// World offset of slot `(row, column)`, or `None` outside the layout
    pub fn position(&self, row: usize, column: usize) -> Option<Vector3<f32>> {
        if column >= self.row_width(row) {
            return None;
        }
        let half_width = (self.size - 1 - row) as f32 / 2.0;
        Some(Vector3::new(
            self.spacing * (column as f32 - half_width),
            self.spacing * row as f32,
            self.depth,
        ))
    }

    /// All slots, bottom row first, left to right
    pub fn positions(&self) -> impl Iterator<Item = Vector3<f32>> + '_ {
        (0..self.size).flat_map(move |row| {
            (0..self.row_width(row)).filter_map(move |column| self.position(row, column))
        })
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(4, 1.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_count_is_triangular() {
        for size in 0..8 {
            let layout = GridLayout::new(size, 1.0);
            assert_eq!(layout.positions().count(), layout.count());
            assert_eq!(layout.count(), (1..=size).sum::<usize>());
        }
    }

    #[test]
    fn test_grid_positions_literal() {
        let layout = GridLayout::new(3, 1.0);
        assert_relative_eq!(layout.position(0, 0).unwrap(), Vector3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(layout.position(0, 2).unwrap(), Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(layout.position(1, 0).unwrap(), Vector3::new(-0.5, 1.0, 0.0));
        assert_relative_eq!(layout.position(2, 0).unwrap(), Vector3::new(0.0, 2.0, 0.0));

        let wide = GridLayout {
            size: 4,
            spacing: 2.0,
            depth: -3.0,
        };
        assert_relative_eq!(wide.position(1, 2).unwrap(), Vector3::new(2.0, 2.0, -3.0));
        assert_relative_eq!(wide.position(3, 0).unwrap(), Vector3::new(0.0, 6.0, -3.0));
    }

    #[test]
    fn test_grid_rejects_out_of_range() {
        let layout = GridLayout::new(3, 1.0);
        assert!(layout.position(0, 3).is_none());
        assert!(layout.position(2, 1).is_none());
        assert!(layout.position(5, 0).is_none());
    }

    #[test]
    fn test_grid_positions_unique() {
        let layout = GridLayout::new(6, 0.75);
        let positions: Vec<_> = layout.positions().collect();
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert!((a - b).norm() > 1e-3);
            }
        }
    }

    #[test]
    fn test_scene_keeps_insertion_order() {
        let mut scene = Scene::new();
        for id in 0..5u32 {
            scene.push(Renderable::new(id));
        }
        let order: Vec<u32> = scene.iter().map(|r| *r.geometry()).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        assert_eq!(scene.len(), 5);
    }
}
