/// Scene builders for the tutorial demos
use nalgebra::{Point3, Vector3};

use crate::config::{DemoConfig, DemoKind};
use crate::geometry::Mesh;
use crate::scene::{Renderable, Scene};

/// Scale applied to every pyramid in the grid demo
pub const PYRAMID_SCALE: f32 = 0.5;

/// Y rotation added per grid slot so neighbouring pyramids are out of phase
pub const PYRAMID_STAGGER_DEGREES: f32 = 15.0;

/// The built-in meshes a demo can ask a frontend to prepare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Triangle,
    Cube,
    Pyramid,
}

impl Shape {
    pub fn mesh(self) -> Mesh {
        match self {
            Shape::Triangle => Mesh::triangle(),
            Shape::Cube => Mesh::cube(1.0),
            Shape::Pyramid => Mesh::pyramid(1.0),
        }
    }
}

/// Build the scene for `config.demo`.
///
/// `make_geometry` turns a mesh into the frontend's geometry handle. It is
/// called once per distinct shape; the handle is cloned into every
/// renderable that uses it.
pub fn build_scene<G, E, F>(config: &DemoConfig, mut make_geometry: F) -> Result<Scene<G>, E>
where
    G: Clone,
    F: FnMut(Shape, Mesh) -> Result<G, E>,
{
    let mut prepare = |shape: Shape| make_geometry(shape, shape.mesh());

    let scene = match config.demo {
        DemoKind::Triangle => {
            let mut scene = Scene::with_capacity(1);
            scene.push(Renderable::new(prepare(Shape::Triangle)?));
            scene
        }
        DemoKind::Cube => {
            let mut scene = Scene::with_capacity(1);
            scene.push(Renderable::new(prepare(Shape::Cube)?));
            scene
        }
        DemoKind::Pyramids => {
            let pyramid = prepare(Shape::Pyramid)?;
            let mut scene = Scene::with_capacity(config.grid.count());
            for (index, offset) in config.grid.positions().enumerate() {
                let mut renderable = Renderable::new(pyramid.clone());
                renderable.transform.set_translation_vector(offset);
                renderable
                    .transform
                    .set_scale_vector(Vector3::repeat(PYRAMID_SCALE));
                renderable
                    .transform
                    .rotate_y(index as f32 * PYRAMID_STAGGER_DEGREES);
                scene.push(renderable);
            }
            scene
        }
    };

    log::info!("built {} demo with {} renderables", config.demo, scene.len());
    Ok(scene)
}

/// Center and radius a camera should frame to see the whole demo
pub fn framing(config: &DemoConfig) -> (Point3<f32>, f32) {
    match config.demo {
        DemoKind::Triangle | DemoKind::Cube => (Point3::origin(), 1.0),
        DemoKind::Pyramids => {
            let grid = config.grid;
            let extent = grid.spacing * grid.size.saturating_sub(1) as f32;
            let center = Point3::new(0.0, extent / 2.0, grid.depth);
            (center, extent / 2.0 + PYRAMID_SCALE)
        }
    }
}
