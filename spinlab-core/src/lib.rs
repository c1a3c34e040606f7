/// spinlab core library - transforms, scene state and the frame loop
///
/// Everything here is independent of how frames reach the screen. Frontends
/// implement `Frontend` and hand the loop geometry handles of their own.

pub mod clock;
pub mod config;
pub mod demo;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod scene;
pub mod transform;
pub mod update;

// Re-export commonly used types
pub use clock::{Clock, FrameTimer, ManualClock, MonotonicClock};
pub use config::{DemoConfig, DemoKind, SpinRate};
pub use demo::{build_scene, Shape};
pub use error::{SetupError, ShaderStage};
pub use geometry::{Color, Mesh, Triangle, Vertex};
pub use projection::Camera;
pub use scene::{GridLayout, Renderable, Scene};
pub use transform::Transform;
pub use update::{Frontend, LoopState, SceneLoop};
