/// spinlab web - WebGL2 renderer for the spinning demos
///
/// JavaScript owns the animation loop: construct a `WebRenderer` once, then
/// call `frame()` from every `requestAnimationFrame` callback until it
/// returns `false`.
use std::rc::Rc;

use spinlab_core::{
    build_scene, demo, Camera, Clock, DemoConfig, DemoKind, FrameTimer, LoopState, SceneLoop,
    SetupError, SpinRate,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Performance, WebGl2RenderingContext};

pub mod gl;

use gl::{GpuMesh, ShaderProgram, WebGlFrontend};

/// Browser high-resolution timer
pub struct PerformanceClock {
    performance: Performance,
}

impl PerformanceClock {
    pub fn new() -> Result<Self, SetupError> {
        let performance = web_sys::window()
            .and_then(|window| window.performance())
            .ok_or_else(|| SetupError::Surface("window.performance is unavailable".to_string()))?;
        Ok(Self { performance })
    }
}

impl Clock for PerformanceClock {
    fn now(&self) -> f64 {
        self.performance.now() / 1000.0
    }
}

fn to_js(err: SetupError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Whether a frame should clear the canvas before stepping the loop. A frame
/// that will only observe a stop request keeps the last picture.
fn frame_clears(state: LoopState, close_pending: bool) -> bool {
    state == LoopState::Running && !close_pending
}

fn webgl2_context(
    canvas_id: &str,
) -> Result<(HtmlCanvasElement, WebGl2RenderingContext), SetupError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| SetupError::Surface("no document".to_string()))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| SetupError::Surface(format!("no element with id '{}'", canvas_id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| SetupError::Surface(format!("'{}' is not a canvas", canvas_id)))?;
    let gl = canvas
        .get_context("webgl2")
        .ok()
        .flatten()
        .ok_or_else(|| SetupError::Surface("WebGL2 is not supported".to_string()))?
        .dyn_into::<WebGl2RenderingContext>()
        .map_err(|_| SetupError::Surface("unexpected context type".to_string()))?;
    Ok((canvas, gl))
}

#[wasm_bindgen]
pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    camera: Camera,
    frontend: WebGlFrontend,
    scene_loop: SceneLoop<GpuMesh, PerformanceClock>,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Set up WebGL2 on the canvas and build the named demo
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, demo: &str, yaw: f32, pitch: f32) -> Result<WebRenderer, JsValue> {
        let demo: DemoKind = demo.parse().map_err(|err: String| JsValue::from_str(&err))?;
        let config = DemoConfig {
            demo,
            spin: SpinRate::new(yaw, pitch),
            ..DemoConfig::default()
        };
        Self::with_config(canvas_id, &config).map_err(to_js)
    }

    /// Render one frame. Returns `false` once the renderer has stopped.
    pub fn frame(&mut self) -> bool {
        if frame_clears(self.scene_loop.state(), self.frontend.close_pending()) {
            let (width, height) = (self.canvas.width(), self.canvas.height());
            self.camera.set_viewport(width, height);
            self.frontend.set_view_projection(self.camera.view_projection());
            self.frontend.begin_frame(width as i32, height as i32);
        }

        match self.scene_loop.step(&mut self.frontend) {
            Ok(state) => state == LoopState::Running,
            Err(never) => match never {},
        }
    }

    /// Stop at the next frame
    pub fn stop(&mut self) {
        self.frontend.request_close();
    }

    /// Change the angular velocity (degrees per second)
    pub fn set_spin(&mut self, yaw: f32, pitch: f32) {
        self.scene_loop.set_spin(SpinRate::new(yaw, pitch));
    }

    #[wasm_bindgen(getter)]
    pub fn frames(&self) -> f64 {
        self.scene_loop.frames() as f64
    }
}

impl WebRenderer {
    /// Context, shader and scene setup all count towards the first frame's
    /// delta unless `reset_clock_on_start` is set.
    pub fn with_config(canvas_id: &str, config: &DemoConfig) -> Result<WebRenderer, SetupError> {
        let clock = PerformanceClock::new()?;
        let timer = FrameTimer::start(&clock);

        let (canvas, gl) = webgl2_context(canvas_id)?;
        let program = Rc::new(ShaderProgram::standard(&gl)?);

        let scene = build_scene(config, |_, mesh| {
            GpuMesh::upload(&gl, &mesh, Rc::clone(&program))
        })?;

        let (center, radius) = demo::framing(config);
        let camera = Camera::new(canvas.width(), canvas.height()).framing(center, radius);
        let view_projection = camera.view_projection();
        let frontend = WebGlFrontend::new(gl, view_projection, config.depth_test, config.blend);

        let mut scene_loop = SceneLoop::with_timer(scene, config.spin, clock, timer);
        if config.reset_clock_on_start {
            scene_loop.restart_clock();
        }
        log::info!("web renderer ready on '{}'", canvas_id);

        Ok(WebRenderer {
            canvas,
            camera,
            frontend,
            scene_loop,
        })
    }
}
