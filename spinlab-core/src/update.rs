/// The per-frame update loop and the seam to whatever draws the frames.
///
/// Each iteration polls for termination, measures the frame delta, spins every
/// renderable by the configured angular velocity and submits its composed
/// model matrix. Presentation marks the frame boundary.

use nalgebra::Matrix4;

use crate::clock::{Clock, FrameTimer};
use crate::config::SpinRate;
use crate::scene::Scene;

/// What the update loop needs from a window, terminal or canvas
pub trait Frontend {
    /// Handle to geometry the frontend uploaded at scene-build time
    type Geometry;
    type Error: std::error::Error;

    /// Polled once per iteration before any work is done
    fn close_requested(&mut self) -> Result<bool, Self::Error>;

    fn draw(&mut self, geometry: &Self::Geometry, model: &Matrix4<f32>);

    /// End the frame. May block for frame pacing.
    fn present(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Drives a scene frame by frame until the frontend asks to close
pub struct SceneLoop<G, C> {
    scene: Scene<G>,
    spin: SpinRate,
    clock: C,
    timer: FrameTimer,
    state: LoopState,
    frames: u64,
}

impl<G, C: Clock> SceneLoop<G, C> {
    /// Starts the frame timer: the first delta is measured from here
    pub fn new(scene: Scene<G>, spin: SpinRate, clock: C) -> Self {
        let timer = FrameTimer::start(&clock);
        Self::with_timer(scene, spin, clock, timer)
    }

    /// Use a timer started earlier, typically before the frontend and the
    /// scene were set up, so that setup time lands in the first delta
    pub fn with_timer(scene: Scene<G>, spin: SpinRate, clock: C, timer: FrameTimer) -> Self {
        Self {
            scene,
            spin,
            clock,
            timer,
            state: LoopState::Running,
            frames: 0,
        }
    }

    /// Discard the time elapsed since the timer started so the first frame starts at zero
    pub fn restart_clock(&mut self) {
        self.timer.restart(&self.clock);
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn set_spin(&mut self, spin: SpinRate) {
        self.spin = spin;
    }

    /// Run one iteration. Does nothing once stopped.
    pub fn step<F>(&mut self, frontend: &mut F) -> Result<LoopState, F::Error>
    where
        F: Frontend<Geometry = G>,
    {
        if self.state == LoopState::Stopped {
            return Ok(LoopState::Stopped);
        }

        if frontend.close_requested()? {
            log::info!("close requested after {} frames", self.frames);
            self.state = LoopState::Stopped;
            return Ok(LoopState::Stopped);
        }

        let delta_time = self.timer.tick(&self.clock);
        log::trace!("frame {} dt={:.4}s", self.frames, delta_time);

        let yaw = self.spin.yaw_deg_per_sec * delta_time;
        let pitch = self.spin.pitch_deg_per_sec * delta_time;
        for renderable in self.scene.iter_mut() {
            renderable.transform.rotate_y(yaw);
            renderable.transform.rotate_x(pitch);
            let model = renderable.transform.compose();
            frontend.draw(renderable.geometry(), &model);
        }

        frontend.present()?;
        self.frames += 1;
        Ok(LoopState::Running)
    }

    /// Step until stopped; returns the number of frames presented
    pub fn run<F>(&mut self, frontend: &mut F) -> Result<u64, F::Error>
    where
        F: Frontend<Geometry = G>,
    {
        while self.step(frontend)? == LoopState::Running {}
        Ok(self.frames)
    }
}
