/// Terminal frontend: runs the spinning demos as colored ASCII art
use anyhow::Context;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use nalgebra::Matrix4;
use spinlab_core::{
    build_scene, demo, Camera, DemoConfig, FrameTimer, Frontend, Mesh, MonotonicClock, SceneLoop,
    SetupError,
};
use std::io::{self, stdout, Stdout, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

pub mod cli;
pub mod logging;
pub mod renderer;

pub use renderer::{AsciiRenderer, RasterState};

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: u32 = 2;

/// What a terminal event asks the frontend to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Close,
    Resize(u16, u16),
}

/// Only key presses count, so terminals that also report releases don't
/// act twice.
pub fn action_for(event: &Event) -> Option<Action> {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Close),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Close),
            _ => None,
        },
        Event::Resize(width, height) => Some(Action::Resize(*width, *height)),
        _ => None,
    }
}

/// The cell buffers and the camera looking into them, sized to the terminal
pub struct Viewport {
    renderer: AsciiRenderer,
    camera: Camera,
    view_projection: Matrix4<f32>,
}

impl Viewport {
    pub fn new(width: u16, height: u16, config: &DemoConfig) -> Self {
        let (center, radius) = demo::framing(config);
        let camera = Camera::new(width as u32, height as u32 * CELL_ASPECT).framing(center, radius);
        let state = RasterState {
            depth_test: config.depth_test,
            blend: config.blend,
        };
        Self {
            renderer: AsciiRenderer::new(width as usize, height as usize, state),
            view_projection: camera.view_projection(),
            camera,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        log::debug!("terminal resized to {}x{}", width, height);
        self.renderer.resize(width as usize, height as usize);
        self.camera.set_viewport(width as u32, height as u32 * CELL_ASPECT);
        self.view_projection = self.camera.view_projection();
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}

/// Switch to raw mode and the alternate screen. If the screen can't be
/// entered, raw mode is switched back off before the error is returned.
fn enter_screen<W: Write>(
    out: &mut W,
    enable_raw_mode: impl FnOnce() -> io::Result<()>,
    disable_raw_mode: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    enable_raw_mode()?;
    if let Err(err) = execute!(out, terminal::EnterAlternateScreen, cursor::Hide) {
        if let Err(restore) = disable_raw_mode() {
            log::warn!("failed to leave raw mode: {}", restore);
        }
        return Err(err);
    }
    Ok(())
}

/// Owns the terminal for as long as it lives: raw mode, alternate screen,
/// hidden cursor. Everything is restored on drop.
pub struct TerminalFrontend {
    stdout: Stdout,
    viewport: Viewport,
    title: String,
    target_frame_time: Duration,
    frame_start: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
    close: bool,
}

impl TerminalFrontend {
    pub fn new(config: &DemoConfig) -> Result<Self, SetupError> {
        let (width, height) = terminal::size()?;
        if width == 0 || height == 0 {
            let reported = format!("terminal reports {}x{} cells", width, height);
            return Err(SetupError::Surface(reported));
        }

        let viewport = Viewport::new(width, height, config);

        log::info!("taking over {}x{} terminal", width, height);
        let mut stdout = stdout();
        enter_screen(&mut stdout, terminal::enable_raw_mode, terminal::disable_raw_mode)?;

        let now = Instant::now();
        Ok(Self {
            stdout,
            viewport,
            title: format!("spinlab | {} demo", config.demo),
            target_frame_time: Duration::from_secs(1) / config.target_fps.max(1),
            frame_start: now,
            last_fps_sample: now,
            frame_count: 0,
            fps: 0.0,
            close: false,
        })
    }

    fn update_fps(&mut self) {
        self.frame_count += 1;
        let now = Instant::now();
        let elapsed = now - self.last_fps_sample;
        if elapsed.as_secs() >= 1 {
            self.fps = self.frame_count as f32 / elapsed.as_secs_f32();
            self.frame_count = 0;
            self.last_fps_sample = now;
        }
    }
}

impl Frontend for TerminalFrontend {
    type Geometry = Rc<Mesh>;
    type Error = io::Error;

    fn close_requested(&mut self) -> io::Result<bool> {
        while !self.close && event::poll(Duration::from_millis(0))? {
            match action_for(&event::read()?) {
                Some(Action::Close) => self.close = true,
                Some(Action::Resize(width, height)) => self.viewport.resize(width, height),
                None => {}
            }
        }
        Ok(self.close)
    }

    fn draw(&mut self, geometry: &Rc<Mesh>, model: &Matrix4<f32>) {
        self.viewport
            .renderer
            .render_mesh(geometry, model, &self.viewport.view_projection);
    }

    fn present(&mut self) -> io::Result<()> {
        self.viewport.renderer.draw(&mut self.stdout)?;

        // Draw UI overlay
        queue!(
            self.stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!("{} | FPS: {:.1} | Q=Quit", self.title, self.fps)),
            ResetColor
        )?;
        self.stdout.flush()?;
        self.viewport.renderer.clear();

        // Frame timing
        let elapsed = self.frame_start.elapsed();
        if elapsed < self.target_frame_time {
            std::thread::sleep(self.target_frame_time - elapsed);
        }
        self.update_fps();
        self.frame_start = Instant::now();
        Ok(())
    }
}

impl Drop for TerminalFrontend {
    fn drop(&mut self) {
        let restored = terminal::disable_raw_mode()
            .and_then(|_| execute!(self.stdout, terminal::LeaveAlternateScreen, cursor::Show));
        if let Err(err) = restored {
            log::warn!("failed to restore terminal: {}", err);
        }
    }
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    config: DemoConfig,
}

impl TerminalApp {
    pub fn new(config: DemoConfig) -> Self {
        Self { config }
    }

    /// Build the scene, take over the terminal and render until closed.
    /// Returns the number of frames presented.
    ///
    /// The frame timer starts before any setup, so the first frame's delta
    /// covers scene building and terminal takeover unless the config asks
    /// for a clock reset.
    pub fn run(&self) -> anyhow::Result<u64> {
        let clock = MonotonicClock::new();
        let timer = FrameTimer::start(&clock);

        let scene = build_scene(&self.config, |shape, mesh| {
            log::debug!("prepared {:?} mesh with {} triangles", shape, mesh.triangle_count());
            Ok::<_, SetupError>(Rc::new(mesh))
        })?;

        let mut frontend =
            TerminalFrontend::new(&self.config).context("failed to set up terminal")?;
        let mut scene_loop = SceneLoop::with_timer(scene, self.config.spin, clock, timer);
        if self.config.reset_clock_on_start {
            scene_loop.restart_clock();
        }

        let frames = scene_loop.run(&mut frontend).context("terminal I/O failed")?;
        drop(frontend);

        log::info!("rendered {} frames", frames);
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    /// A terminal whose output has gone away
    struct ClosedOutput;

    impl Write for ClosedOutput {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "output closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_quit_keys_close() {
        let close = Some(Action::Close);
        assert_eq!(action_for(&key(KeyCode::Char('q'), KeyModifiers::NONE)), close);
        assert_eq!(action_for(&key(KeyCode::Esc, KeyModifiers::NONE)), close);
        assert_eq!(action_for(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)), close);
    }

    #[test]
    fn test_other_keys_are_ignored() {
        assert_eq!(action_for(&key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
        assert_eq!(action_for(&key(KeyCode::Char('w'), KeyModifiers::NONE)), None);
        assert_eq!(action_for(&Event::FocusLost), None);
    }

    #[test]
    fn test_key_release_does_not_close() {
        let release = KeyEvent::new_with_kind(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert_eq!(action_for(&Event::Key(release)), None);
    }

    #[test]
    fn test_resize_event() {
        assert_eq!(action_for(&Event::Resize(120, 40)), Some(Action::Resize(120, 40)));
    }

    #[test]
    fn test_viewport_resize_rebuilds_buffers_and_aspect() {
        let mut viewport = Viewport::new(80, 24, &DemoConfig::default());
        assert_relative_eq!(viewport.camera().aspect, 80.0 / 48.0);

        viewport.resize(120, 40);
        assert_relative_eq!(viewport.camera().aspect, 1.5);
        assert!(viewport.renderer().cell(119, 39).is_some());
        assert!(viewport.renderer().cell(120, 0).is_none());
        assert_eq!(viewport.view_projection, viewport.camera().view_projection());
    }

    #[test]
    fn test_enter_screen_failure_leaves_raw_mode() {
        let raw = Cell::new(false);
        let result = enter_screen(
            &mut ClosedOutput,
            || {
                raw.set(true);
                Ok(())
            },
            || {
                raw.set(false);
                Ok(())
            },
        );
        assert!(result.is_err());
        assert!(!raw.get());
    }

    #[test]
    fn test_enter_screen_keeps_raw_mode_on_success() {
        let raw = Cell::new(false);
        let mut out = Vec::new();
        enter_screen(
            &mut out,
            || {
                raw.set(true);
                Ok(())
            },
            || {
                raw.set(false);
                Ok(())
            },
        )
        .unwrap();
        assert!(raw.get());
        assert!(!out.is_empty());
    }
}
