/// Demo configuration shared by every frontend
use std::fmt;
use std::str::FromStr;

use crate::scene::GridLayout;

/// Which of the tutorial demos to run, in the order they build on each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemoKind {
    Triangle,
    #[default]
    Cube,
    Pyramids,
}

impl DemoKind {
    pub const ALL: [DemoKind; 3] = [DemoKind::Triangle, DemoKind::Cube, DemoKind::Pyramids];

    pub fn name(self) -> &'static str {
        match self {
            DemoKind::Triangle => "triangle",
            DemoKind::Cube => "cube",
            DemoKind::Pyramids => "pyramids",
        }
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DemoKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DemoKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown demo '{}' (expected triangle, cube or pyramids)", s))
    }
}

/// Angular velocity applied to every renderable, in degrees per second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinRate {
    pub yaw_deg_per_sec: f32,
    pub pitch_deg_per_sec: f32,
}

impl SpinRate {
    pub fn new(yaw_deg_per_sec: f32, pitch_deg_per_sec: f32) -> Self {
        Self {
            yaw_deg_per_sec,
            pitch_deg_per_sec,
        }
    }
}

impl Default for SpinRate {
    fn default() -> Self {
        Self::new(360.0, 30.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub demo: DemoKind,
    pub spin: SpinRate,
    pub grid: GridLayout,
    pub depth_test: bool,
    pub blend: bool,
    /// Restart the frame timer right before the first frame instead of
    /// counting scene setup into the first delta
    pub reset_clock_on_start: bool,
    pub target_fps: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            demo: DemoKind::default(),
            spin: SpinRate::default(),
            grid: GridLayout::default(),
            depth_test: true,
            blend: false,
            reset_clock_on_start: false,
            target_fps: 30,
        }
    }
}
