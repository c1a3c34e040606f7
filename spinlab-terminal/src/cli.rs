/// Command line surface of the terminal demo.
use clap::Parser;
use spinlab_core::{DemoConfig, DemoKind, GridLayout, SpinRate};

/// Spinning geometry demos rendered as ASCII art
#[derive(Debug, Parser)]
#[command(name = "spinlab-terminal", version, about)]
pub struct Args {
    /// Demo to run: triangle, cube or pyramids
    #[arg(long, default_value_t = DemoKind::Cube)]
    pub demo: DemoKind,

    /// Spin about Y in degrees per second
    #[arg(long, default_value_t = 360.0, allow_negative_numbers = true)]
    pub yaw: f32,

    /// Spin about X in degrees per second
    #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
    pub pitch: f32,

    /// Rows in the pyramid grid (bottom row width)
    #[arg(long, default_value_t = 4)]
    pub grid_size: usize,

    /// Distance between neighbouring pyramids
    #[arg(long, default_value_t = 1.2)]
    pub spacing: f32,

    /// Draw in submission order without depth testing
    #[arg(long)]
    pub no_depth_test: bool,

    /// Alpha-blend overlapping faces
    #[arg(long)]
    pub blend: bool,

    /// Start the frame timer right before the first frame
    #[arg(long)]
    pub reset_clock: bool,

    /// Frame rate the renderer paces itself to
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: u32,

    /// Log filter, e.g. "info" or "spinlab_core=trace" (defaults to RUST_LOG)
    #[arg(long)]
    pub log: Option<String>,
}

impl Args {
    pub fn to_config(&self) -> DemoConfig {
        DemoConfig {
            demo: self.demo,
            spin: SpinRate::new(self.yaw, self.pitch),
            grid: GridLayout::new(self.grid_size, self.spacing),
            depth_test: !self.no_depth_test,
            blend: self.blend,
            reset_clock_on_start: self.reset_clock,
            target_fps: self.fps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_defaults() {
        let args = Args::try_parse_from(["spinlab-terminal"]).unwrap();
        assert_eq!(args.to_config(), DemoConfig::default());
    }

    #[test]
    fn test_flags_map_onto_config() {
        let args = Args::try_parse_from([
            "spinlab-terminal",
            "--demo",
            "pyramids",
            "--yaw",
            "-90",
            "--grid-size",
            "6",
            "--no-depth-test",
            "--blend",
            "--reset-clock",
        ])
        .unwrap();
        let config = args.to_config();

        assert_eq!(config.demo, DemoKind::Pyramids);
        assert_eq!(config.spin, SpinRate::new(-90.0, 30.0));
        assert_eq!(config.grid.count(), 21);
        assert!(!config.depth_test);
        assert!(config.blend);
        assert!(config.reset_clock_on_start);
    }

    #[test]
    fn test_rejects_unknown_demo() {
        assert!(Args::try_parse_from(["spinlab-terminal", "--demo", "teapot"]).is_err());
        assert!(Args::try_parse_from(["spinlab-terminal", "--fps", "0"]).is_err());
    }

    #[test]
    fn test_command_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
