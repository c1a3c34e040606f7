/// spinlab terminal demo
///
/// Renders one of the tutorial demos (triangle, cube, pyramid grid) as
/// spinning ASCII art until Q or Esc is pressed.

use anyhow::Result;
use clap::Parser;
use spinlab_terminal::cli::Args;
use spinlab_terminal::logging::init_logging;
use spinlab_terminal::TerminalApp;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_deref());

    let config = args.to_config();
    log::info!("starting {} demo: {:?}", config.demo, config);

    TerminalApp::new(config).run()?;
    Ok(())
}
