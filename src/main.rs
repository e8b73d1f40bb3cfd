//! Cellchain - an infinite canvas of spreadsheet panels

mod runtime;
mod view;

use anyhow::Result;
use clap::Parser;
use winit::event_loop::EventLoop;

use cellchain::cli::CliArgs;
use cellchain::config::AppConfig;

use runtime::App;

fn main() -> Result<()> {
    cellchain::tracing::init();

    let startup = CliArgs::parse().into_config();
    let config = AppConfig::load();
    tracing::info!(
        files = startup.files.len(),
        restore = startup.restore,
        "starting"
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(1024, 720, config, startup);

    event_loop.run_app(&mut app)?;

    Ok(())
}
