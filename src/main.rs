use anyhow::Context;
use winit::event_loop::{ControlFlow, EventLoop};

mod app;
mod cli;
mod error;
mod globe;
mod picture;
mod renderer;
mod settings;
mod tools;
mod ui;

use crate::app::AppHandler;
use crate::cli::Command;
use crate::picture::{DatasetSource, load_color_field};
use crate::settings::Settings;

pub const CONFY_APP_NAME: &str = "earthpic-rs";

fn run_viewer(source: Option<String>) -> anyhow::Result<()> {
    let settings = Settings::load();
    let source = DatasetSource::parse(source.as_deref().unwrap_or(&settings.globe.dataset));

    let runtime = tokio::runtime::Runtime::new()?;
    let field = runtime
        .block_on(load_color_field(&source))
        .inspect_err(|err| log::error!("Failed to load dataset {source}: {err}"))
        .with_context(|| format!("failed to load dataset {source}"))?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut handler = AppHandler::new(field, source.to_string(), settings, runtime);
    event_loop.run_app(&mut handler)?;

    if let Some(err) = handler.startup_error.take() {
        return Err(err).context("failed to start viewer");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match Command::parse(std::env::args().skip(1))? {
        Command::Viewer { source } => run_viewer(source),
        Command::Compress { input, output } => Ok(tools::compress_file(&input, &output)?),
        Command::Render { input, output } => Ok(tools::render_file(&input, &output)?),
        Command::Fetch {
            output,
            lat_step,
            lon_step,
            url,
        } => {
            let url = url.as_deref().unwrap_or(picture::fetch::DEFAULT_PIXEL_URL);
            let runtime = tokio::runtime::Runtime::new()?;
            Ok(runtime.block_on(tools::fetch_file(&output, lat_step, lon_step, url))?)
        }
    }
}
