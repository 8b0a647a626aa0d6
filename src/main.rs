use std::io::{self, BufReader};

use log::info;
use progressive_fractal::{
    PpmFilePresenter, RendererConfig, StillRenderController, run_stdio_worker,
};

const DEFAULT_OUTPUT: &str = "output/fractal.ppm";
const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.first().map(String::as_str) == Some("worker") {
        run_stdio_worker(BufReader::new(io::stdin()), io::stdout().lock())?;
        return Ok(());
    }

    let output = args.first().map_or(DEFAULT_OUTPUT, String::as_str);
    let config = match args.get(1) {
        Some(path) => RendererConfig::from_file(path)?,
        None => RendererConfig::default(),
    };

    let mut controller = StillRenderController::new(PpmFilePresenter::new(), config, WIDTH, HEIGHT);
    controller.generate()?;
    controller.write(output)?;
    info!("Wrote {output}");

    Ok(())
}
