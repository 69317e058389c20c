use anyhow::{Context, Result};
use clap::Parser;

use beam_profiler_rs::cli::{Args, CameraBackend};
use beam_profiler_rs::config::FileConfig;
use beam_profiler_rs::console;
use beam_profiler_rs::logger;
use beam_profiler_rs::profiler::{
    Camera, ControlHandle, ExportNames, ProfilerConfig, ProfilerController, RunSummary,
    SimulatedCamera, StatsDisplay, TracingStatus,
};

use tracing::{error, info};

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(&args.log_level);

    info!("Starting beam profiler...");

    let mut builder = ProfilerConfig::builder();
    let mut names = ExportNames::default();
    if let Some(path) = &args.config {
        let file = FileConfig::load(path)?;
        builder = file.apply(builder)?;
        file.apply_names(&mut names);
        info!(config = %path.display(), "Loaded config file");
    }
    let config = args.apply(builder).build();
    args.apply_names(&mut names);

    info!("Preview: {} @ {} Hz", config.preview.resolution, config.preview.frame_rate);
    info!("Capture: {}, crop {}", config.capture_resolution, config.crop);
    info!("Quantization: {}", config.quantization.name());

    let control = ControlHandle::with_names(names);

    let on_interrupt = control.clone();
    ctrlc::set_handler(move || on_interrupt.request_shutdown())
        .context("Failed to install Ctrl-C handler")?;

    if !args.no_console {
        console::spawn_console(control.clone()).context("Failed to start console")?;
        info!("Press Enter to take a snapshot, 'pic <name>' / 'matrix <name>' to rename, 'quit' to exit");
    }

    let result = match args.camera {
        CameraBackend::Simulated => run(SimulatedCamera::new(), config, control),
        CameraBackend::V4l => run_v4l(&args, config, control),
    };

    match result {
        Ok(summary) => {
            info!(
                "Profiler finished: {} preview frames, {} snapshots, {} files written",
                summary.preview_frames, summary.snapshots, summary.files_written
            );
            Ok(())
        }
        Err(e) => {
            error!("Profiler failed: {:#}", e);
            Err(e)
        }
    }
}

fn run<C: Camera>(camera: C, config: ProfilerConfig, control: ControlHandle) -> Result<RunSummary> {
    let display = StatsDisplay::new(config.display_every);
    let mut controller =
        ProfilerController::new(camera, display, TracingStatus::new(), config).with_control(control);
    Ok(controller.run()?)
}

#[cfg(feature = "v4l")]
fn run_v4l(args: &Args, config: ProfilerConfig, control: ControlHandle) -> Result<RunSummary> {
    let camera = beam_profiler_rs::profiler::camera::V4lCamera::open(&args.device)
        .with_context(|| format!("Failed to open {}", args.device.display()))?;
    run(camera, config, control)
}

#[cfg(not(feature = "v4l"))]
fn run_v4l(_args: &Args, _config: ProfilerConfig, _control: ControlHandle) -> Result<RunSummary> {
    anyhow::bail!("V4L2 support is not compiled in; rebuild with `--features v4l`")
}
