/// WF3D Terminal Viewer - Wireframe fly-through of `.geo` meshes
///
/// Controls:
///   - Arrow Keys: Move the camera
///   - W/S, A/D, Q/E: Turn around the X, Y and Z axes
///   - Z/X: Zoom
///   - Space: Reset the camera
///   - ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use std::fs::{self, File};
use std::path::PathBuf;
use wf3d_core::{load_geo, Object3D, Placement, ViewerConfig};
use wf3d_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(name = "wf3d-terminal", version, about = "Wireframe 3D viewer for the terminal")]
struct Args {
    /// Mesh files in `.geo` format; a cube is shown when none are given
    files: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the log (the terminal itself is busy rendering)
    #[arg(long, default_value = "wf3d.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Target frames per second, overriding the configuration
    #[arg(long)]
    fps: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            ViewerConfig::from_toml_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ViewerConfig::default(),
    };
    if let Some(fps) = args.fps {
        config.frame_rate = fps;
    }

    let objects = load_objects(&args.files, &config)?;

    let mut app = TerminalApp::new(objects, &config).context("failed to set up the terminal")?;
    app.run().context("terminal viewer failed")?;
    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let file = File::create(&args.log_file)
        .with_context(|| format!("failed to create log file {}", args.log_file.display()))?;
    simplelog::WriteLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_target_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Off)
            .build(),
        file,
    )?;
    Ok(())
}

fn load_objects(files: &[PathBuf], config: &ViewerConfig) -> Result<Vec<Object3D>> {
    if files.is_empty() {
        info!("no mesh files given, showing a cube");
        return Ok(vec![Object3D::cube(1.0)]);
    }

    let mut placement = Placement::new();
    let mut objects = Vec::new();
    for path in files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let source = path.display().to_string();
        objects.extend(
            load_geo(&source, &text, &mut placement, config.object_spacing)
                .with_context(|| format!("failed to load {source}"))?,
        );
    }
    Ok(objects)
}
