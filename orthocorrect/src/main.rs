mod stdio;

use log::*;
use ortho_core::AttitudeState;
use ortho_protocol::{Client, Corrector, HandlerRegistry};
use ortho_warp::{
    CorrectorSettings, DirectoryStore, ImageStore, LogNotifier, MemoryStore, WarpOutcome,
    WarpPlanner,
};
use std::error::Error;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use stdio::StdioClient;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "orthocorrect",
    about = "A tool to orthocorrect aerial photographs from attitude telemetry"
)]
struct Opt {
    /// The file where settings are specified.
    ///
    /// This is in the format of `ortho_warp::CorrectorSettings`.
    #[structopt(short, long, global = true, default_value = "orthocorrect-settings.json")]
    settings: PathBuf,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Orthocorrect a single photograph.
    Warp {
        /// The altitude above ground in meters
        #[structopt(long)]
        altitude: f64,
        /// The aircraft yaw in radians (0 is north)
        #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
        yaw: f64,
        /// The aircraft pitch in radians (positive is nose up)
        #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
        pitch: f64,
        /// The aircraft roll in radians (positive is right wing down)
        #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
        roll: f64,
        /// The camera pitch in radians (0 is straight down, positive is forwards)
        #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
        cam_pitch: f64,
        /// The camera roll in radians (positive is to the right)
        #[structopt(long, default_value = "0.0", allow_hyphen_values = true)]
        cam_roll: f64,
        /// The output path to write to (autodetects image type from extension).
        ///
        /// Use a format with an alpha channel such as PNG to keep the uncovered canvas transparent.
        #[structopt(short, long, parse(from_os_str))]
        output: PathBuf,
        /// The photograph to orthocorrect.
        #[structopt(parse(from_os_str))]
        input: PathBuf,
    },
    /// Run a protocol session over stdin and stdout.
    ///
    /// Each line on stdin is one message and each message sent is one line on stdout.
    Serve {
        /// The image folder holding the `current` and `archive` folders.
        #[structopt(short, long, parse(from_os_str))]
        folder: PathBuf,
        /// The name of the archive folder of this session, overriding the settings.
        #[structopt(short, long)]
        archive: Option<String>,
        /// Photographs to ingest before reading messages.
        #[structopt(parse(from_os_str))]
        images: Vec<PathBuf>,
    },
}

fn main() {
    pretty_env_logger::init_timed();
    let opt = Opt::from_args();
    let settings = load_settings(&opt.settings);

    let result = match opt.command {
        Command::Warp {
            altitude,
            yaw,
            pitch,
            roll,
            cam_pitch,
            cam_roll,
            output,
            input,
        } => {
            let state = AttitudeState::level(altitude)
                .aircraft(yaw, pitch, roll)
                .camera(cam_pitch, cam_roll);
            warp(&settings, &state, &input, &output)
        }
        Command::Serve {
            folder,
            archive,
            images,
        } => serve(&settings, &folder, archive, &images),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn load_settings(path: &Path) -> CorrectorSettings {
    let settings: Option<CorrectorSettings> = std::fs::File::open(path)
        .ok()
        .and_then(|file| serde_json::from_reader(file).ok());
    if settings.is_some() {
        info!("loaded existing settings");
    } else {
        info!("used default settings");
    }
    settings.unwrap_or_default()
}

fn warp(
    settings: &CorrectorSettings,
    state: &AttitudeState,
    input: &Path,
    output: &Path,
) -> Result<(), Box<dyn Error>> {
    let planner = WarpPlanner::new(
        settings.rasterizer(),
        MemoryStore::new(),
        LogNotifier,
        settings.camera_fov()?,
    );
    let id = planner.store().store_original(&image::open(input)?)?;
    match planner.correct_stored(id, state)? {
        WarpOutcome::Warped(plan) => {
            info!(
                "writing {}x{} warp to {}",
                plan.destination.size.width,
                plan.destination.size.height,
                output.display()
            );
            planner.store().current(id)?.save(output)?;
        }
        outcome => warn!("nothing written: {:?}", outcome),
    }
    Ok(())
}

fn serve(
    settings: &CorrectorSettings,
    folder: &Path,
    archive: Option<String>,
    images: &[PathBuf],
) -> Result<(), Box<dyn Error>> {
    let archive = archive.unwrap_or_else(|| settings.archive_name.clone());
    let client = Arc::new(StdioClient::new());
    let corrector = Corrector::new(
        settings.rasterizer(),
        DirectoryStore::open(folder, &archive)?,
        client.clone(),
        settings.camera_fov()?,
    );
    let registry = HandlerRegistry::standard();

    for path in images {
        let captured_at = std::fs::metadata(path)?
            .modified()?
            .duration_since(UNIX_EPOCH)?
            .as_secs_f64();
        let id = corrector.ingest(&image::open(path)?, captured_at)?;
        info!("ingested {} as image {}", path.display(), id);
    }

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = registry.dispatch(&corrector, &line) {
            warn!("{}", e);
        }
        if client.is_closed() {
            break;
        }
    }
    Ok(())
}
