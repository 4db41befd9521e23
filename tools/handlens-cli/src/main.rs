//! handlens CLI: drive the landmark stabilizer from recordings or a
//! synthetic hand.
//!
//! Usage:
//!   handlens replay <PATH>     Stabilize a JSONL detection recording
//!   handlens simulate          Run a synthetic jittery hand through a session
//!   handlens transform         Map one normalized point to display pixels
//!   handlens geometry          Compute mirroring and aspect for a camera source
//!   handlens config            Show or write the configuration file

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use handlens_common::config::AppConfig;
use handlens_landmark_model::detection::DetectionMode;

mod commands;

#[derive(Parser)]
#[command(
    name = "handlens",
    about = "Hand landmark stabilization for camera overlays",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Detection mode as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Landmarks,
    Gesture,
}

impl From<ModeArg> for DetectionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Landmarks => DetectionMode::Landmarks,
            ModeArg::Gesture => DetectionMode::Gesture,
        }
    }
}

/// Mirroring switches; without either the configured default applies.
#[derive(Debug, Clone, Copy, Args)]
struct MirrorArgs {
    /// Mirror x (front camera preview)
    #[arg(long, conflicts_with = "no_mirror")]
    mirror: bool,

    /// Do not mirror x
    #[arg(long)]
    no_mirror: bool,
}

impl MirrorArgs {
    fn choice(self) -> Option<bool> {
        if self.mirror {
            Some(true)
        } else if self.no_mirror {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Stabilize a JSONL detection recording and print one point set per frame
    Replay {
        /// Path to the recording
        path: PathBuf,

        /// Display width in pixels
        #[arg(long)]
        width: Option<f64>,

        /// Display height per unit of width
        #[arg(long, default_value = "0.75")]
        aspect: f64,

        #[command(flatten)]
        mirror: MirrorArgs,

        /// Detection mode
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Frames per second the recording was captured at
        #[arg(long, default_value = "30")]
        source_fps: u32,
    },

    /// Run a synthetic jittery hand and compare raw and stabilized motion
    Simulate {
        /// Number of frames
        #[arg(long, default_value = "120")]
        frames: u64,

        /// Source frame rate
        #[arg(long, default_value = "30")]
        fps: u32,

        /// Display width in pixels
        #[arg(long)]
        width: Option<f64>,

        /// Display height per unit of width
        #[arg(long, default_value = "0.75")]
        aspect: f64,

        #[command(flatten)]
        mirror: MirrorArgs,

        /// Report no hand on every N-th frame (0 = never)
        #[arg(long, default_value = "0")]
        dropout: u64,

        /// Jitter amplitude in normalized units
        #[arg(long, default_value = "0.01")]
        jitter: f64,

        /// Detection mode
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Map one normalized landmark to display pixels
    Transform {
        #[arg(long)]
        x: f64,

        #[arg(long)]
        y: f64,

        /// Display width in pixels
        #[arg(long)]
        width: Option<f64>,

        /// Display height per unit of width
        #[arg(long, default_value = "1.0")]
        aspect: f64,

        #[command(flatten)]
        mirror: MirrorArgs,
    },

    /// Compute mirroring and aspect for a camera source
    Geometry {
        /// Source platform (android, ios, web, desktop)
        #[arg(long)]
        platform: Option<String>,

        #[arg(long)]
        frame_width: u32,

        #[arg(long)]
        frame_height: u32,

        /// Clockwise rotation in degrees (multiple of 90)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        rotation: i32,

        /// Frames come from the back camera
        #[arg(long)]
        back: bool,

        // Explicit mirror preference, overriding the camera facing.
        #[command(flatten)]
        mirror: MirrorArgs,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    handlens_common::logging::init_logging(&logging)?;

    match cli.command {
        Commands::Replay {
            path,
            width,
            aspect,
            mirror,
            mode,
            source_fps,
        } => {
            commands::replay::run(commands::replay::ReplayArgs {
                path,
                width: width.unwrap_or(config.display.width),
                aspect,
                mirror: mirror.choice().unwrap_or(config.display.mirror),
                mode: mode.map(Into::into).unwrap_or(config.detection.mode),
                source_fps,
                target_fps: config.detection.target_fps,
            })
            .await
        }
        Commands::Simulate {
            frames,
            fps,
            width,
            aspect,
            mirror,
            dropout,
            jitter,
            mode,
            json,
        } => {
            commands::simulate::run(commands::simulate::SimulateArgs {
                frames,
                fps,
                width: width.unwrap_or(config.display.width),
                aspect,
                mirror: mirror.choice().unwrap_or(config.display.mirror),
                dropout,
                jitter,
                mode: mode.map(Into::into).unwrap_or(config.detection.mode),
                json,
            })
            .await
        }
        Commands::Transform {
            x,
            y,
            width,
            aspect,
            mirror,
        } => commands::transform::run(
            x,
            y,
            width.unwrap_or(config.display.width),
            aspect,
            mirror.choice().unwrap_or(config.display.mirror),
        ),
        Commands::Geometry {
            platform,
            frame_width,
            frame_height,
            rotation,
            back,
            mirror,
        } => commands::geometry::run(
            platform.unwrap_or_else(|| config.detection.platform.clone()),
            frame_width,
            frame_height,
            rotation,
            back,
            mirror.choice(),
        ),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(std::iter::once("handlens").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_mirror_is_a_switch() {
        let Commands::Transform { mirror, .. } =
            parse(&["transform", "--x", "0.3", "--y", "0.4", "--mirror"])
        else {
            panic!("expected transform");
        };
        assert_eq!(mirror.choice(), Some(true));

        let Commands::Replay { mirror, .. } = parse(&["replay", "rec.jsonl", "--no-mirror"]) else {
            panic!("expected replay");
        };
        assert_eq!(mirror.choice(), Some(false));

        let Commands::Geometry { mirror, .. } =
            parse(&["geometry", "--frame-width", "640", "--frame-height", "480"])
        else {
            panic!("expected geometry");
        };
        assert_eq!(mirror.choice(), None);
    }

    #[test]
    fn test_mirror_switches_conflict() {
        let result = Cli::try_parse_from([
            "handlens", "transform", "--x", "0.1", "--y", "0.1", "--mirror", "--no-mirror",
        ]);
        assert!(result.is_err());
    }
}
