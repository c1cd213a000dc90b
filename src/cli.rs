use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ffshrink")]
#[command(about = "Shrink a video to a target file size with ffmpeg", long_about = None)]
pub struct Cli {
    /// Input video file
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output file (defaults to <input stem>.shrunk.mp4 next to the input)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Target output size in megabytes (overrides config)
    #[arg(long, value_name = "MB")]
    pub size: Option<f64>,

    /// Overwrite the output file if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check if ffmpeg and ffprobe are installed
    CheckTools,

    /// Probe a video file and print its metadata
    Probe {
        /// Path to the video file
        file: PathBuf,
    },

    /// Show the ffmpeg command without executing (dry run)
    DryRun {
        /// Input video file
        input: PathBuf,

        /// Output file (defaults to <input stem>.shrunk.mp4 next to the input)
        output: Option<PathBuf>,

        /// Target output size in megabytes (overrides config)
        #[arg(long, value_name = "MB")]
        size: Option<f64>,
    },

    /// Show config status and location, or create default config if missing
    InitConfig,
}

pub fn parse() -> Cli {
    Cli::parse()
}
