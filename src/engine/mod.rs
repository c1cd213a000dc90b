// Core compression engine - independent of the CLI front end

pub mod ffmpeg_cmd;
pub mod ffmpeg_info;
pub mod log;
pub mod plan;
pub mod probe;
pub mod progress;

pub use ffmpeg_cmd::{
    CompressJob, EncodeOptions, build_ffmpeg_cmd, derive_output_path, format_ffmpeg_cmd,
    run_encode,
};
pub use ffmpeg_info::{ffmpeg_version, ffprobe_version};
pub use log::write_debug_log;
pub use plan::{DEFAULT_MAX_HEIGHT, EncodePlan, scale_height, target_bitrate};
pub use probe::{MediaInfo, parse_probe_output, probe_media};
pub use progress::ProgressParser;
