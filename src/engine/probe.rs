// Input probing using ffprobe

use serde::Deserialize;
use std::path::Path;
use std::process::Command;

use crate::error::ShrinkError;

/// Source metadata needed to plan a compression run.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub duration_s: f64,
    pub bitrate_bps: u64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Probe an input file with ffprobe and extract duration, overall bitrate
/// and the dimensions of the first video stream.
pub fn probe_media(ffprobe_path: &str, input_path: &Path) -> Result<MediaInfo, ShrinkError> {
    let output = Command::new(ffprobe_path)
        .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
        .arg(input_path)
        .output()
        .map_err(|e| ShrinkError::ProbeFailed {
            path: input_path.to_path_buf(),
            reason: format!("failed to run ffprobe: {}", e),
        })?;

    if !output.status.success() {
        return Err(ShrinkError::ProbeFailed {
            path: input_path.to_path_buf(),
            reason: format!(
                "ffprobe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout), input_path)
}

/// Parse ffprobe's JSON payload into a [`MediaInfo`].
///
/// Split out of [`probe_media`] so parsing is testable without an ffprobe
/// binary on the machine.
pub fn parse_probe_output(json: &str, input_path: &Path) -> Result<MediaInfo, ShrinkError> {
    let fail = |reason: String| ShrinkError::ProbeFailed {
        path: input_path.to_path_buf(),
        reason,
    };

    let probe: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| fail(format!("invalid ffprobe JSON: {}", e)))?;

    let duration_s = probe
        .format
        .duration
        .as_deref()
        .ok_or_else(|| fail("no duration in format section".to_string()))?
        .parse::<f64>()
        .map_err(|e| fail(format!("bad duration: {}", e)))?;

    let bitrate_bps = probe
        .format
        .bit_rate
        .as_deref()
        .ok_or_else(|| fail("no bit_rate in format section".to_string()))?
        .parse::<u64>()
        .map_err(|e| fail(format!("bad bit_rate: {}", e)))?;

    let video = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| fail("no video stream".to_string()))?;

    let (width, height) = match (video.width, video.height) {
        (Some(w), Some(h)) => (w, h),
        _ => return Err(fail("video stream has no dimensions".to_string())),
    };

    Ok(MediaInfo {
        duration_s,
        bitrate_bps,
        width,
        height,
    })
}
