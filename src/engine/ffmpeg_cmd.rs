use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::plan::EncodePlan;
use super::progress::ProgressParser;
use crate::config::Config;
use crate::error::ShrinkError;

/// One compression run: where the input is, where the output goes, and
/// runtime progress updated by the read loop.
#[derive(Debug, Clone)]
pub struct CompressJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub target_size_mb: f64,

    // Derived / runtime
    pub duration_s: Option<f64>,
    pub progress_pct: u8,
    pub out_time_s: f64,
    pub fps: Option<f64>,
    pub speed: Option<f64>,
}

impl CompressJob {
    pub fn new(input_path: PathBuf, output_path: PathBuf, target_size_mb: f64) -> Self {
        Self {
            input_path,
            output_path,
            target_size_mb,
            duration_s: None,
            progress_pct: 0,
            out_time_s: 0.0,
            fps: None,
            speed: None,
        }
    }
}

/// Encoder settings resolved from config plus CLI flags.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub ffmpeg: String,
    pub video_codec: String,
    pub preset: String,
    pub crf: u32,
    pub audio_codec: String,
    /// Audio bitrate in kbps.
    pub audio_bitrate: u32,
    pub audio_channels: u32,
    pub overwrite: bool,
    /// Free-form ffmpeg arguments appended before the output path.
    pub extra_args: String,
}

impl EncodeOptions {
    pub fn from_config(config: &Config, overwrite: bool) -> Self {
        Self {
            ffmpeg: config.tools.ffmpeg.clone(),
            video_codec: config.defaults.video_codec.clone(),
            preset: config.defaults.preset.clone(),
            crf: config.defaults.crf,
            audio_codec: config.defaults.audio_codec.clone(),
            audio_bitrate: config.defaults.audio_bitrate,
            audio_channels: config.defaults.audio_channels,
            overwrite,
            extra_args: config.defaults.extra_args.clone(),
        }
    }
}

/// Default output path when none is given: `<stem>.shrunk.mp4` beside the input
pub fn derive_output_path(input_path: &Path) -> PathBuf {
    let output_dir = input_path.parent().unwrap_or_else(|| Path::new("."));
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    output_dir.join(format!("{}.shrunk.mp4", stem))
}

/// Build the ffmpeg invocation for a job: fixed codec/quality choices, the
/// planned bitrate as a cap with double that as buffer, and the height cap
/// via a scale filter. Progress goes to stdout in machine-readable form.
pub fn build_ffmpeg_cmd(job: &CompressJob, plan: &EncodePlan, opts: &EncodeOptions) -> Command {
    let mut cmd = Command::new(&opts.ffmpeg);

    if opts.overwrite {
        cmd.arg("-y");
    }

    cmd.arg("-i").arg(&job.input_path);

    cmd.arg("-c:v").arg(&opts.video_codec);
    cmd.arg("-preset").arg(&opts.preset);
    cmd.arg("-crf").arg(opts.crf.to_string());
    cmd.arg("-maxrate").arg(plan.target_bitrate.to_string());
    cmd.arg("-bufsize").arg(plan.bufsize().to_string());

    cmd.arg("-c:a").arg(&opts.audio_codec);
    cmd.arg("-b:a").arg(format!("{}k", opts.audio_bitrate));
    cmd.arg("-ac").arg(opts.audio_channels.to_string());

    cmd.arg("-vf").arg(plan.scale_filter());
    cmd.arg("-f").arg("mp4");
    cmd.arg("-progress").arg("pipe:1");

    apply_extra_args(&mut cmd, &opts.extra_args);

    cmd.arg(&job.output_path);
    cmd
}

/// Apply additional user-provided ffmpeg arguments to the command.
/// Uses shell-style parsing so quoted strings with spaces are preserved.
fn apply_extra_args(cmd: &mut Command, extra_args: &str) {
    if extra_args.is_empty() {
        return;
    }

    if let Some(args) = shlex::split(extra_args) {
        for arg in args {
            cmd.arg(arg);
        }
    } else {
        // Unbalanced quotes; fall back to simple whitespace split
        for arg in extra_args.split_whitespace() {
            cmd.arg(arg);
        }
    }
}

/// Render a command as a shell-style string for dry runs and the debug log
pub fn format_ffmpeg_cmd(cmd: &Command) -> String {
    format!(
        "{} {}",
        cmd.get_program().to_string_lossy(),
        cmd.get_args()
            .map(|arg| {
                let s = arg.to_string_lossy();
                if s.contains(' ') {
                    format!("\"{}\"", s)
                } else {
                    s.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    )
}

/// Run the encoder and stream its progress output.
///
/// Spawns the child with stdout piped for the progress stream and stderr
/// drained on a collector thread. Each progress line updates the job's
/// runtime fields and fires the callback; the callback owns rendering so
/// parsing stays independently testable. Blocks until the child exits.
///
/// A failed encode leaves any partial output file on disk.
pub fn run_encode<F>(job: &mut CompressJob, mut cmd: Command, mut callback: F) -> Result<(), ShrinkError>
where
    F: FnMut(&CompressJob, &ProgressParser),
{
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|_| ShrinkError::ToolNotFound {
        tool: "ffmpeg".to_string(),
        path: cmd.get_program().to_string_lossy().into_owned(),
    })?;

    let stderr = child.stderr.take().ok_or_else(|| ShrinkError::EncodeFailed {
        status: None,
        stderr_tail: "failed to capture ffmpeg stderr".to_string(),
    })?;
    let stderr_thread = std::thread::spawn(move || {
        let mut stderr_output = String::new();
        let reader = BufReader::new(stderr);
        for line in reader.lines().map_while(Result::ok) {
            stderr_output.push_str(&line);
            stderr_output.push('\n');
        }
        stderr_output
    });

    let stdout = child.stdout.take().ok_or_else(|| ShrinkError::EncodeFailed {
        status: None,
        stderr_tail: "failed to capture ffmpeg stdout".to_string(),
    })?;
    let reader = BufReader::new(stdout);
    let mut parser = ProgressParser::new();

    for line in reader.lines().map_while(Result::ok) {
        parser.parse_line(&line);

        job.out_time_s = parser.out_time_s;
        job.progress_pct = parser.percent(job.duration_s);
        job.fps = parser.fps;
        job.speed = parser.speed;

        callback(job, &parser);
    }

    let status = child.wait().map_err(|e| ShrinkError::EncodeFailed {
        status: None,
        stderr_tail: format!("failed to wait for ffmpeg: {}", e),
    })?;

    let stderr_output = stderr_thread
        .join()
        .unwrap_or_else(|_| "failed to capture stderr".to_string());

    if !status.success() {
        return Err(ShrinkError::EncodeFailed {
            status: status.code(),
            stderr_tail: tail_lines(&stderr_output, 8),
        });
    }

    Ok(())
}

/// Last `n` lines of a block of output
fn tail_lines(s: &str, n: usize) -> String {
    let lines: Vec<&str> = s.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_output_path() {
        assert_eq!(
            derive_output_path(Path::new("/videos/clip.mp4")),
            PathBuf::from("/videos/clip.shrunk.mp4")
        );
        assert_eq!(
            derive_output_path(Path::new("clip.mov")),
            PathBuf::from("clip.shrunk.mp4")
        );
    }

    #[test]
    fn test_apply_extra_args_respects_quotes() {
        let mut cmd = Command::new("ffmpeg");
        apply_extra_args(&mut cmd, "-metadata title=\"two words\" -an");

        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().to_string())
            .collect();
        assert_eq!(args, vec!["-metadata", "title=two words", "-an"]);
    }

    #[test]
    fn test_format_ffmpeg_cmd_quotes_spaces() {
        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-i").arg("my clip.mp4");

        assert_eq!(format_ffmpeg_cmd(&cmd), "ffmpeg -i \"my clip.mp4\"");
    }

    #[test]
    fn test_tail_lines() {
        let text = "one\ntwo\nthree\nfour\n";
        assert_eq!(tail_lines(text, 2), "three\nfour");
        assert_eq!(tail_lines(text, 10), "one\ntwo\nthree\nfour");
    }
}
