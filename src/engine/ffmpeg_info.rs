use std::process::Command;

use crate::error::ShrinkError;

/// Check that ffmpeg runs and return the first line of its version banner
pub fn ffmpeg_version(ffmpeg_path: &str) -> Result<String, ShrinkError> {
    tool_version("ffmpeg", ffmpeg_path)
}

/// Check that ffprobe runs and return the first line of its version banner
pub fn ffprobe_version(ffprobe_path: &str) -> Result<String, ShrinkError> {
    tool_version("ffprobe", ffprobe_path)
}

fn tool_version(tool: &str, path: &str) -> Result<String, ShrinkError> {
    let not_found = || ShrinkError::ToolNotFound {
        tool: tool.to_string(),
        path: path.to_string(),
    };

    let output = Command::new(path)
        .arg("-version")
        .output()
        .map_err(|_| not_found())?;

    if !output.status.success() {
        return Err(not_found());
    }

    let version_output = String::from_utf8_lossy(&output.stdout);
    let first_line = version_output.lines().next().unwrap_or("unknown version");

    Ok(first_line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_maps_to_tool_not_found() {
        let err = ffmpeg_version("/nonexistent/ffmpeg-binary").unwrap_err();
        match err {
            ShrinkError::ToolNotFound { tool, path } => {
                assert_eq!(tool, "ffmpeg");
                assert_eq!(path, "/nonexistent/ffmpeg-binary");
            }
            other => panic!("expected ToolNotFound, got {:?}", other),
        }
        assert_eq!(
            ffprobe_version("/nonexistent/ffprobe-binary")
                .unwrap_err()
                .exit_code(),
            1
        );
    }
}
