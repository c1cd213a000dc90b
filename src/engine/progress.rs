/// Parser for ffmpeg progress output (key=value format)
///
/// ffmpeg emits `out_time=HH:MM:SS.ffffff` markers on the progress stream;
/// builds with a newer progress writer also emit `out_time_us`. Both are
/// accepted. Lines that match neither pattern are ignored.
#[derive(Debug, Default, Clone)]
pub struct ProgressParser {
    pub out_time_s: f64,
    pub fps: Option<f64>,
    pub speed: Option<f64>,
    pub bitrate_kbps: Option<f64>,
    pub total_size: Option<u64>,
    pub is_complete: bool,
}

impl ProgressParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single line of ffmpeg progress output
    pub fn parse_line(&mut self, line: &str) {
        if let Some((key, value)) = line.split_once('=') {
            match key.trim() {
                "out_time" => {
                    if let Some(secs) = parse_clock(value.trim()) {
                        self.out_time_s = secs;
                    }
                }
                "out_time_us" => {
                    if let Ok(us) = value.trim().parse::<u64>() {
                        self.out_time_s = us as f64 / 1_000_000.0;
                    }
                }
                "fps" => {
                    if let Ok(f) = value.trim().parse::<f64>() {
                        self.fps = Some(f);
                    }
                }
                "speed" => {
                    // Speed is in format "1.23x", strip the 'x'
                    let speed_str = value.trim().trim_end_matches('x');
                    if let Ok(s) = speed_str.parse::<f64>() {
                        self.speed = Some(s);
                    }
                }
                "bitrate" => {
                    // Bitrate is in format "123.4kbits/s", extract number
                    let bitrate_str = value.trim().trim_end_matches("kbits/s");
                    if let Ok(b) = bitrate_str.parse::<f64>() {
                        self.bitrate_kbps = Some(b);
                    }
                }
                "total_size" => {
                    if let Ok(size) = value.trim().parse::<u64>() {
                        self.total_size = Some(size);
                    }
                }
                "progress" => {
                    if value.trim() == "end" {
                        self.is_complete = true;
                    }
                }
                _ => {}
            }
        }
    }

    /// Percentage complete given the total duration, clamped to 100.
    /// Unknown or non-positive durations report 0.
    pub fn percent(&self, duration_s: Option<f64>) -> u8 {
        if let Some(dur) = duration_s {
            if dur > 0.0 {
                return (self.out_time_s / dur * 100.0).min(100.0) as u8;
            }
        }
        0
    }
}

/// Parse an ffmpeg clock value like "00:01:30.500000" to seconds
///
/// ffmpeg prints a large negative clock before the first frame is written;
/// unsigned parsing rejects it so the previous value is kept.
fn parse_clock(s: &str) -> Option<f64> {
    let mut parts = s.splitn(3, ':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;

    if minutes >= 60 || !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    Some((hours * 3600 + minutes * 60) as f64 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("00:01:30.500000"), Some(90.5));
        assert_eq!(parse_clock("01:00:00.000000"), Some(3600.0));
        assert_eq!(parse_clock("00:00:05"), Some(5.0));

        // ffmpeg's pre-roll sentinel and garbage are ignored
        assert_eq!(parse_clock("-577014:32:22.770000"), None);
        assert_eq!(parse_clock("not a clock"), None);
        assert_eq!(parse_clock("00:99:00.0"), None);
    }

    #[test]
    fn test_parse_line_out_time() {
        let mut parser = ProgressParser::new();

        parser.parse_line("out_time=00:01:30.500000");
        assert_eq!(parser.out_time_s, 90.5);

        parser.parse_line("out_time_us=5000000");
        assert_eq!(parser.out_time_s, 5.0);

        parser.parse_line("frame=120");
        assert_eq!(parser.out_time_s, 5.0);
    }

    #[test]
    fn test_parse_line_stats() {
        let mut parser = ProgressParser::new();

        parser.parse_line("fps=30.5");
        assert_eq!(parser.fps, Some(30.5));

        parser.parse_line("speed=1.5x");
        assert_eq!(parser.speed, Some(1.5));

        parser.parse_line("bitrate=150.3kbits/s");
        assert_eq!(parser.bitrate_kbps, Some(150.3));

        parser.parse_line("total_size=1024000");
        assert_eq!(parser.total_size, Some(1024000));

        parser.parse_line("progress=end");
        assert!(parser.is_complete);
    }

    #[test]
    fn test_percent() {
        let mut parser = ProgressParser::new();
        parser.parse_line("out_time=00:01:30.500000");

        // 90.5s of 180s rounds down to 50
        assert_eq!(parser.percent(Some(180.0)), 50);

        // Elapsed beyond the duration clamps to 100, never over
        assert_eq!(parser.percent(Some(60.0)), 100);

        // Unknown or degenerate duration reports 0
        assert_eq!(parser.percent(None), 0);
        assert_eq!(parser.percent(Some(0.0)), 0);
    }
}
