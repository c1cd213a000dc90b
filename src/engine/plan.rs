// Bitrate and scaling decisions for a compression run

use super::probe::MediaInfo;

/// Default cap on output height. Width is left to ffmpeg (`scale=-2:<h>`)
/// so the aspect ratio is preserved.
pub const DEFAULT_MAX_HEIGHT: u32 = 720;

/// Derived encoding parameters for a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodePlan {
    /// Average video bitrate (bits/sec) that fills the target size over
    /// the full duration. Used as the encoder's rate cap.
    pub target_bitrate: u64,
    /// Output height after capping. Never exceeds the configured maximum.
    pub scale_height: u32,
}

impl EncodePlan {
    pub fn new(media: &MediaInfo, target_size_mb: f64, max_height: u32) -> Self {
        Self {
            target_bitrate: target_bitrate(media.duration_s, target_size_mb),
            scale_height: scale_height(media.height, max_height),
        }
    }

    /// Rate-control buffer, fixed at twice the bitrate cap.
    pub fn bufsize(&self) -> u64 {
        self.target_bitrate * 2
    }

    pub fn scale_filter(&self) -> String {
        format!("scale=-2:{}", self.scale_height)
    }

    /// A plan whose bitrate is too low to produce watchable video.
    /// Accepted (the encode still runs) but worth a warning.
    pub fn is_degenerate(&self) -> bool {
        self.target_bitrate < 10_000
    }
}

/// Bits per second that spend `target_size_mb` megabytes evenly over
/// `duration_s` seconds, truncated to an integer.
pub fn target_bitrate(duration_s: f64, target_size_mb: f64) -> u64 {
    let target_size_bits = target_size_mb * 8.0 * 1024.0 * 1024.0;
    (target_size_bits / duration_s) as u64
}

/// Cap the output height at `max_height`; smaller sources keep their height.
pub fn scale_height(source_height: u32, max_height: u32) -> u32 {
    source_height.min(max_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_bitrate() {
        // 4 MB over 60s: floor(4 * 8 * 1024 * 1024 / 60)
        assert_eq!(target_bitrate(60.0, 4.0), 559_240);
        assert_eq!(target_bitrate(120.5, 4.0), 278_460);
        assert_eq!(target_bitrate(1.0, 1.0), 8_388_608);
    }

    #[test]
    fn test_target_bitrate_degenerate() {
        // Very long duration yields a near-zero bitrate, by contract not clamped
        let plan = EncodePlan {
            target_bitrate: target_bitrate(100_000.0, 1.0),
            scale_height: 480,
        };
        assert_eq!(plan.target_bitrate, 83);
        assert!(plan.is_degenerate());
    }

    #[test]
    fn test_scale_height() {
        assert_eq!(scale_height(1080, 720), 720);
        assert_eq!(scale_height(720, 720), 720);
        assert_eq!(scale_height(480, 720), 480);
    }

    #[test]
    fn test_plan_from_media() {
        let media = MediaInfo {
            duration_s: 60.0,
            bitrate_bps: 5_000_000,
            width: 1920,
            height: 1080,
        };

        let plan = EncodePlan::new(&media, 4.0, DEFAULT_MAX_HEIGHT);
        assert_eq!(plan.target_bitrate, 559_240);
        assert_eq!(plan.bufsize(), 1_118_480);
        assert_eq!(plan.scale_height, 720);
        assert_eq!(plan.scale_filter(), "scale=-2:720");
        assert!(!plan.is_degenerate());
    }
}
