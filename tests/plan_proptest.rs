// Property-based tests for the bitrate planner

use ffshrink::engine::probe::MediaInfo;
use ffshrink::engine::{EncodePlan, scale_height, target_bitrate};
use proptest::prelude::*;

proptest! {
    #[test]
    fn target_bitrate_matches_formula(
        duration_s in 0.1f64..86_400.0,
        target_size_mb in 0.1f64..8192.0,
    ) {
        let expected = (target_size_mb * 8.0 * 1024.0 * 1024.0 / duration_s).floor() as u64;
        prop_assert_eq!(target_bitrate(duration_s, target_size_mb), expected);
    }

    #[test]
    fn bufsize_is_exactly_double(
        duration_s in 0.1f64..86_400.0,
        target_size_mb in 0.1f64..8192.0,
        height in 1u32..8192,
    ) {
        let media = MediaInfo {
            duration_s,
            bitrate_bps: 1,
            width: 1,
            height,
        };
        let plan = EncodePlan::new(&media, target_size_mb, 720);
        prop_assert_eq!(plan.bufsize(), plan.target_bitrate * 2);
    }

    #[test]
    fn longer_input_never_gets_more_bitrate(
        duration_s in 1.0f64..86_400.0,
        target_size_mb in 0.1f64..8192.0,
    ) {
        let shorter = target_bitrate(duration_s, target_size_mb);
        let longer = target_bitrate(duration_s * 2.0, target_size_mb);
        prop_assert!(longer <= shorter);
    }

    #[test]
    fn scale_height_never_exceeds_cap(
        source_height in 1u32..8192,
        max_height in 1u32..4096,
    ) {
        let h = scale_height(source_height, max_height);
        prop_assert!(h <= max_height);
        prop_assert!(h <= source_height);
        prop_assert_eq!(h, source_height.min(max_height));
    }
}
