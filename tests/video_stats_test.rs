// tests/video_stats_test.rs

use std::io::Write;

use stream_log_render::data_analysis::video_stats::VideoStatsReport;
use stream_log_render::data_input::log_reader::IndexedLog;
use stream_log_render::data_input::video_stats::VideoStatsLog;
use stream_log_render::error::LogError;
use stream_log_render::plot_framework::Panel;
use stream_log_render::plot_functions::plot_video_stats::video_stats_panels;
use tempfile::NamedTempFile;

const LOG: &str = "# Video stats test\n\
timestamp rssi totalFrameCount outputFrameCount erroredOutputFrameCount discardedFrameCount missedFrameCount erroredSecondCount erroredSecondCountByZone[0] macroblockStatus[1][0] macroblockStatus[3][0]\n\
0 -50 0 0 0 0 0 0 0 0 0\n\
1000000 -50 30 30 0 0 0 0 0 100 0\n\
2000000 -55 60 50 5 4 10 1 1 150 30\n\
3000000 -50 90 80 5 4 10 1 1 250 30\n";

fn open(content: &str) -> (NamedTempFile, IndexedLog<VideoStatsLog>) {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    let log = IndexedLog::<VideoStatsLog>::open(file.path()).unwrap();
    (file, log)
}

#[test]
fn test_report_frame_shares_per_rssi() {
    let (_file, log) = open(LOG);
    let report = VideoStatsReport::from_log(&log).unwrap();
    assert_eq!(report.title, "Video stats test");
    assert_eq!(report.bins.len(), 6);
    assert!(report.overall_frames.is_consistent());

    let frames = &report.frames_by_rssi;
    for bin in 0..report.bins.len() {
        let sum = frames.missed[bin]
            + frames.discarded[bin]
            + frames.output_errored[bin]
            + frames.output_no_error[bin];
        if frames.total_share[bin] > 0.0 {
            assert!((sum - 1.0).abs() < 1e-12);
        } else {
            assert_eq!(sum, 0.0);
        }
    }
    // -55 dBm is bin 0, -50 dBm is bin 5.
    assert!((frames.total_share[0] - 1.0 / 3.0).abs() < 1e-12);
    assert!((frames.total_share[5] - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_report_zone_esr_and_macroblocks() {
    let (_file, log) = open(LOG);
    let report = VideoStatsReport::from_log(&log).unwrap();
    // One errored second in zone 0 over 3 s + 1 s, reported last.
    assert_eq!(report.zone_esr[4], 25.0);
    assert_eq!(report.zone_esr[0], 0.0);
    assert_eq!(report.overall_macroblocks[1], 250.0);
    assert_eq!(report.overall_macroblocks[3], 30.0);
}

#[test]
fn test_panel_layouts() {
    let (_file, log) = open(LOG);
    let report = VideoStatsReport::from_log(&log).unwrap();

    let full = video_stats_panels(&report, false);
    assert_eq!(full.len(), 8);
    assert!(full.iter().all(|p| p.is_some()));

    let simple = video_stats_panels(&report, true);
    let titles: Vec<&str> = simple.iter().flatten().map(Panel::title).collect();
    assert_eq!(
        titles,
        vec![
            "Overall frames",
            "ESR by zone",
            "Overall macroblocks",
            "Overall error macroblocks"
        ]
    );
    for panel in simple.iter().flatten() {
        assert_eq!(panel.unavailable_reason(), None);
    }
}

#[test]
fn test_header_only_log_has_no_report() {
    let (_file, log) = open("timestamp rssi totalFrameCount\n");
    assert!(matches!(
        VideoStatsReport::from_log(&log),
        Err(LogError::Empty(_))
    ));
}

// tests/video_stats_test.rs
