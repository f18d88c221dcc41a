// tests/log_reading_test.rs

use std::io::Write;

use stream_log_render::data_analysis::link_summary::LinkSummary;
use stream_log_render::data_input::frame_info::FrameInfoLog;
use stream_log_render::data_input::log_reader::{IndexedLog, LogAggregator};
use stream_log_render::data_input::pcmd_monitor::PcmdMonitorLog;
use stream_log_render::data_input::rtp_reader::RtpReaderLog;
use stream_log_render::data_input::rtp_sender::RtpSenderLog;
use stream_log_render::error::{LogError, NumericKind};
use tempfile::NamedTempFile;

fn log_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_frame_info_duplicate_timestamp_is_skipped() {
    let file = log_file("# Test flight\nframeIndex acquisitionTs wifiRssi\n1 100 -40\n2 100 -41\n3 200 -42\n");
    let log = IndexedLog::<FrameInfoLog>::open(file.path()).unwrap();
    assert_eq!(log.title(), "Test flight");
    assert_eq!(log.data().len(), 2);
    assert_eq!(log.data().ignored_lines(), 1);
    assert_eq!(log.data().column(|r| r.acquisition_ts), vec![100, 200]);
}

#[test]
fn test_title_falls_back_to_path() {
    let file = log_file("frameIndex acquisitionTs\n1 100\n");
    let log = IndexedLog::<FrameInfoLog>::open(file.path()).unwrap();
    assert_eq!(log.title(), file.path().display().to_string());
    assert!(!log.root_name().is_empty());
}

#[test]
fn test_unknown_and_missing_columns_are_tolerated() {
    let file = log_file("rtpSeqNum somethingElse bytesSent\n1 x 50\n2 y 0\n3 z 0\n4 w 40\n");
    let log = IndexedLog::<RtpSenderLog>::open(file.path()).unwrap();
    assert!(log.columns().is_resolved("rtpSeqNum"));
    assert!(!log.columns().is_resolved("sendTimestamp"));
    assert_eq!(log.data().column(|r| r.dropped_before), vec![0, 0, 0, 2]);
    assert_eq!(log.data().column(|r| r.acq_to_network_send_ms), vec![0.0; 4]);
}

#[test]
fn test_refresh_picks_up_appended_lines() {
    let mut file = log_file("seqNum creationTimestamp receptionTimestamp\n1 1000 3000\n2 2000 4000\n");
    let mut log = IndexedLog::<PcmdMonitorLog>::open(file.path()).unwrap();
    assert_eq!(log.data().len(), 2);

    file.write_all(b"3 3000 5000\n5 4000 6000\n").unwrap();
    file.flush().unwrap();
    log.refresh().unwrap();

    assert_eq!(log.data().len(), 4);
    assert_eq!(log.data().column(|r| r.missing_before), vec![0, 0, 0, 1]);
}

#[test]
fn test_malformed_number_names_line_and_field() {
    let file = log_file("frameIndex acquisitionTs\n1 abc\n");
    let Err(err) = IndexedLog::<FrameInfoLog>::open(file.path()) else {
        panic!("malformed field accepted");
    };
    match err {
        LogError::Parse {
            line,
            field,
            value,
            kind,
        } => {
            assert_eq!(line, 2);
            assert_eq!(field, "acquisitionTs");
            assert_eq!(value, "abc");
            assert_eq!(kind, NumericKind::Integer);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.log");
    let Err(err) = IndexedLog::<RtpReaderLog>::open(&path) else {
        panic!("opened a missing file");
    };
    assert!(matches!(err, LogError::Io { .. }));
    assert!(err.to_string().contains("absent.log"));
}

#[test]
fn test_link_summary_from_files() {
    let sender = log_file("rtpSeqNum bytesSent\n1 50\n2 0\n3 50\n4 50\n5 50\n");
    let reader = log_file("rtpSeqNum bytes\n1 50\n3 50\n5 50\n");
    let sender = IndexedLog::<RtpSenderLog>::open(sender.path()).unwrap();
    let reader = IndexedLog::<RtpReaderLog>::open(reader.path()).unwrap();

    let summary = LinkSummary::new(sender.data(), reader.data());
    assert!((summary.sender_dropped_percent - 25.0).abs() < 1e-12);
    assert!((summary.reader_missing_percent - 50.0).abs() < 1e-12);
    assert!((summary.loss_ratio - 2.0).abs() < 1e-12);
    assert!(summary.to_string().contains("Missing packets: 50.000% (x2.00)"));
}

// tests/log_reading_test.rs
