// src/main.rs

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgGroup, Parser, Subcommand};

use stream_log_render::data_analysis::video_stats::VideoStatsReport;
use stream_log_render::data_input::frame_info::FrameInfoLog;
use stream_log_render::data_input::log_reader::IndexedLog;
use stream_log_render::data_input::pcmd_monitor::PcmdMonitorLog;
use stream_log_render::data_input::rtp_reader::RtpReaderLog;
use stream_log_render::data_input::rtp_sender::RtpSenderLog;
use stream_log_render::data_input::video_stats::VideoStatsLog;
use stream_log_render::plot_functions::plot_frame_info::plot_frame_info;
use stream_log_render::plot_functions::plot_pcmd::plot_pcmd;
use stream_log_render::plot_functions::plot_rtp_reader::plot_rtp_reader;
use stream_log_render::plot_functions::plot_rtp_sender::plot_rtp_sender;
use stream_log_render::plot_functions::plot_sender_reader::plot_sender_reader;
use stream_log_render::plot_functions::plot_video_stats::plot_video_stats;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Streaming graphs from frame-info, RTP and piloting-command logs
    #[command(group(
        ArgGroup::new("inputs")
            .required(true)
            .multiple(true)
            .args(["frame_info", "sender", "reader", "pcmd"])
    ))]
    Graphs {
        /// Frame info log
        #[arg(short = 'f', long = "frameinfo")]
        frame_info: Option<PathBuf>,

        /// RTP sender log
        #[arg(short, long)]
        sender: Option<PathBuf>,

        /// RTP reader log
        #[arg(short, long)]
        reader: Option<PathBuf>,

        /// Piloting command monitor log
        #[arg(short, long)]
        pcmd: Option<PathBuf>,

        /// Output image; the view name is appended when several views are rendered
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Video statistics from a video-stats log
    VideoStats {
        /// Video stats log
        #[arg(short, long)]
        input: PathBuf,

        /// Output image
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only draw the overall frame and macroblock charts
        #[arg(short, long)]
        simple: bool,
    },
}

/// Image path of one view: `<root>_<view>.png` without an explicit output;
/// the output itself for a single view; otherwise the output stem with the
/// view appended.
fn output_path(root_name: &str, output: Option<&Path>, view: &str, several_views: bool) -> PathBuf {
    match output {
        None => PathBuf::from(format!("{root_name}_{view}.png")),
        Some(output) if !several_views => output.to_path_buf(),
        Some(output) => {
            let stem = output.file_stem().unwrap_or_default().to_string_lossy();
            let extension = output
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_else(|| "png".to_string());
            output.with_file_name(format!("{stem}_{view}.{extension}"))
        }
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn run_graphs(
    frame_info: Option<&Path>,
    sender: Option<&Path>,
    reader: Option<&Path>,
    pcmd: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    // Sender and reader share one view.
    let view_count = usize::from(frame_info.is_some())
        + usize::from(sender.is_some() || reader.is_some())
        + usize::from(pcmd.is_some());
    let several_views = view_count > 1;

    if let Some(path) = frame_info {
        log::info!("Reading frame info log '{}'", path.display());
        let log = IndexedLog::<FrameInfoLog>::open(path)?;
        let out = output_path(&log.root_name(), output, "frame_info", several_views);
        plot_frame_info(&log, &path_str(&out))?;
    }

    match (sender, reader) {
        (Some(sender_path), Some(reader_path)) => {
            log::info!(
                "Reading RTP logs '{}' and '{}'",
                sender_path.display(),
                reader_path.display()
            );
            let sender_log = IndexedLog::<RtpSenderLog>::open(sender_path)?;
            let reader_log = IndexedLog::<RtpReaderLog>::open(reader_path)?;
            let out = output_path(&sender_log.root_name(), output, "sender_reader", several_views);
            plot_sender_reader(&sender_log, &reader_log, &path_str(&out))?;
        }
        (Some(sender_path), None) => {
            log::info!("Reading RTP sender log '{}'", sender_path.display());
            let log = IndexedLog::<RtpSenderLog>::open(sender_path)?;
            let out = output_path(&log.root_name(), output, "rtp_sender", several_views);
            plot_rtp_sender(&log, &path_str(&out))?;
        }
        (None, Some(reader_path)) => {
            log::info!("Reading RTP reader log '{}'", reader_path.display());
            let log = IndexedLog::<RtpReaderLog>::open(reader_path)?;
            let out = output_path(&log.root_name(), output, "rtp_reader", several_views);
            plot_rtp_reader(&log, &path_str(&out))?;
        }
        (None, None) => {}
    }

    if let Some(path) = pcmd {
        log::info!("Reading piloting command log '{}'", path.display());
        let log = IndexedLog::<PcmdMonitorLog>::open(path)?;
        let out = output_path(&log.root_name(), output, "pcmd", several_views);
        plot_pcmd(&log, &path_str(&out))?;
    }
    Ok(())
}

fn run_video_stats(input: &Path, output: Option<&Path>, simple: bool) -> Result<(), Box<dyn Error>> {
    log::info!("Reading video stats log '{}'", input.display());
    let log = IndexedLog::<VideoStatsLog>::open(input)?;
    let report = VideoStatsReport::from_log(&log)?;
    let out = output_path(&log.root_name(), output, "video_stats", false);
    plot_video_stats(&report, simple, &path_str(&out))
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Graphs {
            frame_info,
            sender,
            reader,
            pcmd,
            output,
        } => run_graphs(
            frame_info.as_deref(),
            sender.as_deref(),
            reader.as_deref(),
            pcmd.as_deref(),
            output.as_deref(),
        ),
        Command::VideoStats {
            input,
            output,
            simple,
        } => run_video_stats(&input, output.as_deref(), simple),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    log::debug!("stream-log-render {}", stream_log_render::crate_version());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_graphs_requires_an_input() {
        assert!(Cli::try_parse_from(["stream-log-render", "graphs"]).is_err());
        assert!(Cli::try_parse_from(["stream-log-render", "graphs", "-o", "out.png"]).is_err());
        assert!(Cli::try_parse_from(["stream-log-render", "graphs", "-p", "pcmd.log"]).is_ok());
    }

    #[test]
    fn test_video_stats_simple_flag() {
        let cli = Cli::try_parse_from(["stream-log-render", "video-stats", "-i", "vs.log", "--simple"])
            .unwrap();
        match cli.command {
            Command::VideoStats { input, simple, output } => {
                assert_eq!(input, PathBuf::from("vs.log"));
                assert!(simple);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_output_path_without_output_uses_root_name() {
        assert_eq!(
            output_path("flight_01", None, "frame_info", true),
            PathBuf::from("flight_01_frame_info.png")
        );
    }

    #[test]
    fn test_output_path_single_view_is_used_verbatim() {
        assert_eq!(
            output_path("x", Some(Path::new("out/chart.png")), "pcmd", false),
            PathBuf::from("out/chart.png")
        );
    }

    #[test]
    fn test_output_path_several_views_appends_view() {
        assert_eq!(
            output_path("x", Some(Path::new("out/chart.png")), "pcmd", true),
            PathBuf::from("out/chart_pcmd.png")
        );
        assert_eq!(
            output_path("x", Some(Path::new("chart")), "frame_info", true),
            PathBuf::from("chart_frame_info.png")
        );
    }
}

// src/main.rs
