// src/data_input/mod.rs

pub mod column_index;
pub mod frame_info;
pub mod log_line;
pub mod log_reader;
pub mod pcmd_monitor;
pub mod rtp_reader;
pub mod rtp_sender;
pub mod video_stats;

// src/data_input/mod.rs
