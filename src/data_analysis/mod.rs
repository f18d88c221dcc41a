// src/data_analysis/mod.rs

pub mod frame_metrics;
pub mod link_summary;
pub mod sequence;
pub mod video_stats;

// src/data_analysis/mod.rs
