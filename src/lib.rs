pub mod analysis_export;
pub mod career;
pub mod config;
pub mod dataset;
pub mod error;
pub mod head_to_head;
pub mod match_record;
pub mod matrix;
pub mod palette;
pub mod report;
pub mod state;
pub mod trend;
