pub mod cookie;
pub mod paths;

pub use paths::{case_detail_path, case_path, Section};
