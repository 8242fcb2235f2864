pub mod report;

pub use report::{CategoryCounts, ReportRenderer};
