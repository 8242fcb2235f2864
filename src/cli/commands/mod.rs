pub mod cleanup;
pub mod report;
