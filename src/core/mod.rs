pub mod classify;
pub mod git;
