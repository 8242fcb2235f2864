pub mod error;
pub mod logging;

pub use error::{MergeWatchError, Result};
pub use logging::init_logging;
