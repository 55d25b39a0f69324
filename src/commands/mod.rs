//! Command implementations shared by the CLI

pub mod input;
pub mod maintenance;

pub use input::collect_words;
pub use maintenance::{cancel_on_ctrl_c, cleanup, validate_collection};

/// Default page size for `filter` and `all`
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// Default cap on interactive matches
pub const INTERACTIVE_RESULT_CAP: usize = 500;
