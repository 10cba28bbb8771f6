pub mod filter;
pub mod ignore;

pub use filter::{filter_trace, CAPTURED_TRACE_SKIP};
pub use ignore::IgnoreList;
