//! Best-effort decoders for files the strict reader rejects.

pub mod fixed;
pub mod lines;
pub mod pattern;
pub mod splitter;

pub use fixed::{FixedLayout, FixedOffsetRecords};
pub use lines::LineRecords;
pub use pattern::PatternRecords;
pub use splitter::{CodeName, split_code_name};
