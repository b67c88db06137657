//! Report rendering.
//!
//! PDF is the primary deliverable; Markdown and JSON renditions are
//! available for terminals and pipelines.

pub mod generator;
pub mod layout;
pub mod pdf;

pub use generator::{generate_json_report, generate_markdown_report, text_report_filename};
pub use layout::DEFAULT_TRUNCATE_CHARS;
pub use pdf::{render, RenderOptions};
