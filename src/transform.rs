//! Source-to-source transforms over lexed text.

pub mod strip_comments;

pub use strip_comments::strip_verilog_comments;
