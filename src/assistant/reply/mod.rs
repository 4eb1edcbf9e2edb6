//! Reply service boundary, HTTP client and reply decoding.

pub mod http;
pub mod service;
pub mod shape;

pub use http::HttpReplyService;
pub use service::{ReplyFuture, ReplyService};
pub use shape::extract_reply;
