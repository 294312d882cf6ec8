//! Vision-assisted page analysis.
//!
//! When a target cannot be expressed as a CSS selector, the executor falls
//! back to asking a multimodal model: a viewport screenshot plus a question
//! go out, and either a structured `{found, x, y, description}` answer or a
//! free-text reply comes back.
//!
//! Two response strategies, deliberately kept apart:
//!
//! - [`analyzer`] — the primary path: extract and parse a structured object
//!   from the model reply.
//! - [`heuristic`] — the fallback for unparseable replies: approximate
//!   keyword matching over positional phrases. It is pattern matching, not
//!   semantic understanding, and is never allowed to masquerade as the
//!   structured path.

mod analyzer;
mod api;
mod client;
pub mod heuristic;

pub use analyzer::{VisionAnalyzer, VisionAnswer, VisionOutcome};
pub use client::{VisionClient, VisionError};
