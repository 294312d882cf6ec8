//! Core contracts for the Webstage action executor.
//!
//! This crate defines the boundary spoken by every caller: the fixed action
//! vocabulary, the loosely-typed [`ActionRequest`], the uniform
//! [`ActionResult`] envelope, and the error taxonomy handlers recover into.
//! It carries no browser code so that transports and tests can depend on it
//! cheaply.

mod action;
mod error;
mod result;

pub use action::{Action, ActionRequest};
pub use error::ActionError;
pub use result::ActionResult;
