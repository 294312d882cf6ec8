//! Browser core for the Webstage action executor.
//!
//! Holds exactly one browser session and executes the fixed action
//! vocabulary against it via the Chrome DevTools Protocol. Pure Rust, no
//! Node.js dependency:
//!
//! ```text
//! ┌──────────────────┐    WebSocket     ┌───────────────────┐
//! │  Action handlers │ ◄──────────────► │  Headless Chrome  │
//! │   (this crate)   │       CDP        │  (one context)    │
//! └──────────────────┘                  └───────────────────┘
//! ```
//!
//! ## Pieces
//!
//! - [`cdp`] — WebSocket client and the single attached [`cdp::Page`].
//! - [`session`] — lazy launch, context reset, orderly shutdown of the one
//!   browser/context/page triple.
//! - [`selector`] — rejects non-standard selectors before any browser call.
//! - [`overlay`] — scoped visual markers, removed on every exit path.
//! - [`dom`] — visible-text resolution and assertion queries.
//! - [`content`] — sanitized, attribute-whitelisted body snapshots.
//! - [`popups`] — best-effort dismissal sweep for modals and banners.
//! - [`store`] — screenshot persistence and safe retrieval by name.
//! - [`dispatch`] — handler registry, validation, single-writer execution.
//!
//! ## Serialization of actions
//!
//! Dispatch holds a single-writer lock for the full duration of each
//! action, so concurrently-arriving requests against the shared page run
//! strictly one at a time, in arrival order.

pub mod cdp;
pub mod content;
pub mod dispatch;
pub mod dom;
mod handlers;
pub mod overlay;
pub mod popups;
pub mod selector;
pub mod session;
pub mod store;

pub use cdp::{CdpClient, CdpError, Page};
pub use dispatch::{ActionContext, ActionHandler, Dispatcher};
pub use session::{SessionConfig, SessionError, SessionManager};
pub use store::ScreenshotStore;
