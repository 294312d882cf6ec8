//! Chrome DevTools Protocol transport.
//!
//! A deliberately small slice of CDP: connect to the browser WebSocket,
//! manage one isolated browser context, and drive one page. Everything the
//! handlers need funnels through [`Page`].

mod client;
mod error;
mod page;
mod protocol;

pub use client::CdpClient;
pub use error::CdpError;
pub use page::Page;
pub use protocol::{BoxModel, BrowserVersion, CdpRequest, CdpResponse};
