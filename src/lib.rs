use std::collections::{HashMap, HashSet};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("unknown request id: {0}")]
    UnknownRequest(i64),
    #[error("no pending request")]
    NoPendingRequest,
    #[error("invalid feed config: {0}")]
    InvalidConfig(String),
    #[error(
        "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
    )]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

mod dom;
mod events;
mod handlers;
mod harness;
mod html;
mod net;
mod selector;

pub use handlers::FeedConfig;
pub use harness::Harness;
pub use net::PendingRequest;

pub(crate) use dom::*;
pub(crate) use events::*;
pub(crate) use handlers::*;
pub(crate) use html::*;
pub(crate) use net::*;
pub(crate) use selector::*;
