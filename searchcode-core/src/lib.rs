//! searchcode-core: search orchestration for the searchcode client.
//!
//! Turns raw query keystrokes into a consistent view of
//! query → result set → selection → file content, talking to a remote search
//! service through the [`Transport`] trait. No terminal code lives here; the
//! `searchcode` binary renders whatever a [`Session`] exposes.
//!
//! Layering, leaf first:
//!
//! - [`transport`]: four-verb request contract and the reqwest implementation
//! - [`casing`]: key casing transcoding applied at the transport boundary
//! - [`api`]: typed endpoints and response envelopes
//! - [`debounce`]: quiet-period coalescing of typed text
//! - [`sequencer`]: epoch-sequenced search requests
//! - [`selection`]: result set and selection store
//! - [`content`]: epoch-sequenced content fetches for the selection
//! - [`session`]: the orchestration root tying them together

pub mod api;
pub mod casing;
pub mod content;
pub mod debounce;
pub mod epoch;
pub mod error;
pub mod event;
pub mod selection;
pub mod sequencer;
pub mod session;
pub mod transport;
pub mod types;

pub use casing::WireCase;
pub use epoch::Epoch;
pub use error::{TransportError, TransportResult};
pub use event::CoreEvent;
pub use selection::SelectionChange;
pub use sequencer::SearchParams;
pub use session::{Failure, ServiceHealth, Session, SessionConfig, Stream};
pub use transport::{HttpTransport, Method, Request, Transport};
pub use types::{ItemKey, RepoInfo, ResultItem};
