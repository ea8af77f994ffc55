//! # API Module
//!
//! HTTP endpoints of the short-lived local server that receives the OAuth
//! redirect while `plmv auth` is running.
//!
//! ## Endpoints
//!
//! - [`callback`] - redirect target of the authorization server. Completes the
//!   authorization code flow (state check plus code exchange) or, for the
//!   implicit grant, serves a page that forwards the URL fragment.
//! - [`implicit_callback`] - receives the forwarded fragment of an implicit
//!   grant and turns it into a token.
//! - [`health`] - status and version, handy to check the port is ours.
//!
//! Both callbacks reject responses whose `state` does not match the pending
//! request unless `PLMV_SKIP_STATE_CHECK` is set.

mod callback;
mod health;

pub use callback::callback;
pub use callback::implicit_callback;
pub use health::health;
