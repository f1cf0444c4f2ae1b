//! Browser-style `fetch()` on top of a native HTTP transport.
//!
//! - [`options`]: the options bag and its normalization
//! - [`request`]: translation into a native request
//! - [`transport`]: the exchange capability and its `reqwest` implementation
//! - [`response`]: the normalized response
//! - [`cors`]: the CORS heuristic
//! - [`fetch`]: the orchestrator tying it all together
pub mod cors;
pub mod fetch;
pub mod options;
pub mod request;
pub mod response;
pub mod transport;

pub use fetch::{fetch, fetch_as, fetch_with, FetchId, Fetcher};
pub use options::{normalize, RequestOptions};
pub use response::Response;
pub use transport::{RedirectPolicy, ReqwestTransport, Transport, TransportResponse};
