pub mod config;
pub mod errors;
pub mod net;
pub mod serializer;

pub use errors::FetchError;
pub use net::*;
