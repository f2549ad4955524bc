// Per-domain REST clients for the school backend.
//
// Every client is a thin borrowed view over `ApiClient`, which attaches the
// acting role's bearer token and hands the request to a `Transport`.

pub mod class;
pub mod client;
pub mod error;
pub mod lesson;
pub mod mailing;
pub mod personal;
pub mod recording;
pub mod report;
pub mod student;
pub mod teacher;
pub mod test;
pub mod tokens;
pub mod transport;

pub use client::ApiClient;
pub use error::ApiError;
pub use tokens::{MemoryTokens, TokenStore};
pub use transport::{ApiRequest, FormPart, Method, RequestBody, ReqwestTransport, Transport};
