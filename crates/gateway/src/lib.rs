#![forbid(unsafe_code)]

pub mod api;
pub mod http;
pub mod memory;
pub mod session;

pub use api::{AttemptSubmission, GatewayError, ResultsGateway, TestGateway};
pub use http::HttpGateway;
pub use memory::InMemoryGateway;
pub use session::{
    AttemptSessionStore, FileSessionStore, MemorySessionStore, SessionSnapshot, SessionStoreError,
    SESSION_KEY,
};
