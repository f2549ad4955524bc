pub mod app;
pub mod error;
pub mod session;
pub mod sync;
