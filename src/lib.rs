// Library root
// -----------
// The binary (`main.rs`) is a thin wrapper; the import workflow lives here
// so it can be driven from tests against a mock server.
//
// Module responsibilities:
// - `api`: HTTP calls to the import endpoints (upload, status).
// - `models`: request and response records.
// - `runner`: repetitions and the status polling loop.
// - `cli`: flags and the run configuration.
// - `error`: error taxonomy shared by the above.
// - `logging`: tracing subscriber setup.
pub mod api;
pub mod cli;
pub mod error;
pub mod logging;
pub mod models;
pub mod runner;

pub use error::{ImportError, ImportResult};
