//! JSON-lines transport between the application shell and the router.

pub mod request_reader;
pub mod response_writer;
pub mod server;
