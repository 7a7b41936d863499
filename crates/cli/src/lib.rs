//! Request surface for the sorter: protocol types, handlers and the line server.
pub mod api;
pub mod protocol;
pub mod server;
