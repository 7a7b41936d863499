//! Core library: folder scanning, preview cache, move/split and undo.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod fs_apply;
pub mod models;
pub mod paths;
pub mod scanner;
pub mod service;
pub mod undo;
pub mod worker;

pub use error::{Result, SorterError};
pub use service::Sorter;
