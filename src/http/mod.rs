//! Request descriptor parsing and execution.

pub mod config;
pub mod request;

pub use config::{Protocol, RequestConfig, RequestInput, parse_config};
pub use request::{AbortHandle, ApiResponse, ResponseBody, Terminator, classify, execute, request};
