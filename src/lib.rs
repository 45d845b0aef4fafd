//! Client for the Atlas imagery API.
//!
//! The `http` module turns a request description into a transport-ready
//! descriptor, executes it, and classifies the response; `page` wraps paged
//! collection results; the `api` modules cover the scene, quad, and mosaic
//! endpoints through an [`Atlas`] client handle.

pub mod api;
pub mod client;
pub mod errors;
pub mod http;
pub mod page;
pub mod urls;

pub use client::{API_URL, Atlas};
pub use errors::Error;
pub use http::{
    AbortHandle, ApiResponse, Protocol, RequestConfig, RequestInput, ResponseBody, Terminator,
    parse_config, request,
};
pub use page::Page;
