//! # Chronicle Proxy
//!
//! Thin file-fetch proxy: `GET /api/files/:id` forwards to a configured
//! upstream URL template and streams the body back under a size cap.
//! No aggregation happens here.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod server;

pub use client::*;
pub use error::*;
pub use server::*;
