//! Nyaya Proxy - back end for the Indian law assistant web app.
//!
//! The browser never talks to Gemini directly. This crate serves the app's
//! pages and exposes a small JSON API:
//! - a completion proxy that wraps questions in a fixed legal-domain
//!   preamble and relays Gemini's answer verbatim,
//! - a health probe that checks Gemini is reachable and answering in the
//!   expected shape,
//! - presence checks and a bundle relay for the optional document-export
//!   libraries (`docx`, `jspdf`, `html2canvas`).

pub mod assets;
pub mod completion;
pub mod config;
pub mod error;
pub mod gemini;
pub mod libraries;
pub mod probe;
pub mod prompt;
pub mod server;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server::{configure, serve, AppState};
