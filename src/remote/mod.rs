//! Remote Codexa engine integration.

pub mod client;

pub use client::{ClientConfig, RemoteAnalysisClient, RemoteError};
