//! CLI command handlers module
//!
//! - serve: web UI and API server
//! - ask: one-shot question and the terminal chat loop
//! - init: vector table creation
//! - ingest: passage ingestion
//! - info: configuration display and connectivity check

pub mod ask;
pub mod info;
pub mod ingest;
pub mod init;
pub mod serve;

pub use ask::*;
pub use info::*;
pub use ingest::*;
pub use init::*;
pub use serve::*;
