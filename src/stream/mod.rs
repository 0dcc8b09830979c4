//! # Carrier Streams
//!
//! - [`scanner`]: row-major search for carrier pixels and the stream [`Cursor`]
//! - [`payload`]: the byte-oriented [`PayloadStream`] built on top of it

pub mod payload;
pub mod scanner;

pub use payload::{PayloadStream, StreamOptions};
pub use scanner::{CarrierScanner, Cursor};
