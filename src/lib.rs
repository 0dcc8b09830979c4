//! # altar-steg
//!
//! Hides bytes in the color channels of transparent pixels of 32bpp images.
//!
//! Pixels whose alpha is at or below a threshold are invisible, so their red,
//! green and blue channels can carry three payload bytes each. A [`PayloadStream`]
//! walks those carrier pixels in row-major order and exposes them as a
//! forward-only byte stream (`std::io::Read` + `std::io::Write`).
//!
//! ## Modules
//!
//! - [`pixel`]: colors, big-endian pixel words and the locked [`pixel::PixelBuffer`]
//! - [`stream`]: the carrier scanner and the [`PayloadStream`]
//! - [`raster`]: backing image stores and the `image`-crate codec
//! - [`framing`]: length-prefixed messages on top of any stream
//! - [`inspect`]: capacity reports
//! - [`common`]: configuration and logging for the binaries

pub mod common;
pub mod error;
pub mod framing;
pub mod inspect;
pub mod pixel;
pub mod raster;
pub mod stream;

pub use error::{Result, StegError};
pub use raster::{Bitmap, PixelFormat, RasterStore};
pub use stream::{PayloadStream, StreamOptions};
