//! Conversion through the external packaging tool.
//!
//! - [`invoker`] - builds and runs the `build-apks` command line
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`tool_detection`] - Java runtime lookup

pub mod checksum;
pub mod invoker;
pub(crate) mod tool_detection;

pub use invoker::ConversionInvoker;
