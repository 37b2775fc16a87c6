//! Configuration for conversion runs.
//!
//! [`Settings`] describes how to obtain and launch the packaging tool, and
//! [`ConversionRequest`] carries the per-run inputs.

mod builder;
mod core;
mod request;
mod runtime;

pub use builder::SettingsBuilder;
pub use core::{Settings, UNIVERSAL_MODE};
pub use request::ConversionRequest;
pub use runtime::ToolRuntime;
