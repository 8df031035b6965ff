//! Image processing in pure Rust, built on the `image` crate.
//!
//! | Operation | Where |
//! |---|---|
//! | **Aspect link** | [`derive_linked_axis`] (pure math) |
//! | **Format resolution** | [`resolve`] + [`quality_for`] |
//! | **Decode** | [`ImageBackend::decode`] |
//! | **Resize → encode** | [`resize`] → [`ImageBackend::render`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math and field parsing (unit testable)
//! - **Format**: Output format selection and resolution against the source filename
//! - **Parameters**: Data structures describing a render
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod format;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{
    Axis, Dimensions, derive_linked_axis, parse_dimension_field, parse_linked_value,
};
pub use format::{
    Encoding, OutputFormat, ResolvedFormat, media_type_of, quality_for, resolve,
};
pub use operations::{RenderSettings, ResizeError, TargetInput, resize};
pub use params::{Background, ParseColorError, Quality, RenderParams, ResampleFilter};
pub use rust_backend::RustBackend;
