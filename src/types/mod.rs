//! Value types
//!
//! This module defines the small value types carried by a metadata node.

pub mod context;
pub mod fourcc;
pub mod value;

pub use context::ContextHandle;
pub use fourcc::FourCc;
pub use value::PropertyValue;
