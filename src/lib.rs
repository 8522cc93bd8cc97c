//! # mediameta
//!
//! Typed, hierarchical metadata for media streams.
//!
//! A [`MetaData`] node carries a resource locator, free-form properties,
//! structured video/audio fields and owned child nodes (for example the
//! elementary streams of a multiplexed program). Nodes are read from and
//! written to an encoded locator of the form
//! `locator?name=value&name=value`, with percent-escaped values.
//!
//! ```rust
//! use mediameta::MetaData;
//!
//! let mut program = MetaData::parse("udp://239.0.0.1:1234?Service=News%2024").unwrap();
//! let video = MetaData::parse("pid:256?VideoWidth=1920&VideoHeight=1080").unwrap();
//! program.append_child(video).unwrap();
//!
//! assert_eq!(program.property("Service").unwrap(), "News 24");
//! assert_eq!(program.child(0).unwrap().fields().video_height(), 1080);
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for nodes and their parts

pub mod core;
pub mod types;
pub mod utils;

pub use crate::core::{
    MetaData, MetaError, MetaResult, NodeId, ParseOptions, PropertyStore, QueryParser,
    StreamFields, INSTANCE_UNSET, VIDEO_PLANES,
};
pub use crate::types::{ContextHandle, FourCc, PropertyValue};
