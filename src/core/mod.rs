//! Core module
//!
//! This module contains the metadata node and its building blocks:
//! properties, structured fields and the query-string parser.

pub mod error;
pub mod fields;
pub mod metadata;
pub mod properties;
pub mod query;

pub use error::{MetaError, MetaResult};
pub use fields::{StreamFields, INSTANCE_UNSET, VIDEO_PLANES};
pub use metadata::{MetaData, NodeId};
pub use properties::PropertyStore;
pub use query::{
    reserved_field, Assignment, FieldValue, ParseOptions, QueryParser, ReservedField,
    RESERVED_FIELDS,
};
