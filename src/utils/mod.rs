//! Text codecs shared by the parser and the property store

pub mod number;
pub mod percent;
