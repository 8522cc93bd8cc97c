//! Property value conversions
//!
//! Typed properties are stored as text. This module defines how each
//! supported type is written to and read back from that text.

/// A type that can be stored in the string property store
///
/// Integers use base-10, floats six fixed decimals, booleans `"0"`/`"1"`.
pub trait PropertyValue: Sized {
    /// Canonical textual form of the value
    fn to_property(&self) -> String;

    /// Parse the textual form, `None` if the text does not represent a value
    fn from_property(text: &str) -> Option<Self>;
}

macro_rules! integer_property {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PropertyValue for $ty {
                fn to_property(&self) -> String {
                    self.to_string()
                }

                fn from_property(text: &str) -> Option<Self> {
                    text.trim().parse().ok()
                }
            }
        )*
    };
}

integer_property!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_property {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PropertyValue for $ty {
                fn to_property(&self) -> String {
                    format!("{:.6}", self)
                }

                fn from_property(text: &str) -> Option<Self> {
                    text.trim().parse().ok()
                }
            }
        )*
    };
}

float_property!(f32, f64);

impl PropertyValue for bool {
    fn to_property(&self) -> String {
        let text = if *self { "1" } else { "0" };
        text.to_string()
    }

    fn from_property(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            text.parse::<i64>().ok().map(|v| v != 0)
        }
    }
}

impl PropertyValue for String {
    fn to_property(&self) -> String {
        self.clone()
    }

    fn from_property(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}
