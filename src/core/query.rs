//! Query-string parser
//!
//! This module turns the query tail of an encoded locator
//! (`name=value&name=value`) into assignments. Values are percent-decoded;
//! names listed in the reserved table are parsed as numbers and written to
//! [`StreamFields`], every other name becomes a property.
//!
//! Parsing and applying are separate steps, so a query that fails to parse
//! leaves the target node untouched.

use crate::core::error::{MetaError, MetaResult};
use crate::core::fields::StreamFields;
use crate::core::properties::PropertyStore;
use crate::utils::number::{leading_float, leading_int};
use crate::utils::percent;
use tracing::debug;

/// Options controlling how encoded locators are parsed.
///
/// The default is lenient, matching what older producers emit.
///
/// # Example
///
/// ```rust
/// use mediameta::{MetaData, MetaError, ParseOptions};
///
/// let lenient = MetaData::parse("cam?Label=%zz").unwrap();
/// assert_eq!(lenient.properties().get_bytes("Label").unwrap().len(), 1);
///
/// let strict = MetaData::parse_with("cam?Label=%zz", &ParseOptions::default().strict_escapes());
/// assert_eq!(strict.unwrap_err(), MetaError::MalformedEscape { offset: 10 });
/// ```
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject escapes whose digits are not hex instead of decoding them anyway
    pub strict_escapes: bool,
    /// Reject reserved values that are not entirely a number
    pub strict_numbers: bool,
}

impl ParseOptions {
    /// Reject malformed percent-escapes
    pub fn strict_escapes(mut self) -> Self {
        self.strict_escapes = true;
        self
    }

    /// Require reserved values to parse completely
    ///
    /// By default `VideoWidth=1920px` reads as 1920 and `VideoWidth=wide`
    /// as 0. Strict parsing also rejects `inf` and `NaN`
    pub fn strict_numbers(mut self) -> Self {
        self.strict_numbers = true;
        self
    }

    /// Enable every strict check
    pub fn strict(self) -> Self {
        self.strict_escapes().strict_numbers()
    }
}

/// A number parsed from a reserved query value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Int(i32),
    Float(f64),
}

impl FieldValue {
    fn as_i32(self) -> i32 {
        match self {
            FieldValue::Int(v) => v,
            FieldValue::Float(v) => v as i32,
        }
    }

    fn as_f32(self) -> f32 {
        match self {
            FieldValue::Int(v) => v as f32,
            FieldValue::Float(v) => v as f32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberKind {
    Int,
    Float,
}

/// A query name that maps onto a structured field
pub struct ReservedField {
    name: &'static str,
    kind: NumberKind,
    store: fn(&mut StreamFields, FieldValue),
}

impl ReservedField {
    /// The query name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Write a parsed value into its field
    pub fn store(&self, fields: &mut StreamFields, value: FieldValue) {
        (self.store)(fields, value)
    }

    fn read(&self, text: &str, strict: bool) -> MetaResult<FieldValue> {
        let invalid = || MetaError::ParseError {
            key: self.name.to_string(),
            value: text.to_string(),
        };
        let value = match (self.kind, strict) {
            (NumberKind::Int, false) => FieldValue::Int(leading_int(text)),
            (NumberKind::Float, false) => FieldValue::Float(leading_float(text)),
            (NumberKind::Int, true) => FieldValue::Int(text.trim().parse().map_err(|_| invalid())?),
            (NumberKind::Float, true) => {
                let value: f64 = text.trim().parse().map_err(|_| invalid())?;
                if !value.is_finite() {
                    return Err(invalid());
                }
                FieldValue::Float(value)
            }
        };
        Ok(value)
    }
}

impl std::fmt::Debug for ReservedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservedField")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl PartialEq for ReservedField {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Query names routed to structured fields
pub static RESERVED_FIELDS: &[ReservedField] = &[
    ReservedField {
        name: "VideoWidth",
        kind: NumberKind::Int,
        store: |f, v| f.set_video_width(v.as_i32()),
    },
    ReservedField {
        name: "VideoHeight",
        kind: NumberKind::Int,
        store: |f, v| f.set_video_height(v.as_i32()),
    },
    ReservedField {
        name: "VideoFrameRate",
        kind: NumberKind::Float,
        store: |f, v| f.set_video_frame_rate(v.as_f32()),
    },
    // Bitrates are sometimes written with a fraction; the integer part is kept.
    ReservedField {
        name: "VideoBitrate",
        kind: NumberKind::Float,
        store: |f, v| f.set_video_bitrate(v.as_i32()),
    },
    ReservedField {
        name: "AudioChanel",
        kind: NumberKind::Int,
        store: |f, v| f.set_audio_channels(v.as_i32()),
    },
    ReservedField {
        name: "AudioSampleRate",
        kind: NumberKind::Int,
        store: |f, v| f.set_audio_sample_rate(v.as_i32()),
    },
    ReservedField {
        name: "AudioBpp",
        kind: NumberKind::Int,
        store: |f, v| f.set_audio_bits_per_sample(v.as_i32()),
    },
    ReservedField {
        name: "AudioBitRate",
        kind: NumberKind::Int,
        store: |f, v| f.set_audio_bit_rate(v.as_i32()),
    },
    ReservedField {
        name: "AudioBlockAlign",
        kind: NumberKind::Int,
        store: |f, v| f.set_audio_block_align(v.as_i32()),
    },
];

/// Look up the structured field a query name maps to
pub fn reserved_field(name: &str) -> Option<&'static ReservedField> {
    RESERVED_FIELDS.iter().find(|field| field.name == name)
}

/// One parsed `name=value` segment
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// A reserved name with its parsed number
    Field {
        field: &'static ReservedField,
        value: FieldValue,
    },
    /// Any other name with its decoded value
    Property { name: String, value: Vec<u8> },
}

/// Parser for the query tail of an encoded locator
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryParser {
    options: ParseOptions,
}

impl QueryParser {
    /// Create a parser with the given options
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Split and decode a query string into assignments, in input order
    ///
    /// Segments without `=` or with an empty name are skipped. Error
    /// offsets are byte positions in `query`.
    pub fn parse(&self, query: &str) -> MetaResult<Vec<Assignment>> {
        let mut assignments = Vec::new();
        let mut segment_start = 0;

        for segment in query.split('&') {
            let start = segment_start;
            segment_start += segment.len() + 1;

            let Some((name, raw)) = segment.split_once('=') else {
                if !segment.is_empty() {
                    debug!(segment, "skipping query segment without '='");
                }
                continue;
            };
            if name.is_empty() {
                debug!(segment, "skipping query segment with empty name");
                continue;
            }

            let value_offset = start + name.len() + 1;
            let value = if self.options.strict_escapes {
                percent::decode_strict(raw.as_bytes()).map_err(|err| match err {
                    MetaError::MalformedEscape { offset } => MetaError::MalformedEscape {
                        offset: offset + value_offset,
                    },
                    other => other,
                })?
            } else {
                percent::decode(raw.as_bytes())
            };

            let assignment = match reserved_field(name) {
                Some(field) => {
                    let text = String::from_utf8_lossy(&value);
                    Assignment::Field {
                        field,
                        value: field.read(&text, self.options.strict_numbers)?,
                    }
                }
                None => Assignment::Property {
                    name: name.to_string(),
                    value,
                },
            };
            assignments.push(assignment);
        }

        Ok(assignments)
    }

    /// Write assignments into fields and properties; later ones win
    pub fn apply(
        assignments: Vec<Assignment>,
        fields: &mut StreamFields,
        properties: &mut PropertyStore,
    ) {
        for assignment in assignments {
            match assignment {
                Assignment::Field { field, value } => field.store(fields, value),
                Assignment::Property { name, value } => properties.insert_decoded(name, value),
            }
        }
    }
}
