//! Media metadata nodes
//!
//! This module provides the main [`MetaData`] struct: a resource locator,
//! free-form properties, structured stream fields, two opaque byte blobs, a
//! server address table and a list of owned child nodes.

use crate::core::error::{MetaError, MetaResult};
use crate::core::fields::StreamFields;
use crate::core::properties::PropertyStore;
use crate::core::query::{reserved_field, Assignment, ParseOptions, QueryParser};
use crate::types::value::PropertyValue;
use crate::utils::percent;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::info;

mod identity;

pub use identity::NodeId;

/// Metadata describing one media stream or resource
///
/// Children are owned exclusively, so a tree of nodes is dropped as a whole.
/// Both [`Clone::clone`] and [`MetaData::duplicate`] copy every byte of the
/// node and its subtree; they differ only in identity (see [`NodeId`]).
///
/// Equality compares content and ignores identity.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaData {
    #[cfg_attr(feature = "serde", serde(skip, default = "NodeId::next"))]
    id: NodeId,
    locator: String,
    properties: PropertyStore,
    fields: StreamFields,
    extra_data: Bytes,
    side_info: Vec<u8>,
    server_ips: BTreeMap<String, String>,
    children: Vec<MetaData>,
}

impl MetaData {
    /// Create a node for a resource locator
    ///
    /// The locator is stored as given, without decoding.
    pub fn new(locator: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            locator: locator.into(),
            properties: PropertyStore::new(),
            fields: StreamFields::new(),
            extra_data: Bytes::new(),
            side_info: Vec::new(),
            server_ips: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Parse an encoded locator of the form `locator?name=value&...`
    ///
    /// The part before the first `?` is percent-decoded into the locator and
    /// the rest is parsed as a query string. Without a `?` the whole input is
    /// the locator.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mediameta::MetaData;
    ///
    /// let meta = MetaData::parse("rtmp://host/live?VideoWidth=1280&Title=Main%20Stage").unwrap();
    /// assert_eq!(meta.locator(), "rtmp://host/live");
    /// assert_eq!(meta.fields().video_width(), 1280);
    /// assert_eq!(meta.property("Title").unwrap(), "Main Stage");
    /// ```
    pub fn parse(encoded: &str) -> MetaResult<Self> {
        Self::parse_with(encoded, &ParseOptions::default())
    }

    /// Parse an encoded locator with explicit options
    ///
    /// Error offsets are byte positions in `encoded`.
    pub fn parse_with(encoded: &str, options: &ParseOptions) -> MetaResult<Self> {
        let mut meta = Self::new(String::new());
        match encoded.split_once('?') {
            None => meta.locator = decode_locator(encoded, options)?,
            Some((prefix, query)) => {
                let assignments = parse_query(query, prefix.len() + 1, options)?;
                meta.locator = decode_locator(prefix, options)?;
                QueryParser::apply(assignments, &mut meta.fields, &mut meta.properties);
            }
        }
        Ok(meta)
    }

    /// Re-read properties and locator from an encoded locator
    ///
    /// Requires a `?`; fails with [`MetaError::NoQuery`] otherwise. Parsed
    /// values are merged into the existing ones and the locator is replaced
    /// by the decoded prefix. On error the node is left unchanged.
    pub fn update_from_encoded(&mut self, encoded: &str) -> MetaResult<()> {
        self.update_from_encoded_with(encoded, &ParseOptions::default())
    }

    /// Same as [`MetaData::update_from_encoded`] with explicit options
    pub fn update_from_encoded_with(
        &mut self,
        encoded: &str,
        options: &ParseOptions,
    ) -> MetaResult<()> {
        let (prefix, query) = encoded.split_once('?').ok_or(MetaError::NoQuery)?;
        let assignments = parse_query(query, prefix.len() + 1, options)?;
        let locator = decode_locator(prefix, options)?;

        QueryParser::apply(assignments, &mut self.fields, &mut self.properties);
        self.locator = locator;
        Ok(())
    }

    /// Encode locator and properties back into `locator?name=value&...`
    ///
    /// Values are percent-encoded; names are written as they are, like the
    /// parser reads them. Structured fields are not included.
    ///
    /// Parsing the result restores the locator and every property. Names that
    /// would not read back as the same property fail with
    /// [`MetaError::InvalidArgument`]: names containing `&` or `=`, and
    /// reserved names such as `VideoWidth`, which the parser routes to the
    /// structured fields.
    pub fn to_encoded(&self) -> MetaResult<String> {
        let mut out = percent::encode_locator(self.locator.as_bytes());
        for (i, (name, value)) in self.properties.iter().enumerate() {
            check_encodable(name)?;
            out.push(if i == 0 { '?' } else { '&' });
            out.push_str(name);
            out.push('=');
            out.push_str(&percent::encode(value));
        }
        Ok(out)
    }

    /// Identity of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The resource locator
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Replace the resource locator
    pub fn set_locator(&mut self, locator: impl Into<String>) {
        self.locator = locator.into();
    }

    /// Free-form properties
    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    /// Mutable access to the free-form properties
    pub fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.properties
    }

    /// Get a property as text
    pub fn property(&self, key: &str) -> MetaResult<&str> {
        self.properties.get(key)
    }

    /// Set a text property
    pub fn set_property(&mut self, key: &str, value: impl Into<String>) -> MetaResult<()> {
        self.properties.set(key, value)
    }

    /// Get a typed property
    pub fn typed_property<T: PropertyValue>(&self, key: &str) -> MetaResult<T> {
        self.properties.get_typed(key)
    }

    /// Set a typed property
    pub fn set_typed_property<T: PropertyValue>(&mut self, key: &str, value: T) -> MetaResult<()> {
        self.properties.set_typed(key, value)
    }

    /// Remove a property
    pub fn remove_property(&mut self, key: &str) -> MetaResult<()> {
        self.properties.remove(key)
    }

    /// Remove every property
    pub fn clear_properties(&mut self) {
        self.properties.clear();
    }

    /// Replace all properties with those of `source`
    pub fn copy_properties(&mut self, source: &MetaData) {
        self.properties.copy_from(&source.properties);
    }

    /// Insert or overwrite the properties of `source`, keeping the rest
    pub fn update_properties(&mut self, source: &MetaData) {
        self.properties.merge_from(&source.properties);
    }

    /// Structured stream fields
    pub fn fields(&self) -> &StreamFields {
        &self.fields
    }

    /// Mutable access to the structured stream fields
    pub fn fields_mut(&mut self) -> &mut StreamFields {
        &mut self.fields
    }

    /// Codec initialization data
    pub fn extra_data(&self) -> &Bytes {
        &self.extra_data
    }

    /// Replace the codec initialization data
    pub fn set_extra_data(&mut self, extra: impl Into<Bytes>) {
        self.extra_data = extra.into();
    }

    /// Auxiliary side information
    pub fn side_info(&self) -> &[u8] {
        &self.side_info
    }

    /// Replace the auxiliary side information
    pub fn set_side_info(&mut self, side_info: impl Into<Vec<u8>>) {
        self.side_info = side_info.into();
    }

    /// Hostname to IP overrides
    pub fn server_ips(&self) -> &BTreeMap<String, String> {
        &self.server_ips
    }

    /// Replace the hostname to IP overrides
    pub fn set_server_ips(&mut self, server_ips: BTreeMap<String, String>) {
        self.server_ips = server_ips;
    }

    /// Number of child nodes
    pub fn children_count(&self) -> usize {
        self.children.len()
    }

    /// Get a child by index, `None` when out of range
    pub fn child(&self, index: usize) -> Option<&MetaData> {
        self.children.get(index)
    }

    /// Get a mutable reference to a child by index
    pub fn child_mut(&mut self, index: usize) -> Option<&mut MetaData> {
        self.children.get_mut(index)
    }

    /// All child nodes in order
    pub fn children(&self) -> &[MetaData] {
        &self.children
    }

    /// Append a child node
    ///
    /// Fails with [`MetaError::SelfReference`] if `child` is this node or
    /// contains it anywhere in its subtree.
    ///
    /// Identity survives [`Clone::clone`], so a clone of this node, or of
    /// anything this node was cloned from, is refused as well even though
    /// the two share no storage. Use [`MetaData::duplicate`] to build a
    /// child from a copy of an existing node.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mediameta::{MetaData, MetaError};
    ///
    /// let mut program = MetaData::new("udp://239.0.0.1:1234");
    /// program.append_child(MetaData::new("pid:256")).unwrap();
    /// assert_eq!(program.children_count(), 1);
    ///
    /// let same = program.clone();
    /// assert_eq!(program.append_child(same), Err(MetaError::SelfReference));
    ///
    /// let copy = program.duplicate();
    /// assert!(program.append_child(copy).is_ok());
    /// ```
    pub fn append_child(&mut self, child: MetaData) -> MetaResult<()> {
        if child.contains_node(self.id) {
            return Err(MetaError::SelfReference);
        }
        self.children.push(child);
        Ok(())
    }

    fn contains_node(&self, id: NodeId) -> bool {
        self.id == id || self.children.iter().any(|child| child.contains_node(id))
    }

    /// Deep copy with new identities for the copy and all of its children
    pub fn duplicate(&self) -> MetaData {
        let mut copy = self.clone();
        copy.assign_new_ids();
        copy
    }

    fn assign_new_ids(&mut self) {
        self.id = NodeId::next();
        for child in &mut self.children {
            child.assign_new_ids();
        }
    }

    /// Log the locator and every property at INFO level
    pub fn dump(&self) {
        info!(
            locator = %self.locator,
            properties = self.properties.len(),
            children = self.children.len(),
            "metadata properties"
        );
        for (name, value) in self.properties.iter() {
            info!("{}={}", name, String::from_utf8_lossy(value));
        }
    }
}

fn parse_query(
    query: &str,
    offset: usize,
    options: &ParseOptions,
) -> MetaResult<Vec<Assignment>> {
    QueryParser::new(*options)
        .parse(query)
        .map_err(|err| match err {
            MetaError::MalformedEscape { offset: at } => MetaError::MalformedEscape {
                offset: at + offset,
            },
            other => other,
        })
}

fn check_encodable(name: &str) -> MetaResult<()> {
    if name.contains(['&', '=']) {
        return Err(MetaError::InvalidArgument(format!(
            "property name {:?} contains a query delimiter",
            name
        )));
    }
    if reserved_field(name).is_some() {
        return Err(MetaError::InvalidArgument(format!(
            "property name {:?} is reserved for a stream field",
            name
        )));
    }
    Ok(())
}

fn decode_locator(text: &str, options: &ParseOptions) -> MetaResult<String> {
    let bytes = if options.strict_escapes {
        percent::decode_strict(text.as_bytes())?
    } else {
        percent::decode(text.as_bytes())
    };
    Ok(String::from_utf8(bytes)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned()))
}

impl Clone for MetaData {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            locator: self.locator.clone(),
            properties: self.properties.clone(),
            fields: self.fields.clone(),
            // Bytes::clone would share the buffer
            extra_data: Bytes::copy_from_slice(&self.extra_data),
            side_info: self.side_info.clone(),
            server_ips: self.server_ips.clone(),
            children: self.children.clone(),
        }
    }
}

impl PartialEq for MetaData {
    fn eq(&self, other: &Self) -> bool {
        self.locator == other.locator
            && self.properties == other.properties
            && self.fields == other.fields
            && self.extra_data == other.extra_data
            && self.side_info == other.side_info
            && self.server_ips == other.server_ips
            && self.children == other.children
    }
}

impl Default for MetaData {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl FromStr for MetaData {
    type Err = MetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.locator)?;
        for (name, value) in self.properties.iter() {
            writeln!(f, "{}={}", name, String::from_utf8_lossy(value))?;
        }
        Ok(())
    }
}
