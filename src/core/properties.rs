//! Free-form property store
//!
//! Properties are named byte strings. Text, numbers and booleans are all
//! stored in their textual form; struct properties hold a raw payload of a
//! fixed size.

use crate::core::error::{MetaError, MetaResult};
use crate::types::value::PropertyValue;
use std::collections::BTreeMap;

/// Mapping from property name to stored value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl PropertyStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a property as text
    ///
    /// Fails with [`MetaError::InvalidArgument`] for an empty key,
    /// [`MetaError::NotFound`] if the key is absent and
    /// [`MetaError::ParseError`] if the stored bytes are not UTF-8.
    pub fn get(&self, key: &str) -> MetaResult<&str> {
        let bytes = self.get_bytes(key)?;
        std::str::from_utf8(bytes).map_err(|_| MetaError::ParseError {
            key: key.to_string(),
            value: String::from_utf8_lossy(bytes).into_owned(),
        })
    }

    /// Get the raw bytes of a property
    pub fn get_bytes(&self, key: &str) -> MetaResult<&[u8]> {
        check_key(key)?;
        self.entries
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| MetaError::NotFound(key.to_string()))
    }

    /// Set a text property, replacing any previous value
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> MetaResult<()> {
        self.set_bytes(key, value.into().into_bytes())
    }

    /// Set a property from raw bytes
    pub fn set_bytes(&mut self, key: &str, value: impl Into<Vec<u8>>) -> MetaResult<()> {
        check_key(key)?;
        self.entries.insert(key.to_string(), value.into());
        Ok(())
    }

    pub(crate) fn insert_decoded(&mut self, key: String, value: Vec<u8>) {
        self.entries.insert(key, value);
    }

    /// Remove a property
    pub fn remove(&mut self, key: &str) -> MetaResult<()> {
        check_key(key)?;
        self.entries
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| MetaError::NotFound(key.to_string()))
    }

    /// Remove all properties
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace every entry with the entries of `other`
    pub fn copy_from(&mut self, other: &PropertyStore) {
        self.entries.clone_from(&other.entries);
    }

    /// Insert or overwrite the entries of `other`, keeping the rest
    pub fn merge_from(&mut self, other: &PropertyStore) {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Check if a property exists
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_slice()))
    }

    /// All names and values as two parallel sequences
    pub fn list(&self) -> (Vec<&str>, Vec<&[u8]>) {
        self.iter().unzip()
    }

    /// Store a typed value in its textual form
    pub fn set_typed<T: PropertyValue>(&mut self, key: &str, value: T) -> MetaResult<()> {
        self.set(key, value.to_property())
    }

    /// Read a typed value back
    ///
    /// # Example
    ///
    /// ```rust
    /// use mediameta::{MetaError, PropertyStore};
    ///
    /// let mut props = PropertyStore::new();
    /// props.set_typed("Latency", 250u32).unwrap();
    /// props.set("Label", "main").unwrap();
    ///
    /// assert_eq!(props.get_typed::<u32>("Latency"), Ok(250));
    /// assert!(matches!(props.get_typed::<u32>("Label"), Err(MetaError::ParseError { .. })));
    /// assert!(matches!(props.get_typed::<u32>("Missing"), Err(MetaError::NotFound(_))));
    /// ```
    pub fn get_typed<T: PropertyValue>(&self, key: &str) -> MetaResult<T> {
        let text = self.get(key)?;
        T::from_property(text).ok_or_else(|| MetaError::ParseError {
            key: key.to_string(),
            value: text.to_string(),
        })
    }

    /// Store a fixed-size binary payload
    pub fn set_struct(&mut self, key: &str, payload: &[u8]) -> MetaResult<()> {
        self.set_bytes(key, payload)
    }

    /// Read a binary payload of exactly `N` bytes
    pub fn get_struct<const N: usize>(&self, key: &str) -> MetaResult<[u8; N]> {
        let bytes = self.get_bytes(key)?;
        bytes.try_into().map_err(|_| MetaError::SizeMismatch {
            key: key.to_string(),
            expected: N,
            actual: bytes.len(),
        })
    }
}

fn check_key(key: &str) -> MetaResult<()> {
    if key.is_empty() {
        return Err(MetaError::InvalidArgument(
            "property name must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut props = PropertyStore::new();
        props.set("Codec", "h264").unwrap();
        assert_eq!(props.get("Codec"), Ok("h264"));
        assert_eq!(props.len(), 1);

        props.remove("Codec").unwrap();
        assert!(props.is_empty());
        assert_eq!(
            props.remove("Codec"),
            Err(MetaError::NotFound("Codec".to_string()))
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut props = PropertyStore::new();
        assert!(matches!(
            props.set("", "x"),
            Err(MetaError::InvalidArgument(_))
        ));
        assert!(matches!(props.get(""), Err(MetaError::InvalidArgument(_))));
        assert!(matches!(
            props.get_bytes(""),
            Err(MetaError::InvalidArgument(_))
        ));
        assert!(matches!(props.remove(""), Err(MetaError::InvalidArgument(_))));
    }

    #[test]
    fn test_non_utf8_value() {
        let mut props = PropertyStore::new();
        props.set_bytes("Blob", vec![0xff, 0xfe]).unwrap();
        assert_eq!(props.get_bytes("Blob"), Ok(&[0xff, 0xfe][..]));
        assert!(matches!(props.get("Blob"), Err(MetaError::ParseError { .. })));
    }

    #[test]
    fn test_typed_values() {
        let mut props = PropertyStore::new();
        props.set_typed("Frames", -12i64).unwrap();
        props.set_typed("Gain", 0.25f64).unwrap();
        props.set_typed("Muted", true).unwrap();
        props.set_typed("Port", 1935u16).unwrap();

        assert_eq!(props.get("Gain"), Ok("0.250000"));
        assert_eq!(props.get("Muted"), Ok("1"));
        assert_eq!(props.get_typed::<i64>("Frames"), Ok(-12));
        assert_eq!(props.get_typed::<f64>("Gain"), Ok(0.25));
        assert_eq!(props.get_typed::<bool>("Muted"), Ok(true));
        assert_eq!(props.get_typed::<u16>("Port"), Ok(1935));
        assert!(matches!(
            props.get_typed::<u8>("Port"),
            Err(MetaError::ParseError { .. })
        ));
    }

    #[test]
    fn test_struct_property() {
        let mut props = PropertyStore::new();
        let rect: [u8; 8] = [0, 0, 0, 0, 0x80, 0x07, 0x38, 0x04];
        props.set_struct("Crop", &rect).unwrap();

        assert_eq!(props.get_struct::<8>("Crop"), Ok(rect));
        assert_eq!(
            props.get_struct::<4>("Crop"),
            Err(MetaError::SizeMismatch {
                key: "Crop".to_string(),
                expected: 4,
                actual: 8,
            })
        );
    }

    #[test]
    fn test_copy_and_merge() {
        let mut a = PropertyStore::new();
        a.set("Keep", "a").unwrap();
        a.set("Shared", "a").unwrap();

        let mut b = PropertyStore::new();
        b.set("Shared", "b").unwrap();
        b.set("New", "b").unwrap();

        let mut merged = a.clone();
        merged.merge_from(&b);
        assert_eq!(merged.get("Keep"), Ok("a"));
        assert_eq!(merged.get("Shared"), Ok("b"));
        assert_eq!(merged.get("New"), Ok("b"));

        let mut copied = a.clone();
        copied.copy_from(&b);
        assert_eq!(copied, b);
        assert!(!copied.contains("Keep"));
    }

    #[test]
    fn test_list_is_parallel() {
        let mut props = PropertyStore::new();
        props.set("b", "2").unwrap();
        props.set("a", "1").unwrap();

        let (names, values) = props.list();
        assert_eq!(names.len(), values.len());
        for (name, value) in names.iter().zip(values) {
            assert_eq!(props.get_bytes(name), Ok(value));
        }
    }
}
