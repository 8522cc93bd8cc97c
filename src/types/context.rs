//! Opaque caller context

/// An opaque token supplied by the caller and carried along with a node
///
/// The crate never interprets the value. Copies of a node copy the token,
/// so every copy refers to the same caller-side object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextHandle(usize);

impl ContextHandle {
    /// Wrap a raw token
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Use the address of a caller-owned object as the token
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as usize)
    }

    /// The raw token
    pub const fn as_raw(self) -> usize {
        self.0
    }
}
