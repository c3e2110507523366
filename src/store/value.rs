//! Store Value Module
//!
//! Tagged values written to a key-value store and the typed decoding used to
//! read them back.

use std::fmt;

// == Store Value ==
/// A value that can be written to a key-value store.
///
/// Every variant is encoded to bytes the way Redis stores it: integers and
/// floats become their decimal text.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Str(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
}

impl StoreValue {
    /// Returns the byte encoding stored for this value.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            StoreValue::Bytes(bytes) => bytes.clone(),
            other => other.to_string().into_bytes(),
        }
    }

    /// Consumes the value, returning its byte encoding.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            StoreValue::Str(s) => s.into_bytes(),
            StoreValue::Bytes(bytes) => bytes,
            other => other.to_string().into_bytes(),
        }
    }
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreValue::Str(s) => f.write_str(s),
            StoreValue::Bytes(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            StoreValue::Int(n) => write!(f, "{}", n),
            // Debug keeps the fractional part on whole numbers ("3.0")
            StoreValue::Float(x) => write!(f, "{:?}", x),
        }
    }
}

impl From<&str> for StoreValue {
    fn from(value: &str) -> Self {
        StoreValue::Str(value.to_string())
    }
}

impl From<String> for StoreValue {
    fn from(value: String) -> Self {
        StoreValue::Str(value)
    }
}

impl From<Vec<u8>> for StoreValue {
    fn from(value: Vec<u8>) -> Self {
        StoreValue::Bytes(value)
    }
}

impl From<&[u8]> for StoreValue {
    fn from(value: &[u8]) -> Self {
        StoreValue::Bytes(value.to_vec())
    }
}

impl From<i64> for StoreValue {
    fn from(value: i64) -> Self {
        StoreValue::Int(value)
    }
}

impl From<i32> for StoreValue {
    fn from(value: i32) -> Self {
        StoreValue::Int(value.into())
    }
}

impl From<f64> for StoreValue {
    fn from(value: f64) -> Self {
        StoreValue::Float(value)
    }
}

// == Typed Decoding ==
/// Types that a stored byte string can be read back as.
///
/// The caller picks the type at the call site, e.g. `store.get_as::<i64>(key)`.
pub trait FromStoreValue: Sized + Send + 'static {
    /// Human-readable name used in decode errors.
    const EXPECTED: &'static str;

    /// Decodes stored bytes, returning `None` when they do not fit the type.
    fn from_store_bytes(bytes: &[u8]) -> Option<Self>;
}

impl FromStoreValue for Vec<u8> {
    const EXPECTED: &'static str = "bytes";

    fn from_store_bytes(bytes: &[u8]) -> Option<Self> {
        Some(bytes.to_vec())
    }
}

impl FromStoreValue for String {
    const EXPECTED: &'static str = "UTF-8 string";

    fn from_store_bytes(bytes: &[u8]) -> Option<Self> {
        String::from_utf8(bytes.to_vec()).ok()
    }
}

impl FromStoreValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_store_bytes(bytes: &[u8]) -> Option<Self> {
        std::str::from_utf8(bytes).ok()?.parse().ok()
    }
}

impl FromStoreValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_store_bytes(bytes: &[u8]) -> Option<Self> {
        std::str::from_utf8(bytes).ok()?.parse().ok()
    }
}
