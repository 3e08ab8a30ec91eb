// field.rs: field extractors, each producing one byte of a BrowserID
use crate::checksum::fletcher8;
use crate::request::Request;

/// Byte emitted when a field is missing or cannot be parsed.
pub const SENTINEL: u8 = 255;

/// Computes a single BrowserID field from a request.
pub type FieldFunc = Box<dyn Fn(&dyn Request) -> u8 + Send + Sync>;

/// Checksum of the header `key`, or [`SENTINEL`] when absent or empty.
pub fn header_field(key: impl Into<String>) -> FieldFunc {
    let key = key.into();
    Box::new(move |req: &dyn Request| match req.header(&key) {
        Some(val) if !val.is_empty() => fletcher8(val),
        _ => SENTINEL,
    })
}

/// Checksum of the cookie `key`, or [`SENTINEL`] when absent.
pub fn cookie_field(key: impl Into<String>) -> FieldFunc {
    let key = key.into();
    Box::new(move |req: &dyn Request| match req.cookie(&key) {
        Some(val) => fletcher8(&val),
        None => SENTINEL,
    })
}

/// A base-10 `i64` stored in the cookie `key`, reduced modulo 255.
///
/// Absent or unparseable cookies yield [`SENTINEL`]. Negative remainders wrap
/// when narrowed to a byte.
pub fn cookie_number_field(key: impl Into<String>) -> FieldFunc {
    let key = key.into();
    Box::new(move |req: &dyn Request| {
        req.cookie(&key)
            .and_then(|val| val.parse::<i64>().ok())
            .map(|n| (n % 255) as u8)
            .unwrap_or(SENTINEL)
    })
}
