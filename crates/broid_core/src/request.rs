// request.rs: request view consumed by field extractors, plus an owned implementation
use memchr::memchr_iter;
use std::collections::HashMap;

/// Read-only view of the parts of an HTTP request a fingerprint is built from.
pub trait Request {
    /// First value of the header `name`, compared case-insensitively.
    fn header(&self, name: &str) -> Option<&str>;

    /// Value of the cookie `name`, compared case-sensitively.
    fn cookie(&self, name: &str) -> Option<String>;
}

/// Owned header set with cookie lookup over the `Cookie` header(s).
#[derive(Debug, Clone, Default)]
pub struct RequestParts {
    headers: HashMap<String, Vec<String>>, // key: lowercased header name
}

impl RequestParts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to the header `name`.
    pub fn insert_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.entry(name.to_ascii_lowercase()).or_default().push(value.into());
    }

    /// Replace every value of the header `name`.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), vec![value.into()]);
    }

    pub fn header_values(&self, name: &str) -> &[String] {
        self.headers.get(&name.to_ascii_lowercase()).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RequestParts {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut parts = RequestParts::new();
        for (k, v) in iter {
            parts.insert_header(k.as_ref(), v);
        }
        parts
    }
}

impl Request for RequestParts {
    fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name).first().map(String::as_str)
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.header_values("Cookie")
            .iter()
            .find_map(|line| find_cookie(line, name))
            .map(str::to_string)
    }
}

/// Find the cookie `name` in a single `Cookie` header value.
///
/// Pairs are `;`-separated. A value wrapped in double quotes is unwrapped;
/// values with bytes outside the cookie-octet range are skipped.
pub fn find_cookie<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let bytes = line.as_bytes();
    let mut start = 0usize;
    let ends = memchr_iter(b';', bytes).chain(std::iter::once(bytes.len()));
    for end in ends {
        let pair = line[start..end].trim();
        start = end + 1;
        if pair.is_empty() {
            continue;
        }
        // a bare name is a cookie with an empty value
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        if k.trim_end() != name {
            continue;
        }
        if let Some(val) = cookie_value(v) {
            return Some(val);
        }
    }
    None
}

fn cookie_value(raw: &str) -> Option<&str> {
    let val = match raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner,
        None => raw,
    };
    val.bytes().all(valid_cookie_byte).then_some(val)
}

fn valid_cookie_byte(b: u8) -> bool {
    (0x20..0x7f).contains(&b) && b != b'"' && b != b';' && b != b'\\'
}
