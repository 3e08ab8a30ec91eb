// builder.rs: ordered field list evaluated against a request
use tracing::trace;

use crate::field::{header_field, FieldFunc};
use crate::id::BrowserId;
use crate::request::Request;

/// Headers used by the default builder, in field order.
pub const DEFAULT_HEADERS: [&str; 4] =
    ["User-Agent", "Accept", "Accept-Encoding", "Accept-Language"];

/// Computes BrowserIDs from an ordered list of field functions.
///
/// Mutate with [`add_field`](Self::add_field) before sharing; `build` only
/// reads the field list and is safe to call from many threads.
pub struct BrowserIdBuilder {
    fields: Vec<FieldFunc>,
}

impl BrowserIdBuilder {
    /// An empty builder; every id it builds is zero-length until fields are added.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder over the "User-Agent", "Accept", "Accept-Encoding" and
    /// "Accept-Language" headers.
    pub fn with_default_fields() -> Self {
        let mut b = Self::new();
        for h in DEFAULT_HEADERS {
            b.add_field(header_field(h));
        }
        b
    }

    pub fn add_field(&mut self, f: FieldFunc) {
        self.fields.push(f);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn build(&self, req: &dyn Request) -> BrowserId {
        let id: BrowserId = self.fields.iter().map(|f| f(req)).collect::<Vec<u8>>().into();
        trace!(fields = self.fields.len(), id = %id, "built browser id");
        id
    }
}

impl Default for BrowserIdBuilder {
    fn default() -> Self {
        Self::with_default_fields()
    }
}

impl std::fmt::Debug for BrowserIdBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserIdBuilder").field("fields", &self.fields.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{cookie_field, cookie_number_field};
    use crate::request::RequestParts;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_build_default() {
        let b = BrowserIdBuilder::with_default_fields();
        assert_eq!(b.len(), 4);

        let mut req = RequestParts::new();
        assert_eq!(b.build(&req).to_string(), "ffffffff");

        req.set_header("Accept", "aaa");
        req.set_header("User-Agent", "uuu");
        let v1 = b.build(&req).to_string();
        req.set_header("Accept", "bbb");
        req.set_header("User-Agent", "user-agent");
        let v2 = b.build(&req).to_string();
        assert_ne!(v1, v2);
        assert_eq!(&v2[4..], "ffff");
    }

    #[test]
    fn test_build_is_deterministic() {
        let b = BrowserIdBuilder::default();
        let req: RequestParts = vec![
            ("User-Agent", "Mozilla/5.0"),
            ("Accept", "text/html"),
            ("Accept-Encoding", "gzip, br"),
            ("Accept-Language", "en-US"),
        ]
        .into_iter()
        .collect();
        assert_eq!(b.build(&req), b.build(&req));
    }

    #[test]
    fn test_empty_builder_and_custom_fields() {
        let mut b = BrowserIdBuilder::new();
        assert!(b.is_empty());
        assert!(b.build(&RequestParts::new()).is_empty());

        b.add_field(cookie_field("sid"));
        b.add_field(cookie_number_field("tz"));
        b.add_field(cookie_number_field("tz"));
        b.add_field(Box::new(|_: &dyn Request| 7u8));

        let mut req = RequestParts::new();
        req.set_header("Cookie", "tz=123456");
        let id = b.build(&req);
        assert_eq!(id.as_bytes(), &[255, 36, 36, 7]);
    }

    #[test]
    fn test_build_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BrowserIdBuilder>();

        let b = Arc::new(BrowserIdBuilder::default());
        let req: RequestParts =
            vec![("User-Agent", "Mozilla/5.0"), ("Accept-Language", "en-US")].into_iter().collect();
        let req = Arc::new(req);
        let expected = b.build(&*req);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let b = Arc::clone(&b);
                let req = Arc::clone(&req);
                thread::spawn(move || b.build(&*req))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    }
}
