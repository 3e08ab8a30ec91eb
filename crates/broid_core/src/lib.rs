// broid_core: deterministic request fingerprints (BrowserIDs) built from headers and cookies.
pub mod builder;
pub mod checksum;
pub mod config;
pub mod error;
pub mod field;
pub mod id;
pub mod request;

pub use builder::{BrowserIdBuilder, DEFAULT_HEADERS};
pub use checksum::fletcher8;
pub use config::{builder_from_json, load_builder, BuilderConfig, FieldKind, FieldSpec};
pub use error::{ConfigError, ParseIdError};
pub use field::{cookie_field, cookie_number_field, header_field, FieldFunc, SENTINEL};
pub use id::BrowserId;
pub use request::{find_cookie, Request, RequestParts};
