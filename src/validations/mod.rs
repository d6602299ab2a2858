mod link;

pub use link::{resolve_ttl, validate_long_url};
