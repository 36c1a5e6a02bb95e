//! Keys written under a record's `extra` mapping.

pub const SITE_ID: &str = "siteid";
pub const SITE_NAME: &str = "sitename";
pub const USER_ID: &str = "userid";
pub const USER_NAME: &str = "username";
pub const IP: &str = "ip";

/// Name of the sub-mapping holding contextual metadata.
pub const EXTRA: &str = "extra";

/// Address used when no client address can be resolved.
pub const LOOPBACK_IP: &str = "127.0.0.1";
