//! Shared default values.

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default retention window for uploaded images (10 minutes).
pub const DEFAULT_TTL_SECS: u64 = 10 * 60;

/// Default maximum accepted upload size (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Slack added to the request body limit for multipart framing.
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Default upload directory, relative to the working directory.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Only MIME types starting with this prefix are accepted by default.
pub const DEFAULT_ALLOWED_MIME_PREFIX: &str = "image/";

/// Default configuration file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tempshot.toml";

/// Multipart field carrying the uploaded image.
pub const UPLOAD_FIELD: &str = "image";

/// Capacity of the eviction notification channel.
pub const EVICTION_CHANNEL_CAPACITY: usize = 256;

/// TTLs above this produce a configuration warning (24 hours).
pub const LONG_TTL_WARNING_SECS: u64 = 24 * 60 * 60;
