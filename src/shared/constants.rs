/// Length of a share code, taken from the head of a random UUID
pub const SHORT_CODE_LEN: usize = 8;

/// Attempts to allocate a unique share code before giving up
pub const SHORT_CODE_MAX_ATTEMPTS: u32 = 4;

/// Maximum upload size in bytes (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
