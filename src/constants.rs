//! Global constants for notecheck
//!
//! Centralized location for application-wide constants

/// Status values the note format allows
pub const ALLOWED_STATUSES: &[&str] = &["", "Started", "Urgent"];

/// Timestamp format for the `last_touched` field of a note
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// PBKDF2-HMAC-SHA256 iteration count used by the profile format
pub const KDF_ROUNDS: u32 = 2056;

/// AES-256 key size in bytes
pub const KEY_LEN: usize = 32;

/// AES block size in bytes; also the size of the IV prepended to ciphertext
pub const BLOCK_LEN: usize = 16;

/// ANSI escape that switches terminal output to bright red
pub const ANSI_RED: &str = "\x1b[91m";

/// ANSI escape that resets terminal colors
pub const ANSI_RESET: &str = "\x1b[0m";
