//! Pure policy: value parsing, checksum filtering and backoff.

mod hash_filter;
mod retry;
mod size;

pub use hash_filter::{HashFilter, KNOWN_HASHES, apply_hash_filter};
pub use retry::retry_delay;
pub use size::{DEFAULT_RESUME_SIZE, DEFAULT_RESUME_SIZE_TEXT, parse_resume_size};
