//! Checksums of generated DDL

use sha2::{Digest, Sha256};

/// Compute the SHA-256 checksum of a DDL statement as lowercase hex
pub fn compute_checksum(ddl: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ddl.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_checksum() {
        let checksum = compute_checksum("CREATE TABLE parent (id INTEGER)");
        assert_eq!(checksum.len(), 64);
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_checksum_tracks_content() {
        assert_eq!(compute_checksum("a"), compute_checksum("a"));
        assert_ne!(compute_checksum("a"), compute_checksum("b"));
    }
}
