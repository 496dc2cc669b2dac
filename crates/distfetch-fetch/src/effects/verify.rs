use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use digest::Digest;
use distfetch_mirror::HashAlgo;
use distfetch_settings::DistDigests;
use tracing::debug;

use crate::error::{Error, Result};

/// Checks a file against its expected digests.
pub trait Verifier: Send + Sync {
    fn verify(&self, path: &Path, digests: &DistDigests) -> Result<()>;
}

/// Verifies the declared size and every SHA-2 and SHA-3 digest. Other
/// hash types are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestVerifier;

impl Verifier for DigestVerifier {
    fn verify(&self, path: &Path, digests: &DistDigests) -> Result<()> {
        let actual = std::fs::metadata(path).map_err(|e| Error::io(path, e))?.len();
        if let Some(expected) = digests.size {
            if actual != expected {
                return Err(Error::SizeMismatch { expected, actual });
            }
        }

        for (name, expected) in &digests.hashes {
            let Some(algo) = HashAlgo::from_name(name) else {
                debug!(hash = %name, "skipping unsupported hash");
                continue;
            };
            let actual = file_digest(algo, path).map_err(|e| Error::io(path, e))?;
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(Error::ChecksumMismatch {
                    algo: name.clone(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }
        Ok(())
    }
}

fn file_digest(algo: HashAlgo, path: &Path) -> io::Result<String> {
    match algo {
        HashAlgo::Sha256 => hash_file::<sha2::Sha256>(path),
        HashAlgo::Sha512 => hash_file::<sha2::Sha512>(path),
        HashAlgo::Sha3_256 => hash_file::<sha3::Sha3_256>(path),
        HashAlgo::Sha3_512 => hash_file::<sha3::Sha3_512>(path),
    }
}

fn hash_file<D: Digest>(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = D::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_verify_size_and_sha256() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f");
        std::fs::write(&path, b"hello world").unwrap();

        let digests = DistDigests::new()
            .size(11)
            .hash("SHA256", HELLO_SHA256.to_uppercase())
            .hash("BLAKE2B", "not-checked");
        assert!(DigestVerifier.verify(&path, &digests).is_ok());
    }

    #[test]
    fn test_verify_size_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f");
        std::fs::write(&path, b"hello").unwrap();

        let err = DigestVerifier
            .verify(&path, &DistDigests::new().size(11))
            .unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { expected: 11, actual: 5 }));
        assert!(err.is_checksum_failure());
    }

    #[test]
    fn test_verify_checksum_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f");
        std::fs::write(&path, b"hello world!").unwrap();

        let err = DigestVerifier
            .verify(&path, &DistDigests::new().hash("SHA256", HELLO_SHA256))
            .unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch { ref algo, .. } if algo == "SHA256"));
    }

    #[test]
    fn test_verify_missing_file() {
        let dir = tempdir().unwrap();
        let err = DigestVerifier
            .verify(&dir.path().join("absent"), &DistDigests::new())
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
