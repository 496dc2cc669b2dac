//! Mirror directory layouts as advertised by a mirror's `layout.conf`.
//!
//! ```ini
//! [structure]
//! 0=filename-hash SHA512 8
//! 1=flat
//! ```
//!
//! Entries are tried in key order; the first one this crate supports wins.

use std::fs;
use std::path::Path;

use digest::Digest;
use ini::Ini;

use crate::error::{Error, Result};

const STRUCTURE_SECTION: &str = "structure";

/// Hash algorithms usable for `filename-hash` layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgo {
    Sha256,
    Sha512,
    Sha3_256,
    Sha3_512,
}

impl HashAlgo {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SHA256" => Some(Self::Sha256),
            "SHA512" => Some(Self::Sha512),
            "SHA3_256" => Some(Self::Sha3_256),
            "SHA3_512" => Some(Self::Sha3_512),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
            Self::Sha3_256 => "SHA3_256",
            Self::Sha3_512 => "SHA3_512",
        }
    }

    pub fn hex_digest(self, data: &[u8]) -> String {
        match self {
            Self::Sha256 => hex_digest::<sha2::Sha256>(data),
            Self::Sha512 => hex_digest::<sha2::Sha512>(data),
            Self::Sha3_256 => hex_digest::<sha3::Sha3_256>(data),
            Self::Sha3_512 => hex_digest::<sha3::Sha3_512>(data),
        }
    }
}

fn hex_digest<D: Digest>(data: &[u8]) -> String { hex::encode(D::digest(data)) }

/// Where a file lives below a mirror's distfiles root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Flat,
    FilenameHash { algo: HashAlgo, cutoffs: Vec<usize> },
}

impl Layout {
    /// Relative path of `filename` under this layout.
    ///
    /// For `filename-hash`, each cutoff (in bits) consumes the next
    /// `cutoff / 4` hex characters of the filename digest as a directory.
    pub fn path_for(&self, filename: &str) -> String {
        match self {
            Layout::Flat => filename.to_string(),
            Layout::FilenameHash { algo, cutoffs } => {
                let digest = algo.hex_digest(filename.as_bytes());
                let mut rest = digest.as_str();
                let mut path = String::new();
                for cutoff in cutoffs {
                    let take = (cutoff / 4).min(rest.len());
                    let (head, tail) = rest.split_at(take);
                    path.push_str(head);
                    path.push('/');
                    rest = tail;
                }
                path.push_str(filename);
                path
            }
        }
    }
}

/// The ordered `[structure]` entries of a mirror's `layout.conf`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorLayoutConfig {
    structure: Vec<Vec<String>>,
}

impl MirrorLayoutConfig {
    pub fn new() -> Self { Self::default() }

    pub fn from_structure<I, E, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            structure: entries
                .into_iter()
                .map(|e| e.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let ini = Ini::load_from_str(text)?;
        let mut structure = Vec::new();
        if let Some(section) = ini.section(Some(STRUCTURE_SECTION)) {
            for index in 0.. {
                let Some(value) = section.get(index.to_string()) else {
                    break;
                };
                structure.push(value.split_whitespace().map(str::to_string).collect());
            }
        }
        Ok(Self { structure })
    }

    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn structure(&self) -> &[Vec<String>] { &self.structure }

    /// Turn one structure entry into a layout, if it is well formed and
    /// supported.
    pub fn validate_structure(entry: &[String]) -> Option<Layout> {
        match entry {
            [kind] if kind == "flat" => Some(Layout::Flat),
            [kind, algo, cutoffs] if kind == "filename-hash" => {
                let algo = HashAlgo::from_name(algo)?;
                let cutoffs = cutoffs
                    .split(':')
                    .map(|c| c.parse::<usize>().ok().filter(|c| *c > 0 && c % 4 == 0))
                    .collect::<Option<Vec<_>>>()?;
                Some(Layout::FilenameHash { algo, cutoffs })
            }
            _ => None,
        }
    }

    pub fn best_supported_layout(&self) -> Layout {
        self.structure
            .iter()
            .find_map(|entry| Self::validate_structure(entry))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tokens: &[&str]) -> Vec<String> { tokens.iter().map(|s| s.to_string()).collect() }

    #[test]
    fn test_parse_structure_until_gap() {
        let conf = MirrorLayoutConfig::parse(
            "[structure]\n0=filename-hash SHA512 8\n1=flat\n3=ignored\n",
        )
        .unwrap();
        assert_eq!(
            conf.structure(),
            &[entry(&["filename-hash", "SHA512", "8"]), entry(&["flat"])]
        );
    }

    #[test]
    fn test_parse_without_structure_section() {
        let conf = MirrorLayoutConfig::parse("[other]\nkey=value\n").unwrap();
        assert!(conf.structure().is_empty());
        assert_eq!(conf.best_supported_layout(), Layout::Flat);
    }

    #[test]
    fn test_validate_structure() {
        assert_eq!(
            MirrorLayoutConfig::validate_structure(&entry(&["flat"])),
            Some(Layout::Flat)
        );
        assert_eq!(
            MirrorLayoutConfig::validate_structure(&entry(&["flat", "extra"])),
            None
        );
        assert_eq!(
            MirrorLayoutConfig::validate_structure(&entry(&["filename-hash", "SHA256", "8:16"])),
            Some(Layout::FilenameHash {
                algo:    HashAlgo::Sha256,
                cutoffs: vec![8, 16],
            })
        );
        assert_eq!(
            MirrorLayoutConfig::validate_structure(&entry(&["filename-hash", "SHA256", "6"])),
            None
        );
        assert_eq!(
            MirrorLayoutConfig::validate_structure(&entry(&["filename-hash", "MD4", "8"])),
            None
        );
        assert_eq!(
            MirrorLayoutConfig::validate_structure(&entry(&["content-hash", "SHA512", "8"])),
            None
        );
    }

    #[test]
    fn test_best_supported_skips_unsupported_algorithms() {
        let conf = MirrorLayoutConfig::from_structure([
            vec!["filename-hash", "BLAKE2B", "8"],
            vec!["flat"],
        ]);
        assert_eq!(conf.best_supported_layout(), Layout::Flat);
    }

    #[test]
    fn test_filename_hash_path() {
        let layout = Layout::FilenameHash {
            algo:    HashAlgo::Sha256,
            cutoffs: vec![8, 4],
        };
        let digest = HashAlgo::Sha256.hex_digest(b"foo.tar.gz");
        let expected = format!("{}/{}/foo.tar.gz", &digest[..2], &digest[2..3]);
        assert_eq!(layout.path_for("foo.tar.gz"), expected);
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            HashAlgo::Sha256.hex_digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_flat_path() {
        assert_eq!(Layout::Flat.path_for("a.tar.xz"), "a.tar.xz");
    }
}
