//! Custom mirror definitions (`etc/portage/mirrors`).
//!
//! Each non-comment line reads `name url [url ...]`. The path may also be a
//! directory, in which case every file below it is read in sorted order and
//! later definitions of a name replace earlier ones.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::settings::MirrorGroups;

/// Location of the custom mirrors file relative to the config root.
pub const CUSTOM_MIRRORS_FILE: &str = "etc/portage/mirrors";

pub fn custom_mirrors_path(config_root: impl AsRef<Path>) -> PathBuf {
    config_root.as_ref().join(CUSTOM_MIRRORS_FILE)
}

/// Load the custom mirror table below `config_root`. A missing file is an
/// empty table.
pub fn load_custom_mirrors(config_root: impl AsRef<Path>) -> Result<MirrorGroups> {
    let mut groups = MirrorGroups::new();
    grab_dict(&custom_mirrors_path(config_root), &mut groups)?;
    Ok(groups)
}

/// Merge every definition found at `path` into `groups`.
pub fn grab_dict(path: &Path, groups: &mut MirrorGroups) -> Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(Error::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if metadata.is_dir() {
        for child in sorted_children(path)? {
            grab_dict(&child, groups)?;
        }
        return Ok(());
    }

    let text = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "reading mirror definitions");
    parse_dict(&text, groups);
    Ok(())
}

/// Parse `name url ...` lines. Lines with a name but no URL are skipped.
pub fn parse_dict(text: &str, groups: &mut MirrorGroups) {
    for line in text.lines() {
        let line = match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        };
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            continue;
        };
        let urls: Vec<String> = tokens.map(str::to_string).collect();
        if urls.is_empty() {
            continue;
        }
        groups.insert(name.to_string(), urls);
    }
}

fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_err = |source| Error::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if is_ignored(&name) {
            continue;
        }
        children.push(entry.path());
    }
    children.sort();
    Ok(children)
}

fn is_ignored(name: &str) -> bool { name.starts_with('.') || name.ends_with('~') || name == "CVS" }

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_dict_basic() {
        let mut groups = MirrorGroups::new();
        parse_dict(
            "# comment\n\ngnu https://a/gnu https://b/gnu  # trailing\nlocal /srv/mirror\n",
            &mut groups,
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["gnu"], vec!["https://a/gnu", "https://b/gnu"]);
        assert_eq!(groups["local"], vec!["/srv/mirror"]);
    }

    #[test]
    fn test_parse_dict_skips_names_without_urls() {
        let mut groups = MirrorGroups::new();
        parse_dict("lonely\n", &mut groups);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_later_definition_replaces() {
        let mut groups = MirrorGroups::new();
        parse_dict("gnu https://a\ngnu https://b\n", &mut groups);
        assert_eq!(groups["gnu"], vec!["https://b"]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let groups = load_custom_mirrors(dir.path()).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_load_single_file() {
        let dir = tempdir().unwrap();
        let path = custom_mirrors_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "local http://lan/distfiles\n").unwrap();

        let groups = load_custom_mirrors(dir.path()).unwrap();
        assert_eq!(groups["local"], vec!["http://lan/distfiles"]);
    }

    #[test]
    fn test_load_directory_in_sorted_order() {
        let dir = tempdir().unwrap();
        let path = custom_mirrors_path(dir.path());
        fs::create_dir_all(path.join("nested")).unwrap();
        fs::write(path.join("10-base"), "gnu https://first\nlocal /srv\n").unwrap();
        fs::write(path.join("20-override"), "gnu https://second\n").unwrap();
        fs::write(path.join("nested").join("x"), "kde https://kde\n").unwrap();
        fs::write(path.join("30-backup~"), "gnu https://ignored\n").unwrap();
        fs::write(path.join(".hidden"), "gnu https://hidden\n").unwrap();

        let groups = load_custom_mirrors(dir.path()).unwrap();
        assert_eq!(groups["gnu"], vec!["https://second"]);
        assert_eq!(groups["local"], vec!["/srv"]);
        assert_eq!(groups["kde"], vec!["https://kde"]);
    }
}
