/// Raw source URIs of a fetch: either per file, or a flat list keyed by
/// each URI's basename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceUris {
    Mapped(Vec<(String, Vec<String>)>),
    Flat(Vec<String>),
}

impl SourceUris {
    pub fn mapped<F, U, I>(entries: impl IntoIterator<Item = (F, I)>) -> Self
    where
        F: Into<String>,
        U: Into<String>,
        I: IntoIterator<Item = U>,
    {
        SourceUris::Mapped(
            entries
                .into_iter()
                .map(|(file, uris)| (file.into(), uris.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }

    pub fn flat<U: Into<String>>(uris: impl IntoIterator<Item = U>) -> Self {
        SourceUris::Flat(uris.into_iter().map(Into::into).collect())
    }

    /// Per-file URI lists in first-seen file order. `None` stands for "no
    /// direct URI": a file declared without URIs, or an empty URI.
    pub fn normalize(&self) -> Vec<(String, Vec<Option<String>>)> {
        let mut files: Vec<(String, Vec<Option<String>>)> = Vec::new();
        let mut push = |file: &str, uri: Option<&str>| {
            let uri = uri.filter(|u| !u.is_empty()).map(str::to_string);
            match files.iter_mut().find(|(name, _)| name == file) {
                Some((_, uris)) => uris.push(uri),
                None => files.push((file.to_string(), vec![uri])),
            }
        };

        match self {
            SourceUris::Mapped(entries) => {
                for (file, uris) in entries {
                    if uris.is_empty() {
                        push(file, None);
                    }
                    for uri in uris {
                        push(file, Some(uri));
                    }
                }
            }
            SourceUris::Flat(uris) => {
                for uri in uris {
                    push(basename(uri), Some(uri));
                }
            }
        }
        files
    }
}

fn basename(uri: &str) -> &str { uri.rsplit('/').next().unwrap_or(uri) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_keyed_by_basename() {
        let uris = SourceUris::flat(["https://a/x/f.tar.gz", "ftp://b/f.tar.gz", "https://c/g.zip"]);
        assert_eq!(
            uris.normalize(),
            vec![
                (
                    "f.tar.gz".to_string(),
                    vec![
                        Some("https://a/x/f.tar.gz".to_string()),
                        Some("ftp://b/f.tar.gz".to_string())
                    ]
                ),
                ("g.zip".to_string(), vec![Some("https://c/g.zip".to_string())]),
            ]
        );
    }

    #[test]
    fn test_mapped_empty_list_and_empty_uri() {
        let uris = SourceUris::mapped([
            ("a.tar.gz", vec![]),
            ("b.tar.gz", vec!["", "mirror://gnu/b.tar.gz"]),
        ]);
        assert_eq!(
            uris.normalize(),
            vec![
                ("a.tar.gz".to_string(), vec![None]),
                (
                    "b.tar.gz".to_string(),
                    vec![None, Some("mirror://gnu/b.tar.gz".to_string())]
                ),
            ]
        );
    }
}
