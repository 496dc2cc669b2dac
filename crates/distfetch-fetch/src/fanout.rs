//! Expansion of raw source URIs into per-file candidate lists.

use std::collections::{HashMap, HashSet};

use distfetch_mirror::MirrorUrl;
use tracing::debug;

use crate::data::{Candidate, DistfileName, FileMap};
use crate::error::{Error, Result};
use crate::params::FetchParams;
use crate::plan::{FetchPlan, FileCandidates};

const MIRROR_SCHEME: &str = "mirror://";

/// Builds candidate lists for one fetch invocation.
///
/// Files keep the order in which they were first seen. Direct URIs of
/// restricted fetches are held back in a separate primary list, and URIs
/// expanded from third-party mirror groups are tracked per file.
#[derive(Debug)]
pub struct UriFanOut<'p, 's> {
    params:                &'p FetchParams<'s>,
    filedict:              FileMap<Vec<Candidate>>,
    primaryuri_dict:       FileMap<Vec<String>>,
    thirdpartymirror_uris: FileMap<Vec<String>>,
    thirdparty_seen:       HashMap<String, HashSet<String>>,
}

impl<'p, 's> UriFanOut<'p, 's> {
    pub fn new(params: &'p FetchParams<'s>) -> Self {
        Self {
            params,
            filedict: FileMap::new(),
            primaryuri_dict: FileMap::new(),
            thirdpartymirror_uris: FileMap::new(),
            thirdparty_seen: HashMap::new(),
        }
    }

    pub fn filedict(&self) -> &FileMap<Vec<Candidate>> { &self.filedict }

    pub fn primaryuri_dict(&self) -> &FileMap<Vec<String>> { &self.primaryuri_dict }

    pub fn thirdpartymirror_uris(&self) -> &FileMap<Vec<String>> { &self.thirdpartymirror_uris }

    /// Seed `file` with the generic mirrors, once. A file that already has
    /// an entry, even an empty one, is left alone.
    ///
    /// Local mirrors are always used. Public mirrors are added when the
    /// package restricts both fetch and mirror, or when `override_mirror`
    /// is set.
    pub fn ensure_generic_mirrors(&mut self, file: &DistfileName, override_mirror: bool) -> Result<()> {
        if self.filedict.contains(file.as_str()) {
            return Ok(());
        }

        let params = self.params;
        let mut bases: Vec<&str> = params.local_mirrors()?.iter().map(String::as_str).collect();
        if (params.restrict_fetch() && params.restrict_mirror()) || override_mirror {
            bases.extend(params.public_mirrors()?.iter().map(String::as_str));
        }

        let cache = params.mirror_cache();
        let candidates = self.filedict.entry_or_insert_with(file, Vec::new);
        candidates.extend(bases.into_iter().map(|base| {
            Candidate::Mirror(MirrorUrl::new(base, file.as_str(), cache.clone()))
        }));
        debug!(file = %file, candidates = candidates.len(), "seeded generic mirrors");
        Ok(())
    }

    /// Classify one raw URI of `file`. `None` adds nothing.
    pub fn add_uri(&mut self, file: &DistfileName, uri: Option<&str>) -> Result<()> {
        self.filedict.entry_or_insert_with(file, Vec::new);
        let Some(uri) = uri.filter(|u| !u.is_empty()) else {
            return Ok(());
        };

        match uri.strip_prefix(MIRROR_SCHEME) {
            Some(rest) => self.add_mirror_uri(file, uri, rest),
            None => {
                self.add_direct_uri(file, uri);
                Ok(())
            }
        }
    }

    fn add_mirror_uri(&mut self, file: &DistfileName, uri: &str, rest: &str) -> Result<()> {
        let params = self.params;
        let Some((name, path)) = rest.split_once('/') else {
            return Err(Error::InvalidMirrorUri(uri.to_string()));
        };

        if let Some(bases) = params.custommirrors()?.get(name) {
            let expanded: Vec<Candidate> = bases
                .iter()
                .map(|base| Candidate::Uri(join_mirror(base, path)))
                .collect();
            debug!(file = %file, mirror = name, count = expanded.len(), "custom mirror");
            self.filedict
                .entry_or_insert_with(file, Vec::new)
                .extend(expanded);
            return Ok(());
        }

        let Some(bases) = params.thirdpartymirrors().get(name) else {
            return Err(Error::UnknownMirror(name.to_string()));
        };

        let seen = self.thirdparty_seen.entry(file.as_str().to_string()).or_default();
        let fresh: Vec<String> = bases
            .iter()
            .map(|base| join_mirror(base, path))
            .filter(|expanded| seen.insert(expanded.clone()))
            .collect();
        debug!(file = %file, mirror = name, count = fresh.len(), "third-party mirror");

        self.filedict
            .entry_or_insert_with(file, Vec::new)
            .extend(fresh.iter().cloned().map(Candidate::Uri));
        self.thirdpartymirror_uris
            .entry_or_insert_with(file, Vec::new)
            .extend(fresh);
        Ok(())
    }

    fn add_direct_uri(&mut self, file: &DistfileName, uri: &str) {
        if self.params.restrict_fetch() || self.params.force_mirror() {
            self.primaryuri_dict
                .entry_or_insert_with(file, Vec::new)
                .push(uri.to_string());
        } else {
            self.filedict
                .entry_or_insert_with(file, Vec::new)
                .push(Candidate::Uri(uri.to_string()));
        }
    }

    /// Generic mirrors first, then every raw URI in order.
    pub fn process_file(&mut self, file: &DistfileName, uris: &[Option<String>]) -> Result<()> {
        self.ensure_generic_mirrors(file, self.params.force_mirror())?;
        for uri in uris {
            self.add_uri(file, uri.as_deref())?;
        }
        Ok(())
    }

    /// Reverse every primary URI list so the last declared URI comes
    /// first, and assemble the plan.
    pub fn finish(mut self) -> FetchPlan {
        for uris in self.primaryuri_dict.values_mut() {
            uris.reverse();
        }

        let primary_first = self.params.restrict().iter().any(|t| t == "primaryuri");
        let mut primary = self.primaryuri_dict;
        let mut thirdparty = self.thirdpartymirror_uris;

        let files = self
            .filedict
            .into_iter()
            .map(|(file, candidates)| {
                let name = file.as_str().to_string();
                FileCandidates::new(
                    file,
                    candidates,
                    primary.remove(&name).unwrap_or_default(),
                    thirdparty.remove(&name).unwrap_or_default(),
                    primary_first,
                )
            })
            .collect();
        FetchPlan::new(files)
    }
}

fn join_mirror(base: &str, path: &str) -> String {
    format!("{}/{}", base.strip_suffix('/').unwrap_or(base), path)
}
