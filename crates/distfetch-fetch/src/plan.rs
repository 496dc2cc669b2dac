//! The finished candidate lists handed to the retrieval driver.

use crate::data::{Candidate, DistfileName};

/// Candidates of one file, read-only once planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidates {
    file:          DistfileName,
    candidates:    Vec<Candidate>,
    primary:       Vec<String>,
    thirdparty:    Vec<String>,
    primary_first: bool,
}

impl FileCandidates {
    pub fn new(
        file: DistfileName,
        candidates: Vec<Candidate>,
        primary: Vec<String>,
        thirdparty: Vec<String>,
        primary_first: bool,
    ) -> Self {
        Self {
            file,
            candidates,
            primary,
            thirdparty,
            primary_first,
        }
    }

    pub fn file(&self) -> &DistfileName { &self.file }

    /// Mirror-driven candidates, in the order they were added.
    pub fn candidates(&self) -> &[Candidate] { &self.candidates }

    /// Deferred direct URIs, last declared first.
    pub fn primary(&self) -> &[String] { &self.primary }

    /// URIs that came from third-party mirror expansion.
    pub fn thirdparty(&self) -> &[String] { &self.thirdparty }

    /// Every location to attempt, in order. Deferred primary URIs follow
    /// the mirror candidates unless the package restricts `primaryuri`.
    pub fn ordered(&self) -> Vec<Candidate> {
        let primary = self.primary.iter().cloned().map(Candidate::Uri);
        if self.primary_first {
            primary.chain(self.candidates.iter().cloned()).collect()
        } else {
            self.candidates.iter().cloned().chain(primary).collect()
        }
    }

    pub fn is_empty(&self) -> bool { self.candidates.is_empty() && self.primary.is_empty() }
}

/// Candidate lists for every file of a fetch, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPlan {
    files: Vec<FileCandidates>,
}

impl FetchPlan {
    pub fn new(files: Vec<FileCandidates>) -> Self { Self { files } }

    pub fn files(&self) -> &[FileCandidates] { &self.files }

    pub fn get(&self, name: &str) -> Option<&FileCandidates> {
        self.files.iter().find(|f| f.file.as_str() == name)
    }

    pub fn len(&self) -> usize { self.files.len() }

    pub fn is_empty(&self) -> bool { self.files.is_empty() }
}

impl IntoIterator for FetchPlan {
    type Item = FileCandidates;
    type IntoIter = std::vec::IntoIter<FileCandidates>;

    fn into_iter(self) -> Self::IntoIter { self.files.into_iter() }
}
