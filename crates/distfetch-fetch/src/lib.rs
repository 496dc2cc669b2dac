//! Distfile fetching: configuration, URI fan-out and verified retrieval.
//!
//! # Architecture
//!
//! - [`FetchParams`] resolves call-site flags against [`Settings`] into an
//!   immutable configuration whose derived attributes are computed lazily.
//! - [`UriFanOut`] expands each file's raw URIs into ordered candidates:
//!   generic mirrors, `mirror://` substitution, third-party expansion and
//!   deferred primary URIs.
//! - [`FetchDriver`] attempts the candidates of a [`FetchPlan`] through a
//!   [`Transport`] with resume, verification and backoff.
//!
//! [`plan_fetch`] and [`fetch`] tie the three together.
//!
//! [`Settings`]: distfetch_settings::Settings
//!
//! # Examples
//!
//! ```
//! use distfetch_fetch::{FetchRequest, SourceUris, plan_fetch};
//! use distfetch_settings::MapSettings;
//!
//! let settings = MapSettings::builder()
//!     .var("PORTAGE_CONFIGROOT", "/nonexistent")
//!     .thirdparty_mirror("gnu", ["https://ftp.gnu.org/gnu"])
//!     .build();
//! let uris = SourceUris::mapped([(
//!     "hello-2.12.tar.gz",
//!     vec!["mirror://gnu/hello/hello-2.12.tar.gz"],
//! )]);
//!
//! let plan = plan_fetch(&settings, &uris, FetchRequest::new().try_mirrors(false)).unwrap();
//! let file = plan.get("hello-2.12.tar.gz").unwrap();
//! assert_eq!(file.thirdparty(), ["https://ftp.gnu.org/gnu/hello/hello-2.12.tar.gz"]);
//! ```

mod core;
mod data;
mod effects;
mod error;
mod fanout;
mod fetch;
mod params;
mod plan;
mod report;

pub use self::core::{
    DEFAULT_RESUME_SIZE, HashFilter, KNOWN_HASHES, apply_hash_filter, parse_resume_size,
    retry_delay,
};
pub use self::data::{Candidate, DistfileName, FetchRequest, FetchStatus, FileMap, SourceUris};
pub use self::effects::{
    DigestVerifier, FetchDriver, FetchReport, FileOutcome, LocalTransport, ProcessIdentity,
    SecurityLevel, SystemIdentity, Transport, Verifier,
};
pub use self::error::{Error, Result};
pub use self::fanout::UriFanOut;
pub use self::fetch::{fetch, plan_fetch, plan_with};
pub use self::params::{DEFAULT_CHECKSUM_FAILURE_MAX_TRIES, FetchParams, FetchParamsBuilder};
pub use self::plan::{FetchPlan, FileCandidates};
pub use self::report::{CollectingReporter, Reporter, TracingReporter};
