//! Values passed between the resolver, the fan-out engine and the driver.

mod candidate;
mod distfile;
mod file_map;
mod request;
mod sources;
mod status;

pub use candidate::Candidate;
pub use distfile::DistfileName;
pub use file_map::FileMap;
pub use request::FetchRequest;
pub use sources::SourceUris;
pub use status::FetchStatus;
