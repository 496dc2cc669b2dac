//! I/O behind trait seams: process identity, transport, verification and
//! the retrieval loop.

mod driver;
mod identity;
mod transport;
mod verify;

pub use driver::{FetchDriver, FetchReport, FileOutcome};
pub use identity::{ProcessIdentity, SecurityLevel, SystemIdentity};
pub use transport::{LocalTransport, Transport};
pub use verify::{DigestVerifier, Verifier};
