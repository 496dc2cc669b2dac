//! Top-level entry points.

use distfetch_settings::Settings;
use tracing::error;

use crate::data::{DistfileName, FetchRequest, FetchStatus, SourceUris};
use crate::effects::{FetchDriver, FetchReport, Transport};
use crate::error::Result;
use crate::fanout::UriFanOut;
use crate::params::FetchParams;
use crate::plan::FetchPlan;

/// Resolve the configuration and build the candidate plan for `uris`.
///
/// # Errors
///
/// Configuration errors from [`FetchParams::new`], including the
/// non-failure [`Error::FetchingUnnecessary`](crate::Error::FetchingUnnecessary),
/// and mirror errors from the fan-out.
pub fn plan_fetch(settings: &dyn Settings, uris: &SourceUris, request: FetchRequest) -> Result<FetchPlan> {
    let params = FetchParams::new(settings, request)?;
    plan_with(&params, uris)
}

/// Build the candidate plan for `uris` under an existing configuration.
pub fn plan_with(params: &FetchParams<'_>, uris: &SourceUris) -> Result<FetchPlan> {
    let mut fanout = UriFanOut::new(params);
    for (name, file_uris) in uris.normalize() {
        let digests = params.digests().get(&name).cloned().unwrap_or_default();
        let file = DistfileName::new(name).with_digests(digests);
        fanout.process_file(&file, &file_uris)?;
    }
    Ok(fanout.finish())
}

/// Plan and retrieve every file, collapsing the result to a status.
pub async fn fetch<T: Transport>(
    settings: &dyn Settings,
    uris: &SourceUris,
    request: FetchRequest,
    transport: T,
) -> FetchStatus {
    let result: Result<FetchReport> = async move {
        let params = FetchParams::new(settings, request)?;
        let plan = plan_with(&params, uris)?;
        FetchDriver::new(&params, transport).run(&plan).await
    }
    .await;

    match result {
        Ok(report) => report.status(),
        Err(e) => {
            if e.is_failure() {
                error!(error = %e, "fetch aborted");
            }
            FetchStatus::from_result::<()>(&Err(e))
        }
    }
}
