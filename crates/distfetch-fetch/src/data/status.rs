use crate::error::Result;

/// Exit status of a fetch run. The numeric values are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum FetchStatus {
    Error = 0,
    Ok = 1,
}

impl FetchStatus {
    /// `Ok` for success and for the "fetching unnecessary" signal.
    pub fn from_result<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => FetchStatus::Ok,
            Err(e) if !e.is_failure() => FetchStatus::Ok,
            Err(_) => FetchStatus::Error,
        }
    }

    pub fn code(self) -> i32 { self as i32 }

    pub fn is_ok(self) -> bool { self == FetchStatus::Ok }
}

impl From<FetchStatus> for i32 {
    fn from(status: FetchStatus) -> Self { status.code() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_codes() {
        assert_eq!(FetchStatus::Ok.code(), 1);
        assert_eq!(FetchStatus::Error.code(), 0);
        assert_eq!(i32::from(FetchStatus::Ok), 1);
    }

    #[test]
    fn test_from_result() {
        assert_eq!(FetchStatus::from_result(&Ok::<_, Error>(())), FetchStatus::Ok);
        assert_eq!(
            FetchStatus::from_result::<()>(&Err(Error::FetchingUnnecessary)),
            FetchStatus::Ok
        );
        assert_eq!(
            FetchStatus::from_result::<()>(&Err(Error::ForceWithDigests)),
            FetchStatus::Error
        );
    }
}
