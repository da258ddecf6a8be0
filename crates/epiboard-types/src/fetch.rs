//! Page data-fetch lifecycle
//!
//! Every page moves `Loading -> {Loaded(data), Failed(message)}`. Single-resource
//! pages fail fast; multi-resource pages settle each call independently and
//! record the failures in a [`FetchReport`].

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Loaded(data) => LoadState::Loaded(f(data)),
            LoadState::Failed(message) => LoadState::Failed(message),
        }
    }
}

impl<T> From<ApiResult<T>> for LoadState<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(data) => LoadState::Loaded(data),
            Err(err) => LoadState::Failed(err.message),
        }
    }
}

/// A sub-fetch that degraded to its empty value
#[derive(Debug, Clone, PartialEq)]
pub struct SectionFailure {
    pub section: &'static str,
    pub error: ApiError,
}

/// Outcome of an all-settled join
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchReport {
    pub attempted: usize,
    pub failures: Vec<SectionFailure>,
}

impl FetchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one settled call; a failure degrades to `T::default()`
    pub fn settle<T: Default>(&mut self, section: &'static str, result: ApiResult<T>) -> T {
        self.attempted += 1;
        match result {
            Ok(value) => value,
            Err(error) => {
                self.failures.push(SectionFailure { section, error });
                T::default()
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Every section failed: the page shows an error instead of empty sections
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.failures.len() == self.attempted
    }

    pub fn failed(&self, section: &str) -> bool {
        self.failures.iter().any(|f| f.section == section)
    }

    /// Auth failures are handled by the interceptor; callers may want to skip rendering
    pub fn has_auth_failure(&self) -> bool {
        self.failures.iter().any(|f| f.error.is_auth())
    }

    /// First failure message, used as the page error when everything failed
    pub fn first_message(&self) -> Option<&str> {
        self.failures.first().map(|f| f.error.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_degrades_to_default() {
        let mut report = FetchReport::new();
        let ok: Vec<u32> = report.settle("top", Ok(vec![1, 2]));
        let failed: Vec<u32> = report.settle("new", Err(ApiError::from_status(500, "")));
        assert_eq!(ok, vec![1, 2]);
        assert!(failed.is_empty());
        assert!(report.failed("new"));
        assert!(!report.failed("top"));
        assert!(!report.all_failed());
    }

    #[test]
    fn test_all_failed() {
        let mut report = FetchReport::new();
        let _: Vec<u8> = report.settle("a", Err(ApiError::network("down")));
        let _: Vec<u8> = report.settle("b", Err(ApiError::network("down")));
        assert!(report.all_failed());
        assert_eq!(report.first_message(), Some("Network error: down"));
        assert!(!FetchReport::new().all_failed());
    }

    #[test]
    fn test_load_state_from_result() {
        let state: LoadState<u8> = Ok(4).into();
        assert_eq!(state.data(), Some(&4));
        let state: LoadState<u8> = Err(ApiError::from_status(500, r#"{"detail":"boom"}"#)).into();
        assert_eq!(state.error(), Some("boom"));
    }
}
