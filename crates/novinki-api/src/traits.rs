//! Trait shared by every release provider.
//!
//! The function handler only sees this interface, so swapping the upstream
//! is a configuration change.

use std::future::Future;

use chrono::NaiveDate;
use novinki_core::models::ReleaseItem;

/// A source of new film, series and cartoon releases.
pub trait ReleaseProvider: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch the current releases, films first, then series, then cartoons.
    ///
    /// `today` anchors date ranges and prompts.
    fn fetch_releases(
        &self,
        today: NaiveDate,
    ) -> impl Future<Output = Result<Vec<ReleaseItem>, Self::Error>> + Send;
}
