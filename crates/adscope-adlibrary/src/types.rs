//! Wire types for the ad-library search endpoint.

use serde::{Deserialize, Serialize};

/// Spend or impression range as reported by the ad library.
///
/// Bounds arrive as strings on the wire and are not guaranteed to parse as
/// numbers; consumers treat unparseable bounds as "unknown".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundRange {
    pub lower_bound: Option<String>,
    pub upper_bound: Option<String>,
}

/// One advertisement record exactly as received from the external source.
///
/// Immutable once fetched; lives only for the duration of one collection
/// run. Every field except `id` is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAdRecord {
    pub id: String,
    #[serde(default)]
    pub ad_creation_time: Option<String>,
    #[serde(default)]
    pub ad_creative_bodies: Vec<String>,
    #[serde(default)]
    pub ad_creative_link_captions: Vec<String>,
    #[serde(default)]
    pub ad_creative_link_descriptions: Vec<String>,
    #[serde(default)]
    pub ad_creative_link_titles: Vec<String>,
    #[serde(default)]
    pub ad_delivery_start_time: Option<String>,
    #[serde(default)]
    pub ad_delivery_stop_time: Option<String>,
    #[serde(default)]
    pub ad_snapshot_url: Option<String>,
    #[serde(default)]
    pub page_id: Option<String>,
    #[serde(default)]
    pub page_name: Option<String>,
    #[serde(default)]
    pub publisher_platforms: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub spend: Option<BoundRange>,
    #[serde(default)]
    pub impressions: Option<BoundRange>,
}

/// Envelope returned by the search endpoint: a page of records plus an
/// optional cursor for the next page.
#[derive(Debug, Clone, Deserialize)]
pub struct AdArchiveResponse {
    #[serde(default)]
    pub data: Vec<RawAdRecord>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub cursors: Option<PagingCursors>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PagingCursors {
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
}

impl AdArchiveResponse {
    /// Cursor for the next page, present only when the endpoint reports
    /// both a `next` link and an `after` cursor.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        let paging = self.paging.as_ref()?;
        paging.next.as_ref()?;
        paging.cursors.as_ref()?.after.as_deref()
    }
}

/// Delivery-status filter accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveStatus {
    #[default]
    Active,
    Inactive,
    All,
}

impl ActiveStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActiveStatus::Active => "ACTIVE",
            ActiveStatus::Inactive => "INACTIVE",
            ActiveStatus::All => "ALL",
        }
    }
}

/// Parameters for one paginated search.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub active_status: ActiveStatus,
    /// Minimum delivery date, `YYYY-MM-DD`. When `None` the client derives
    /// it from the configured minimum days-running.
    pub delivery_date_min: Option<String>,
    pub reached_countries: Vec<String>,
    pub search_terms: Option<String>,
    pub media_type: Option<String>,
    pub publisher_platforms: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    /// Page size limit sent to the endpoint.
    pub limit: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            active_status: ActiveStatus::Active,
            delivery_date_min: None,
            reached_countries: Vec::new(),
            search_terms: None,
            media_type: None,
            publisher_platforms: None,
            languages: None,
            limit: 100,
        }
    }
}

/// Result of a paginated search.
///
/// A transient page failure ends pagination early: records collected so
/// far are kept and the failure is reported in `page_error` rather than
/// discarding the batch.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub records: Vec<RawAdRecord>,
    pub pages_fetched: u32,
    pub page_error: Option<String>,
}

/// Server-reported quota telemetry from the `x-app-usage` header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppUsage {
    #[serde(default)]
    pub call_count: u32,
    #[serde(default)]
    pub total_cputime: u32,
    #[serde(default)]
    pub total_time: u32,
    #[serde(default)]
    pub estimated_time_to_regain_access: u32,
}
