use serde::Deserialize;

/// Count of fax records on a single dashboard page.
pub const PER_PAGE: u64 = 25;

/// Highest page number the dashboard will serve.
pub const MAX_PAGES: u64 = 10000;

/// Page selection query parameters.
///
/// Pages are numbered from 1; a missing or zero `page` value selects
/// the first page.
#[derive(Deserialize)]
pub struct Pagination {
    #[serde(default)]
    page: u64,
}

impl Pagination {
    pub fn limit(&self) -> u64 {
        PER_PAGE
    }

    pub fn offset(&self) -> u64 {
        self.page.min(MAX_PAGES).saturating_sub(1) * PER_PAGE
    }
}
