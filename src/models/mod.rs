pub mod derived;
pub mod education;
pub mod experiences;
pub mod portfolio;
pub mod portfolio_skills;
pub mod projects;
pub mod skills;

use serde::{Deserialize, Serialize};

/// Default page size for the public portfolio listings.
pub const DEFAULT_PER_PAGE: u64 = 15;
/// Hard cap on any requested page size.
pub const MAX_PER_PAGE: u64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PaginationQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u64 {
        self.per_page_or(DEFAULT_PER_PAGE)
    }

    /// Page size with an endpoint-specific default, still capped at [`MAX_PER_PAGE`].
    pub fn per_page_or(&self, default: u64) -> u64 {
        self.per_page.unwrap_or(default).clamp(1, MAX_PER_PAGE)
    }
}

/// A page of results in the shape the browsing client expects
/// (`data` plus page bookkeeping).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, current_page: u64, per_page: u64, total: u64) -> Self {
        let last_page = total.div_ceil(per_page.max(1)).max(1);
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let from = current_page.saturating_sub(1) * per_page + 1;
            (Some(from), Some(from + data.len() as u64 - 1))
        };

        Self {
            data,
            current_page,
            per_page,
            total,
            last_page,
            from,
            to,
        }
    }

    pub fn map<U>(mut self, f: impl FnMut(T) -> U) -> Paginated<U> {
        let data = std::mem::take(&mut self.data).into_iter().map(f).collect();
        self.with_data(data)
    }

    /// Swap in a transformed page body, keeping the bookkeeping.
    pub fn with_data<U>(self, data: Vec<U>) -> Paginated<U> {
        Paginated {
            data,
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            last_page: self.last_page,
            from: self.from,
            to: self.to,
        }
    }
}

/// The `{success, data, message?}` envelope used by every public endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// A success envelope with no payload, e.g. after a delete.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Acknowledgement returned by every admin delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: bool,
}

/// Interpret a query-string flag the way HTML forms and admin links send them.
pub fn query_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "on" | "yes")
    )
}
