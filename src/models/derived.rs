//! Presentation-only fields computed from loaded rows.

use chrono::{Datelike, NaiveDate, Utc};

/// Inputs shared by every derived field: where public assets are served from
/// and which day counts as "now" for open-ended date ranges.
#[derive(Debug, Clone)]
pub struct DerivedContext {
    pub asset_base: String,
    pub today: NaiveDate,
}

impl DerivedContext {
    pub fn new(asset_base: impl Into<String>) -> Self {
        Self {
            asset_base: asset_base.into(),
            today: Utc::now().date_naive(),
        }
    }

    pub fn at(asset_base: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            asset_base: asset_base.into(),
            today,
        }
    }

    pub fn image_url(&self, stored: Option<&str>) -> Option<String> {
        absolute_url(&self.asset_base, stored)
    }
}

/// Whole calendar years and months between two dates, order-insensitive.
pub fn calendar_diff(a: NaiveDate, b: NaiveDate) -> (i32, i32) {
    let (start, end) = if a <= b { (a, b) } else { (b, a) };

    let mut years = end.year() - start.year();
    let mut months = end.month() as i32 - start.month() as i32;
    if (end.day() as i32) < (start.day() as i32) {
        months -= 1;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    (years, months)
}

/// Experience duration, e.g. "2 tahun 3 bulan". An open-ended role runs until `today`.
pub fn experience_duration(start: NaiveDate, end: Option<NaiveDate>, today: NaiveDate) -> String {
    let (years, months) = calendar_diff(start, end.unwrap_or(today));

    let mut parts = Vec::with_capacity(2);
    if years > 0 {
        parts.push(format!("{years} tahun"));
    }
    if months > 0 {
        parts.push(format!("{months} bulan"));
    }

    if parts.is_empty() {
        "< 1 bulan".to_string()
    } else {
        parts.join(" ")
    }
}

/// Education duration in whole years.
pub fn education_duration(start: NaiveDate, end: NaiveDate) -> String {
    let (years, _) = calendar_diff(start, end);
    if years > 0 {
        format!("{years} tahun")
    } else {
        "< 1 tahun".to_string()
    }
}

/// Rewrite a stored image reference to an absolute URL.
///
/// Absolute `http(s)` references pass through untouched; anything else is
/// joined onto `base` with exactly one slash between them.
pub fn absolute_url(base: &str, stored: Option<&str>) -> Option<String> {
    let stored = stored.map(str::trim).filter(|s| !s.is_empty())?;

    if is_absolute(stored) {
        return Some(stored.to_string());
    }

    Some(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        stored.trim_start_matches('/')
    ))
}

fn is_absolute(reference: &str) -> bool {
    let lower = reference.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
