use chrono::NaiveDate;

use portfolio_directory::models::derived::{
    DerivedContext, absolute_url, calendar_diff, education_duration, experience_duration,
};
use portfolio_directory::models::portfolio::histogram;
use portfolio_directory::models::{Paginated, PaginationQuery, query_flag};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_open_ended_role_runs_until_today() {
    let duration = experience_duration(date(2022, 1, 1), None, date(2023, 1, 1));
    assert_eq!(duration, "1 tahun");
}

#[test]
fn test_experience_duration_years_and_months() {
    let duration = experience_duration(date(2020, 3, 15), Some(date(2022, 6, 20)), date(2030, 1, 1));
    assert_eq!(duration, "2 tahun 3 bulan");
}

#[test]
fn test_experience_duration_months_only() {
    let duration = experience_duration(date(2023, 1, 10), Some(date(2023, 5, 10)), date(2030, 1, 1));
    assert_eq!(duration, "4 bulan");
}

#[test]
fn test_short_experience_is_under_a_month() {
    let duration = experience_duration(date(2023, 1, 10), Some(date(2023, 2, 5)), date(2030, 1, 1));
    assert_eq!(duration, "< 1 bulan");
}

#[test]
fn test_calendar_diff_ignores_argument_order() {
    assert_eq!(calendar_diff(date(2020, 1, 31), date(2021, 3, 1)), (1, 1));
    assert_eq!(calendar_diff(date(2021, 3, 1), date(2020, 1, 31)), (1, 1));
}

#[test]
fn test_education_duration() {
    assert_eq!(education_duration(date(2016, 8, 1), date(2020, 7, 1)), "3 tahun");
    assert_eq!(education_duration(date(2016, 8, 1), date(2020, 8, 1)), "4 tahun");
    assert_eq!(education_duration(date(2020, 1, 1), date(2020, 9, 1)), "< 1 tahun");
}

#[test]
fn test_absolute_url_joins_relative_paths() {
    assert_eq!(
        absolute_url("http://assets.test/", Some("/storage/profiles/a.png")).as_deref(),
        Some("http://assets.test/storage/profiles/a.png")
    );
    assert_eq!(
        absolute_url("http://assets.test", Some("storage/profiles/a.png")).as_deref(),
        Some("http://assets.test/storage/profiles/a.png")
    );
}

#[test]
fn test_absolute_url_passes_through_remote_images() {
    assert_eq!(
        absolute_url("http://assets.test", Some("https://cdn.example.com/a.png")).as_deref(),
        Some("https://cdn.example.com/a.png")
    );
    assert_eq!(absolute_url("http://assets.test", None), None);
    assert_eq!(absolute_url("http://assets.test", Some("  ")), None);
}

#[test]
fn test_context_image_url() {
    let ctx = DerivedContext::at("http://assets.test", date(2024, 1, 1));
    assert_eq!(
        ctx.image_url(Some("/storage/projects/x.jpg")).as_deref(),
        Some("http://assets.test/storage/projects/x.jpg")
    );
}

#[test]
fn test_histogram_orders_by_count_then_name() {
    let entries = histogram(["Rust", "Go", "Rust", "Vue.js", "Go", "Rust"], None);
    let pairs: Vec<(&str, u64)> = entries.iter().map(|e| (e.name.as_str(), e.count)).collect();
    assert_eq!(pairs, vec![("Rust", 3), ("Go", 2), ("Vue.js", 1)]);

    let top = histogram(["a", "b", "b", "c"], Some(2));
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].name, "b");
}

#[test]
fn test_paginated_bookkeeping() {
    let page = Paginated::new(vec![16, 17, 18], 2, 15, 33);
    assert_eq!(page.last_page, 3);
    assert_eq!(page.from, Some(16));
    assert_eq!(page.to, Some(18));

    let empty: Paginated<i32> = Paginated::new(Vec::new(), 1, 15, 0);
    assert_eq!(empty.last_page, 1);
    assert_eq!(empty.from, None);

    let mapped = page.map(|n| n.to_string());
    assert_eq!(mapped.data, vec!["16", "17", "18"]);
    assert_eq!(mapped.total, 33);
}

#[test]
fn test_pagination_query_caps_page_size() {
    let query = PaginationQuery {
        page: Some(0),
        per_page: Some(500),
    };
    assert_eq!(query.page(), 1);
    assert_eq!(query.per_page(), 100);
    assert_eq!(PaginationQuery::default().per_page(), 15);
    assert_eq!(PaginationQuery::default().per_page_or(20), 20);
}

#[test]
fn test_query_flag() {
    assert!(query_flag(Some("1")));
    assert!(query_flag(Some("true")));
    assert!(!query_flag(Some("0")));
    assert!(!query_flag(None));
}
