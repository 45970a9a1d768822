mod common;

use actix_web::HttpServer;
use chrono::Utc;

use common::{ADMIN_KEY, app, insert_portfolio, insert_skill, setup_db, test_config};
use portfolio_directory::client::api::unwrap_envelope;
use portfolio_directory::client::{
    AdminApi, AdminCredential, Browser, BrowserEvent, BrowserState, ClientConfig, ClientError,
    PortfolioApi, Resource, View,
};
use portfolio_directory::db::portfolio as portfolio_db;
use portfolio_directory::models::ApiResponse;
use portfolio_directory::models::portfolio::{self, PortfolioDetail};

fn detail(id: i32, name: &str) -> PortfolioDetail {
    let now = Utc::now();
    PortfolioDetail {
        portfolio: portfolio::Model {
            id,
            name: name.to_string(),
            title: "Engineer".to_string(),
            email: format!("{id}@example.com"),
            phone: "1".to_string(),
            location: "Jakarta".to_string(),
            bio: String::new(),
            profile_image: None,
            social_links: None,
            created_at: now,
            updated_at: now,
        },
        profile_image_url: None,
        skills: Vec::new(),
        experiences: Vec::new(),
        projects: Vec::new(),
        education: Vec::new(),
    }
}

#[test]
fn test_initial_load_transitions() {
    let mut state = BrowserState::new();
    assert!(state.initial_loading);

    state.apply(BrowserEvent::LoadStarted);
    assert!(state.loading);

    state.apply(BrowserEvent::Loaded(vec![detail(1, "Ayu"), detail(2, "Budi")]));
    assert!(!state.loading);
    assert!(!state.initial_loading);
    assert_eq!(state.results.len(), 2);
    assert_eq!(state.all.len(), 2);
    assert!(!state.is_empty());
}

#[test]
fn test_failed_load_keeps_error_until_retry() {
    let mut state = BrowserState::new();
    state.apply(BrowserEvent::LoadStarted);
    state.apply(BrowserEvent::LoadFailed("Cannot reach server".to_string()));
    assert_eq!(state.error.as_deref(), Some("Cannot reach server"));
    assert!(!state.initial_loading);
    assert!(state.is_empty());

    state.apply(BrowserEvent::LoadStarted);
    assert_eq!(state.error, None);
}

#[test]
fn test_search_then_clear_restores_full_list() {
    let mut state = BrowserState::new();
    state.apply(BrowserEvent::Loaded(vec![detail(1, "Ayu"), detail(2, "Budi")]));

    state.apply(BrowserEvent::SearchStarted("ayu".to_string()));
    assert!(state.searching);
    assert_eq!(state.query, "ayu");
    state.apply(BrowserEvent::SearchResults(vec![detail(1, "Ayu")]));
    assert_eq!(state.results.len(), 1);
    assert_eq!(state.all.len(), 2);

    state.apply(BrowserEvent::SearchCleared);
    assert!(!state.searching);
    assert!(state.query.is_empty());
    assert_eq!(state.results.len(), 2);
}

#[test]
fn test_search_failure_is_dismissable() {
    let mut state = BrowserState::new();
    state.apply(BrowserEvent::SearchStarted("x".to_string()));
    state.apply(BrowserEvent::SearchFailed("HTTP 500".to_string()));
    assert!(!state.loading);
    assert!(state.error.is_some());

    state.apply(BrowserEvent::ErrorDismissed);
    assert_eq!(state.error, None);
}

#[test]
fn test_select_and_back() {
    let mut state = BrowserState::new();
    state.apply(BrowserEvent::Selected(detail(7, "Citra")));
    assert_eq!(state.view, View::Detail);
    assert_eq!(state.selected.as_ref().map(|p| p.portfolio.id), Some(7));

    state.apply(BrowserEvent::BackToList);
    assert_eq!(state.view, View::List);
    assert!(state.selected.is_none());
}

#[test]
fn test_client_config_and_errors() {
    let config = ClientConfig::new("http://localhost:8000/api/");
    assert_eq!(config.url("/portfolios"), "http://localhost:8000/api/portfolios");
    assert_eq!(config.url("health"), "http://localhost:8000/api/health");

    let err = ClientError::Status {
        status: 422,
        reason: "Unprocessable Entity".to_string(),
        message: Some("The title field is required.".to_string()),
    };
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.user_message(), "The title field is required.");

    let err = ClientError::Status {
        status: 500,
        reason: "Internal Server Error".to_string(),
        message: None,
    };
    assert_eq!(err.user_message(), "HTTP 500: Internal Server Error");

    assert_eq!(format!("{:?}", AdminCredential::new("secret")), "AdminCredential(***)");
    assert_eq!(Resource::ALL.map(Resource::path)[4], "skills");
}

#[test]
fn test_unwrap_envelope() {
    assert_eq!(unwrap_envelope(ApiResponse::ok(3)).unwrap(), 3);

    let failed: ApiResponse<i32> = ApiResponse {
        success: false,
        data: None,
        message: Some("nope".to_string()),
    };
    assert!(matches!(unwrap_envelope(failed), Err(ClientError::Api(m)) if m == "nope"));
}

#[actix_web::test]
async fn test_browser_reports_unreachable_server() {
    let api = PortfolioApi::new(ClientConfig::new("http://127.0.0.1:1/api"));
    let mut browser = Browser::new(api);
    browser.start().await;

    let state = browser.state();
    assert!(!state.initial_loading);
    assert!(!state.loading);
    assert!(state.error.is_some());

    let health = PortfolioApi::new(ClientConfig::new("http://127.0.0.1:1/api"))
        .health_check()
        .await;
    assert!(!health.is_healthy);
}

#[actix_web::test]
async fn test_clients_against_running_server() {
    let db = setup_db().await;
    let ayu = insert_portfolio(&db, "Ayu", "ayu@example.com").await;
    insert_portfolio(&db, "Budi", "budi@example.com").await;
    let react = insert_skill(&db, "React").await;
    portfolio_db::attach_skill(&db, ayu.id, react.id, 4).await.unwrap();

    let config = test_config(Some(ADMIN_KEY));
    let server_db = db.clone();
    let server = HttpServer::new(move || app(server_db.clone(), config.clone()))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
    let addr = server.addrs()[0];
    let handle = server.run();
    actix_web::rt::spawn(handle);

    let client_config = ClientConfig::new(format!("http://{addr}/api"));
    let api = PortfolioApi::new(client_config.clone());
    assert!(api.health_check().await.is_healthy);
    assert_eq!(api.all_skills().await.unwrap(), vec!["React".to_string()]);
    assert!(api.get(999).await.unwrap().is_none());

    let mut browser = Browser::new(api);
    browser.start().await;
    assert_eq!(browser.state().results.len(), 2);

    browser.filter_by_skill("react").await;
    assert_eq!(browser.state().results.len(), 1);
    assert_eq!(browser.state().results[0].portfolio.name, "Ayu");

    browser.search("   ").await;
    assert_eq!(browser.state().results.len(), 2);

    browser.select(ayu.id).await;
    assert_eq!(browser.state().view, View::Detail);

    let denied = AdminApi::new(client_config.clone(), AdminCredential::new("wrong"));
    let err = denied
        .list_portfolios_simple()
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));

    let admin = AdminApi::new(client_config, AdminCredential::new(ADMIN_KEY));
    let summaries = admin.list_portfolios_simple().await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].name, "Ayu");
}
