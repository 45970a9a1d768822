mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};

use common::{ADMIN_KEY, app, insert_experience, insert_portfolio, insert_project, insert_skill, portfolio_payload, setup_db, test_config};
use portfolio_directory::db::portfolio as portfolio_db;
use portfolio_directory::models::{experiences, portfolio, portfolio_skills, projects};

#[actix_web::test]
async fn test_health() {
    let db = setup_db().await;
    let app = test::init_service(app(db, test_config(Some(ADMIN_KEY)))).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"status": "OK"}));
}

#[actix_web::test]
async fn test_admin_requires_matching_key() {
    let db = setup_db().await;
    let app = test::init_service(app(db.clone(), test_config(Some(ADMIN_KEY)))).await;

    let missing = test::TestRequest::post()
        .uri("/api/admin/portfolios")
        .set_json(portfolio_payload("Nobody"))
        .to_request();
    let resp = test::call_service(&app, missing).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": false, "message": "Unauthorized."}));

    let wrong = test::TestRequest::post()
        .uri("/api/admin/portfolios")
        .insert_header(("X-Admin-Key", "guess"))
        .set_json(portfolio_payload("Nobody"))
        .to_request();
    let resp = test::call_service(&app, wrong).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let public_write = test::TestRequest::post()
        .uri("/api/portfolios")
        .set_json(portfolio_payload("Nobody"))
        .to_request();
    let resp = test::call_service(&app, public_write).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let listing = test::TestRequest::get().uri("/api/admin/skills").to_request();
    let resp = test::call_service(&app, listing).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(portfolio::Entity::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_admin_disabled_without_configured_key() {
    let db = setup_db().await;
    let target = insert_portfolio(&db, "Kept", "kept@example.com").await;
    let app = test::init_service(app(db.clone(), test_config(None))).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/portfolios/{}", target.id))
        .insert_header(("X-Admin-Key", ""))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    assert!(portfolio_db::portfolio_exists(&db, target.id).await.unwrap());
}

#[actix_web::test]
async fn test_create_then_fetch_with_derived_fields() {
    let db = setup_db().await;
    let app = test::init_service(app(db.clone(), test_config(Some(ADMIN_KEY)))).await;

    let mut payload = portfolio_payload("Dewi Lestari");
    payload["profile_image"] = json!("/storage/profiles/dewi.png");
    payload["social_links"] = json!({"github": "https://github.com/dewi", "website": ""});
    let req = test::TestRequest::post()
        .uri("/api/admin/portfolios")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_i64().unwrap() as i32;
    assert_eq!(created["skills"], json!([]));
    assert_eq!(created["social_links"], json!({"github": "https://github.com/dewi"}));

    let req = test::TestRequest::post()
        .uri("/api/admin/experiences")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({
            "portfolio_id": id,
            "company": "Tokopedia",
            "position": "Engineer",
            "start_date": "2020-03-15",
            "end_date": "2022-06-20",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let experience: Value = test::read_body_json(resp).await;
    assert_eq!(experience["duration"], "2 tahun 3 bulan");
    assert_eq!(experience["is_current_role"], false);

    let req = test::TestRequest::post()
        .uri("/api/admin/education")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({
            "portfolio_id": id,
            "institution": "Universitas Indonesia",
            "degree": "S1",
            "field": "Computer Science",
            "start_date": "2016-08-01",
            "end_date": "2020-08-01",
            "gpa": "3.80",
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/portfolios/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["name"], "Dewi Lestari");
    assert_eq!(
        data["profile_image_url"],
        "http://assets.test/storage/profiles/dewi.png"
    );
    assert_eq!(data["experiences"][0]["duration"], "2 tahun 3 bulan");
    assert_eq!(data["education"][0]["duration"], "4 tahun");
    assert_eq!(data["education"][0]["gpa"], "3.80");
    assert_eq!(data["projects"], json!([]));
}

#[actix_web::test]
async fn test_missing_portfolio_is_404() {
    let db = setup_db().await;
    let app = test::init_service(app(db, test_config(Some(ADMIN_KEY)))).await;

    let req = test::TestRequest::get().uri("/api/portfolios/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Portfolio not found");

    let req = test::TestRequest::delete()
        .uri("/api/admin/projects/999")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_validation_error_shape() {
    let db = setup_db().await;
    let app = test::init_service(app(db, test_config(Some(ADMIN_KEY)))).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/portfolios")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({"name": "Only A Name", "email": "nope"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
    let errors = body["errors"].as_object().unwrap();
    for field in ["title", "email", "phone", "location"] {
        assert!(errors.contains_key(field), "missing error for {field}");
    }
    assert!(!errors.contains_key("name"));
    assert_eq!(errors["title"], json!(["The title field is required."]));
}

#[actix_web::test]
async fn test_duplicate_email_is_rejected() {
    let db = setup_db().await;
    insert_portfolio(&db, "First", "taken@example.com").await;
    let app = test::init_service(app(db, test_config(Some(ADMIN_KEY)))).await;

    let mut payload = portfolio_payload("Second");
    payload["email"] = json!("taken@example.com");
    let req = test::TestRequest::post()
        .uri("/api/admin/portfolios")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["email"], json!(["The email has already been taken."]));
}

#[actix_web::test]
async fn test_child_rows_need_existing_portfolio() {
    let db = setup_db().await;
    let app = test::init_service(app(db, test_config(Some(ADMIN_KEY)))).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/projects")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({"portfolio_id": 42, "title": "Orphan", "description": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["errors"]["portfolio_id"],
        json!(["The selected portfolio id is invalid."])
    );
}

#[actix_web::test]
async fn test_delete_cascades_to_children() {
    let db = setup_db().await;
    let owner = insert_portfolio(&db, "Owner", "owner@example.com").await;
    let other = insert_portfolio(&db, "Other", "other@example.com").await;
    let skill = insert_skill(&db, "Rust").await;
    insert_experience(&db, owner.id).await;
    insert_project(&db, owner.id).await;
    insert_project(&db, other.id).await;
    portfolio_db::attach_skill(&db, owner.id, skill.id, 4).await.unwrap();

    let app = test::init_service(app(db.clone(), test_config(Some(ADMIN_KEY)))).await;
    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/portfolios/{}", owner.id))
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"deleted": true}));

    assert_eq!(experiences::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(projects::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(portfolio_skills::Entity::find().count(&db).await.unwrap(), 0);
    let req = test::TestRequest::get()
        .uri(&format!("/api/portfolios/{}", owner.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    // The skill itself survives.
    assert!(portfolio_directory::db::skills::get_skill_by_id(&db, skill.id)
        .await
        .unwrap()
        .is_some());
}

#[actix_web::test]
async fn test_sync_skills_replaces_the_set() {
    let db = setup_db().await;
    let owner = insert_portfolio(&db, "Owner", "owner@example.com").await;
    let react = insert_skill(&db, "React").await;
    let vue = insert_skill(&db, "Vue.js").await;
    let rust = insert_skill(&db, "Rust").await;
    portfolio_db::attach_skill(&db, owner.id, react.id, 5).await.unwrap();
    portfolio_db::attach_skill(&db, owner.id, vue.id, 3).await.unwrap();

    let app = test::init_service(app(db.clone(), test_config(Some(ADMIN_KEY)))).await;
    let uri = format!("/api/admin/portfolios/{}/skills/sync", owner.id);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({"skill_ids": [react.id, rust.id]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let mut names: Vec<&str> = body["skills"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, ["React", "Rust"]);

    // Kept links keep their proficiency.
    let detail: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/portfolios/{}", owner.id))
            .to_request(),
    )
    .await;
    let react_link = detail["data"]["skills"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == "React")
        .unwrap();
    assert_eq!(react_link["pivot"]["proficiency_level"], 5);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({"skill_ids": [rust.id, 9999]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(portfolio_skills::Entity::find().count(&db).await.unwrap(), 2);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({"skill_ids": []}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert_eq!(portfolio_skills::Entity::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_page_size_is_capped() {
    let db = setup_db().await;
    for i in 0..105 {
        insert_portfolio(&db, &format!("Person {i}"), &format!("person{i}@example.com")).await;
    }
    let app = test::init_service(app(db, test_config(Some(ADMIN_KEY)))).await;

    let req = test::TestRequest::get()
        .uri("/api/portfolios?per_page=500")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let page = &body["data"];
    assert_eq!(page["data"].as_array().unwrap().len(), 100);
    assert_eq!(page["per_page"], 100);
    assert_eq!(page["total"], 105);
    assert_eq!(page["last_page"], 2);
    assert_eq!(page["data"][0]["name"], "Person 0");

    let req = test::TestRequest::get()
        .uri("/api/portfolios?page=2&per_page=100")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["from"], 101);

    let req = test::TestRequest::get()
        .uri("/api/admin/portfolios")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["per_page"], 20);
    assert_eq!(body["data"][0]["name"], "Person 104");
}

#[actix_web::test]
async fn test_search_and_skill_filter() {
    let db = setup_db().await;
    let frontend = insert_portfolio(&db, "Ayu", "ayu@example.com").await;
    let backend = insert_portfolio(&db, "Budi", "budi@example.com").await;
    let react = insert_skill(&db, "React").await;
    portfolio_db::attach_skill(&db, frontend.id, react.id, 3).await.unwrap();
    let app = test::init_service(app(db, test_config(Some(ADMIN_KEY)))).await;

    let req = test::TestRequest::get()
        .uri("/api/portfolios/search?q=react")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let hits = body["data"]["data"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"], frontend.id);

    let req = test::TestRequest::get()
        .uri("/api/portfolios/search?q=BUDI")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["data"][0]["id"], backend.id);

    let req = test::TestRequest::get()
        .uri("/api/portfolios/filter?skill=Reac")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 1);

    let req = test::TestRequest::get()
        .uri("/api/portfolios/search?q=%20")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get().uri("/api/portfolios/filter").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_project_technologies_forms() {
    let db = setup_db().await;
    let owner = insert_portfolio(&db, "Owner", "owner@example.com").await;
    let app = test::init_service(app(db, test_config(Some(ADMIN_KEY)))).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/projects")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({
            "portfolio_id": owner.id,
            "title": "Native",
            "description": "x",
            "technologies": ["React", "Laravel"],
            "image": "https://cdn.example.com/shot.png",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let native: Value = test::read_body_json(resp).await;
    assert_eq!(native["technologies"], json!(["React", "Laravel"]));
    assert_eq!(native["image_url"], "https://cdn.example.com/shot.png");
    assert_eq!(native["portfolio"], json!({"id": owner.id, "name": "Owner"}));
    assert_eq!(native["featured"], false);

    let req = test::TestRequest::post()
        .uri("/api/admin/projects")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({
            "portfolio_id": owner.id,
            "title": "Encoded",
            "description": "x",
            "technologies": "[\"React\",\"Laravel\"]",
        }))
        .to_request();
    let encoded: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(encoded["technologies"], json!(["React", "Laravel"]));
    assert_eq!(encoded["image_url"], Value::Null);

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/projects/{}", encoded["id"]))
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({"technologies": "React"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/projects/{}", encoded["id"]))
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({"featured": true}))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["featured"], true);
    assert_eq!(updated["technologies"], json!(["React", "Laravel"]));

    let req = test::TestRequest::get()
        .uri("/api/admin/projects?featured=1")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .to_request();
    let listing: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["data"][0]["title"], "Encoded");
}

#[actix_web::test]
async fn test_stats_and_skill_endpoints() {
    let db = setup_db().await;
    let a = insert_portfolio(&db, "A", "a@example.com").await;
    let b = insert_portfolio(&db, "B", "b@example.com").await;
    let react = insert_skill(&db, "React").await;
    let vue = insert_skill(&db, "Vue.js").await;
    portfolio_db::attach_skill(&db, a.id, react.id, 3).await.unwrap();
    portfolio_db::attach_skill(&db, b.id, react.id, 2).await.unwrap();
    portfolio_db::attach_skill(&db, b.id, vue.id, 2).await.unwrap();
    let app = test::init_service(app(db, test_config(Some(ADMIN_KEY)))).await;

    let req = test::TestRequest::get().uri("/api/portfolios/stats").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let stats = &body["data"];
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["bySkill"][0], json!({"name": "React", "count": 2}));
    assert_eq!(stats["bySkill"][1], json!({"name": "Vue.js", "count": 1}));
    assert_eq!(
        stats["byLocation"],
        json!([{"name": "Jakarta, Indonesia", "count": 2}])
    );

    let req = test::TestRequest::get().uri("/api/skills").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], json!(["React", "Vue.js"]));

    let req = test::TestRequest::get()
        .uri("/api/skills/category?category=Frontend%20Framework")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get().uri("/api/skills/category").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    let req = test::TestRequest::get().uri("/api/skills/stats").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["data"],
        json!({"total": 2, "popular": 0, "categories": ["Frontend Framework"]})
    );
}

#[actix_web::test]
async fn test_skill_names_are_unique() {
    let db = setup_db().await;
    insert_skill(&db, "Rust").await;
    let app = test::init_service(app(db, test_config(Some(ADMIN_KEY)))).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/skills")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({"name": "Rust"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/api/skills")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({"name": "Go", "is_popular": "1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Skill created successfully");
    assert_eq!(body["data"]["is_popular"], true);
}

#[actix_web::test]
async fn test_seed_fills_empty_tables_once() {
    use portfolio_directory::db::seed::{DEMO_PORTFOLIOS, SKILL_CATALOG, seed_demo_data};
    use portfolio_directory::models::skills;

    let db = setup_db().await;
    seed_demo_data(&db).await.unwrap();
    seed_demo_data(&db).await.unwrap();

    assert_eq!(
        skills::Entity::find().count(&db).await.unwrap(),
        SKILL_CATALOG.len() as u64
    );
    assert_eq!(
        portfolio::Entity::find().count(&db).await.unwrap(),
        DEMO_PORTFOLIOS.len() as u64
    );
    assert!(portfolio_skills::Entity::find().count(&db).await.unwrap() > 0);
}

#[actix_web::test]
async fn test_keyless_update_delete_and_sync_change_nothing() {
    let db = setup_db().await;
    let owner = insert_portfolio(&db, "Owner", "owner@example.com").await;
    let react = insert_skill(&db, "React").await;
    let rust = insert_skill(&db, "Rust").await;
    portfolio_db::attach_skill(&db, owner.id, react.id, 4).await.unwrap();
    let app = test::init_service(app(db.clone(), test_config(Some(ADMIN_KEY)))).await;
    let uri = format!("/api/admin/portfolios/{}", owner.id);

    let update = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({"name": "Renamed"}))
        .to_request();
    assert_eq!(test::call_service(&app, update).await.status(), StatusCode::UNAUTHORIZED);

    let sync = test::TestRequest::post()
        .uri(&format!("{uri}/skills/sync"))
        .insert_header(("X-Admin-Key", "guess"))
        .set_json(json!({"skill_ids": [rust.id]}))
        .to_request();
    assert_eq!(test::call_service(&app, sync).await.status(), StatusCode::UNAUTHORIZED);

    let delete = test::TestRequest::delete().uri(&uri).to_request();
    assert_eq!(test::call_service(&app, delete).await.status(), StatusCode::UNAUTHORIZED);

    let public_delete = test::TestRequest::delete()
        .uri(&format!("/api/portfolios/{}", owner.id))
        .to_request();
    assert_eq!(test::call_service(&app, public_delete).await.status(), StatusCode::UNAUTHORIZED);

    let stored = portfolio::Entity::find_by_id(owner.id).one(&db).await.unwrap().unwrap();
    assert_eq!(stored.name, "Owner");
    let links = portfolio_skills::Entity::find().all(&db).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].skill_id, react.id);
    assert_eq!(links[0].proficiency_level, 4);
}

#[actix_web::test]
async fn test_page_past_the_end_is_empty() {
    let db = setup_db().await;
    for i in 0..3 {
        insert_portfolio(&db, &format!("Person {i}"), &format!("person{i}@example.com")).await;
    }
    let app = test::init_service(app(db, test_config(Some(ADMIN_KEY)))).await;

    for uri in [
        "/api/portfolios?page=2",
        "/api/portfolios?page=1000000000000000000",
        "/api/portfolios?page=18446744073709551615&per_page=100",
        "/api/portfolios/search?q=person&page=1000000000000000000",
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["data"], json!([]), "{uri}");
        assert_eq!(body["data"]["total"], 3, "{uri}");
        assert_eq!(body["data"]["from"], Value::Null, "{uri}");
    }

    let req = test::TestRequest::get()
        .uri("/api/admin/portfolios?page=1000000000000000000")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["last_page"], 1);
}

#[actix_web::test]
async fn test_out_of_range_sort_order_is_rejected() {
    let db = setup_db().await;
    let owner = insert_portfolio(&db, "Owner", "owner@example.com").await;
    let app = test::init_service(app(db.clone(), test_config(Some(ADMIN_KEY)))).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/projects")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({
            "portfolio_id": owner.id,
            "title": "Shop",
            "description": "Storefront",
            "sort_order": 99_999_999_999i64,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["sort_order"].is_array());
    assert_eq!(projects::Entity::find().count(&db).await.unwrap(), 0);

    let req = test::TestRequest::post()
        .uri("/api/admin/experiences")
        .insert_header(("X-Admin-Key", ADMIN_KEY))
        .set_json(json!({
            "portfolio_id": owner.id,
            "company": "Acme",
            "position": "Engineer",
            "start_date": "2022-01-01",
            "sort_order": "-3000000000",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(experiences::Entity::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_malformed_query_and_path_use_the_error_envelope() {
    let db = setup_db().await;
    let app = test::init_service(app(db, test_config(Some(ADMIN_KEY)))).await;

    for uri in ["/api/portfolios?per_page=abc", "/api/portfolios?page=-1"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
        assert!(body["errors"]["query"].is_array(), "{uri}");
    }

    let req = test::TestRequest::get().uri("/api/portfolios/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_search_wildcards_match_literally() {
    let db = setup_db().await;
    let percent = insert_portfolio(&db, "100% Remote", "remote@example.com").await;
    let underscore = insert_portfolio(&db, "dev_ops", "devops@example.com").await;
    insert_portfolio(&db, "Ayu", "ayu@example.com").await;
    let app = test::init_service(app(db, test_config(Some(ADMIN_KEY)))).await;

    let req = test::TestRequest::get()
        .uri("/api/portfolios/search?q=%25")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["id"], percent.id);

    let req = test::TestRequest::get()
        .uri("/api/portfolios/search?q=_")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["id"], underscore.id);

    let req = test::TestRequest::get()
        .uri("/api/portfolios/filter?skill=%25")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 0);
}
