//! HTTP API behaviour over a JSON store and an account directory.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use bazaar_backend::Trace;
use bazaar_backend::domain::{CatalogService, CountryCode, TRACE_ID_HEADER};
use bazaar_backend::inbound::http::configure_routes;
use bazaar_backend::inbound::http::error::{json_config, path_config, query_config};
use bazaar_backend::inbound::http::state::HttpState;
use bazaar_backend::outbound::identity::AccountDirectoryResolver;
use bazaar_backend::test_support::cap_fs::read_bytes;
use bazaar_backend::test_support::clock::SteppingClock;
use bazaar_backend::test_support::store::TempStorePath;
use serde_json::{Value, json};

fn state(temp: &TempStorePath) -> HttpState {
    let catalog = Arc::new(CatalogService::new(
        Arc::new(temp.open().expect("open store")),
        Arc::new(SteppingClock::per_minute()),
        CountryCode::default(),
    ));
    let accounts =
        AccountDirectoryResolver::from_accounts([("alice", "wonderland"), ("bob", "builder")])
            .expect("accounts");
    HttpState::new(catalog.clone(), catalog, Arc::new(accounts))
}

macro_rules! api_app {
    ($temp:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state($temp)))
                .app_data(json_config())
                .app_data(query_config())
                .app_data(path_config())
                .wrap(Trace)
                .service(
                    web::scope("/api/v1")
                        .wrap(
                            SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                                .cookie_name("session".to_owned())
                                .cookie_secure(false)
                                .build(),
                        )
                        .configure(configure_routes),
                ),
        )
        .await
    };
}

async fn login<S, B>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

fn lamp() -> Value {
    json!({
        "title": "Desk Lamp",
        "description": "barely used",
        "price": 100,
        "category": "Technology",
        "location": "Dorm A",
        "contactChannel": "+905551112233",
        "images": ["img1"],
    })
}

fn coat() -> Value {
    json!({
        "title": "Winter Coat",
        "description": "warm coat",
        "price": "50",
        "category": "clothing",
        "location": "Dorm B",
        "contactChannel": "bob@x.com",
        "images": ["img2"],
        "sold": true,
    })
}

#[actix_web::test]
async fn walkthrough_over_http_persists_and_enforces_ownership() {
    let temp = TempStorePath::new().expect("temp dir");
    let app = api_app!(&temp);
    let alice = login(&app, "alice", "wonderland").await;
    let bob = login(&app, "bob", "builder").await;

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/listings")
            .cookie(alice.clone())
            .set_json(lamp())
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created_lamp: Value = actix_test::read_body_json(created).await;
    assert_eq!(created_lamp["item"]["ownerUsername"], "alice");
    assert_eq!(created_lamp["item"]["contactChannel"], "+90 555 111 22 33");

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/listings")
            .cookie(bob)
            .set_json(coat())
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created_coat: Value = actix_test::read_body_json(created).await;
    let coat_id = created_coat["item"]["id"].as_u64().expect("coat id");

    let unsold: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/listings?includeSold=false&page=1&pageSize=10")
            .to_request(),
    )
    .await;
    assert_eq!(unsold["totalCount"], 1);
    assert_eq!(unsold["items"][0]["title"], "Desk Lamp");

    let before = read_bytes(temp.path()).expect("document");
    let forbidden = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/listings/{coat_id}"))
            .cookie(alice)
            .set_json(lamp())
            .to_request(),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    assert!(forbidden.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = actix_test::read_body_json(forbidden).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "forbidden");
    assert_eq!(read_bytes(temp.path()).expect("document"), before);

    let reopened = api_app!(&temp);
    let stored: Value = actix_test::call_and_read_body_json(
        &reopened,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/listings/{coat_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(stored["item"]["title"], "Winter Coat");
    assert_eq!(stored["item"]["price"], 50.0);
    assert_eq!(stored["item"]["sold"], true);
}

#[actix_web::test]
async fn wrong_secret_cannot_log_in() {
    let temp = TempStorePath::new().expect("temp dir");
    let app = api_app!(&temp);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": "alice", "password": "guess" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
async fn claimed_owner_needs_a_matching_secret() {
    let temp = TempStorePath::new().expect("temp dir");
    let app = api_app!(&temp);

    let mut body = lamp();
    body["ownerUsername"] = json!("alice");
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/listings")
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/listings")
            .insert_header(("X-Actor-Secret", "wonderland"))
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn deleted_listing_reports_not_found() {
    let temp = TempStorePath::new().expect("temp dir");
    let app = api_app!(&temp);
    let alice = login(&app, "alice", "wonderland").await;

    let created: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/listings")
            .cookie(alice.clone())
            .set_json(lamp())
            .to_request(),
    )
    .await;
    let id = created["item"]["id"].as_u64().expect("id");

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/listings/{id}"))
            .cookie(alice)
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let missing = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/listings/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(missing).await;
    assert_eq!(body["code"], "not_found");
}
