use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use leadpulse::api;
use leadpulse::db::{self, AppState};
use leadpulse::meta_ads::MetaAdsClient;
use leadpulse::pixel::PixelClient;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup_test_state(graph_url: &str) -> AppState {
    let conn = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let pixel = PixelClient::new(None, None, "BRL".to_string());
    let ads = MetaAdsClient::new(graph_url);
    AppState::new(conn, pixel, ads)
}

fn test_app(state: AppState) -> Router {
    Router::new().nest("/api", api::api_router(state))
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_list_ad_accounts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/adaccounts"))
        .and(query_param("access_token", "tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {"id": "act_1", "name": "Main Account", "account_status": 1, "currency": "BRL"},
                {"id": "act_2", "name": "Secondary", "account_status": 2, "currency": "USD"}
            ]
        })))
        .mount(&server)
        .await;

    let client = MetaAdsClient::new(server.uri());
    let accounts = client.list_ad_accounts("tok123").await.unwrap();

    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].id, "act_1");
    assert_eq!(accounts[0].currency.as_deref(), Some("BRL"));
}

#[tokio::test]
async fn test_upstream_error_message_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/adaccounts"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {"message": "Invalid OAuth access token.", "type": "OAuthException"}
        })))
        .mount(&server)
        .await;

    let client = MetaAdsClient::new(server.uri());
    let err = client.list_ad_accounts("bad").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid OAuth access token.");
}

#[tokio::test]
async fn test_campaigns_are_merged_with_insights() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/act_1/campaigns"))
        .and(query_param("access_token", "tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {"id": "123", "name": "Summer Sale", "status": "ACTIVE", "objective": "CONVERSIONS"},
                {"id": "456", "name": "Retargeting", "status": "PAUSED", "objective": "TRAFFIC"}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/123/insights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {"impressions": "1000", "clicks": "50", "spend": "123.45", "ctr": "5.0"}
            ]
        })))
        .mount(&server)
        .await;

    // Insights for the second campaign fail; the campaign stays bare.
    Mock::given(method("GET"))
        .and(path("/456/insights"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {"message": "(#100) Unsupported request"}
        })))
        .mount(&server)
        .await;

    let client = MetaAdsClient::new(server.uri());
    let campaigns = client.list_campaigns("tok123", "act_1").await.unwrap();

    assert_eq!(campaigns.len(), 2);

    let summer = campaigns.iter().find(|c| c.id == "123").unwrap();
    let insights = summer.insights.as_ref().unwrap();
    assert_eq!(insights.impressions.as_deref(), Some("1000"));
    assert_eq!(insights.spend.as_deref(), Some("123.45"));

    let retargeting = campaigns.iter().find(|c| c.id == "456").unwrap();
    assert!(retargeting.insights.is_none());
}

#[tokio::test]
async fn test_accounts_endpoint_requires_token() {
    let state = setup_test_state("http://127.0.0.1:9").await;
    let app = test_app(state);

    let req = Request::builder()
        .uri("/api/facebook/accounts")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_accounts_endpoint_proxies_graph_api() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/adaccounts"))
        .and(query_param("access_token", "tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"id": "act_1", "name": "Main", "account_status": 1, "currency": "BRL"}]
        })))
        .mount(&server)
        .await;

    let state = setup_test_state(&server.uri()).await;
    let app = test_app(state);

    let req = Request::builder()
        .uri("/api/facebook/accounts")
        .method("GET")
        .header("authorization", "Bearer tok123")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["accounts"][0]["id"], "act_1");
}

#[tokio::test]
async fn test_campaigns_endpoint_propagates_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/act_1/campaigns"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {"message": "Ad account is not accessible"}
        })))
        .mount(&server)
        .await;

    let state = setup_test_state(&server.uri()).await;
    let app = test_app(state);

    let req = Request::builder()
        .uri("/api/facebook/campaigns?account_id=act_1")
        .method("GET")
        .header("authorization", "Bearer tok123")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Ad account is not accessible");
}

#[tokio::test]
async fn test_campaigns_endpoint_requires_account_id() {
    let state = setup_test_state("http://127.0.0.1:9").await;
    let app = test_app(state);

    let req = Request::builder()
        .uri("/api/facebook/campaigns")
        .method("GET")
        .header("authorization", "Bearer tok123")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
