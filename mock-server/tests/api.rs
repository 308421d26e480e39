use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Menu, Page, BROKEN_MODEL, UNPUBLISHED_MODEL};
use serde_json::Value;
use tower::ServiceExt;

const TOKEN: &str = "test-token";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header("api-key", TOKEN)
        .body(String::new())
        .unwrap()
}

async fn call(uri: &str) -> axum::response::Response {
    app(TOKEN).oneshot(get(uri)).await.unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_api_key_is_rejected() {
    let resp = app(TOKEN)
        .oneshot(Request::builder().uri("/api/pages/menus").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "Authentication failed");
}

#[tokio::test]
async fn wrong_api_key_is_rejected() {
    let resp = app("other-token").oneshot(get("/api/pages/menus")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let resp = call("/api/nope").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- menus ---

#[tokio::test]
async fn list_menus() {
    let resp = call("/api/pages/menus").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let menus: Vec<Menu> = body_json(resp).await;
    assert_eq!(menus.len(), 2);
    assert_eq!(menus[0].name, "main");
}

#[tokio::test]
async fn get_menu_by_name() {
    let resp = call("/api/pages/menu/footer").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let menu: Menu = body_json(resp).await;
    assert_eq!(menu.links[0].url, "/imprint");
}

#[tokio::test]
async fn get_unknown_menu_returns_error_field() {
    let resp = call("/api/pages/menu/sidebar").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "Menu not found");
}

// --- pages ---

#[tokio::test]
async fn page_lookup_by_id_and_route() {
    let pages: Vec<Page> = body_json(call("/api/pages/pages").await).await;
    let about = pages.iter().find(|p| p.route == "/about").unwrap();

    let resp = call(&format!("/api/pages/page/{}", about.id)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page = body_json(resp).await;
    assert_eq!(page.title, "About");

    let resp = call("/api/pages/page?route=%2Fabout").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page = body_json(resp).await;
    assert_eq!(page.id, about.id);
}

#[tokio::test]
async fn page_by_route_requires_route() {
    let resp = call("/api/pages/page?").await;
    assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn routes_settings_sitemap() {
    let routes: Vec<String> = body_json(call("/api/pages/routes").await).await;
    assert_eq!(routes, vec!["/", "/about", "/imprint"]);

    let settings: Value = body_json(call("/api/pages/settings").await).await;
    assert_eq!(settings, serde_json::json!({}));

    let sitemap: Vec<Value> = body_json(call("/api/pages/sitemap").await).await;
    assert_eq!(sitemap.len(), 3);
}

// --- content ---

#[tokio::test]
async fn content_items_paging() {
    let items: Vec<Value> = body_json(call("/api/content/items/faq?limit=2&skip=1").await).await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["question"], "Question 2");
}

#[tokio::test]
async fn content_items_ignores_other_parameters() {
    let resp = call("/api/content/items/faq?locale=&sort=%7B%7D").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let items: Vec<Value> = body_json(resp).await;
    assert_eq!(items.len(), 5);
}

#[tokio::test]
async fn empty_collection() {
    let items: Vec<Value> = body_json(call("/api/content/items/news").await).await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn unknown_model_is_404() {
    let resp = call("/api/content/items/unknown").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "Model not found");
}

#[tokio::test]
async fn unpublished_model_embeds_error_in_200() {
    let resp = call(&format!("/api/content/items/{UNPUBLISHED_MODEL}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "Model is not published");
}

#[tokio::test]
async fn broken_model_returns_non_json() {
    let resp = call(&format!("/api/content/items/{BROKEN_MODEL}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&bytes).is_err());
}
