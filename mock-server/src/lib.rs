use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

/// Content model that answers 200 with an `error` field.
pub const UNPUBLISHED_MODEL: &str = "drafts";
/// Content model that answers 200 with a body that is not JSON.
pub const BROKEN_MODEL: &str = "legacy";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Menu {
    pub name: String,
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub route: String,
}

#[derive(Deserialize)]
pub struct PageLookup {
    pub route: Option<String>,
}

#[derive(Deserialize)]
pub struct Paging {
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

pub struct Store {
    pub menus: Vec<Menu>,
    pub pages: Vec<Page>,
    pub collections: HashMap<String, Vec<Value>>,
}

impl Store {
    pub fn seeded() -> Self {
        let link = |title: &str, url: &str| Link {
            title: title.to_string(),
            url: url.to_string(),
        };
        let page = |title: &str, route: &str| Page {
            id: Uuid::new_v4().simple().to_string(),
            title: title.to_string(),
            route: route.to_string(),
        };
        let faq = (1..=5)
            .map(|n| {
                json!({
                    "_id": Uuid::new_v4().simple().to_string(),
                    "question": format!("Question {n}"),
                    "answer": format!("Answer {n}"),
                })
            })
            .collect();

        let mut collections = HashMap::new();
        collections.insert("faq".to_string(), faq);
        collections.insert("news".to_string(), Vec::new());

        Self {
            menus: vec![
                Menu {
                    name: "main".to_string(),
                    links: vec![link("Home", "/"), link("About", "/about")],
                },
                Menu {
                    name: "footer".to_string(),
                    links: vec![link("Imprint", "/imprint")],
                },
            ],
            pages: vec![page("Home", "/"), page("About", "/about"), page("Imprint", "/imprint")],
            collections,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub token: Arc<str>,
    pub store: Arc<Store>,
}

pub fn app(token: &str) -> Router {
    let state = AppState {
        token: Arc::from(token),
        store: Arc::new(Store::seeded()),
    };
    let api = Router::new()
        .route("/pages/menus", get(list_menus))
        .route("/pages/menu/{name}", get(get_menu))
        .route("/pages/pages", get(list_pages))
        .route("/pages/page", get(page_by_route))
        .route("/pages/page/{id}", get(get_page))
        .route("/pages/routes", get(list_routes))
        .route("/pages/settings", get(settings))
        .route("/pages/sitemap", get(sitemap))
        .route("/content/items/{model}", get(content_items))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state);
    Router::new().nest("/api", api)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get("api-key")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|key| key == &*state.token);
    if !authorized {
        tracing::warn!(path = %request.uri().path(), "rejected request without valid api-key");
        return error(StatusCode::UNAUTHORIZED, "Authentication failed");
    }
    next.run(request).await
}

async fn list_menus(State(state): State<AppState>) -> Json<Vec<Menu>> {
    Json(state.store.menus.clone())
}

async fn get_menu(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.store.menus.iter().find(|menu| menu.name == name) {
        Some(menu) => Json(menu.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Menu not found"),
    }
}

async fn list_pages(State(state): State<AppState>) -> Json<Vec<Page>> {
    Json(state.store.pages.clone())
}

async fn get_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.pages.iter().find(|page| page.id == id) {
        Some(page) => Json(page.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Page not found"),
    }
}

async fn page_by_route(State(state): State<AppState>, Query(lookup): Query<PageLookup>) -> Response {
    let Some(route) = lookup.route else {
        return error(StatusCode::PRECONDITION_FAILED, "Missing route parameter");
    };
    match state.store.pages.iter().find(|page| page.route == route) {
        Some(page) => Json(page.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "Page not found"),
    }
}

async fn list_routes(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.store.pages.iter().map(|page| page.route.clone()).collect())
}

async fn settings() -> Json<Value> {
    Json(json!({}))
}

async fn sitemap(State(state): State<AppState>) -> Json<Value> {
    let entries = state
        .store
        .pages
        .iter()
        .map(|page| json!({ "route": page.route, "title": page.title }))
        .collect();
    Json(Value::Array(entries))
}

async fn content_items(
    State(state): State<AppState>,
    Path(model): Path<String>,
    Query(paging): Query<Paging>,
) -> Response {
    tracing::debug!(%model, limit = ?paging.limit, skip = ?paging.skip, "content items");
    match model.as_str() {
        UNPUBLISHED_MODEL => return error(StatusCode::OK, "Model is not published"),
        BROKEN_MODEL => return (StatusCode::OK, "<html><body>maintenance</body></html>").into_response(),
        _ => {}
    }
    let Some(items) = state.store.collections.get(&model) else {
        return error(StatusCode::NOT_FOUND, "Model not found");
    };
    let items: Vec<Value> = items
        .iter()
        .skip(paging.skip.unwrap_or(0))
        .take(paging.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Json(items).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_serializes_id_with_underscore() {
        let page = Page {
            id: "abc".to_string(),
            title: "Home".to_string(),
            route: "/".to_string(),
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["_id"], "abc");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn seeded_store_has_fixtures() {
        let store = Store::seeded();
        assert_eq!(store.menus.len(), 2);
        assert_eq!(store.pages.len(), 3);
        assert_eq!(store.collections["faq"].len(), 5);
        assert!(store.collections["news"].is_empty());
    }

    #[test]
    fn seeded_ids_are_unique() {
        let store = Store::seeded();
        let mut ids: Vec<&str> = store.pages.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), store.pages.len());
    }

    #[test]
    fn paging_fields_are_optional() {
        let paging: Paging = serde_json::from_str("{}").unwrap();
        assert!(paging.limit.is_none());
        assert!(paging.skip.is_none());
    }
}
