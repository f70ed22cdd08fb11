use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use common::types::OkAck;
use serde_json::Value;
use service::menu::{MenuItem, MenuRepository};

use crate::errors::ApiError;

type Repo = Arc<dyn MenuRepository>;

/// Menu CRUD, mountable anywhere: `GET /`, `POST /`, `PUT /:id`, `DELETE /:id`.
pub fn router(repo: Repo) -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:id", put(update_item).delete(delete_item))
        .with_state(repo)
}

/// List every menu item.
pub async fn list_items(State(repo): State<Repo>) -> Json<Vec<MenuItem>> {
    Json(repo.list().await)
}

/// Create an item from the request body.
pub async fn create_item(
    State(repo): State<Repo>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    let Json(body) = body?;
    let item = repo.create(body).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Merge the body into an item; `null` when no item has that id.
pub async fn update_item(
    State(repo): State<Repo>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Option<MenuItem>>, ApiError> {
    let Json(body) = body?;
    Ok(Json(repo.update(&id, body).await?))
}

/// Delete an item. Succeeds whether or not it existed.
pub async fn delete_item(State(repo): State<Repo>, Path(id): Path<String>) -> Result<Json<OkAck>, ApiError> {
    repo.delete(&id).await?;
    Ok(Json(OkAck::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use service::menu::MenuStore;
    use tower::ServiceExt;

    async fn app() -> (Router, std::path::PathBuf) {
        let tmp = std::env::temp_dir().join(format!("menu_routes_{}.json", uuid::Uuid::new_v4()));
        let store = MenuStore::new(&tmp).await.expect("store");
        (router(store), tmp)
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn malformed_json_is_a_client_error() {
        let (app, tmp) = app().await;
        let res = app
            .oneshot(
                Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"name\":"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(res).await["error"].is_string());
        let _ = tokio::fs::remove_file(&tmp).await;
    }

    #[tokio::test]
    async fn missing_content_type_is_a_client_error() {
        let (app, tmp) = app().await;
        let res = app
            .oneshot(Request::put("/abc").body(Body::from("{}")).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let _ = tokio::fs::remove_file(&tmp).await;
    }

    #[tokio::test]
    async fn delete_unknown_id_acknowledges() {
        let (app, tmp) = app().await;
        let res = app
            .oneshot(Request::delete("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, serde_json::json!({"ok": true}));
        let _ = tokio::fs::remove_file(&tmp).await;
    }
}
