use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    bookmarks::{
        dto::{BookmarkResponse, CreateBookmarkRequest, EditBookmarkRequest},
        repo::Bookmark,
    },
    error::ApiError,
    json::JsonBody,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookmarks", get(list_bookmarks).post(create_bookmark))
        .route(
            "/bookmarks/:id",
            get(get_bookmark)
                .patch(edit_bookmark)
                .delete(delete_bookmark),
        )
}

#[instrument(skip(state))]
pub async fn list_bookmarks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<BookmarkResponse>>, ApiError> {
    let bookmarks = Bookmark::list_by_user(&state.db, user_id).await?;
    Ok(Json(bookmarks.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_bookmark(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(payload): JsonBody<CreateBookmarkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.title.trim().is_empty() {
        warn!(%user_id, "bookmark title empty");
        return Err(ApiError::Validation("title must not be empty".into()));
    }
    if payload.link.trim().is_empty() {
        warn!(%user_id, "bookmark link empty");
        return Err(ApiError::Validation("link must not be empty".into()));
    }

    let bookmark = Bookmark::create(
        &state.db,
        user_id,
        &payload.title,
        &payload.link,
        payload.description.as_deref(),
    )
    .await?;

    info!(%user_id, bookmark_id = %bookmark.id, "bookmark created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/bookmarks/{}", bookmark.id))],
        Json(BookmarkResponse::from(bookmark)),
    ))
}

#[instrument(skip(state))]
pub async fn get_bookmark(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookmarkResponse>, ApiError> {
    let bookmark = Bookmark::find_by_id(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(bookmark.into()))
}

#[instrument(skip(state, payload))]
pub async fn edit_bookmark(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<EditBookmarkRequest>,
) -> Result<Json<BookmarkResponse>, ApiError> {
    if matches!(&payload.title, Some(v) if v.trim().is_empty()) {
        return Err(ApiError::Validation("title must not be empty".into()));
    }
    if matches!(&payload.link, Some(v) if v.trim().is_empty()) {
        return Err(ApiError::Validation("link must not be empty".into()));
    }

    let bookmark = Bookmark::update(
        &state.db,
        user_id,
        id,
        payload.title.as_deref(),
        payload.link.as_deref(),
        payload.description.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound)?;

    info!(%user_id, bookmark_id = %id, "bookmark updated");
    Ok(Json(bookmark.into()))
}

#[instrument(skip(state))]
pub async fn delete_bookmark(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !Bookmark::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound);
    }
    info!(%user_id, bookmark_id = %id, "bookmark deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRef;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::auth::jwt::JwtKeys;

    fn app(state: AppState) -> Router {
        routes().with_state(state)
    }

    fn bearer(state: &AppState) -> String {
        let token = JwtKeys::from_ref(state)
            .sign(Uuid::new_v4())
            .expect("sign");
        format!("Bearer {token}")
    }

    #[tokio::test]
    async fn all_routes_require_token() {
        for (method, uri) in [
            ("GET", "/bookmarks"),
            ("POST", "/bookmarks"),
            (
                "GET",
                "/bookmarks/00000000-0000-0000-0000-000000000000",
            ),
            (
                "PATCH",
                "/bookmarks/00000000-0000-0000-0000-000000000000",
            ),
            (
                "DELETE",
                "/bookmarks/00000000-0000-0000-0000-000000000000",
            ),
        ] {
            let response = app(AppState::fake())
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .body(Body::empty())
                        .expect("request"),
                )
                .await
                .expect("response");
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{method} {uri}"
            );
        }
    }

    #[tokio::test]
    async fn create_rejects_missing_title() {
        let state = AppState::fake();
        let auth = bearer(&state);
        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/bookmarks")
                    .header("authorization", auth)
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"link":"https://example.com"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_rejects_empty_link() {
        let state = AppState::fake();
        let auth = bearer(&state);
        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/bookmarks")
                    .header("authorization", auth)
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title":"first bookmark","link":"  "}"#))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_uuid_id_is_bad_request() {
        let state = AppState::fake();
        let auth = bearer(&state);
        let response = app(state)
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/bookmarks/not-a-uuid")
                    .header("authorization", auth)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
