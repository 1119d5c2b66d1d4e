//! HTTP routes.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request, State,
    },
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use filmhub_domain::{Film, FilmDraft, FilmId, Genre, GenreId, Mpa, MpaId, User, UserDraft, UserId};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;

use crate::app::App;
use crate::use_cases::ServiceError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        // Films
        .route("/films", get(list_films).post(create_film).put(update_film))
        .route("/films/popular", get(popular_films))
        .route("/films/{id}", get(get_film))
        .route(
            "/films/{id}/like/{user_id}",
            put(add_like).delete(remove_like),
        )
        // Users
        .route("/users", get(list_users).post(create_user).put(update_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/friends", get(list_friends))
        .route(
            "/users/{id}/friends/{friend_id}",
            put(add_friend).delete(remove_friend),
        )
        .route(
            "/users/{id}/friends/common/{other_id}",
            get(list_mutual_friends),
        )
        // Reference data
        .route("/genres", get(list_genres))
        .route("/genres/{id}", get(get_genre))
        .route("/mpa", get(list_mpa))
        .route("/mpa/{id}", get(get_mpa))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Films
// =============================================================================

async fn list_films(State(app): State<Arc<App>>) -> Result<Json<Vec<Film>>, ApiError> {
    Ok(Json(app.use_cases.popularity.list_films().await?))
}

async fn get_film(
    State(app): State<Arc<App>>,
    ApiPath(id): ApiPath<FilmId>,
) -> Result<Json<Film>, ApiError> {
    Ok(Json(app.use_cases.popularity.get_film(id).await?))
}

async fn create_film(
    State(app): State<Arc<App>>,
    ApiJson(draft): ApiJson<FilmDraft>,
) -> Result<(StatusCode, Json<Film>), ApiError> {
    let film = app.use_cases.popularity.create_film(draft).await?;
    Ok((StatusCode::CREATED, Json(film)))
}

async fn update_film(
    State(app): State<Arc<App>>,
    ApiJson(draft): ApiJson<FilmDraft>,
) -> Result<Json<Film>, ApiError> {
    Ok(Json(app.use_cases.popularity.update_film(draft).await?))
}

async fn add_like(
    State(app): State<Arc<App>>,
    ApiPath((id, user_id)): ApiPath<(FilmId, UserId)>,
) -> Result<StatusCode, ApiError> {
    app.use_cases.popularity.add_like(id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_like(
    State(app): State<Arc<App>>,
    ApiPath((id, user_id)): ApiPath<(FilmId, UserId)>,
) -> Result<StatusCode, ApiError> {
    app.use_cases.popularity.remove_like(id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
struct PopularQuery {
    count: Option<i64>,
}

async fn popular_films(
    State(app): State<Arc<App>>,
    ApiQuery(query): ApiQuery<PopularQuery>,
) -> Result<Json<Vec<Film>>, ApiError> {
    Ok(Json(
        app.use_cases.popularity.get_most_popular(query.count).await?,
    ))
}

// =============================================================================
// Users
// =============================================================================

async fn list_users(State(app): State<Arc<App>>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(app.use_cases.social.list_users().await?))
}

async fn get_user(
    State(app): State<Arc<App>>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(app.use_cases.social.get_user(id).await?))
}

async fn create_user(
    State(app): State<Arc<App>>,
    ApiJson(draft): ApiJson<UserDraft>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = app.use_cases.social.create_user(draft).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(app): State<Arc<App>>,
    ApiJson(draft): ApiJson<UserDraft>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(app.use_cases.social.update_user(draft).await?))
}

async fn add_friend(
    State(app): State<Arc<App>>,
    ApiPath((id, friend_id)): ApiPath<(UserId, UserId)>,
) -> Result<StatusCode, ApiError> {
    app.use_cases.social.add_friend(id, friend_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_friend(
    State(app): State<Arc<App>>,
    ApiPath((id, friend_id)): ApiPath<(UserId, UserId)>,
) -> Result<StatusCode, ApiError> {
    app.use_cases.social.remove_friend(id, friend_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_friends(
    State(app): State<Arc<App>>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(app.use_cases.social.list_friends(id).await?))
}

async fn list_mutual_friends(
    State(app): State<Arc<App>>,
    ApiPath((id, other_id)): ApiPath<(UserId, UserId)>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(
        app.use_cases.social.list_mutual_friends(id, other_id).await?,
    ))
}

// =============================================================================
// Reference data
// =============================================================================

async fn list_genres(State(app): State<Arc<App>>) -> Result<Json<Vec<Genre>>, ApiError> {
    Ok(Json(app.use_cases.catalog.list_genres().await?))
}

async fn get_genre(
    State(app): State<Arc<App>>,
    ApiPath(id): ApiPath<GenreId>,
) -> Result<Json<Genre>, ApiError> {
    Ok(Json(app.use_cases.catalog.get_genre(id).await?))
}

async fn list_mpa(State(app): State<Arc<App>>) -> Result<Json<Vec<Mpa>>, ApiError> {
    Ok(Json(app.use_cases.catalog.list_mpa().await?))
}

async fn get_mpa(
    State(app): State<Arc<App>>,
    ApiPath(id): ApiPath<MpaId>,
) -> Result<Json<Mpa>, ApiError> {
    Ok(Json(app.use_cases.catalog.get_mpa(id).await?))
}

// =============================================================================
// Extractors
// =============================================================================

/// `Path` whose rejection is answered with the JSON error body.
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// `Query` whose rejection is answered with the JSON error body.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// `Json` whose rejection is answered with the JSON error body.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

// =============================================================================
// Errors
// =============================================================================

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub description: String,
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::NotFound(msg) => ErrorBody {
                error: "Not found".to_string(),
                description: msg.clone(),
            },
            ApiError::BadRequest(msg) => ErrorBody {
                error: "Validation error".to_string(),
                description: msg.clone(),
            },
            // Storage details stay in the log.
            ApiError::Internal(_) => ErrorBody {
                error: "Internal error".to_string(),
                description: "An unexpected error occurred".to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let ApiError::Internal(msg) = &self {
            tracing::error!(error = %msg, "Request failed");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            err @ ServiceError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            ServiceError::Repo(err) => ApiError::Internal(err.to_string()),
        }
    }
}
