use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use serde_json::json;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, Json, Query},
    import,
    models::{CreateMovie, DeleteQuery, ImportRequest, MediaType, Movie, MovieChanges, NewMovie, UpdateMovie},
    store::MovieStore,
};

fn store(state: &AppState) -> ApiResult<&MovieStore> {
    state.store.as_ref().ok_or_else(|| {
        ApiError::Configuration(
            "DATABASE_URL is not set; configure it before using the API".to_string(),
        )
    })
}

pub async fn list_movies(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Movie>>> {
    let store = store(&state)?;
    Ok(Json(store.list().await?))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMovie>,
) -> ApiResult<(StatusCode, Json<Movie>)> {
    let store = store(&state)?;
    let new_movie = validate_create(req)?;
    let movie = store.insert(new_movie).await?;
    tracing::info!(id = movie.id, title = %movie.title, "created movie");
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateMovie>,
) -> ApiResult<Json<Movie>> {
    let store = store(&state)?;
    let changes = validate_update(&req)?;
    Ok(Json(store.update(req.id, changes).await?))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let store = store(&state)?;
    let id = query
        .id
        .ok_or_else(|| ApiError::Validation("Movie ID is required".to_string()))?;
    store.delete(id).await?;
    tracing::info!(id, "deleted movie");
    Ok(Json(json!({ "message": "Movie deleted successfully", "id": id })))
}

pub async fn import_movie(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImportRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let store = store(&state)?;
    let movie = import::import_from_link(store, state.omdb.as_ref(), &req.imdb_link).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Movie imported successfully", "movie": movie })),
    ))
}

/// CORS preflight; the CorsLayer fills in the headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Unknown paths still answer with the JSON error envelope.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

fn validate_create(req: CreateMovie) -> ApiResult<NewMovie> {
    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }

    let kind = match req.kind.as_deref() {
        None | Some("movie") => MediaType::Movie,
        Some("series") => MediaType::Series,
        Some(_) => {
            return Err(ApiError::Validation(
                "Type must be either \"movie\" or \"series\"".to_string(),
            ));
        }
    };

    // Zero means "not provided" for both numeric fields.
    let priority = match req.priority {
        None | Some(0) => 3,
        Some(priority) if (1..=5).contains(&priority) => priority,
        Some(_) => {
            return Err(ApiError::Validation(
                "Priority must be between 1 and 5".to_string(),
            ));
        }
    };

    let rating = match req.rating {
        None | Some(0) => None,
        Some(rating) if (1..=10).contains(&rating) => Some(rating),
        Some(_) => {
            return Err(ApiError::Validation(
                "Rating must be between 1 and 10".to_string(),
            ));
        }
    };

    Ok(NewMovie {
        title,
        kind,
        genre: req.genre.map(|g| g.into_vec()).unwrap_or_default(),
        watched: false,
        priority,
        rating,
        review: req.review.unwrap_or_default(),
        poster: None,
    })
}

fn validate_update(req: &UpdateMovie) -> ApiResult<MovieChanges> {
    if let Some(priority) = req.priority {
        if !(1..=5).contains(&priority) {
            return Err(ApiError::Validation(
                "Priority must be between 1 and 5".to_string(),
            ));
        }
    }
    if let Some(Some(rating)) = req.rating {
        if !(1..=10).contains(&rating) {
            return Err(ApiError::Validation(
                "Rating must be between 1 and 10".to_string(),
            ));
        }
    }

    let changes = MovieChanges {
        watched: req.watched,
        // An explicit null resets the review to the empty string.
        review: req.review.clone().map(Option::unwrap_or_default),
        rating: req.rating,
        priority: req.priority,
    };

    if changes.is_empty() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(title: &str) -> CreateMovie {
        CreateMovie {
            title: title.to_string(),
            kind: None,
            genre: None,
            priority: None,
            rating: None,
            review: None,
        }
    }

    #[test]
    fn create_defaults() {
        let new = validate_create(minimal("  Heat  ")).unwrap();
        assert_eq!(new.title, "Heat");
        assert_eq!(new.kind, MediaType::Movie);
        assert!(new.genre.is_empty());
        assert!(!new.watched);
        assert_eq!(new.priority, 3);
        assert_eq!(new.rating, None);
        assert_eq!(new.review, "");
        assert_eq!(new.poster, None);
    }

    #[test]
    fn create_rejects_blank_title() {
        assert!(validate_create(minimal("   ")).is_err());
    }

    #[test]
    fn create_rejects_out_of_range() {
        let mut req = minimal("X");
        req.priority = Some(6);
        assert!(validate_create(req).is_err());

        let mut req = minimal("X");
        req.rating = Some(11);
        assert!(validate_create(req).is_err());

        let mut req = minimal("X");
        req.kind = Some("documentary".to_string());
        assert!(validate_create(req).is_err());
    }

    #[test]
    fn create_treats_zero_as_not_provided() {
        let mut req = minimal("X");
        req.priority = Some(0);
        req.rating = Some(0);
        let new = validate_create(req).unwrap();
        assert_eq!(new.priority, 3);
        assert_eq!(new.rating, None);
    }

    #[test]
    fn update_requires_at_least_one_field() {
        let req: UpdateMovie = serde_json::from_str(r#"{"id":1}"#).unwrap();
        assert!(validate_update(&req).is_err());
    }

    #[test]
    fn update_null_review_becomes_empty_string() {
        let req: UpdateMovie = serde_json::from_str(r#"{"id":1,"review":null}"#).unwrap();
        let changes = validate_update(&req).unwrap();
        assert_eq!(changes.review.as_deref(), Some(""));
    }

    #[test]
    fn update_null_rating_clears() {
        let req: UpdateMovie = serde_json::from_str(r#"{"id":1,"rating":null}"#).unwrap();
        let changes = validate_update(&req).unwrap();
        assert_eq!(changes.rating, Some(None));
    }
}
