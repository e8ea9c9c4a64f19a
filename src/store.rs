use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set, Unchanged},
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    sea_query::{Expr, Func},
};

use crate::{
    entities::movie,
    error::{ApiError, ApiResult},
    models::{Movie, MovieChanges, NewMovie},
};

/// Owns all persistence for the movies table. One connection-pool handle,
/// injected at startup; each call runs a single statement.
#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// All movies, newest first.
    pub async fn list(&self) -> ApiResult<Vec<Movie>> {
        let rows = movie::Entity::find()
            .order_by_desc(movie::Column::CreatedAt)
            .order_by_desc(movie::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Movie::from_row).collect())
    }

    pub async fn insert(&self, new: NewMovie) -> ApiResult<Movie> {
        let now = now_rfc3339();
        let model = movie::ActiveModel {
            id: NotSet,
            title: Set(new.title),
            kind: Set(new.kind.as_str().to_string()),
            genre: Set(serialize_genre(&new.genre)),
            watched: Set(new.watched),
            priority: Set(new.priority),
            rating: Set(new.rating),
            review: Set(new.review),
            poster: Set(new.poster),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let row = model.insert(&self.db).await?;
        Ok(Movie::from_row(row))
    }

    /// Partial update: only fields carried by `changes` are touched;
    /// `updated_at` is always refreshed.
    pub async fn update(&self, id: i32, changes: MovieChanges) -> ApiResult<Movie> {
        let mut model = movie::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };

        if let Some(watched) = changes.watched {
            model.watched = Set(watched);
        }
        if let Some(review) = changes.review {
            model.review = Set(review);
        }
        if let Some(rating) = changes.rating {
            model.rating = Set(rating);
        }
        if let Some(priority) = changes.priority {
            model.priority = Set(priority);
        }
        model.updated_at = Set(now_rfc3339());

        match movie::Entity::update(model).exec(&self.db).await {
            Ok(row) => Ok(Movie::from_row(row)),
            Err(DbErr::RecordNotUpdated) => {
                Err(ApiError::NotFound("Movie not found".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete(&self, id: i32) -> ApiResult<()> {
        let result = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ApiError::NotFound("Movie not found".to_string()));
        }
        Ok(())
    }

    /// Case-insensitive exact title match; backs the soft duplicate check at
    /// import time (there is no unique constraint on the column).
    pub async fn find_by_title_ci(&self, title: &str) -> ApiResult<Option<Movie>> {
        let row = movie::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(movie::Column::Title)))
                    .eq(title.to_lowercase()),
            )
            .one(&self.db)
            .await?;
        Ok(row.map(Movie::from_row))
    }
}

fn serialize_genre(genre: &[String]) -> String {
    serde_json::to_string(genre).unwrap_or_else(|_| "[]".to_string())
}

/// Whole-second precision keeps the stored strings uniform, so lexicographic
/// order in SQL matches chronological order; same-second creates fall back to
/// the id tiebreak in `list`.
fn now_rfc3339() -> String {
    let now = jiff::Timestamp::now();
    now.round(jiff::Unit::Second).unwrap_or(now).to_string()
}
