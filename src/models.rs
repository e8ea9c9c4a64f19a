use serde::{Deserialize, Deserializer, Serialize};

use crate::entities::movie;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
        }
    }

    /// Anything unexpected in storage reads back as `movie`.
    pub fn from_db(raw: &str) -> Self {
        if raw == "series" {
            MediaType::Series
        } else {
            MediaType::Movie
        }
    }
}

/// Canonical API shape of a stored movie.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MediaType,
    pub genre: Vec<String>,
    pub watched: bool,
    pub priority: i32,
    pub rating: Option<i32>,
    pub review: String,
    pub poster: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Movie {
    /// A malformed stored genre value degrades to an empty list; a bad row
    /// must never fail the read.
    pub fn from_row(row: movie::Model) -> Self {
        let genre = match serde_json::from_str::<Vec<String>>(&row.genre) {
            Ok(genre) => genre,
            Err(err) => {
                tracing::warn!(id = row.id, error = %err, "stored genre is not a JSON array, treating as empty");
                Vec::new()
            }
        };

        Self {
            id: row.id,
            title: row.title,
            kind: MediaType::from_db(&row.kind),
            genre,
            watched: row.watched,
            priority: row.priority,
            rating: row.rating,
            review: row.review,
            poster: row.poster,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Everything needed to insert a movie; produced by create validation or by
/// the metadata normalizer.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub kind: MediaType,
    pub genre: Vec<String>,
    pub watched: bool,
    pub priority: i32,
    pub rating: Option<i32>,
    pub review: String,
    pub poster: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMovie {
    pub title: String,
    /// Validated against {movie, series} by the handler rather than parsed
    /// into [`MediaType`] here, so a bad value gets a 400 and not a serde
    /// rejection.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub genre: Option<GenreInput>,
    pub priority: Option<i32>,
    pub rating: Option<i32>,
    pub review: Option<String>,
}

/// Accepts either a genre list or a single bare string.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum GenreInput {
    Many(Vec<String>),
    One(String),
}

impl GenreInput {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            GenreInput::Many(genres) => genres,
            GenreInput::One(genre) => {
                if genre.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![genre]
                }
            }
        }
    }
}

/// Partial update: a field left out of the payload is untouched, while an
/// explicit `null` is a value in its own right (`rating: null` clears the
/// rating, `review: null` resets to the empty string). The double `Option`
/// keeps those cases apart.
#[derive(Debug, Deserialize)]
pub struct UpdateMovie {
    pub id: i32,
    pub watched: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub review: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub rating: Option<Option<i32>>,
    pub priority: Option<i32>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// The validated set of changes handed to the store.
#[derive(Clone, Debug, Default)]
pub struct MovieChanges {
    pub watched: Option<bool>,
    pub review: Option<String>,
    pub rating: Option<Option<i32>>,
    pub priority: Option<i32>,
}

impl MovieChanges {
    pub fn is_empty(&self) -> bool {
        self.watched.is_none()
            && self.review.is_none()
            && self.rating.is_none()
            && self.priority.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    #[serde(rename = "imdbLink")]
    pub imdb_link: String,
}
