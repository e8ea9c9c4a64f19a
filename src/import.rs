use crate::{
    error::{ApiError, ApiResult},
    imdb,
    models::Movie,
    omdb::{self, OmdbApi},
    store::MovieStore,
};

/// Import a movie from a pasted IMDb link: extract the id, fetch and
/// normalize the metadata, reject duplicates, persist. Either a full movie is
/// stored or nothing is.
///
/// The duplicate check runs after the provider fetch, so a 409 still costs
/// one external call. Two concurrent imports of the same title can both pass
/// the check and both insert; accepted race, the store carries no unique
/// constraint on titles.
pub async fn import_from_link(
    store: &MovieStore,
    provider: &dyn OmdbApi,
    raw_link: &str,
) -> ApiResult<Movie> {
    let imdb_id = imdb::extract_imdb_id(raw_link).ok_or_else(|| {
        ApiError::Validation(
            "Could not extract an IMDb ID from the provided link; expected an IMDb URL or an ID like tt3896198"
                .to_string(),
        )
    })?;

    tracing::debug!(%imdb_id, "fetching metadata");
    let payload = provider.fetch_by_imdb_id(&imdb_id).await?;
    let new_movie = omdb::movie_from_payload(payload);

    if let Some(existing) = store.find_by_title_ci(&new_movie.title).await? {
        return Err(ApiError::Conflict(format!(
            "A movie with the title \"{}\" already exists",
            existing.title
        )));
    }

    let movie = store.insert(new_movie).await?;
    tracing::info!(id = movie.id, title = %movie.title, "imported movie");
    Ok(movie)
}
