use crate::errors::CineStreamError;
use crate::events::CineStreamEvent;
use crate::state::CineStreamState;
use crate::types::{Movie, MovieView};

pub const DEFAULT_PAGE_LIMIT: u32 = 50;
pub const MAX_PAGE_LIMIT: u32 = 100;

pub fn add_movie(
    state: &mut CineStreamState,
    title: String,
    description: String,
    url: String,
) -> Result<(), CineStreamError> {
    state.assert_owner()?;
    if title.is_empty() {
        return Err(CineStreamError::EmptyTitle);
    }
    if state.movies.contains_key(&title) {
        return Err(CineStreamError::MovieAlreadyExists);
    }
    state.movies.insert(
        title.clone(),
        Movie {
            description: description.clone(),
            url: url.clone(),
        },
    );
    CineStreamEvent::MovieAdded {
        title,
        description,
        url,
    }
    .emit();
    Ok(())
}

pub fn remove_movie(state: &mut CineStreamState, title: String) -> Result<(), CineStreamError> {
    state.assert_owner()?;
    if state.movies.remove(&title).is_none() {
        return Err(CineStreamError::MovieDoesNotExist);
    }
    CineStreamEvent::MovieRemoved { title }.emit();
    Ok(())
}

pub fn get_movies(
    state: &CineStreamState,
    from_index: Option<u32>,
    limit: Option<u32>,
) -> Vec<MovieView> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT);
    state
        .movies
        .iter()
        .skip(from_index.unwrap_or(0) as usize)
        .take(limit as usize)
        .map(|(title, movie)| MovieView::new(title, movie))
        .collect()
}
