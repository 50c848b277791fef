use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::warn;

use crate::{
    AppState,
    entities::movie,
    error::AppResult,
    flash::{self, Flash},
    models::{MovieForm, MovieUpdate, NewMovie, SearchQuery, UserForm},
    templates,
};

pub async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<Response> {
    let users = state.store.get_users().await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, Html(templates::index_page(&users, &flash))).into_response())
}

/// Plain-text user dump, kept from the original deployment as a quick
/// diagnostic route.
pub async fn list_users_plain(State(state): State<AppState>) -> AppResult<String> {
    let users = state.store.get_users().await?;
    let names: Vec<String> = users.iter().map(|u| format!("<User {}>", u.name)).collect();
    Ok(format!("[{}]", names.join(", ")))
}

pub async fn create_user(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<UserForm>,
) -> AppResult<(SignedCookieJar, Redirect)> {
    let name = form.name.trim();

    if name.is_empty() {
        return Ok((flash::push_error(jar, "Please enter a user name."), Redirect::to("/")));
    }
    if name.chars().count() > 100 {
        return Ok((
            flash::push_error(jar, "User name must be at most 100 characters."),
            Redirect::to("/"),
        ));
    }

    let jar = match state.store.create_user(name).await {
        Ok(user) => flash::push_success(jar, format!("User \"{}\" created successfully!", user.name)),
        Err(err) => {
            warn!(error = %err, "failed to create user");
            flash::push_error(jar, "Error creating user.")
        }
    };

    Ok((jar, Redirect::to("/")))
}

pub async fn list_movies(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Query(query): Query<SearchQuery>,
    jar: SignedCookieJar,
) -> AppResult<Response> {
    let Some(user) = state.store.get_user_by_id(user_id).await? else {
        return Ok((flash::push_error(jar, "User not found."), Redirect::to("/")).into_response());
    };

    let q = query.q.trim();
    let movies = if q.is_empty() {
        state.store.get_movies(user_id).await?
    } else {
        state.store.search_movies(user_id, q).await?
    };

    let (jar, flash) = flash::take(jar);
    let jar = flash::remember_user(jar, user_id);
    Ok((jar, Html(templates::movies_page(&user, &movies, q, &flash))).into_response())
}

pub async fn add_movie_form(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    jar: SignedCookieJar,
) -> AppResult<Response> {
    let Some(user) = state.store.get_user_by_id(user_id).await? else {
        return Ok((flash::push_error(jar, "User not found."), Redirect::to("/")).into_response());
    };

    let (jar, flash) = flash::take(jar);
    Ok((jar, Html(templates::add_movie_page(&user, &flash))).into_response())
}

/// POST `/users/{id}/movies` — add from the list page.
pub async fn add_movie_from_list(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    jar: SignedCookieJar,
    Form(form): Form<MovieForm>,
) -> AppResult<Response> {
    submit_movie(state, jar, user_id, form, false).await
}

/// POST `/users/{id}/add_movie` — add from the dedicated form; flashes
/// when OMDb filled in missing fields.
pub async fn add_movie_submit(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    jar: SignedCookieJar,
    Form(form): Form<MovieForm>,
) -> AppResult<Response> {
    submit_movie(state, jar, user_id, form, true).await
}

async fn submit_movie(
    state: AppState,
    jar: SignedCookieJar,
    user_id: i32,
    form: MovieForm,
    announce_fetch: bool,
) -> AppResult<Response> {
    let Some(user) = state.store.get_user_by_id(user_id).await? else {
        return Ok((flash::push_error(jar, "User not found."), Redirect::to("/")).into_response());
    };

    let name = form.name.trim().to_string();
    let mut director = form.director.trim().to_string();
    let mut year = form.year.trim().to_string();
    let mut poster_url = form.poster_url.trim().to_string();
    let mut jar = jar;

    // A title with a missing director or year triggers the OMDb lookup;
    // only the still-blank fields are filled.
    if !name.is_empty() && (director.is_empty() || year.is_empty()) {
        if let Some(data) = state.omdb.lookup(&name).await.into_data() {
            if director.is_empty() && !data.director.is_empty() {
                director = data.director;
            }
            if year.is_empty() {
                if let Some(found_year) = data.year {
                    year = found_year.to_string();
                }
            }
            if poster_url.is_empty() {
                if let Some(found_poster) = data.poster_url {
                    poster_url = found_poster;
                }
            }
            if announce_fetch {
                jar = flash::push_success(jar, "Movie details fetched from OMDb!");
            }
        }
    }

    if name.is_empty() || director.is_empty() || year.is_empty() {
        let flash = Flash::error(
            "Please fill in all required fields (or provide a movie title for OMDb lookup).",
        );
        return Ok((jar, Html(templates::add_movie_page(&user, &Some(flash)))).into_response());
    }

    let Some(year) = parse_year(&year) else {
        let flash = Flash::error("Please enter a valid year.");
        return Ok((jar, Html(templates::add_movie_page(&user, &Some(flash)))).into_response());
    };

    if let Some(message) = length_error(&name, &director, &poster_url) {
        let flash = Flash::error(message);
        return Ok((jar, Html(templates::add_movie_page(&user, &Some(flash)))).into_response());
    }

    let new_movie = NewMovie {
        name,
        director,
        year,
        poster_url: (!poster_url.is_empty()).then_some(poster_url),
    };

    match state.store.add_movie(user_id, new_movie).await {
        Ok(Some(movie)) => {
            let jar =
                flash::push_success(jar, format!("Movie \"{}\" added successfully!", movie.name));
            Ok((jar, Redirect::to(&movies_path(user_id))).into_response())
        }
        Ok(None) => {
            Ok((flash::push_error(jar, "User not found."), Redirect::to("/")).into_response())
        }
        Err(err) => {
            warn!(error = %err, user_id = user_id, "failed to add movie");
            let flash = Flash::error("Error adding movie.");
            Ok((jar, Html(templates::add_movie_page(&user, &Some(flash)))).into_response())
        }
    }
}

pub async fn edit_movie_form(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
    jar: SignedCookieJar,
) -> AppResult<Response> {
    let Some(movie) = owned_movie(&state, user_id, movie_id).await? else {
        return Ok(
            (flash::push_error(jar, "Movie not found."), Redirect::to(&movies_path(user_id)))
                .into_response(),
        );
    };

    let (jar, flash) = flash::take(jar);
    Ok((jar, Html(templates::edit_movie_page(user_id, &movie, &flash))).into_response())
}

pub async fn update_movie_submit(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
    jar: SignedCookieJar,
    Form(form): Form<MovieForm>,
) -> AppResult<Response> {
    let Some(movie) = owned_movie(&state, user_id, movie_id).await? else {
        return Ok(
            (flash::push_error(jar, "Movie not found."), Redirect::to(&movies_path(user_id)))
                .into_response(),
        );
    };

    let name = form.name.trim().to_string();
    let director = form.director.trim().to_string();
    let year = form.year.trim().to_string();
    let poster_url = form.poster_url.trim().to_string();

    if name.is_empty() || director.is_empty() || year.is_empty() {
        let flash = Flash::error("Please fill in all required fields.");
        return Ok(
            (jar, Html(templates::edit_movie_page(user_id, &movie, &Some(flash)))).into_response()
        );
    }

    let Some(year) = parse_year(&year) else {
        let flash = Flash::error("Please enter a valid year.");
        return Ok(
            (jar, Html(templates::edit_movie_page(user_id, &movie, &Some(flash)))).into_response()
        );
    };

    if let Some(message) = length_error(&name, &director, &poster_url) {
        let flash = Flash::error(message);
        return Ok(
            (jar, Html(templates::edit_movie_page(user_id, &movie, &Some(flash)))).into_response()
        );
    }

    let fields = MovieUpdate {
        name: Some(name),
        director: Some(director),
        year: Some(year),
        poster_url: Some((!poster_url.is_empty()).then_some(poster_url)),
    };

    match state.store.update_movie(movie_id, fields).await {
        Ok(Some(updated)) => {
            let jar = flash::push_success(
                jar,
                format!("Movie \"{}\" updated successfully!", updated.name),
            );
            Ok((jar, Redirect::to(&movies_path(user_id))).into_response())
        }
        Ok(None) => Ok(
            (flash::push_error(jar, "Movie not found."), Redirect::to(&movies_path(user_id)))
                .into_response(),
        ),
        Err(err) => {
            warn!(error = %err, movie_id = movie_id, "failed to update movie");
            let flash = Flash::error("Error updating movie.");
            Ok((jar, Html(templates::edit_movie_page(user_id, &movie, &Some(flash))))
                .into_response())
        }
    }
}

pub async fn delete_movie(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
    jar: SignedCookieJar,
) -> AppResult<(SignedCookieJar, Redirect)> {
    let Some(movie) = owned_movie(&state, user_id, movie_id).await? else {
        return Ok((
            flash::push_error(jar, "Movie not found."),
            Redirect::to(&movies_path(user_id)),
        ));
    };

    let jar = match state.store.delete_movie(movie_id).await {
        Ok(true) => {
            flash::push_success(jar, format!("Movie \"{}\" deleted successfully!", movie.name))
        }
        Ok(false) => flash::push_error(jar, "Movie not found."),
        Err(err) => {
            warn!(error = %err, movie_id = movie_id, "failed to delete movie");
            flash::push_error(jar, "Error deleting movie.")
        }
    };

    Ok((jar, Redirect::to(&movies_path(user_id))))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    jar: SignedCookieJar,
) -> AppResult<(SignedCookieJar, Redirect)> {
    let Some(user) = state.store.get_user_by_id(user_id).await? else {
        return Ok((flash::push_error(jar, "User not found."), Redirect::to("/")));
    };

    let jar = match state.store.delete_user(user_id).await {
        Ok(true) => {
            // Drop the session marker if it pointed at the deleted user
            let jar = if flash::remembered_user(&jar) == Some(user_id) {
                flash::forget_user(jar)
            } else {
                jar
            };
            flash::push_success(
                jar,
                format!("User \"{}\" and all their movies deleted successfully!", user.name),
            )
        }
        Ok(false) => flash::push_error(jar, "User not found."),
        Err(err) => {
            warn!(error = %err, user_id = user_id, "failed to delete user");
            flash::push_error(jar, "Error deleting user.")
        }
    };

    Ok((jar, Redirect::to("/")))
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(templates::not_found_page()))
}

async fn owned_movie(
    state: &AppState,
    user_id: i32,
    movie_id: i32,
) -> AppResult<Option<movie::Model>> {
    Ok(state.store.get_movie(movie_id).await?.filter(|m| m.user_id == user_id))
}

fn movies_path(user_id: i32) -> String {
    format!("/users/{user_id}/movies")
}

fn parse_year(raw: &str) -> Option<i32> {
    let year = raw.parse::<i32>().ok()?;
    (1800..=2099).contains(&year).then_some(year)
}

fn length_error(name: &str, director: &str, poster_url: &str) -> Option<&'static str> {
    if name.chars().count() > 200 {
        return Some("Movie name must be at most 200 characters.");
    }
    if director.chars().count() > 100 {
        return Some("Director must be at most 100 characters.");
    }
    if poster_url.chars().count() > 500 {
        return Some("Poster URL must be at most 500 characters.");
    }
    None
}
