use axum::{
    Router,
    extract::{
        Form, Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    AppState, csrf,
    error::{AppError, AppResult},
    forms::{AddForm, EditForm, FormErrors},
    models::NewMovie,
    templates,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/edit/{id}", get(edit_form).post(edit_submit))
        .route("/delete", get(delete))
        .route("/add", get(add_form).post(add_submit))
        .route("/select", get(select))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    id: i32,
}

#[derive(Debug, Deserialize)]
pub struct ExternalIdQuery {
    id: i64,
}

pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let movies = state.store.list_ranked().await?;
    Ok(Html(templates::index_page(&movies)))
}

pub async fn edit_form(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    jar: SignedCookieJar,
) -> AppResult<(SignedCookieJar, Html<String>)> {
    let Path(id) = path?;
    let movie = state.store.get(id).await?.ok_or(AppError::NotFound(id))?;
    let (jar, token) = csrf::issue(jar);
    let form = EditForm::prefill(&movie);
    Ok((jar, Html(templates::edit_page(&movie, &form, &FormErrors::default(), &token))))
}

pub async fn edit_submit(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    jar: SignedCookieJar,
    Form(form): Form<EditForm>,
) -> AppResult<Response> {
    let Path(id) = path?;
    csrf::verify(&jar, &form.csrf_token)?;
    let movie = state.store.get(id).await?.ok_or(AppError::NotFound(id))?;

    match form.validate() {
        Ok(edit) => {
            state.store.update_review(id, edit.rating, &edit.review).await?;
            info!(id, rating = edit.rating, "updated review");
            Ok(Redirect::to("/").into_response())
        },
        Err(errors) => {
            let body = templates::edit_page(&movie, &form, &errors, &form.csrf_token);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response())
        },
    }
}

pub async fn delete(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> AppResult<Redirect> {
    let Query(q) = query?;
    state.store.delete(q.id).await?;
    info!(id = q.id, "deleted movie");
    Ok(Redirect::to("/"))
}

pub async fn add_form(jar: SignedCookieJar) -> (SignedCookieJar, Html<String>) {
    let (jar, token) = csrf::issue(jar);
    let body = templates::add_page(&AddForm::default(), &FormErrors::default(), &token);
    (jar, Html(body))
}

pub async fn add_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<AddForm>,
) -> AppResult<Response> {
    csrf::verify(&jar, &form.csrf_token)?;

    let title = match form.validate() {
        Ok(title) => title,
        Err(errors) => {
            let body = templates::add_page(&form, &errors, &form.csrf_token);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
        },
    };

    match state.tmdb.search_movie(&title).await {
        Ok(candidates) => Ok(Html(templates::select_page(&title, &candidates)).into_response()),
        Err(err @ AppError::Upstream(_)) => {
            tracing::warn!(%title, error = %err, "title search failed");
            let errors =
                FormErrors::for_form("Could not reach the movie database. Please try again.");
            let body = templates::add_page(&form, &errors, &form.csrf_token);
            Ok((StatusCode::BAD_GATEWAY, Html(body)).into_response())
        },
        Err(err) => Err(err),
    }
}

pub async fn select(
    State(state): State<AppState>,
    query: Result<Query<ExternalIdQuery>, QueryRejection>,
) -> AppResult<Redirect> {
    let Query(q) = query?;
    let details = state.tmdb.movie_details(q.id).await?;
    let new = NewMovie::from_details(details, &state.config.tmdb_image_base_url);
    let title = new.title.clone();

    let id = state.store.create(new).await?;
    info!(id, external_id = q.id, %title, "added movie");
    Ok(Redirect::to(&format!("/edit/{id}")))
}
