//! Assignment listing (home page) and add form

use std::sync::Arc;

use anyhow::Context;
use axum::Form;
use axum::extract::State;
use axum::response::{Html, Redirect};

use crate::store::NewAssignment;
use crate::store::records::{add_assignment, load_assignments, load_people, load_projects};
use crate::web::error::AppResult;
use crate::web::pages;
use crate::web::server::AppState;

pub async fn index(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let assignments = load_assignments(state.store.as_ref())
        .await
        .context("Failed to load assignments")?;
    Ok(Html(pages::index_page(&assignments)))
}

/// Form with the current people and projects as options
pub async fn form(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let store = state.store.as_ref();
    let people = load_people(store).await.context("Failed to load people")?;
    let projects = load_projects(store)
        .await
        .context("Failed to load projects")?;
    Ok(Html(pages::assign_page(&people, &projects)))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Form(submission): Form<NewAssignment>,
) -> AppResult<Redirect> {
    add_assignment(state.store.as_ref(), submission)
        .await
        .context("Failed to add assignment")?;
    Ok(Redirect::to("/"))
}
