//! Projects listing and add form

use std::sync::Arc;

use anyhow::Context;
use axum::Form;
use axum::extract::State;
use axum::response::{Html, Redirect};

use super::NameForm;
use crate::store::records::{add_project, load_projects};
use crate::web::error::AppResult;
use crate::web::pages;
use crate::web::server::AppState;

pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let projects = load_projects(state.store.as_ref())
        .await
        .context("Failed to load projects")?;
    Ok(Html(pages::projects_page(&projects)))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NameForm>,
) -> AppResult<Redirect> {
    add_project(state.store.as_ref(), &form.name)
        .await
        .context("Failed to add project")?;
    Ok(Redirect::to("/"))
}
