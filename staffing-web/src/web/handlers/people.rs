//! People listing and add form

use std::sync::Arc;

use anyhow::Context;
use axum::Form;
use axum::extract::State;
use axum::response::{Html, Redirect};

use super::NameForm;
use crate::store::records::{add_person, load_people};
use crate::web::error::AppResult;
use crate::web::pages;
use crate::web::server::AppState;

pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let people = load_people(state.store.as_ref())
        .await
        .context("Failed to load people")?;
    Ok(Html(pages::people_page(&people)))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NameForm>,
) -> AppResult<Redirect> {
    add_person(state.store.as_ref(), &form.name)
        .await
        .context("Failed to add person")?;
    Ok(Redirect::to("/"))
}
