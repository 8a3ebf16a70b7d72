//! One module per page

pub mod assignments;
pub mod people;
pub mod projects;
pub mod transfer;

use serde::Deserialize;

/// Form with a single `name` field; a missing field is treated as empty
#[derive(Debug, Deserialize)]
pub struct NameForm {
    #[serde(default)]
    pub name: String,
}
