//! HTML pages
//!
//! Plain server-rendered markup; every value taken from the spreadsheet is
//! escaped before it is written.

use std::fmt::Write;

use crate::store::{Assignment, Person, Project};

/// Escape text for use in element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        body
    )
}

const BACK_LINK: &str = "<p><a href='/'>Back</a></p>\n";

pub fn index_page(assignments: &[Assignment]) -> String {
    let mut body = String::from(
        "<h1>Assignments</h1>\n<table border=1>\n\
         <tr><th>Person</th><th>Project</th><th>Month</th><th>Fraction</th></tr>\n",
    );
    for a in assignments {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&a.person),
            escape_html(&a.project),
            escape_html(&a.month),
            escape_html(&a.fraction)
        );
    }
    body.push_str("</table>\n");
    body.push_str("<p><a href='/people'>Add Person</a></p>\n");
    body.push_str("<p><a href='/projects'>Add Project</a></p>\n");
    body.push_str("<p><a href='/assign'>Add Assignment</a></p>\n");
    body.push_str("<p><a href='/export_excel'>Export to Excel</a></p>\n");
    body.push_str("<p><a href='/import_csv'>Import CSV</a></p>\n");

    layout("Assignments", &body)
}

/// Listing plus add form, shared by People and Projects
fn names_page(title: &str, names: impl Iterator<Item = String>) -> String {
    let mut body = format!("<h1>{}</h1>\n<ul>", escape_html(title));
    for name in names {
        let _ = write!(body, "<li>{}</li>", escape_html(&name));
    }
    body.push_str("</ul>\n");
    body.push_str(
        "<form method='post'>\n\
         <input name='name' placeholder='Name'>\n\
         <input type='submit' value='Add'>\n\
         </form>\n",
    );
    body.push_str(BACK_LINK);

    layout(title, &body)
}

pub fn people_page(people: &[Person]) -> String {
    names_page("People", people.iter().map(|p| p.name.clone()))
}

pub fn projects_page(projects: &[Project]) -> String {
    names_page("Projects", projects.iter().map(|p| p.name.clone()))
}

fn options(names: impl Iterator<Item = String>) -> String {
    names
        .map(|name| format!("<option>{}</option>", escape_html(&name)))
        .collect()
}

pub fn assign_page(people: &[Person], projects: &[Project]) -> String {
    let mut body = String::from("<h1>Add Assignment</h1>\n<form method='post'>\n");
    let _ = writeln!(
        body,
        "<label>Person</label>\n<select name='person'>{}</select><br>",
        options(people.iter().map(|p| p.name.clone()))
    );
    let _ = writeln!(
        body,
        "<label>Project</label>\n<select name='project'>{}</select><br>",
        options(projects.iter().map(|p| p.name.clone()))
    );
    body.push_str(
        "<label>Month (YYYY-MM)</label>\n<input name='month'><br>\n\
         <label>Fraction</label>\n\
         <input name='fraction' type='number' step='0.1' min='0' max='1'><br>\n\
         <input type='submit' value='Add'>\n\
         </form>\n",
    );
    body.push_str(BACK_LINK);

    layout("Add Assignment", &body)
}

pub fn import_page() -> String {
    let body = String::from(
        "<h1>Import CSV</h1>\n\
         <form method='post' enctype='multipart/form-data'>\n\
         <input type='file' name='file' accept='.csv'>\n\
         <input type='submit' value='Upload'>\n\
         </form>\n",
    ) + BACK_LINK;

    layout("Import CSV", &body)
}

pub fn error_page() -> String {
    layout(
        "Internal Server Error",
        "<h1>Internal Server Error</h1>\n<p>The server encountered an internal error and was unable to complete your request.</p>\n",
    )
}
