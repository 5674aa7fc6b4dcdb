use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use chrono::Utc;
use letterboxd_export_core::{export_watched, resolver};
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Deserialize)]
pub struct ExportForm {
    pub username: Option<String>,
}

/// Account picker: the owner plus every non-managed shared account.
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let accounts = resolver::list_accounts(&state.auth).await?;

    let options: String = accounts
        .iter()
        .map(|account| {
            let name = escape_html(&account.username);
            format!("<option value=\"{name}\">{name}</option>")
        })
        .collect();

    Ok(Html(format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><title>Export watched movies</title></head>\n\
         <body>\n\
         <h1>Export watched movies</h1>\n\
         <form action=\"/export\" method=\"post\">\n\
         <label for=\"username\">Account</label>\n\
         <select id=\"username\" name=\"username\">{options}</select>\n\
         <button type=\"submit\">Download CSV</button>\n\
         </form>\n\
         </body>\n\
         </html>\n"
    )))
}

/// Run an export for the selected account and stream the CSV back as a
/// downloadable attachment.
pub async fn export(
    State(state): State<AppState>,
    Form(form): Form<ExportForm>,
) -> AppResult<Response> {
    let username = form
        .username
        .filter(|name| !name.trim().is_empty())
        .ok_or(AppError::MissingUsername)?;

    let session = resolver::resolve_session(&state.auth, Some(&username)).await?;
    let sections = vec![state.auth.library_or_default().to_string()];
    let outcome = export_watched(&session, &sections, None).await?;

    info!(user = %username, rows = outcome.rows, "export downloaded");

    let filename = format!(
        "{}_{}_watched_movies.csv",
        username,
        Utc::now().format("%Y-%m-%d")
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename.replace('"', "")),
            ),
        ],
        outcome.csv,
    )
        .into_response())
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a&b<c>\"d\""), "a&amp;b&lt;c&gt;&quot;d&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
