//! Google Sheets client implementing [`TableStore`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};

use super::auth::AuthManager;
use super::error::StoreError;
use super::models::{
    AppendRequest, ApiErrorBody, ServiceAccountKey, SpreadsheetMeta, ValueRange,
};
use crate::store::{Table, TableStore, fill_gaps};

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Handle on one spreadsheet, shared by every request
pub struct SheetsClient {
    http: reqwest::Client,
    auth: AuthManager,
    spreadsheet_id: String,
    base_url: String,
}

impl SheetsClient {
    pub fn new(
        key: ServiceAccountKey,
        spreadsheet_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            auth: AuthManager::new(key, http.clone()),
            http,
            spreadsheet_id: spreadsheet_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at another API host
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn service_account(&self) -> &str {
        self.auth.client_email()
    }

    fn spreadsheet_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}",
            self.base_url,
            urlencoding::encode(&self.spreadsheet_id)
        )
    }

    fn values_url(&self, table: Table) -> String {
        format!(
            "{}/values/{}",
            self.spreadsheet_url(),
            urlencoding::encode(table.sheet_name())
        )
    }

    /// Authorize and send a request, mapping failure statuses to [`StoreError`]
    async fn send(&self, request: RequestBuilder, table: Option<Table>) -> Result<Response, StoreError> {
        let token = self.auth.access_token().await?;
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(self.status_error(status, &body, table))
    }

    fn status_error(&self, status: StatusCode, body: &str, table: Option<Table>) -> StoreError {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Auth { message },
            StatusCode::NOT_FOUND => StoreError::NotFound {
                what: format!("spreadsheet '{}'", self.spreadsheet_id),
            },
            // A missing worksheet makes the range unparseable
            StatusCode::BAD_REQUEST if message.contains("Unable to parse range") => match table {
                Some(table) => StoreError::NotFound {
                    what: format!("worksheet '{}'", table),
                },
                None => StoreError::Api {
                    status: status.as_u16(),
                    message,
                },
            },
            _ => StoreError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Tables whose worksheet is absent from the spreadsheet
    pub async fn missing_tables(&self) -> Result<Vec<Table>, StoreError> {
        let request = self
            .http
            .get(self.spreadsheet_url())
            .query(&[("fields", "sheets.properties.title")]);
        let meta: SpreadsheetMeta = self.send(request, None).await?.json().await?;

        Ok(Table::ALL
            .into_iter()
            .filter(|table| {
                !meta
                    .sheets
                    .iter()
                    .any(|sheet| sheet.properties.title == table.sheet_name())
            })
            .collect())
    }
}

#[async_trait]
impl TableStore for SheetsClient {
    async fn fetch_rows(&self, table: Table) -> Result<Vec<Vec<String>>, StoreError> {
        log::debug!("Fetching rows of '{}'", table);
        let request = self.http.get(self.values_url(table));
        let range: ValueRange = self.send(request, Some(table)).await?.json().await?;

        let mut rows = range.into_rows();
        fill_gaps(&mut rows, table.header().len());
        log::debug!("Fetched {} rows from '{}'", rows.len(), table);
        Ok(rows)
    }

    async fn append_row(&self, table: Table, values: Vec<String>) -> Result<(), StoreError> {
        log::debug!("Appending {} values to '{}'", values.len(), table);
        let request = self
            .http
            .post(format!("{}:append", self.values_url(table)))
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&AppendRequest {
                values: [values.as_slice()],
            });

        self.send(request, Some(table)).await?;
        Ok(())
    }
}
