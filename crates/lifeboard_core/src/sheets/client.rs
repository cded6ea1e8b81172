//! Worksheet value operations over the Sheets v4 REST API.

use super::{SheetsError, SheetsResult, TokenSource};
use crate::http::error_body;
use log::{debug, error};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const MISSING_RANGE_MARKER: &str = "Unable to parse range";
const MAX_ERROR_CHARS: usize = 300;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct ValueRangeBody<'a> {
    values: &'a [Vec<String>],
}

/// Client for one spreadsheet.
pub struct SheetsClient {
    http: Client,
    tokens: TokenSource,
    spreadsheet_id: String,
    base_url: String,
}

impl SheetsClient {
    pub fn new(http: Client, tokens: TokenSource, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            http,
            tokens,
            spreadsheet_id: spreadsheet_id.into(),
            base_url: SHEETS_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// Reads every populated row of `tab`, or `None` when the tab is absent.
    pub fn get_values(&self, tab: &str) -> SheetsResult<Option<Vec<Vec<String>>>> {
        let request = self.http.get(self.values_url(tab, ""));
        let response = self.authorized(request)?.send()?;
        let status = response.status();
        if status.as_u16() == 400 {
            let message = error_body(response, MAX_ERROR_CHARS);
            if message.contains(MISSING_RANGE_MARKER) {
                debug!("event=sheets_read module=sheets status=missing tab={tab}");
                return Ok(None);
            }
            return Err(status_error("read values", 400, message));
        }
        let response = check_status(response, "read values")?;
        let body: ValueRange = response
            .json()
            .map_err(|err| SheetsError::Decode(format!("values response: {err}")))?;
        Ok(Some(decode_values(body.values)))
    }

    /// Appends rows after the last populated row of `tab`.
    pub fn append_values(&self, tab: &str, rows: &[Vec<String>]) -> SheetsResult<()> {
        let url = self.values_url(
            tab,
            ":append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
        );
        let request = self.http.post(url).json(&ValueRangeBody { values: rows });
        check_status(self.authorized(request)?.send()?, "append values")?;
        Ok(())
    }

    /// Clears every value of `tab`, keeping the tab itself.
    ///
    /// Returns `false` when the tab does not exist.
    pub fn clear(&self, tab: &str) -> SheetsResult<bool> {
        let request = self
            .http
            .post(self.values_url(tab, ":clear"))
            .json(&serde_json::json!({}));
        let response = self.authorized(request)?.send()?;
        if response.status().as_u16() == 400 {
            let message = error_body(response, MAX_ERROR_CHARS);
            if message.contains(MISSING_RANGE_MARKER) {
                return Ok(false);
            }
            return Err(status_error("clear values", 400, message));
        }
        check_status(response, "clear values")?;
        Ok(true)
    }

    /// Creates a new worksheet tab named `tab`.
    pub fn add_sheet(&self, tab: &str) -> SheetsResult<()> {
        let url = format!(
            "{}/{}:batchUpdate",
            self.base_url.trim_end_matches('/'),
            self.spreadsheet_id
        );
        let body = serde_json::json!({
            "requests": [{ "addSheet": { "properties": { "title": tab } } }]
        });
        let request = self.http.post(url).json(&body);
        check_status(self.authorized(request)?.send()?, "add sheet")?;
        debug!("event=sheets_add_tab module=sheets status=ok tab={tab}");
        Ok(())
    }

    /// Writes `rows` starting at cell A1 of `tab`.
    pub fn update_values(&self, tab: &str, rows: &[Vec<String>]) -> SheetsResult<()> {
        let range = format!("{tab}!A1");
        let request = self
            .http
            .put(self.values_url(&range, "?valueInputOption=RAW"))
            .json(&ValueRangeBody { values: rows });
        check_status(self.authorized(request)?.send()?, "update values")?;
        Ok(())
    }

    fn values_url(&self, range: &str, suffix: &str) -> String {
        format!(
            "{}/{}/values/{}{}",
            self.base_url.trim_end_matches('/'),
            self.spreadsheet_id,
            range,
            suffix
        )
    }

    fn authorized(&self, request: RequestBuilder) -> SheetsResult<RequestBuilder> {
        Ok(request.bearer_auth(self.tokens.access_token()?))
    }
}

fn check_status(response: Response, context: &'static str) -> SheetsResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = error_body(response, MAX_ERROR_CHARS);
    Err(status_error(context, status.as_u16(), message))
}

fn status_error(context: &'static str, status: u16, message: String) -> SheetsError {
    error!("event=sheets_request module=sheets status=error context={context} http_status={status}");
    SheetsError::Status {
        context,
        status,
        message,
    }
}

/// Renders API cell values as plain strings.
fn decode_values(values: Vec<Vec<Value>>) -> Vec<Vec<String>> {
    values
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    Value::String(text) => text,
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}
