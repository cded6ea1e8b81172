mod common;

use chrono::NaiveDate;
use common::{StubServer, TEST_PRIVATE_KEY};
use lifeboard_core::http::{create_http_client, HttpConfig};
use lifeboard_core::sheets::{ServiceAccountKey, SheetsClient, SheetsError, TokenSource};
use lifeboard_core::{
    EntryStore, JournalEntry, JournalKind, JournalService, SheetsBackend, StoreError, TableId,
};
use serde_json::json;

const SHEET_ID: &str = "sheet-123";
const MISSING_RANGE: &str = r#"{"error":{"code":400,"message":"Unable to parse range: Life_Journal","status":"INVALID_ARGUMENT"}}"#;
const TOKEN_REPLY: &str = r#"{"access_token":"test-token","expires_in":3600,"token_type":"Bearer"}"#;

fn values_path(range: &str) -> String {
    format!("/{SHEET_ID}/values/{range}")
}

fn batch_update_path() -> String {
    format!("/{SHEET_ID}:batchUpdate")
}

fn sheets_store(server: &StubServer) -> EntryStore<SheetsBackend> {
    server.reply("POST", "/token", 200, TOKEN_REPLY);
    let http = create_http_client(&HttpConfig::default()).unwrap();
    let key = ServiceAccountKey {
        client_email: "bot@life-dashboard.iam.gserviceaccount.com".to_string(),
        private_key: TEST_PRIVATE_KEY.to_string(),
        private_key_id: Some("key-1".to_string()),
        project_id: Some("life-dashboard".to_string()),
        token_uri: format!("{}/token", server.url()),
    };
    let tokens = TokenSource::new(key, http.clone());
    let client = SheetsClient::new(http, tokens, SHEET_ID).with_base_url(server.url());
    EntryStore::new(SheetsBackend::new(client))
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

#[test]
fn missing_tab_reads_as_not_found() {
    let server = StubServer::start();
    let store = sheets_store(&server);
    server.reply("GET", &values_path("Life_Journal"), 400, MISSING_RANGE);

    let err = store.list_recent(JournalKind::Life).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(TableId::LifeJournal)));

    let journals = JournalService::new(&store);
    assert!(journals.recent_entries(JournalKind::Life).unwrap().is_empty());
}

#[test]
fn populated_tab_loads_with_header_and_bearer_token() {
    let server = StubServer::start();
    let store = sheets_store(&server);
    server.reply(
        "GET",
        &values_path("Work_Journal"),
        200,
        json!({
            "range": "Work_Journal!A1:D3",
            "majorDimension": "ROWS",
            "values": [
                ["Date", "Entry 1", "Entry 2", "Entry 3"],
                ["2024-01-02", "standup"],
                ["2024-01-03", "deploy", "review", "retro"]
            ]
        })
        .to_string(),
    );

    let entries = store.list_recent(JournalKind::Work).unwrap();

    assert_eq!(
        entries,
        vec![
            JournalEntry::new(day(3), "deploy", "review", "retro"),
            JournalEntry::new(day(2), "standup", "", ""),
        ]
    );
    let reads = server.requests_to("GET", &values_path("Work_Journal"));
    assert_eq!(reads[0].header("authorization"), Some("Bearer test-token"));

    let token = &server.requests_to("POST", "/token")[0];
    assert!(token
        .body
        .contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"));
    assert!(token.body.contains("assertion="));
}

#[test]
fn upsert_into_missing_tab_creates_it_and_writes_header() {
    let server = StubServer::start();
    let store = sheets_store(&server);
    server
        .reply("GET", &values_path("Life_Journal"), 400, MISSING_RANGE)
        .reply("POST", &values_path("Life_Journal:clear"), 400, MISSING_RANGE)
        .reply("POST", &batch_update_path(), 200, "{}")
        .reply("PUT", &values_path("Life_Journal!A1"), 200, "{}");

    store
        .upsert_by_date(JournalKind::Life, &JournalEntry::new(day(1), "A", "B", "C"))
        .unwrap();

    let add = &server.requests_to("POST", &batch_update_path())[0];
    assert_eq!(
        add.json()["requests"][0]["addSheet"]["properties"]["title"],
        "Life_Journal"
    );
    let put = &server.requests_to("PUT", &values_path("Life_Journal!A1"))[0];
    assert_eq!(put.query, "valueInputOption=RAW");
    assert_eq!(
        put.json()["values"],
        json!([
            ["Date", "Entry 1", "Entry 2", "Entry 3"],
            ["2024-01-01", "A", "B", "C"]
        ])
    );
    assert_eq!(server.requests_to("POST", "/token").len(), 1);
}

#[test]
fn rewrite_of_existing_tab_clears_without_adding() {
    let server = StubServer::start();
    let store = sheets_store(&server);
    server
        .reply(
            "GET",
            &values_path("Life_Journal"),
            200,
            json!({ "values": [
                ["Date", "Entry 1", "Entry 2", "Entry 3"],
                ["2024-01-01", "old", "", ""],
                ["2024-01-02", "keep", "", ""]
            ]})
            .to_string(),
        )
        .reply("POST", &values_path("Life_Journal:clear"), 200, "{}")
        .reply("PUT", &values_path("Life_Journal!A1"), 200, "{}");

    store
        .upsert_by_date(JournalKind::Life, &JournalEntry::new(day(1), "new", "", ""))
        .unwrap();

    assert!(server.requests_to("POST", &batch_update_path()).is_empty());
    let put = &server.requests_to("PUT", &values_path("Life_Journal!A1"))[0];
    assert_eq!(
        put.json()["values"],
        json!([
            ["Date", "Entry 1", "Entry 2", "Entry 3"],
            ["2024-01-02", "keep", "", ""],
            ["2024-01-01", "new", "", ""]
        ])
    );
}

#[test]
fn append_to_empty_tab_writes_header_first() {
    let server = StubServer::start();
    let store = sheets_store(&server);
    server
        .reply(
            "GET",
            &values_path("Life_Journal"),
            200,
            r#"{"range":"Life_Journal!A1:Z1000","majorDimension":"ROWS"}"#,
        )
        .reply("POST", &values_path("Life_Journal:append"), 200, "{}");

    store
        .append_only(JournalKind::Life, &JournalEntry::new(day(4), "walk", "", ""))
        .unwrap();

    let append = &server.requests_to("POST", &values_path("Life_Journal:append"))[0];
    assert!(append.query.contains("insertDataOption=INSERT_ROWS"));
    assert_eq!(
        append.json()["values"],
        json!([
            ["Date", "Entry 1", "Entry 2", "Entry 3"],
            ["2024-01-04", "walk", "", ""]
        ])
    );
}

#[test]
fn append_to_populated_tab_sends_only_the_row() {
    let server = StubServer::start();
    let store = sheets_store(&server);
    server
        .reply(
            "GET",
            &values_path("Life_Journal"),
            200,
            json!({ "values": [["Date", "Entry 1", "Entry 2", "Entry 3"]] }).to_string(),
        )
        .reply("POST", &values_path("Life_Journal:append"), 200, "{}");

    store
        .append_only(JournalKind::Life, &JournalEntry::new(day(4), "walk", "", ""))
        .unwrap();

    let append = &server.requests_to("POST", &values_path("Life_Journal:append"))[0];
    assert_eq!(append.json()["values"], json!([["2024-01-04", "walk", "", ""]]));
}

#[test]
fn other_bad_requests_are_remote_errors() {
    let server = StubServer::start();
    let store = sheets_store(&server);
    server.reply(
        "GET",
        &values_path("Contacts"),
        403,
        r#"{"error":{"code":403,"message":"The caller does not have permission"}}"#,
    );

    let err = store.load_contacts().unwrap_err();
    match err {
        StoreError::Remote(SheetsError::Status {
            status, message, ..
        }) => {
            assert_eq!(status, 403);
            assert!(message.contains("permission"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejected_token_exchange_is_remote_error() {
    let server = StubServer::start();
    server.reply("POST", "/token", 401, r#"{"error":"invalid_grant"}"#);
    let store = sheets_store(&server);

    let err = store.list_recent(JournalKind::Life).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Remote(SheetsError::Status {
            context: "token exchange",
            status: 401,
            ..
        })
    ));
}
