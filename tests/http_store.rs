//! Contract tests for the HTTP notes store
//!
//! Pins down the backend API shapes: the fetch query string, the
//! 404-is-empty rule, and the update/delete request bodies.

use anamnesis_core::{AnamnesisError, Context, HttpNotesStore, NotesStore};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_returns_notes_in_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .and(query_param("context", "Editor:ProjectX"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"content": "<p>first</p>"},
            {"content": "<p>second</p>"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpNotesStore::new(server.uri());
    let notes = store
        .fetch_notes(&Context::from("Editor:ProjectX"))
        .await
        .unwrap();

    let contents: Vec<&str> = notes.iter().map(|n| n.content.as_str()).collect();
    assert_eq!(contents, vec!["<p>first</p>", "<p>second</p>"]);
}

#[tokio::test]
async fn test_fetch_treats_404_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = HttpNotesStore::new(server.uri());
    let notes = store.fetch_notes(&Context::from("Fresh")).await.unwrap();
    assert!(notes.is_empty());
}

#[tokio::test]
async fn test_fetch_maps_server_error_to_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notes"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = HttpNotesStore::new(server.uri());
    let err = store
        .fetch_notes(&Context::from("Editor:ProjectX"))
        .await
        .unwrap_err();
    assert!(matches!(err, AnamnesisError::Backend(_)));
}

#[tokio::test]
async fn test_save_puts_context_and_notes() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/notes/update"))
        .and(body_json(json!({
            "context": "Editor:ProjectX",
            "notes": ["<p>edited</p>"]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpNotesStore::new(server.uri());
    store
        .save_notes(
            &Context::from("Editor:ProjectX"),
            &["<p>edited</p>".to_string()],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_save_with_empty_notes_clears_context() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/notes/update"))
        .and(body_json(json!({
            "context": "Editor:ProjectX",
            "notes": []
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpNotesStore::new(server.uri());
    store
        .save_notes(&Context::from("Editor:ProjectX"), &[])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_save_failure_surfaces_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/notes/update"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = HttpNotesStore::new(server.uri());
    let err = store
        .save_notes(&Context::from("Editor:ProjectX"), &["x".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, AnamnesisError::Backend(_)));
}

#[tokio::test]
async fn test_list_all_decodes_contexts_with_note_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/all-notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "context": "Editor:ProjectX",
                "notes": [{"id": 1, "content": "<p>x</p>"}]
            },
            {"context": "Terminal", "notes": []}
        ])))
        .mount(&server)
        .await;

    let store = HttpNotesStore::new(server.uri());
    let all = store.list_all().await.unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(all[0].context, Context::from("Editor:ProjectX"));
    assert_eq!(all[0].notes[0].id, 1);
    assert_eq!(all[0].notes[0].content, "<p>x</p>");
    assert!(all[1].notes.is_empty());
}

#[tokio::test]
async fn test_delete_note_sends_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/notes/delete"))
        .and(body_json(json!({
            "context": "Editor:ProjectX",
            "noteId": 3
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpNotesStore::new(server.uri());
    store
        .delete_note(&Context::from("Editor:ProjectX"), 3)
        .await
        .unwrap();
}
