use portal_lib::adapters::{HttpVisitorDirectory, InMemoryVisitorDirectory};
use portal_lib::admin::{AdminView, LogState};
use portal_lib::web::{self, DirectoryState};
use std::sync::Arc;
use std::time::Duration;
use visitor_portal_core::VisitorDirectory;

/// Starts the directory API on an ephemeral port and returns its base URL.
async fn spawn_directory() -> String {
    let state = Arc::new(DirectoryState {
        directory: Arc::new(InMemoryVisitorDirectory::new("CUTOUT")),
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, web::router(state)).await.unwrap();
    });
    format!("http://{}", address)
}

#[tokio::test]
async fn client_and_server_agree_on_the_contract() {
    let client = HttpVisitorDirectory::new(&spawn_directory().await).unwrap();

    client.log_visitor("alice").await.unwrap();
    client.log_visitor("bob").await.unwrap();

    let feed = client.get_notifications().await.unwrap();
    let names: Vec<_> = feed.iter().map(|e| e.username.as_str()).collect();
    assert_eq!(names, ["alice", "bob"]);
    assert!(feed[0].timestamp < feed[1].timestamp);

    assert_eq!(client.get_visitor_log("nope").await.unwrap(), None);
    assert_eq!(client.get_visitor_log("CUTOUT").await.unwrap().unwrap().len(), 2);

    assert!(!client.clear_visitor_log("nope").await.unwrap());
    assert!(client.clear_visitor_log("CUTOUT").await.unwrap());
    assert_eq!(client.get_visitor_log("CUTOUT").await.unwrap(), Some(vec![]));
}

#[tokio::test]
async fn blank_username_is_rejected_by_the_server() {
    let client = HttpVisitorDirectory::new(&spawn_directory().await).unwrap();
    assert!(client.log_visitor("   ").await.is_err());
    assert!(client.get_notifications().await.unwrap().is_empty());
}

#[tokio::test]
async fn admin_view_over_http() {
    let client = Arc::new(HttpVisitorDirectory::new(&spawn_directory().await).unwrap());
    for i in 1..=12 {
        client.log_visitor(&format!("visitor-{}", i)).await.unwrap();
    }

    let view = AdminView::mount(client.clone(), Duration::from_secs(30), 10);
    view.controller().submit_password("CUTOUT").await.unwrap();
    assert!(matches!(view.controller().log_state(), LogState::Loaded(rows) if rows.len() == 12));

    // Wait for the first poll to land.
    for _ in 0..100 {
        if !view.notifications().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let recent = view.notifications();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].username, "visitor-12");
    assert_eq!(recent[9].username, "visitor-3");

    view.unmount().await;
}
