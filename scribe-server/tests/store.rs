//! Integration tests exercising the facade end-to-end over an on-disk pool

use std::collections::HashSet;

use scribe_server::db::{self, Database, DbError, HistoryRequest};
use tempfile::TempDir;

/// Open a fresh database in a temporary directory
async fn open_db() -> (TempDir, Database) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let pool = db::init_db(&dir.path().join("scribe.db"))
        .await
        .expect("failed to initialize database");
    (dir, Database::new(pool))
}

#[tokio::test]
async fn test_account_lifecycle() {
    let (_dir, database) = open_db().await;

    let user_id = database
        .users
        .create_user("alice", "pw123", "user")
        .await
        .unwrap();

    // Correct credentials return id and role
    let auth = database.users.authenticate("alice", "pw123").await.unwrap();
    assert_eq!(auth.user_id, user_id);
    assert_eq!(auth.role.as_str(), "user");

    // Wrong password is a credential rejection, not absence
    assert_eq!(
        database.users.authenticate("alice", "wrong").await.unwrap_err(),
        DbError::Denied
    );

    // Disabled accounts read as absent regardless of the password
    database.users.deactivate_user(user_id).await.unwrap();
    assert_eq!(
        database.users.authenticate("alice", "pw123").await.unwrap_err(),
        DbError::NotFound
    );

    database.users.activate_user(user_id).await.unwrap();
    assert!(database.users.authenticate("alice", "pw123").await.is_ok());
}

#[tokio::test]
async fn test_chat_and_history_flow() {
    let (_dir, database) = open_db().await;

    let user_id = database
        .users
        .create_user("alice", "pw123", "user")
        .await
        .unwrap();
    let chat = database
        .chats
        .create_chat(user_id, Some("Expense questions"))
        .await
        .unwrap();

    database
        .chats
        .add_message(chat.chat_id, "user", "What is the meal cap?")
        .await
        .unwrap();
    database
        .chats
        .add_message(chat.chat_id, "bot", "Fifty dollars per day.")
        .await
        .unwrap();

    let view = database
        .chats
        .get_chat_messages(chat.chat_id, HistoryRequest::default())
        .await
        .unwrap();
    assert_eq!(
        view.transcript.unwrap(),
        "[User]: What is the meal cap?\n\n[LLM]: Fifty dollars per day.\n\n"
    );
    assert_eq!(view.sorted.unwrap().len(), 2);

    let listing = database.chats.get_chats_for_user(user_id).await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].title.as_deref(), Some("Expense questions"));
    assert_eq!(
        listing[0].last_msg.as_deref(),
        Some("Fifty dollars per day.")
    );

    // Creating a chat for a missing owner fails before anything persists
    assert_eq!(
        database.chats.create_chat(99999, None).await.unwrap_err(),
        DbError::NotFound
    );
}

#[tokio::test]
async fn test_document_catalogue_flow() {
    let (_dir, database) = open_db().await;

    let doc_id = database
        .documents
        .insert_document("./documents/policy.pdf", "Remote work policy", true)
        .await
        .unwrap();

    let image_id = database
        .documents
        .insert_image(doc_id, "fig.png", ".png", "./images/fig.png", "Approval flow", 2)
        .await
        .unwrap();

    assert_eq!(
        database.documents.get_image_path(image_id).await.unwrap(),
        "./images/fig.png"
    );
    assert_eq!(
        database.documents.get_all_doc_descriptions().await.unwrap(),
        "Document 1: Remote work policy\n"
    );

    // Missing owner: typed absence, nothing persisted
    assert_eq!(
        database
            .documents
            .insert_image(99999, "x.png", ".png", "./images/x.png", "x", 1)
            .await
            .unwrap_err(),
        DbError::NotFound
    );
}

#[tokio::test]
async fn test_user_delete_cascades_everything() {
    let (_dir, database) = open_db().await;

    let user_id = database
        .users
        .create_user("alice", "pw123", "user")
        .await
        .unwrap();
    let chat = database.chats.create_chat(user_id, None).await.unwrap();
    database
        .chats
        .add_message(chat.chat_id, "user", "hello")
        .await
        .unwrap();

    database.users.delete_user(user_id).await.unwrap();

    assert_eq!(
        database.users.get_user_info(user_id).await.unwrap_err(),
        DbError::NotFound
    );
    assert_eq!(
        database
            .chats
            .get_chat_messages(chat.chat_id, HistoryRequest::default())
            .await
            .unwrap_err(),
        DbError::NotFound
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_lose_nothing() {
    let (_dir, database) = open_db().await;

    let user_id = database
        .users
        .create_user("alice", "pw123", "user")
        .await
        .unwrap();
    let chat = database.chats.create_chat(user_id, None).await.unwrap();

    // Eight writers appending five messages each, all against one chat
    let mut handles = Vec::new();
    for writer in 0..8 {
        let chats = database.chats.clone();
        let chat_id = chat.chat_id;
        handles.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for n in 0..5 {
                let created = chats
                    .add_message(chat_id, "user", &format!("writer {} message {}", writer, n))
                    .await
                    .expect("append failed under contention");
                ids.push(created.message_id);
            }
            ids
        }));
    }

    let mut all_ids = HashSet::new();
    for handle in handles {
        for id in handle.await.unwrap() {
            // Every append got a distinct id
            assert!(all_ids.insert(id));
        }
    }
    assert_eq!(all_ids.len(), 40);

    // And every row is actually there
    let view = database
        .chats
        .get_chat_messages(
            chat.chat_id,
            HistoryRequest {
                formatted: false,
                ..HistoryRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(view.sorted.unwrap().len(), 40);
    assert!(view.transcript.is_none());
}

#[tokio::test]
async fn test_data_survives_pool_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scribe.db");

    {
        let pool = db::init_db(&path).await.unwrap();
        let database = Database::new(pool.clone());
        database
            .users
            .create_user("alice", "pw123", "admin")
            .await
            .unwrap();
        pool.close().await;
    }

    let pool = db::init_db(&path).await.unwrap();
    let database = Database::new(pool);
    let auth = database.users.authenticate("alice", "pw123").await.unwrap();
    assert_eq!(auth.role.as_str(), "admin");
}
