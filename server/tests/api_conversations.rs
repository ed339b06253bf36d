//! Integration tests for messaging
//!
//! - POST /messages
//! - GET /conversations, GET /conversations/unread
//! - GET /conversations/{id}/messages, POST /conversations/{id}/read

mod common;

#[cfg(test)]
mod conversation_tests {
    use super::common::*;
    use axum::http::StatusCode;
    use futures::future::join_all;
    use serde_json::json;
    use std::future::IntoFuture;
    use sqlx::SqlitePool;

    async fn unread(server: &axum_test::TestServer, token: &str) -> i64 {
        let response = with_token(server.get("/conversations/unread"), token).await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["unread"].as_i64().unwrap()
    }

    async fn send(
        server: &axum_test::TestServer,
        token: &str,
        receiver_id: i32,
        advertisement_id: Option<i32>,
        content: &str,
    ) -> serde_json::Value {
        let response = with_token(server.post("/messages"), token)
            .json(&json!({
                "receiver_id": receiver_id,
                "advertisement_id": advertisement_id,
                "content": content
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    /// Listing, first contact, reply and read, end to end
    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_chair_walkthrough(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool.clone()));
        let (a, b) = (alice(), bob());

        // A lists "Chair" with only Telegram
        let chair = with_token(server.post("/advertisements"), &a)
            .json(&json!({
                "category": "furniture",
                "subcategory": "chairs",
                "title": "Chair",
                "telegram": "@alice_sells"
            }))
            .await;
        chair.assert_status(StatusCode::CREATED);
        let chair_id = chair.json::<serde_json::Value>()["advertisement_id"].as_i64().unwrap() as i32;

        // "Table" with no contact at all is refused
        with_token(server.post("/advertisements"), &a)
            .json(&json!({ "category": "furniture", "subcategory": "tables", "title": "Table" }))
            .await
            .assert_status_bad_request();

        // B asks about the chair: new conversation, A has one unread
        let first = send(&server, &b, 1, Some(chair_id), "Still available?").await;
        assert_eq!(unread(&server, &a).await, 1);
        assert_eq!(unread(&server, &b).await, 0);

        // A replies: same conversation, B now has one, A still one
        let reply = send(&server, &a, 2, Some(chair_id), "Yes").await;
        assert_eq!(first["conversation_id"], reply["conversation_id"]);
        assert_eq!(unread(&server, &a).await, 1);
        assert_eq!(unread(&server, &b).await, 1);

        // A opens the conversation
        let conversation_id = first["conversation_id"].as_i64().unwrap();
        let read = with_token(
            server.post(&format!("/conversations/{}/read", conversation_id)),
            &a,
        )
        .await;
        read.assert_status_ok();
        let read: serde_json::Value = read.json();
        assert_eq!(read["messages_marked"], 1);
        assert_eq!(read["unread_count"], 0);

        assert_eq!(unread(&server, &a).await, 0);
        assert_eq!(unread(&server, &b).await, 1);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversations")
            .fetch_one(&pool)
            .await?;
        assert_eq!(rows, 1);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "advertisements")))]
    async fn test_conversation_without_advertisement(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let first = send(&server, &alice(), 2, None, "hi").await;
        let second = send(&server, &bob(), 1, None, "hello").await;
        let about_phone = send(&server, &alice(), 2, Some(2), "about the phone").await;

        assert_eq!(first["conversation_id"], second["conversation_id"]);
        assert_ne!(first["conversation_id"], about_phone["conversation_id"]);

        let response = with_token(server.get("/conversations"), &alice()).await;
        response.assert_status_ok();
        let conversations: Vec<serde_json::Value> = response.json();
        assert_eq!(conversations.len(), 2);
        // newest activity first
        assert_eq!(conversations[0]["conversation_id"], about_phone["conversation_id"]);
        assert_eq!(conversations[0]["other_user_id"], 2);
        assert_eq!(conversations[1]["unread_count"], 1);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "advertisements")))]
    async fn test_concurrent_first_messages(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool.clone()));
        let (a, g) = (alice(), grace_vip());

        let requests = (0..6).map(|i| {
            let (token, receiver) = if i % 2 == 0 { (&a, 7) } else { (&g, 1) };
            with_token(server.post("/messages"), token).json(&json!({
                "receiver_id": receiver,
                "advertisement_id": 3,
                "content": format!("message {}", i)
            }))
        });

        for response in join_all(requests.map(IntoFuture::into_future)).await {
            response.assert_status(StatusCode::CREATED);
        }

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversations")
            .fetch_one(&pool)
            .await?;
        assert_eq!(rows, 1);
        assert_eq!(unread(&server, &a).await, 3);
        assert_eq!(unread(&server, &g).await, 3);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "advertisements")))]
    async fn test_send_rejections(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let to_self = with_token(server.post("/messages"), &alice())
            .json(&json!({ "receiver_id": 1, "content": "me" }))
            .await;
        to_self.assert_status_bad_request();

        let empty = with_token(server.post("/messages"), &alice())
            .json(&json!({ "receiver_id": 2, "content": "" }))
            .await;
        empty.assert_status_bad_request();

        let unknown_receiver = with_token(server.post("/messages"), &alice())
            .json(&json!({ "receiver_id": 999, "content": "hi" }))
            .await;
        unknown_receiver.assert_status(StatusCode::NOT_FOUND);

        let unknown_ad = with_token(server.post("/messages"), &alice())
            .json(&json!({ "receiver_id": 2, "advertisement_id": 999, "content": "hi" }))
            .await;
        unknown_ad.assert_status(StatusCode::NOT_FOUND);

        // the sender always comes from the token
        let spoofed = with_token(server.post("/messages"), &alice())
            .json(&json!({ "sender_id": 2, "receiver_id": 7, "content": "hi" }))
            .await;
        spoofed.assert_status(StatusCode::CREATED);
        let message: serde_json::Value = spoofed.json();
        assert_eq!(message["sender_id"], 1);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "advertisements", "conversations")))]
    async fn test_history_is_participant_only(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let response = with_token(server.get("/conversations/1/messages"), &bob()).await;
        response.assert_status_ok();
        let messages: Vec<serde_json::Value> = response.json();
        let ids: Vec<i64> = messages.iter().map(|m| m["message_id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let older: Vec<serde_json::Value> =
            with_token(server.get("/conversations/1/messages"), &bob())
                .add_query_param("before_date", "2026-01-03T10:01:00Z")
                .await
                .json();
        assert_eq!(older.len(), 1);
        assert_eq!(older[0]["message_id"], 1);

        with_token(server.get("/conversations/1/messages"), &grace_vip())
            .await
            .assert_status_forbidden();
        with_token(server.get("/conversations/99/messages"), &bob())
            .await
            .assert_status(StatusCode::NOT_FOUND);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "advertisements", "conversations")))]
    async fn test_mark_read_only_for_participants(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        with_token(server.post("/conversations/1/read"), &grace_vip())
            .await
            .assert_status_forbidden();
        with_token(server.post("/conversations/42/read"), &alice())
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // grace has one unread message from alice in conversation 2
        assert_eq!(unread(&server, &grace_vip()).await, 1);
        with_token(server.post("/conversations/2/read"), &grace_vip())
            .await
            .assert_status_ok();
        assert_eq!(unread(&server, &grace_vip()).await, 0);
        // alice's own unread in conversation 1 is untouched
        assert_eq!(unread(&server, &alice()).await, 1);
        Ok(())
    }
}
