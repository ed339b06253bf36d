//! Integration tests for image upload and download

mod common;

#[cfg(test)]
mod image_tests {
    use super::common::*;
    use axum::body::Bytes;
    use axum::http::StatusCode;
    use marketplace_server::media::MAX_IMAGE_BYTES;
    use sqlx::SqlitePool;

    // PNG signature followed by filler, the store does not decode images
    const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really a picture";

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_upload_then_download(pool: SqlitePool) -> sqlx::Result<()> {
        let uploads = tempfile::tempdir().unwrap();
        let server = create_test_server(create_test_state_with_uploads(pool, uploads.path().to_path_buf()));

        let response = with_token(server.post("/images"), &alice())
            .bytes(Bytes::from_static(PNG_BYTES))
            .content_type("image/png")
            .await;
        response.assert_status(StatusCode::CREATED);

        let image: serde_json::Value = response.json();
        let url = image["url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/images/") && url.ends_with(".png"));
        assert_eq!(image["content_type"], "image/png");
        assert_eq!(image["size"], PNG_BYTES.len());

        // downloads are public
        let download = server.get(&url).await;
        download.assert_status_ok();
        assert_eq!(download.header("content-type"), "image/png");
        assert_eq!(download.as_bytes().as_ref(), PNG_BYTES);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_upload_rejections(pool: SqlitePool) -> sqlx::Result<()> {
        let uploads = tempfile::tempdir().unwrap();
        let server = create_test_server(create_test_state_with_uploads(pool, uploads.path().to_path_buf()));

        server
            .post("/images")
            .bytes(Bytes::from_static(PNG_BYTES))
            .content_type("image/png")
            .await
            .assert_status_unauthorized();

        with_token(server.post("/images"), &alice())
            .bytes(Bytes::from_static(b"%PDF-1.7"))
            .content_type("application/pdf")
            .await
            .assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);

        with_token(server.post("/images"), &alice())
            .bytes(Bytes::from(vec![0u8; MAX_IMAGE_BYTES + 1]))
            .content_type("image/jpeg")
            .await
            .assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_unknown_or_malformed_names(pool: SqlitePool) -> sqlx::Result<()> {
        let uploads = tempfile::tempdir().unwrap();
        let server = create_test_server(create_test_state_with_uploads(pool, uploads.path().to_path_buf()));

        server
            .get(&format!("/images/{}.png", "0".repeat(64)))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/images/..%2Fsecrets.png")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        Ok(())
    }
}
