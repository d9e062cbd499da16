//! Capture API router.
//!
//! Returns a composable `Router`: JSON endpoints under `/api/`, plus the
//! blob root served read-only under `/files/` so stored uploads and
//! generated PDFs are retrievable at the addresses the API hands out.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::config::MAX_UPLOAD_BYTES;

pub fn capture_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/applications",
            post(endpoints::applications::submit).get(endpoints::applications::list),
        )
        .route("/applications/:id", get(endpoints::applications::detail))
        .route(
            "/consents",
            post(endpoints::consents::submit).get(endpoints::consents::list),
        )
        .route("/consents/:id", get(endpoints::consents::detail))
        .route("/uploads", post(endpoints::uploads::upload))
        // Uploads top out at 10 MB; leave room for multipart framing and
        // base64-inflated signature payloads.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 2 * 1024 * 1024))
        .with_state(ctx.clone());

    Router::new()
        .nest("/api", api)
        .nest_service("/files", ServeDir::new(ctx.blobs.root()))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::blob::BlobStore;
    use crate::db::open_database;

    fn test_router() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("policydesk.db");
        // Create the schema up front, as main() does.
        open_database(&db_path).unwrap();
        let blobs = BlobStore::open(dir.path().join("blobs")).unwrap();
        let ctx = ApiContext::new(db_path, blobs);
        (capture_router(ctx), dir)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (router, _dir) = test_router();
        let response = router
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn submit_application_then_fetch_detail() {
        let (router, _dir) = test_router();

        let payload = serde_json::json!({
            "record": {
                "policy_no": "TP 020",
                "plan": "Silver",
                "surname": "Moloi",
                "first_name": "Kea",
                "dependents": [
                    {"id_number": "1", "surname": "Moloi", "name": "Neo", "relationship": "Son"}
                ]
            }
        });
        let response = router
            .clone()
            .oneshot(
                Request::post("/api/applications")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let id = json["id"].as_str().unwrap().to_string();
        let pdf_url = json["pdf_url"].as_str().unwrap().to_string();
        assert!(pdf_url.starts_with("/files/TP_020/application_"));

        // Detail round-trips the stored record with the patched pdf_url.
        let response = router
            .clone()
            .oneshot(
                Request::get(format!("/api/applications/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["surname"], "Moloi");
        assert_eq!(json["pdf_url"], pdf_url);

        // The generated PDF is served at its public address.
        let response = router
            .oneshot(Request::get(&pdf_url).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), 10 * 1024 * 1024).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn submit_application_with_too_many_dependents_is_400() {
        let (router, _dir) = test_router();
        let deps: Vec<_> = (0..6).map(|_| serde_json::json!({})).collect();
        let payload = serde_json::json!({ "record": { "dependents": deps } });
        let response = router
            .oneshot(
                Request::post("/api/applications")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unconfirmed_consent_is_400() {
        let (router, _dir) = test_router();
        let payload = serde_json::json!({ "record": { "name": "Dineo" } });
        let response = router
            .oneshot(
                Request::post("/api/consents")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn confirmed_consent_submits() {
        let (router, _dir) = test_router();
        let payload = serde_json::json!({
            "record": {
                "policy_number": "TP021",
                "name": "Dineo Khumalo",
                "consent_confirmed": true
            }
        });
        let response = router
            .oneshot(
                Request::post("/api/consents")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["pdf_url"].as_str().unwrap().starts_with("/files/TP021/consent_"));
    }

    #[tokio::test]
    async fn detail_with_malformed_id_is_400() {
        let (router, _dir) = test_router();
        let response = router
            .oneshot(
                Request::get("/api/applications/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn detail_with_unknown_id_is_404() {
        let (router, _dir) = test_router();
        let response = router
            .oneshot(
                Request::get(format!("/api/applications/{}", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn upload_multipart_stores_and_serves_file() {
        let (router, _dir) = test_router();

        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\ncontent-disposition: form-data; name=\"policy_no\"\r\n\r\nTP 022\r\n\
             --{boundary}\r\ncontent-disposition: form-data; name=\"kind\"\r\n\r\nid_copy\r\n\
             --{boundary}\r\ncontent-disposition: form-data; name=\"file\"; filename=\"id.pdf\"\r\n\
             content-type: application/pdf\r\n\r\n%PDF-1.4 test\r\n--{boundary}--\r\n"
        );
        let response = router
            .clone()
            .oneshot(
                Request::post("/api/uploads")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["name"], "id.pdf");
        let url = json["url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/files/TP_022/id_copy_"));

        let response = router
            .oneshot(Request::get(&url).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn upload_with_wrong_type_is_415_and_stores_nothing() {
        let (router, dir) = test_router();

        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\ncontent-disposition: form-data; name=\"kind\"\r\n\r\nid_copy\r\n\
             --{boundary}\r\ncontent-disposition: form-data; name=\"file\"; filename=\"x.gif\"\r\n\
             content-type: image/gif\r\n\r\nGIF89a...\r\n--{boundary}--\r\n"
        );
        let response = router
            .oneshot(
                Request::post("/api/uploads")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        // UNASSIGNED (empty policy_no) directory was never created.
        assert!(!dir.path().join("blobs/UNASSIGNED").exists());
    }

    #[tokio::test]
    async fn upload_with_unknown_kind_is_400() {
        let (router, _dir) = test_router();

        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\ncontent-disposition: form-data; name=\"kind\"\r\n\r\nselfie\r\n\
             --{boundary}\r\ncontent-disposition: form-data; name=\"file\"; filename=\"x.png\"\r\n\
             content-type: image/png\r\n\r\n\u{89}PNG\r\n--{boundary}--\r\n"
        );
        let response = router
            .oneshot(
                Request::post("/api/uploads")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
