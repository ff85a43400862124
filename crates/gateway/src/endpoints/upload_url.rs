//! # POST /url
//!
//! 固定オブジェクトキーへの署名付きアップロードURL発行。

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use relay_types::{MessageResponse, UploadUrlResponse, FIXED_UPLOAD_OBJECT_KEY};

use crate::config::GatewayState;
use crate::storage::PresignMethod;

pub const SIGN_FAILED_MESSAGE: &str = "Error generating signed URL";

/// POST /url — 署名付きURL発行。
///
/// 入力は取らない。生成に失敗した場合は原因をログに残し、
/// 汎用メッセージとともに500を返す。
pub async fn handle_sign_upload_url(
    State(state): State<Arc<GatewayState>>,
) -> Result<Json<UploadUrlResponse>, (StatusCode, Json<MessageResponse>)> {
    let presigned = state
        .storage
        .presign(FIXED_UPLOAD_OBJECT_KEY, PresignMethod::Put)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "署名付きURL生成に失敗");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse {
                    message: SIGN_FAILED_MESSAGE.to_string(),
                }),
            )
        })?;
    tracing::debug!(
        object_key = %presigned.object_key,
        method = ?presigned.method,
        "署名付きURLを発行"
    );

    Ok(Json(UploadUrlResponse {
        upload_url: presigned.url,
        filename: presigned.object_key,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_helpers::{spawn_gateway, InvokeOutcome};

    #[tokio::test]
    async fn test_sign_upload_url_returns_fixed_key() {
        let gateway = spawn_gateway(InvokeOutcome::Respond(b"{}".to_vec()), false).await;

        let response = reqwest::Client::new()
            .post(gateway.url("/url"))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["filename"], "7mb.json");
        assert!(body["uploadUrl"].as_str().unwrap().contains("7mb.json"));

        assert_eq!(
            gateway.storage_calls(),
            vec![("7mb.json".to_string(), PresignMethod::Put)]
        );
        assert!(gateway.payloads().is_empty());
    }

    /// 余分なボディは無視される
    #[tokio::test]
    async fn test_sign_upload_url_ignores_body() {
        let gateway = spawn_gateway(InvokeOutcome::Respond(b"{}".to_vec()), false).await;

        let response = reqwest::Client::new()
            .post(gateway.url("/url"))
            .json(&serde_json::json!({"filename": "other.json"}))
            .send()
            .await
            .unwrap();

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["filename"], "7mb.json");
    }

    #[tokio::test]
    async fn test_sign_upload_url_failure() {
        let gateway = spawn_gateway(InvokeOutcome::Respond(b"{}".to_vec()), true).await;

        let response = reqwest::Client::new()
            .post(gateway.url("/url"))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(
            body,
            serde_json::json!({"message": "Error generating signed URL"})
        );
    }
}
