//! # POST /upload-v2
//!
//! 指定オブジェクトの署名付きダウンロードURLを発行し、そのURLをリモート関数に渡す。
//! 関数の出力テキストは再パースせずにそのまま返す。

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use relay_types::{DownloadInvokeRequest, InvocationFailure};

use crate::config::GatewayState;
use crate::endpoints::upload::INVOCATION_FAILED_MESSAGE;
use crate::error::GatewayError;
use crate::storage::PresignMethod;

pub const MISSING_FILENAME_MESSAGE: &str = "fileName is missing";

/// POST /upload-v2 — 署名付きダウンロードURLを関数に渡し、出力をそのまま返す。
///
/// ボディはJSONまたはURLエンコードフォーム。`filename` がなければ外部呼び出しなしで400。
/// 署名・呼び出しの失敗は `{"message", "error"}` 形式のJSONで返す。
pub async fn handle_sign_download_and_invoke(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = match parse_request(&headers, &body) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };
    tracing::debug!(filename = ?request.filename, "upload-v2 リクエストを受信");

    let Some(object_key) = request.object_key() else {
        return GatewayError::BadRequest(MISSING_FILENAME_MESSAGE.to_string()).into_response();
    };

    match sign_and_invoke(&state, object_key).await {
        Ok(text) => {
            tracing::debug!(output = %text, "リモート関数の出力");
            Html(text).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, object_key, "Lambda呼び出しに失敗");
            (
                e.status(),
                Json(InvocationFailure {
                    message: INVOCATION_FAILED_MESSAGE.to_string(),
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// 署名付きGET URLを生成し、そのJSONシリアライズをペイロードとして関数を呼び出す。
async fn sign_and_invoke(state: &GatewayState, object_key: &str) -> Result<String, GatewayError> {
    let presigned = state.storage.presign(object_key, PresignMethod::Get).await?;
    tracing::debug!(
        object_key = %presigned.object_key,
        method = ?presigned.method,
        "署名付きURLを発行"
    );

    let payload = serde_json::to_vec(&presigned.url)
        .map_err(|e| GatewayError::Internal(format!("ペイロードのシリアライズに失敗: {e}")))?;
    let output = state.invoker.invoke(payload).await?;

    Ok(String::from_utf8_lossy(&output).into_owned())
}

/// リクエストボディを解釈する。
///
/// JSON（`application/json` または `+json`）とURLエンコードフォームのみ解釈する。
/// 空のボディやそれ以外のContent-Typeは `filename` なしとして扱う。
fn parse_request(headers: &HeaderMap, body: &[u8]) -> Result<DownloadInvokeRequest, GatewayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(DownloadInvokeRequest::default());
    }

    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if mime == "application/x-www-form-urlencoded" {
        serde_urlencoded::from_bytes(body)
            .map_err(|e| GatewayError::BadRequest(format!("フォームのパースに失敗: {e}")))
    } else if mime == "application/json" || mime.ends_with("+json") {
        serde_json::from_slice(body)
            .map_err(|e| GatewayError::BadRequest(format!("JSONのパースに失敗: {e}")))
    } else {
        Ok(DownloadInvokeRequest::default())
    }
}
