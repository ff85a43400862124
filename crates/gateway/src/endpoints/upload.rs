//! # POST /upload
//!
//! multipartで受け取ったファイルをBase64エンコードし、リモート関数を同期呼び出しする。
//! 失敗はすべてハンドラ内で捕捉し、ステータス200のページとして返す。

use std::path::Path;
use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::response::{IntoResponse, Response};
use base64::Engine;
use relay_types::{ErrorBody, FilePayload};

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::staging::StagedUpload;
use crate::view::IndexPage;

/// ファイルを受け取るmultipartフィールド名
pub const FILE_FIELD: &str = "file";

pub const NO_FILE_MESSAGE: &str = "No file uploaded!";
pub const INVOKED_MESSAGE: &str = "Lambda Invoked Successfully";
pub const INVOCATION_FAILED_MESSAGE: &str = "Lambda invocation failed";

/// Base64エンジン（Standard）
fn b64() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD
}

/// POST /upload — ファイルを関数に渡し、結果をページに表示する。
///
/// multipartでないリクエストは「ファイルなし」として扱う。
pub async fn handle_upload(State(state): State<Arc<GatewayState>>, request: Request) -> Response {
    let multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => Some(multipart),
        Err(rejection) => {
            tracing::debug!(%rejection, "multipartとして解釈できないリクエスト");
            None
        }
    };

    let page = match upload_and_invoke(&state, multipart).await {
        Ok(Some(response)) => IndexPage::with_response(INVOKED_MESSAGE, response),
        Ok(None) => IndexPage::with_message(NO_FILE_MESSAGE),
        Err(e) => {
            tracing::error!(error = %e, "Lambda呼び出しに失敗");
            let error = serde_json::to_value(ErrorBody::new(e.to_string()))
                .unwrap_or(serde_json::Value::Null);
            IndexPage::with_response(INVOCATION_FAILED_MESSAGE, error)
        }
    };

    match state.view.render(&page) {
        Ok(html) => html.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "ページのレンダリングに失敗");
            e.into_response()
        }
    }
}

/// ファイルを一時保存・エンコードして関数を呼び出す。
///
/// ファイルがなければ `Ok(None)` を返し、呼び出しは行わない。
async fn upload_and_invoke(
    state: &GatewayState,
    multipart: Option<Multipart>,
) -> Result<Option<serde_json::Value>, GatewayError> {
    let Some(mut multipart) = multipart else {
        return Ok(None);
    };
    let Some(staged) = stage_file_field(&state.upload_dir, &mut multipart).await? else {
        return Ok(None);
    };

    tracing::info!(
        file_name = staged.file_name().unwrap_or_default(),
        bytes = staged.len(),
        "アップロードファイルを受信"
    );

    let contents = staged.read().await?;
    drop(staged);

    let payload = encode_file_payload(&contents)?;
    let output = state.invoker.invoke(payload).await?;

    parse_json_output(&output).map(Some)
}

/// `file` フィールドを探して一時保存する。
///
/// ファイル名を持たないテキストフィールドは無視する。ファイル名も内容も空のパートは
/// ブラウザがファイル未選択時に送るものなので、ファイルなしとして扱う。
async fn stage_file_field(
    dir: &Path,
    multipart: &mut Multipart,
) -> Result<Option<StagedUpload>, GatewayError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::BadRequest(format!("multipartの読み取りに失敗: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) || field.file_name().is_none() {
            continue;
        }

        let staged = StagedUpload::from_field(dir, field).await?;
        if staged.is_empty() && staged.file_name().map_or(true, str::is_empty) {
            return Ok(None);
        }
        return Ok(Some(staged));
    }

    Ok(None)
}

/// ファイル内容を `{"file": "<base64>"}` のJSONペイロードにする。
pub fn encode_file_payload(contents: &[u8]) -> Result<Vec<u8>, GatewayError> {
    let payload = FilePayload {
        file: b64().encode(contents),
    };
    serde_json::to_vec(&payload)
        .map_err(|e| GatewayError::Internal(format!("ペイロードのシリアライズに失敗: {e}")))
}

/// 関数の出力をUTF-8テキストとしてデコードし、JSONとしてパースする。
pub fn parse_json_output(output: &[u8]) -> Result<serde_json::Value, GatewayError> {
    let text = std::str::from_utf8(output).map_err(|e| {
        GatewayError::MalformedResponse(format!("レスポンスがUTF-8ではありません: {e}"))
    })?;
    serde_json::from_str(text).map_err(|e| {
        GatewayError::MalformedResponse(format!("レスポンスのJSONパースに失敗: {e}"))
    })
}
