//! # Gateway エラー型
//!
//! 全エンドポイントで共通のエラー型。
//! 固定の失敗契約を持つルートはハンドラ内でこの型を捕捉し、
//! ルート固有のレスポンスに変換する。

use axum::http::StatusCode;
use axum::Json;
use relay_types::ErrorBody;

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 不正なリクエスト。メッセージはそのままクライアントに返す。
    #[error("{0}")]
    BadRequest(String),
    /// 署名付きURLの生成に失敗
    #[error("署名付きURL生成に失敗: {0}")]
    Storage(String),
    /// リモート関数の呼び出しに失敗
    #[error("{0}")]
    Invocation(String),
    /// リモート関数のレスポンスが不正（UTF-8/JSONとして解釈できない）
    #[error("{0}")]
    MalformedResponse(String),
    /// アップロードファイルの一時保存に失敗
    #[error("一時ファイル操作に失敗: {0}")]
    Staging(String),
    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl GatewayError {
    /// エラーに対応するHTTPステータス。
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Invocation(_) | GatewayError::MalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::Storage(_) | GatewayError::Staging(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
