//! # Lambda Relay 共有型定義
//!
//! HTTPルートのリクエスト/レスポンスと、リモート関数へ渡す
//! 呼び出しペイロードをRust構造体として提供する。
//!
//! ## エンコーディング規則
//! - Base64 (Standard, パディングあり): アップロードされたファイル本体
//! - JSONフィールド名: HTTPレスポンスはcamelCase（既存フロントエンドとの互換）

use serde::{Deserialize, Serialize};

/// 署名付きアップロードURLを発行する固定オブジェクトキー。
pub const FIXED_UPLOAD_OBJECT_KEY: &str = "7mb.json";

/// 署名付きURLに固定するコンテンツタイプ。
pub const JSON_CONTENT_TYPE: &str = "application/json";

// ---------------------------------------------------------------------------
// 呼び出しペイロード
// ---------------------------------------------------------------------------

/// `POST /upload` でリモート関数に渡すペイロード。
///
/// `{"file": "<base64>"}` の形でシリアライズされる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePayload {
    /// Base64エンコードされたファイル本体
    pub file: String,
}

// ---------------------------------------------------------------------------
// POST /url
// ---------------------------------------------------------------------------

/// `POST /url` 成功レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    /// 署名付きアップロードURL（PUT）
    pub upload_url: String,
    /// URLが書き込みを許可するオブジェクトキー
    pub filename: String,
}

/// メッセージのみを持つエラーレスポンス（`POST /url` 失敗時）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// POST /upload-v2
// ---------------------------------------------------------------------------

/// `POST /upload-v2` リクエスト。
///
/// `filename` の欠落は境界で検証するため `Option` で受ける。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadInvokeRequest {
    /// 署名付きダウンロードURLを発行するオブジェクトキー
    #[serde(default)]
    pub filename: Option<String>,
}

impl DownloadInvokeRequest {
    /// 空文字列を欠落として扱った上でファイル名を返す。
    pub fn object_key(&self) -> Option<&str> {
        self.filename.as_deref().filter(|name| !name.is_empty())
    }
}

/// 呼び出し失敗時の構造化エラーレスポンス（`POST /upload-v2`）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationFailure {
    /// 固定メッセージ
    pub message: String,
    /// 失敗原因の説明
    pub error: String,
}

// ---------------------------------------------------------------------------
// 共通
// ---------------------------------------------------------------------------

/// `{"error": "..."}` 形式のエラーレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
