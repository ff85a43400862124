//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。
//! 設定は起動時に一度だけ読み込む（ホットリロードなし）。

use std::path::PathBuf;

use anyhow::Context;

use crate::invoker::FunctionInvoker;
use crate::storage::ObjectStorage;
use crate::view::IndexView;

/// 既定の待ち受けポート
pub const DEFAULT_PORT: u16 = 3000;
/// 既定のアップロード一時保存ディレクトリ
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
/// 既定のリクエストボディ上限（10 MiB）
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
/// 既定の署名付きURL有効期限（秒）
pub const DEFAULT_PRESIGN_EXPIRY_SECS: u32 = 900;

/// 静的なAWS認証情報。
#[derive(Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Gateway設定。
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Lambda/S3共通のリージョン（`AWS_REGION`）
    pub region: String,
    /// 静的認証情報。両方のキーが設定された場合のみSome。
    pub credentials: Option<AwsCredentials>,
    /// 署名対象バケット（`AWS_BUCKET_NAME`）
    pub bucket_name: String,
    /// 呼び出す関数名（`AWS_LAMBDA_NAME`）
    pub function_name: String,
    /// S3互換カスタムエンドポイント（`S3_ENDPOINT`）
    pub s3_endpoint: Option<String>,
    pub port: u16,
    /// アップロード一時保存ディレクトリ（`UPLOAD_DIR`）
    pub upload_dir: PathBuf,
    /// リクエストボディ上限（`MAX_UPLOAD_BYTES`）
    pub max_upload_bytes: usize,
    /// 署名付きURLの有効期限（`PRESIGN_EXPIRY_SECS`）
    pub presign_expiry_secs: u32,
}

impl GatewayConfig {
    /// プロセス環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー参照関数から構築する。
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("環境変数 {key} が設定されていません"))
        };

        let credentials = match (lookup("AWS_ACCESS_KEY_ID"), lookup("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key_id), Some(secret_access_key))
                if !access_key_id.is_empty() && !secret_access_key.is_empty() =>
            {
                Some(AwsCredentials {
                    access_key_id,
                    secret_access_key,
                })
            }
            _ => None,
        };

        let port = match lookup("PORT") {
            Some(v) => v
                .parse()
                .with_context(|| format!("PORTの値が不正です: {v}"))?,
            None => DEFAULT_PORT,
        };
        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(v) => v
                .parse()
                .with_context(|| format!("MAX_UPLOAD_BYTESの値が不正です: {v}"))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };
        let presign_expiry_secs = match lookup("PRESIGN_EXPIRY_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("PRESIGN_EXPIRY_SECSの値が不正です: {v}"))?,
            None => DEFAULT_PRESIGN_EXPIRY_SECS,
        };

        Ok(Self {
            region: required("AWS_REGION")?,
            credentials,
            bucket_name: required("AWS_BUCKET_NAME")?,
            function_name: required("AWS_LAMBDA_NAME")?,
            s3_endpoint: lookup("S3_ENDPOINT").filter(|v| !v.is_empty()),
            port,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            max_upload_bytes,
            presign_expiry_secs,
        })
    }
}

/// Gatewayの共有状態。
///
/// 起動時に一度だけ構築され、`Arc` 経由で各ハンドラに渡される。
/// 全フィールドは不変で、並行リクエストから安全に共有できる。
pub struct GatewayState {
    /// Object Storage（S3互換等、トレイトで抽象化）
    pub storage: Box<dyn ObjectStorage>,
    /// リモート関数呼び出し（Lambda等、トレイトで抽象化）
    pub invoker: Box<dyn FunctionInvoker>,
    /// ランディングページのレンダラ
    pub view: IndexView,
    /// アップロード一時保存ディレクトリ
    pub upload_dir: PathBuf,
}
