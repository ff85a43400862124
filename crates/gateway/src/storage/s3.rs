//! # S3互換 Object Storage 実装
//!
//! AWS S3, MinIO 等のS3互換APIを使用するObject Storage実装。
//! 署名はSigV4クエリ署名でローカルに計算され、ネットワーク通信は発生しない。
//!
//! バケットは最初の署名要求時に構築する。認証情報の解決に失敗しても起動は止まらず、
//! その要求の `GatewayError::Storage` として返る。

use std::collections::HashMap;

// rust-s3 の presign_put は http 0.2 の HeaderMap を受け取る（axum は http 1.x）
use http::{header, HeaderMap, HeaderValue};
use relay_types::JSON_CONTENT_TYPE;
use tokio::sync::OnceCell;

use super::{ObjectStorage, PresignMethod, PresignedUrl};
use crate::config::{AwsCredentials, GatewayConfig};
use crate::error::GatewayError;

/// バケット構築に必要な設定
#[derive(Debug, Clone)]
pub struct BucketSettings {
    pub region: String,
    /// カスタムエンドポイント（MinIO等）。設定時はパス形式URLになる。
    pub endpoint: Option<String>,
    /// 静的認証情報。`None` の場合はデフォルトの認証情報チェーンを使用する。
    pub credentials: Option<AwsCredentials>,
    pub bucket_name: String,
}

/// S3互換ストレージによるObject Storage実装。
pub struct S3ObjectStorage {
    settings: BucketSettings,
    bucket: OnceCell<s3::Bucket>,
    /// 署名付きURLの有効期限（秒）
    expiry_secs: u32,
}

impl S3ObjectStorage {
    pub fn new(settings: BucketSettings, expiry_secs: u32) -> Self {
        Self {
            settings,
            bucket: OnceCell::new(),
            expiry_secs,
        }
    }

    /// Gateway設定から構築する。認証情報はここでは解決しない。
    pub fn from_config(config: &GatewayConfig) -> Self {
        if let Some(endpoint) = &config.s3_endpoint {
            tracing::info!(s3_endpoint = %endpoint, "カスタムS3エンドポイントを使用");
        }

        Self::new(
            BucketSettings {
                region: config.region.clone(),
                endpoint: config.s3_endpoint.clone(),
                credentials: config.credentials.clone(),
                bucket_name: config.bucket_name.clone(),
            },
            config.presign_expiry_secs,
        )
    }

    /// 初期化済みのバケットを返す。未初期化なら構築する（失敗時は次回再試行）。
    async fn bucket(&self) -> Result<&s3::Bucket, GatewayError> {
        self.bucket
            .get_or_try_init(|| init_bucket(&self.settings))
            .await
    }
}

/// 設定からS3バケットを初期化する。
///
/// `S3_ENDPOINT` が設定されている場合はカスタムエンドポイント（パス形式）を使用する。
async fn init_bucket(settings: &BucketSettings) -> Result<s3::Bucket, GatewayError> {
    let s3_region = match &settings.endpoint {
        Some(endpoint) => s3::Region::Custom {
            region: settings.region.clone(),
            endpoint: endpoint.clone(),
        },
        None => settings
            .region
            .parse::<s3::Region>()
            .map_err(|e| GatewayError::Storage(format!("リージョンの解釈に失敗: {e}")))?,
    };

    let s3_credentials = match &settings.credentials {
        Some(creds) => s3::creds::Credentials::new(
            Some(creds.access_key_id.as_str()),
            Some(creds.secret_access_key.as_str()),
            None,
            None,
            None,
        )
        .map_err(|e| GatewayError::Storage(format!("認証情報の構築に失敗: {e}")))?,
        // デフォルトチェーンはプロファイル読み込みやメタデータ取得でブロックしうる
        None => tokio::task::spawn_blocking(s3::creds::Credentials::default)
            .await
            .map_err(|e| GatewayError::Internal(format!("認証情報タスクが異常終了: {e}")))?
            .map_err(|e| GatewayError::Storage(format!("認証情報の取得に失敗: {e}")))?,
    };

    let bucket = s3::Bucket::new(&settings.bucket_name, s3_region, s3_credentials)
        .map_err(|e| GatewayError::Storage(format!("バケットの初期化に失敗: {e}")))?;
    let bucket = if settings.endpoint.is_some() {
        bucket.with_path_style()
    } else {
        bucket
    };

    Ok(*bucket)
}

#[async_trait::async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn presign(
        &self,
        object_key: &str,
        method: PresignMethod,
    ) -> Result<PresignedUrl, GatewayError> {
        let bucket = self.bucket().await?;
        let url = match method {
            PresignMethod::Put => {
                // Content-Typeは署名対象ヘッダに含まれ、アップロード時に一致が要求される
                let mut headers = HeaderMap::new();
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(JSON_CONTENT_TYPE),
                );
                bucket
                    .presign_put(object_key, self.expiry_secs, Some(headers), None)
                    .await
                    .map_err(|e| {
                        GatewayError::Storage(format!("署名付きアップロードURL生成失敗: {e}"))
                    })?
            }
            PresignMethod::Get => {
                let queries = HashMap::from([(
                    "response-content-type".to_string(),
                    JSON_CONTENT_TYPE.to_string(),
                )]);
                bucket
                    .presign_get(object_key, self.expiry_secs, Some(queries))
                    .await
                    .map_err(|e| {
                        GatewayError::Storage(format!("署名付きダウンロードURL生成失敗: {e}"))
                    })?
            }
        };

        Ok(PresignedUrl {
            url,
            object_key: object_key.to_string(),
            method,
        })
    }
}
