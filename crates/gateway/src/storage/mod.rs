//! # Object Storage
//!
//! 署名付きURL発行の抽象インターフェース。
//! S3互換ストレージ実装は `s3` サブモジュールを参照。

pub mod s3;

pub use s3::S3ObjectStorage;

use crate::error::GatewayError;

/// 署名付きURLが許可するHTTPメソッド。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresignMethod {
    /// 書き込み（PUT）
    Put,
    /// 読み出し（GET）
    Get,
}

/// 署名付きURLの生成結果。サーバー側には何も記録しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrl {
    /// 認証情報を埋め込んだ期限付きURL
    pub url: String,
    /// URLがアクセスを許可するオブジェクトキー
    pub object_key: String,
    pub method: PresignMethod,
}

/// Object Storageの抽象インターフェース。
///
/// AWS S3、MinIO等のS3互換ストレージや、テスト用のモックを実装として選択できる。
/// 実装は転送自体を行わず、URLの署名のみを行う。
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// `object_key` に対する署名付きURLを生成する。
    ///
    /// コンテンツタイプはJSONに固定される。
    async fn presign(
        &self,
        object_key: &str,
        method: PresignMethod,
    ) -> Result<PresignedUrl, GatewayError>;
}
