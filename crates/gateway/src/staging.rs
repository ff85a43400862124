//! # アップロードファイルの一時保存
//!
//! multipartで受信したファイルを一時ファイルに書き出し、エンコード時に読み戻す。
//! 一時ファイルは `StagedUpload` がドロップされた時点で必ず削除される
//! （成功・失敗・早期リターンのいずれの経路でも）。

use std::path::Path;

use axum::extract::multipart::Field;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use crate::error::GatewayError;

/// 一時保存されたアップロードファイル。ドロップ時に削除される。
#[derive(Debug)]
pub struct StagedUpload {
    path: TempPath,
    /// 元のファイル名（ログ用）
    file_name: Option<String>,
    len: u64,
}

impl StagedUpload {
    /// `dir` に空の一時ファイルを作成し、書き込み用ハンドルとともに返す。
    pub fn create(dir: &Path) -> Result<(Self, tokio::fs::File), GatewayError> {
        let named = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(dir)
            .map_err(|e| GatewayError::Staging(format!("一時ファイル作成失敗: {e}")))?;
        let (file, path) = named.into_parts();

        Ok((
            Self {
                path,
                file_name: None,
                len: 0,
            },
            tokio::fs::File::from_std(file),
        ))
    }

    /// multipartフィールドの内容をストリーミングで一時ファイルに書き出す。
    pub async fn from_field(dir: &Path, mut field: Field<'_>) -> Result<Self, GatewayError> {
        let (mut staged, mut file) = Self::create(dir)?;
        staged.file_name = field.file_name().map(str::to_string);

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| GatewayError::BadRequest(format!("multipartの読み取りに失敗: {e}")))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| GatewayError::Staging(format!("一時ファイル書き込み失敗: {e}")))?;
            staged.len += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| GatewayError::Staging(format!("一時ファイル書き込み失敗: {e}")))?;

        Ok(staged)
    }

    /// 一時ファイルの全内容を読み出す。
    pub async fn read(&self) -> Result<Vec<u8>, GatewayError> {
        tokio::fs::read(self.path())
            .await
            .map_err(|e| GatewayError::Staging(format!("一時ファイル読み取り失敗: {e}")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// 書き込まれたバイト数
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
