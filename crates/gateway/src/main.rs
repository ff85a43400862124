//! # Lambda Relay Gateway
//!
//! アップロードされたファイルをリモート関数（AWS Lambda）に渡し、
//! S3の期限付き署名付きURLを発行するHTTPフロントエンド。
//!
//! ## 役割
//! - multipartで受け取ったファイルのBase64エンコードと関数の同期呼び出し
//! - 固定オブジェクトへの署名付きアップロードURL発行
//! - 署名付きダウンロードURLの関数への受け渡し
//!
//! ## API エンドポイント
//! - `GET /` — ランディングページ（アップロードフォーム）
//! - `POST /upload` — ファイルを関数に渡して結果をページに表示
//! - `POST /url` — 署名付きアップロードURL発行
//! - `POST /upload-v2` — 署名付きダウンロードURLを関数に渡して出力をそのまま返却

mod config;
mod endpoints;
mod error;
mod invoker;
mod staging;
mod storage;
mod view;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

use config::{GatewayConfig, GatewayState};
use endpoints::*;
use invoker::LambdaInvoker;
use storage::S3ObjectStorage;
use view::IndexView;

/// 全ルートを組み立てる。
pub(crate) fn build_router(state: Arc<GatewayState>, max_upload_bytes: usize) -> axum::Router {
    axum::Router::new()
        .route("/", get(handle_index))
        .route("/upload", post(handle_upload))
        .route("/url", post(handle_sign_upload_url))
        .route("/upload-v2", post(handle_sign_download_and_invoke))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .envがあれば読み込む（なくてもよい）
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| {
            format!(
                "アップロードディレクトリを作成できません: {}",
                config.upload_dir.display()
            )
        })?;

    let storage = S3ObjectStorage::from_config(&config);
    let invoker = LambdaInvoker::from_config(&config).await;

    tracing::info!(
        region = %config.region,
        bucket = %config.bucket_name,
        function_name = %config.function_name,
        static_credentials = config.credentials.is_some(),
        "外部サービスクライアントを初期化"
    );

    let state = Arc::new(GatewayState {
        storage: Box::new(storage),
        invoker: Box::new(invoker),
        view: IndexView::new()?,
        upload_dir: config.upload_dir.clone(),
    });

    let app = build_router(state, config.max_upload_bytes);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Gatewayを http://localhost:{} で起動します", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
