//! # エンドポイントテスト用共通ヘルパー
//!
//! 呼び出しを記録するモックストレージ・モック関数と、
//! 実ルーターをローカルポートで起動するヘルパー。

use std::sync::{Arc, Mutex};

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::invoker::FunctionInvoker;
use crate::storage::{ObjectStorage, PresignMethod, PresignedUrl};
use crate::view::IndexView;

/// テスト用のモックObjectStorage。
/// S3への接続なしで署名付きURLのダミーを返し、呼び出しを記録する。
pub struct MockStorage {
    pub calls: Arc<Mutex<Vec<(String, PresignMethod)>>>,
    pub fail: bool,
}

#[async_trait::async_trait]
impl ObjectStorage for MockStorage {
    async fn presign(
        &self,
        object_key: &str,
        method: PresignMethod,
    ) -> Result<PresignedUrl, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((object_key.to_string(), method));

        if self.fail {
            return Err(GatewayError::Storage("credentials are not configured".to_string()));
        }

        Ok(PresignedUrl {
            url: format!("https://mock-bucket.s3.amazonaws.com/{object_key}?X-Amz-Signature=test"),
            object_key: object_key.to_string(),
            method,
        })
    }
}

/// モック関数の応答。
#[derive(Clone)]
pub enum InvokeOutcome {
    /// 指定したバイト列を返す
    Respond(Vec<u8>),
    /// 指定したメッセージで失敗する
    Fail(String),
}

/// テスト用のモックFunctionInvoker。受け取ったペイロードを記録する。
pub struct MockInvoker {
    pub payloads: Arc<Mutex<Vec<Vec<u8>>>>,
    pub outcome: InvokeOutcome,
}

#[async_trait::async_trait]
impl FunctionInvoker for MockInvoker {
    async fn invoke(&self, payload: Vec<u8>) -> Result<Vec<u8>, GatewayError> {
        self.payloads.lock().unwrap().push(payload);
        match &self.outcome {
            InvokeOutcome::Respond(bytes) => Ok(bytes.clone()),
            InvokeOutcome::Fail(message) => Err(GatewayError::Invocation(message.clone())),
        }
    }
}

/// 起動済みのテスト用Gateway。
pub struct TestGateway {
    pub base_url: String,
    pub storage_calls: Arc<Mutex<Vec<(String, PresignMethod)>>>,
    pub payloads: Arc<Mutex<Vec<Vec<u8>>>>,
    pub upload_dir: tempfile::TempDir,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn storage_calls(&self) -> Vec<(String, PresignMethod)> {
        self.storage_calls.lock().unwrap().clone()
    }

    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.payloads.lock().unwrap().clone()
    }

    /// 一時保存ディレクトリに残っているファイル数
    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count()
    }
}

/// モックを組み込んだ実ルーターを `127.0.0.1` の空きポートで起動する。
pub async fn spawn_gateway(outcome: InvokeOutcome, storage_fails: bool) -> TestGateway {
    let storage_calls = Arc::new(Mutex::new(Vec::new()));
    let payloads = Arc::new(Mutex::new(Vec::new()));
    let upload_dir = tempfile::tempdir().unwrap();

    let state = Arc::new(GatewayState {
        storage: Box::new(MockStorage {
            calls: storage_calls.clone(),
            fail: storage_fails,
        }),
        invoker: Box::new(MockInvoker {
            payloads: payloads.clone(),
            outcome,
        }),
        view: IndexView::new().unwrap(),
        upload_dir: upload_dir.path().to_path_buf(),
    });

    let app = crate::build_router(state, 1024 * 1024);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    TestGateway {
        base_url: format!("http://127.0.0.1:{port}"),
        storage_calls,
        payloads,
        upload_dir,
    }
}
