//! # リモート関数呼び出し
//!
//! 名前付きのリモート関数を同期的（RequestResponse）に呼び出す抽象インターフェース。
//! AWS Lambda実装は `lambda` サブモジュールを参照。

pub mod lambda;

pub use lambda::LambdaInvoker;

use crate::error::GatewayError;

/// リモート関数を呼び出すトレイト。
///
/// 呼び出しは結果を待つ同期モードで行い、関数の出力バイト列をそのまま返す。
/// タイムアウトやリトライはクライアントライブラリの既定値に従う。
#[async_trait::async_trait]
pub trait FunctionInvoker: Send + Sync {
    /// JSONペイロードで関数を呼び出し、レスポンスのバイト列を返す。
    async fn invoke(&self, payload: Vec<u8>) -> Result<Vec<u8>, GatewayError>;
}
