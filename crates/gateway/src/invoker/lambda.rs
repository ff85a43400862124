//! # AWS Lambda 呼び出し実装

use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;

use super::FunctionInvoker;
use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// AWS Lambdaによる関数呼び出し実装。
pub struct LambdaInvoker {
    client: aws_sdk_lambda::Client,
    /// 呼び出す関数名（ARNも可）
    function_name: String,
}

impl LambdaInvoker {
    pub fn new(client: aws_sdk_lambda::Client, function_name: impl Into<String>) -> Self {
        Self {
            client,
            function_name: function_name.into(),
        }
    }

    /// Gateway設定から構築する。
    ///
    /// 静的認証情報が設定されていればそれを使用し、
    /// なければSDKの既定の認証情報チェーンに委ねる。
    pub async fn from_config(config: &GatewayConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(creds) = &config.credentials {
            loader = loader.credentials_provider(aws_credential_types::Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.clone(),
                None,
                None,
                "relay-gateway-env",
            ));
        }

        let sdk_config = loader.load().await;
        Self::new(
            aws_sdk_lambda::Client::new(&sdk_config),
            config.function_name.clone(),
        )
    }
}

#[async_trait::async_trait]
impl FunctionInvoker for LambdaInvoker {
    async fn invoke(&self, payload: Vec<u8>) -> Result<Vec<u8>, GatewayError> {
        let output = self
            .client
            .invoke()
            .function_name(&self.function_name)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(|e| GatewayError::Invocation(DisplayErrorContext(&e).to_string()))?;

        // 関数内エラーでもペイロードはそのまま呼び出し元に渡す
        if let Some(function_error) = output.function_error() {
            tracing::warn!(
                function_name = %self.function_name,
                function_error = %function_error,
                "リモート関数がエラーを報告しました"
            );
        }

        Ok(output
            .payload
            .map(|blob| blob.into_inner())
            .unwrap_or_default())
    }
}
