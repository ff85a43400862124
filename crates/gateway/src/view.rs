//! # ランディングページのレンダリング
//!
//! `GET /` と `POST /upload` が返すHTMLページ。
//! テンプレートはバイナリに埋め込み、起動時に一度だけ登録する。

use axum::response::Html;
use serde::Serialize;

use crate::error::GatewayError;

const INDEX_TEMPLATE_NAME: &str = "index.html";
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// ページに表示する内容。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexPage {
    /// ステータス文言
    pub message: Option<String>,
    /// リモート関数のレスポンス、またはエラーオブジェクト
    pub response: Option<serde_json::Value>,
}

impl IndexPage {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            response: None,
        }
    }

    pub fn with_response(message: impl Into<String>, response: serde_json::Value) -> Self {
        Self {
            message: Some(message.into()),
            response: Some(response),
        }
    }
}

/// テンプレートへ渡すコンテキスト。
#[derive(Serialize)]
struct IndexContext<'a> {
    message: Option<&'a str>,
    response_json: Option<String>,
}

/// ランディングページのレンダラ。
pub struct IndexView {
    env: minijinja::Environment<'static>,
}

impl IndexView {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = minijinja::Environment::new();
        env.add_template(INDEX_TEMPLATE_NAME, INDEX_TEMPLATE)?;
        Ok(Self { env })
    }

    /// ページをHTMLにレンダリングする。`.html` テンプレートのため値は自動エスケープされる。
    pub fn render(&self, page: &IndexPage) -> Result<Html<String>, GatewayError> {
        let response_json = page
            .response
            .as_ref()
            .map(serde_json::to_string_pretty)
            .transpose()
            .map_err(|e| GatewayError::Internal(format!("レスポンスのシリアライズに失敗: {e}")))?;

        let context = IndexContext {
            message: page.message.as_deref(),
            response_json,
        };

        self.env
            .get_template(INDEX_TEMPLATE_NAME)
            .and_then(|template| template.render(&context))
            .map(Html)
            .map_err(|e| GatewayError::Internal(format!("テンプレートのレンダリングに失敗: {e}")))
    }
}
