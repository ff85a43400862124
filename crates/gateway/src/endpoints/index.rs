//! # GET /
//!
//! アップロードフォームを含むランディングページ。

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::view::IndexPage;

/// GET / — メッセージ・レスポンスなしでページを返す。
pub async fn handle_index(
    State(state): State<Arc<GatewayState>>,
) -> Result<Html<String>, GatewayError> {
    state.view.render(&IndexPage::default())
}
