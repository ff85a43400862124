//! # Gatewayエンドポイント
//!
//! 各ハンドラは独立かつステートレスで、外部サービスの失敗をハンドラ境界で捕捉する。

pub mod index;
pub mod upload;
pub mod upload_url;
pub mod upload_v2;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use index::handle_index;
pub use upload::handle_upload;
pub use upload_url::handle_sign_upload_url;
pub use upload_v2::handle_sign_download_and_invoke;
