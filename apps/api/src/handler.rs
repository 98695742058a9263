//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ```text
//! handler.rs          # 親モジュール（re-export）
//! └── handler/
//!     └── health.rs   # ヘルスチェックハンドラ
//! ```

pub mod health;

use axum::http::{Method, Uri};
pub use health::health_check;

use crate::error::ApiError;

/// 未定義のルート
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
   ApiError::NotFound(format!("{method} {uri}"))
}
