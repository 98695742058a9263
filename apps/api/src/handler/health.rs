//! # ヘルスチェックハンドラ
//!
//! ロードバランサー、ダッシュボード、監視から稼働状態を確認するためのエンドポイント。
//!
//! ```text
//! GET /health
//! ```
//!
//! ## レスポンス例
//!
//! ```json
//! {
//!   "status": "OK",
//!   "message": "RAS Dashboard API is running",
//!   "version": "0.1.0",
//!   "database": "connected",
//!   "timestamp": "2026-01-01T00:00:00Z"
//! }
//! ```
//!
//! データベースに到達できない場合は `"ERROR"` と 503 を返す。

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use rasdash_infra::DatabaseHandle;
use rasdash_shared::{DatabaseStatus, HealthResponse, HealthStatus};

/// ヘルスチェックエンドポイント
///
/// リクエストごとに `SELECT 1` で疎通を確認する。
pub async fn health_check(
   State(db): State<Arc<DatabaseHandle>>,
) -> (StatusCode, Json<HealthResponse>) {
   let (code, status, database) = if db.test_connection().await {
      (StatusCode::OK, HealthStatus::Ok, DatabaseStatus::Connected)
   } else {
      (
         StatusCode::SERVICE_UNAVAILABLE,
         HealthStatus::Error,
         DatabaseStatus::Disconnected,
      )
   };

   (
      code,
      Json(HealthResponse::new(status, database, env!("CARGO_PKG_VERSION"))),
   )
}
