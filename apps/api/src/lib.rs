//! # RAS Dashboard API サーバー
//!
//! ダッシュボードが接続するバックエンドのライブラリ部分。
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Dashboard  │────▶│     API     │────▶│ PostgreSQL  │
//! │             │     │ (port 8080) │     │             │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## モジュール構成
//!
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`error`] - API エラー定義と HTTP レスポンスへの変換
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`shutdown`] - 終了シグナルの待機

pub mod config;
pub mod error;
pub mod handler;
pub mod shutdown;

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use rasdash_infra::DatabaseHandle;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// ルーターを構築する
///
/// `TraceLayer` により、すべての HTTP リクエストがトレーシングされる。
pub fn router(db: Arc<DatabaseHandle>) -> Router {
   Router::new()
      .route("/health", get(handler::health_check))
      .fallback(handler::not_found)
      .with_state(db)
      .layer(TraceLayer::new_for_http())
}

/// HTTP サーバーを起動し、終了後にデータベース接続を解放する
///
/// `shutdown` が完了すると新規接続の受け付けを止め、処理中のリクエストを
/// 待ってから戻る。サーバーがエラーで終了した場合も解放は行う。
pub async fn serve(
   listener: TcpListener,
   db: Arc<DatabaseHandle>,
   shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
   let served = axum::serve(listener, router(db.clone()))
      .with_graceful_shutdown(shutdown)
      .await;

   db.close_connection().await;
   served
}
