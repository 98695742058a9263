//! # RAS Dashboard API サーバー
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `PORT` | No | ポート番号（デフォルト: `8080`） |
//! | `DATABASE_URL` | ※ | PostgreSQL 接続 URL |
//! | `DB_HOST` / `DB_PORT` / `DB_NAME` / `DB_USER` / `DB_PASSWORD` | ※ | `DATABASE_URL` が無い場合の個別要素 |
//! | `DB_OVERRIDE_FILE` | No | 上書きファイル（デフォルト: `.env`） |
//! | `DB_OVERRIDE_HOST_PATTERN` | No | 上書きファイルで採用する本番ホストのパターン |
//! | `DB_SSL_MODE` | No | `disable` / `require` / `verify-full` |
//! | `LOG_FORMAT` | No | `json` / `pretty` |
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run --bin rasdash-api
//! ```

use std::sync::Arc;

use anyhow::Context as _;
use rasdash_api::{config::ApiServerConfig, serve, shutdown::shutdown_signal};
use rasdash_infra::db::{self, DotenvOverrideFile};
use rasdash_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// API サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. データベースハンドルの初期化と疎通確認
/// 5. HTTP サーバーの起動
/// 6. 終了シグナル受信後、データベース接続を解放（[`serve`] が行う）
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
   dotenvy::dotenv().ok();

   init_tracing(&TracingConfig::from_env("rasdash-api"));

   let config = ApiServerConfig::from_env().context("設定の読み込みに失敗しました")?;

   tracing::info!(
      "API サーバーを起動します: {}:{} ({})",
      config.server.host,
      config.server.port,
      config.environment
   );

   let addr = config
      .server
      .addr()
      .context("バインドアドレスのパースに失敗しました")?;

   let overrides = DotenvOverrideFile::new(&config.database.override_file);
   let db = Arc::new(
      db::initialize(&config.database, &overrides)
         .context("データベースの初期化に失敗しました")?,
   );
   if db.test_connection().await {
      tracing::info!("データベース接続を確認しました");
   } else {
      tracing::warn!("起動時の疎通確認に失敗しました。ヘルスチェックは ERROR を返します");
   }

   let listener = match TcpListener::bind(addr).await {
      Ok(listener) => listener,
      Err(e) => {
         db.close_connection().await;
         return Err(e).with_context(|| format!("{addr} にバインドできません"));
      }
   };
   tracing::info!("API サーバーが起動しました: {}", addr);

   serve(listener, db, shutdown_signal())
      .await
      .context("HTTP サーバーが異常終了しました")?;
   tracing::info!("API サーバーを停止しました");

   Ok(())
}
