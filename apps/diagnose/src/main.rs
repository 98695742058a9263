//! # システム診断ツール
//!
//! ダッシュボードと同じ規則で API の接続先を解決し、
//! 設定、バックエンドの死活、認証エンドポイントを確認する。
//!
//! 全ての確認が成功した場合のみ終了コード 0 を返す。
//!
//! ```bash
//! DASHBOARD_ORIGIN=https://ras.example.com BUILD_MODE=production cargo run --bin rasdash-diagnose
//! ```

use std::process::ExitCode;

use anyhow::Context as _;
use rasdash_client::{ApiClient, ApiConfiguration, CheckState, run_diagnostics};
use rasdash_shared::observability::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
   dotenvy::dotenv().ok();

   init_tracing(&TracingConfig::from_env("rasdash-diagnose"));

   let config = ApiConfiguration::from_env().context("API 設定の解決に失敗しました")?;
   tracing::info!(
      base_url = config.base_url(),
      host = config.host(),
      "診断を開始します"
   );

   let client = ApiClient::new(config).context("HTTP クライアントの作成に失敗しました")?;
   let report = run_diagnostics(&client).await;

   for result in &report.results {
      match result.state {
         CheckState::Success => tracing::info!(check = result.name, "{}", result.message),
         CheckState::Warning => tracing::warn!(check = result.name, "{}", result.message),
         CheckState::Error => tracing::error!(check = result.name, "{}", result.message),
      }
   }

   if report.all_passed() {
      tracing::info!("全ての確認が成功しました");
      Ok(ExitCode::SUCCESS)
   } else {
      tracing::error!("失敗した確認があります");
      Ok(ExitCode::FAILURE)
   }
}
