//! # システム診断
//!
//! API 設定、バックエンドの死活、認証エンドポイントの応答を順に確認する。

use std::fmt;

use reqwest::StatusCode;

use crate::{
   client::{ApiClient, HealthCheck},
   config::Endpoint,
};

/// 確認結果の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
   Success,
   Warning,
   Error,
}

impl fmt::Display for CheckState {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let s = match self {
         Self::Success => "success",
         Self::Warning => "warning",
         Self::Error => "error",
      };
      f.write_str(s)
   }
}

/// 個別の確認結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
   pub name:    &'static str,
   pub state:   CheckState,
   pub message: String,
}

impl CheckResult {
   fn new(name: &'static str, state: CheckState, message: impl Into<String>) -> Self {
      Self {
         name,
         state,
         message: message.into(),
      }
   }
}

/// 診断結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticReport {
   pub results: Vec<CheckResult>,
}

impl DiagnosticReport {
   /// 全ての確認が成功したか
   pub fn all_passed(&self) -> bool {
      self.results.iter().all(|r| r.state == CheckState::Success)
   }
}

/// 診断を実行する
///
/// 各確認は独立しており、前の確認が失敗しても後続を実行する。
pub async fn run_diagnostics(client: &ApiClient) -> DiagnosticReport {
   let results = vec![
      check_configuration(client),
      check_backend_health(client).await,
      check_auth_endpoint(client).await,
   ];
   DiagnosticReport { results }
}

fn check_configuration(client: &ApiClient) -> CheckResult {
   let url = client.config().url_for(Endpoint::Health);
   CheckResult::new(
      "api_configuration",
      CheckState::Success,
      format!("ヘルスチェック URL: {url}"),
   )
}

async fn check_backend_health(client: &ApiClient) -> CheckResult {
   const NAME: &str = "backend_health";
   match client.check_health().await {
      HealthCheck::Healthy(body) => CheckResult::new(
         NAME,
         CheckState::Success,
         format!(
            "バックエンドは正常です（version: {}）",
            body.version.as_deref().unwrap_or("unknown")
         ),
      ),
      HealthCheck::Unhealthy(body) => CheckResult::new(
         NAME,
         CheckState::Warning,
         format!("バックエンドの状態: {}", body.status),
      ),
      HealthCheck::Unreachable(e) => CheckResult::new(
         NAME,
         CheckState::Error,
         format!("バックエンドに接続できません: {e}"),
      ),
   }
}

async fn check_auth_endpoint(client: &ApiClient) -> CheckResult {
   const NAME: &str = "auth_endpoint";
   match client.get_endpoint(Endpoint::AuthValidate).await {
      Ok(response) => match response.status() {
         StatusCode::OK | StatusCode::UNAUTHORIZED => CheckResult::new(
            NAME,
            CheckState::Success,
            format!("認証エンドポイントは応答しています（{}）", response.status()),
         ),
         status => CheckResult::new(
            NAME,
            CheckState::Warning,
            format!("認証エンドポイントの応答が想定外です（{status}）"),
         ),
      },
      Err(e) => CheckResult::new(
         NAME,
         CheckState::Error,
         format!("認証エンドポイントに接続できません: {e}"),
      ),
   }
}
