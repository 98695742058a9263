//! # API 設定
//!
//! 解決済みのベース URL とホスト、タイムアウト、リトライ回数、
//! 論理エンドポイントの対応表を保持する。
//!
//! プロセス開始時に一度だけ構築し、以降は変更しない。
//! 呼び出し側は URL を手で連結せず、[`ApiConfiguration::url_for`] または
//! [`ApiConfiguration::build_api_url`] を使う。

use std::{collections::BTreeMap, time::Duration};

use serde::Serialize;

use crate::{
   error::ClientError,
   resolver::{self, DeploymentTargets, RuntimeEnvironment},
};

/// リクエストタイムアウト（ミリ秒）
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// 通信失敗時の追加試行回数
pub const DEFAULT_RETRIES: u32 = 3;
/// ヘルスチェックのパス
pub const HEALTH_PATH: &str = "/health";

/// 論理エンドポイント
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
   AuthLogin,
   AuthLogout,
   AuthRefresh,
   AuthValidate,
   Users,
   Assets,
   Vulnerabilities,
   Systems,
   Health,
}

impl Endpoint {
   pub const ALL: [Endpoint; 9] = [
      Endpoint::AuthLogin,
      Endpoint::AuthLogout,
      Endpoint::AuthRefresh,
      Endpoint::AuthValidate,
      Endpoint::Users,
      Endpoint::Assets,
      Endpoint::Vulnerabilities,
      Endpoint::Systems,
      Endpoint::Health,
   ];

   /// 論理名
   pub fn name(self) -> &'static str {
      match self {
         Self::AuthLogin => "auth.login",
         Self::AuthLogout => "auth.logout",
         Self::AuthRefresh => "auth.refresh",
         Self::AuthValidate => "auth.validate",
         Self::Users => "users",
         Self::Assets => "assets",
         Self::Vulnerabilities => "vulnerabilities",
         Self::Systems => "systems",
         Self::Health => "health",
      }
   }

   /// API 上のパス
   pub fn path(self) -> &'static str {
      match self {
         Self::AuthLogin => "/auth/login",
         Self::AuthLogout => "/auth/logout",
         Self::AuthRefresh => "/auth/refresh-token",
         Self::AuthValidate => "/auth/validate",
         Self::Users => "/users",
         Self::Assets => "/assets",
         Self::Vulnerabilities => "/vulnerabilities",
         Self::Systems => "/systems",
         Self::Health => HEALTH_PATH,
      }
   }

   /// 論理名から検索する
   pub fn from_name(name: &str) -> Option<Self> {
      Self::ALL.into_iter().find(|e| e.name() == name)
   }
}

/// 解決済みの API 設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiConfiguration {
   base_url:   String,
   host:       String,
   timeout_ms: u64,
   retries:    u32,
   endpoints:  BTreeMap<&'static str, &'static str>,
}

impl ApiConfiguration {
   pub fn new(base_url: impl Into<String>, host: impl Into<String>) -> Self {
      Self {
         base_url:   base_url.into(),
         host:       host.into(),
         timeout_ms: DEFAULT_TIMEOUT_MS,
         retries:    DEFAULT_RETRIES,
         endpoints:  Endpoint::ALL
            .into_iter()
            .map(|e| (e.name(), e.path()))
            .collect(),
      }
   }

   /// 環境変数から解決する
   ///
   /// 開発ビルドかつ `DEBUG_MODE=true` の場合、解決結果を debug ログに出す。
   pub fn from_env() -> Result<Self, ClientError> {
      let env = RuntimeEnvironment::from_env()?;
      let targets = DeploymentTargets::from_env()?;
      Ok(Self::resolve_logged(&env, &targets))
   }

   /// 解決し、デバッグ設定に応じてログを出す
   pub fn resolve_logged(env: &RuntimeEnvironment, targets: &DeploymentTargets) -> Self {
      let config = resolver::resolve(env, targets);
      if env.build_mode.is_development() && env.debug_mode {
         tracing::debug!(
            base_url = %config.base_url,
            host = %config.host,
            environment = env.build_mode.as_str(),
            hostname = %env.hostname,
            "API 設定を解決しました"
         );
      }
      config
   }

   pub fn base_url(&self) -> &str {
      &self.base_url
   }

   pub fn host(&self) -> &str {
      &self.host
   }

   pub fn timeout_ms(&self) -> u64 {
      self.timeout_ms
   }

   pub fn timeout(&self) -> Duration {
      Duration::from_millis(self.timeout_ms)
   }

   pub fn retries(&self) -> u32 {
      self.retries
   }

   pub fn endpoints(&self) -> &BTreeMap<&'static str, &'static str> {
      &self.endpoints
   }

   /// パスから完全な URL を組み立てる
   ///
   /// ヘルスチェックはバージョン付きパスの外にあるため、ホストに連結する。
   pub fn build_api_url(&self, path: &str) -> String {
      if path == HEALTH_PATH {
         format!("{}{path}", self.host)
      } else {
         format!("{}{path}", self.base_url)
      }
   }

   /// 論理エンドポイントの URL
   pub fn url_for(&self, endpoint: Endpoint) -> String {
      self.build_api_url(endpoint.path())
   }
}
