//! 接続記述子の解決
//!
//! 3 つの取得元を優先順位順に試し、最初に得られたものを採用する:
//!
//! 1. 明示された `DATABASE_URL`
//! 2. 上書きファイル内の `DATABASE_URL` のうち、ホスト名が本番データベースの
//!    パターンに一致するもの
//! 3. `DB_HOST` / `DB_PORT` / `DB_NAME` / `DB_USER` / `DB_PASSWORD` から組み立てた URL
//!
//! 1 が得られた時点で 2 と 3 は参照しない。

use std::{
   fmt,
   path::{Path, PathBuf},
};

use url::Url;

use super::{
   override_file::OverrideSource,
   settings::{ConnectionComponents, DatabaseSettings, HostPattern, TlsMode},
};
use crate::error::InfraError;

/// 接続 URL の取得元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorSource {
   ExplicitUrl,
   OverrideFile,
   Components,
}

impl fmt::Display for DescriptorSource {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let label = match self {
         Self::ExplicitUrl => "DATABASE_URL",
         Self::OverrideFile => "override file",
         Self::Components => "DB_* components",
      };
      f.write_str(label)
   }
}

/// TLS モードの決定経路
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsDecision {
   /// `DB_SSL_MODE` で明示された
   Declared,
   /// 接続 URL の `sslmode` パラメータで明示された
   UrlParameter,
   /// 明示が無く、ホスト名パターンとの照合で決めた
   HostnameFallback,
}

/// 解決済みの接続記述子
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
   url:           String,
   source:        DescriptorSource,
   host:          String,
   tls_mode:      TlsMode,
   tls_decision:  TlsDecision,
   ssl_root_cert: Option<PathBuf>,
}

impl ConnectionDescriptor {
   pub fn url(&self) -> &str {
      &self.url
   }

   pub fn source(&self) -> DescriptorSource {
      self.source
   }

   pub fn host(&self) -> &str {
      &self.host
   }

   pub fn tls_mode(&self) -> TlsMode {
      self.tls_mode
   }

   pub fn tls_decision(&self) -> TlsDecision {
      self.tls_decision
   }

   /// `verify-full` 時に使用するルート証明書
   pub fn ssl_root_cert(&self) -> Option<&Path> {
      self.ssl_root_cert.as_deref()
   }

   pub fn requires_tls(&self) -> bool {
      self.tls_mode.requires_tls()
   }

   /// パスワードを伏せた URL（ログ出力用）
   pub fn redacted_url(&self) -> String {
      redact(&self.url)
   }
}

// URL にはパスワードが含まれるため、Debug では伏せる
impl fmt::Debug for ConnectionDescriptor {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("ConnectionDescriptor")
         .field("url", &self.redacted_url())
         .field("source", &self.source)
         .field("host", &self.host)
         .field("tls_mode", &self.tls_mode)
         .field("tls_decision", &self.tls_decision)
         .finish()
   }
}

/// 設定から接続記述子を解決する
///
/// どの取得元からも完全な接続情報が得られない場合は設定エラーを返す。
/// 上書きファイルの読み込み失敗は致命的ではなく、次の取得元へ進む。
#[tracing::instrument(skip_all)]
pub fn resolve_descriptor(
   settings: &DatabaseSettings,
   overrides: &dyn OverrideSource,
) -> Result<ConnectionDescriptor, InfraError> {
   let pattern = settings.override_host_pattern.as_ref();

   let (url, source) = if let Some(url) = &settings.url {
      (url.clone(), DescriptorSource::ExplicitUrl)
   } else if let Some(url) = pattern.and_then(|p| find_override(overrides, p)) {
      tracing::info!("上書きファイルの本番データベース URL を使用します");
      (url, DescriptorSource::OverrideFile)
   } else {
      (assemble(&settings.components)?, DescriptorSource::Components)
   };

   let parsed = Url::parse(&url)
      .map_err(|_| InfraError::configuration(format!("{source} の接続 URL を解析できません")))?;
   let host = parsed.host_str().unwrap_or_default().to_string();
   let url_tls_mode = sslmode_of(&parsed)?;

   // DB_SSL_MODE、URL の sslmode、ホスト名の順に決める
   let (tls_mode, tls_decision) = match (settings.tls_mode, url_tls_mode) {
      (Some(mode), _) => (mode, TlsDecision::Declared),
      (None, Some(mode)) => (mode, TlsDecision::UrlParameter),
      (None, None) => {
         let mode = if pattern.is_some_and(|p| p.matches(&host)) {
            tracing::warn!(
               host = %host,
               "DB_SSL_MODE が未設定のため、ホスト名の一致により証明書検証なしの TLS を使用します"
            );
            TlsMode::Require
         } else {
            TlsMode::Disable
         };
         (mode, TlsDecision::HostnameFallback)
      }
   };

   let descriptor = ConnectionDescriptor {
      url,
      source,
      host,
      tls_mode,
      tls_decision,
      ssl_root_cert: settings.ssl_root_cert.clone(),
   };
   tracing::info!(
      source = %descriptor.source,
      url = %descriptor.redacted_url(),
      tls = ?descriptor.tls_mode,
      "接続先を解決しました"
   );
   Ok(descriptor)
}

/// 上書きファイルからパターンに一致する最初の URL を探す
fn find_override(overrides: &dyn OverrideSource, pattern: &HostPattern) -> Option<String> {
   match overrides.database_urls() {
      Ok(urls) => urls
         .into_iter()
         .find(|url| host_of(url).is_some_and(|host| pattern.matches(&host))),
      Err(e) => {
         tracing::info!(error = %e, "上書きファイルを読み込めないため、通常の設定を使用します");
         None
      }
   }
}

/// 個別の接続要素から URL を組み立てる
fn assemble(components: &ConnectionComponents) -> Result<String, InfraError> {
   let required = [
      ("DB_HOST", &components.host),
      ("DB_PORT", &components.port),
      ("DB_NAME", &components.database),
      ("DB_USER", &components.user),
      ("DB_PASSWORD", &components.password),
   ];
   let missing: Vec<&str> = required
      .iter()
      .filter(|(_, value)| value.is_none())
      .map(|(name, _)| *name)
      .collect();
   if !missing.is_empty() {
      return Err(InfraError::configuration(format!(
         "DATABASE_URL か DB_* の全要素が必要です（未設定: {}）",
         missing.join(", ")
      )));
   }

   let [host, port, database, user, password] =
      required.map(|(_, value)| value.as_deref().unwrap_or_default());
   if port.parse::<u16>().is_err() {
      return Err(InfraError::configuration(format!(
         "DB_PORT は有効なポート番号である必要があります: {port:?}"
      )));
   }

   Ok(format!(
      "postgresql://{}:{}@{host}:{port}/{database}",
      urlencoding::encode(user),
      urlencoding::encode(password),
   ))
}

/// URL の `sslmode` パラメータ
fn sslmode_of(url: &Url) -> Result<Option<TlsMode>, InfraError> {
   url.query_pairs()
      .find(|(key, _)| key == "sslmode")
      .map(|(_, value)| {
         value.parse::<TlsMode>().map_err(|_| {
            InfraError::configuration(format!("接続 URL の sslmode が不正です: {value:?}"))
         })
      })
      .transpose()
}

fn host_of(url: &str) -> Option<String> {
   let parsed = Url::parse(url).ok()?;
   Some(parsed.host_str().unwrap_or_default().to_string())
}

fn redact(url: &str) -> String {
   match Url::parse(url) {
      Ok(mut parsed) if parsed.password().is_some() => {
         // set_password は cannot-be-a-base の URL でのみ失敗する
         if parsed.set_password(Some("***")).is_ok() {
            parsed.to_string()
         } else {
            "<redacted>".to_string()
         }
      }
      Ok(parsed) => parsed.to_string(),
      Err(_) => "<unparseable>".to_string(),
   }
}
