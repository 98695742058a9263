//! 接続設定の読み込み
//!
//! 環境変数（または任意のキー参照関数）からデータベース接続設定を読み込む。
//! 空文字列の値は未設定として扱う。

use std::{path::PathBuf, str::FromStr};

use sqlx::postgres::PgSslMode;

use crate::error::InfraError;

/// 上書きファイルの既定パス（作業ディレクトリ直下）
pub const DEFAULT_OVERRIDE_FILE: &str = ".env";

/// 本番データベースのホスト名パターン
///
/// ホスト名にパターンが含まれていれば一致とみなす（ASCII 大文字小文字は区別しない）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPattern(String);

impl HostPattern {
   /// 空文字列の場合は `None` を返す
   pub fn new(pattern: impl Into<String>) -> Option<Self> {
      let pattern = pattern.into().trim().to_ascii_lowercase();
      (!pattern.is_empty()).then_some(Self(pattern))
   }

   pub fn matches(&self, host: &str) -> bool {
      host.to_ascii_lowercase().contains(&self.0)
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// TLS モード
///
/// `DB_SSL_MODE` または接続 URL の `sslmode` で明示する。
/// 値は PostgreSQL の `sslmode` と同じ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
   /// TLS を使用しない
   Disable,
   /// 平文を優先し、サーバーが要求すれば TLS を使う
   Allow,
   /// TLS を優先し、使えなければ平文で接続する
   Prefer,
   /// TLS を必須とするが証明書は検証しない
   Require,
   /// TLS を必須とし、証明書を検証する
   VerifyCa,
   /// TLS を必須とし、証明書とホスト名を検証する
   VerifyFull,
}

impl TlsMode {
   /// 平文接続へのフォールバックが無いか
   pub fn requires_tls(self) -> bool {
      matches!(self, Self::Require | Self::VerifyCa | Self::VerifyFull)
   }

   pub(crate) fn to_ssl_mode(self) -> PgSslMode {
      match self {
         Self::Disable => PgSslMode::Disable,
         Self::Allow => PgSslMode::Allow,
         Self::Prefer => PgSslMode::Prefer,
         Self::Require => PgSslMode::Require,
         Self::VerifyCa => PgSslMode::VerifyCa,
         Self::VerifyFull => PgSslMode::VerifyFull,
      }
   }
}

impl FromStr for TlsMode {
   type Err = InfraError;

   fn from_str(s: &str) -> Result<Self, Self::Err> {
      match s.trim().to_ascii_lowercase().as_str() {
         "disable" => Ok(Self::Disable),
         "allow" => Ok(Self::Allow),
         "prefer" => Ok(Self::Prefer),
         "require" => Ok(Self::Require),
         "verify-ca" => Ok(Self::VerifyCa),
         "verify-full" => Ok(Self::VerifyFull),
         other => Err(InfraError::configuration(format!(
            "TLS モードの値が不正です: {other:?}（disable / allow / prefer / require / verify-ca / verify-full のいずれか）"
         ))),
      }
   }
}

/// 個別の接続要素
///
/// `DATABASE_URL` が無い場合に接続文字列を組み立てるための 5 要素。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionComponents {
   pub host:     Option<String>,
   pub port:     Option<String>,
   pub database: Option<String>,
   pub user:     Option<String>,
   pub password: Option<String>,
}

/// データベース接続設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
   /// 完全な接続 URL（`DATABASE_URL`）
   pub url:                   Option<String>,
   /// 個別の接続要素（`DB_HOST` など）
   pub components:            ConnectionComponents,
   /// 上書きファイルのパス（`DB_OVERRIDE_FILE`、既定 `.env`）
   pub override_file:         PathBuf,
   /// 本番データベースのホスト名パターン（`DB_OVERRIDE_HOST_PATTERN`）
   ///
   /// 未設定の場合、上書きファイルは参照されない。
   pub override_host_pattern: Option<HostPattern>,
   /// 明示された TLS モード（`DB_SSL_MODE`）
   pub tls_mode:              Option<TlsMode>,
   /// `verify-full` 時のルート証明書（`DB_SSL_ROOT_CERT`）
   pub ssl_root_cert:         Option<PathBuf>,
}

impl DatabaseSettings {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, InfraError> {
      Self::from_lookup(|key| std::env::var(key).ok())
   }

   /// キー参照関数から設定を読み込む
   ///
   /// テストではプロセスの環境変数を書き換えずに設定を差し込める。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, InfraError> {
      let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

      let tls_mode = get("DB_SSL_MODE").map(|v| v.parse()).transpose()?;

      Ok(Self {
         url: get("DATABASE_URL"),
         components: ConnectionComponents {
            host:     get("DB_HOST"),
            port:     get("DB_PORT"),
            database: get("DB_NAME"),
            user:     get("DB_USER"),
            password: get("DB_PASSWORD"),
         },
         override_file: get("DB_OVERRIDE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OVERRIDE_FILE)),
         override_host_pattern: get("DB_OVERRIDE_HOST_PATTERN").and_then(HostPattern::new),
         tls_mode,
         ssl_root_cert: get("DB_SSL_ROOT_CERT").map(PathBuf::from),
      })
   }
}
