//! # アプリケーション設定
//!
//! 環境変数からバックエンドサーバーの設定を読み込む。
//!
//! ## 設計方針
//!
//! [12-Factor App](https://12factor.net/ja/config) の原則に従い、
//! すべての設定を環境変数から読み込む。開発環境では `.env` ファイルで補う。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `PORT` | No | `8080` | ポート番号 |
//! | `ENVIRONMENT` | No | `development` | 実行環境 |
//! | `DATABASE_URL` または `DB_*` | **Yes** | - | [`DatabaseSettings`] を参照 |

use std::net::SocketAddr;

use rasdash_infra::{InfraError, db::DatabaseSettings};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// HTTP サーバー設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
   /// バインドアドレス（例: `0.0.0.0`, `127.0.0.1`）
   pub host: String,
   /// ポート番号
   pub port: u16,
}

impl ServerConfig {
   /// バインドするソケットアドレス
   pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
      format!("{}:{}", self.host, self.port).parse()
   }
}

/// バックエンドサーバーの設定
///
/// 起動時に一度だけ構築する。
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
   pub server:      ServerConfig,
   pub database:    DatabaseSettings,
   /// 実行環境（`development`, `staging`, `production`）
   pub environment: String,
}

impl ApiServerConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, InfraError> {
      Self::from_lookup(|key| std::env::var(key).ok())
   }

   /// キー参照関数から設定を読み込む
   ///
   /// `PORT` が数値として解釈できない場合はデフォルト値を使う。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, InfraError> {
      let port = match lookup("PORT") {
         Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(port = %raw, "PORT が不正なためデフォルト値を使用します");
            DEFAULT_PORT
         }),
         None => DEFAULT_PORT,
      };

      Ok(Self {
         server:      ServerConfig {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
         },
         database:    DatabaseSettings::from_lookup(&lookup)?,
         environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
      })
   }
}
