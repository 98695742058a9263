//! # ヘルスチェック共通型
//!
//! バックエンドの `/health` エンドポイントが返すレスポンスと、
//! クライアントがそれを解釈するための型を提供する。
//!
//! ## 契約
//!
//! `status` フィールドの値が `"OK"`（完全一致）の場合のみ正常とみなす。
//! それ以外の値（大文字小文字の違いを含む）はすべて異常として扱う。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 正常を示す `status` の値
pub const HEALTH_OK: &str = "OK";

/// サーバー側が返す稼働状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
   /// 稼働中（データベース疎通あり）
   #[serde(rename = "OK")]
   Ok,
   /// 異常（データベース疎通なし）
   #[serde(rename = "ERROR")]
   Error,
}

impl HealthStatus {
   /// ワイヤ上の文字列表現を返す
   pub fn as_str(self) -> &'static str {
      match self {
         Self::Ok => HEALTH_OK,
         Self::Error => "ERROR",
      }
   }
}

/// データベース接続状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
   Connected,
   Disconnected,
}

/// ヘルスチェックレスポンス
///
/// サーバーは全フィールドを出力する。クライアントは `status` 以外が
/// 欠けていても解釈できるよう、残りのフィールドはすべて省略可能とする。
///
/// ## 使用例
///
/// ```
/// use rasdash_shared::{DatabaseStatus, HealthResponse, HealthStatus};
///
/// let response = HealthResponse::new(HealthStatus::Ok, DatabaseStatus::Connected, "0.1.0");
/// assert!(response.is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
   /// 稼働状態（`"OK"` のみが正常）
   pub status:    String,
   /// 人間向けのメッセージ
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub message:   Option<String>,
   /// アプリケーションバージョン（Cargo.toml から取得）
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub version:   Option<String>,
   /// データベース接続状態
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub database:  Option<DatabaseStatus>,
   /// 応答生成時刻
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub timestamp: Option<DateTime<Utc>>,
}

impl HealthResponse {
   /// サーバー側でレスポンスを組み立てる
   pub fn new(status: HealthStatus, database: DatabaseStatus, version: impl Into<String>) -> Self {
      let message = match status {
         HealthStatus::Ok => "RAS Dashboard API is running",
         HealthStatus::Error => "RAS Dashboard API cannot reach the database",
      };
      Self {
         status:    status.as_str().to_string(),
         message:   Some(message.to_string()),
         version:   Some(version.into()),
         database:  Some(database),
         timestamp: Some(Utc::now()),
      }
   }

   /// `status` が `"OK"` と完全一致するか
   pub fn is_ok(&self) -> bool {
      self.status == HEALTH_OK
   }
}
