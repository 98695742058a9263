//! クライアントのエラー型

use thiserror::Error;

/// クライアントエラー
#[derive(Debug, Clone, Error)]
pub enum ClientError {
   /// 実行環境の設定が不正
   #[error("設定エラー: {0}")]
   Configuration(String),

   /// ネットワークエラー（接続失敗、タイムアウトなど）
   #[error("ネットワークエラー: {0}")]
   Network(String),

   /// レスポンスを解釈できない
   #[error("予期しないレスポンス: {0}")]
   Unexpected(String),
}

impl From<reqwest::Error> for ClientError {
   fn from(err: reqwest::Error) -> Self {
      if err.is_decode() {
         ClientError::Unexpected(err.to_string())
      } else {
         ClientError::Network(err.to_string())
      }
   }
}
