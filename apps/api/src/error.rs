//! # API エラーハンドリング
//!
//! HTTP API のエラー定義と、axum レスポンスへの変換を行う。
//!
//! エラーレスポンスは RFC 7807（Problem Details for HTTP APIs）の形式で返す:
//!
//! ```json
//! {
//!   "type": "about:blank",
//!   "title": "リソースが見つかりません",
//!   "status": 404,
//!   "detail": "GET /unknown"
//! }
//! ```

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// API 層で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
   /// ルートが存在しない（404 Not Found）
   #[error("リソースが見つかりません: {0}")]
   NotFound(String),
}

/// RFC 7807 準拠のエラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
   /// エラーの種類を識別する URI
   #[serde(rename = "type")]
   pub error_type: String,
   /// エラーの概要
   pub title:      String,
   /// HTTP ステータスコード
   pub status:     u16,
   /// エラーの詳細情報（オプション）
   #[serde(skip_serializing_if = "Option::is_none")]
   pub detail:     Option<String>,
}

impl ErrorResponse {
   fn new(status: StatusCode, title: &str, detail: Option<String>) -> Self {
      Self {
         error_type: "about:blank".to_string(),
         title: title.to_string(),
         status: status.as_u16(),
         detail,
      }
   }
}

impl IntoResponse for ApiError {
   fn into_response(self) -> Response {
      let (status, body) = match self {
         ApiError::NotFound(target) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(StatusCode::NOT_FOUND, "リソースが見つかりません", Some(target)),
         ),
      };

      (status, Json(body)).into_response()
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_not_foundは404の問題詳細になる() {
      let response = ApiError::NotFound("GET /unknown".to_string()).into_response();

      assert_eq!(response.status(), StatusCode::NOT_FOUND);
   }

   #[test]
   fn test_詳細が無い場合はdetailを出力しない() {
      let body = ErrorResponse::new(StatusCode::NOT_FOUND, "リソースが見つかりません", None);
      let json = serde_json::to_value(&body).unwrap();

      assert_eq!(
         json,
         serde_json::json!({
            "type": "about:blank",
            "title": "リソースが見つかりません",
            "status": 404
         })
      );
   }
}
