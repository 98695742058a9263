//! # インフラ層エラー定義
//!
//! データベース接続の解決・疎通確認・終了処理で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! ## 伝播方針
//!
//! | 種別 | 扱い |
//! |------|------|
//! | `Configuration` | 起動時のみ発生し、プロセスを起動させない |
//! | `Connectivity` | ログ出力後、`bool` に変換して呼び出し元へ返す |
//! | `OverrideFile` | ログ出力後、次の解決手段へ進む |
//! | `Shutdown` | ログ出力のみ。プロセス終了を妨げない |

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別（[`InfraErrorKind`]）と [`SpanTrace`]（呼び出し経路）を保持する。
/// `From` 変換や convenience constructor でエラーを生成すると、
/// その時点のスパン情報が自動的にキャプチャされる。
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
   kind:       InfraErrorKind,
   span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
   /// 接続先を導出できない
   ///
   /// `DATABASE_URL`、上書きファイル、個別の接続要素のいずれからも
   /// 完全な接続情報が得られなかった場合、または値が不正な場合。
   #[error("設定エラー: {0}")]
   Configuration(String),

   /// データベースへの疎通失敗
   #[error("データベース接続エラー: {0}")]
   Connectivity(#[source] sqlx::Error),

   /// 上書きファイルの読み込み失敗
   #[error("上書きファイルの読み込みに失敗しました: {0}")]
   OverrideFile(#[source] dotenvy::Error),

   /// 接続プール解放時の失敗
   #[error("接続プールの解放に失敗しました: {0}")]
   Shutdown(String),
}

impl InfraError {
   /// エラー種別を取得する
   pub fn kind(&self) -> &InfraErrorKind {
      &self.kind
   }

   /// SpanTrace を取得する
   pub fn span_trace(&self) -> &SpanTrace {
      &self.span_trace
   }

   /// 設定エラーかどうか
   pub fn is_configuration(&self) -> bool {
      matches!(self.kind, InfraErrorKind::Configuration(_))
   }

   // ===== Convenience constructors =====

   /// 設定エラーを生成する
   pub fn configuration(msg: impl Into<String>) -> Self {
      Self {
         kind:       InfraErrorKind::Configuration(msg.into()),
         span_trace: SpanTrace::capture(),
      }
   }

   /// 終了処理エラーを生成する
   pub fn shutdown(msg: impl Into<String>) -> Self {
      Self {
         kind:       InfraErrorKind::Shutdown(msg.into()),
         span_trace: SpanTrace::capture(),
      }
   }
}

impl fmt::Debug for InfraError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("InfraError")
         .field("kind", &self.kind)
         .field("span_trace", &self.span_trace)
         .finish()
   }
}

impl std::error::Error for InfraError {
   fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
      self.kind.source()
   }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<sqlx::Error> for InfraError {
   fn from(source: sqlx::Error) -> Self {
      Self {
         kind:       InfraErrorKind::Connectivity(source),
         span_trace: SpanTrace::capture(),
      }
   }
}

impl From<dotenvy::Error> for InfraError {
   fn from(source: dotenvy::Error) -> Self {
      Self {
         kind:       InfraErrorKind::OverrideFile(source),
         span_trace: SpanTrace::capture(),
      }
   }
}
