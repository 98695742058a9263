//! # RAS Dashboard インフラ層
//!
//! 外部システム（PostgreSQL）との接続を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **接続先の解決**: 環境変数・上書きファイル・個別要素からの接続 URL 決定
//! - **接続プール管理**: プールの作成、疎通確認、終了時の解放
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL データベース接続管理
//! - [`error`] - インフラ層エラー定義

pub mod db;
pub mod error;

pub use db::DatabaseHandle;
pub use error::{InfraError, InfraErrorKind};
