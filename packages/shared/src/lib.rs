//! # RAS Dashboard 共有ユーティリティ
//!
//! バックエンド（`rasdash-api`）とクライアント（`rasdash-client`）の双方から
//! 使用される共通型とユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（infra, client, api）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - 外部クレートへの依存は最小限に抑える
//!
//! ## モジュール構成
//!
//! - [`health`] - ヘルスチェックのレスポンス型（サーバー・クライアント共通の契約）
//! - [`observability`] - トレーシング初期化とログ出力形式

pub mod health;
pub mod observability;

pub use health::{DatabaseStatus, HealthResponse, HealthStatus};
