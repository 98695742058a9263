//! # RAS Dashboard API クライアント
//!
//! ダッシュボードからバックエンド API への接続を担当する。
//!
//! ## モジュール構成
//!
//! - [`resolver`] - 実行環境からの接続先解決
//! - [`config`] - 解決済み設定と URL 組み立て
//! - [`client`] - HTTP クライアントとヘルスチェック
//! - [`diagnostics`] - システム診断
//! - [`error`] - クライアントエラー定義

pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod resolver;

pub use client::{ApiClient, HealthCheck};
pub use config::{ApiConfiguration, Endpoint};
pub use diagnostics::{CheckResult, CheckState, DiagnosticReport, run_diagnostics};
pub use error::ClientError;
pub use resolver::{BuildMode, CloudDevTarget, DeploymentTargets, RuntimeEnvironment, resolve};
