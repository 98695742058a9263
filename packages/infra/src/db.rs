//! # PostgreSQL データベース接続管理
//!
//! 接続先の解決、接続プールの作成、疎通確認、終了時の解放を行う。
//!
//! ## 接続先の解決
//!
//! 3 つの取得元を優先順位順に試す（詳細は [`resolve_descriptor`]）:
//!
//! | 優先度 | 取得元 | 失敗時 |
//! |--------|--------|--------|
//! | 1 | `DATABASE_URL` | - |
//! | 2 | 上書きファイル（既定 `.env`）内のパターン一致 URL | 次へ進む |
//! | 3 | `DB_HOST` / `DB_PORT` / `DB_NAME` / `DB_USER` / `DB_PASSWORD` | 設定エラー |
//!
//! 上書きファイルは特定の本番データベースへ強制的に接続させるための運用ポリシーであり、
//! `DB_OVERRIDE_HOST_PATTERN` を設定した場合にのみ有効になる。
//!
//! ## TLS
//!
//! `DB_SSL_MODE`（`disable` / `require` / `verify-full`）で明示する。
//! 未設定の場合は従来の挙動として、ホスト名がパターンに一致すれば
//! 証明書検証なしの TLS、それ以外は TLS なしで接続する。
//! 本番環境では `verify-full` と `DB_SSL_ROOT_CERT` を設定すること。
//!
//! ## 接続プール
//!
//! | 項目 | 値 |
//! |------|-----|
//! | 最大接続数 | 10 |
//! | アイドルタイムアウト | 20 秒 |
//! | 接続タイムアウト | 30 秒 |
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use rasdash_infra::db::{self, DatabaseSettings, DotenvOverrideFile};
//!
//! let settings = DatabaseSettings::from_env()?;
//! let overrides = DotenvOverrideFile::new(&settings.override_file);
//! let handle = db::initialize(&settings, &overrides)?;
//!
//! if !handle.test_connection().await {
//!     tracing::warn!("データベースに接続できません");
//! }
//!
//! // 終了時
//! handle.close_connection().await;
//! ```

mod descriptor;
mod handle;
mod override_file;
mod settings;

pub use descriptor::{ConnectionDescriptor, DescriptorSource, TlsDecision, resolve_descriptor};
pub use handle::{
   CONNECT_TIMEOUT,
   DatabaseHandle,
   IDLE_TIMEOUT,
   MAX_CONNECTIONS,
   PoolSettings,
   SHUTDOWN_GRACE_PERIOD,
};
pub use override_file::{DotenvOverrideFile, NoOverride, OverrideSource};
pub use settings::{
   ConnectionComponents,
   DEFAULT_OVERRIDE_FILE,
   DatabaseSettings,
   HostPattern,
   TlsMode,
};

use crate::error::InfraError;

/// データベースハンドルを初期化する
///
/// アプリケーション起動時に一度だけ呼び出し、作成したハンドルを
/// アプリケーション全体で共有する。
///
/// # エラー
///
/// 接続先を導出できない場合は設定エラーを返す。呼び出し元は起動を中止すること。
/// データベースへの接続自体は遅延されるため、ここでは接続失敗は発生しない。
pub fn initialize(
   settings: &DatabaseSettings,
   overrides: &dyn OverrideSource,
) -> Result<DatabaseHandle, InfraError> {
   initialize_with(settings, overrides, &PoolSettings::default())
}

/// プールのパラメータを指定してデータベースハンドルを初期化する
pub fn initialize_with(
   settings: &DatabaseSettings,
   overrides: &dyn OverrideSource,
   pool_settings: &PoolSettings,
) -> Result<DatabaseHandle, InfraError> {
   let descriptor = resolve_descriptor(settings, overrides)?;
   DatabaseHandle::connect_lazy(descriptor, pool_settings)
}
