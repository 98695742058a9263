//! 上書きファイル
//!
//! 作業ディレクトリの設定ファイル（既定 `.env`）に書かれた `DATABASE_URL` を読み取る。
//!
//! これは運用上のポリシーとして意図的に残している経路であり、
//! 汎用の設定が何を指していても特定のリモートデータベースへ接続させるために使う。
//! どのエントリを採用するかの判定（ホスト名パターンとの照合）は
//! [`resolve_descriptor`](super::resolve_descriptor) が行う。

use std::path::{Path, PathBuf};

use crate::error::InfraError;

/// 上書きファイルから読み取るキー
const DATABASE_URL_KEY: &str = "DATABASE_URL";

/// 上書き用の接続 URL の取得元
///
/// 解決処理をファイルシステムから切り離すための抽象化。
pub trait OverrideSource: Send + Sync {
   /// 記載されている `DATABASE_URL` の値を出現順にすべて返す
   fn database_urls(&self) -> Result<Vec<String>, InfraError>;
}

/// dotenv 形式のファイルを読む [`OverrideSource`] 実装
#[derive(Debug, Clone)]
pub struct DotenvOverrideFile {
   path: PathBuf,
}

impl DotenvOverrideFile {
   pub fn new(path: impl Into<PathBuf>) -> Self {
      Self { path: path.into() }
   }

   pub fn path(&self) -> &Path {
      &self.path
   }
}

impl OverrideSource for DotenvOverrideFile {
   /// 行ごとに解釈し、解釈できない行は読み飛ばす
   fn database_urls(&self) -> Result<Vec<String>, InfraError> {
      let content = std::fs::read_to_string(&self.path).map_err(dotenvy::Error::Io)?;
      Ok(content
         .lines()
         .enumerate()
         .filter_map(|(index, line)| database_url_of(line, index + 1))
         .collect())
   }
}

/// 1 行を dotenv 形式として解釈し、`DATABASE_URL` の値を返す
///
/// dotenv は引用符なしと二重引用符の値で `$VAR` を展開するため、
/// `$` を含むそれらの値は元の文字列を復元できないとみなして採用しない。
fn database_url_of(line: &str, line_number: usize) -> Option<String> {
   match dotenvy::from_read_iter(line.as_bytes()).next()? {
      Ok((key, value)) if key == DATABASE_URL_KEY => {
         if expands_variables(line) {
            tracing::warn!(
               line = line_number,
               "上書きファイルの DATABASE_URL に `$` が含まれるため無視します（単一引用符で囲んでください）"
            );
            None
         } else {
            Some(value)
         }
      }
      Ok(_) => None,
      Err(e) => {
         tracing::warn!(line = line_number, error = %e, "上書きファイルの行を解釈できないため読み飛ばします");
         None
      }
   }
}

/// 値が変数展開の対象になるか
fn expands_variables(line: &str) -> bool {
   let raw = line.split_once('=').map_or("", |(_, value)| value.trim());
   raw.contains('$') && !raw.starts_with('\'')
}

/// 上書きファイルを使わない場合の [`OverrideSource`] 実装
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverride;

impl OverrideSource for NoOverride {
   fn database_urls(&self) -> Result<Vec<String>, InfraError> {
      Ok(Vec::new())
   }
}
