//! # API クライアント
//!
//! [`ApiConfiguration`] に従ってバックエンドへリクエストを送る。
//!
//! - タイムアウトは設定値を使う
//! - 通信失敗（接続拒否、タイムアウトなど）は設定のリトライ回数まで再試行する
//! - HTTP ステータスによる失敗は再試行しない

use std::time::Duration;

use rasdash_shared::HealthResponse;

use crate::{
   config::{ApiConfiguration, Endpoint},
   error::ClientError,
};

/// 再試行までの待機時間
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// ヘルスチェック結果
#[derive(Debug, Clone)]
pub enum HealthCheck {
   /// `status` が `"OK"`
   Healthy(HealthResponse),
   /// 応答はあるが `status` が `"OK"` ではない
   Unhealthy(HealthResponse),
   /// 応答を得られない、または解釈できない
   Unreachable(ClientError),
}

impl HealthCheck {
   pub fn is_healthy(&self) -> bool {
      matches!(self, Self::Healthy(_))
   }
}

/// API クライアント
#[derive(Debug, Clone)]
pub struct ApiClient {
   config:      ApiConfiguration,
   client:      reqwest::Client,
   retry_delay: Duration,
}

impl ApiClient {
   /// 設定からクライアントを作成する
   pub fn new(config: ApiConfiguration) -> Result<Self, ClientError> {
      let client = reqwest::Client::builder()
         .timeout(config.timeout())
         .build()
         .map_err(|e| ClientError::Configuration(e.to_string()))?;
      Ok(Self {
         config,
         client,
         retry_delay: RETRY_DELAY,
      })
   }

   /// 再試行までの待機時間を変更する
   pub fn with_retry_delay(mut self, delay: Duration) -> Self {
      self.retry_delay = delay;
      self
   }

   pub fn config(&self) -> &ApiConfiguration {
      &self.config
   }

   /// パスに GET する
   ///
   /// 通信失敗時は `retries` 回まで追加で試行する。
   /// ステータスコードの判定は呼び出し側が行う。
   #[tracing::instrument(skip(self), fields(url))]
   pub async fn get(&self, path: &str) -> Result<reqwest::Response, ClientError> {
      let url = self.config.build_api_url(path);
      tracing::Span::current().record("url", url.as_str());

      let mut attempt = 0;
      loop {
         match self.client.get(&url).send().await {
            Ok(response) => return Ok(response),
            Err(e) if attempt < self.config.retries() => {
               attempt += 1;
               tracing::warn!(error = %e, attempt, "通信に失敗したため再試行します");
               tokio::time::sleep(self.retry_delay).await;
            }
            Err(e) => return Err(e.into()),
         }
      }
   }

   /// 論理エンドポイントに GET する
   pub async fn get_endpoint(&self, endpoint: Endpoint) -> Result<reqwest::Response, ClientError> {
      self.get(endpoint.path()).await
   }

   /// バックエンドのヘルスチェック
   ///
   /// ステータスコードに関わらず本文を解釈し、`status` が `"OK"` と完全一致する
   /// 場合のみ正常とみなす。
   pub async fn check_health(&self) -> HealthCheck {
      let result = async {
         let response = self.get_endpoint(Endpoint::Health).await?;
         let body = response.json::<HealthResponse>().await?;
         Ok::<_, ClientError>(body)
      }
      .await;

      match result {
         Ok(body) if body.is_ok() => HealthCheck::Healthy(body),
         Ok(body) => HealthCheck::Unhealthy(body),
         Err(e) => HealthCheck::Unreachable(e),
      }
   }
}
