//! API クライアントと診断の統合テスト
//!
//! プロセス内で axum サーバーを起動し、実際の HTTP 通信で確認する。

use std::{
   net::SocketAddr,
   sync::{
      Arc,
      atomic::{AtomicUsize, Ordering},
   },
   time::Duration,
};

use axum::{Json, Router, http::StatusCode, routing::get};
use pretty_assertions::assert_eq;
use rasdash_client::{
   ApiClient,
   ApiConfiguration,
   CheckState,
   ClientError,
   Endpoint,
   HealthCheck,
   run_diagnostics,
};
use serde_json::json;

async fn spawn(router: Router) -> SocketAddr {
   let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
   let addr = listener.local_addr().unwrap();
   tokio::spawn(async move {
      axum::serve(listener, router).await.unwrap();
   });
   addr
}

/// 接続を受け付けないアドレス
async fn closed_addr() -> SocketAddr {
   let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
   listener.local_addr().unwrap()
}

fn client_for(addr: SocketAddr) -> ApiClient {
   let config = ApiConfiguration::new(format!("http://{addr}/api/v1"), format!("http://{addr}"));
   ApiClient::new(config)
      .unwrap()
      .with_retry_delay(Duration::from_millis(10))
}

fn backend(health_status: &'static str, auth_status: StatusCode) -> Router {
   Router::new()
      .route(
         "/health",
         get(move || async move {
            Json(json!({
               "status": health_status,
               "version": "0.1.0",
               "database": "connected"
            }))
         }),
      )
      .route("/api/v1/auth/validate", get(move || async move { auth_status }))
}

#[tokio::test]
async fn test_okを返すバックエンドは正常と判定される() {
   let addr = spawn(backend("OK", StatusCode::UNAUTHORIZED)).await;

   let result = client_for(addr).check_health().await;

   match result {
      HealthCheck::Healthy(body) => assert_eq!(body.version.as_deref(), Some("0.1.0")),
      other => panic!("Healthy を期待: {other:?}"),
   }
}

#[tokio::test]
async fn test_ok以外のステータスは異常と判定される() {
   let addr = spawn(backend("ok", StatusCode::UNAUTHORIZED)).await;

   let result = client_for(addr).check_health().await;

   assert!(matches!(result, HealthCheck::Unhealthy(body) if body.status == "ok"));
}

#[tokio::test]
async fn test_503でもerrorの本文を解釈する() {
   let router = Router::new().route(
      "/health",
      get(|| async {
         (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "ERROR", "database": "disconnected" })),
         )
      }),
   );
   let addr = spawn(router).await;

   let result = client_for(addr).check_health().await;

   assert!(matches!(result, HealthCheck::Unhealthy(body) if body.status == "ERROR"));
}

#[tokio::test]
async fn test_接続できない場合は到達不能と判定される() {
   let addr = closed_addr().await;

   let result = client_for(addr).check_health().await;

   assert!(matches!(
      result,
      HealthCheck::Unreachable(ClientError::Network(_))
   ));
}

#[tokio::test]
async fn test_解釈できない本文は到達不能と判定される() {
   let router = Router::new().route("/health", get(|| async { "not json" }));
   let addr = spawn(router).await;

   let result = client_for(addr).check_health().await;

   assert!(matches!(result, HealthCheck::Unreachable(_)));
}

#[tokio::test]
async fn test_ステータスエラーは再試行しない() {
   let hits = Arc::new(AtomicUsize::new(0));
   let counter = hits.clone();
   let router = Router::new().route(
      "/api/v1/users",
      get(move || {
         let counter = counter.clone();
         async move {
            counter.fetch_add(1, Ordering::SeqCst);
            StatusCode::INTERNAL_SERVER_ERROR
         }
      }),
   );
   let addr = spawn(router).await;

   let response = client_for(addr).get_endpoint(Endpoint::Users).await.unwrap();

   assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
   assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_全て正常なら診断は成功する() {
   let addr = spawn(backend("OK", StatusCode::UNAUTHORIZED)).await;

   let report = run_diagnostics(&client_for(addr)).await;

   let states: Vec<_> = report.results.iter().map(|r| r.state).collect();
   assert_eq!(states, vec![CheckState::Success; 3]);
   assert!(report.all_passed());
}

#[tokio::test]
async fn test_認証エンドポイントの想定外の応答は警告になる() {
   let addr = spawn(backend("OK", StatusCode::NOT_FOUND)).await;

   let report = run_diagnostics(&client_for(addr)).await;

   assert_eq!(report.results[2].name, "auth_endpoint");
   assert_eq!(report.results[2].state, CheckState::Warning);
   assert!(!report.all_passed());
}

#[tokio::test]
async fn test_バックエンドに接続できない場合の診断() {
   let addr = closed_addr().await;

   let report = run_diagnostics(&client_for(addr)).await;

   let states: Vec<_> = report.results.iter().map(|r| r.state).collect();
   assert_eq!(
      states,
      vec![CheckState::Success, CheckState::Error, CheckState::Error]
   );
   assert!(!report.all_passed());
}
