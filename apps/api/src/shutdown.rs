//! # シャットダウンシグナル
//!
//! Ctrl+C（SIGINT）と SIGTERM のどちらでも同じ終了処理に入る。

/// 終了シグナルを待つ
///
/// `axum::serve(..).with_graceful_shutdown(..)` に渡す。
/// ハンドラの登録に失敗したシグナルは待たない。
pub async fn shutdown_signal() {
   let ctrl_c = async {
      if let Err(e) = tokio::signal::ctrl_c().await {
         tracing::error!(error = %e, "Ctrl+C ハンドラの登録に失敗しました");
         std::future::pending::<()>().await;
      }
   };

   #[cfg(unix)]
   let terminate = async {
      use tokio::signal::unix::{SignalKind, signal};

      match signal(SignalKind::terminate()) {
         Ok(mut term) => {
            term.recv().await;
         }
         Err(e) => {
            tracing::error!(error = %e, "SIGTERM ハンドラの登録に失敗しました");
            std::future::pending::<()>().await;
         }
      }
   };

   #[cfg(not(unix))]
   let terminate = std::future::pending::<()>();

   tokio::select! {
      _ = ctrl_c => tracing::info!("SIGINT を受信しました。シャットダウンを開始します"),
      _ = terminate => tracing::info!("SIGTERM を受信しました。シャットダウンを開始します"),
   }
}
