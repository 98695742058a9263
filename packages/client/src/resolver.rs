//! # API 接続先の解決
//!
//! 実行環境（ホスト名、プロトコル、明示指定、ビルドモード）から
//! API のベース URL とホストを決定する。
//!
//! ## ベース URL の優先順位
//!
//! 最初に一致した規則を採用する。複数の規則に一致しうる場合でも
//! 衝突は検出せず、先の規則が黙って優先される。
//!
//! | 順位 | 条件 | ベース URL |
//! |------|------|------------|
//! | 1 | `API_BASE_URL` が空でない | その値そのまま |
//! | 2 | ホスト名が `localhost` | `http://localhost:8080/api/v1` |
//! | 3 | ホスト名がクラウド開発環境のドメインで終わる | 設定されたクラウド開発環境の URL |
//! | 4 | ホスト名が本番の固定 IP、または本番ビルド | `{protocol}://{hostname}/api` |
//! | 5 | それ以外 | `{protocol}://{hostname}[:8080]/api/v1`（ポートは開発ビルドのみ） |
//!
//! ## ホストの優先順位
//!
//! ホストはベース URL とは独立に次の順で決まる:
//!
//! 1. クラウド開発環境: 設定されたホスト
//! 2. 本番の固定 IP または本番ビルド: `{protocol}://{hostname}`
//! 3. それ以外: ベース URL から最初の `/api/v1` を取り除いたもの

use url::Url;

use crate::{config::ApiConfiguration, error::ClientError};

/// ループバックのホスト名
pub const LOOPBACK_HOSTNAME: &str = "localhost";
/// ローカル開発時のベース URL
pub const LOCAL_API_BASE_URL: &str = "http://localhost:8080/api/v1";
/// 開発ビルドで付与するポート
pub const DEV_API_PORT: u16 = 8080;
/// バージョン付き API パス
pub const VERSIONED_API_PATH: &str = "/api/v1";

/// ビルドモード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
   Development,
   Production,
   /// 未指定またはその他（`test` など）
   #[default]
   Other,
}

impl BuildMode {
   pub fn parse(s: &str) -> Self {
      match s.trim() {
         "development" => Self::Development,
         "production" => Self::Production,
         _ => Self::Other,
      }
   }

   pub fn is_development(self) -> bool {
      self == Self::Development
   }

   pub fn is_production(self) -> bool {
      self == Self::Production
   }

   pub fn as_str(self) -> &'static str {
      match self {
         Self::Development => "development",
         Self::Production => "production",
         Self::Other => "other",
      }
   }
}

/// 実行環境
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEnvironment {
   /// 現在のホスト名（ポートを含まない）
   pub hostname:         String,
   /// 現在のプロトコル（`http` / `https`）
   pub protocol:         String,
   /// 明示指定されたベース URL（`API_BASE_URL`）
   pub api_base_url:     Option<String>,
   /// ビルドモード（`BUILD_MODE`）
   pub build_mode:       BuildMode,
   /// デバッグログの有効化（`DEBUG_MODE=true`）
   pub debug_mode:       bool,
}

impl RuntimeEnvironment {
   /// オリジン（例: `https://dashboard.example.com`）から作成する
   pub fn from_origin(origin: &str) -> Result<Self, ClientError> {
      let url = Url::parse(origin)
         .map_err(|e| ClientError::Configuration(format!("オリジンが不正です: {origin:?} ({e})")))?;
      let hostname = url
         .host_str()
         .ok_or_else(|| ClientError::Configuration(format!("オリジンにホストがありません: {origin:?}")))?;
      Ok(Self {
         hostname:     hostname.to_string(),
         protocol:     url.scheme().to_string(),
         api_base_url: None,
         build_mode:   BuildMode::default(),
         debug_mode:   false,
      })
   }

   /// 環境変数から読み込む
   pub fn from_env() -> Result<Self, ClientError> {
      Self::from_lookup(|key| std::env::var(key).ok())
   }

   /// キー参照関数から読み込む
   ///
   /// | 変数名 | デフォルト |
   /// |--------|------------|
   /// | `DASHBOARD_ORIGIN` | `http://localhost` |
   /// | `API_BASE_URL` | なし |
   /// | `BUILD_MODE` | なし（`Other`） |
   /// | `DEBUG_MODE` | `false` |
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
      let origin = lookup("DASHBOARD_ORIGIN").unwrap_or_else(|| "http://localhost".to_string());
      let mut env = Self::from_origin(&origin)?;
      env.api_base_url = lookup("API_BASE_URL");
      env.build_mode = lookup("BUILD_MODE")
         .map(|v| BuildMode::parse(&v))
         .unwrap_or_default();
      env.debug_mode = lookup("DEBUG_MODE").is_some_and(|v| v == "true");
      Ok(env)
   }

   /// `{protocol}://{hostname}`
   fn origin(&self) -> String {
      format!("{}://{}", self.protocol, self.hostname)
   }
}

/// クラウド開発環境の接続先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudDevTarget {
   /// 判定に使うドメインサフィックス（例: `.dev.example.net`）
   pub domain_suffix: String,
   /// ベース URL
   pub base_url:      String,
   /// ホスト
   pub host:          String,
}

/// 環境固有の接続先
///
/// 特定の環境を指すホスト名や IP アドレスはコードに埋め込まず、ここで注入する。
/// 未設定の規則は一致しない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentTargets {
   pub cloud_dev:            Option<CloudDevTarget>,
   pub static_production_ip: Option<String>,
}

impl DeploymentTargets {
   pub fn from_env() -> Result<Self, ClientError> {
      Self::from_lookup(|key| std::env::var(key).ok())
   }

   /// キー参照関数から読み込む
   ///
   /// `CLOUD_DEV_DOMAIN_SUFFIX` と `CLOUD_DEV_BASE_URL` は組で指定する。
   /// `CLOUD_DEV_HOST` を省略した場合はベース URL から `/api/v1` を除いて導出する。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
      let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

      let cloud_dev = match (get("CLOUD_DEV_DOMAIN_SUFFIX"), get("CLOUD_DEV_BASE_URL")) {
         (Some(domain_suffix), Some(base_url)) => {
            let host = get("CLOUD_DEV_HOST")
               .unwrap_or_else(|| base_url.replacen(VERSIONED_API_PATH, "", 1));
            Some(CloudDevTarget {
               domain_suffix,
               base_url,
               host,
            })
         }
         (None, None) => None,
         _ => {
            return Err(ClientError::Configuration(
               "CLOUD_DEV_DOMAIN_SUFFIX と CLOUD_DEV_BASE_URL は両方指定してください".to_string(),
            ));
         }
      };

      Ok(Self {
         cloud_dev,
         static_production_ip: get("STATIC_PRODUCTION_IP"),
      })
   }

   fn cloud_dev_for(&self, hostname: &str) -> Option<&CloudDevTarget> {
      self.cloud_dev
         .as_ref()
         .filter(|target| hostname.ends_with(&target.domain_suffix))
   }

   fn is_static_production(&self, hostname: &str) -> bool {
      self.static_production_ip.as_deref() == Some(hostname)
   }
}

/// 実行環境から API 設定を解決する
///
/// 副作用を持たず、同じ入力に対して常に同じ結果を返す。
pub fn resolve(env: &RuntimeEnvironment, targets: &DeploymentTargets) -> ApiConfiguration {
   let base_url = resolve_base_url(env, targets);
   let host = resolve_host(env, targets, &base_url);
   ApiConfiguration::new(base_url, host)
}

fn resolve_base_url(env: &RuntimeEnvironment, targets: &DeploymentTargets) -> String {
   if let Some(explicit) = env.api_base_url.as_deref().filter(|url| !url.is_empty()) {
      return explicit.to_string();
   }
   if env.hostname == LOOPBACK_HOSTNAME {
      return LOCAL_API_BASE_URL.to_string();
   }
   if let Some(target) = targets.cloud_dev_for(&env.hostname) {
      return target.base_url.clone();
   }
   if targets.is_static_production(&env.hostname) || env.build_mode.is_production() {
      return format!("{}/api", env.origin());
   }

   let port = if env.build_mode.is_development() {
      format!(":{DEV_API_PORT}")
   } else {
      String::new()
   };
   format!("{}{port}{VERSIONED_API_PATH}", env.origin())
}

fn resolve_host(env: &RuntimeEnvironment, targets: &DeploymentTargets, base_url: &str) -> String {
   if let Some(target) = targets.cloud_dev_for(&env.hostname) {
      return target.host.clone();
   }
   if targets.is_static_production(&env.hostname) || env.build_mode.is_production() {
      return env.origin();
   }
   base_url.replacen(VERSIONED_API_PATH, "", 1)
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   const CLOUD_BASE: &str = "https://backend.cloud-dev.example.net:8080/api/v1";
   const CLOUD_HOST: &str = "https://backend.cloud-dev.example.net:8080";
   const STATIC_IP: &str = "203.0.113.10";

   fn targets() -> DeploymentTargets {
      DeploymentTargets {
         cloud_dev:            Some(CloudDevTarget {
            domain_suffix: ".cloud-dev.example.net".to_string(),
            base_url:      CLOUD_BASE.to_string(),
            host:          CLOUD_HOST.to_string(),
         }),
         static_production_ip: Some(STATIC_IP.to_string()),
      }
   }

   fn env(protocol: &str, hostname: &str, build_mode: BuildMode) -> RuntimeEnvironment {
      RuntimeEnvironment {
         hostname: hostname.to_string(),
         protocol: protocol.to_string(),
         api_base_url: None,
         build_mode,
         debug_mode: false,
      }
   }

   #[rstest]
   #[case::loopback(env("http", "localhost", BuildMode::Other), "http://localhost:8080/api/v1", "http://localhost:8080")]
   #[case::cloud_dev(env("https", "app.cloud-dev.example.net", BuildMode::Development), CLOUD_BASE, CLOUD_HOST)]
   #[case::static_ip(env("http", STATIC_IP, BuildMode::Other), "http://203.0.113.10/api", "http://203.0.113.10")]
   #[case::production(env("https", "ras.example.com", BuildMode::Production), "https://ras.example.com/api", "https://ras.example.com")]
   #[case::development(env("https", "ras.example.com", BuildMode::Development), "https://ras.example.com:8080/api/v1", "https://ras.example.com:8080")]
   #[case::other(env("https", "ras.example.com", BuildMode::Other), "https://ras.example.com/api/v1", "https://ras.example.com")]
   fn test_各環境のベースurlとホスト(
      #[case] env: RuntimeEnvironment,
      #[case] base_url: &str,
      #[case] host: &str,
   ) {
      let sut = resolve(&env, &targets());

      assert_eq!(sut.base_url(), base_url);
      assert_eq!(sut.host(), host);
      assert_eq!(sut.build_api_url("/health"), format!("{host}/health"));
      assert_eq!(sut.build_api_url("/users"), format!("{base_url}/users"));
   }

   #[rstest]
   #[case(BuildMode::Development)]
   #[case(BuildMode::Production)]
   #[case(BuildMode::Other)]
   fn test_localhostは他の条件に関わらずローカルurlになる(#[case] build_mode: BuildMode) {
      let sut = resolve(&env("https", "localhost", build_mode), &targets());

      assert_eq!(sut.base_url(), LOCAL_API_BASE_URL);
   }

   #[rstest]
   #[case("localhost")]
   #[case("app.cloud-dev.example.net")]
   #[case(STATIC_IP)]
   #[case("ras.example.com")]
   fn test_明示指定はホスト名に関わらずそのまま返す(#[case] hostname: &str) {
      let mut env = env("https", hostname, BuildMode::Development);
      env.api_base_url = Some("https://api.example.org/custom/v9".to_string());

      let sut = resolve(&env, &targets());

      assert_eq!(sut.base_url(), "https://api.example.org/custom/v9");
   }

   #[test]
   fn test_空の明示指定は無視される() {
      let mut env = env("http", "localhost", BuildMode::Other);
      env.api_base_url = Some(String::new());

      let sut = resolve(&env, &targets());

      assert_eq!(sut.base_url(), LOCAL_API_BASE_URL);
   }

   #[test]
   fn test_本番ビルドでは明示指定があってもホストはオリジンになる() {
      // ホストの規則はベース URL の規則と独立に評価される
      let mut env = env("https", "ras.example.com", BuildMode::Production);
      env.api_base_url = Some("https://api.example.org/api/v1".to_string());

      let sut = resolve(&env, &targets());

      assert_eq!(sut.base_url(), "https://api.example.org/api/v1");
      assert_eq!(sut.host(), "https://ras.example.com");
   }

   #[test]
   fn test_接続先が未設定ならクラウドと固定ipの規則は一致しない() {
      let sut = resolve(
         &env("http", STATIC_IP, BuildMode::Other),
         &DeploymentTargets::default(),
      );

      assert_eq!(sut.base_url(), "http://203.0.113.10/api/v1");
   }

   #[test]
   fn test_resolveは同じ入力に対して同じ結果を返す() {
      let env = env("https", "ras.example.com", BuildMode::Development);

      let first = resolve(&env, &targets());
      let second = resolve(&env, &targets());

      assert_eq!(first, second);
   }

   #[test]
   fn test_from_lookupでオリジンとフラグを読み込む() {
      let sut = RuntimeEnvironment::from_lookup(|key| match key {
         "DASHBOARD_ORIGIN" => Some("https://ras.example.com:3000".to_string()),
         "API_BASE_URL" => Some("https://api.example.org/api/v1".to_string()),
         "BUILD_MODE" => Some("development".to_string()),
         "DEBUG_MODE" => Some("true".to_string()),
         _ => None,
      })
      .unwrap();

      assert_eq!(sut.hostname, "ras.example.com");
      assert_eq!(sut.protocol, "https");
      assert_eq!(sut.api_base_url.as_deref(), Some("https://api.example.org/api/v1"));
      assert_eq!(sut.build_mode, BuildMode::Development);
      assert!(sut.debug_mode);
   }

   #[test]
   fn test_from_lookupの既定値はlocalhost() {
      let sut = RuntimeEnvironment::from_lookup(|_| None).unwrap();

      assert_eq!(sut.hostname, "localhost");
      assert_eq!(sut.protocol, "http");
      assert_eq!(sut.build_mode, BuildMode::Other);
      assert!(!sut.debug_mode);
   }

   #[test]
   fn test_不正なオリジンは設定エラーになる() {
      let err = RuntimeEnvironment::from_origin("not an origin").unwrap_err();

      assert!(matches!(err, ClientError::Configuration(_)));
   }

   #[test]
   fn test_クラウド開発環境のホスト省略時はベースurlから導出する() {
      let sut = DeploymentTargets::from_lookup(|key| match key {
         "CLOUD_DEV_DOMAIN_SUFFIX" => Some(".cloud-dev.example.net".to_string()),
         "CLOUD_DEV_BASE_URL" => Some(CLOUD_BASE.to_string()),
         _ => None,
      })
      .unwrap();

      assert_eq!(sut.cloud_dev.unwrap().host, CLOUD_HOST);
      assert_eq!(sut.static_production_ip, None);
   }

   #[test]
   fn test_クラウド開発環境の設定が片方だけなら設定エラーになる() {
      let err = DeploymentTargets::from_lookup(|key| match key {
         "CLOUD_DEV_DOMAIN_SUFFIX" => Some(".cloud-dev.example.net".to_string()),
         _ => None,
      })
      .unwrap_err();

      assert!(matches!(err, ClientError::Configuration(_)));
   }
}
