//! Google and GitHub authorization-code login.
//!
//! A provider turns an authorization code into an email/name pair; what
//! happens with that pair (find-or-create user, issue token) lives in the
//! social login routes.

use anyhow::Context;
use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope,
    TokenResponse, TokenUrl,
};
use reqwest::header::ACCEPT;
use serde::Deserialize;

use crate::config::{OAuthClientConfig, OAuthConfig};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_API: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

const GITHUB_AUTH_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_USER_API: &str = "https://api.github.com/user";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Google,
    GitHub,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::GitHub => "github",
        }
    }

    /// Path segment used in `/api/auth/{provider}/...`
    pub fn from_path(segment: &str) -> Option<Self> {
        match segment {
            "google" => Some(ProviderKind::Google),
            "github" => Some(ProviderKind::GitHub),
            _ => None,
        }
    }
}

/// What a provider tells us about the person signing in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialProfile {
    pub email: String,
    pub name: String,
}

#[derive(Clone)]
pub struct OAuthProvider {
    kind: ProviderKind,
    client: BasicClient,
    http: reqwest::Client,
}

/// Configured providers, `None` where credentials are missing
#[derive(Clone, Default)]
pub struct OAuthProviders {
    pub google: Option<OAuthProvider>,
    pub github: Option<OAuthProvider>,
}

impl OAuthProviders {
    pub fn from_config(config: &OAuthConfig) -> anyhow::Result<Self> {
        let google = config
            .google
            .as_ref()
            .map(|c| OAuthProvider::new(ProviderKind::Google, c, &config.callback_base))
            .transpose()?;
        let github = config
            .github
            .as_ref()
            .map(|c| OAuthProvider::new(ProviderKind::GitHub, c, &config.callback_base))
            .transpose()?;

        for (kind, enabled) in [("google", google.is_some()), ("github", github.is_some())] {
            if !enabled {
                tracing::info!("🔒 {} login disabled (client credentials not set)", kind);
            }
        }

        Ok(Self { google, github })
    }

    pub fn get(&self, kind: ProviderKind) -> Option<&OAuthProvider> {
        match kind {
            ProviderKind::Google => self.google.as_ref(),
            ProviderKind::GitHub => self.github.as_ref(),
        }
    }
}

impl OAuthProvider {
    pub fn new(
        kind: ProviderKind,
        credentials: &OAuthClientConfig,
        callback_base: &str,
    ) -> anyhow::Result<Self> {
        let (auth_url, token_url) = match kind {
            ProviderKind::Google => (GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL),
            ProviderKind::GitHub => (GITHUB_AUTH_URL, GITHUB_TOKEN_URL),
        };
        let redirect = format!("{}/{}/callback", callback_base.trim_end_matches('/'), kind.as_str());

        let client = BasicClient::new(
            ClientId::new(credentials.client_id.clone()),
            Some(ClientSecret::new(credentials.client_secret.clone())),
            AuthUrl::new(auth_url.to_string()).context("invalid authorization url")?,
            Some(TokenUrl::new(token_url.to_string()).context("invalid token url")?),
        )
        .set_auth_type(AuthType::RequestBody)
        .set_redirect_uri(RedirectUrl::new(redirect).context("invalid oauth callback url")?);

        let http = reqwest::Client::builder()
            .user_agent("codefuture-server")
            .build()
            .context("failed to build oauth http client")?;

        Ok(Self { kind, client, http })
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// URL the browser is sent to in order to grant access
    pub fn authorize_url(&self) -> String {
        let scopes: &[&str] = match self.kind {
            ProviderKind::Google => &[
                "https://www.googleapis.com/auth/userinfo.email",
                "https://www.googleapis.com/auth/userinfo.profile",
            ],
            ProviderKind::GitHub => &["user:email"],
        };

        let (url, _) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(scopes.iter().map(|s| Scope::new(s.to_string())))
            .url();

        url.to_string()
    }

    /// Exchange an authorization code and fetch the profile behind it
    pub async fn exchange_code(&self, code: &str) -> anyhow::Result<SocialProfile> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_owned()))
            .request_async(async_http_client)
            .await
            .with_context(|| format!("failed to exchange {} oauth code", self.kind.as_str()))?;
        let access_token = token.access_token().secret();

        match self.kind {
            ProviderKind::Google => {
                let user: GoogleUserResponse = self.fetch_user(GOOGLE_USERINFO_API, access_token).await?;
                Ok(SocialProfile { email: user.email, name: user.name.unwrap_or_default() })
            }
            ProviderKind::GitHub => {
                let user: GithubUserResponse = self.fetch_user(GITHUB_USER_API, access_token).await?;
                tracing::debug!(login = %user.login, "fetched github user profile");
                Ok(user.into_profile())
            }
        }
    }

    async fn fetch_user<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
    ) -> anyhow::Result<T> {
        self.http
            .get(url)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .context("failed to call user profile api")?
            .error_for_status()
            .context("user profile api returned error")?
            .json()
            .await
            .context("failed to decode user profile")
    }
}

#[derive(Deserialize)]
struct GoogleUserResponse {
    email: String,
    name: Option<String>,
}

#[derive(Deserialize)]
struct GithubUserResponse {
    login: String,
    name: Option<String>,
    email: Option<String>,
}

impl GithubUserResponse {
    /// GitHub hides private emails, fall back to a login-derived address
    fn into_profile(self) -> SocialProfile {
        let email = self
            .email
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| format!("{}@github.com", self.login));
        let name = self.name.filter(|n| !n.is_empty()).unwrap_or(self.login);
        SocialProfile { email, name }
    }
}
