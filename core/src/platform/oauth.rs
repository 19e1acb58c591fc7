//! OAuth callbacks delivered as deep links.
//!
//! After the user signs in through the system browser, the identity
//! provider redirects to `<scheme>://oauth/callback?code=…&state=…`, which
//! the OS routes back to the shell as a deep link.

use thiserror::Error;
use url::Url;

use crate::events::Subscription;

use super::PlatformServices;

/// Host (or first path segment) that marks a deep link as an OAuth callback.
pub const OAUTH_CALLBACK_HOST: &str = "oauth";

/// Outcome reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuthCallback {
    /// Sign-in succeeded; `code` is exchanged for a token elsewhere.
    Authorized { code: String, state: Option<String> },
    /// The user or provider refused.
    Denied {
        error: String,
        description: Option<String>,
        state: Option<String>,
    },
}

impl OAuthCallback {
    pub fn state(&self) -> Option<&str> {
        match self {
            Self::Authorized { state, .. } | Self::Denied { state, .. } => state.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OAuthError {
    #[error("malformed callback URL: {0}")]
    Malformed(String),
    #[error("unexpected scheme {found:?} (expected {expected:?})")]
    WrongScheme { expected: String, found: String },
    #[error("deep link is not an OAuth callback")]
    NotACallback,
    #[error("callback carries neither a code nor an error")]
    MissingCode,
}

fn is_callback(url: &Url) -> bool {
    if url.host_str() == Some(OAUTH_CALLBACK_HOST) {
        return true;
    }
    url.path_segments()
        .and_then(|mut segments| segments.next())
        .is_some_and(|first| first == OAUTH_CALLBACK_HOST)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parse a deep link into an OAuth result.
///
/// Parameters are read from the query string, or from the fragment for
/// providers using the implicit flow. Never panics on bad input.
pub fn parse_oauth_callback(raw: &str, expected_scheme: &str) -> Result<OAuthCallback, OAuthError> {
    let url = Url::parse(raw.trim()).map_err(|e| OAuthError::Malformed(e.to_string()))?;

    if !url.scheme().eq_ignore_ascii_case(expected_scheme) {
        return Err(OAuthError::WrongScheme {
            expected: expected_scheme.to_string(),
            found: url.scheme().to_string(),
        });
    }
    if !is_callback(&url) {
        return Err(OAuthError::NotACallback);
    }

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if pairs.is_empty()
        && let Some(fragment) = url.fragment()
    {
        pairs = url::form_urlencoded::parse(fragment.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
    }

    let get = |key: &str| {
        non_empty(
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()),
        )
    };

    let state = get("state");
    if let Some(error) = get("error") {
        return Ok(OAuthCallback::Denied {
            error,
            description: get("error_description"),
            state,
        });
    }
    match get("code") {
        Some(code) => Ok(OAuthCallback::Authorized { code, state }),
        None => Err(OAuthError::MissingCode),
    }
}

/// Redirect URI the provider should send the user back to.
pub fn callback_uri(scheme: &str) -> String {
    format!("{scheme}://{OAUTH_CALLBACK_HOST}/callback")
}

/// Add the redirect URI and anti-forgery `state` to the provider's
/// authorization URL, keeping any parameters it already carries.
pub fn build_authorize_url(base: &str, scheme: &str, state: &str) -> Result<Url, OAuthError> {
    let mut url = Url::parse(base.trim()).map_err(|e| OAuthError::Malformed(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("redirect_uri", &callback_uri(scheme))
        .append_pair("state", state);
    Ok(url)
}

/// Route OAuth callbacks from the platform's deep links to `handler`.
///
/// Deep links that are not OAuth callbacks are ignored. Returns `None` when
/// the platform cannot deliver deep links at all.
pub fn listen_for_oauth(
    platform: &dyn PlatformServices,
    scheme: &str,
    mut handler: impl FnMut(Result<OAuthCallback, OAuthError>) + 'static,
) -> Option<Subscription> {
    let scheme = scheme.to_string();
    platform.on_deep_link(Box::new(move |raw: String| {
        match parse_oauth_callback(&raw, &scheme) {
            Err(OAuthError::NotACallback) => {
                tracing::debug!(url = %raw, "Ignoring non-OAuth deep link");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rejected OAuth callback");
                handler(Err(e));
            }
            Ok(callback) => handler(Ok(callback)),
        }
    }))
}
