//! Native-shell platform services.
//!
//! The HUD may run inside a packaged desktop/mobile shell or in a plain
//! browser tab. Everything the shell offers is optional: callers branch on
//! the result and treat "no shell" as the normal case.

pub mod oauth;

use skillhud_types::PlatformInfo;
use thiserror::Error;
use url::Url;

use crate::events::Subscription;

pub use oauth::{
    OAuthCallback, OAuthError, build_authorize_url, callback_uri, listen_for_oauth,
    parse_oauth_callback,
};

/// Callback invoked with the raw URL of each deep link.
pub type DeepLinkHandler = Box<dyn FnMut(String)>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("native shell is not available")]
    Unavailable,
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("native call failed: {0}")]
    Call(String),
}

/// Capabilities exposed by the native shell.
pub trait PlatformServices {
    /// Host platform, or `None` outside a native shell.
    fn platform_info(&self) -> Option<PlatformInfo>;

    /// Open `url` in the system browser or handler app.
    fn open_external_url(&self, url: &str) -> Result<(), PlatformError>;

    /// Receive deep links handed to the app by the OS. `None` when the
    /// environment cannot deliver them.
    fn on_deep_link(&self, handler: DeepLinkHandler) -> Option<Subscription>;

    fn is_native(&self) -> bool {
        self.platform_info().is_some()
    }
}

/// The plain-browser environment: no shell, nothing to call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNativePlatform;

impl PlatformServices for NoNativePlatform {
    fn platform_info(&self) -> Option<PlatformInfo> {
        None
    }

    fn open_external_url(&self, _url: &str) -> Result<(), PlatformError> {
        Err(PlatformError::Unavailable)
    }

    fn on_deep_link(&self, _handler: DeepLinkHandler) -> Option<Subscription> {
        None
    }
}

/// Schemes the shell is allowed to hand to the OS.
const EXTERNAL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Check that `raw` is an absolute URL with a scheme safe to open externally.
pub fn validate_external_url(raw: &str) -> Result<Url, PlatformError> {
    let url = Url::parse(raw.trim()).map_err(|e| PlatformError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !EXTERNAL_SCHEMES.contains(&url.scheme()) {
        return Err(PlatformError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("scheme {:?} is not allowed", url.scheme()),
        });
    }
    Ok(url)
}
