//! Account sign-in through the system browser.
//!
//! The provider page opens externally and the result comes back as a deep
//! link. Only rendered when an authorization URL is configured.

use dioxus::prelude::*;
use skillhud_core::Subscription;
use skillhud_core::platform::{OAuthCallback, build_authorize_url, listen_for_oauth};
use skillhud_types::AppConfig;

use crate::platform::{TauriPlatform, open_url_with_fallback};

#[derive(Debug, Clone, PartialEq)]
enum SignInStatus {
    SignedOut,
    Waiting,
    SignedIn,
    Failed(String),
}

/// Random anti-forgery token for one sign-in attempt.
fn new_state_token() -> Result<String, getrandom::Error> {
    let mut bytes = [0u8; 16];
    getrandom::fill(&mut bytes)?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

fn status_for(callback: OAuthCallback, expected_state: Option<&str>) -> SignInStatus {
    if callback.state() != expected_state {
        tracing::warn!("OAuth callback state does not match the pending sign-in");
        return SignInStatus::Failed("Sign-in response did not match this request".to_string());
    }
    match callback {
        OAuthCallback::Authorized { .. } => {
            tracing::info!("Authorization code received");
            SignInStatus::SignedIn
        }
        OAuthCallback::Denied {
            error, description, ..
        } => SignInStatus::Failed(description.unwrap_or(error)),
    }
}

#[component]
pub fn SignIn() -> Element {
    let config = use_context::<Signal<AppConfig>>();
    let platform = use_context::<Signal<TauriPlatform>>();
    let mut status = use_signal(|| SignInStatus::SignedOut);
    let mut pending_state = use_signal(|| None::<String>);
    let mut listener = use_signal(|| None::<Subscription>);

    // Re-register when the shell is detected or the scheme changes
    use_effect(move || {
        let scheme = config.read().account.callback_scheme.clone();
        let platform = platform.read().clone();
        let subscription = listen_for_oauth(&platform, &scheme, move |result| {
            let expected = pending_state.peek().clone();
            let next = match result {
                Ok(callback) => status_for(callback, expected.as_deref()),
                Err(e) => SignInStatus::Failed(e.to_string()),
            };
            let _ = pending_state.try_write().map(|mut s| *s = None);
            let _ = status.try_write().map(|mut s| *s = next);
        });
        listener.set(subscription);
    });

    let Some(authorize_url) = config.read().account.authorize_url.clone() else {
        return rsx! {};
    };

    let start = move |_: MouseEvent| {
        let scheme = config.peek().account.callback_scheme.clone();
        let token = match new_state_token() {
            Ok(token) => token,
            Err(e) => {
                status.set(SignInStatus::Failed(format!("No randomness available: {e}")));
                return;
            }
        };
        let url = match build_authorize_url(&authorize_url, &scheme, &token) {
            Ok(url) => url,
            Err(e) => {
                status.set(SignInStatus::Failed(e.to_string()));
                return;
            }
        };
        match open_url_with_fallback(&*platform.peek(), url.as_str()) {
            Ok(()) => {
                pending_state.set(Some(token));
                status.set(SignInStatus::Waiting);
            }
            Err(e) => status.set(SignInStatus::Failed(e.to_string())),
        }
    };

    let label = match &*status.read() {
        SignInStatus::SignedOut => "Not signed in".to_string(),
        SignInStatus::Waiting => "Waiting for the browser...".to_string(),
        SignInStatus::SignedIn => "Signed in".to_string(),
        SignInStatus::Failed(reason) => format!("Sign-in failed: {reason}"),
    };
    let busy = *status.read() == SignInStatus::Waiting;

    rsx! {
        div { class: "sign-in",
            span { class: "sign-in-status", "{label}" }
            button {
                class: "btn sign-in-btn",
                disabled: busy,
                onclick: start,
                "Sign in"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_state_fails() {
        let callback = OAuthCallback::Authorized {
            code: "c".into(),
            state: Some("other".into()),
        };
        assert!(matches!(
            status_for(callback, Some("mine")),
            SignInStatus::Failed(_)
        ));
    }

    #[test]
    fn denied_prefers_description() {
        let callback = OAuthCallback::Denied {
            error: "access_denied".into(),
            description: Some("User cancelled".into()),
            state: Some("s".into()),
        };
        assert_eq!(
            status_for(callback, Some("s")),
            SignInStatus::Failed("User cancelled".into())
        );
    }

    #[test]
    fn matching_state_signs_in() {
        let callback = OAuthCallback::Authorized {
            code: "c".into(),
            state: Some("s".into()),
        };
        assert_eq!(status_for(callback, Some("s")), SignInStatus::SignedIn);
    }
}
