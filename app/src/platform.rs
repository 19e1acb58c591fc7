//! Native shell adapters for the core traits.
//!
//! [`TauriEventSource`] turns shell events into [`GameSignal`]s and
//! [`TauriPlatform`] exposes the shell's platform services. Both degrade to
//! no-ops in a plain browser tab.

use skillhud_core::platform::{DeepLinkHandler, PlatformError, validate_external_url};
use skillhud_core::events::SignalCallback;
use skillhud_core::{EventSource, GameSignal, PlatformServices, Subscription, now_ms};
use skillhud_types::{DEEP_LINK_EVENT, LevelUpPayload, PlatformInfo, SKILL_LEVEL_UP_EVENT};
use wasm_bindgen::JsValue;

use crate::api;

// ─────────────────────────────────────────────────────────────────────────────
// Level-up events
// ─────────────────────────────────────────────────────────────────────────────

/// Level-up notifications emitted by the native shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct TauriEventSource;

impl EventSource for TauriEventSource {
    fn subscribe(&self, mut handler: SignalCallback) -> Subscription {
        api::listen(SKILL_LEVEL_UP_EVENT, move |payload: JsValue| {
            match serde_wasm_bindgen::from_value::<LevelUpPayload>(payload) {
                Ok(payload) => handler(&GameSignal::level_up(payload, now_ms())),
                Err(e) => tracing::warn!(error = %e, "Dropping malformed level-up payload"),
            }
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Platform services
// ─────────────────────────────────────────────────────────────────────────────

/// Platform services backed by the native shell.
///
/// `info` is fetched once by [`TauriPlatform::probe`]; `None` means the page
/// is running in a plain browser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TauriPlatform {
    info: Option<PlatformInfo>,
}

impl TauriPlatform {
    pub async fn probe() -> Self {
        if !api::has_native_shell() {
            return Self::default();
        }
        let info = api::get_platform_info().await;
        match &info {
            Some(info) => tracing::info!(platform = info.platform.label(), "Native shell detected"),
            None => tracing::warn!("Native shell did not answer the platform query"),
        }
        Self { info }
    }
}

impl PlatformServices for TauriPlatform {
    fn platform_info(&self) -> Option<PlatformInfo> {
        self.info.clone()
    }

    fn open_external_url(&self, url: &str) -> Result<(), PlatformError> {
        if self.info.is_none() {
            return Err(PlatformError::Unavailable);
        }
        let url = validate_external_url(url)?.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = api::open_url(&url).await {
                tracing::warn!(error = %e, url = %url, "Shell failed to open URL");
            }
        });
        Ok(())
    }

    fn on_deep_link(&self, mut handler: DeepLinkHandler) -> Option<Subscription> {
        self.info.as_ref()?;
        Some(api::listen(DEEP_LINK_EVENT, move |payload: JsValue| {
            // The deep-link plugin delivers either one URL or a batch of them.
            if let Some(url) = payload.as_string() {
                handler(url);
            } else if let Ok(urls) = serde_wasm_bindgen::from_value::<Vec<String>>(payload) {
                for url in urls {
                    handler(url);
                }
            } else {
                tracing::warn!("Ignoring deep link with unexpected payload");
            }
        }))
    }
}

/// Open `url` through the shell, or in a new browser tab when there is none.
pub fn open_url_with_fallback(platform: &dyn PlatformServices, url: &str) -> Result<(), PlatformError> {
    match platform.open_external_url(url) {
        Err(PlatformError::Unavailable) => {
            let url = validate_external_url(url)?;
            let window = web_sys::window().ok_or(PlatformError::Unavailable)?;
            window
                .open_with_url_and_target(url.as_str(), "_blank")
                .map_err(|e| PlatformError::Call(format!("{:?}", e)))?;
            Ok(())
        }
        other => other,
    }
}
