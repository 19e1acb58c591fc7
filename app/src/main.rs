//! skillhud frontend
//!
//! Runs in the native shell's webview, or in a plain browser tab where the
//! shell-only features stay hidden.

mod api;
mod audio;
mod components;
mod platform;
mod types;
mod utils;

use dioxus::prelude::*;
use dioxus_logger::tracing::Level;
use gloo_timers::future::TimeoutFuture;
use skillhud_core::{GameSignal, Subscription, now_ms};

use crate::audio::use_audio_provider;
use crate::components::{
    ChatPanel, LevelUpPopup, SignIn, use_chat_provider, use_level_up_provider,
};
use crate::platform::{TauriEventSource, TauriPlatform};
use crate::types::{AppConfig, LevelUpPayload};

/// Floor for the purge loop so a bad config cannot spin it.
const MIN_PURGE_INTERVAL_MS: i64 = 1_000;

/// Timer delay for the purge loop, clamped to what `setTimeout` accepts.
fn purge_sleep_ms(interval_ms: i64) -> u32 {
    u32::try_from(interval_ms.max(MIN_PURGE_INTERVAL_MS)).unwrap_or(u32::MAX)
}

fn main() {
    if let Err(e) = dioxus_logger::init(Level::INFO) {
        web_sys::console::error_1(&format!("Failed to initialize logger: {e}").into());
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let mut config = use_context_provider(|| Signal::new(AppConfig::default()));
    let mut platform = use_context_provider(|| Signal::new(TauriPlatform::default()));
    use_chat_provider();
    let audio = use_audio_provider();
    let level_ups = use_level_up_provider();
    let mut native_events = use_signal(|| None::<Subscription>);

    // Connect to the shell, then load settings
    {
        let level_ups = level_ups.clone();
        use_future(move || {
            let level_ups = level_ups.clone();
            let audio = audio.clone();
            async move {
                native_events.set(Some(level_ups.connect(&TauriEventSource)));
                platform.set(TauriPlatform::probe().await);

                if let Some(loaded) = api::get_config().await {
                    tracing::info!("Loaded config from shell");
                    level_ups.apply_config(&loaded.notifications);
                    if let Some(audio) = &audio {
                        audio.set_volume(&loaded.audio);
                    }
                    config.set(loaded);
                }
            }
        });
    }

    // Sweep processed level-up timestamps
    {
        let level_ups = level_ups.clone();
        use_future(move || {
            let level_ups = level_ups.clone();
            async move {
                loop {
                    let interval = purge_sleep_ms(config.peek().notifications.purge_interval_ms);
                    level_ups.tick(now_ms());
                    TimeoutFuture::new(interval).await;
                }
            }
        });
    }

    use_drop(move || {
        if let Ok(mut events) = native_events.try_write()
            && let Some(subscription) = events.take()
        {
            subscription.cancel();
        }
    });

    let simulate = move |_: MouseEvent| {
        let level = (now_ms() % 98 + 1) as i32;
        let payload = LevelUpPayload {
            skill: "woodcutting".to_string(),
            old_level: level,
            new_level: level + 1,
            timestamp: None,
        };
        level_ups.emit(&GameSignal::level_up(payload, now_ms()));
    };

    rsx! {
        div { class: "hud",
            header { class: "hud-header",
                h1 { "skillhud" }
                SignIn {}
            }
            ChatPanel {}
            LevelUpPopup {}
            if cfg!(debug_assertions) {
                button { class: "btn btn-debug", onclick: simulate, "Simulate level-up" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purge_sleep_is_clamped() {
        assert_eq!(purge_sleep_ms(30_000), 30_000);
        assert_eq!(purge_sleep_ms(0), 1_000);
        assert_eq!(purge_sleep_ms(-5), 1_000);
        // would wrap to a short delay with a plain cast
        assert_eq!(purge_sleep_ms(u32::MAX as i64 + 2), u32::MAX);
    }
}
