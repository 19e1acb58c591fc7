//! Native shell API client module
//!
//! Type-safe wrappers around the Tauri `invoke()`/`listen()` globals. Every
//! wrapper first checks that the shell is actually present, so the same
//! build runs in a plain browser tab where `window.__TAURI__` is missing.

use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use skillhud_core::Subscription;
use skillhud_types::{AppConfig, PlatformInfo};

use crate::utils::js_set;

// ─────────────────────────────────────────────────────────────────────────────
// Raw Tauri Bindings
// ─────────────────────────────────────────────────────────────────────────────

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "event"], js_name = "listen")]
    pub async fn tauri_listen(event: &str, handler: &Closure<dyn FnMut(JsValue)>) -> JsValue;
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Whether the page runs inside the native shell.
pub fn has_native_shell() -> bool {
    web_sys::window()
        .and_then(|window| js_sys::Reflect::get(&window, &JsValue::from_str("__TAURI__")).ok())
        .is_some_and(|tauri| !tauri.is_undefined() && !tauri.is_null())
}

/// Build a JsValue object with a single key-value pair
fn build_args<T: Serialize + ?Sized>(key: &str, value: &T) -> JsValue {
    let args = serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL);
    let obj = js_sys::Object::new();
    js_set(&obj, key, &args);
    obj.into()
}

/// Deserialize a JsValue into a type, returning None on failure (no console logging)
fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Option<T> {
    serde_wasm_bindgen::from_value(value).ok()
}

/// Invoke a shell command, catching any errors silently.
/// Returns JsValue on success, JsValue::NULL on failure or without a shell.
async fn invoke(cmd: &str, args: JsValue) -> JsValue {
    try_invoke(cmd, args).await.unwrap_or(JsValue::NULL)
}

/// Invoke a shell command that may return an error, catching the rejection.
async fn try_invoke(cmd: &str, args: JsValue) -> Result<JsValue, String> {
    use js_sys::Promise;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or("No window")?;
    let tauri = js_sys::Reflect::get(&window, &JsValue::from_str("__TAURI__"))
        .map_err(|_| "No __TAURI__")?;
    if tauri.is_undefined() || tauri.is_null() {
        return Err("No __TAURI__".to_string());
    }
    let core = js_sys::Reflect::get(&tauri, &JsValue::from_str("core")).map_err(|_| "No core")?;
    let invoke_fn =
        js_sys::Reflect::get(&core, &JsValue::from_str("invoke")).map_err(|_| "No invoke")?;
    let invoke_fn: js_sys::Function = invoke_fn.dyn_into().map_err(|_| "invoke not a function")?;

    let promise = invoke_fn
        .call2(&JsValue::NULL, &JsValue::from_str(cmd), &args)
        .map_err(|e| format!("invoke call failed: {:?}", e))?;
    let promise: Promise = promise.dyn_into().map_err(|_| "not a promise")?;

    JsFuture::from(promise)
        .await
        .map_err(|e| e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// Listen to a shell event, passing each event's `payload` to `on_payload`.
///
/// Returns a no-op subscription without a shell. `listen()` resolves
/// asynchronously; dropping the subscription before it does unlistens as
/// soon as the handle arrives.
pub fn listen(event: &'static str, mut on_payload: impl FnMut(JsValue) + 'static) -> Subscription {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    if !has_native_shell() {
        return Subscription::noop();
    }

    let unlisten: Rc<RefCell<Option<js_sys::Function>>> = Rc::new(RefCell::new(None));
    let cancelled = Rc::new(Cell::new(false));

    let closure = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
        let payload = js_sys::Reflect::get(&event, &JsValue::from_str("payload"))
            .unwrap_or(JsValue::UNDEFINED);
        on_payload(payload);
    });

    {
        let unlisten = Rc::clone(&unlisten);
        let cancelled = Rc::clone(&cancelled);
        wasm_bindgen_futures::spawn_local(async move {
            let handle = tauri_listen(event, &closure).await;
            closure.forget();
            if let Ok(func) = handle.dyn_into::<js_sys::Function>() {
                if cancelled.get() {
                    let _ = func.call0(&JsValue::NULL);
                } else {
                    *unlisten.borrow_mut() = Some(func);
                }
            }
        });
    }

    Subscription::new(move || {
        cancelled.set(true);
        if let Some(func) = unlisten.borrow_mut().take() {
            let _ = func.call0(&JsValue::NULL);
        }
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Get the current application configuration
pub async fn get_config() -> Option<AppConfig> {
    let result = invoke("get_config", JsValue::NULL).await;
    from_js(result)
}

// ─────────────────────────────────────────────────────────────────────────────
// Platform Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Ask the shell which platform it runs on
pub async fn get_platform_info() -> Option<PlatformInfo> {
    let result = invoke("get_platform_info", JsValue::NULL).await;
    from_js(result)
}

/// Open a URL in the default browser through the shell
pub async fn open_url(url: &str) -> Result<(), String> {
    try_invoke("open_url", build_args("url", url)).await?;
    Ok(())
}
