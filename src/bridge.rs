//! Host-platform bridge: the Telegram Mini App surface, when present.
//!
//! The game never branches on the host directly. One [`HostBridge`] is
//! picked at start-up by [`detect`]; outside Telegram the
//! [`Standalone`] variant supplies no identity and swallows haptics.

use serde::Deserialize;

/// Haptic feedback kinds the game emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HapticEffect {
    /// A tap that earned coins.
    LightImpact,
    /// Navigation between tabs.
    SelectionChanged,
    /// A successful purchase.
    Success,
}

/// `initDataUnsafe.user` as delivered by Telegram.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub language_code: Option<String>,
}

impl TelegramUser {
    /// "First Last", then username, then "User <id>".
    pub fn display_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.first_name,
            self.last_name.as_deref().unwrap_or("")
        );
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }
        match self.username.as_deref() {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => format!("User {}", self.id),
        }
    }

    /// Two-letter avatar initials.
    pub fn initials(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.as_deref().unwrap_or("").trim();
        let username = self.username.as_deref().unwrap_or("").trim();
        let picked: String = if let (Some(f), Some(l)) = (first.chars().next(), last.chars().next()) {
            [f, l].iter().collect()
        } else if !first.is_empty() {
            first.chars().take(2).collect()
        } else if !username.is_empty() {
            username.chars().take(2).collect()
        } else {
            "U".to_string()
        };
        picked.to_uppercase()
    }
}

/// Capabilities the host may provide.
pub trait HostBridge {
    /// Whether the game runs inside the Telegram client.
    fn is_hosted(&self) -> bool;

    /// The signed-in user, if the host shared one.
    fn user(&self) -> Option<&TelegramUser>;

    /// Fire a haptic effect. Never fails.
    fn haptic(&self, effect: HapticEffect);
}

/// Plain browser: no identity, no haptics.
pub struct Standalone;

impl HostBridge for Standalone {
    fn is_hosted(&self) -> bool {
        false
    }

    fn user(&self) -> Option<&TelegramUser> {
        None
    }

    fn haptic(&self, _effect: HapticEffect) {}
}

/// Inside Telegram: wraps `window.Telegram.WebApp`.
#[cfg(target_arch = "wasm32")]
pub struct TelegramHost {
    web_app: wasm_bindgen::JsValue,
    user: Option<TelegramUser>,
}

#[cfg(target_arch = "wasm32")]
mod telegram {
    use js_sys::{Function, Reflect};
    use wasm_bindgen::{JsCast, JsValue};

    use super::{HapticEffect, HostBridge, TelegramHost, TelegramUser};

    fn get(target: &JsValue, key: &str) -> Option<JsValue> {
        Reflect::get(target, &JsValue::from_str(key))
            .ok()
            .filter(|v| !v.is_undefined() && !v.is_null())
    }

    /// Call `target[method](...args)`; missing methods are ignored.
    fn call(target: &JsValue, method: &str, args: &[&str]) {
        let Some(f) = get(target, method).and_then(|v| v.dyn_into::<Function>().ok()) else {
            return;
        };
        let result = match args {
            [] => f.call0(target),
            [a] => f.call1(target, &JsValue::from_str(a)),
            _ => return,
        };
        if let Err(e) = result {
            log::warn!("Hamster Tap: WebApp.{method} failed: {e:?}");
        }
    }

    pub(super) fn decode_user(user: JsValue) -> Option<TelegramUser> {
        match serde_wasm_bindgen::from_value::<TelegramUser>(user) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("Hamster Tap: unreadable Telegram user: {e}");
                None
            }
        }
    }

    impl TelegramHost {
        /// Look up `window.Telegram.WebApp`; `None` outside Telegram.
        pub fn connect() -> Option<Self> {
            let window: JsValue = web_sys::window()?.into();
            let web_app = get(&get(&window, "Telegram")?, "WebApp")?;

            call(&web_app, "ready", &[]);
            call(&web_app, "expand", &[]);

            let user = get(&web_app, "initDataUnsafe")
                .and_then(|init| get(&init, "user"))
                .and_then(decode_user);

            Some(Self { web_app, user })
        }
    }

    impl HostBridge for TelegramHost {
        fn is_hosted(&self) -> bool {
            true
        }

        fn user(&self) -> Option<&TelegramUser> {
            self.user.as_ref()
        }

        fn haptic(&self, effect: HapticEffect) {
            let Some(feedback) = get(&self.web_app, "HapticFeedback") else {
                return;
            };
            match effect {
                HapticEffect::LightImpact => call(&feedback, "impactOccurred", &["light"]),
                HapticEffect::SelectionChanged => call(&feedback, "selectionChanged", &[]),
                HapticEffect::Success => call(&feedback, "notificationOccurred", &["success"]),
            }
        }
    }
}

/// Pick the bridge once at start-up.
pub fn detect() -> Box<dyn HostBridge> {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(host) = TelegramHost::connect() {
            log::info!("Hamster Tap: running inside Telegram");
            return Box::new(host);
        }
    }
    log::warn!("Hamster Tap: Telegram WebApp not available, running standalone");
    Box::new(Standalone)
}
