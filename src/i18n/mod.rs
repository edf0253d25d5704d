//! Internationalization (i18n) module.
//!
//! Translation tables are compiled in with `include_str!` and parsed once.
//! Lookups fall back to English, then to the key itself.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, error};

use crate::locale::Locale;

/// Locale used when the active locale's table lacks a key.
pub const FALLBACK_LOCALE: Locale = Locale::En;

/// Global translation store: Locale -> Key -> Text
static TRANSLATIONS: Lazy<HashMap<Locale, Value>> = Lazy::new(|| {
    let sources = [
        (Locale::En, include_str!("en.json")),
        (Locale::Es, include_str!("es.json")),
        (Locale::Fr, include_str!("fr.json")),
    ];

    let mut map = HashMap::new();
    for (locale, json) in sources {
        match serde_json::from_str(json) {
            Ok(val) => {
                map.insert(locale, val);
            }
            Err(e) => error!("Failed to parse {} translations: {}", locale, e),
        }
    }
    map
});

/// Translation resolver bound to the app's active locale.
#[derive(Debug)]
pub struct Translator {
    active: RwLock<Locale>,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        Self {
            active: RwLock::new(locale),
        }
    }

    pub fn active_locale(&self) -> Locale {
        *self.active.read()
    }

    /// Change the locale used by subsequent `translate` calls.
    pub fn set_active_locale(&self, locale: Locale) {
        let mut active = self.active.write();
        if *active != locale {
            debug!("Translator locale: {} -> {}", *active, locale);
            *active = locale;
        }
    }

    /// Translate `key` in the active locale.
    ///
    /// `options` is a JSON object; its entries replace `%{name}`
    /// placeholders, and a `defaultValue` entry is returned when no table
    /// has the key.
    pub fn translate(&self, key: &str, options: Option<&Value>) -> String {
        translate_in(self.active_locale(), key, options)
    }

    /// Shorthand for `translate` without options.
    pub fn t(&self, key: &str) -> String {
        self.translate(key, None)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(FALLBACK_LOCALE)
    }
}

/// Translate `key` in an explicit locale.
pub fn translate_in(locale: Locale, key: &str, options: Option<&Value>) -> String {
    let text = lookup(locale, key)
        .or_else(|| {
            if locale != FALLBACK_LOCALE {
                lookup(FALLBACK_LOCALE, key)
            } else {
                None
            }
        })
        .or_else(|| {
            options
                .and_then(|o| o.get("defaultValue"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| key.to_string());

    match options {
        Some(Value::Object(vars)) => interpolate(&text, vars),
        _ => text,
    }
}

/// Check whether `locale`'s own table has `key`, without fallback.
pub fn has_key(locale: Locale, key: &str) -> bool {
    lookup(locale, key).is_some()
}

fn lookup(locale: Locale, key: &str) -> Option<String> {
    TRANSLATIONS
        .get(&locale)
        .and_then(|val| resolve_key(val, key))
}

/// Supports nested keys via dot notation, e.g., "onboarding.welcome_title".
fn resolve_key(val: &Value, key: &str) -> Option<String> {
    let mut current = val;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    current.as_str().map(|s| s.to_string())
}

fn interpolate(text: &str, vars: &serde_json::Map<String, Value>) -> String {
    let mut result = text.to_string();
    for (name, value) in vars {
        let placeholder = format!("%{{{}}}", name);
        if !result.contains(&placeholder) {
            continue;
        }
        let replacement = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        result = result.replace(&placeholder, &replacement);
    }
    result
}
