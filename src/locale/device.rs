//! Device locale detection.

use tracing::debug;

/// Return the device locale tag.
///
/// An explicit override (from configuration) wins over the operating
/// system's reported locale.
pub fn detect_device_locale(override_tag: Option<&str>) -> Option<String> {
    if let Some(tag) = override_tag.map(str::trim).filter(|t| !t.is_empty()) {
        debug!("Using configured device locale: {}", tag);
        return Some(tag.to_string());
    }

    let detected = sys_locale::get_locale();
    debug!("Detected system locale: {:?}", detected);
    detected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        assert_eq!(detect_device_locale(Some(" es-ES ")).as_deref(), Some("es-ES"));
    }
}
