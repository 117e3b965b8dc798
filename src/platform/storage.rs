//! Key/value persistence
//!
//! LocalStorage in the browser. Native builds keep nothing between runs.

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Read a stored string
#[cfg(target_arch = "wasm32")]
pub fn get(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

/// Write a string, logging failures (quota, private mode)
#[cfg(target_arch = "wasm32")]
pub fn set(key: &str, value: &str) {
    let Some(storage) = local_storage() else {
        log::warn!("LocalStorage unavailable, '{}' not saved", key);
        return;
    };
    if let Err(e) = storage.set_item(key, value) {
        log::warn!("Failed to write '{}': {:?}", key, e);
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn get(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set(key: &str, _value: &str) {
    log::debug!("Skipping save of '{}' (no native storage)", key);
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_native_storage_is_empty() {
        set("zombie_arena_best", "{\"wave\":3,\"time\":1}");
        assert_eq!(get("zombie_arena_best"), None);
    }
}
