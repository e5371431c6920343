// Browser console logging. On native targets the arguments are still
// type-checked but nothing is printed, which keeps `cargo test` output clean.

macro_rules! console_log {
    ($($t:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
        #[cfg(not(target_arch = "wasm32"))]
        if false {
            let _ = format!($($t)*);
        };
    }};
}

macro_rules! console_warn {
    ($($t:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        ::web_sys::console::warn_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
        #[cfg(not(target_arch = "wasm32"))]
        if false {
            let _ = format!($($t)*);
        };
    }};
}
