cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        use wasm_bindgen::prelude::*;

        #[wasm_bindgen]
        extern "C" {
            #[wasm_bindgen(js_namespace = console)]
            pub fn log(s: &str);
        }

        pub fn init() {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        }
    } else {
        pub fn log(s: &str) {
            log::info!(target: "soundball", "{}", s);
        }

        /// Logs to stderr, `info` and up unless `RUST_LOG` says otherwise.
        pub fn init() {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .format_timestamp_millis()
                .init();
        }
    }
}

macro_rules! console_log {
    ($($t:tt)*) => (crate::console::log(&format_args!($($t)*).to_string()))
}

pub(crate) use console_log;
