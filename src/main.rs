mod logging;

// Pure effect logic. Only the browser build calls it outside of tests.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod contact;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod motion;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod palette;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod pointer;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod site;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod spy;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod theme;

#[cfg(not(target_arch = "wasm32"))]
mod backend;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod frontend;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() {
    if let Err(error) = backend::run().await {
        logging::log_event(
            logging::LogLevel::Warn,
            "server_stopped",
            serde_json::json!({ "error": error.to_string() }),
        );
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
