use std::time::Duration;

use async_trait::async_trait;
use normcontrol_client::Timer;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// Timer backed by `window.setTimeout`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

fn timeout_promise(millis: i32) -> js_sys::Promise {
    js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window().and_then(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
                .ok()
        });
        // Without a window there is nothing to wait on
        if scheduled.is_none() {
            let _ = resolve.call0(&JsValue::NULL);
        }
    })
}

#[async_trait(?Send)]
impl Timer for BrowserTimer {
    async fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        let millis = duration.as_millis().min(i32::MAX as u128) as i32;
        let _ = JsFuture::from(timeout_promise(millis)).await;
    }
}
