//! 浏览器 API 封装
//!
//! 核心库中每个平台边界 trait 的浏览器实现都在这里。

pub mod camera;
pub mod http;
pub mod leaflet;
pub mod push;
pub mod route;
pub mod router;
pub mod storage;
pub mod timer;
pub mod transition;

use wasm_bindgen::JsValue;

/// 从 JS 异常中取出可读消息（`Error.message`，否则为调试输出）
pub fn js_message(err: &JsValue) -> String {
    js_sys::Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}
