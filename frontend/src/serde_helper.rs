//! Rust 值与 JS 对象之间的转换
//!
//! 用于 Leaflet 选项对象与推送订阅的 `toJSON()` 结果。

use serde::{Serialize, de::DeserializeOwned};
use wasm_bindgen::JsValue;

pub type Error = serde_wasm_bindgen::Error;

/// 序列化为普通 JS 对象（map 输出为 object 而不是 `Map`）
pub fn to_value<T: Serialize>(value: &T) -> Result<JsValue, Error> {
    let serializer = serde_wasm_bindgen::Serializer::new()
        .serialize_maps_as_objects(true)
        .serialize_large_number_types_as_bigints(false);
    value.serialize(&serializer)
}

pub fn from_value<T: DeserializeOwned>(value: JsValue) -> Result<T, Error> {
    serde_wasm_bindgen::from_value(value)
}
