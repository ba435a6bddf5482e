//! Leaflet 绑定
//!
//! 页面通过 CDN 加载 Leaflet，这里只声明用到的少量 API，
//! 并在其上实现 `MapWidget`。

use std::cell::RefCell;

use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use storyfeed::error::{StoryError, StoryResult};
use storyfeed::map::{Bounds, LatLng, MapWidget};
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

use crate::serde_helper;

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
const NOTICE_CLASS: &str = "map-notice";

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type LeafletMap;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn create_map(container: &HtmlElement) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMap, center: &Array, zoom: u8) -> LeafletMap;

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn fit_bounds(this: &LeafletMap, bounds: &Array) -> LeafletMap;

    #[wasm_bindgen(method, js_name = invalidateSize)]
    fn invalidate_size(this: &LeafletMap) -> LeafletMap;

    #[wasm_bindgen(method)]
    fn on(this: &LeafletMap, event: &str, handler: &Function) -> LeafletMap;

    #[wasm_bindgen(method)]
    fn remove(this: &LeafletMap);
}

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &TileLayer, map: &LeafletMap) -> TileLayer;
}

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type LeafletMarker;

    #[wasm_bindgen(catch, js_namespace = L, js_name = marker)]
    fn create_marker(at: &Array) -> Result<LeafletMarker, JsValue>;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &LeafletMarker, map: &LeafletMap) -> LeafletMarker;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &LeafletMarker, html: &str) -> LeafletMarker;

    #[wasm_bindgen(method)]
    fn remove(this: &LeafletMarker);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileOptions {
    attribution: &'static str,
    max_zoom: u8,
}

fn point(at: LatLng) -> Array {
    Array::of2(&JsValue::from_f64(at.lat), &JsValue::from_f64(at.lon))
}

fn event_position(event: &JsValue) -> Option<LatLng> {
    let latlng = Reflect::get(event, &JsValue::from_str("latlng")).ok()?;
    let lat = Reflect::get(&latlng, &JsValue::from_str("lat")).ok()?.as_f64()?;
    let lng = Reflect::get(&latlng, &JsValue::from_str("lng")).ok()?.as_f64()?;
    Some(LatLng::new(lat, lng))
}

fn leaflet_loaded() -> bool {
    web_sys::window()
        .map(|w| Reflect::has(&w, &JsValue::from_str("L")).unwrap_or(false))
        .unwrap_or(false)
}

/// 挂在某个容器上的 Leaflet 地图
pub struct LeafletWidget {
    map: LeafletMap,
    container: HtmlElement,
    notice: RefCell<Option<Element>>,
    click: RefCell<Option<Closure<dyn FnMut(JsValue)>>>,
}

impl LeafletWidget {
    /// 在 id 为 `container_id` 的元素上创建地图
    pub fn mount(container_id: &str) -> StoryResult<Self> {
        if !leaflet_loaded() {
            return Err(StoryError::map_init("Leaflet library is not available"));
        }

        let container = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(container_id))
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| StoryError::map_init(format!("Map container #{} not found", container_id)))?;

        let map = create_map(&container)
            .map_err(|e| StoryError::map_init(format!("{:?}", e)).in_op("leaflet.map"))?;

        let options = serde_helper::to_value(&TileOptions {
            attribution: TILE_ATTRIBUTION,
            max_zoom: 19,
        })
        .map_err(|e| StoryError::map_init(e.to_string()).in_op("leaflet.tileLayer"))?;
        tile_layer(TILE_URL, &options).add_to(&map);

        Ok(Self {
            map,
            container,
            notice: RefCell::new(None),
            click: RefCell::new(None),
        })
    }

    /// 注册地图点击回调，新的回调替换旧的
    pub fn on_click<F>(&self, handler: F)
    where
        F: Fn(LatLng) + 'static,
    {
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            if let Some(at) = event_position(&event) {
                handler(at);
            }
        });
        self.map.on("click", closure.as_ref().unchecked_ref());
        *self.click.borrow_mut() = Some(closure);
    }
}

impl MapWidget for LeafletWidget {
    type Marker = LeafletMarker;

    fn add_marker(&self, at: LatLng, popup_html: Option<&str>) -> StoryResult<LeafletMarker> {
        let marker = create_marker(&point(at))
            .map_err(|e| StoryError::map_init(format!("{:?}", e)).in_op("leaflet.marker"))?
            .add_to(&self.map);
        if let Some(html) = popup_html {
            marker.bind_popup(html);
        }
        Ok(marker)
    }

    fn remove_marker(&self, marker: &LeafletMarker) {
        marker.remove();
    }

    fn fit_bounds(&self, bounds: &Bounds) {
        let corners = Array::of2(&point(bounds.south_west), &point(bounds.north_east));
        self.map.fit_bounds(&corners);
    }

    fn set_view(&self, center: LatLng, zoom: u8) {
        self.map.set_view(&point(center), zoom);
    }

    fn show_notice(&self, message: &str) {
        let mut notice = self.notice.borrow_mut();
        if notice.is_none() {
            let Some(element) = self
                .container
                .owner_document()
                .and_then(|d| d.create_element("div").ok())
            else {
                return;
            };
            element.set_class_name(NOTICE_CLASS);
            let _ = self.container.append_child(&element);
            *notice = Some(element);
        }
        if let Some(element) = notice.as_ref() {
            element.set_text_content(Some(message));
        }
    }

    fn hide_notice(&self) {
        if let Some(element) = self.notice.borrow_mut().take() {
            element.remove();
        }
    }

    fn invalidate_size(&self) {
        self.map.invalidate_size();
    }

    fn destroy(&self) {
        self.hide_notice();
        self.map.remove();
        self.click.borrow_mut().take();
    }
}
