//! Hash 路由的浏览器侧操作
//!
//! 所有对 `window.location.hash` 的读写集中在此模块。

use std::time::Duration;

use storyfeed::router::Navigator;
use storyfeed::session::SessionStore;
use wasm_bindgen::prelude::*;

use super::storage::LocalSessionStore;
use super::timer;
use crate::auth::AuthContext;

/// 当前 hash，包含 `#`；没有 hash 时为空串
pub fn current_fragment() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// 跳转到 `fragment`
///
/// 与当前 hash 相同时浏览器不会触发 hashchange，此时手动派发一次以重新渲染。
pub fn set_fragment(fragment: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };

    if current_fragment() == fragment {
        if let Ok(event) = web_sys::Event::new("hashchange") {
            let _ = window.dispatch_event(&event);
        }
    } else {
        let _ = window.location().set_hash(fragment);
    }
}

/// 监听 hashchange，监听器随页面存活
pub fn on_hash_change<F>(callback: F)
where
    F: Fn(String) + 'static,
{
    let closure = Closure::<dyn Fn()>::new(move || callback(current_fragment()));

    if let Some(window) = web_sys::window() {
        let _ = window
            .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
    }

    closure.forget();
}

/// 基于 location.hash 的导航
pub struct HashNavigator {
    auth: AuthContext,
    store: LocalSessionStore,
}

impl HashNavigator {
    pub fn new(auth: AuthContext, store: LocalSessionStore) -> Self {
        Self { auth, store }
    }
}

impl Navigator for HashNavigator {
    fn go(&self, fragment: &str) {
        set_fragment(fragment);
    }

    fn go_after(&self, fragment: &str, delay: Duration) {
        let fragment = fragment.to_string();
        timer::after(delay, move || set_fragment(&fragment));
    }

    fn session_changed(&self) {
        self.auth.refresh(self.store.get());
    }
}
