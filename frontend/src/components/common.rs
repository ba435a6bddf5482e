//! 各页面共用的小组件与视图状态

use leptos::prelude::*;
use storyfeed::pages::Alert;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// 浏览器本地时区相对 UTC 的分钟数（东区为正）
pub fn local_utc_offset() -> i32 {
    -(js_sys::Date::new_0().get_timezone_offset() as i32)
}

/// 直接切换元素的 `hidden`
///
/// 地图容器必须在创建 Leaflet 之前就可见，不能等待响应式更新。
pub fn set_element_hidden(id: &str, hidden: bool) {
    if let Some(element) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    {
        element.set_hidden(hidden);
    }
}

// =========================================================
// 表单状态
// =========================================================

/// 表单的提示框与提交状态
///
/// 页面被替换后 owner 已释放，异步回来的更新用 `try_set` 静默丢弃。
#[derive(Clone, Copy)]
pub struct FormState {
    pub alert: RwSignal<Option<Alert>>,
    pub submitting: RwSignal<bool>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            alert: RwSignal::new(None),
            submitting: RwSignal::new(false),
        }
    }

    pub fn show_alert(&self, alert: Alert) {
        self.alert.try_set(Some(alert));
    }

    pub fn clear_alert(&self) {
        self.alert.try_set(None);
    }

    pub fn set_submitting(&self, submitting: bool) {
        self.submitting.try_set(submitting);
    }
}

// =========================================================
// 组件
// =========================================================

#[component]
pub fn AlertBox(alert: RwSignal<Option<Alert>>) -> impl IntoView {
    move || {
        alert.get().map(|alert| {
            view! {
                <div class=alert.kind.css_class() role="alert">{alert.message}</div>
            }
        })
    }
}

#[component]
pub fn Loader() -> impl IntoView {
    view! {
        <div class="loader" aria-label="Loading">
            <div></div><div></div><div></div><div></div>
        </div>
    }
}

/// 未登录时替代页面内容的提示
#[component]
pub fn GuestPrompt(
    /// 例如 "view and share stories"
    action: &'static str,
) -> impl IntoView {
    view! {
        <div class="alert alert-info guest-prompt">
            <p>"You need to " <a href="#/login">"login"</a> " to " {action} "."</p>
            <div class="guest-prompt__actions">
                <a href="#/login" class="form-button">"Login"</a>
                <a href="#/register" class="form-button">"Register"</a>
            </div>
        </div>
    }
}

/// 路由失败时的错误面板
#[component]
pub fn ErrorPanel(message: String) -> impl IntoView {
    view! {
        <div class="error-container">
            <h2>"Something went wrong"</h2>
            <p>{message}</p>
            <a href="#/">"Go to Home"</a>
        </div>
    }
}
