//! Story 前端应用
//!
//! 浏览器外壳：把核心库的 trait 边界接到 Leptos 与 Web API 上。
//! - `web`: 浏览器 API 实现（HTTP、存储、地图、摄像头、推送、过渡、路由接线）
//! - `auth`: 导航栏订阅的认证状态
//! - `components`: 页面与 UI 组件

mod auth;
mod components {
    pub mod add_story;
    pub mod app_bar;
    pub mod common;
    pub mod detail;
    pub mod home;
    pub mod login;
    pub mod register;
    pub mod story_item;
}
mod serde_helper;
pub(crate) mod web;

use std::rc::Rc;

use leptos::prelude::*;
use storyfeed::drawer::Drawer;
use storyfeed::router::Navigator;
use storyfeed::session::SessionStore;
use storyfeed::{ApiContext, AuthModel, ClientConfig, NotificationModel, StoryModel, log_error};
use wasm_bindgen::JsCast;

use crate::auth::AuthContext;
use crate::components::app_bar::{AppBar, SignalDrawer};
use crate::web::http::GlooHttpClient;
use crate::web::route::HashNavigator;
use crate::web::storage::LocalSessionStore;

/// 页面挂载的主内容容器
pub const MAIN_CONTENT_ID: &str = "mainContent";

type Api = ApiContext<GlooHttpClient, LocalSessionStore>;

// =========================================================
// 服务
// =========================================================

/// 应用级依赖，各页面按需取用
pub struct Services {
    api: Api,
    pub navigator: Rc<HashNavigator>,
    pub auth: AuthContext,
}

impl Services {
    pub fn new(config: ClientConfig) -> Self {
        let store = LocalSessionStore::new(config.session_key.clone());
        let auth = AuthContext::new(store.get());
        let navigator = Rc::new(HashNavigator::new(
            auth,
            LocalSessionStore::new(config.session_key.clone()),
        ));
        let api = ApiContext::new(GlooHttpClient, store, config);
        Self {
            api,
            navigator,
            auth,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    pub fn auth_model(&self) -> AuthModel<GlooHttpClient, LocalSessionStore> {
        AuthModel::new(self.api.clone())
    }

    pub fn story_model(&self) -> StoryModel<GlooHttpClient, LocalSessionStore> {
        StoryModel::new(self.api.clone())
    }

    pub fn notification_model(&self) -> NotificationModel<GlooHttpClient, LocalSessionStore> {
        NotificationModel::new(self.api.clone())
    }

    /// 直接读取存储，路由守卫与页面模板都以此为准
    pub fn is_authenticated(&self) -> bool {
        self.api.session().is_authenticated()
    }

    pub fn navigator(&self) -> Rc<dyn Navigator> {
        self.navigator.clone()
    }
}

/// 构建期环境变量，见 build.rs
pub fn load_config() -> ClientConfig {
    ClientConfig::from_lookup(|name| {
        let value = match name {
            "STORY_API_URL" => option_env!("STORY_API_URL"),
            "STORY_SESSION_KEY" => option_env!("STORY_SESSION_KEY"),
            "STORY_PAGE_SIZE" => option_env!("STORY_PAGE_SIZE"),
            "STORY_VAPID_KEY" => option_env!("STORY_VAPID_KEY"),
            _ => None,
        };
        value.map(str::to_string)
    })
}

// =========================================================
// 外壳
// =========================================================

#[component]
fn App(services: Rc<Services>) -> impl IntoView {
    let panel = SignalDrawer::new();
    let drawer = Rc::new(Drawer::new(panel));

    let on_content_click = {
        let drawer = Rc::clone(&drawer);
        move |_| drawer.on_content_click()
    };

    view! {
        <header>
            <AppBar services=services drawer=drawer panel=panel />
        </header>
        <main id=MAIN_CONTENT_ID class="main-content" tabindex="-1" on:click=on_content_click></main>
        <footer class="footer">
            <p>"Dicoding Story"</p>
        </footer>
    }
}

/// 挂载外壳、启动路由并注册 service worker
pub fn start() {
    let services = Rc::new(Services::new(load_config()));

    leptos::mount::mount_to_body({
        let services = Rc::clone(&services);
        move || view! { <App services=services /> }
    });

    let Some(element) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(MAIN_CONTENT_ID))
        .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        log_error!("[App] #{} not found", MAIN_CONTENT_ID);
        return;
    };

    web::router::start(services, element);

    leptos::task::spawn_local(web::push::register_service_worker());
}
