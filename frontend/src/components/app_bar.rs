//! 顶部导航栏：品牌、抽屉菜单、认证入口与推送开关

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use storyfeed::drawer::{Drawer, DrawerPanel};
use storyfeed::notification::PushManager;
use storyfeed::{log_info, log_warn};

use crate::Services;
use crate::auth::logout;
use crate::web::push::BrowserPush;

/// 以信号保存开关状态的抽屉面板
#[derive(Clone, Copy)]
pub struct SignalDrawer {
    open: RwSignal<bool>,
}

impl SignalDrawer {
    pub fn new() -> Self {
        Self {
            open: RwSignal::new(false),
        }
    }
}

impl DrawerPanel for SignalDrawer {
    fn is_open(&self) -> bool {
        self.open.get_untracked()
    }

    fn set_open(&self, open: bool) {
        self.open.set(open);
    }
}

pub type AppDrawer = Rc<Drawer<SignalDrawer>>;

// =========================================================
// 推送开关
// =========================================================

#[derive(Clone, Copy)]
struct PushToggle {
    enabled: RwSignal<bool>,
    busy: RwSignal<bool>,
    message: RwSignal<Option<String>>,
}

impl PushToggle {
    fn new() -> Self {
        Self {
            enabled: RwSignal::new(false),
            busy: RwSignal::new(false),
            message: RwSignal::new(None),
        }
    }

    /// 读取浏览器中已有的订阅
    async fn sync(self) {
        let push = BrowserPush;
        if !push.is_supported() {
            return;
        }
        match push.current_subscription().await {
            Ok(current) => {
                self.enabled.set(current.is_some());
            }
            Err(e) => log_warn!("[Push] failed to read subscription: {}", e),
        }
    }

    async fn toggle(self, services: Rc<Services>) {
        if self.busy.get_untracked() {
            return;
        }
        self.busy.set(true);
        self.message.set(None);

        let model = services.notification_model();
        let enabling = !self.enabled.get_untracked();
        let result = if enabling {
            model.enable(&BrowserPush).await
        } else {
            model.disable(&BrowserPush).await
        };

        match result {
            Ok(status) => {
                log_info!("[Push] {}", status.message);
                self.enabled.set(enabling);
            }
            Err(e) => self.message.set(Some(e.message().to_string())),
        }
        self.busy.set(false);
    }
}

// =========================================================
// 组件
// =========================================================

#[component]
pub fn AppBar(services: Rc<Services>, drawer: AppDrawer, panel: SignalDrawer) -> impl IntoView {
    let auth = services.auth;
    let signed_in = auth.is_authenticated_signal();
    let user_name = auth.user_name();

    let push = PushToggle::new();
    let push_supported = BrowserPush.is_supported();
    // 登录后同步一次浏览器中的订阅状态
    Effect::new(move |_| {
        if push_supported && signed_in.get() {
            spawn_local(push.sync());
        }
    });

    let on_trigger = {
        let drawer = Rc::clone(&drawer);
        move |ev: leptos::ev::MouseEvent| {
            // 否则会冒泡到文档并立即关闭
            ev.stop_propagation();
            drawer.on_trigger();
        }
    };

    let on_logout = {
        let services = Rc::clone(&services);
        move |ev: leptos::ev::MouseEvent| {
            ev.prevent_default();
            logout(&services);
        }
    };

    let on_push = {
        let services = Rc::clone(&services);
        move |_| spawn_local(push.toggle(Rc::clone(&services)))
    };

    view! {
        <div class="main-header container">
            <a class="brand-name" href="#/">"Dicoding Story"</a>

            <nav id="navigation-drawer" class="navigation-drawer" class:open=move || panel.open.get()>
                <ul id="nav-list" class="nav-list">
                    <li><a href="#/">"Home"</a></li>
                    <li><a href="#/add">"Add Story"</a></li>
                    <li hidden=move || signed_in.get()><a href="#/login">"Login"</a></li>
                    <li hidden=move || signed_in.get()><a href="#/register">"Register"</a></li>
                    <li hidden=move || !signed_in.get() || !push_supported>
                        <button
                            class="nav-button"
                            disabled=move || push.busy.get()
                            on:click=on_push
                        >
                            {move || if push.enabled.get() { "Disable Notifications" } else { "Enable Notifications" }}
                        </button>
                    </li>
                    <li hidden=move || !signed_in.get()>
                        <span class="nav-user">{move || user_name.get().unwrap_or_default()}</span>
                        <a href="#/" class="nav-button" on:click=on_logout>"Logout"</a>
                    </li>
                </ul>
                {move || push.message.get().map(|message| view! {
                    <p class="nav-notice" role="status">{message}</p>
                })}
            </nav>

            <button id="drawer-button" class="drawer-button" aria-label="Toggle navigation" on:click=on_trigger>
                "☰"
            </button>
        </div>
    }
}
