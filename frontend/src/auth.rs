//! 认证状态
//!
//! 会话持久化在 LocalStorage，这里只保存一份供界面订阅的副本。
//! 路由守卫直接读取存储，不依赖此信号。

use leptos::prelude::*;
use storyfeed::router::Navigator;
use storyfeed_shared::Session;

use crate::Services;

/// 认证上下文
#[derive(Clone, Copy)]
pub struct AuthContext {
    session: RwSignal<Session>,
}

impl AuthContext {
    pub fn new(initial: Session) -> Self {
        Self {
            session: RwSignal::new(initial),
        }
    }

    /// 认证状态信号（用于导航栏）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(Session::is_authenticated))
    }

    pub fn user_name(&self) -> Signal<Option<String>> {
        let session = self.session;
        Signal::derive(move || session.with(|s| s.name.clone()))
    }

    /// 用存储中的最新会话刷新界面
    pub fn refresh(&self, session: Session) {
        self.session.set(session);
    }
}

/// 注销
///
/// 清除会话后回到首页；已经在首页时同样会重新渲染。
pub fn logout(services: &Services) {
    services.auth_model().logout();
    services.navigator.session_changed();
    services.navigator.go("#/");
}
