//! 路由的浏览器接线
//!
//! 核心 `Router` 负责导航流程，这里提供它需要的三样东西：
//! 挂载到 `#mainContent` 的出口、按路由种类创建 Leptos 页面的工厂，
//! 以及 hashchange 到 `render_page` 的转发。

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use storyfeed::error::StoryResult;
use storyfeed::route::{RouteKind, RouteTable};
use storyfeed::router::{Outlet, PageFactory, PageRef, Router};
use storyfeed::transition::TransitionStrategy;
use storyfeed::url_parser::ParsedUrl;
use storyfeed::log_info;
use web_sys::HtmlElement;

use super::route::{current_fragment, on_hash_change};
use super::transition::{ContainerAnimation, DocumentViewTransition};
use crate::Services;
use crate::components::add_story::AddStoryPage;
use crate::components::common::ErrorPanel;
use crate::components::detail::DetailPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;

// =========================================================
// 出口
// =========================================================

/// `#mainContent` 容器
///
/// 每次挂载前先卸载旧内容，容器中始终只有一个页面。
pub struct MainOutlet {
    element: HtmlElement,
    mounted: RefCell<Option<Box<dyn Any>>>,
    route_class: RefCell<Option<&'static str>>,
}

impl MainOutlet {
    pub fn new(element: HtmlElement) -> Self {
        Self {
            element,
            mounted: RefCell::new(None),
            route_class: RefCell::new(None),
        }
    }

    fn replace(&self, markup: AnyView) {
        // 旧句柄 drop 即卸载
        self.mounted.borrow_mut().take();
        let handle = leptos::mount::mount_to(self.element.clone(), move || markup);
        *self.mounted.borrow_mut() = Some(Box::new(handle));
    }
}

impl Outlet for MainOutlet {
    type Markup = AnyView;

    fn mount(&self, markup: AnyView) {
        self.replace(markup);
    }

    fn show_error(&self, message: &str) {
        let message = message.to_string();
        self.replace(view! { <ErrorPanel message=message /> }.into_any());
    }

    fn mark_route(&self, kind: RouteKind) {
        let class_list = self.element.class_list();
        if let Some(previous) = self.route_class.borrow_mut().take() {
            let _ = class_list.remove_1(previous);
        }
        let class = kind.transition_class();
        let _ = class_list.add_1(class);
        *self.route_class.borrow_mut() = Some(class);
    }
}

// =========================================================
// 页面工厂
// =========================================================

pub struct PageRegistry {
    services: Rc<Services>,
}

impl PageRegistry {
    pub fn new(services: Rc<Services>) -> Self {
        Self { services }
    }
}

impl PageFactory for PageRegistry {
    type Markup = AnyView;

    fn create(&self, kind: RouteKind, url: &ParsedUrl) -> StoryResult<PageRef<AnyView>> {
        let services = &self.services;
        let page: PageRef<AnyView> = match kind {
            RouteKind::Home => Rc::new(HomePage::new(services)),
            RouteKind::Detail => Rc::new(DetailPage::new(services, url.raw_id.clone())),
            RouteKind::AddStory => Rc::new(AddStoryPage::new(services, services.navigator())),
            RouteKind::Login => Rc::new(LoginPage::new(services, services.navigator())),
            RouteKind::Register => Rc::new(RegisterPage::new(services, services.navigator())),
        };
        Ok(page)
    }
}

// =========================================================
// 启动
// =========================================================

/// 创建路由器，监听 hashchange 并渲染当前地址
///
/// 路由器由 hashchange 监听器持有，随页面存活。
pub fn start(services: Rc<Services>, element: HtmlElement) {
    let transition = TransitionStrategy::select(
        DocumentViewTransition::detect(),
        ContainerAnimation::new(element.clone()),
    );
    if !transition.is_native() {
        log_info!("[Router] View Transitions unsupported, using class animation");
    }

    let is_authenticated = {
        let services = Rc::clone(&services);
        Rc::new(move || services.is_authenticated())
    };

    let router = Rc::new(Router::new(
        RouteTable::default(),
        PageRegistry::new(Rc::clone(&services)),
        Rc::new(transition),
        Rc::new(MainOutlet::new(element)),
        services.navigator(),
        is_authenticated,
    ));

    on_hash_change({
        let router = Rc::clone(&router);
        move |fragment| {
            let router = Rc::clone(&router);
            spawn_local(async move {
                router.render_page(&fragment).await;
            });
        }
    });

    let initial = current_fragment();
    spawn_local(async move {
        router.render_page(&initial).await;
    });
}
