//! 页面切换动画的浏览器实现

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures::channel::oneshot;
use futures::future::select;
use js_sys::{Function, Promise, Reflect};
use storyfeed::error::{StoryError, StoryResult};
use storyfeed::transition::{AnimationHost, DomUpdate, ViewTransitionHost};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AddEventListenerOptions, Document, HtmlElement};

use super::timer;

/// 没有动画或样式缺失时最多等待的时长
const ANIMATION_END_TIMEOUT: Duration = Duration::from_millis(1000);

fn transition_error(context: &str, err: JsValue) -> StoryError {
    StoryError::transport(format!("{}: {:?}", context, err)).in_op("transition.native")
}

// =========================================================
// View Transitions API
// =========================================================

/// `document.startViewTransition`
pub struct DocumentViewTransition {
    document: Document,
    start: Function,
}

impl DocumentViewTransition {
    /// 浏览器不支持时返回 `None`
    pub fn detect() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let start = Reflect::get(&document, &JsValue::from_str("startViewTransition"))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        Some(Self { document, start })
    }
}

#[async_trait::async_trait(?Send)]
impl ViewTransitionHost for DocumentViewTransition {
    async fn start_view_transition(&self, update: DomUpdate) -> StoryResult<()> {
        // 同步抛错时浏览器没有调用回调，由这里补上更新
        let pending = Rc::new(RefCell::new(Some(update)));
        let slot = Rc::clone(&pending);
        let callback = Closure::once_into_js(move || {
            if let Some(update) = slot.borrow_mut().take() {
                update();
            }
        });

        let transition = match self.start.call1(&self.document, &callback) {
            Ok(transition) => transition,
            Err(e) => {
                if let Some(update) = pending.borrow_mut().take() {
                    update();
                }
                return Err(transition_error("startViewTransition", e));
            }
        };

        let finished = Reflect::get(&transition, &JsValue::from_str("finished"))
            .map_err(|e| transition_error("ViewTransition.finished", e))?
            .dyn_into::<Promise>()
            .map_err(|e| transition_error("ViewTransition.finished", e))?;

        JsFuture::from(finished)
            .await
            .map(|_| ())
            .map_err(|e| transition_error("ViewTransition.finished", e))
    }
}

// =========================================================
// class + animationend 回退
// =========================================================

/// 内容容器上的 CSS 动画
pub struct ContainerAnimation {
    element: HtmlElement,
}

impl ContainerAnimation {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

#[async_trait::async_trait(?Send)]
impl AnimationHost for ContainerAnimation {
    fn add_class(&self, class: &str) {
        let _ = self.element.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.element.class_list().remove_1(class);
    }

    async fn animation_end(&self) {
        let (tx, rx) = oneshot::channel::<()>();
        let listener = Closure::once(move || {
            let _ = tx.send(());
        });

        let options = AddEventListenerOptions::new();
        options.set_once(true);
        let registered = self
            .element
            .add_event_listener_with_callback_and_add_event_listener_options(
                "animationend",
                listener.as_ref().unchecked_ref(),
                &options,
            )
            .is_ok();
        if !registered {
            return;
        }

        select(rx, Box::pin(timer::sleep(ANIMATION_END_TIMEOUT))).await;

        // 超时结束时监听器仍挂在元素上
        let _ = self.element.remove_event_listener_with_callback(
            "animationend",
            listener.as_ref().unchecked_ref(),
        );
    }
}
