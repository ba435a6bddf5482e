//! Web Push 与 Service Worker
//!
//! 订阅对象通过 `toJSON()` 转换为共享的 `PushSubscription` 再上报服务端。

use js_sys::{Promise, Reflect};
use storyfeed::error::{StoryError, StoryResult};
use storyfeed::notification::PushManager;
use storyfeed_shared::PushSubscription;
use storyfeed::{log_info, log_warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{PushSubscriptionOptionsInit, ServiceWorkerRegistration};

use super::js_message;
use crate::serde_helper;

const SERVICE_WORKER_URL: &str = "/sw.js";
const PERMISSION_GRANTED: &str = "granted";

fn push_error(context: &str, err: &JsValue) -> StoryError {
    StoryError::transport(js_message(err)).in_op(context.to_string())
}

async fn await_promise(context: &str, promise: Promise) -> StoryResult<JsValue> {
    JsFuture::from(promise)
        .await
        .map_err(|e| push_error(context, &e))
}

/// 页面加载后注册 Service Worker，失败只记录日志
pub async fn register_service_worker() {
    let Some(window) = web_sys::window() else {
        return;
    };
    if !BrowserPush.is_supported() {
        return;
    }

    let container = window.navigator().service_worker();
    match JsFuture::from(container.register(SERVICE_WORKER_URL)).await {
        Ok(registration) => {
            let scope = registration
                .dyn_into::<ServiceWorkerRegistration>()
                .map(|r| r.scope())
                .unwrap_or_default();
            log_info!("[Push] ServiceWorker registered with scope: {}", scope);
        }
        Err(e) => log_warn!("[Push] ServiceWorker registration failed: {}", js_message(&e)),
    }
}

/// 浏览器推送
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserPush;

impl BrowserPush {
    async fn registration(&self) -> StoryResult<ServiceWorkerRegistration> {
        let window = web_sys::window()
            .ok_or_else(|| StoryError::transport("Window is not available"))?;
        let ready = window
            .navigator()
            .service_worker()
            .ready()
            .map_err(|e| push_error("push.ready", &e))?;
        await_promise("push.ready", ready)
            .await?
            .dyn_into::<ServiceWorkerRegistration>()
            .map_err(|e| push_error("push.ready", &e))
    }

    async fn browser_subscription(&self) -> StoryResult<Option<web_sys::PushSubscription>> {
        let manager = self
            .registration()
            .await?
            .push_manager()
            .map_err(|e| push_error("push.manager", &e))?;
        let promise = manager
            .get_subscription()
            .map_err(|e| push_error("push.getSubscription", &e))?;
        let value = await_promise("push.getSubscription", promise).await?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        value
            .dyn_into::<web_sys::PushSubscription>()
            .map(Some)
            .map_err(|e| push_error("push.getSubscription", &e))
    }
}

fn has_property(target: &JsValue, key: &str) -> bool {
    Reflect::has(target, &JsValue::from_str(key)).unwrap_or(false)
}

fn to_shared(subscription: &web_sys::PushSubscription) -> StoryResult<PushSubscription> {
    let json = subscription
        .to_json()
        .map_err(|e| push_error("push.toJSON", &e))?;
    serde_helper::from_value(json.into())
        .map_err(|e| StoryError::transport(e.to_string()).in_op("push.toJSON"))
}

#[async_trait::async_trait(?Send)]
impl PushManager for BrowserPush {
    fn is_supported(&self) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        has_property(&window.navigator(), "serviceWorker") && has_property(&window, "PushManager")
    }

    async fn request_permission(&self) -> StoryResult<bool> {
        let promise = web_sys::Notification::request_permission()
            .map_err(|e| push_error("push.requestPermission", &e))?;
        let permission = await_promise("push.requestPermission", promise).await?;
        Ok(permission.as_string().as_deref() == Some(PERMISSION_GRANTED))
    }

    async fn subscribe(&self, vapid_public_key: &str) -> StoryResult<PushSubscription> {
        let manager = self
            .registration()
            .await?
            .push_manager()
            .map_err(|e| push_error("push.manager", &e))?;

        let options = PushSubscriptionOptionsInit::new();
        options.set_user_visible_only(true);
        Reflect::set(
            &options,
            &JsValue::from_str("applicationServerKey"),
            &JsValue::from_str(vapid_public_key),
        )
        .map_err(|e| push_error("push.subscribe", &e))?;

        let promise = manager
            .subscribe_with_options(&options)
            .map_err(|e| push_error("push.subscribe", &e))?;
        let subscription = await_promise("push.subscribe", promise)
            .await?
            .dyn_into::<web_sys::PushSubscription>()
            .map_err(|e| push_error("push.subscribe", &e))?;

        to_shared(&subscription)
    }

    async fn current_subscription(&self) -> StoryResult<Option<PushSubscription>> {
        match self.browser_subscription().await? {
            Some(subscription) => to_shared(&subscription).map(Some),
            None => Ok(None),
        }
    }

    async fn unsubscribe(&self) -> StoryResult<()> {
        let Some(subscription) = self.browser_subscription().await? else {
            return Ok(());
        };
        let promise = subscription
            .unsubscribe()
            .map_err(|e| push_error("push.unsubscribe", &e))?;
        await_promise("push.unsubscribe", promise).await.map(|_| ())
    }
}
