//! 定时器封装模块
//!
//! 基于 `gloo-timers`，统一以 `Duration` 表达延迟。

use std::time::Duration;

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;

fn millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}

/// 延迟执行一次回调，不可取消
pub fn after<F>(delay: Duration, callback: F)
where
    F: FnOnce() + 'static,
{
    Timeout::new(millis(delay), callback).forget();
}

/// 异步等待
pub async fn sleep(delay: Duration) {
    TimeoutFuture::new(millis(delay)).await;
}
