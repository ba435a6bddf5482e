//! Story 客户端与远端 API 之间共享的数据模型
//!
//! - `protocol`: 每个 JSON 端点的请求/响应定义
//! - `date`: `createdAt` 时间的本地化展示

use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;

pub use protocol::{
    ApiRequest, HttpMethod, ListStoriesRequest, LoginRequest, RegisterRequest,
    StoryDetailRequest, UnsubscribeRequest,
};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const STORY_DESCRIPTION_FIELD: &str = "description";
pub const STORY_PHOTO_FIELD: &str = "photo";
pub const STORY_LAT_FIELD: &str = "lat";
pub const STORY_LON_FIELD: &str = "lon";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 远端返回的一条 Story 快照，本地只读，不做修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,
    pub name: String,
    pub description: String,
    pub photo_url: String,
    pub created_at: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl Story {
    /// 仅当经纬度同时存在且为有限数时返回坐标
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// 持久化在客户端的登录会话
///
/// 存储格式为单个 JSON 对象 `{token, userId, name}`，缺失即视为未登录。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Session {
    /// `isAuthenticated ⇔ token 非空`
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// 登录成功时返回的身份信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub user_id: String,
    pub name: String,
    pub token: String,
}

impl From<LoginResult> for Session {
    fn from(result: LoginResult) -> Self {
        Session {
            token: Some(result.token),
            user_id: Some(result.user_id),
            name: Some(result.name),
        }
    }
}

// =========================================================
// 响应信封 (Envelopes)
// =========================================================

/// 所有响应共有的 `{error, message}` 信封
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "loginResult")]
    pub login_result: LoginResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryListResponse {
    #[serde(rename = "listStory", default)]
    pub list_story: Vec<Story>,
    /// 当前 API 不返回总数；若部署版本提供则用于精确分页
    #[serde(rename = "totalCount", default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryDetailResponse {
    pub story: Story,
}

// =========================================================
// Web Push 订阅
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

/// 浏览器 `PushSubscription.toJSON()` 中上报给服务端的部分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: PushKeys,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_coordinates_require_both_finite_values() {
        let mut story: Story = serde_json::from_str(
            r#"{"id":"s-1","name":"Dimas","description":"d","photoUrl":"p","createdAt":"2022-01-08T06:34:18.598Z","lat":-6.2,"lon":null}"#,
        )
        .unwrap();
        assert_eq!(story.coordinates(), None);

        story.lon = Some(106.8);
        assert_eq!(story.coordinates(), Some((-6.2, 106.8)));

        story.lat = Some(f64::NAN);
        assert_eq!(story.coordinates(), None);
    }

    #[test]
    fn empty_or_missing_token_is_unauthenticated() {
        assert!(!Session::default().is_authenticated());

        let blank: Session = serde_json::from_str(r#"{"token":""}"#).unwrap();
        assert!(!blank.is_authenticated());

        let session: Session = LoginResult {
            user_id: "user-1".into(),
            name: "Arif".into(),
            token: "tok".into(),
        }
        .into();
        assert!(session.is_authenticated());
        assert_eq!(
            serde_json::to_string(&session).unwrap(),
            r#"{"token":"tok","userId":"user-1","name":"Arif"}"#
        );
    }

    #[test]
    fn list_response_tolerates_missing_stories() {
        let resp: StoryListResponse =
            serde_json::from_str(r#"{"error":false,"message":"ok"}"#).unwrap();
        assert!(resp.list_story.is_empty());
        assert_eq!(resp.total_count, None);
    }
}
