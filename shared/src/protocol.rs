use crate::{ApiStatus, LoginResponse, PushSubscription, StoryDetailResponse, StoryListResponse};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// GET 请求不携带 JSON body
    pub fn has_body(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path (or its fixed prefix for parameterized endpoints).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// Path including path parameters and query string.
    fn path(&self) -> String {
        Self::PATH.to_string()
    }
}

// =========================================================
// Request Definitions
// =========================================================

/// Create an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for RegisterRequest {
    type Response = ApiStatus;
    const PATH: &'static str = "/register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Exchange credentials for a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const PATH: &'static str = "/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// One page of the story feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStoriesRequest {
    pub page: u32,
    pub size: u32,
    pub include_location: bool,
}

impl ApiRequest for ListStoriesRequest {
    type Response = StoryListResponse;
    const PATH: &'static str = "/stories";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!(
            "{}?page={}&size={}&location={}",
            Self::PATH,
            self.page,
            self.size,
            u8::from(self.include_location)
        )
    }
}

/// A single story by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryDetailRequest {
    pub id: String,
}

impl ApiRequest for StoryDetailRequest {
    type Response = StoryDetailResponse;
    const PATH: &'static str = "/stories";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

/// Register a push subscription for the signed-in user
impl ApiRequest for PushSubscription {
    type Response = ApiStatus;
    const PATH: &'static str = "/notifications/subscribe";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Remove a push subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsubscribeRequest {
    pub endpoint: String,
}

impl ApiRequest for UnsubscribeRequest {
    type Response = ApiStatus;
    const PATH: &'static str = "/notifications/subscribe";
    const METHOD: HttpMethod = HttpMethod::Delete;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_path_carries_pagination_query() {
        let req = ListStoriesRequest {
            page: 2,
            size: 20,
            include_location: true,
        };
        assert_eq!(req.path(), "/stories?page=2&size=20&location=1");
    }

    #[test]
    fn detail_path_appends_id() {
        let req = StoryDetailRequest {
            id: "story-FvU4u0Vp2S3PMsFg".into(),
        };
        assert_eq!(req.path(), "/stories/story-FvU4u0Vp2S3PMsFg");
        assert!(!StoryDetailRequest::METHOD.has_body());
    }
}
