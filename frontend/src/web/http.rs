//! HTTP 客户端实现
//!
//! 基于 `gloo-net` 的 `HttpClient`；multipart 请求体转换为 `FormData`，
//! 由浏览器生成 boundary，因此不能手动设置 Content-Type。

use gloo_net::http::{Request, RequestBuilder};
use storyfeed::error::{StoryError, StoryResult};
use storyfeed::request::{FormField, HttpClient, HttpRequest, HttpResponse, RequestBody};
use storyfeed_shared::HttpMethod;
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

/// 浏览器 fetch 客户端
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooHttpClient;

fn js_error(context: &str, err: JsValue) -> StoryError {
    StoryError::transport(format!("{}: {:?}", context, err))
}

fn builder(req: &HttpRequest) -> RequestBuilder {
    let mut builder = match req.method {
        HttpMethod::Get => Request::get(&req.url),
        HttpMethod::Post => Request::post(&req.url),
        HttpMethod::Delete => Request::delete(&req.url),
    };
    for (key, value) in &req.headers {
        builder = builder.header(key, value);
    }
    builder
}

/// 用原始字节构造带 MIME 类型的 Blob
pub fn bytes_to_blob(bytes: &[u8], mime_type: &str) -> Result<Blob, JsValue> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

fn form_data(fields: &[FormField]) -> StoryResult<FormData> {
    let form = FormData::new().map_err(|e| js_error("FormData", e))?;

    for field in fields {
        match field {
            FormField::Text { name, value } => form
                .append_with_str(name, value)
                .map_err(|e| js_error("FormData.append", e))?,
            FormField::File {
                name,
                file_name,
                mime_type,
                bytes,
            } => {
                let blob = bytes_to_blob(bytes, mime_type).map_err(|e| js_error("Blob", e))?;
                form.append_with_blob_and_filename(name, &blob, file_name)
                    .map_err(|e| js_error("FormData.append", e))?;
            }
        }
    }
    Ok(form)
}

#[async_trait::async_trait(?Send)]
impl HttpClient for GlooHttpClient {
    async fn send(&self, req: HttpRequest) -> StoryResult<HttpResponse> {
        let builder = builder(&req);

        let request = match &req.body {
            None => builder.build(),
            Some(RequestBody::Json(body)) => builder.body(body.as_str()),
            Some(RequestBody::Multipart(fields)) => builder.body(form_data(fields)?),
        }
        .map_err(|e| StoryError::transport(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| StoryError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoryError::transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
