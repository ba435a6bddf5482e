//! 摄像头
//!
//! `getUserMedia` 打开视频流，拍照时把预览 `<video>` 的当前帧画到离屏 canvas，
//! 再编码为 JPEG。

use futures::channel::oneshot;
use js_sys::Uint8Array;
use storyfeed::camera::{MediaDevices, MediaStream};
use storyfeed::error::{StoryError, StoryResult};
use storyfeed::story::PhotoBlob;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStreamConstraints,
    MediaStreamTrack,
};

use super::js_message;

/// 预览 `<video>` 元素的 id
pub const VIDEO_ELEMENT_ID: &str = "cameraPreview";

const CAPTURE_FILE_NAME: &str = "camera-capture.jpg";
const CAPTURE_MIME: &str = "image/jpeg";
const CAPTURE_QUALITY: f64 = 0.9;

fn media_error(context: &str, err: &JsValue) -> StoryError {
    StoryError::media_access(js_message(err)).in_op(context.to_string())
}

fn browser_devices() -> Option<web_sys::MediaDevices> {
    web_sys::window()?.navigator().media_devices().ok()
}

/// `navigator.mediaDevices`
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserMediaDevices;

#[async_trait::async_trait(?Send)]
impl MediaDevices for BrowserMediaDevices {
    type Stream = BrowserStream;

    fn is_supported(&self) -> bool {
        browser_devices().is_some()
    }

    async fn open_video(&self) -> StoryResult<BrowserStream> {
        let devices = browser_devices()
            .ok_or_else(|| StoryError::media_access("Camera is not supported in this browser"))?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&JsValue::TRUE);
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| media_error("camera.getUserMedia", &e))?;

        let stream = JsFuture::from(promise)
            .await
            .map_err(|e| media_error("camera.getUserMedia", &e))?
            .dyn_into::<web_sys::MediaStream>()
            .map_err(|e| media_error("camera.getUserMedia", &e))?;

        Ok(BrowserStream { stream })
    }
}

/// 已打开的视频流
pub struct BrowserStream {
    stream: web_sys::MediaStream,
}

impl BrowserStream {
    pub fn media_stream(&self) -> &web_sys::MediaStream {
        &self.stream
    }
}

fn preview_element() -> StoryResult<HtmlVideoElement> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(VIDEO_ELEMENT_ID))
        .and_then(|e| e.dyn_into::<HtmlVideoElement>().ok())
        .ok_or_else(|| StoryError::media_access("Camera preview is not available"))
}

async fn canvas_to_blob(canvas: &HtmlCanvasElement) -> StoryResult<Blob> {
    let (tx, rx) = oneshot::channel::<Option<Blob>>();
    let callback = Closure::once(move |blob: JsValue| {
        let _ = tx.send(blob.dyn_into::<Blob>().ok());
    });

    canvas
        .to_blob_with_type_and_encoder_options(
            callback.as_ref().unchecked_ref(),
            CAPTURE_MIME,
            &JsValue::from_f64(CAPTURE_QUALITY),
        )
        .map_err(|e| media_error("camera.toBlob", &e))?;

    rx.await
        .ok()
        .flatten()
        .ok_or_else(|| StoryError::media_access("Failed to encode the captured frame"))
}

#[async_trait::async_trait(?Send)]
impl MediaStream for BrowserStream {
    async fn capture_frame(&self) -> StoryResult<PhotoBlob> {
        let video = preview_element()?;
        let (width, height) = (video.video_width(), video.video_height());
        if width == 0 || height == 0 {
            return Err(StoryError::media_access("Camera is not ready yet"));
        }

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| StoryError::media_access("Document is not available"))?;
        let canvas = document
            .create_element("canvas")
            .map_err(|e| media_error("camera.canvas", &e))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|e| media_error("camera.canvas", &e))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let context = canvas
            .get_context("2d")
            .map_err(|e| media_error("camera.canvas", &e))?
            .ok_or_else(|| StoryError::media_access("Canvas 2D context is not available"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|e| media_error("camera.canvas", &e))?;
        context
            .draw_image_with_html_video_element_and_dw_and_dh(
                &video,
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            )
            .map_err(|e| media_error("camera.drawImage", &e))?;

        let blob = canvas_to_blob(&canvas).await?;
        let buffer = JsFuture::from(blob.array_buffer())
            .await
            .map_err(|e| media_error("camera.arrayBuffer", &e))?;
        let bytes = Uint8Array::new(&buffer).to_vec();

        Ok(PhotoBlob::new(CAPTURE_FILE_NAME, CAPTURE_MIME, bytes))
    }

    fn stop_tracks(&self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
    }
}
