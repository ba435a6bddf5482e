//! 发布 Story：照片（文件或摄像头）、描述与可选的地图选点

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use storyfeed::error::StoryResult;
use storyfeed::log_warn;
use storyfeed::map::LatLng;
use storyfeed::pages::add_story::{AddStoryController, AddStoryTemplate, AddStoryView};
use storyfeed::pages::{Alert, FormView};
use storyfeed::router::{Navigator, Page};
use storyfeed::story::PhotoBlob;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement, HtmlVideoElement};

use super::common::{AlertBox, FormState, GuestPrompt, set_element_hidden};
use crate::Services;
use crate::web::camera::{BrowserMediaDevices, BrowserStream, VIDEO_ELEMENT_ID};
use crate::web::http::{GlooHttpClient, bytes_to_blob};
use crate::web::js_message;
use crate::web::leaflet::LeafletWidget;
use crate::web::storage::LocalSessionStore;

const PICKER_MAP_ID: &str = "locationSelector";
const CAMERA_PANEL_ID: &str = "cameraPanel";

// =========================================================
// 视图
// =========================================================

#[derive(Clone, Copy)]
struct AddStorySignals {
    form: FormState,
    description: RwSignal<String>,
    preview_url: RwSignal<Option<String>>,
    location: RwSignal<Option<LatLng>>,
    picker_error: RwSignal<Option<String>>,
    camera_open: RwSignal<bool>,
    camera_opening: RwSignal<bool>,
    photo_input: NodeRef<html::Input>,
}

impl AddStorySignals {
    fn new() -> Self {
        Self {
            form: FormState::new(),
            description: RwSignal::new(String::new()),
            preview_url: RwSignal::new(None),
            location: RwSignal::new(None),
            picker_error: RwSignal::new(None),
            camera_open: RwSignal::new(false),
            camera_opening: RwSignal::new(false),
            photo_input: NodeRef::new(),
        }
    }
}

type PickHandler = Rc<RefCell<Option<Box<dyn Fn(LatLng)>>>>;

pub struct AddStoryForm {
    signals: AddStorySignals,
    devices: BrowserMediaDevices,
    pick_handler: PickHandler,
    /// 当前预览占用的 object URL
    object_url: RefCell<Option<String>>,
}

impl AddStoryForm {
    fn revoke_preview(&self) {
        if let Some(url) = self.object_url.borrow_mut().take() {
            let _ = web_sys::Url::revoke_object_url(&url);
        }
    }
}

impl Drop for AddStoryForm {
    fn drop(&mut self) {
        self.revoke_preview();
    }
}

impl FormView for AddStoryForm {
    fn show_alert(&self, alert: Alert) {
        self.signals.form.show_alert(alert);
    }

    fn clear_alert(&self) {
        self.signals.form.clear_alert();
    }

    fn set_submitting(&self, submitting: bool) {
        self.signals.form.set_submitting(submitting);
    }

    fn reset_form(&self) {
        self.signals.description.try_set(String::new());
        self.clear_photo_input();
    }
}

impl AddStoryView for AddStoryForm {
    type Picker = LeafletWidget;
    type Devices = BrowserMediaDevices;

    fn devices(&self) -> &BrowserMediaDevices {
        &self.devices
    }

    fn create_picker(&self) -> StoryResult<LeafletWidget> {
        let widget = LeafletWidget::mount(PICKER_MAP_ID)?;
        let handler = Rc::clone(&self.pick_handler);
        widget.on_click(move |at| {
            if let Some(pick) = handler.borrow().as_ref() {
                pick(at);
            }
        });
        Ok(widget)
    }

    fn show_picker_error(&self, message: &str) {
        set_element_hidden(PICKER_MAP_ID, true);
        self.signals.picker_error.try_set(Some(message.to_string()));
    }

    fn show_location(&self, at: Option<LatLng>) {
        self.signals.location.try_set(at);
    }

    fn show_preview(&self, photo: Option<&PhotoBlob>) {
        self.revoke_preview();
        let url = photo.and_then(|photo| {
            let blob = bytes_to_blob(&photo.bytes, &photo.mime_type).ok()?;
            web_sys::Url::create_object_url_with_blob(&blob).ok()
        });
        *self.object_url.borrow_mut() = url.clone();
        self.signals.preview_url.try_set(url);
    }

    fn clear_photo_input(&self) {
        if let Some(input) = self.signals.photo_input.get_untracked() {
            input.set_value("");
        }
    }

    fn set_camera_opening(&self, opening: bool) {
        self.signals.camera_opening.try_set(opening);
    }

    fn show_camera(&self, stream: &BrowserStream) {
        set_element_hidden(CAMERA_PANEL_ID, false);
        if let Some(video) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(VIDEO_ELEMENT_ID))
            .and_then(|e| e.dyn_into::<HtmlVideoElement>().ok())
        {
            video.set_src_object(Some(stream.media_stream()));
        }
        self.signals.camera_open.try_set(true);
    }

    fn hide_camera(&self) {
        if let Some(video) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(VIDEO_ELEMENT_ID))
            .and_then(|e| e.dyn_into::<HtmlVideoElement>().ok())
        {
            video.set_src_object(None);
        }
        set_element_hidden(CAMERA_PANEL_ID, true);
        self.signals.camera_open.try_set(false);
    }
}

// =========================================================
// 页面
// =========================================================

type Controller = AddStoryController<GlooHttpClient, LocalSessionStore, AddStoryForm>;

async fn read_file(file: File) -> Result<PhotoBlob, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| js_message(&e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(PhotoBlob::new(file.name(), file.type_(), bytes))
}

fn selected_file(ev: &leptos::ev::Event) -> Option<File> {
    ev.target()?
        .dyn_into::<HtmlInputElement>()
        .ok()?
        .files()?
        .get(0)
}

pub struct AddStoryPage {
    owner: Owner,
    signals: AddStorySignals,
    controller: Rc<Controller>,
}

impl AddStoryPage {
    pub fn new(services: &Services, navigator: Rc<dyn Navigator>) -> Self {
        let owner = Owner::new();
        let signals = owner.with(AddStorySignals::new);
        let pick_handler: PickHandler = Rc::new(RefCell::new(None));
        let view = AddStoryForm {
            signals,
            devices: BrowserMediaDevices,
            pick_handler: Rc::clone(&pick_handler),
            object_url: RefCell::new(None),
        };
        let controller = Rc::new(AddStoryController::new(
            services.story_model(),
            view,
            navigator,
            services.is_authenticated(),
        ));

        // 地图回调不持有控制器，页面销毁后点击自然失效
        let weak: Weak<Controller> = Rc::downgrade(&controller);
        *pick_handler.borrow_mut() = Some(Box::new(move |at| {
            if let Some(controller) = weak.upgrade() {
                controller.pick_location(at);
            }
        }));

        Self {
            owner,
            signals,
            controller,
        }
    }

    fn form(&self, camera_supported: bool) -> AnyView {
        let signals = self.signals;

        let on_photo_change = {
            let controller = Rc::clone(&self.controller);
            move |ev: leptos::ev::Event| {
                let Some(file) = selected_file(&ev) else {
                    controller.clear_photo();
                    return;
                };
                let controller = Rc::clone(&controller);
                spawn_local(async move {
                    match read_file(file).await {
                        Ok(photo) => {
                            controller.select_photo(photo);
                        }
                        Err(message) => {
                            log_warn!("[AddStory] failed to read photo: {}", message);
                            controller.view().show_alert(Alert::error("Failed to read the selected image."));
                        }
                    }
                });
            }
        };

        let on_open_camera = {
            let controller = Rc::clone(&self.controller);
            move |_| {
                let controller = Rc::clone(&controller);
                spawn_local(async move { controller.open_camera().await });
            }
        };

        let on_capture = {
            let controller = Rc::clone(&self.controller);
            move |_| {
                let controller = Rc::clone(&controller);
                spawn_local(async move { controller.capture_photo().await });
            }
        };

        let on_cancel_camera = {
            let controller = Rc::clone(&self.controller);
            move |_| controller.cancel_camera()
        };

        let on_submit = {
            let controller = Rc::clone(&self.controller);
            move |ev: leptos::ev::SubmitEvent| {
                ev.prevent_default();
                let description = signals.description.get_untracked();
                let controller = Rc::clone(&controller);
                spawn_local(async move { controller.submit(&description).await });
            }
        };

        let location_text = move || match signals.location.get() {
            Some(at) => at.display_fixed(),
            None => "No location selected".to_string(),
        };

        view! {
            <section class="content">
                <h2>"Add New Story"</h2>
                <AlertBox alert=signals.form.alert />

                <form class="story-form" on:submit=on_submit>
                    <div class="form-group">
                        <label for="photoInput" class="form-label">"Photo"</label>
                        <input
                            type="file"
                            id="photoInput"
                            class="form-input"
                            accept="image/*"
                            node_ref=signals.photo_input
                            on:change=on_photo_change
                        />
                        <button
                            type="button"
                            class="form-button"
                            hidden={!camera_supported}
                            disabled=move || signals.camera_open.get() || signals.camera_opening.get()
                            on:click=on_open_camera
                        >
                            "Use Camera"
                        </button>
                    </div>

                    <div id=CAMERA_PANEL_ID class="camera-container" hidden=true>
                        <video id=VIDEO_ELEMENT_ID class="camera-preview" autoplay=true playsinline=true></video>
                        <div class="camera-actions">
                            <button type="button" class="form-button" on:click=on_capture>"Capture"</button>
                            <button type="button" class="form-button" on:click=on_cancel_camera>"Cancel"</button>
                        </div>
                    </div>

                    {move || signals.preview_url.get().map(|url| view! {
                        <div class="photo-preview">
                            <img src=url alt="Selected photo preview" class="photo-preview__image" />
                        </div>
                    })}

                    <div class="form-group">
                        <label for="description" class="form-label">"Description"</label>
                        <textarea
                            id="description"
                            class="form-input"
                            rows="5"
                            placeholder="Tell your story..."
                            prop:value=move || signals.description.get()
                            on:input=move |ev| signals.description.set(event_target_value(&ev))
                        ></textarea>
                    </div>

                    <div class="form-group">
                        <label class="form-label">"Location (optional)"</label>
                        <p class="form-hint">"Click on the map to select a location."</p>
                        <div id=PICKER_MAP_ID class="map-container"></div>
                        {move || signals.picker_error.get().map(|message| view! {
                            <div class="alert alert-error">{message}</div>
                        })}
                        <p class="location-info">{location_text}</p>
                    </div>

                    <button type="submit" class="form-button" disabled=move || signals.form.submitting.get()>
                        {move || if signals.form.submitting.get() { "Uploading..." } else { "Share Story" }}
                    </button>
                </form>
            </section>
        }
        .into_any()
    }
}

#[async_trait::async_trait(?Send)]
impl Page for AddStoryPage {
    type Markup = AnyView;

    fn template(&self) -> AnyView {
        self.owner.with(|| match self.controller.template() {
            AddStoryTemplate::GuestPrompt => view! {
                <section class="content">
                    <h2>"Add New Story"</h2>
                    <GuestPrompt action="share a story" />
                </section>
            }
            .into_any(),
            AddStoryTemplate::Form { camera_supported } => self.form(camera_supported),
        })
    }

    async fn after_render(&self) -> StoryResult<()> {
        self.controller.after_render().await
    }

    fn release(&self) {
        self.controller.release();
    }
}

impl Drop for AddStoryPage {
    fn drop(&mut self) {
        // 离开页面时摄像头必须释放
        self.controller.cancel_camera();
        self.controller.view().pick_handler.borrow_mut().take();
        self.owner.cleanup();
    }
}
