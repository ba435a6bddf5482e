//! 首页：分页列表与可切换的地图

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use storyfeed::error::StoryResult;
use storyfeed::pages::home::{HomeController, HomeTemplate, HomeView, Pagination};
use storyfeed::router::Page;
use storyfeed_shared::Story;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};

use super::common::{GuestPrompt, Loader, set_element_hidden};
use super::story_item::StoryItem;
use crate::web::http::GlooHttpClient;
use crate::web::leaflet::LeafletWidget;
use crate::web::storage::LocalSessionStore;
use crate::Services;

const STORIES_MAP_ID: &str = "storiesMap";

#[derive(Clone)]
enum FeedState {
    Loading,
    Loaded(Vec<Story>),
    Failed(String),
}

#[derive(Clone, Copy)]
pub struct HomeSignals {
    feed: RwSignal<FeedState>,
    pagination: RwSignal<Option<Pagination>>,
    map_visible: RwSignal<bool>,
    map_error: RwSignal<Option<String>>,
}

impl HomeSignals {
    fn new() -> Self {
        Self {
            feed: RwSignal::new(FeedState::Loading),
            pagination: RwSignal::new(None),
            map_visible: RwSignal::new(false),
            map_error: RwSignal::new(None),
        }
    }
}

impl HomeView for HomeSignals {
    type Map = LeafletWidget;

    fn show_loading(&self) {
        self.feed.try_set(FeedState::Loading);
    }

    fn show_stories(&self, stories: &[Story]) {
        self.feed.try_set(FeedState::Loaded(stories.to_vec()));
    }

    fn show_load_error(&self, message: &str) {
        self.feed.try_set(FeedState::Failed(message.to_string()));
    }

    fn show_pagination(&self, pagination: &Pagination) {
        self.pagination.try_set(Some(pagination.clone()));
    }

    fn set_map_visible(&self, visible: bool) {
        set_element_hidden(STORIES_MAP_ID, !visible);
        self.map_visible.try_set(visible);
    }

    fn create_map(&self) -> StoryResult<LeafletWidget> {
        self.map_error.try_set(None);
        LeafletWidget::mount(STORIES_MAP_ID)
    }

    fn show_map_error(&self, message: &str) {
        set_element_hidden(STORIES_MAP_ID, true);
        self.map_error.try_set(Some(message.to_string()));
    }
}

fn feed_view(state: FeedState) -> AnyView {
    match state {
        FeedState::Loading => view! { <Loader /> }.into_any(),
        FeedState::Failed(message) => {
            view! { <div class="alert alert-error">{message}</div> }.into_any()
        }
        FeedState::Loaded(stories) if stories.is_empty() => view! {
            <div class="empty-state">
                <p class="empty-state__message">"No stories found"</p>
                <a href="#/add" class="empty-state__action">"Add Story"</a>
            </div>
        }
        .into_any(),
        FeedState::Loaded(stories) => stories
            .into_iter()
            .map(|story| view! { <StoryItem story=story /> })
            .collect_view()
            .into_any(),
    }
}

fn page_buttons(pagination: Pagination) -> impl IntoView {
    (1..=pagination.total_pages)
        .map(|number| {
            let class = if number == pagination.current {
                "pagination-button active"
            } else {
                "pagination-button"
            };
            view! {
                <button class=class data-page=number.to_string()>{number}</button>
            }
        })
        .collect_view()
}

/// 点击的分页按钮上的 `data-page`
fn clicked_page(ev: &MouseEvent) -> Option<String> {
    ev.target()?
        .dyn_into::<Element>()
        .ok()?
        .closest("[data-page]")
        .ok()??
        .get_attribute("data-page")
}

type Controller = HomeController<GlooHttpClient, LocalSessionStore, HomeSignals>;

pub struct HomePage {
    owner: Owner,
    signals: HomeSignals,
    controller: Rc<Controller>,
}

impl HomePage {
    pub fn new(services: &Services) -> Self {
        let owner = Owner::new();
        let signals = owner.with(HomeSignals::new);
        let controller = Rc::new(HomeController::new(
            services.story_model(),
            signals,
            services.is_authenticated(),
        ));
        Self {
            owner,
            signals,
            controller,
        }
    }

    fn feed(&self, size: u32, size_options: [u32; 3]) -> AnyView {
        let signals = self.signals;

        let on_toggle_map = {
            let controller = Rc::clone(&self.controller);
            move |_| {
                controller.toggle_map();
            }
        };

        let on_size_change = {
            let controller = Rc::clone(&self.controller);
            move |ev| {
                let Ok(size) = event_target_value(&ev).parse::<u32>() else {
                    return;
                };
                let controller = Rc::clone(&controller);
                spawn_local(async move { controller.change_page_size(size).await });
            }
        };

        // 分页按钮随数据重建，点击统一委托到容器上
        let on_page_click = {
            let controller = Rc::clone(&self.controller);
            move |ev: MouseEvent| {
                let Some(target) = clicked_page(&ev) else {
                    return;
                };
                let controller = Rc::clone(&controller);
                spawn_local(async move {
                    match target.as_str() {
                        "prev" => controller.prev_page().await,
                        "next" => controller.next_page().await,
                        number => {
                            if let Ok(page) = number.parse::<u32>() {
                                controller.go_to_page(page).await;
                            }
                        }
                    }
                });
            }
        };

        let has_prev = move || signals.pagination.with(|p| p.as_ref().is_some_and(|p| p.has_prev));
        let has_next = move || signals.pagination.with(|p| p.as_ref().is_some_and(|p| p.has_next));
        let pagination_hidden =
            move || !signals.pagination.with(|p| p.as_ref().is_some_and(Pagination::is_visible));

        view! {
            <section class="content">
                <h2>"Dicoding Story"</h2>
                <p>"Berbagi cerita seputar Dicoding, mirip seperti post Instagram namun khusus untuk Dicoding."</p>

                <div class="actions">
                    <div>
                        <button class="form-button" on:click=on_toggle_map>
                            {move || if signals.map_visible.get() { "Hide Map" } else { "Show Map" }}
                        </button>
                        <a href="#/add" class="form-button">"Add Story"</a>
                    </div>
                    <div>
                        <select class="form-input" aria-label="Stories per page" on:change=on_size_change>
                            {size_options
                                .into_iter()
                                .map(|option| {
                                    view! {
                                        <option value=option.to_string() selected={option == size}>
                                            {format!("{} per page", option)}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </div>
                </div>

                <div id=STORIES_MAP_ID class="map-container" hidden=true></div>
                {move || signals.map_error.get().map(|message| view! {
                    <div class="alert alert-error">{message}</div>
                })}

                <div class="story-list">{move || feed_view(signals.feed.get())}</div>

                <div class="pagination" hidden=pagination_hidden on:click=on_page_click>
                    <button class="pagination-button" data-page="prev" disabled=move || !has_prev()>
                        "Prev"
                    </button>
                    {move || signals.pagination.get().map(page_buttons)}
                    <button class="pagination-button" data-page="next" disabled=move || !has_next()>
                        "Next"
                    </button>
                </div>
            </section>
        }
        .into_any()
    }
}

#[async_trait::async_trait(?Send)]
impl Page for HomePage {
    type Markup = AnyView;

    fn template(&self) -> AnyView {
        self.owner.with(|| match self.controller.template() {
            HomeTemplate::GuestPrompt => view! {
                <section class="content">
                    <h2>"Dicoding Story"</h2>
                    <GuestPrompt action="view and share stories" />
                </section>
            }
            .into_any(),
            HomeTemplate::Feed { size, size_options } => self.feed(size, size_options),
        })
    }

    async fn after_render(&self) -> StoryResult<()> {
        self.controller.after_render().await
    }

    fn release(&self) {
        self.controller.release();
    }
}

impl Drop for HomePage {
    fn drop(&mut self) {
        self.owner.cleanup();
    }
}
