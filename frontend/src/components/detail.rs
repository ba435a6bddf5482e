use leptos::prelude::*;
use storyfeed::error::StoryResult;
use storyfeed::pages::detail::{DetailController, DetailTemplate, DetailView};
use storyfeed::router::Page;
use storyfeed_shared::Story;
use storyfeed_shared::date::format_long_datetime;

use super::common::{GuestPrompt, Loader, local_utc_offset, set_element_hidden};
use crate::Services;
use crate::web::http::GlooHttpClient;
use crate::web::leaflet::LeafletWidget;
use crate::web::storage::LocalSessionStore;

const DETAIL_MAP_ID: &str = "detailMap";

#[derive(Clone)]
enum DetailState {
    Loading,
    Loaded(Story),
    Failed(String),
}

#[derive(Clone, Copy)]
pub struct DetailSignals {
    state: RwSignal<DetailState>,
    map_error: RwSignal<Option<String>>,
}

impl DetailView for DetailSignals {
    type Map = LeafletWidget;

    fn show_loading(&self) {
        self.state.try_set(DetailState::Loading);
    }

    fn show_story(&self, story: &Story, with_map: bool) {
        // 地图容器在模板外层，先于 create_map 显示
        set_element_hidden(DETAIL_MAP_ID, !with_map);
        self.state.try_set(DetailState::Loaded(story.clone()));
    }

    fn show_error(&self, message: &str) {
        set_element_hidden(DETAIL_MAP_ID, true);
        self.state.try_set(DetailState::Failed(message.to_string()));
    }

    fn create_map(&self) -> StoryResult<LeafletWidget> {
        LeafletWidget::mount(DETAIL_MAP_ID)
    }

    fn show_map_error(&self, message: &str) {
        set_element_hidden(DETAIL_MAP_ID, true);
        self.map_error.try_set(Some(message.to_string()));
    }
}

fn story_view(story: Story) -> AnyView {
    let created = format_long_datetime(&story.created_at, local_utc_offset());
    let alt = format!("Photo by {}", story.name);
    let title = format!("Story by {}", story.name);
    let location = story
        .coordinates()
        .map(|(lat, lon)| format!("Location: {:.6}, {:.6}", lat, lon));

    view! {
        <article class="story-detail">
            <img src=story.photo_url alt=alt class="story-detail__image" />
            <div class="story-detail__content">
                <h2 class="story-detail__title">{title}</h2>
                <p class="story-detail__info">{created}</p>
                <p class="story-detail__description">{story.description}</p>
                {location.map(|text| view! { <p class="story-detail__location">{text}</p> })}
            </div>
        </article>
    }
    .into_any()
}

type Controller = DetailController<GlooHttpClient, LocalSessionStore, DetailSignals>;

pub struct DetailPage {
    owner: Owner,
    signals: DetailSignals,
    controller: Controller,
}

impl DetailPage {
    pub fn new(services: &Services, story_id: Option<String>) -> Self {
        let owner = Owner::new();
        let signals = owner.with(|| DetailSignals {
            state: RwSignal::new(DetailState::Loading),
            map_error: RwSignal::new(None),
        });
        let controller = DetailController::new(
            services.story_model(),
            signals,
            services.is_authenticated(),
            story_id,
        );
        Self {
            owner,
            signals,
            controller,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Page for DetailPage {
    type Markup = AnyView;

    fn template(&self) -> AnyView {
        let signals = self.signals;
        self.owner.with(|| match self.controller.template() {
            DetailTemplate::GuestPrompt => view! {
                <section class="content">
                    <h2>"Story Detail"</h2>
                    <GuestPrompt action="view story details" />
                </section>
            }
            .into_any(),
            DetailTemplate::Loading => view! {
                <section class="content">
                    <a href="#/" class="back-link">"← Back to Stories"</a>
                    {move || match signals.state.get() {
                        DetailState::Loading => view! { <Loader /> }.into_any(),
                        DetailState::Loaded(story) => story_view(story),
                        DetailState::Failed(message) => view! {
                            <div class="alert alert-error">{message}</div>
                        }
                        .into_any(),
                    }}
                    <div id=DETAIL_MAP_ID class="map-container" hidden=true></div>
                    {move || signals.map_error.get().map(|message| view! {
                        <div class="alert alert-error">{message}</div>
                    })}
                </section>
            }
            .into_any(),
        })
    }

    async fn after_render(&self) -> StoryResult<()> {
        self.controller.after_render().await
    }

    fn release(&self) {
        self.controller.release();
    }
}

impl Drop for DetailPage {
    fn drop(&mut self) {
        self.owner.cleanup();
    }
}
