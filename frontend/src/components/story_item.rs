use leptos::prelude::*;
use storyfeed_shared::Story;
use storyfeed_shared::date::format_long_date;
use storyfeed::story::truncate_chars;

use super::common::local_utc_offset;

const MAX_DESCRIPTION_CHARS: usize = 100;

/// 首页列表中的一条 Story
#[component]
pub fn StoryItem(story: Story) -> impl IntoView {
    let date = format_long_date(&story.created_at, local_utc_offset());
    let description = truncate_chars(&story.description, MAX_DESCRIPTION_CHARS);
    let alt = format!("Photo by {}", story.name);
    let href = format!("#/detail/{}", story.id);

    view! {
        <article class="story-item">
            <img src=story.photo_url alt=alt class="story-item__image" loading="lazy" />
            <div class="story-item__content">
                <h3 class="story-item__title">{story.name}</h3>
                <p class="story-item__info">{date}</p>
                <p class="story-item__description">{description}</p>
                <a href=href class="form-button">"Read More"</a>
            </div>
        </article>
    }
}
