use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use storyfeed::error::StoryResult;
use storyfeed::pages::login::LoginController;
use storyfeed::pages::{Alert, FormView};
use storyfeed::router::{Navigator, Page};

use super::common::{AlertBox, FormState};
use crate::Services;
use crate::web::http::GlooHttpClient;
use crate::web::storage::LocalSessionStore;

#[derive(Clone, Copy)]
pub struct LoginSignals {
    form: FormState,
    email: RwSignal<String>,
    password: RwSignal<String>,
}

impl FormView for LoginSignals {
    fn show_alert(&self, alert: Alert) {
        self.form.show_alert(alert);
    }

    fn clear_alert(&self) {
        self.form.clear_alert();
    }

    fn set_submitting(&self, submitting: bool) {
        self.form.set_submitting(submitting);
    }

    fn reset_form(&self) {
        self.email.try_set(String::new());
        self.password.try_set(String::new());
    }
}

pub struct LoginPage {
    owner: Owner,
    signals: LoginSignals,
    controller: Rc<LoginController<GlooHttpClient, LocalSessionStore, LoginSignals>>,
}

impl LoginPage {
    pub fn new(services: &Services, navigator: Rc<dyn Navigator>) -> Self {
        let owner = Owner::new();
        let signals = owner.with(|| LoginSignals {
            form: FormState::new(),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
        });
        let controller = Rc::new(LoginController::new(services.auth_model(), signals, navigator));
        Self {
            owner,
            signals,
            controller,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Page for LoginPage {
    type Markup = AnyView;

    fn template(&self) -> AnyView {
        let LoginSignals {
            form,
            email,
            password,
        } = self.signals;

        let on_submit = {
            let controller = Rc::clone(&self.controller);
            move |ev: leptos::ev::SubmitEvent| {
                ev.prevent_default();
                let (email, password) = (email.get_untracked(), password.get_untracked());
                let controller = Rc::clone(&controller);
                spawn_local(async move { controller.submit(&email, &password).await });
            }
        };

        self.owner.with(|| {
            view! {
                <section class="content auth-page">
                    <h2>"Login"</h2>
                    <AlertBox alert=form.alert />

                    <form class="auth-form" on:submit=on_submit>
                        <div class="form-group">
                            <label for="email" class="form-label">"Email"</label>
                            <input
                                type="email"
                                id="email"
                                class="form-input"
                                placeholder="Enter your email"
                                prop:value=move || email.get()
                                on:input=move |ev| email.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form-group">
                            <label for="password" class="form-label">"Password"</label>
                            <input
                                type="password"
                                id="password"
                                class="form-input"
                                placeholder="Enter your password"
                                prop:value=move || password.get()
                                on:input=move |ev| password.set(event_target_value(&ev))
                            />
                        </div>
                        <button type="submit" class="form-button" disabled=move || form.submitting.get()>
                            {move || if form.submitting.get() { "Logging in..." } else { "Login" }}
                        </button>
                    </form>

                    <p class="auth-switch">
                        "Don't have an account? " <a href="#/register">"Register here"</a>
                    </p>
                </section>
            }
            .into_any()
        })
    }

    async fn after_render(&self) -> StoryResult<()> {
        Ok(())
    }
}

impl Drop for LoginPage {
    fn drop(&mut self) {
        self.owner.cleanup();
    }
}
