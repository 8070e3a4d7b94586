/// Popup UI for Tab Recall

use std::future::Future;

use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::actions::Actions;
use crate::browser::{self, BrowserError, WebExtTabs};
use crate::tab_data::TabId;
use crate::view::PopupView;

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Loading(String),
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Loading("Loading tabs...".to_string()));
    let view = use_state(PopupView::default);

    // Initial refresh, plus a re-render whenever a tab is closed outside the
    // popup
    {
        let state = state.clone();
        let view = view.clone();
        use_effect_with((), move |_| {
            let refresh = move || {
                let state = state.clone();
                let view = view.clone();
                spawn_local(async move {
                    apply_result(Actions::new(WebExtTabs).refresh().await, state, view);
                });
            };
            refresh();
            browser::on_tab_removed(refresh);
            || ()
        });
    }

    let on_close_oldest = action_callback(
        state.clone(),
        view.clone(),
        "Closing oldest tab...",
        |actions| async move { actions.close_oldest().await },
    );
    let on_bring_oldest = action_callback(
        state.clone(),
        view.clone(),
        "Bringing oldest tab...",
        |actions| async move { actions.bring_oldest().await },
    );
    let on_group = action_callback(
        state.clone(),
        view.clone(),
        "Grouping tabs by host...",
        |actions| async move { actions.group_tabs().await },
    );
    let on_shuffle = action_callback(
        state.clone(),
        view.clone(),
        "Shuffling tabs...",
        |actions| async move { actions.shuffle_tabs().await },
    );
    let on_close_all = action_callback(
        state.clone(),
        view.clone(),
        "Closing all tabs...",
        |actions| async move { actions.close_all().await },
    );

    // Clicking the oldest-tab card focuses that tab, then re-renders
    let on_go_to_oldest = {
        let state = state.clone();
        let view = view.clone();
        Callback::from(move |id: TabId| {
            let state = state.clone();
            let view = view.clone();
            spawn_local(async move {
                let actions = Actions::new(WebExtTabs);
                let result = match actions.go_to_tab(id).await {
                    Ok(()) => actions.refresh().await,
                    Err(err) => Err(err),
                };
                apply_result(result, state, view);
            });
        })
    };

    let is_busy = matches!(*state, AppState::Loading(_));

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Recall"}</h1>

            <p class="tabs-count">
                <b>{(*view).count}</b>{" open tabs"}
            </p>

            // Status display
            {match &*state {
                AppState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {},
            }}

            // Oldest tab card
            {if let Some(oldest) = &(*view).oldest {
                let onclick = on_go_to_oldest.reform({
                    let id = oldest.id;
                    move |_: MouseEvent| id
                });
                html! {
                    <div class="oldest-tab">
                        <h2 class="section-title">{"Oldest tab"}</h2>
                        <button class="oldest-tab-card" {onclick} disabled={is_busy}>
                            <img src={oldest.icon_url.clone()} width="32" height="32" />
                            <span class="oldest-tab-text">
                                <b>{&oldest.title}</b><br/>
                                <span class="text-regular">{format!("from {}", oldest.origin)}</span><br/>
                                <span class="text-regular">{format!("accessed at {}", oldest.accessed)}</span>
                            </span>
                        </button>
                    </div>
                }
            } else {
                html! {}
            }}

            // Top host tiles
            {if !(*view).top_hosts.is_empty() {
                html! {
                    <div class="top-hosts">
                        <h2 class="section-title">{"Popular hosts"}</h2>
                        <div class="top-hosts-row">
                            {for (*view).top_hosts.iter().map(|group| html! {
                                <div class="host-tile" title={group.host.clone()}>
                                    <img src={group.icon_url.clone()} width="32" height="32" />
                                    <b class="text-m">{group.count}</b>
                                </div>
                            })}
                        </div>
                    </div>
                }
            } else {
                html! {}
            }}

            <div class="flex-column-gap">
                <Button onclick={on_close_oldest} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Close Oldest Tab"}
                </Button>
                <Button onclick={on_bring_oldest} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Bring Oldest Tab Here"}
                </Button>
                <Button onclick={on_group} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Group Tabs by Host"}
                </Button>
                <Button onclick={on_shuffle} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Shuffle Tabs"}
                </Button>
                <Button onclick={on_close_all} disabled={is_busy} variant={ButtonVariant::Danger} block={true}>
                    {"Close All Tabs"}
                </Button>
            </div>

            <p class="footer-popup">
                {"Tab Recall v0.1.0"}
            </p>
        </div>
    }
}

// Helper functions

fn action_callback<F, Fut>(
    state: UseStateHandle<AppState>,
    view: UseStateHandle<PopupView>,
    busy: &'static str,
    run: F,
) -> Callback<MouseEvent>
where
    F: Fn(Actions<WebExtTabs>) -> Fut + 'static,
    Fut: Future<Output = Result<PopupView, BrowserError>> + 'static,
{
    Callback::from(move |_| {
        state.set(AppState::Loading(busy.to_string()));
        let state = state.clone();
        let view = view.clone();
        let fut = run(Actions::new(WebExtTabs));
        spawn_local(async move {
            apply_result(fut.await, state, view);
        });
    })
}

/// Push an action result into component state. A failed host call is shown
/// and followed by a plain re-query so the displayed numbers converge with
/// whatever the host actually applied.
fn apply_result(
    result: Result<PopupView, BrowserError>,
    state: UseStateHandle<AppState>,
    view: UseStateHandle<PopupView>,
) {
    match result {
        Ok(fresh) => {
            view.set(fresh);
            state.set(AppState::Idle);
        }
        Err(err) => {
            log::warn!("tab operation failed: {err}");
            state.set(AppState::Error(err.to_string()));
            spawn_local(async move {
                if let Ok(fresh) = Actions::new(WebExtTabs).refresh().await {
                    view.set(fresh);
                }
            });
        }
    }
}
