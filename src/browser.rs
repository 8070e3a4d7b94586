/// Host tab API boundary
///
/// Everything the core needs from the browser goes through [`TabsApi`], so
/// the selection and action logic tests against an in-memory fake. The real
/// implementation, [`WebExtTabs`], crosses into the `/tabs.js` bridge and is
/// only meaningful inside the extension.
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::tab_data::{TabId, TabInfo};

/// Move index meaning "append to the end of the tab strip".
pub const MOVE_TO_END: i32 = -1;

/// Query filter: every tab the host knows, or only the popup's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabScope {
    All,
    CurrentWindow,
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("host tab api call failed: {0}")]
    Host(String),
    #[error("unexpected tab payload: {0}")]
    Payload(String),
}

/// The host tab-management surface. Mutations taking an id slice are issued
/// as one batched host call.
#[allow(async_fn_in_trait)]
pub trait TabsApi {
    async fn query(&self, scope: TabScope) -> Result<Vec<TabInfo>, BrowserError>;
    async fn remove(&self, ids: &[TabId]) -> Result<(), BrowserError>;
    /// `index` is the absolute target position of the first id;
    /// [`MOVE_TO_END`] appends.
    async fn move_tabs(&self, ids: &[TabId], index: i32) -> Result<(), BrowserError>;
    async fn activate(&self, id: TabId) -> Result<(), BrowserError>;
}

// Import JS bridge functions
#[wasm_bindgen(module = "/tabs.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn queryTabs(current_window: bool) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeTabs(tab_ids: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn moveTabs(tab_ids: JsValue, index: i32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn activateTab(tab_id: i32) -> Result<(), JsValue>;

    fn subscribeTabRemoved(callback: &js_sys::Function);
}

/// [`TabsApi`] over the WebExtension `browser.tabs` bridge.
#[derive(Clone, Copy, Default)]
pub struct WebExtTabs;

impl TabsApi for WebExtTabs {
    async fn query(&self, scope: TabScope) -> Result<Vec<TabInfo>, BrowserError> {
        let raw = queryTabs(scope == TabScope::CurrentWindow)
            .await
            .map_err(host_error)?;
        serde_wasm_bindgen::from_value(raw).map_err(|e| BrowserError::Payload(e.to_string()))
    }

    async fn remove(&self, ids: &[TabId]) -> Result<(), BrowserError> {
        removeTabs(to_js(ids)?).await.map_err(host_error)
    }

    async fn move_tabs(&self, ids: &[TabId], index: i32) -> Result<(), BrowserError> {
        moveTabs(to_js(ids)?, index).await.map_err(host_error)
    }

    async fn activate(&self, id: TabId) -> Result<(), BrowserError> {
        activateTab(id).await.map_err(host_error)
    }
}

/// Refresh trigger for tabs removed outside the popup. The handler lives for
/// the life of the popup document, so the closure is leaked on purpose.
pub fn on_tab_removed(handler: impl Fn() + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn Fn()>);
    subscribeTabRemoved(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn to_js(ids: &[TabId]) -> Result<JsValue, BrowserError> {
    serde_wasm_bindgen::to_value(ids).map_err(|e| BrowserError::Payload(e.to_string()))
}

fn host_error(value: JsValue) -> BrowserError {
    BrowserError::Host(format!("{value:?}"))
}
