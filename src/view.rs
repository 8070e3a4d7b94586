/// View-model construction for the popup
use chrono::DateTime;
use url::Url;

use crate::selector::{self, HostGroup};
use crate::tab_data::{TabId, TabInfo};

/// Favicon shown when the host supplies none.
pub const DEFAULT_FAVICON: &str = "stub.png";

/// How many host groups the popup displays.
pub const TOP_HOSTS: usize = 3;

/// Everything the popup renders, rebuilt from a fresh snapshot on every
/// refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupView {
    pub count: usize,
    pub oldest: Option<OldestTabView>,
    pub top_hosts: Vec<HostGroupView>,
}

/// Display fields for the least recently accessed tab.
#[derive(Debug, Clone, PartialEq)]
pub struct OldestTabView {
    pub id: TabId,
    pub icon_url: String,
    pub title: String,
    pub origin: String,
    pub accessed: String,
}

/// One of the top host tiles: representative icon plus member count.
#[derive(Debug, Clone, PartialEq)]
pub struct HostGroupView {
    pub host: String,
    pub icon_url: String,
    pub count: usize,
}

pub fn build_view(tabs: &[TabInfo]) -> PopupView {
    PopupView {
        count: tabs.len(),
        oldest: selector::oldest_tab(tabs).map(oldest_view),
        top_hosts: selector::top_hosts(tabs, TOP_HOSTS)
            .iter()
            .map(group_view)
            .collect(),
    }
}

fn oldest_view(tab: &TabInfo) -> OldestTabView {
    OldestTabView {
        id: tab.id,
        icon_url: icon_or_default(tab),
        title: tab.title.clone(),
        origin: origin_of(&tab.url),
        accessed: format_access_date(tab.last_accessed),
    }
}

fn group_view(group: &HostGroup) -> HostGroupView {
    HostGroupView {
        host: group.host.clone(),
        icon_url: group
            .tabs
            .first()
            .map(icon_or_default)
            .unwrap_or_else(|| DEFAULT_FAVICON.to_string()),
        count: group.tabs.len(),
    }
}

fn icon_or_default(tab: &TabInfo) -> String {
    tab.fav_icon_url
        .clone()
        .unwrap_or_else(|| DEFAULT_FAVICON.to_string())
}

/// Origin line under the oldest-tab title, e.g. `https://example.com`.
/// Unparseable URLs fall back to the raw string.
fn origin_of(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.origin().ascii_serialization(),
        Err(_) => url.to_string(),
    }
}

/// Access date as `28 Oct 2023` (day of month, abbreviated month, year).
fn format_access_date(ms: f64) -> String {
    DateTime::from_timestamp_millis(ms as i64)
        .map(|date| date.format("%-d %b %Y").to_string())
        .unwrap_or_default()
}
