/// Data structures for Tab Recall
use serde::{Deserialize, Serialize};

pub type TabId = i32;
pub type WindowId = i32;

/// One open tab as reported by the host browser at query time.
///
/// Field names follow the WebExtension `tabs.Tab` object so the bridge can
/// hand tabs over without renaming. The core never mutates a `TabInfo`; every
/// refresh replaces the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: TabId,
    pub url: String,
    pub title: String,
    /// Milliseconds since the epoch, host clock.
    pub last_accessed: f64,
    pub pinned: bool,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
    pub window_id: WindowId,
}
