/// Tab selection and host-grouping logic for Tab Recall
use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use url::Url;

use crate::tab_data::{TabId, TabInfo};

/// Sentinel host for tabs whose URL yields no usable host.
pub const UNKNOWN_HOST: &str = "unknown";

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("malformed tab url {url:?}: {source}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("tab url {0:?} has no host")]
    MissingHost(String),
}

/// Tabs sharing one hostname, members in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct HostGroup {
    pub host: String,
    pub tabs: Vec<TabInfo>,
}

/// The least recently accessed tab, or `None` for an empty snapshot.
/// Ties keep the earlier-encountered tab.
pub fn oldest_tab(tabs: &[TabInfo]) -> Option<&TabInfo> {
    let mut oldest = tabs.first()?;

    for tab in &tabs[1..] {
        if tab.last_accessed < oldest.last_accessed {
            oldest = tab;
        }
    }

    Some(oldest)
}

/// Host component of a tab URL.
///
/// Hostless URLs (`about:blank`, `data:` …) are rejected alongside URLs that
/// do not parse at all; callers decide between propagating and substituting
/// [`UNKNOWN_HOST`].
pub fn host_of(url: &str) -> Result<String, SelectError> {
    let parsed = Url::parse(url).map_err(|source| SelectError::MalformedUrl {
        url: url.to_string(),
        source,
    })?;

    match parsed.host_str() {
        Some(host) => Ok(host.to_string()),
        None => Err(SelectError::MissingHost(url.to_string())),
    }
}

/// Partition tabs by URL host, ranked by descending member count.
///
/// Members keep their first-seen order within each group; equally sized
/// groups keep first-seen group order (stable sort), so the ranking is
/// deterministic for a fixed input. Fails on the first tab whose URL has no
/// host.
pub fn group_by_host(tabs: &[TabInfo]) -> Result<Vec<HostGroup>, SelectError> {
    let hosts = tabs
        .iter()
        .map(|tab| host_of(&tab.url))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(group_resolved(tabs, hosts))
}

/// Like [`group_by_host`], but tabs with unusable URLs are filed under
/// [`UNKNOWN_HOST`] instead of failing the whole grouping. This is the policy
/// the refresh path uses; no tab is ever dropped.
pub fn group_by_host_lossy(tabs: &[TabInfo]) -> Vec<HostGroup> {
    let hosts = tabs
        .iter()
        .map(|tab| host_of(&tab.url).unwrap_or_else(|_| UNKNOWN_HOST.to_string()))
        .collect();

    group_resolved(tabs, hosts)
}

/// The `n` most frequent host groups, in ranked order. Fewer than `n`
/// distinct hosts yields all of them.
pub fn top_hosts(tabs: &[TabInfo], n: usize) -> Vec<HostGroup> {
    let mut groups = group_by_host_lossy(tabs);
    groups.truncate(n);
    groups
}

/// Uniform in-place shuffle of tab ids (Fisher-Yates). The rng is injected so
/// tests can pin a seed.
pub fn shuffle(ids: &mut [TabId], rng: &mut impl Rng) {
    ids.shuffle(rng);
}

fn group_resolved(tabs: &[TabInfo], hosts: Vec<String>) -> Vec<HostGroup> {
    let mut groups: Vec<HostGroup> = Vec::new();
    let mut index_by_host: HashMap<String, usize> = HashMap::new();

    for (tab, host) in tabs.iter().zip(hosts) {
        match index_by_host.get(&host) {
            Some(&i) => groups[i].tabs.push(tab.clone()),
            None => {
                index_by_host.insert(host.clone(), groups.len());
                groups.push(HostGroup {
                    host,
                    tabs: vec![tab.clone()],
                });
            }
        }
    }

    // Stable sort: equally sized groups stay in first-seen order.
    groups.sort_by(|a, b| b.tabs.len().cmp(&a.tabs.len()));
    groups
}
