/// Tab operations behind the popup buttons
///
/// Every action reads a fresh snapshot, computes its targets, issues the
/// mutations, then re-queries and returns the rebuilt [`PopupView`] so the
/// caller never renders stale state. Host failures are not retried; the error
/// surfaces to the UI layer, which re-queries to converge with host truth.
use crate::browser::{BrowserError, MOVE_TO_END, TabScope, TabsApi};
use crate::selector;
use crate::tab_data::{TabId, TabInfo};
use crate::view::{self, PopupView};

pub struct Actions<A: TabsApi> {
    api: A,
}

impl<A: TabsApi> Actions<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Query the current window and rebuild the popup view.
    pub async fn refresh(&self) -> Result<PopupView, BrowserError> {
        let tabs = self.api.query(TabScope::CurrentWindow).await?;
        Ok(view::build_view(&tabs))
    }

    /// Close every tab in the window with a single batched remove.
    pub async fn close_all(&self) -> Result<PopupView, BrowserError> {
        let tabs = self.api.query(TabScope::CurrentWindow).await?;

        if !tabs.is_empty() {
            let ids: Vec<TabId> = tabs.iter().map(|tab| tab.id).collect();
            self.api.remove(&ids).await?;
        }

        self.refresh().await
    }

    /// Close the least recently accessed tab; no mutation when the window is
    /// empty.
    pub async fn close_oldest(&self) -> Result<PopupView, BrowserError> {
        let tabs = self.api.query(TabScope::CurrentWindow).await?;

        if let Some(oldest) = selector::oldest_tab(&tabs) {
            self.api.remove(&[oldest.id]).await?;
        }

        self.refresh().await
    }

    /// Move the least recently accessed tab to the end of the strip and focus
    /// it.
    pub async fn bring_oldest(&self) -> Result<PopupView, BrowserError> {
        let tabs = self.api.query(TabScope::CurrentWindow).await?;

        if let Some(oldest) = selector::oldest_tab(&tabs) {
            self.api.move_tabs(&[oldest.id], MOVE_TO_END).await?;
            self.api.activate(oldest.id).await?;
        }

        self.refresh().await
    }

    /// Repack unpinned tabs into contiguous host groups, most frequent host
    /// first, one batched move per group. Pinned tabs keep their leading
    /// positions and offset the first group's index.
    pub async fn group_tabs(&self) -> Result<PopupView, BrowserError> {
        let tabs = self.api.query(TabScope::CurrentWindow).await?;
        let unpinned: Vec<TabInfo> = tabs.iter().filter(|tab| !tab.pinned).cloned().collect();

        let mut index = (tabs.len() - unpinned.len()) as i32;
        for group in selector::group_by_host_lossy(&unpinned) {
            let ids: Vec<TabId> = group.tabs.iter().map(|tab| tab.id).collect();
            self.api.move_tabs(&ids, index).await?;
            index += ids.len() as i32;
        }

        self.refresh().await
    }

    /// Uniformly reshuffle the unpinned tabs into the positions right after
    /// the pinned block.
    pub async fn shuffle_tabs(&self) -> Result<PopupView, BrowserError> {
        let tabs = self.api.query(TabScope::CurrentWindow).await?;
        let mut ids: Vec<TabId> = tabs
            .iter()
            .filter(|tab| !tab.pinned)
            .map(|tab| tab.id)
            .collect();

        if !ids.is_empty() {
            let pinned = tabs.len() - ids.len();
            selector::shuffle(&mut ids, &mut rand::thread_rng());
            self.api.move_tabs(&ids, pinned as i32).await?;
        }

        self.refresh().await
    }

    /// Focus a tab. Callers decide whether to refresh afterwards.
    pub async fn go_to_tab(&self, id: TabId) -> Result<(), BrowserError> {
        self.api.activate(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Query,
        Remove(Vec<TabId>),
        Move(Vec<TabId>, i32),
        Activate(TabId),
    }

    /// In-memory host that records every call and models the browser's
    /// batched-move semantics.
    #[derive(Default)]
    struct FakeTabs {
        tabs: RefCell<Vec<TabInfo>>,
        calls: RefCell<Vec<Call>>,
    }

    impl FakeTabs {
        fn with_tabs(tabs: Vec<TabInfo>) -> Self {
            Self {
                tabs: RefCell::new(tabs),
                calls: RefCell::default(),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn order(&self) -> Vec<TabId> {
            self.tabs.borrow().iter().map(|tab| tab.id).collect()
        }
    }

    impl TabsApi for &FakeTabs {
        async fn query(&self, _scope: TabScope) -> Result<Vec<TabInfo>, BrowserError> {
            self.calls.borrow_mut().push(Call::Query);
            Ok(self.tabs.borrow().clone())
        }

        async fn remove(&self, ids: &[TabId]) -> Result<(), BrowserError> {
            self.calls.borrow_mut().push(Call::Remove(ids.to_vec()));
            self.tabs.borrow_mut().retain(|tab| !ids.contains(&tab.id));
            Ok(())
        }

        async fn move_tabs(&self, ids: &[TabId], index: i32) -> Result<(), BrowserError> {
            self.calls.borrow_mut().push(Call::Move(ids.to_vec(), index));

            let mut tabs = self.tabs.borrow_mut();
            let mut moved = Vec::new();
            for id in ids {
                if let Some(pos) = tabs.iter().position(|tab| tab.id == *id) {
                    moved.push(tabs.remove(pos));
                }
            }
            let at = if index < 0 {
                tabs.len()
            } else {
                (index as usize).min(tabs.len())
            };
            for (offset, tab) in moved.into_iter().enumerate() {
                tabs.insert(at + offset, tab);
            }
            Ok(())
        }

        async fn activate(&self, id: TabId) -> Result<(), BrowserError> {
            self.calls.borrow_mut().push(Call::Activate(id));
            Ok(())
        }
    }

    fn tab(id: TabId, url: &str, last_accessed: f64, pinned: bool) -> TabInfo {
        TabInfo {
            id,
            url: url.to_string(),
            title: format!("Tab {id}"),
            last_accessed,
            pinned,
            fav_icon_url: None,
            window_id: 1,
        }
    }

    #[test]
    fn test_close_all_issues_one_batched_remove() {
        let fake = FakeTabs::with_tabs(vec![
            tab(1, "https://a.com", 100.0, false),
            tab(2, "https://b.com", 50.0, false),
            tab(3, "https://a.com", 200.0, true),
        ]);

        let view = block_on(Actions::new(&fake).close_all()).unwrap();

        assert_eq!(
            fake.calls(),
            vec![Call::Query, Call::Remove(vec![1, 2, 3]), Call::Query]
        );
        assert_eq!(view.count, 0);
    }

    #[test]
    fn test_close_all_empty_skips_remove() {
        let fake = FakeTabs::default();

        let view = block_on(Actions::new(&fake).close_all()).unwrap();

        assert_eq!(fake.calls(), vec![Call::Query, Call::Query]);
        assert_eq!(view.count, 0);
    }

    #[test]
    fn test_close_oldest_removes_minimum_timestamp() {
        let fake = FakeTabs::with_tabs(vec![
            tab(1, "https://a.com", 100.0, false),
            tab(2, "https://b.com", 50.0, false),
            tab(3, "https://a.com", 200.0, false),
        ]);

        let view = block_on(Actions::new(&fake).close_oldest()).unwrap();

        assert_eq!(
            fake.calls(),
            vec![Call::Query, Call::Remove(vec![2]), Call::Query]
        );
        assert_eq!(view.count, 2);
        assert_eq!(view.oldest.unwrap().id, 1);
    }

    #[test]
    fn test_close_oldest_empty_still_refreshes() {
        let fake = FakeTabs::default();

        let view = block_on(Actions::new(&fake).close_oldest()).unwrap();

        // No remove call, but the view is still rebuilt from a re-query
        assert_eq!(fake.calls(), vec![Call::Query, Call::Query]);
        assert!(view.oldest.is_none());
    }

    #[test]
    fn test_bring_oldest_moves_to_end_then_activates() {
        let fake = FakeTabs::with_tabs(vec![
            tab(1, "https://a.com", 100.0, false),
            tab(2, "https://b.com", 50.0, false),
            tab(3, "https://a.com", 200.0, false),
        ]);

        block_on(Actions::new(&fake).bring_oldest()).unwrap();

        assert_eq!(
            fake.calls(),
            vec![
                Call::Query,
                Call::Move(vec![2], MOVE_TO_END),
                Call::Activate(2),
                Call::Query,
            ]
        );
        assert_eq!(fake.order(), vec![1, 3, 2]);
    }

    #[test]
    fn test_group_tabs_packs_groups_after_pinned_block() {
        let fake = FakeTabs::with_tabs(vec![
            tab(9, "https://pinned.com", 0.0, true),
            tab(1, "https://b.com", 0.0, false),
            tab(2, "https://a.com", 0.0, false),
            tab(3, "https://b.com", 0.0, false),
        ]);

        block_on(Actions::new(&fake).group_tabs()).unwrap();

        // b.com has two members so it ranks first; indices start after the
        // pinned tab and advance by group size.
        assert_eq!(
            fake.calls(),
            vec![
                Call::Query,
                Call::Move(vec![1, 3], 1),
                Call::Move(vec![2], 3),
                Call::Query,
            ]
        );
        assert_eq!(fake.order(), vec![9, 1, 3, 2]);
    }

    #[test]
    fn test_group_tabs_all_pinned_issues_no_moves() {
        let fake = FakeTabs::with_tabs(vec![
            tab(1, "https://a.com", 0.0, true),
            tab(2, "https://b.com", 0.0, true),
        ]);

        block_on(Actions::new(&fake).group_tabs()).unwrap();

        assert_eq!(fake.calls(), vec![Call::Query, Call::Query]);
    }

    #[test]
    fn test_shuffle_tabs_single_move_after_pinned() {
        let fake = FakeTabs::with_tabs(vec![
            tab(9, "https://pinned.com", 0.0, true),
            tab(1, "https://a.com", 0.0, false),
            tab(2, "https://b.com", 0.0, false),
            tab(3, "https://c.com", 0.0, false),
        ]);

        block_on(Actions::new(&fake).shuffle_tabs()).unwrap();

        let calls = fake.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], Call::Query);
        assert_eq!(calls[2], Call::Query);
        match &calls[1] {
            Call::Move(ids, index) => {
                let mut sorted = ids.clone();
                sorted.sort();
                assert_eq!(sorted, vec![1, 2, 3]);
                assert_eq!(*index, 1);
            }
            other => panic!("expected a single batched move, got {other:?}"),
        }
        // Pinned tab never leaves the front
        assert_eq!(fake.order()[0], 9);
    }

    #[test]
    fn test_shuffle_tabs_all_pinned_issues_no_moves() {
        let fake = FakeTabs::with_tabs(vec![tab(1, "https://a.com", 0.0, true)]);

        block_on(Actions::new(&fake).shuffle_tabs()).unwrap();

        assert_eq!(fake.calls(), vec![Call::Query, Call::Query]);
    }

    #[test]
    fn test_go_to_tab_activates_without_refresh() {
        let fake = FakeTabs::with_tabs(vec![tab(1, "https://a.com", 0.0, false)]);

        block_on(Actions::new(&fake).go_to_tab(1)).unwrap();

        assert_eq!(fake.calls(), vec![Call::Activate(1)]);
    }
}
