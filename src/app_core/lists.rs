//! List operations over the watchlist and the Top 5.
//!
//! [`Shelf`] owns the store, the render target and the notifier. Every
//! operation reads the whole list, changes it, writes it back and re-renders
//! the affected section. Titles are the identity key: removal drops every
//! entry with the same title, while adding never checks for duplicates.

use crate::app_core::notifier::Notifier;
use crate::app_core::render::{self, Action, RenderTarget};
use crate::model::{ListKind, Movie, TOP_FIVE_CAPACITY};
use crate::store::{MovieStore, Result, Storage};

pub const TOP_FIVE_FULL_MESSAGE: &str =
    "Top 5 list is full. Please remove a movie before adding another.";
pub const ADDED_TO_TOP_FIVE_MESSAGE: &str = "Added to Top 5";
pub const REMOVED_FROM_TOP_FIVE_MESSAGE: &str = "Removed from Top 5";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The Top 5 already held five entries; nothing changed.
    TopFiveFull,
}

pub struct Shelf<S, T> {
    store: MovieStore<S>,
    target: T,
    notifier: Notifier,
    /// Blocking notice the runtime must show and have acknowledged.
    alert: Option<String>,
}

impl<S: Storage, T: RenderTarget> Shelf<S, T> {
    pub fn new(storage: S, target: T) -> Self {
        Self {
            store: MovieStore::new(storage),
            target,
            notifier: Notifier::new(),
            alert: None,
        }
    }

    /// Page load: renders both sections from storage.
    pub fn load_page(&mut self) {
        for list in ListKind::ALL {
            let movies = self.store.load(list);
            tracing::info!(list = %list, len = movies.len(), "loaded list");
            render::render_list(&mut self.target, list, &movies);
        }
    }

    pub fn watchlist(&self) -> Vec<Movie> {
        self.store.load(ListKind::Watchlist)
    }

    pub fn top_five(&self) -> Vec<Movie> {
        self.store.load(ListKind::TopFive)
    }

    pub fn list(&self, list: ListKind) -> Vec<Movie> {
        self.store.load(list)
    }

    pub fn add_to_watchlist(&mut self, movie: Movie) -> Result<()> {
        let mut watchlist = self.store.load(ListKind::Watchlist);
        tracing::info!(title = %movie.title, "adding to watchlist");
        watchlist.push(movie);
        self.save_and_render(ListKind::Watchlist, &watchlist)
    }

    pub fn remove_from_watchlist(&mut self, movie: &Movie) -> Result<()> {
        self.remove_by_title(ListKind::Watchlist, movie)
    }

    pub fn add_to_top_five(&mut self, movie: Movie) -> Result<AddOutcome> {
        let mut top_five = self.store.load(ListKind::TopFive);
        if top_five.len() >= TOP_FIVE_CAPACITY {
            tracing::info!(title = %movie.title, "top five is full");
            self.alert = Some(TOP_FIVE_FULL_MESSAGE.to_string());
            return Ok(AddOutcome::TopFiveFull);
        }
        tracing::info!(title = %movie.title, "adding to top five");
        top_five.push(movie);
        self.save_and_render(ListKind::TopFive, &top_five)?;
        Ok(AddOutcome::Added)
    }

    pub fn remove_from_top_five(&mut self, movie: &Movie) -> Result<()> {
        self.remove_by_title(ListKind::TopFive, movie)
    }

    /// Runs the operation behind a rendered button.
    pub fn dispatch(&mut self, action: Action, now_ms: u64) -> Result<()> {
        match action {
            Action::AddToTopFive(movie) => {
                // A full list raises only the alert, not "Added to Top 5".
                if self.add_to_top_five(movie)? == AddOutcome::Added {
                    self.notify(ADDED_TO_TOP_FIVE_MESSAGE, now_ms);
                }
            }
            Action::MarkWatched(movie) => self.remove_from_watchlist(&movie)?,
            Action::RemoveFromTopFive(movie) => {
                self.remove_from_top_five(&movie)?;
                self.notify(REMOVED_FROM_TOP_FIVE_MESSAGE, now_ms);
            }
        }
        Ok(())
    }

    /// Empties both lists, as an external clear of the storage would.
    pub fn clear_all(&mut self) -> Result<()> {
        for list in ListKind::ALL {
            self.store.clear(list)?;
            render::render_list(&mut self.target, list, &[]);
        }
        tracing::info!("cleared both lists");
        Ok(())
    }

    pub fn notify(&mut self, message: &str, now_ms: u64) {
        self.notifier.notify(message, now_ms);
        self.sync_modal();
    }

    /// Applies a due dismissal. Returns `true` if the overlay was hidden.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let changed = self.notifier.tick(now_ms);
        if changed {
            self.sync_modal();
        }
        changed
    }

    /// Click on the overlay; outside its content it closes immediately.
    pub fn click_modal(&mut self, inside_content: bool) -> bool {
        let changed = self.notifier.click(inside_content);
        if changed {
            self.sync_modal();
        }
        changed
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Hands the pending blocking notice to the runtime, clearing it.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn store(&self) -> &MovieStore<S> {
        &self.store
    }

    fn remove_by_title(&mut self, list: ListKind, movie: &Movie) -> Result<()> {
        let mut movies = self.store.load(list);
        let before = movies.len();
        movies.retain(|m| !m.same_title(movie));
        if movies.len() == before {
            tracing::debug!(list = %list, title = %movie.title, "nothing to remove");
            render::render_list(&mut self.target, list, &movies);
            return Ok(());
        }
        tracing::info!(
            list = %list,
            title = %movie.title,
            removed = before - movies.len(),
            "removed from list"
        );
        self.save_and_render(list, &movies)
    }

    fn save_and_render(&mut self, list: ListKind, movies: &[Movie]) -> Result<()> {
        self.store.save(list, movies)?;
        render::render_list(&mut self.target, list, movies);
        Ok(())
    }

    fn sync_modal(&mut self) {
        let shown = self
            .target
            .show_modal(self.notifier.message(), self.notifier.is_visible());
        if !shown {
            tracing::warn!("no modal overlay on the page, notice not shown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_core::notifier::NOTICE_DURATION_MS;
    use crate::app_core::render::{
        MODAL_CONTAINER, Node, TOP_FIVE_CONTAINER, ViewTree, WATCHLIST_CONTAINER,
    };
    use crate::store::{MemoryStorage, StoreError};
    use serde_json::json;

    fn movie(title: &str) -> Movie {
        Movie::new(title, format!("About {title}"), None)
    }

    fn dune() -> Movie {
        Movie::new("Dune", "...", Some("/d.jpg".to_string()))
    }

    fn shelf() -> Shelf<MemoryStorage, ViewTree> {
        let mut shelf = Shelf::new(MemoryStorage::new(), ViewTree::page());
        shelf.load_page();
        shelf
    }

    fn titles(movies: &[Movie]) -> Vec<&str> {
        movies.iter().map(|m| m.title.as_str()).collect()
    }

    #[test]
    fn test_load_page_renders_both_sections() {
        let shelf = shelf();
        assert_eq!(
            shelf.target().children(WATCHLIST_CONTAINER),
            &[Node::Paragraph("No movies in your watchlist.".to_string())]
        );
        assert_eq!(shelf.target().children(TOP_FIVE_CONTAINER).len(), 1);
    }

    #[test]
    fn test_add_to_watchlist_persists_and_renders_one_box() {
        let mut shelf = shelf();
        shelf.add_to_watchlist(dune()).unwrap();

        let raw = shelf.store().storage().raw("watchlist").unwrap();
        let persisted: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(
            persisted,
            json!([{"title": "Dune", "overview": "...", "poster_path": "/d.jpg"}])
        );

        let boxes: Vec<_> = shelf.target().movie_boxes(WATCHLIST_CONTAINER).collect();
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].title, "Dune");
        assert_eq!(boxes[0].overview, "...");
        assert_eq!(
            boxes[0].poster.as_ref().map(|p| p.src.as_str()),
            Some("https://image.tmdb.org/t/p/w200/d.jpg")
        );
    }

    #[test]
    fn test_watchlist_allows_duplicate_titles() {
        let mut shelf = shelf();
        shelf.add_to_watchlist(movie("Heat")).unwrap();
        shelf.add_to_watchlist(movie("Heat")).unwrap();
        assert_eq!(titles(&shelf.watchlist()), vec!["Heat", "Heat"]);
    }

    #[test]
    fn test_remove_from_watchlist_drops_every_matching_title() {
        let mut shelf = shelf();
        shelf.add_to_watchlist(movie("Heat")).unwrap();
        shelf.add_to_watchlist(movie("Alien")).unwrap();
        shelf
            .add_to_watchlist(Movie::new("Heat", "remake", None))
            .unwrap();

        shelf.remove_from_watchlist(&movie("Heat")).unwrap();
        assert_eq!(titles(&shelf.watchlist()), vec!["Alien"]);
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut shelf = shelf();
        shelf.add_to_watchlist(movie("Heat")).unwrap();
        shelf.add_to_watchlist(movie("Alien")).unwrap();
        shelf.remove_from_watchlist(&movie("Heat")).unwrap();
        let after_first = shelf.watchlist();
        shelf.remove_from_watchlist(&movie("Heat")).unwrap();
        assert_eq!(shelf.watchlist(), after_first);
    }

    #[test]
    fn test_removing_last_item_renders_placeholder() {
        let mut shelf = shelf();
        shelf.add_to_watchlist(movie("Heat")).unwrap();
        shelf.remove_from_watchlist(&movie("Heat")).unwrap();
        assert_eq!(
            shelf.target().children(WATCHLIST_CONTAINER),
            &[Node::Paragraph("No movies in your watchlist.".to_string())]
        );
    }

    #[test]
    fn test_top_five_rejects_sixth_entry() {
        let mut shelf = shelf();
        for title in ["A", "B", "C", "D", "E"] {
            assert_eq!(shelf.add_to_top_five(movie(title)).unwrap(), AddOutcome::Added);
        }
        let before = shelf.store().storage().raw("topFive").unwrap().to_string();

        assert_eq!(
            shelf.add_to_top_five(movie("F")).unwrap(),
            AddOutcome::TopFiveFull
        );
        assert_eq!(shelf.store().storage().raw("topFive").unwrap(), before);
        assert_eq!(titles(&shelf.top_five()), vec!["A", "B", "C", "D", "E"]);
        assert_eq!(shelf.take_alert().as_deref(), Some(TOP_FIVE_FULL_MESSAGE));
        assert_eq!(shelf.alert(), None);
    }

    #[test]
    fn test_top_five_never_exceeds_capacity() {
        let mut shelf = shelf();
        for round in 0..4 {
            for i in 0..4 {
                let _ = shelf.add_to_top_five(movie(&format!("m{round}-{i}"))).unwrap();
                assert!(shelf.top_five().len() <= TOP_FIVE_CAPACITY);
            }
            shelf.remove_from_top_five(&movie(&format!("m{round}-0"))).unwrap();
            shelf.add_to_top_five(movie("dup")).unwrap();
            shelf.add_to_top_five(movie("dup")).unwrap();
            assert!(shelf.top_five().len() <= TOP_FIVE_CAPACITY);
            shelf.remove_from_top_five(&movie("dup")).unwrap();
        }
        assert!(
            shelf.target().movie_boxes(TOP_FIVE_CONTAINER).count() <= TOP_FIVE_CAPACITY
        );
    }

    #[test]
    fn test_top_five_allows_repeats_up_to_cap() {
        let mut shelf = shelf();
        shelf.add_to_top_five(movie("Heat")).unwrap();
        shelf.add_to_top_five(movie("Heat")).unwrap();
        assert_eq!(titles(&shelf.top_five()), vec!["Heat", "Heat"]);
        shelf.remove_from_top_five(&movie("Heat")).unwrap();
        assert!(shelf.top_five().is_empty());
    }

    #[test]
    fn test_add_to_top_five_button_keeps_watchlist_entry() {
        let mut shelf = shelf();
        shelf.add_to_watchlist(dune()).unwrap();

        let action = shelf
            .target()
            .movie_boxes(WATCHLIST_CONTAINER)
            .next()
            .map(|b| b.buttons[0].clone())
            .unwrap();
        assert_eq!(action.label(), "Add to Top 5");
        shelf.dispatch(action, 5_000).unwrap();

        assert_eq!(titles(&shelf.top_five()), vec!["Dune"]);
        assert_eq!(titles(&shelf.watchlist()), vec!["Dune"]);

        let modal = shelf.target().modal().unwrap();
        assert!(modal.visible);
        assert_eq!(modal.message, "Added to Top 5");

        assert!(!shelf.tick(5_000 + NOTICE_DURATION_MS - 1));
        assert!(shelf.tick(5_000 + NOTICE_DURATION_MS));
        assert!(!shelf.target().modal().unwrap().visible);
    }

    #[test]
    fn test_add_button_on_full_top_five_alerts_without_notice() {
        let mut shelf = shelf();
        for title in ["A", "B", "C", "D", "E"] {
            shelf.add_to_top_five(movie(title)).unwrap();
        }
        shelf
            .dispatch(Action::AddToTopFive(movie("F")), 0)
            .unwrap();
        assert!(shelf.alert().is_some());
        assert!(!shelf.notifier().is_visible());
    }

    #[test]
    fn test_watched_button_removes_without_notice() {
        let mut shelf = shelf();
        shelf.add_to_watchlist(movie("Heat")).unwrap();
        shelf
            .dispatch(Action::MarkWatched(movie("Heat")), 0)
            .unwrap();
        assert!(shelf.watchlist().is_empty());
        assert!(!shelf.notifier().is_visible());
    }

    #[test]
    fn test_remove_button_notifies() {
        let mut shelf = shelf();
        shelf.add_to_top_five(movie("Heat")).unwrap();
        shelf
            .dispatch(Action::RemoveFromTopFive(movie("Heat")), 0)
            .unwrap();
        assert!(shelf.top_five().is_empty());
        assert_eq!(shelf.target().modal().unwrap().message, "Removed from Top 5");
        assert!(shelf.click_modal(false));
        assert!(!shelf.target().modal().unwrap().visible);
    }

    #[test]
    fn test_operations_work_without_render_targets() {
        let mut shelf = Shelf::new(MemoryStorage::new(), ViewTree::empty());
        shelf.load_page();
        shelf.add_to_watchlist(movie("Heat")).unwrap();
        shelf.dispatch(Action::AddToTopFive(movie("Heat")), 0).unwrap();
        assert_eq!(titles(&shelf.watchlist()), vec!["Heat"]);
        assert_eq!(titles(&shelf.top_five()), vec!["Heat"]);
        assert!(!shelf.target().has_container(MODAL_CONTAINER));
    }

    #[test]
    fn test_clear_all_empties_lists() {
        let mut shelf = shelf();
        shelf.add_to_watchlist(movie("Heat")).unwrap();
        shelf.add_to_top_five(movie("Heat")).unwrap();
        shelf.clear_all().unwrap();
        assert!(shelf.watchlist().is_empty());
        assert!(shelf.top_five().is_empty());
        assert!(shelf.store().storage().raw("watchlist").is_none());
    }

    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(StoreError::Backend("read-only".to_string()))
        }

        fn remove_item(&mut self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_leaves_view_untouched() {
        let mut shelf = Shelf::new(ReadOnlyStorage, ViewTree::page());
        shelf.load_page();
        assert!(shelf.add_to_watchlist(movie("Heat")).is_err());
        assert_eq!(shelf.target().movie_boxes(WATCHLIST_CONTAINER).count(), 0);
    }

    #[test]
    fn test_add_keeps_records_around_a_malformed_one() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                "watchlist",
                r#"[{"title": "Dune", "overview": "Spice", "poster_path": "/d.jpg"},
                    {"title": "Heat", "overview": null, "poster_path": null},
                    {"title": ["not", "a", "title"]}]"#,
            )
            .unwrap();
        let mut shelf = Shelf::new(storage, ViewTree::page());
        shelf.load_page();
        assert_eq!(titles(&shelf.watchlist()), vec!["Dune", "Heat"]);

        shelf.add_to_watchlist(movie("Alien")).unwrap();
        let raw = shelf.store().storage().raw("watchlist").unwrap();
        let persisted: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(
            persisted,
            json!([
                {"title": "Dune", "overview": "Spice", "poster_path": "/d.jpg"},
                {"title": "Heat", "overview": "", "poster_path": null},
                {"title": "Alien", "overview": "About Alien", "poster_path": null}
            ])
        );
    }
}
