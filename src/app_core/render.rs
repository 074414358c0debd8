//! Projects the two lists into view nodes and mounts them on a [`RenderTarget`].
//!
//! Rendering is full-replace: each call clears the section and rebuilds it from
//! the list it is given. Nothing is diffed. Buttons carry an [`Action`] that
//! owns the movie it was built for; runtimes dispatch that action on click.

use crate::model::{ListKind, Movie};
use foldhash::HashMap;

/// Container for the watchlist boxes.
pub const WATCHLIST_CONTAINER: &str = "genre-sections";
/// Container for the Top 5 boxes.
pub const TOP_FIVE_CONTAINER: &str = "top-5-section";
/// Overlay used by the notifier.
pub const MODAL_CONTAINER: &str = "modal";

pub const EMPTY_WATCHLIST_MESSAGE: &str = "No movies in your watchlist.";
pub const POSTER_ALT: &str = "Movie Poster";

/// What a rendered button does when pressed.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddToTopFive(Movie),
    MarkWatched(Movie),
    RemoveFromTopFive(Movie),
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::AddToTopFive(_) => "Add to Top 5",
            Action::MarkWatched(_) => "Watched",
            Action::RemoveFromTopFive(_) => "Remove",
        }
    }

    pub fn classes(&self) -> &'static [&'static str] {
        match self {
            Action::AddToTopFive(_) => &["button", "add-to-top-five"],
            Action::MarkWatched(_) => &["button", "watched"],
            Action::RemoveFromTopFive(_) => &["button", "remove-from-top-five"],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Poster {
    pub src: String,
    pub alt: &'static str,
}

/// One rendered movie: the `movie-box` element.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieBox {
    pub title: String,
    pub overview: String,
    pub poster: Option<Poster>,
    pub buttons: Vec<Action>,
}

impl MovieBox {
    pub const CLASS: &'static str = "movie-box";
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Heading { text: String, class: &'static str },
    Paragraph(String),
    MovieBox(MovieBox),
}

impl Node {
    pub fn as_movie_box(&self) -> Option<&MovieBox> {
        match self {
            Node::MovieBox(movie_box) => Some(movie_box),
            _ => None,
        }
    }
}

/// The host page as seen by the renderer.
pub trait RenderTarget {
    fn has_container(&self, id: &str) -> bool;

    /// Replaces everything inside container `id` with `nodes`.
    fn replace_children(&mut self, id: &str, nodes: Vec<Node>);

    /// Sets the overlay message and visibility. Returns `false` when the page
    /// has no overlay.
    fn show_modal(&mut self, message: &str, visible: bool) -> bool;
}

/// Modal state as mirrored into a target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalView {
    pub message: String,
    pub visible: bool,
}

/// In-memory render target. The terminal UI draws from it and tests assert on it.
#[derive(Debug, Clone, Default)]
pub struct ViewTree {
    containers: HashMap<String, Vec<Node>>,
    modal: Option<ModalView>,
}

impl ViewTree {
    /// A tree with no containers at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A tree with both list containers and the overlay present.
    pub fn page() -> Self {
        Self::with_containers(&[WATCHLIST_CONTAINER, TOP_FIVE_CONTAINER, MODAL_CONTAINER])
    }

    pub fn with_containers(ids: &[&str]) -> Self {
        let mut tree = Self::default();
        for id in ids {
            if *id == MODAL_CONTAINER {
                tree.modal = Some(ModalView::default());
            } else {
                tree.containers.insert((*id).to_string(), Vec::new());
            }
        }
        tree
    }

    pub fn children(&self, id: &str) -> &[Node] {
        self.containers.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn movie_boxes(&self, id: &str) -> impl Iterator<Item = &MovieBox> {
        self.children(id).iter().filter_map(Node::as_movie_box)
    }

    pub fn modal(&self) -> Option<&ModalView> {
        self.modal.as_ref()
    }
}

impl RenderTarget for ViewTree {
    fn has_container(&self, id: &str) -> bool {
        if id == MODAL_CONTAINER {
            return self.modal.is_some();
        }
        self.containers.contains_key(id)
    }

    fn replace_children(&mut self, id: &str, nodes: Vec<Node>) {
        if let Some(children) = self.containers.get_mut(id) {
            *children = nodes;
        }
    }

    fn show_modal(&mut self, message: &str, visible: bool) -> bool {
        let Some(modal) = self.modal.as_mut() else {
            return false;
        };
        modal.message = message.to_string();
        modal.visible = visible;
        true
    }
}

/// Container id a list renders into.
pub fn container_for(list: ListKind) -> &'static str {
    match list {
        ListKind::Watchlist => WATCHLIST_CONTAINER,
        ListKind::TopFive => TOP_FIVE_CONTAINER,
    }
}

/// Builds the box for one movie with the buttons that belong to `list`.
pub fn movie_box(list: ListKind, movie: &Movie) -> MovieBox {
    let buttons = match list {
        ListKind::Watchlist => vec![
            Action::AddToTopFive(movie.clone()),
            Action::MarkWatched(movie.clone()),
        ],
        ListKind::TopFive => vec![Action::RemoveFromTopFive(movie.clone())],
    };
    MovieBox {
        title: movie.title.clone(),
        overview: movie.overview.clone(),
        poster: movie.poster_url().map(|src| Poster {
            src,
            alt: POSTER_ALT,
        }),
        buttons,
    }
}

/// Builds the full child list for a section.
pub fn section_nodes(list: ListKind, movies: &[Movie]) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(movies.len() + 1);
    match list {
        ListKind::Watchlist => {
            if movies.is_empty() {
                nodes.push(Node::Paragraph(EMPTY_WATCHLIST_MESSAGE.to_string()));
                return nodes;
            }
        }
        ListKind::TopFive => nodes.push(Node::Heading {
            text: String::new(),
            class: "subtitle",
        }),
    }
    nodes.extend(
        movies
            .iter()
            .map(|movie| Node::MovieBox(movie_box(list, movie))),
    );
    nodes
}

/// Clears and rebuilds the section for `list`. A page without the container is
/// left untouched and the miss is logged.
pub fn render_list<T: RenderTarget + ?Sized>(target: &mut T, list: ListKind, movies: &[Movie]) {
    let container = container_for(list);
    if !target.has_container(container) {
        tracing::error!(container, "element with id \"{container}\" not found");
        return;
    }
    tracing::debug!(list = %list, len = movies.len(), "rendering list");
    target.replace_children(container, section_nodes(list, movies));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, poster: Option<&str>) -> Movie {
        Movie::new(title, format!("{title} overview"), poster.map(str::to_string))
    }

    #[test]
    fn test_watchlist_box_has_two_buttons_and_poster() {
        let dune = movie("Dune", Some("/d.jpg"));
        let built = movie_box(ListKind::Watchlist, &dune);
        assert_eq!(built.title, "Dune");
        assert_eq!(built.overview, "Dune overview");
        assert_eq!(
            built.poster,
            Some(Poster {
                src: "https://image.tmdb.org/t/p/w200/d.jpg".to_string(),
                alt: "Movie Poster",
            })
        );
        assert_eq!(
            built.buttons,
            vec![
                Action::AddToTopFive(dune.clone()),
                Action::MarkWatched(dune.clone())
            ]
        );
        assert_eq!(built.buttons[0].label(), "Add to Top 5");
        assert_eq!(built.buttons[1].classes(), &["button", "watched"]);
    }

    #[test]
    fn test_top_five_box_has_remove_button_only() {
        let heat = movie("Heat", None);
        let built = movie_box(ListKind::TopFive, &heat);
        assert_eq!(built.poster, None);
        assert_eq!(built.buttons, vec![Action::RemoveFromTopFive(heat)]);
        assert_eq!(built.buttons[0].label(), "Remove");
    }

    #[test]
    fn test_empty_watchlist_renders_placeholder() {
        let nodes = section_nodes(ListKind::Watchlist, &[]);
        assert_eq!(
            nodes,
            vec![Node::Paragraph("No movies in your watchlist.".to_string())]
        );
    }

    #[test]
    fn test_empty_top_five_renders_heading_only() {
        let nodes = section_nodes(ListKind::TopFive, &[]);
        assert_eq!(nodes.len(), 1);
        assert!(matches!(&nodes[0], Node::Heading { class: "subtitle", .. }));
    }

    #[test]
    fn test_render_replaces_previous_content() {
        let mut tree = ViewTree::page();
        render_list(
            &mut tree,
            ListKind::Watchlist,
            &[movie("A", None), movie("B", None)],
        );
        assert_eq!(tree.movie_boxes(WATCHLIST_CONTAINER).count(), 2);

        render_list(&mut tree, ListKind::Watchlist, &[movie("C", None)]);
        let titles: Vec<_> = tree
            .movie_boxes(WATCHLIST_CONTAINER)
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(titles, vec!["C"]);
    }

    #[test]
    fn test_render_without_container_is_noop() {
        let mut tree = ViewTree::with_containers(&[TOP_FIVE_CONTAINER]);
        render_list(&mut tree, ListKind::Watchlist, &[movie("A", None)]);
        assert!(tree.children(WATCHLIST_CONTAINER).is_empty());
        assert!(!tree.has_container(WATCHLIST_CONTAINER));
    }

    #[test]
    fn test_show_modal_without_overlay_reports_missing() {
        let mut tree = ViewTree::with_containers(&[WATCHLIST_CONTAINER]);
        assert!(!tree.show_modal("hi", true));
        assert!(tree.modal().is_none());
    }
}
