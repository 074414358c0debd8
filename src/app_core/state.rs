//! Terminal application state: the shelf plus selection, overlays and the
//! screen regions recorded by the last draw (used for mouse hit-testing).

use crate::app_core::form::AddMovieForm;
use crate::app_core::lists::Shelf;
use crate::app_core::render::{self, Action, MovieBox, ViewTree};
use crate::model::ListKind;
use crate::store::Storage;
use crate::theme::ThemeConfig;
use ratatui::layout::Rect;
use tui_scrollview::ScrollViewState;

/// Selection and scroll position inside one section pane.
#[derive(Default)]
pub struct SectionState {
    /// Index of the selected movie box.
    pub selected: Option<usize>,
    /// Index of the selected button inside that box.
    pub button: usize,
    pub scroll: ScrollViewState,
    /// Scroll the selected box into view on the next draw.
    pub follow_selection: bool,
}

/// A clickable button as last drawn on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonHit {
    pub area: Rect,
    pub list: ListKind,
    pub box_index: usize,
    pub button_index: usize,
}

/// A movie box as last drawn on screen (visible part only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxHit {
    pub area: Rect,
    pub list: ListKind,
    pub box_index: usize,
}

pub type DynShelf = Shelf<Box<dyn Storage>, ViewTree>;

pub struct AppState {
    pub shelf: DynShelf,
    pub theme: ThemeConfig,
    pub app_version: String,
    pub focused: ListKind,
    pub watchlist_view: SectionState,
    pub top_five_view: SectionState,
    pub form: Option<AddMovieForm>,
    pub show_help: bool,
    pub should_quit: bool,
    /// Last storage failure, shown in the status bar until the next success.
    pub status_error: Option<String>,
    pub pane_areas: Vec<(Rect, ListKind)>,
    pub box_hits: Vec<BoxHit>,
    pub button_hits: Vec<ButtonHit>,
    /// Content box of the notice overlay; clicks outside it dismiss the notice.
    pub notice_content_area: Option<Rect>,
    pub alert_ok_area: Option<Rect>,
}

impl AppState {
    pub fn new(storage: Box<dyn Storage>, theme: ThemeConfig, app_version: String) -> Self {
        let mut shelf = Shelf::new(storage, ViewTree::page());
        shelf.load_page();
        let mut app = Self {
            shelf,
            theme,
            app_version,
            focused: ListKind::Watchlist,
            watchlist_view: SectionState::default(),
            top_five_view: SectionState::default(),
            form: None,
            show_help: false,
            should_quit: false,
            status_error: None,
            pane_areas: Vec::new(),
            box_hits: Vec::new(),
            button_hits: Vec::new(),
            notice_content_area: None,
            alert_ok_area: None,
        };
        app.clamp_all();
        app
    }

    pub fn section(&self, list: ListKind) -> &SectionState {
        match list {
            ListKind::Watchlist => &self.watchlist_view,
            ListKind::TopFive => &self.top_five_view,
        }
    }

    pub fn section_mut(&mut self, list: ListKind) -> &mut SectionState {
        match list {
            ListKind::Watchlist => &mut self.watchlist_view,
            ListKind::TopFive => &mut self.top_five_view,
        }
    }

    /// Boxes currently rendered for `list`.
    pub fn boxes(&self, list: ListKind) -> Vec<&MovieBox> {
        self.shelf
            .target()
            .movie_boxes(render::container_for(list))
            .collect()
    }

    pub fn box_count(&self, list: ListKind) -> usize {
        self.boxes(list).len()
    }

    /// Keeps selection inside the rendered boxes after the lists change.
    pub fn clamp_selection(&mut self, list: ListKind) {
        let button_counts: Vec<usize> = self
            .boxes(list)
            .iter()
            .map(|b| b.buttons.len())
            .collect();
        let section = self.section_mut(list);
        if button_counts.is_empty() {
            section.selected = None;
            section.button = 0;
            return;
        }
        let selected = section
            .selected
            .unwrap_or(0)
            .min(button_counts.len() - 1);
        section.selected = Some(selected);
        section.button = section
            .button
            .min(button_counts[selected].saturating_sub(1));
    }

    pub fn clamp_all(&mut self) {
        for list in ListKind::ALL {
            self.clamp_selection(list);
        }
    }

    pub fn move_selection(&mut self, direction: i32) {
        let count = self.box_count(self.focused);
        if count == 0 {
            return;
        }
        let section = self.section_mut(self.focused);
        let current = section.selected.unwrap_or(0);
        let next = if direction < 0 {
            current.saturating_sub(direction.unsigned_abs() as usize)
        } else {
            (current + direction as usize).min(count - 1)
        };
        section.selected = Some(next);
        section.follow_selection = true;
        self.clamp_selection(self.focused);
    }

    pub fn select_first(&mut self) {
        if self.box_count(self.focused) > 0 {
            let section = self.section_mut(self.focused);
            section.selected = Some(0);
            section.follow_selection = true;
            self.clamp_selection(self.focused);
        }
    }

    pub fn select_last(&mut self) {
        let count = self.box_count(self.focused);
        if count > 0 {
            let section = self.section_mut(self.focused);
            section.selected = Some(count - 1);
            section.follow_selection = true;
            self.clamp_selection(self.focused);
        }
    }

    pub fn move_button(&mut self, direction: i32) {
        let list = self.focused;
        let Some(selected) = self.section(list).selected else {
            return;
        };
        let Some(count) = self.boxes(list).get(selected).map(|b| b.buttons.len()) else {
            return;
        };
        if count == 0 {
            return;
        }
        let section = self.section_mut(list);
        section.button = if direction < 0 {
            section.button.saturating_sub(1)
        } else {
            (section.button + 1).min(count - 1)
        };
    }

    pub fn focus(&mut self, list: ListKind) {
        self.focused = list;
        self.clamp_selection(list);
    }

    pub fn focus_other_pane(&mut self) {
        let next = match self.focused {
            ListKind::Watchlist => ListKind::TopFive,
            ListKind::TopFive => ListKind::Watchlist,
        };
        self.focus(next);
    }

    /// The action behind the selected button of the focused pane.
    pub fn selected_action(&self) -> Option<Action> {
        let section = self.section(self.focused);
        let selected = section.selected?;
        self.boxes(self.focused)
            .get(selected)
            .and_then(|b| b.buttons.get(section.button))
            .cloned()
    }

    /// Runs a button action and keeps the selection valid afterwards.
    pub fn run_action(&mut self, action: Action, now_ms: u64) {
        let result = self.shelf.dispatch(action, now_ms);
        self.record_result(result);
        self.clamp_all();
    }

    pub fn press_selected(&mut self, now_ms: u64) {
        if let Some(action) = self.selected_action() {
            self.run_action(action, now_ms);
        }
    }

    pub fn open_form(&mut self) {
        self.show_help = false;
        self.form = Some(AddMovieForm::new());
    }

    /// Adds the form's movie to the watchlist. The form stays open when the
    /// input is rejected.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let Some(movie) = form.to_movie() else {
            return;
        };
        self.form = None;
        let result = self.shelf.add_to_watchlist(movie);
        self.record_result(result);
        self.focus(ListKind::Watchlist);
        self.select_last();
    }

    /// Applies due notice dismissals. Returns `true` if a redraw is needed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.shelf.tick(now_ms)
    }

    pub fn alert_pending(&self) -> bool {
        self.shelf.alert().is_some()
    }

    pub fn acknowledge_alert(&mut self) {
        if let Some(message) = self.shelf.take_alert() {
            tracing::debug!(%message, "alert acknowledged");
        }
    }

    pub fn notice_visible(&self) -> bool {
        self.shelf.notifier().is_visible()
    }

    fn record_result(&mut self, result: crate::store::Result<()>) {
        match result {
            Ok(()) => self.status_error = None,
            Err(err) => {
                tracing::error!(error = %err, "could not save list");
                self.status_error = Some(format!("Save failed: {err}"));
            }
        }
    }

    pub(crate) fn clear_hit_regions(&mut self) {
        self.pane_areas.clear();
        self.box_hits.clear();
        self.button_hits.clear();
        self.notice_content_area = None;
        self.alert_ok_area = None;
    }
}
