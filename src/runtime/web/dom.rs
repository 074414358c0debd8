//! [`RenderTarget`] backed by the page's DOM.
//!
//! Clicks are delegated: each container gets one listener, installed the
//! first time it is rendered into, which maps the clicked button back to the
//! [`Action`] it was built from. Re-rendering only swaps the action table, so
//! no listener is dropped while it may be running.

use crate::app_core::render::{Action, MODAL_CONTAINER, MovieBox, Node, RenderTarget};
use foldhash::{HashMap, HashSet};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event};

pub const MODAL_CONTENT_SELECTOR: &str = ".modal-content";
pub const MODAL_ACTIVE_CLASS: &str = "is-active";

const BOX_ATTR: &str = "data-box";
const BUTTON_ATTR: &str = "data-button";

/// Handlers the page calls back into.
#[derive(Clone)]
pub struct DomCallbacks {
    pub on_action: Rc<dyn Fn(Action)>,
    /// Called with `true` when the click landed inside `.modal-content`.
    pub on_overlay_click: Rc<dyn Fn(bool)>,
}

type ActionTable = Rc<RefCell<HashMap<String, Vec<Vec<Action>>>>>;

pub struct DomTarget {
    document: Document,
    callbacks: DomCallbacks,
    actions: ActionTable,
    wired: HashSet<String>,
    listeners: Vec<Closure<dyn FnMut(Event)>>,
}

impl DomTarget {
    pub fn new(document: Document, callbacks: DomCallbacks) -> Self {
        let mut target = Self {
            document,
            callbacks,
            actions: Rc::default(),
            wired: HashSet::default(),
            listeners: Vec::new(),
        };
        if let Err(err) = target.wire_overlay() {
            tracing::warn!(error = ?err, "could not attach overlay listener");
        }
        target
    }

    fn element(&self, tag: &str) -> Result<Element, JsValue> {
        self.document.create_element(tag)
    }

    fn build_node(&self, node: &Node) -> Result<Element, JsValue> {
        match node {
            Node::Heading { text, class } => {
                let heading = self.element("h2")?;
                if !class.is_empty() {
                    heading.set_class_name(class);
                }
                heading.set_text_content(Some(text.as_str()));
                Ok(heading)
            }
            Node::Paragraph(text) => {
                let paragraph = self.element("p")?;
                paragraph.set_text_content(Some(text.as_str()));
                Ok(paragraph)
            }
            Node::MovieBox(movie_box) => self.build_movie_box(movie_box),
        }
    }

    fn build_movie_box(&self, movie_box: &MovieBox) -> Result<Element, JsValue> {
        let container = self.element("div")?;
        container.class_list().add_1(MovieBox::CLASS)?;

        let title = self.element("h2")?;
        title.set_text_content(Some(movie_box.title.as_str()));
        container.append_child(&title)?;

        let overview = self.element("p")?;
        overview.set_text_content(Some(movie_box.overview.as_str()));
        container.append_child(&overview)?;

        if let Some(poster) = &movie_box.poster {
            let img = self.element("img")?;
            img.set_attribute("src", &poster.src)?;
            img.set_attribute("alt", poster.alt)?;
            img.class_list().add_1("poster")?;
            container.append_child(&img)?;
        }

        for action in &movie_box.buttons {
            let button = self.element("button")?;
            for class in action.classes() {
                button.class_list().add_1(class)?;
            }
            button.set_text_content(Some(action.label()));
            container.append_child(&button)?;
        }
        Ok(container)
    }

    fn mount(&mut self, id: &str, nodes: &[Node]) -> Result<(), JsValue> {
        let Some(container) = self.document.get_element_by_id(id) else {
            return Ok(());
        };
        container.set_text_content(None);

        let mut table = Vec::new();
        for node in nodes {
            let element = self.build_node(node)?;
            if let Node::MovieBox(movie_box) = node {
                let box_index = table.len();
                let buttons = element.get_elements_by_tag_name("button");
                for button_index in 0..buttons.length() {
                    if let Some(button) = buttons.item(button_index) {
                        button.set_attribute(BOX_ATTR, &box_index.to_string())?;
                        button.set_attribute(BUTTON_ATTR, &button_index.to_string())?;
                    }
                }
                table.push(movie_box.buttons.clone());
            }
            container.append_child(&element)?;
        }

        self.actions.borrow_mut().insert(id.to_string(), table);
        self.wire_container(id, &container)
    }

    fn wire_container(&mut self, id: &str, container: &Element) -> Result<(), JsValue> {
        if self.wired.contains(id) {
            return Ok(());
        }
        let actions = Rc::clone(&self.actions);
        let on_action = Rc::clone(&self.callbacks.on_action);
        let container_id = id.to_string();
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(button) = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.closest("button").ok().flatten())
            else {
                return;
            };
            let index = |attr: &str| {
                button
                    .get_attribute(attr)
                    .and_then(|value| value.parse::<usize>().ok())
            };
            let (Some(box_index), Some(button_index)) = (index(BOX_ATTR), index(BUTTON_ATTR))
            else {
                return;
            };
            // Released before dispatch: the action re-renders this container.
            let action = actions
                .borrow()
                .get(&container_id)
                .and_then(|boxes| boxes.get(box_index))
                .and_then(|buttons| buttons.get(button_index))
                .cloned();
            if let Some(action) = action {
                on_action(action);
            }
        });
        container.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
        self.listeners.push(listener);
        self.wired.insert(id.to_string());
        Ok(())
    }

    fn wire_overlay(&mut self) -> Result<(), JsValue> {
        let Some(modal) = self.document.get_element_by_id(MODAL_CONTAINER) else {
            return Ok(());
        };
        let on_overlay_click = Rc::clone(&self.callbacks.on_overlay_click);
        let overlay: JsValue = modal.clone().into();
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let on_overlay = event
                .target()
                .is_some_and(|target| AsRef::<JsValue>::as_ref(&target) == &overlay);
            on_overlay_click(!on_overlay);
        });
        modal.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
        self.listeners.push(listener);
        Ok(())
    }
}

impl RenderTarget for DomTarget {
    fn has_container(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn replace_children(&mut self, id: &str, nodes: Vec<Node>) {
        if let Err(err) = self.mount(id, &nodes) {
            tracing::error!(container = id, error = ?err, "failed to render section");
        }
    }

    fn show_modal(&mut self, message: &str, visible: bool) -> bool {
        let Some(modal) = self.document.get_element_by_id(MODAL_CONTAINER) else {
            return false;
        };
        if visible
            && let Ok(Some(content)) = modal.query_selector(MODAL_CONTENT_SELECTOR)
        {
            content.set_text_content(Some(message));
        }
        let classes = modal.class_list();
        let result = if visible {
            classes.add_1(MODAL_ACTIVE_CLASS)
        } else {
            classes.remove_1(MODAL_ACTIVE_CLASS)
        };
        if let Err(err) = result {
            tracing::warn!(error = ?err, "could not toggle overlay");
        }
        true
    }
}
