//! In-memory element tree.
//!
//! [`Element`] is a cheap, clonable handle to a node. It carries the state
//! binding handlers read and write (attributes, classes, text, markup, form
//! value, checked/disabled/hidden/focused flags) and a list of namespaced
//! event listeners. Selection goes through [`selector::Selector`].
//!
//! ```
//! use outback::dom::Element;
//!
//! let root = Element::new("div").with_child(
//!     Element::new("div").with_attr("id", "anchor").with_child(Element::new("p")),
//! );
//! let found = root.select("#anchor p").unwrap();
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].tag_name(), "p");
//! ```

pub mod selector;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::runner::ds::error::SelectorError;
use selector::Selector;

/// Callback registered for a DOM event.
pub type DomListener = Rc<dyn Fn(&DomEvent)>;

/// A DOM event as delivered to listeners.
#[derive(Clone, Debug)]
pub struct DomEvent {
    pub name: String,
    pub target: Element,
}

struct ListenerEntry {
    event: String,
    namespace: Option<String>,
    listener: DomListener,
}

struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    markup: Option<String>,
    value: String,
    checked: bool,
    disabled: bool,
    hidden: bool,
    focused: bool,
    selected: bool,
    children: Vec<Element>,
    listeners: Vec<ListenerEntry>,
}

#[derive(Clone)]
pub struct Element(Rc<RefCell<ElementData>>);

impl Element {
    pub fn new(tag: &str) -> Self {
        Element(Rc::new(RefCell::new(ElementData {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            text: String::new(),
            markup: None,
            value: String::new(),
            checked: false,
            disabled: false,
            hidden: false,
            focused: false,
            selected: false,
            children: Vec::new(),
            listeners: Vec::new(),
        })))
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_value(self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_child(self, child: Element) -> Self {
        self.append_child(child);
        self
    }

    /// True when both handles point at the same node.
    pub fn same_node(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn tag_name(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn append_child(&self, child: Element) {
        self.0.borrow_mut().children.push(child);
    }

    pub fn children(&self) -> Vec<Element> {
        self.0.borrow().children.clone()
    }

    pub fn clear_children(&self) {
        self.0.borrow_mut().children.clear();
    }

    // ----- attributes and classes -----

    pub fn attr(&self, name: &str) -> Option<String> {
        self.0
            .borrow()
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        let mut data = self.0.borrow_mut();
        match data.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => data.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&self, name: &str) {
        self.0.borrow_mut().attributes.retain(|(k, _)| k != name);
    }

    pub fn id(&self) -> Option<String> {
        self.attr("id")
    }

    pub fn classes(&self) -> Vec<String> {
        self.attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    pub fn toggle_class(&self, class: &str, on: bool) {
        let mut classes = self.classes();
        let present = classes.iter().any(|c| c == class);
        if on && !present {
            classes.push(class.to_string());
        } else if !on && present {
            classes.retain(|c| c != class);
        } else {
            return;
        }
        if classes.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", &classes.join(" "));
        }
    }

    // ----- content -----

    /// Text content of this element and its descendants.
    pub fn text(&self) -> String {
        let data = self.0.borrow();
        let mut text = match &data.markup {
            Some(markup) => strip_tags(markup),
            None => data.text.clone(),
        };
        for child in &data.children {
            text.push_str(&child.text());
        }
        text
    }

    /// Replace the content with literal text.
    pub fn set_text(&self, text: &str) {
        let mut data = self.0.borrow_mut();
        data.text = text.to_string();
        data.markup = None;
        data.children.clear();
    }

    /// Inner markup as last set, or the text content when none was set.
    pub fn html(&self) -> String {
        let markup = self.0.borrow().markup.clone();
        markup.unwrap_or_else(|| self.text())
    }

    /// Replace the content with raw markup. The markup is stored, not parsed.
    pub fn set_html(&self, markup: &str) {
        let mut data = self.0.borrow_mut();
        data.markup = Some(markup.to_string());
        data.text.clear();
        data.children.clear();
    }

    // ----- form state -----

    pub fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    /// Set the form value. On a `select` the child option whose value
    /// matches becomes selected and every other option is deselected.
    pub fn set_value(&self, value: &str) {
        self.0.borrow_mut().value = value.to_string();
        if self.tag_name().eq_ignore_ascii_case("select") {
            self.sync_selected_option();
        }
    }

    /// Mark the option matching this element's value as selected. An
    /// option without a `value` attribute is matched by its text.
    pub fn sync_selected_option(&self) {
        let current = self.value();
        for option in self.children() {
            let value = option.attr("value").unwrap_or_else(|| option.text());
            option.set_selected(value == current);
        }
    }

    pub fn is_checked(&self) -> bool {
        self.0.borrow().checked
    }

    pub fn set_checked(&self, checked: bool) {
        self.0.borrow_mut().checked = checked;
    }

    pub fn is_selected(&self) -> bool {
        self.0.borrow().selected
    }

    pub fn set_selected(&self, selected: bool) {
        self.0.borrow_mut().selected = selected;
    }

    pub fn is_enabled(&self) -> bool {
        !self.0.borrow().disabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.0.borrow_mut().disabled = !enabled;
    }

    pub fn is_visible(&self) -> bool {
        !self.0.borrow().hidden
    }

    pub fn show(&self) {
        self.0.borrow_mut().hidden = false;
    }

    pub fn hide(&self) {
        self.0.borrow_mut().hidden = true;
    }

    pub fn is_focused(&self) -> bool {
        self.0.borrow().focused
    }

    /// Give focus and fire `focus`. No-op when already focused.
    pub fn focus(&self) {
        if self.is_focused() {
            return;
        }
        self.0.borrow_mut().focused = true;
        self.trigger("focus");
    }

    /// Drop focus and fire `blur`. No-op when not focused.
    pub fn blur(&self) {
        if !self.is_focused() {
            return;
        }
        self.0.borrow_mut().focused = false;
        self.trigger("blur");
    }

    /// Simulate a user click: checkboxes toggle, radio buttons become
    /// checked, then `click` and `change` fire.
    pub fn click(&self) {
        match self.attr("type").as_deref() {
            Some("checkbox") => {
                let checked = self.is_checked();
                self.set_checked(!checked);
            }
            Some("radio") => self.set_checked(true),
            _ => {}
        }
        self.trigger("click");
        self.trigger("change");
    }

    // ----- events -----

    /// Register a listener. `namespace` lets a caller remove only its own
    /// listeners later.
    pub fn on(&self, event: &str, namespace: Option<&str>, listener: DomListener) {
        self.0.borrow_mut().listeners.push(ListenerEntry {
            event: event.to_string(),
            namespace: namespace.map(str::to_string),
            listener,
        });
    }

    /// Remove listeners for `event`: all of them when `namespace` is `None`,
    /// otherwise only those registered under that namespace.
    pub fn off(&self, event: &str, namespace: Option<&str>) {
        self.0.borrow_mut().listeners.retain(|entry| {
            entry.event != event
                || namespace.map_or(false, |ns| entry.namespace.as_deref() != Some(ns))
        });
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.0
            .borrow()
            .listeners
            .iter()
            .filter(|entry| entry.event == event)
            .count()
    }

    pub fn trigger(&self, event: &str) {
        let listeners: Vec<DomListener> = self
            .0
            .borrow()
            .listeners
            .iter()
            .filter(|entry| entry.event == event)
            .map(|entry| entry.listener.clone())
            .collect();
        trace!("Element <{}> fires {}", self.tag_name(), event);
        let dom_event = DomEvent {
            name: event.to_string(),
            target: self.clone(),
        };
        for listener in listeners {
            listener(&dom_event);
        }
    }

    // ----- selection -----

    /// Descendants matching `selector`, in document order. The element
    /// itself is never part of the result.
    pub fn select(&self, selector: &str) -> Result<Vec<Element>, SelectorError> {
        let selector = Selector::parse(selector)?;
        let mut found = Vec::new();
        let mut ancestors = vec![self.clone()];
        collect_matches(self, &selector, &mut ancestors, &mut found);
        Ok(found)
    }

    /// Copy of this subtree without listeners.
    pub fn deep_clone(&self) -> Element {
        let data = self.0.borrow();
        Element(Rc::new(RefCell::new(ElementData {
            tag: data.tag.clone(),
            attributes: data.attributes.clone(),
            text: data.text.clone(),
            markup: data.markup.clone(),
            value: data.value.clone(),
            checked: data.checked,
            disabled: data.disabled,
            hidden: data.hidden,
            focused: false,
            selected: data.selected,
            children: data.children.iter().map(Element::deep_clone).collect(),
            listeners: Vec::new(),
        })))
    }
}

fn collect_matches(
    node: &Element,
    selector: &Selector,
    ancestors: &mut Vec<Element>,
    found: &mut Vec<Element>,
) {
    for child in node.children() {
        if selector.matches(&child, ancestors) {
            found.push(child.clone());
        }
        ancestors.push(child.clone());
        collect_matches(&child, selector, ancestors, found);
        ancestors.pop();
    }
}

fn strip_tags(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        write!(f, "<{}", data.tag)?;
        for (k, v) in &data.attributes {
            write!(f, " {}=\"{}\"", k, v)?;
        }
        write!(f, ">")
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.same_node(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_select_in_document_order() {
        let root = Element::new("div")
            .with_child(Element::new("span").with_attr("data-bind", "text: @a"))
            .with_child(
                Element::new("div")
                    .with_child(Element::new("input").with_attr("data-bind", "value: @b")),
            );
        let found = root.select("[data-bind]").unwrap();
        let tags: Vec<String> = found.iter().map(Element::tag_name).collect();
        assert_eq!(tags, vec!["span", "input"]);
    }

    #[test]
    fn test_select_excludes_self() {
        let root = Element::new("div").with_attr("id", "anchor");
        assert!(root.select("#anchor").unwrap().is_empty());
    }

    #[test]
    fn test_select_value_marks_matching_option() {
        let select = Element::new("select")
            .with_child(Element::new("option").with_attr("value", "car").with_text("Car"))
            .with_child(Element::new("option").with_text("boat"));
        let selected = || -> Vec<bool> { select.children().iter().map(Element::is_selected).collect() };

        select.set_value("boat");
        assert_eq!(selected(), vec![false, true]);
        select.set_value("car");
        assert_eq!(selected(), vec![true, false]);
        select.set_value("plane");
        assert_eq!(selected(), vec![false, false]);
    }

    #[test]
    fn test_toggle_class() {
        let el = Element::new("span").with_attr("class", "a b");
        el.toggle_class("c", true);
        el.toggle_class("a", false);
        assert_eq!(el.classes(), vec!["b".to_string(), "c".to_string()]);
        el.toggle_class("b", false);
        el.toggle_class("c", false);
        assert!(!el.has_attr("class"));
    }

    #[test]
    fn test_namespaced_off() {
        let el = Element::new("input");
        let hits = Rc::new(Cell::new(0));
        for ns in &["one", "two"] {
            let hits = hits.clone();
            el.on("change", Some(*ns), Rc::new(move |_: &DomEvent| hits.set(hits.get() + 1)));
        }
        el.off("change", Some("one"));
        el.trigger("change");
        assert_eq!(hits.get(), 1);
        el.off("change", None);
        assert_eq!(el.listener_count("change"), 0);
    }

    #[test]
    fn test_focus_fires_once() {
        let el = Element::new("input");
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        el.on("focus", None, Rc::new(move |_: &DomEvent| counter.set(counter.get() + 1)));
        el.focus();
        el.focus();
        assert!(el.is_focused());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_html_and_text() {
        let el = Element::new("span");
        el.set_html("<p>Hello, world!</p>");
        assert_eq!(el.html(), "<p>Hello, world!</p>");
        assert_eq!(el.text(), "Hello, world!");
        el.set_text("<b>");
        assert_eq!(el.text(), "<b>");
    }
}
