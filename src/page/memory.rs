use std::collections::{BTreeSet, HashMap};

use super::{ElementId, Page};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Element {
    value: String,
    content: String,
    classes: BTreeSet<String>,
}

/// A page held entirely in memory. Backs the console driver and the tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    elements: HashMap<ElementId, Element>,
    buttons: HashMap<String, Vec<u32>>,
    root_properties: HashMap<String, String>,
    viewport_height: u32,
}

impl MemoryPage {
    pub fn new(viewport_height: u32) -> Self {
        Self {
            viewport_height,
            ..Default::default()
        }
    }

    /// A page with all three game elements present and one start button.
    pub fn game_screen(viewport_height: u32) -> Self {
        Self::new(viewport_height)
            .with_element(ElementId::AnswerBox)
            .with_element(ElementId::PredictionBox)
            .with_element(ElementId::Prediction)
            .with_button(super::START_BUTTON_CLASS)
    }

    pub fn with_element(mut self, id: ElementId) -> Self {
        self.insert(id);
        self
    }

    pub fn with_button(mut self, class: &str) -> Self {
        self.buttons.entry(class.to_owned()).or_default().push(0);
        self
    }

    pub fn insert(&mut self, id: ElementId) {
        self.elements.entry(id).or_default();
    }

    pub fn remove(&mut self, id: ElementId) {
        self.elements.remove(&id);
    }

    pub fn remove_buttons(&mut self, class: &str) {
        self.buttons.remove(class);
    }

    pub fn set_content(&mut self, id: ElementId, content: &str) -> bool {
        self.elements
            .get_mut(&id)
            .map(|element| element.content = content.to_owned())
            .is_some()
    }

    pub fn content(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).map(|element| element.content.as_str())
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements
            .get(&id)
            .is_some_and(|element| element.classes.contains(class))
    }

    /// How many times each button with `class` has been clicked, in order.
    pub fn clicks(&self, class: &str) -> &[u32] {
        self.buttons.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn root_property(&self, name: &str) -> Option<&str> {
        self.root_properties.get(name).map(String::as_str)
    }

    pub fn resize(&mut self, viewport_height: u32) {
        self.viewport_height = viewport_height;
    }
}

impl Page for MemoryPage {
    fn value(&self, id: ElementId) -> Option<String> {
        self.elements.get(&id).map(|element| element.value.clone())
    }

    fn set_value(&mut self, id: ElementId, value: &str) -> bool {
        self.elements
            .get_mut(&id)
            .map(|element| element.value = value.to_owned())
            .is_some()
    }

    fn clear_content(&mut self, id: ElementId) -> bool {
        self.set_content(id, "")
    }

    fn add_class(&mut self, id: ElementId, class: &str) -> bool {
        self.elements
            .get_mut(&id)
            .map(|element| element.classes.insert(class.to_owned()))
            .is_some()
    }

    fn remove_class(&mut self, id: ElementId, class: &str) -> bool {
        self.elements
            .get_mut(&id)
            .map(|element| element.classes.remove(class))
            .is_some()
    }

    fn click_first(&mut self, class: &str) -> bool {
        match self.buttons.get_mut(class).and_then(|buttons| buttons.first_mut()) {
            Some(clicks) => {
                *clicks += 1;
                true
            }
            None => false,
        }
    }

    fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    fn set_root_property(&mut self, name: &str, value: &str) {
        self.root_properties.insert(name.to_owned(), value.to_owned());
    }
}
