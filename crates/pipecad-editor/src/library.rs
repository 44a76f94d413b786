//! User-saved parts library.

use pipecad_ir::Template;
use serde::{Deserialize, Serialize};

/// Saved templates in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartLibrary {
    templates: Vec<Template>,
}

impl PartLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template, replacing any existing one with the same id.
    pub fn add(&mut self, template: Template) {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(slot) => *slot = template,
            None => self.templates.push(template),
        }
    }

    /// Remove a template by id.
    pub fn remove(&mut self, id: &str) -> Option<Template> {
        let pos = self.templates.iter().position(|t| t.id == id)?;
        Some(self.templates.remove(pos))
    }

    /// Look up a template by id.
    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Iterate templates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipecad_ir::{ComponentType, Properties, TemplateShape};

    fn single(name: &str) -> Template {
        Template::new(
            name,
            TemplateShape::Single {
                component_type: ComponentType::Flange,
                properties: Properties::new(),
            },
        )
    }

    #[test]
    fn test_add_get_remove() {
        let mut lib = PartLibrary::new();
        let t = single("flange");
        let id = t.id.clone();
        lib.add(t);
        lib.add(single("other"));
        assert_eq!(lib.len(), 2);
        assert_eq!(lib.get(&id).unwrap().name, "flange");
        assert_eq!(lib.remove(&id).unwrap().name, "flange");
        assert!(lib.get(&id).is_none());
        assert_eq!(lib.iter().next().unwrap().name, "other");
    }

    #[test]
    fn test_add_same_id_replaces() {
        let mut lib = PartLibrary::new();
        let mut t = single("v1");
        lib.add(t.clone());
        t.name = "v2".to_string();
        lib.add(t);
        assert_eq!(lib.len(), 1);
        assert_eq!(lib.iter().next().unwrap().name, "v2");
    }
}
