use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute linking a highlight element to its record.
pub const HIGHLIGHT_ID_ATTR: &str = "data-highlight-id";
/// Marks elements produced by a host renderer rather than the built-in look.
pub const CUSTOM_HIGHLIGHT_ATTR: &str = "data-custom-highlight";

/// Built-in look applied when no class name or style is configured.
pub const DEFAULT_HIGHLIGHT_STYLE: &[(&str, &str)] = &[
    ("user-select", "text"),
    ("background-color", "#f5f5f4"),
    ("color", "#0c0a09"),
    ("padding", "0px"),
    ("outline", "1px solid #fafaf9"),
    (
        "box-shadow",
        "0 0 0 2px rgba(0,0,0,0.1), 0 1px 2px 1px rgba(0,0,0,0.1), \
         0 2px 4px -2px rgba(0,0,0,0.1), inset 0 -1px 1px -2px rgba(0,0,0,0.1), \
         inset 0 0.5px 1px -2px rgba(255,255,255,0.1)",
    ),
    ("border-radius", "5px"),
    ("display", "inline"),
];

/// Host-chosen appearance of highlight elements.
///
/// ```toml
/// class_name = "marker"
///
/// [style]
/// background-color = "yellow"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    pub class_name: Option<String>,
    pub style: Option<BTreeMap<String, String>>,
}

impl HighlightStyle {
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_property(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style
            .get_or_insert_with(BTreeMap::new)
            .insert(property.into(), value.into());
        self
    }

    /// The configured class name, unless it is blank.
    pub fn class(&self) -> Option<&str> {
        self.class_name
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Neither a usable class name nor a style map was configured.
    pub fn is_unset(&self) -> bool {
        self.class().is_none() && self.style.is_none()
    }
}
