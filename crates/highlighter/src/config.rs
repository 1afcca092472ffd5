use highlight_core::{HighlightStyle, SelectionBoundary};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse highlighter config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid highlight element tag {0:?}")]
    InvalidElement(String),
}

/// Behaviour of a [`Highlighter`](crate::Highlighter).
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// selection_boundary = "cursor"
/// confirm_highlights = true
///
/// [highlight_style]
/// class_name = "marker"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlighterConfig {
    /// When off, pointer input is ignored and pending work is dropped.
    pub enabled: bool,
    pub selection_boundary: SelectionBoundary,
    /// `None` uses the built-in look.
    pub highlight_style: Option<HighlightStyle>,
    /// Tag of the wrapper element.
    pub highlight_element: String,
    pub allow_cross_element_selection: bool,
    pub clear_selection_after_highlight: bool,
    pub remove_highlight_on_click: bool,
    /// New highlights stay transient until confirmed through the
    /// confirmation UI.
    pub confirm_highlights: bool,
    pub debounce_ms: u64,
    /// The confirmation UI is anchored this many pixels above the selection.
    pub confirmation_offset_y: f32,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selection_boundary: SelectionBoundary::Word,
            highlight_style: None,
            highlight_element: "span".to_string(),
            allow_cross_element_selection: false,
            clear_selection_after_highlight: true,
            remove_highlight_on_click: false,
            confirm_highlights: false,
            debounce_ms: 100,
            confirmation_offset_y: 40.0,
        }
    }
}

impl HighlighterConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tag = self.highlight_element.as_str();
        let valid = tag
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(ConfigError::InvalidElement(tag.to_string()));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_selection_boundary(mut self, boundary: SelectionBoundary) -> Self {
        self.selection_boundary = boundary;
        self
    }

    pub fn with_highlight_style(mut self, style: HighlightStyle) -> Self {
        self.highlight_style = Some(style);
        self
    }

    pub fn with_highlight_element(mut self, tag: impl Into<String>) -> Self {
        self.highlight_element = tag.into();
        self
    }

    pub fn with_cross_element_selection(mut self, allow: bool) -> Self {
        self.allow_cross_element_selection = allow;
        self
    }

    pub fn with_clear_selection_after_highlight(mut self, clear: bool) -> Self {
        self.clear_selection_after_highlight = clear;
        self
    }

    pub fn with_remove_on_click(mut self, remove: bool) -> Self {
        self.remove_highlight_on_click = remove;
        self
    }

    pub fn with_confirmation(mut self, confirm: bool) -> Self {
        self.confirm_highlights = confirm;
        self
    }

    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_toml_is_default() {
        let config = HighlighterConfig::from_toml_str("").unwrap();
        assert_eq!(config, HighlighterConfig::default());
        assert_eq!(config.debounce(), Duration::from_millis(100));
    }

    #[test]
    fn partial_toml_overrides_only_given_keys() {
        let config = HighlighterConfig::from_toml_str(
            r#"
            selection_boundary = "cursor"
            highlight_element = "mark"
            confirm_highlights = true

            [highlight_style]
            class_name = "marker"

            [highlight_style.style]
            background-color = "yellow"
            "#,
        )
        .unwrap();

        assert_eq!(config.selection_boundary, SelectionBoundary::Cursor);
        assert_eq!(config.highlight_element, "mark");
        assert!(config.confirm_highlights);
        assert!(config.clear_selection_after_highlight);
        let style = config.highlight_style.unwrap();
        assert_eq!(style.class_name.as_deref(), Some("marker"));
        assert_eq!(
            style
                .style
                .as_ref()
                .and_then(|s| s.get("background-color"))
                .map(String::as_str),
            Some("yellow")
        );
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = HighlighterConfig::from_toml_str("debounce_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn bad_element_tag_is_rejected() {
        let err = HighlighterConfig::from_toml_str("highlight_element = \"<span>\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidElement(tag) if tag == "<span>"));
        assert!(
            HighlighterConfig::default()
                .with_highlight_element("")
                .validate()
                .is_err()
        );
    }
}
