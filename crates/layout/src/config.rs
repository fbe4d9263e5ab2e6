use serde::{Deserialize, Serialize};

/// Tunables of a layout run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Text shown for a page-number citation whose target is not known yet,
    /// and left in place when the target never appears.
    ///
    /// Defaults to `"?"`.
    pub unresolved_placeholder: String,
    /// How far an inter-word space may shrink, in thousandths of its
    /// natural width.
    ///
    /// Defaults to `333`.
    pub word_space_shrink: u16,
    /// How far an inter-word space may stretch, in thousandths of its
    /// natural width.
    ///
    /// Defaults to `500`.
    pub word_space_stretch: u16,
    /// Upper bound on the pages one document may produce. Guards against
    /// content that can never be placed.
    ///
    /// Defaults to `10000`.
    pub max_pages: usize,
    /// Keep page content in the area tree after it was handed to the model.
    ///
    /// - **true**: pages stay inspectable through `AreaTree::pages`.
    /// - **false**: content is dropped once the model accepted the page,
    ///   keeping memory flat for long documents.
    ///
    /// Defaults to `true`.
    pub retain_pages: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            unresolved_placeholder: "?".to_string(),
            word_space_shrink: 333,
            word_space_stretch: 500,
            max_pages: 10000,
            retain_pages: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{ "unresolvedPlaceholder": "??", "maxPages": 5 }"#).unwrap();
        assert_eq!(config.unresolved_placeholder, "??");
        assert_eq!(config.max_pages, 5);
        assert_eq!(config.word_space_stretch, 500);
        assert!(config.retain_pages);
    }
}
