//! Product metadata consumed by the synthesis pipeline.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Read-only product record the prompts are generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProductMetadata {
    /// Product identifier in the catalog
    #[serde(default)]
    pub id: String,

    /// Display name
    pub name: String,

    /// Catalog category (e.g. "skincare", "audio")
    #[serde(default)]
    pub category: String,

    /// Notable features, most important first
    #[serde(default)]
    pub features: Vec<String>,

    /// Dominant colors, most prominent first
    #[serde(default)]
    pub colors: Vec<String>,

    /// Materials, most prominent first
    #[serde(default)]
    pub materials: Vec<String>,

    /// Free-text description from the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProductMetadata {
    /// Create a product with only a name and category.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            category: category.into(),
            features: Vec::new(),
            colors: Vec::new(),
            materials: Vec::new(),
            description: None,
        }
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_materials<I, S>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.materials = materials.into_iter().map(Into::into).collect();
        self
    }

    /// Name to use in generated text; never empty.
    pub fn display_name(&self) -> &str {
        non_empty(&self.name).unwrap_or("the product")
    }

    /// Category to use in generated text; never empty.
    pub fn display_category(&self) -> &str {
        non_empty(&self.category).unwrap_or("lifestyle")
    }

    /// First listed feature, or a generic stand-in.
    pub fn primary_feature(&self) -> &str {
        first_non_empty(&self.features).unwrap_or("signature design")
    }

    /// Feature at `index`, cycling through the list.
    pub fn feature_at(&self, index: usize) -> &str {
        let features: Vec<&str> = self
            .features
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect();
        if features.is_empty() {
            return self.primary_feature();
        }
        features[index % features.len()]
    }

    /// First listed color, or a neutral stand-in.
    pub fn primary_color(&self) -> &str {
        first_non_empty(&self.colors).unwrap_or("neutral")
    }

    /// First listed material, or a generic stand-in.
    pub fn primary_material(&self) -> &str {
        first_non_empty(&self.materials).unwrap_or("premium materials")
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn first_non_empty(values: &[String]) -> Option<&str> {
    values.iter().find_map(|v| non_empty(v))
}
