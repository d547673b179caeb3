//! Modifier Group / Option Models

use serde::{Deserialize, Serialize};

/// Modifier group entity
///
/// The name is also the lookup key items reference. `required` and
/// `single_select` drive selection validation at add-to-cart time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierGroup {
    pub name: String,
    /// Ordered option list
    pub options: Vec<ModifierOption>,
    /// At least one option must be picked
    #[serde(default)]
    pub required: bool,
    /// At most one option may be picked
    #[serde(default)]
    pub single_select: bool,
}

impl ModifierGroup {
    /// Whether `name` is one of this group's options.
    pub fn contains_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o.name == name)
    }
}

/// Modifier option entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierOption {
    pub name: String,
    /// Non-negative price delta in display currency units
    pub price: f64,
}
