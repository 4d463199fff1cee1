//! Navigation menu shapes consumed by the menu filter.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl MenuItem {
    pub fn new<L: Into<String>, P: Into<String>>(label: L, path: P) -> Self {
        MenuItem {
            label: label.into(),
            path: path.into(),
            icon: None,
        }
    }

    pub fn with_icon<I: Into<String>>(mut self, icon: I) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MenuSection {
    pub title: String,
    pub items: Vec<MenuItem>,
}

impl MenuSection {
    pub fn new<T: Into<String>>(title: T, items: Vec<MenuItem>) -> Self {
        MenuSection {
            title: title.into(),
            items,
        }
    }
}
