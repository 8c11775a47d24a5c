//! "Add Node" context menu model.
//!
//! The menu widget itself is the host's business; this module decides what
//! it lists and remembers where it was opened.

use nge_core::{NodeTypeId, NodeTypeRegistry, Point};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const COMMENT_LABEL: &str = "Comment";
pub const COMMENT_DESCRIPTION: &str = "A comment for documenting nodes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "type", rename_all = "camelCase")]
pub enum MenuValue {
    Node(NodeTypeId),
    Comment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuOption {
    pub value: MenuValue,
    pub label: String,
    pub description: Option<String>,
    pub sort_index: Option<i32>,
}

/// An open menu: where it was requested (screen space) and what it offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuInvocation {
    pub coordinates: Point,
    pub options: Vec<MenuOption>,
}

impl MenuInvocation {
    pub fn offers(&self, value: &MenuValue) -> bool {
        self.options.iter().any(|o| o.value == *value)
    }
}

/// Addable registry types ordered by `(sort_index, label)`, types without a
/// sort index last, followed by the comment entry unless comments are off.
pub fn menu_options(registry: &NodeTypeRegistry, disable_comments: bool) -> Vec<MenuOption> {
    let mut options: Vec<MenuOption> = registry
        .iter()
        .filter(|t| t.is_addable())
        .map(|t| MenuOption {
            value: MenuValue::Node(t.key),
            label: t.label.clone(),
            description: t.description.clone(),
            sort_index: t.sort_index,
        })
        .collect();
    options.sort_by(|a, b| {
        compare_sort_index(a.sort_index, b.sort_index).then_with(|| a.label.cmp(&b.label))
    });

    if !disable_comments {
        options.push(MenuOption {
            value: MenuValue::Comment,
            label: COMMENT_LABEL.to_string(),
            description: Some(COMMENT_DESCRIPTION.to_string()),
            sort_index: None,
        });
    }
    options
}

fn compare_sort_index(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
