use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::command::{parse_script, Command};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleMeta {
    pub uid: String,
    pub name: String,
    pub version: String,
}

/// A named collection of items that paths can reference by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigBundle {
    pub meta: BundleMeta,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl ConfigBundle {
    /// Ids that occur more than once anywhere in this bundle's tree, in
    /// first-repeat order.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut dupes = Vec::new();
        let mut stack: Vec<&Item> = self.items.iter().rev().collect();
        while let Some(item) = stack.pop() {
            if !seen.insert(item.id()) && !dupes.iter().any(|d| d == item.id()) {
                dupes.push(item.id().to_string());
            }
            if let Item::Group(group) = item {
                stack.extend(group.items.iter().rev());
            }
        }
        dupes
    }
}

/// Config id → bundle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configs {
    bundles: BTreeMap<String, ConfigBundle>,
}

impl Configs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&ConfigBundle> {
        self.bundles.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, bundle: ConfigBundle) -> Option<ConfigBundle> {
        self.bundles.insert(id.into(), bundle)
    }

    pub fn remove(&mut self, id: &str) -> Option<ConfigBundle> {
        self.bundles.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigBundle)> {
        self.bundles.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

/// A node in the macro tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    Button(Button),
    Group(Group),
}

/// Executable leaf.
///
/// Either `commands` or the legacy `action` script carries the payload; when
/// both are present `commands` wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<Command>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Button {
    /// The command sequence this button runs.
    pub fn resolved_commands(&self) -> Vec<Command> {
        if !self.commands.is_empty() {
            return self.commands.clone();
        }
        self.action.as_deref().map(parse_script).unwrap_or_default()
    }
}

/// Navigable branch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Item {
    pub fn id(&self) -> &str {
        match self {
            Item::Button(b) => &b.id,
            Item::Group(g) => &g.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Item::Button(b) => &b.label,
            Item::Group(g) => &g.label,
        }
    }

    pub fn order(&self) -> i64 {
        match self {
            Item::Button(b) => b.order,
            Item::Group(g) => g.order,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Item::Group(g) => Some(g),
            Item::Button(_) => None,
        }
    }

    pub fn as_button(&self) -> Option<&Button> {
        match self {
            Item::Button(b) => Some(b),
            Item::Group(_) => None,
        }
    }
}

/// Depth-first lookup by id. The first match in document order wins.
pub fn find_item<'a>(items: &'a [Item], id: &str) -> Option<&'a Item> {
    for item in items {
        if item.id() == id {
            return Some(item);
        }
        if let Item::Group(group) = item {
            if let Some(found) = find_item(&group.items, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Positions of `items` in display order: by `order`, ties keep their position.
pub fn display_order(items: &[Item]) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..items.len()).collect();
    positions.sort_by_key(|&i| items[i].order());
    positions
}

/// Siblings ordered for display.
pub fn sorted_for_display(items: &[Item]) -> Vec<&Item> {
    display_order(items).into_iter().map(|i| &items[i]).collect()
}
