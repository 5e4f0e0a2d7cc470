use macrobuttons_core::{Group, Item};

/// Breadcrumb trail through the resolved item tree.
///
/// Only positions are stored; the current item list and the breadcrumb labels
/// are always derived from `root_items` and the trail, so they cannot drift
/// apart.
#[derive(Clone, Debug, Default)]
pub struct NavigationStack {
    root_items: Vec<Item>,
    trail: Vec<usize>,
}

impl NavigationStack {
    pub fn new(root_items: Vec<Item>) -> Self {
        Self {
            root_items,
            trail: Vec::new(),
        }
    }

    pub fn root_items(&self) -> &[Item] {
        &self.root_items
    }

    /// Swap in freshly resolved items. The trail is cleared.
    pub fn replace_root(&mut self, root_items: Vec<Item>) {
        self.root_items = root_items;
        self.reset();
    }

    /// Entered groups, outermost first.
    pub fn groups(&self) -> Vec<&Group> {
        let mut groups = Vec::with_capacity(self.trail.len());
        let mut items: &[Item] = &self.root_items;
        for &position in &self.trail {
            let Some(group) = items.get(position).and_then(Item::as_group) else {
                break;
            };
            groups.push(group);
            items = &group.items;
        }
        groups
    }

    /// Items at the current level.
    pub fn current_items(&self) -> &[Item] {
        let mut items: &[Item] = &self.root_items;
        for &position in &self.trail {
            match items.get(position).and_then(Item::as_group) {
                Some(group) => items = &group.items,
                None => break,
            }
        }
        items
    }

    pub fn breadcrumbs(&self) -> Vec<&str> {
        self.groups().into_iter().map(|g| g.label.as_str()).collect()
    }

    pub fn depth(&self) -> usize {
        self.trail.len()
    }

    pub fn is_root(&self) -> bool {
        self.trail.is_empty()
    }

    /// Descend into the group at `position` of the current items.
    ///
    /// Returns `None` and leaves the stack untouched when `position` is out of
    /// range or names a button.
    pub fn enter_group(&mut self, position: usize) -> Option<&Group> {
        let is_group = self
            .current_items()
            .get(position)
            .is_some_and(|item| item.as_group().is_some());
        if !is_group {
            return None;
        }
        self.trail.push(position);
        self.groups().pop()
    }

    /// Truncate to the breadcrumb at `index`, making it the current group.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a position in the current trail. Indices come
    /// from rendering this stack, so anything else is a caller bug.
    pub fn jump_to(&mut self, index: usize) {
        assert!(
            index < self.trail.len(),
            "breadcrumb index {index} out of range for depth {}",
            self.trail.len()
        );
        self.trail.truncate(index + 1);
    }

    /// Back to the root items.
    pub fn reset(&mut self) {
        self.trail.clear();
    }
}
