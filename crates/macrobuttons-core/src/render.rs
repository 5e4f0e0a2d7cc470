use crate::bundle::Item;

/// What the sidebar should show right now.
#[derive(Clone, Debug)]
pub struct View<'a> {
    /// Current items, already sorted for display.
    pub items: Vec<&'a Item>,
    /// Labels of the entered groups, outermost first. Empty at the root.
    pub breadcrumbs: Vec<&'a str>,
}

impl View<'_> {
    pub fn is_root(&self) -> bool {
        self.breadcrumbs.is_empty()
    }
}

/// Draws a [`View`]. Activation events flow back through the session.
pub trait Renderer {
    fn render(&mut self, view: &View<'_>);
}
