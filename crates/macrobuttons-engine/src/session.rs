use macrobuttons_core::{display_order, find_item, sorted_for_display, Button, Renderer, Settings, View};
use macrobuttons_store::{StoreError, Stores};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};
use url::Url;

use crate::dispatcher::{CommandDispatcher, DispatchReport};
use crate::navigation::NavigationStack;
use crate::resolver::resolve_url;
use crate::tree::build_root_items;

/// One page's macro sidebar: resolution, navigation, and button presses.
///
/// Activation indices are display positions, i.e. indices into
/// [`Session::view`]'s `items`.
pub struct Session {
    nav: NavigationStack,
    dispatcher: CommandDispatcher,
    renderer: Box<dyn Renderer + Send>,
    url: Option<Url>,
    config_ids: Vec<String>,
}

impl Session {
    pub fn new(dispatcher: CommandDispatcher, renderer: Box<dyn Renderer + Send>) -> Self {
        Self {
            nav: NavigationStack::default(),
            dispatcher,
            renderer,
            url: None,
            config_ids: Vec::new(),
        }
    }

    /// Fully re-resolve for `url`, reset navigation, and re-render.
    ///
    /// Bundles are only loaded when at least one config id applies.
    #[instrument(skip_all, fields(url = %url))]
    pub fn navigate(&mut self, stores: &mut Stores, url: &Url) -> Result<(), StoreError> {
        let ids = resolve_url(stores.sitemap()?, url);
        let items = if ids.is_empty() {
            Vec::new()
        } else {
            build_root_items(&ids, stores.configs()?)
        };
        info!(configs = ids.len(), items = items.len(), "resolved");

        self.config_ids = ids;
        self.nav.replace_root(items);
        self.url = Some(url.clone());
        self.render();
        Ok(())
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn config_ids(&self) -> &[String] {
        &self.config_ids
    }

    pub fn navigation(&self) -> &NavigationStack {
        &self.nav
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn view(&self) -> View<'_> {
        build_view(&self.nav)
    }

    pub fn render(&mut self) {
        let view = build_view(&self.nav);
        self.renderer.render(&view);
    }

    /// Enter the group shown at `display_index`. False on a lookup miss.
    pub fn on_group_activate(&mut self, display_index: usize) -> bool {
        let Some(position) = self.position_of(display_index) else {
            debug!(display_index, "no item at display index");
            return false;
        };
        let entered = match self.nav.enter_group(position) {
            Some(group) => {
                debug!(group = %group.id, "entered group");
                true
            }
            None => false,
        };
        if entered {
            self.render();
        }
        entered
    }

    /// `Some(i)` jumps to breadcrumb `i`; `None` returns to the root.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a rendered breadcrumb index.
    pub fn on_breadcrumb_activate(&mut self, index: Option<usize>) {
        match index {
            Some(i) => self.nav.jump_to(i),
            None => self.nav.reset(),
        }
        self.render();
    }

    /// The button shown at `display_index`, if that slot is a button.
    pub fn button_at(&self, display_index: usize) -> Option<&Button> {
        let position = self.position_of(display_index)?;
        self.nav.current_items().get(position)?.as_button()
    }

    /// Look a button up anywhere in the resolved tree by id.
    pub fn find_button(&self, id: &str) -> Option<&Button> {
        find_item(self.nav.root_items(), id)?.as_button()
    }

    /// Run the commands of the button at `display_index` to completion.
    pub async fn on_button_activate(
        &self,
        display_index: usize,
        settings: &Settings,
    ) -> Option<DispatchReport> {
        let button = self.button_at(display_index)?;
        Some(self.press(button, settings).await)
    }

    /// Run the commands of a button by id.
    pub async fn run_button(&self, id: &str, settings: &Settings) -> Option<DispatchReport> {
        let button = self.find_button(id)?;
        Some(self.press(button, settings).await)
    }

    /// Start the button at `display_index` in the background so further
    /// presses are not blocked by it.
    pub fn spawn_button(
        &self,
        display_index: usize,
        settings: Settings,
    ) -> Option<JoinHandle<DispatchReport>> {
        let button = self.button_at(display_index)?;
        info!(button = %button.id, "button pressed");
        let commands = button.resolved_commands();
        let dispatcher = self.dispatcher.clone();
        Some(tokio::spawn(async move {
            dispatcher.run_commands(&commands, &settings).await
        }))
    }

    async fn press(&self, button: &Button, settings: &Settings) -> DispatchReport {
        info!(button = %button.id, "button pressed");
        let commands = button.resolved_commands();
        self.dispatcher.run_commands(&commands, settings).await
    }

    fn position_of(&self, display_index: usize) -> Option<usize> {
        display_order(self.nav.current_items())
            .get(display_index)
            .copied()
    }
}

fn build_view(nav: &NavigationStack) -> View<'_> {
    View {
        items: sorted_for_display(nav.current_items()),
        breadcrumbs: nav.breadcrumbs(),
    }
}
