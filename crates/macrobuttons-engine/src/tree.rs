use macrobuttons_core::{Configs, Item};
use tracing::debug;

/// Concatenate the items of each referenced bundle, in `config_ids` order.
///
/// Ids without a bundle are skipped. Items are neither merged nor
/// de-duplicated across bundles.
pub fn build_root_items(config_ids: &[String], configs: &Configs) -> Vec<Item> {
    let mut items = Vec::new();
    for id in config_ids {
        match configs.get(id) {
            Some(bundle) => items.extend(bundle.items.iter().cloned()),
            None => debug!(config = %id, "referenced config has no bundle"),
        }
    }
    items
}
