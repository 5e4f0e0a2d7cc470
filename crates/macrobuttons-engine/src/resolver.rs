use std::collections::HashSet;

use macrobuttons_core::Sitemap;
use tracing::debug;
use url::Url;

use crate::paths::enumerate_path_prefixes;

/// Config ids that apply to `hostname` + `pathname`, most general first.
///
/// Traversal runs from the most specific prefix towards the root. Each id is
/// kept at its most specific occurrence, and an entry with `inherit: false`
/// stops the walk after its own configs are collected. The result is then
/// reversed so more specific bundles come last and layer over general ones.
pub fn resolve_configs(sitemap: &Sitemap, hostname: &str, pathname: &str) -> Vec<String> {
    let Some(site) = sitemap.site(hostname) else {
        return Vec::new();
    };

    let mut resolved = Vec::new();
    let mut seen = HashSet::new();

    for prefix in enumerate_path_prefixes(pathname).iter().rev() {
        let Some(entry) = site.entry(prefix) else {
            continue;
        };

        for config in &entry.configs {
            if seen.insert(config.as_str()) {
                resolved.push(config.clone());
            }
        }

        if !entry.inherit {
            debug!(path = %prefix, "inheritance cut off");
            break;
        }
    }

    resolved.reverse();
    resolved
}

/// [`resolve_configs`] for a parsed URL. URLs without a host resolve to nothing.
pub fn resolve_url(sitemap: &Sitemap, url: &Url) -> Vec<String> {
    match url.host_str() {
        Some(host) => resolve_configs(sitemap, host, url.path()),
        None => Vec::new(),
    }
}
