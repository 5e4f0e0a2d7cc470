use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Hostname → per-site path map.
///
/// Keys are normalized on the way in, including deserialization, so a
/// document keyed by `www.Example.com` or `/docs/` resolves the same as one
/// keyed by `example.com` or `/docs`. Keys that collide after normalization
/// are merged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Sitemap {
    sites: BTreeMap<String, SiteMap>,
}

/// Normalized path → entry for one site.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SiteMap {
    paths: BTreeMap<String, PathEntry>,
}

/// Configs attached to a single path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    pub configs: Vec<String>,
    /// `false` stops ancestor paths from contributing configs.
    #[serde(default = "default_inherit")]
    pub inherit: bool,
}

fn default_inherit() -> bool {
    true
}

impl PathEntry {
    pub fn new(configs: Vec<String>) -> Self {
        Self {
            configs,
            inherit: true,
        }
    }

    pub fn cutoff(configs: Vec<String>) -> Self {
        Self {
            configs,
            inherit: false,
        }
    }
}

/// Lowercase and drop a leading `www.`.
pub fn normalize_hostname(hostname: &str) -> String {
    let lower = hostname.to_ascii_lowercase();
    match lower.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

impl Sitemap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a site by hostname. The hostname is normalized first.
    pub fn site(&self, hostname: &str) -> Option<&SiteMap> {
        self.sites.get(&normalize_hostname(hostname))
    }

    /// Insert or replace a whole site.
    pub fn insert_site(&mut self, hostname: &str, site: SiteMap) {
        self.sites.insert(normalize_hostname(hostname), site);
    }

    /// Attach `config_id` to `path` on `hostname`, creating the entry if needed.
    /// Re-attaching an already present id is a no-op.
    pub fn attach(&mut self, hostname: &str, path: &str, config_id: &str) -> &mut PathEntry {
        let site = self.sites.entry(normalize_hostname(hostname)).or_default();
        let entry = site
            .paths
            .entry(normalize_path(path))
            .or_insert_with(|| PathEntry::new(Vec::new()));
        if !entry.configs.iter().any(|c| c == config_id) {
            entry.configs.push(config_id.to_string());
        }
        entry
    }

    /// Remove `config_id` from `path`. Returns whether anything was removed.
    pub fn detach(&mut self, hostname: &str, path: &str, config_id: &str) -> bool {
        let Some(site) = self.sites.get_mut(&normalize_hostname(hostname)) else {
            return false;
        };
        let Some(entry) = site.paths.get_mut(&normalize_path(path)) else {
            return false;
        };
        let before = entry.configs.len();
        entry.configs.retain(|c| c != config_id);
        before != entry.configs.len()
    }

    fn merge_site(&mut self, hostname: &str, site: SiteMap) {
        match self.sites.entry(normalize_hostname(hostname)) {
            Entry::Vacant(slot) => {
                slot.insert(site);
            }
            Entry::Occupied(slot) => {
                let existing = slot.into_mut();
                for (path, entry) in site.paths {
                    existing.merge_entry(&path, entry);
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SiteMap)> {
        self.sites.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }
}

impl SiteMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, path: &str) -> Option<&PathEntry> {
        self.paths.get(path)
    }

    pub fn insert(&mut self, path: &str, entry: PathEntry) {
        self.paths.insert(normalize_path(path), entry);
    }

    /// Union of configs in first-seen order; a cutoff on either side wins.
    fn merge_entry(&mut self, path: &str, entry: PathEntry) {
        match self.paths.entry(normalize_path(path)) {
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
            Entry::Occupied(slot) => {
                let existing = slot.into_mut();
                for config in entry.configs {
                    if !existing.configs.contains(&config) {
                        existing.configs.push(config);
                    }
                }
                existing.inherit &= entry.inherit;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathEntry)> {
        self.paths.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<'de> Deserialize<'de> for Sitemap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, SiteMap>::deserialize(deserializer)?;
        let mut sitemap = Sitemap::new();
        for (hostname, site) in raw {
            sitemap.merge_site(&hostname, site);
        }
        Ok(sitemap)
    }
}

impl<'de> Deserialize<'de> for SiteMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, PathEntry>::deserialize(deserializer)?;
        let mut site = SiteMap::new();
        for (path, entry) in raw {
            site.merge_entry(&path, entry);
        }
        Ok(site)
    }
}

/// Canonical form of a path key: leading `/`, no trailing slash, no empty segments.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}
