use tokio::sync::mpsc;
use tracing::debug;
use url::Url;

/// Detects changes of the effective page URL.
///
/// Single-page apps change the URL without a reload, so hosts feed every
/// observed URL through here and only re-resolve on a real change. The full
/// href is compared, so query and fragment changes count too.
#[derive(Debug, Default)]
pub struct UrlWatcher {
    last: Option<String>,
}

impl UrlWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with the URL the page was opened at.
    pub fn starting_at(url: &Url) -> Self {
        Self {
            last: Some(url.as_str().to_string()),
        }
    }

    /// Record `url`; true when it differs from the previous observation.
    pub fn observe(&mut self, url: &Url) -> bool {
        if self.last.as_deref() == Some(url.as_str()) {
            return false;
        }
        debug!(from = ?self.last, to = %url, "url changed");
        self.last = Some(url.as_str().to_string());
        true
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    /// Drain `rx`, invoking `on_change` for every URL that differs from the
    /// previous one. Returns when the sender side closes.
    pub async fn run<F>(mut self, mut rx: mpsc::Receiver<Url>, mut on_change: F)
    where
        F: FnMut(&Url),
    {
        while let Some(url) = rx.recv().await {
            if self.observe(&url) {
                on_change(&url);
            }
        }
        debug!("url watcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn first_observation_is_a_change() {
        let mut w = UrlWatcher::new();
        assert!(w.observe(&url("https://example.com/a")));
        assert!(!w.observe(&url("https://example.com/a")));
        assert_eq!(w.last(), Some("https://example.com/a"));
    }

    #[test]
    fn query_and_fragment_count() {
        let mut w = UrlWatcher::starting_at(&url("https://example.com/watch?v=1"));
        assert!(!w.observe(&url("https://example.com/watch?v=1")));
        assert!(w.observe(&url("https://example.com/watch?v=2")));
        assert!(w.observe(&url("https://example.com/watch?v=2#t=10")));
    }

    #[tokio::test]
    async fn run_reports_only_changes() {
        let (tx, rx) = mpsc::channel(8);
        for s in [
            "https://example.com/a",
            "https://example.com/a",
            "https://example.com/b",
            "https://example.com/a",
        ] {
            tx.send(url(s)).await.unwrap();
        }
        drop(tx);

        let mut seen = Vec::new();
        UrlWatcher::new()
            .run(rx, |u| seen.push(u.path().to_string()))
            .await;
        assert_eq!(seen, vec!["/a", "/b", "/a"]);
    }
}
