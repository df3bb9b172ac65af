//! Session controller implementation

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Category};
use crate::source::TemplateSource;
use crate::substitute::{ResolvedQuery, substitute};
use crate::templates::{DorkTemplate, TemplateLoader};

use super::episode::{Episode, LoadPhase, Outcome, ResolvedSet, SessionError};

/// Internal state protected by mutex
#[derive(Default)]
struct SessionInner {
    /// Public view of the episode
    episode: Episode,

    /// Templates backing `episode.resolved`, kept for local re-substitution
    templates: Option<Vec<DorkTemplate>>,
}

/// Owns the selection episode and drives loading, substitution and filtering.
///
/// Each load is tagged with a sequence number when issued. When the fetch
/// settles the result is applied only if no newer load has been issued since;
/// otherwise it is dropped. The mutex is never held across a fetch.
pub struct SessionController {
    catalog: Catalog,
    loader: TemplateLoader,
    inner: Mutex<SessionInner>,
}

impl SessionController {
    /// Create a controller over a catalog and template source
    pub fn new(catalog: Catalog, source: Arc<dyn TemplateSource>) -> Self {
        debug!(categories = catalog.len(), source = %source.describe(), "SessionController::new: called");
        Self {
            catalog,
            loader: TemplateLoader::new(source),
            inner: Mutex::new(SessionInner::default()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Owned copy of the current episode
    pub async fn snapshot(&self) -> Episode {
        self.inner.lock().await.episode.clone()
    }

    /// Resolved queries after the filter keyword is applied
    pub async fn visible(&self) -> Vec<ResolvedQuery> {
        self.inner.lock().await.episode.visible()
    }

    /// Select a category by id
    ///
    /// Returns `NeedsSubject` without touching state when the category requires
    /// a subject and none has been entered. Otherwise loads and resolves it.
    pub async fn select(&self, id: &str) -> Result<Outcome, SessionError> {
        debug!(%id, "SessionController::select: called");
        let category = *self
            .catalog
            .get(id)
            .ok_or_else(|| SessionError::UnknownCategory(id.to_string()))?;

        {
            let inner = self.inner.lock().await;
            if category.requires_input && inner.episode.subject.trim().is_empty() {
                debug!(%id, "SessionController::select: subject required");
                return Ok(Outcome::NeedsSubject);
            }
        }

        Ok(self.load(category).await)
    }

    /// Update the subject
    ///
    /// With an active category and a non-empty subject: in `Resolved` the
    /// loaded templates are re-substituted locally, in `Error` the load is
    /// re-issued, and in `Loading` the in-flight load picks up the new subject
    /// when it settles. A blank subject is stored but never applied: a load in
    /// flight resolves with the subject it was issued with.
    pub async fn set_subject(&self, subject: &str) -> Outcome {
        debug!(subject_len = subject.len(), "SessionController::set_subject: called");
        let category = {
            let mut inner = self.inner.lock().await;
            inner.episode.subject = subject.to_string();

            let Some(category) = inner.episode.category else {
                debug!("SessionController::set_subject: no active category");
                return Outcome::Ignored;
            };
            if subject.trim().is_empty() {
                debug!("SessionController::set_subject: blank subject, keeping current results");
                return Outcome::Ignored;
            }

            let phase = inner.episode.phase;
            match phase {
                LoadPhase::Idle | LoadPhase::Loading => {
                    debug!(%phase, "SessionController::set_subject: nothing to recompute");
                    return Outcome::Ignored;
                }
                LoadPhase::Resolved => {
                    let Some(templates) = inner.templates.as_ref() else {
                        debug!("SessionController::set_subject: resolved without templates");
                        return Outcome::Ignored;
                    };
                    let queries = substitute(templates, subject);
                    if let Some(set) = inner.episode.resolved.as_mut() {
                        set.subject = subject.to_string();
                        set.queries = queries;
                    }
                    debug!("SessionController::set_subject: re-substituted locally");
                    return Outcome::Resubstituted;
                }
                LoadPhase::Error => category,
            }
        };

        debug!(category = %category.id, "SessionController::set_subject: reloading after error");
        self.load(category).await
    }

    /// Re-issue the last load; only meaningful from `Error`
    ///
    /// Returns `NeedsSubject` when the category requires a subject and it has
    /// since been cleared.
    pub async fn retry(&self) -> Outcome {
        debug!("SessionController::retry: called");
        let category = {
            let inner = self.inner.lock().await;
            match (inner.episode.phase, inner.episode.category) {
                (LoadPhase::Error, Some(category)) => {
                    if category.requires_input && inner.episode.subject.trim().is_empty() {
                        debug!(category = %category.id, "SessionController::retry: subject required");
                        return Outcome::NeedsSubject;
                    }
                    category
                }
                (phase, _) => {
                    debug!(%phase, "SessionController::retry: not in error state");
                    return Outcome::Ignored;
                }
            }
        };

        self.load(category).await
    }

    /// Set the filter keyword (does not affect the load state)
    pub async fn set_filter(&self, keyword: &str) {
        debug!(%keyword, "SessionController::set_filter: called");
        self.inner.lock().await.episode.keyword = keyword.to_string();
    }

    pub async fn clear_filter(&self) {
        debug!("SessionController::clear_filter: called");
        self.inner.lock().await.episode.keyword.clear();
    }

    /// Return to `Idle`, dropping any in-flight load
    pub async fn reset(&self) {
        debug!("SessionController::reset: called");
        let mut inner = self.inner.lock().await;
        let seq = inner.episode.seq + 1;
        *inner = SessionInner {
            episode: Episode {
                seq,
                ..Default::default()
            },
            templates: None,
        };
    }

    /// Issue a load for `category` and apply it if still current when it settles
    async fn load(&self, category: Category) -> Outcome {
        let (seq, issued_subject) = {
            let mut inner = self.inner.lock().await;
            inner.episode.seq += 1;
            inner.episode.category = Some(category);
            inner.episode.phase = LoadPhase::Loading;
            inner.episode.resolved = None;
            inner.episode.error = None;
            inner.templates = None;
            (inner.episode.seq, inner.episode.subject.clone())
        };
        debug!(category = %category.id, %seq, "SessionController::load: issued");

        let result = self.loader.load(category.source_id).await;

        let mut inner = self.inner.lock().await;
        if inner.episode.seq != seq {
            debug!(
                category = %category.id,
                %seq,
                latest = inner.episode.seq,
                "SessionController::load: superseded, dropping result"
            );
            return Outcome::Superseded;
        }

        match result {
            Ok(templates) => {
                // A subject blanked mid-load is not applied
                let subject = if inner.episode.subject.trim().is_empty() {
                    issued_subject
                } else {
                    inner.episode.subject.clone()
                };
                let queries = substitute(&templates, &subject);
                info!(category = %category.id, count = queries.len(), "Resolved category");
                inner.episode.resolved = Some(ResolvedSet {
                    category,
                    subject,
                    queries,
                    loaded_at: Utc::now(),
                });
                inner.episode.phase = LoadPhase::Resolved;
                inner.templates = Some(templates);
            }
            Err(e) => {
                warn!(category = %category.id, error = %e, "Failed to load category");
                inner.episode.error = Some(e);
                inner.episode.phase = LoadPhase::Error;
            }
        }
        Outcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DEFAULT_PROMPT;
    use crate::source::FetchError;
    use crate::source::fetch::mock::MockSource;
    use crate::templates::LoadError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static TABLE: &[Category] = &[
        Category {
            id: "alpha",
            name: "Alpha",
            source_id: "alpha.json",
            icon: "a",
            prompt: "Enter website...",
            requires_input: true,
        },
        Category {
            id: "beta",
            name: "Beta",
            source_id: "beta.json",
            icon: "b",
            prompt: "Enter name...",
            requires_input: true,
        },
        Category {
            id: "open",
            name: "Open",
            source_id: "open.json",
            icon: "o",
            prompt: DEFAULT_PROMPT,
            requires_input: false,
        },
        Category {
            id: "broken",
            name: "Broken",
            source_id: "broken.json",
            icon: "x",
            prompt: DEFAULT_PROMPT,
            requires_input: false,
        },
    ];

    const ALPHA: &str = r#"[
        {"label": "Exposed index", "query": "intitle:\"index of\" site:{input}", "description": "listings"},
        {"label": "Login", "query": "site:{input} inurl:login", "description": "login forms"}
    ]"#;
    const BETA: &str = r#"[{"label": "Profile", "query": "\"{input}\" inurl:profile", "description": "profiles"}]"#;
    const OPEN: &str = r#"[{"label": "Anything", "query": "site:{input}", "description": "all"}]"#;

    fn mock() -> MockSource {
        MockSource::new()
            .with_payload("alpha.json", ALPHA)
            .with_payload("beta.json", BETA)
            .with_payload("open.json", OPEN)
            .with_payload("broken.json", "[]")
    }

    fn controller(source: Arc<MockSource>) -> SessionController {
        SessionController::new(Catalog::new(TABLE), source)
    }

    async fn wait_for_calls(source: &MockSource, n: usize) {
        while source.call_count() < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_select_requires_subject() {
        let source = Arc::new(mock());
        let ctl = controller(source.clone());

        assert_eq!(ctl.select("alpha").await.unwrap(), Outcome::NeedsSubject);
        assert_eq!(ctl.snapshot().await, Episode::default());
        assert_eq!(source.call_count(), 0);

        // Whitespace does not count as a subject
        ctl.set_subject("   ").await;
        assert_eq!(ctl.select("alpha").await.unwrap(), Outcome::NeedsSubject);
        assert_eq!(ctl.snapshot().await.phase, LoadPhase::Idle);
    }

    #[tokio::test]
    async fn test_select_resolves_with_subject() {
        let source = Arc::new(mock());
        let ctl = controller(source.clone());

        assert_eq!(ctl.set_subject("example.com").await, Outcome::Ignored);
        assert_eq!(ctl.select("alpha").await.unwrap(), Outcome::Applied);

        let episode = ctl.snapshot().await;
        assert_eq!(episode.phase, LoadPhase::Resolved);
        assert_eq!(episode.category.unwrap().id, "alpha");
        assert_eq!(episode.prompt(), "Enter website...");
        let set = episode.resolved.unwrap();
        assert_eq!(set.category.id, "alpha");
        assert_eq!(set.subject, "example.com");
        assert_eq!(set.queries[0].query, r#"intitle:"index of" site:example.com"#);
        assert_eq!(set.queries[1].query, "site:example.com inurl:login");
        assert!(episode.error.is_none());
    }

    #[tokio::test]
    async fn test_select_without_required_subject_leaves_placeholder() {
        let ctl = controller(Arc::new(mock()));

        assert_eq!(ctl.select("open").await.unwrap(), Outcome::Applied);
        let visible = ctl.visible().await;
        assert_eq!(visible[0].query, "site:{input}");
    }

    #[tokio::test]
    async fn test_unknown_category() {
        let ctl = controller(Arc::new(mock()));
        assert_eq!(
            ctl.select("gamma").await,
            Err(SessionError::UnknownCategory("gamma".to_string()))
        );
    }

    #[tokio::test]
    async fn test_load_error_captured() {
        let ctl = controller(Arc::new(mock()));

        assert_eq!(ctl.select("broken").await.unwrap(), Outcome::Applied);
        let episode = ctl.snapshot().await;
        assert_eq!(episode.phase, LoadPhase::Error);
        assert_eq!(
            episode.error,
            Some(LoadError::EmptyCatalog {
                source_id: "broken.json".to_string()
            })
        );
        assert!(episode.resolved.is_none());
        assert!(episode.visible().is_empty());
    }

    #[tokio::test]
    async fn test_error_discards_previous_results() {
        let ctl = controller(Arc::new(mock()));
        ctl.set_subject("example.com").await;

        ctl.select("alpha").await.unwrap();
        assert!(ctl.snapshot().await.resolved.is_some());

        ctl.select("broken").await.unwrap();
        let episode = ctl.snapshot().await;
        assert_eq!(episode.phase, LoadPhase::Error);
        assert!(episode.resolved.is_none());
        assert_eq!(episode.category.unwrap().id, "broken");
    }

    #[tokio::test]
    async fn test_subject_change_resubstitutes_without_fetch() {
        let source = Arc::new(mock());
        let ctl = controller(source.clone());
        ctl.set_subject("example.com").await;
        ctl.select("alpha").await.unwrap();
        assert_eq!(source.call_count(), 1);

        assert_eq!(ctl.set_subject("acme.org").await, Outcome::Resubstituted);
        assert_eq!(source.call_count(), 1);

        let set = ctl.snapshot().await.resolved.unwrap();
        assert_eq!(set.subject, "acme.org");
        assert_eq!(set.queries[1].query, "site:acme.org inurl:login");
    }

    #[tokio::test]
    async fn test_blank_subject_keeps_results() {
        let ctl = controller(Arc::new(mock()));
        ctl.set_subject("example.com").await;
        ctl.select("alpha").await.unwrap();

        assert_eq!(ctl.set_subject("").await, Outcome::Ignored);
        let episode = ctl.snapshot().await;
        assert_eq!(episode.subject, "");
        assert_eq!(episode.phase, LoadPhase::Resolved);
        // The result set still names the subject it was resolved for
        assert_eq!(episode.resolved.unwrap().subject, "example.com");
    }

    #[tokio::test]
    async fn test_subject_change_in_error_reloads() {
        let source = Arc::new(mock().with_error("alpha.json", FetchError::Transport("reset".to_string())));
        let ctl = controller(source.clone());
        ctl.set_subject("example.com").await;
        ctl.select("alpha").await.unwrap();
        assert_eq!(ctl.snapshot().await.phase, LoadPhase::Error);

        assert_eq!(ctl.set_subject("acme.org").await, Outcome::Applied);
        assert_eq!(source.call_count(), 2);
        assert_eq!(source.calls(), vec!["alpha.json", "alpha.json"]);
    }

    #[tokio::test]
    async fn test_retry_only_from_error() {
        let source = Arc::new(mock());
        let ctl = controller(source.clone());

        assert_eq!(ctl.retry().await, Outcome::Ignored);

        ctl.set_subject("example.com").await;
        ctl.select("alpha").await.unwrap();
        assert_eq!(ctl.retry().await, Outcome::Ignored);
        assert_eq!(source.call_count(), 1);

        ctl.select("broken").await.unwrap();
        assert_eq!(ctl.retry().await, Outcome::Applied);
        assert_eq!(source.calls(), vec!["alpha.json", "broken.json", "broken.json"]);
    }

    /// Fails the first fetch, then serves the payload
    struct FlakySource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TemplateSource for FlakySource {
        async fn fetch(&self, _source_id: &str) -> Result<String, FetchError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(FetchError::Status {
                    status: 503,
                    source_id: "alpha.json".to_string(),
                })
            } else {
                Ok(ALPHA.to_string())
            }
        }

        fn describe(&self) -> String {
            "flaky".to_string()
        }
    }

    #[tokio::test]
    async fn test_retry_recovers() {
        let source = Arc::new(FlakySource {
            calls: AtomicUsize::new(0),
        });
        let ctl = SessionController::new(Catalog::new(TABLE), source);
        ctl.set_subject("example.com").await;

        ctl.select("alpha").await.unwrap();
        let episode = ctl.snapshot().await;
        assert_eq!(episode.phase, LoadPhase::Error);
        assert_eq!(episode.error.unwrap().kind(), "source-unavailable");

        assert_eq!(ctl.retry().await, Outcome::Applied);
        let episode = ctl.snapshot().await;
        assert_eq!(episode.phase, LoadPhase::Resolved);
        assert!(episode.error.is_none());
        assert_eq!(episode.resolved.unwrap().queries.len(), 2);
    }

    #[tokio::test]
    async fn test_stale_load_is_discarded() {
        let mut source = mock();
        let gate_alpha = source.gate("alpha.json");
        let source = Arc::new(source);
        let ctl = Arc::new(controller(source.clone()));
        ctl.set_subject("example.com").await;

        // L1 for alpha blocks in the fetch
        let l1 = {
            let ctl = ctl.clone();
            tokio::spawn(async move { ctl.select("alpha").await })
        };
        wait_for_calls(&source, 1).await;
        assert_eq!(ctl.snapshot().await.phase, LoadPhase::Loading);

        // L2 for beta settles first
        assert_eq!(ctl.select("beta").await.unwrap(), Outcome::Applied);

        // L1 settles last and must not win
        gate_alpha.notify_one();
        assert_eq!(l1.await.unwrap().unwrap(), Outcome::Superseded);

        let episode = ctl.snapshot().await;
        assert_eq!(episode.phase, LoadPhase::Resolved);
        assert_eq!(episode.category.unwrap().id, "beta");
        let set = episode.resolved.unwrap();
        assert_eq!(set.category.id, "beta");
        assert_eq!(set.queries[0].query, r#""example.com" inurl:profile"#);
        assert_eq!(episode.seq, 2);
    }

    #[tokio::test]
    async fn test_subject_change_while_loading_applies_latest() {
        let mut source = mock();
        let gate_alpha = source.gate("alpha.json");
        let source = Arc::new(source);
        let ctl = Arc::new(controller(source.clone()));
        ctl.set_subject("example.com").await;

        let load = {
            let ctl = ctl.clone();
            tokio::spawn(async move { ctl.select("alpha").await })
        };
        wait_for_calls(&source, 1).await;

        assert_eq!(ctl.set_subject("acme.org").await, Outcome::Ignored);
        gate_alpha.notify_one();
        assert_eq!(load.await.unwrap().unwrap(), Outcome::Applied);

        let set = ctl.snapshot().await.resolved.unwrap();
        assert_eq!(set.subject, "acme.org");
        assert_eq!(set.queries[1].query, "site:acme.org inurl:login");
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_subject_while_loading_keeps_issued_subject() {
        let mut source = mock();
        let gate_alpha = source.gate("alpha.json");
        let source = Arc::new(source);
        let ctl = Arc::new(controller(source.clone()));
        ctl.set_subject("example.com").await;

        let load = {
            let ctl = ctl.clone();
            tokio::spawn(async move { ctl.select("alpha").await })
        };
        wait_for_calls(&source, 1).await;

        assert_eq!(ctl.set_subject("").await, Outcome::Ignored);
        gate_alpha.notify_one();
        assert_eq!(load.await.unwrap().unwrap(), Outcome::Applied);

        let episode = ctl.snapshot().await;
        assert_eq!(episode.phase, LoadPhase::Resolved);
        assert_eq!(episode.subject, "");
        let set = episode.resolved.unwrap();
        assert!(set.category.requires_input);
        assert_eq!(set.subject, "example.com");
        assert_eq!(set.queries[1].query, "site:example.com inurl:login");
        assert!(set.queries.iter().all(|q| !q.has_placeholder()));
    }

    #[tokio::test]
    async fn test_retry_with_cleared_subject_needs_subject() {
        let source = Arc::new(mock().with_error("alpha.json", FetchError::Transport("reset".to_string())));
        let ctl = controller(source.clone());
        ctl.set_subject("example.com").await;
        ctl.select("alpha").await.unwrap();
        assert_eq!(ctl.snapshot().await.phase, LoadPhase::Error);

        assert_eq!(ctl.set_subject("  ").await, Outcome::Ignored);
        assert_eq!(ctl.retry().await, Outcome::NeedsSubject);
        assert_eq!(ctl.snapshot().await.phase, LoadPhase::Error);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_reset_supersedes_in_flight() {
        let mut source = mock();
        let gate_alpha = source.gate("alpha.json");
        let source = Arc::new(source);
        let ctl = Arc::new(controller(source.clone()));
        ctl.set_subject("example.com").await;

        let load = {
            let ctl = ctl.clone();
            tokio::spawn(async move { ctl.select("alpha").await })
        };
        wait_for_calls(&source, 1).await;

        ctl.reset().await;
        gate_alpha.notify_one();
        assert_eq!(load.await.unwrap().unwrap(), Outcome::Superseded);

        let episode = ctl.snapshot().await;
        assert_eq!(episode.phase, LoadPhase::Idle);
        assert!(episode.category.is_none());
        assert!(episode.resolved.is_none());
    }

    #[tokio::test]
    async fn test_filter_does_not_touch_load_state() {
        let source = Arc::new(mock());
        let ctl = controller(source.clone());
        ctl.set_subject("example.com").await;
        ctl.select("alpha").await.unwrap();

        ctl.set_filter("LOGIN").await;
        let visible = ctl.visible().await;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].label, "Login");

        let episode = ctl.snapshot().await;
        assert_eq!(episode.phase, LoadPhase::Resolved);
        assert_eq!(episode.resolved.unwrap().queries.len(), 2);

        ctl.clear_filter().await;
        assert_eq!(ctl.visible().await.len(), 2);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_filter_survives_resubstitution() {
        let ctl = controller(Arc::new(mock()));
        ctl.set_subject("example.com").await;
        ctl.select("alpha").await.unwrap();
        ctl.set_filter("acme").await;
        assert!(ctl.visible().await.is_empty());

        ctl.set_subject("acme.org").await;
        assert_eq!(ctl.visible().await.len(), 2);
    }
}
