use std::collections::HashSet;
use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::GraphCoordinator;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

struct CachedMatches {
    query: String,
    revision: u64,
    matches: Arc<HashSet<usize>>,
}

/// Fuzzy search highlights over visible nodes, recomputed only when the
/// query or the graph revision changes.
#[derive(Default)]
pub(in crate::app) struct SearchHighlights {
    cached: Option<CachedMatches>,
}

impl SearchHighlights {
    pub fn matches(&mut self, coordinator: &GraphCoordinator, query: &str) -> Arc<HashSet<usize>> {
        let query = query.trim();
        if query.is_empty() {
            return Arc::default();
        }

        if let Some(cached) = &self.cached
            && cached.revision == coordinator.revision()
            && cached.query == query
        {
            return Arc::clone(&cached.matches);
        }

        let Some(model) = coordinator.model() else {
            return Arc::default();
        };
        let visible = coordinator.visible();
        let matcher = SkimMatcherV2::default();
        let matches = visible
            .node_indices()
            .filter(|&node| {
                model
                    .node(node)
                    .is_some_and(|data| fuzzy_match_score(&matcher, &data.name, query).is_some())
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.cached = Some(CachedMatches {
            query: query.to_owned(),
            revision: coordinator.revision(),
            matches: Arc::clone(&matches),
        });
        matches
    }
}
