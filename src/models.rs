use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub object_id: String,
    pub title: String,
    pub url: String,
    pub author: String,
    pub num_comments: i32,
    pub points: i32,
}

/// Everything fetched so far for one search term: the concatenated hits of
/// all pages, in fetch order, plus the last page number fetched.
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    pub hits: Vec<Hit>,
    pub page: u32,
}

/// In-memory cache of results keyed by search term. Hit lists only grow by
/// append (load-more), get replaced wholesale (fresh page-0 fetch), or shrink
/// by explicit dismiss; ordering is applied at render time, never in storage.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: HashMap<String, PageResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self {
            results: HashMap::new(),
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.results.contains_key(term)
    }

    pub fn get(&self, term: &str) -> Option<&PageResult> {
        self.results.get(term)
    }

    /// Folds a freshly fetched page into the entry for `term`. Page 0 starts
    /// the entry over; later pages append after the existing hits, duplicates
    /// across pages not filtered. Other terms' entries are untouched.
    pub fn merge(&mut self, term: &str, new_hits: Vec<Hit>, page: u32) {
        let entry = self.results.entry(term.to_string()).or_default();
        if page == 0 {
            entry.hits = new_hits;
        } else {
            entry.hits.extend(new_hits);
        }
        entry.page = page;
    }

    /// Removes the hit with the given id from `term`'s list. No-op if the
    /// term or the id is unknown; the stored page number is kept.
    pub fn dismiss(&mut self, term: &str, object_id: &str) {
        if let Some(entry) = self.results.get_mut(term) {
            entry.hits.retain(|hit| hit.object_id != object_id);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    None,
    Title,
    Author,
    Comments,
    Points,
}

/// Current table ordering. Re-selecting the active key flips the direction;
/// picking a different key starts forward again. Never reset implicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortState {
    pub key: SortKey,
    pub reverse: bool,
}

impl SortState {
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.reverse = !self.reverse;
        } else {
            self.key = key;
            self.reverse = false;
        }
    }
}

/// Render-time ordering of the stored hits. Title/author sort ascending,
/// comment and point counts descending; ties keep their stored relative
/// order (stable sort). The reverse flag flips the produced order wholesale.
pub fn sorted_hits(hits: &[Hit], sort: SortState) -> Vec<Hit> {
    let mut ordered = hits.to_vec();
    match sort.key {
        SortKey::None => {}
        SortKey::Title => ordered.sort_by(|a, b| a.title.cmp(&b.title)),
        SortKey::Author => ordered.sort_by(|a, b| a.author.cmp(&b.author)),
        SortKey::Comments => ordered.sort_by(|a, b| b.num_comments.cmp(&a.num_comments)),
        SortKey::Points => ordered.sort_by(|a, b| b.points.cmp(&a.points)),
    }
    if sort.reverse {
        ordered.reverse();
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, title: &str, author: &str, comments: i32, points: i32) -> Hit {
        Hit {
            object_id: id.to_string(),
            title: title.to_string(),
            url: format!("https://example.com/{id}"),
            author: author.to_string(),
            num_comments: comments,
            points,
        }
    }

    #[test]
    fn merge_appends_later_pages() {
        let mut store = ResultStore::new();
        let h1 = hit("1", "a", "x", 0, 10);
        let h2 = hit("2", "b", "y", 0, 20);
        let h3 = hit("3", "c", "z", 0, 30);

        store.merge("redux", vec![h1.clone(), h2.clone()], 0);
        store.merge("redux", vec![h3.clone()], 1);

        let entry = store.get("redux").unwrap();
        assert_eq!(entry.hits, vec![h1, h2, h3]);
        assert_eq!(entry.page, 1);
    }

    #[test]
    fn merge_page_zero_replaces_existing_entry() {
        let mut store = ResultStore::new();
        store.merge("rust", vec![hit("1", "old", "x", 0, 1)], 0);
        store.merge("rust", vec![hit("1", "old", "x", 0, 1)], 1);

        let fresh = hit("2", "new", "y", 0, 2);
        store.merge("rust", vec![fresh.clone()], 0);

        let entry = store.get("rust").unwrap();
        assert_eq!(entry.hits, vec![fresh]);
        assert_eq!(entry.page, 0);
    }

    #[test]
    fn merge_starts_empty_for_unknown_term() {
        let mut store = ResultStore::new();
        assert!(!store.contains("redux"));

        store.merge("redux", vec![hit("1", "a", "x", 0, 1)], 0);

        assert!(store.contains("redux"));
        assert_eq!(store.get("redux").unwrap().hits.len(), 1);
    }

    #[test]
    fn merge_leaves_other_terms_untouched() {
        let mut store = ResultStore::new();
        store.merge("redux", vec![hit("1", "a", "x", 0, 1)], 0);
        store.merge("rust", vec![hit("2", "b", "y", 0, 2)], 0);

        store.merge("rust", vec![hit("3", "c", "z", 0, 3)], 1);

        assert_eq!(store.get("redux").unwrap().hits.len(), 1);
        assert_eq!(store.get("redux").unwrap().page, 0);
    }

    #[test]
    fn dismiss_removes_exactly_one_record_by_id() {
        let mut store = ResultStore::new();
        store.merge(
            "redux",
            vec![
                hit("1", "a", "x", 0, 1),
                hit("2", "b", "y", 0, 2),
                hit("3", "c", "z", 0, 3),
            ],
            0,
        );
        store.merge("other", vec![hit("2", "b", "y", 0, 2)], 0);

        store.dismiss("redux", "2");

        let entry = store.get("redux").unwrap();
        let ids: Vec<&str> = entry.hits.iter().map(|h| h.object_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(entry.page, 0);
        // the same id under another term survives
        assert_eq!(store.get("other").unwrap().hits.len(), 1);
    }

    #[test]
    fn dismiss_unknown_id_or_term_is_a_noop() {
        let mut store = ResultStore::new();
        store.merge("redux", vec![hit("1", "a", "x", 0, 1)], 0);

        store.dismiss("redux", "nope");
        store.dismiss("missing", "1");

        assert_eq!(store.get("redux").unwrap().hits.len(), 1);
    }

    #[test]
    fn cached_term_needs_no_fetch() {
        let mut store = ResultStore::new();
        store.merge("redux", vec![hit("1", "a", "x", 0, 1)], 0);

        // submit short-circuits on this, issuing zero network calls
        assert!(store.contains("redux"));
        assert!(!store.contains("react"));
    }

    #[test]
    fn points_sort_descends_and_toggles() {
        let hits = vec![
            hit("1", "a", "x", 0, 10),
            hit("2", "b", "y", 0, 30),
            hit("3", "c", "z", 0, 20),
        ];
        let mut sort = SortState::default();

        sort.select(SortKey::Points);
        let down: Vec<i32> = sorted_hits(&hits, sort).iter().map(|h| h.points).collect();
        assert_eq!(down, vec![30, 20, 10]);

        sort.select(SortKey::Points);
        let up: Vec<i32> = sorted_hits(&hits, sort).iter().map(|h| h.points).collect();
        assert_eq!(up, vec![10, 20, 30]);

        // third selection of the same key is forward again
        sort.select(SortKey::Points);
        assert!(!sort.reverse);
        let again: Vec<i32> = sorted_hits(&hits, sort).iter().map(|h| h.points).collect();
        assert_eq!(again, vec![30, 20, 10]);
    }

    #[test]
    fn points_sort_is_stable_for_ties() {
        let hits = vec![
            hit("1", "first", "x", 0, 50),
            hit("2", "second", "y", 0, 50),
            hit("3", "third", "z", 0, 99),
            hit("4", "fourth", "w", 0, 50),
        ];
        let sort = SortState {
            key: SortKey::Points,
            reverse: false,
        };

        let sorted = sorted_hits(&hits, sort);
        let ids: Vec<&str> = sorted
            .iter()
            .map(|h| h.object_id.as_str())
            .collect();
        // tied hits keep their pre-sort relative order after the leader
        assert_eq!(ids, vec!["3", "1", "2", "4"]);
    }

    #[test]
    fn title_and_author_sort_ascend() {
        let hits = vec![
            hit("1", "zebra", "carol", 0, 1),
            hit("2", "apple", "alice", 0, 2),
            hit("3", "mango", "bob", 0, 3),
        ];

        let by_title = sorted_hits(
            &hits,
            SortState {
                key: SortKey::Title,
                reverse: false,
            },
        );
        let titles: Vec<&str> = by_title.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["apple", "mango", "zebra"]);

        let by_author = sorted_hits(
            &hits,
            SortState {
                key: SortKey::Author,
                reverse: false,
            },
        );
        let authors: Vec<&str> = by_author.iter().map(|h| h.author.as_str()).collect();
        assert_eq!(authors, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn comments_sort_descends() {
        let hits = vec![
            hit("1", "a", "x", 5, 0),
            hit("2", "b", "y", 40, 0),
            hit("3", "c", "z", 12, 0),
        ];
        let sort = SortState {
            key: SortKey::Comments,
            reverse: false,
        };

        let counts: Vec<i32> = sorted_hits(&hits, sort)
            .iter()
            .map(|h| h.num_comments)
            .collect();
        assert_eq!(counts, vec![40, 12, 5]);
    }

    #[test]
    fn none_sort_keeps_insertion_order() {
        let hits = vec![
            hit("1", "zebra", "z", 9, 9),
            hit("2", "apple", "a", 1, 1),
        ];

        let same = sorted_hits(&hits, SortState::default());
        assert_eq!(same, hits);

        let reversed = sorted_hits(
            &hits,
            SortState {
                key: SortKey::None,
                reverse: true,
            },
        );
        let ids: Vec<&str> = reversed.iter().map(|h| h.object_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }
}
