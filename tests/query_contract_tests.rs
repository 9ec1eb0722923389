//! Integration tests for the content query and pagination contract
//!
//! These tests verify the rules the API endpoints are built on:
//! - Pagination arithmetic (skip/limit, total page counts)
//! - Listing order (most recent first) vs search order (most viewed first)
//! - Featured/trending filtering and caps
//! - Search matching across fields

// ============================================================================
// In-memory catalog model
// ============================================================================

/// A catalog entry reduced to the fields the query contract cares about
#[derive(Debug, Clone, PartialEq)]
struct Entry {
    id: u64,
    title: &'static str,
    content_type: &'static str,
    category: Option<&'static str>,
    description: Option<&'static str>,
    language: Vec<&'static str>,
    views: i64,
    featured: bool,
    created_at: i64,
}

impl Entry {
    fn new(id: u64, title: &'static str, content_type: &'static str, created_at: i64) -> Self {
        Self {
            id,
            title,
            content_type,
            category: None,
            description: None,
            language: Vec::new(),
            views: 0,
            featured: false,
            created_at,
        }
    }

    fn views(mut self, views: i64) -> Self {
        self.views = views;
        self
    }

    fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    fn category(mut self, category: &'static str) -> Self {
        self.category = Some(category);
        self
    }
}

/// The list operation: filter, sort by created_at descending, paginate
fn list(
    entries: &[Entry],
    content_type: Option<&str>,
    page: i64,
    limit: i64,
) -> (Vec<Entry>, i64, i64) {
    let mut matched: Vec<Entry> = entries
        .iter()
        .filter(|e| content_type.is_none_or(|t| e.content_type == t))
        .cloned()
        .collect();
    matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = matched.len() as i64;
    let total_pages = (total + limit - 1) / limit;
    let skip = ((page - 1) * limit) as usize;
    let items = matched.into_iter().skip(skip).take(limit as usize).collect();

    (items, total, total_pages)
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// The search operation: OR across title/category/description/language,
/// sort by views descending, cap at 20
fn search(entries: &[Entry], q: &str) -> Vec<Entry> {
    let mut matched: Vec<Entry> = entries
        .iter()
        .filter(|e| {
            contains_ci(e.title, q)
                || e.category.is_some_and(|c| contains_ci(c, q))
                || e.description.is_some_and(|d| contains_ci(d, q))
                || e.language.iter().any(|l| contains_ci(l, q))
        })
        .cloned()
        .collect();
    matched.sort_by(|a, b| b.views.cmp(&a.views));
    matched.truncate(20);
    matched
}

/// Featured/trending: optional type filter, featured flag only for featured,
/// sort by views descending, cap at 6
fn most_viewed(entries: &[Entry], featured_only: bool, content_type: Option<&str>) -> Vec<Entry> {
    let mut matched: Vec<Entry> = entries
        .iter()
        .filter(|e| !featured_only || e.featured)
        .filter(|e| content_type.is_none_or(|t| e.content_type == t))
        .cloned()
        .collect();
    matched.sort_by(|a, b| b.views.cmp(&a.views));
    matched.truncate(6);
    matched
}

fn catalog(count: u64, content_type: &'static str) -> Vec<Entry> {
    (0..count)
        .map(|i| Entry::new(i, "Item", content_type, i as i64))
        .collect()
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn page_two_of_twelve_movies_returns_ranks_six_through_ten() {
    // 12 movies with distinct creation times; page 2 at limit 5 must return
    // exactly the records ranked 6..=10 by descending created_at.
    let movies = catalog(12, "movie");
    let (items, total, total_pages) = list(&movies, Some("movie"), 2, 5);

    assert_eq!(total, 12);
    assert_eq!(total_pages, 3);
    assert_eq!(items.len(), 5);
    let created: Vec<i64> = items.iter().map(|e| e.created_at).collect();
    assert_eq!(created, vec![6, 5, 4, 3, 2]);
}

#[test]
fn returned_count_never_exceeds_limit() {
    let movies = catalog(12, "movie");
    for (page, limit) in [(1, 5), (2, 5), (3, 5), (1, 100), (2, 7)] {
        let (items, _, _) = list(&movies, None, page, limit);
        assert!(items.len() as i64 <= limit);
    }
}

#[test]
fn page_beyond_total_pages_is_empty_with_unchanged_total() {
    let movies = catalog(12, "movie");
    let (items, total, total_pages) = list(&movies, Some("movie"), 4, 5);

    assert!(items.is_empty());
    assert_eq!(total, 12);
    assert_eq!(total_pages, 3);
}

#[test]
fn total_pages_is_the_ceiling_of_total_over_limit() {
    for (count, limit, expected) in [(12, 5, 3), (10, 5, 2), (1, 5, 1), (0, 5, 0), (50, 50, 1)] {
        let entries = catalog(count, "movie");
        let (_, total, total_pages) = list(&entries, None, 1, limit);
        assert_eq!(total, count as i64);
        assert_eq!(total_pages, expected, "count={count} limit={limit}");
    }
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn listing_is_most_recent_first() {
    let entries = vec![
        Entry::new(1, "Old", "movie", 100),
        Entry::new(2, "New", "movie", 300),
        Entry::new(3, "Middle", "movie", 200),
    ];
    let (items, _, _) = list(&entries, None, 1, 50);

    for pair in items.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
    assert_eq!(items[0].title, "New");
}

#[test]
fn search_is_most_viewed_first() {
    let entries = vec![
        Entry::new(1, "Dark Tower", "movie", 1).views(10),
        Entry::new(2, "Dark Water", "movie", 2).views(500),
        Entry::new(3, "After Dark", "anime", 3).views(250),
    ];
    let results = search(&entries, "dark");

    assert_eq!(results.len(), 3);
    for pair in results.windows(2) {
        assert!(pair[0].views >= pair[1].views);
    }
    assert_eq!(results[0].title, "Dark Water");
}

// ============================================================================
// Search matching
// ============================================================================

#[test]
fn search_matches_any_of_title_category_description_language() {
    let entries = vec![
        Entry::new(1, "Samurai Story", "movie", 1),
        Entry::new(2, "Other", "movie", 2).category("samurai drama"),
        Entry::new(3, "Third", "movie", 3),
        Entry {
            language: vec!["Japanese"],
            ..Entry::new(4, "Fourth", "anime", 4)
        },
    ];

    assert_eq!(search(&entries, "samurai").len(), 2);
    assert_eq!(search(&entries, "SAMURAI").len(), 2, "match is case-insensitive");
    assert_eq!(search(&entries, "japanese").len(), 1);
    assert!(search(&entries, "nothing-matches-this").is_empty());
}

#[test]
fn search_caps_results_at_twenty() {
    let entries = catalog(45, "movie");
    assert_eq!(search(&entries, "item").len(), 20);
}

// ============================================================================
// Featured and trending
// ============================================================================

#[test]
fn featured_returns_only_flagged_records() {
    let entries = vec![
        Entry::new(1, "A", "movie", 1).views(5).featured(),
        Entry::new(2, "B", "movie", 2).views(9),
        Entry::new(3, "C", "anime", 3).views(7).featured(),
    ];

    let picks = most_viewed(&entries, true, None);
    assert_eq!(picks.len(), 2);
    assert!(picks.iter().all(|e| e.featured));

    let anime_picks = most_viewed(&entries, true, Some("anime"));
    assert_eq!(anime_picks.len(), 1);
    assert!(anime_picks.iter().all(|e| e.content_type == "anime"));
}

#[test]
fn trending_ignores_the_featured_flag_and_caps_at_six() {
    let entries: Vec<Entry> = (0..10)
        .map(|i| Entry::new(i, "Item", "movie", i as i64).views(i as i64))
        .collect();

    let picks = most_viewed(&entries, false, None);
    assert_eq!(picks.len(), 6);
    // the six most viewed, best first
    let views: Vec<i64> = picks.iter().map(|e| e.views).collect();
    assert_eq!(views, vec![9, 8, 7, 6, 5, 4]);
}

// ============================================================================
// Mutation rules
// ============================================================================

#[test]
fn deleted_records_stop_resolving() {
    let mut entries = catalog(3, "movie");
    entries.retain(|e| e.id != 1);

    assert!(entries.iter().all(|e| e.id != 1));
    let (items, total, _) = list(&entries, Some("movie"), 1, 50);
    assert_eq!(total, 2);
    assert_eq!(items.len(), 2);
}
