//! Feed query - filtering, searching, sorting and paging the post list.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::post::Post;
use super::text::same_tag;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Feed ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first.
    #[default]
    New,
    /// Most viewed first.
    Popular,
    /// Highest trend score first.
    Trending,
}

impl SortOrder {
    fn compare(self, a: &Post, b: &Post) -> Ordering {
        let primary = match self {
            SortOrder::New => b.created_at.cmp(&a.created_at),
            SortOrder::Popular => b.views.cmp(&a.views),
            SortOrder::Trending => b.trend_score.total_cmp(&a.trend_score),
        };
        primary.then_with(|| a.slug.cmp(&b.slug))
    }
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub size: usize,
}

impl Page {
    /// Clamp the page number to at least 1 and the size to `1..=MAX_PAGE_SIZE`.
    pub fn new(number: usize, size: Option<usize>) -> Self {
        Self {
            number: number.max(1),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    fn offset(&self) -> usize {
        (self.number - 1).saturating_mul(self.size)
    }
}

/// Which posts to show and in what order.
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub sort: SortOrder,
    /// A post must carry every one of these tags.
    pub tags: Vec<String>,
    /// Case-insensitive substring over title, description, content and tags.
    pub search: Option<String>,
    /// `None` returns every matching post.
    pub page: Option<Page>,
}

/// Result of running a feed query.
#[derive(Debug, Clone)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    /// Matching posts before paging.
    pub total: usize,
    pub total_pages: usize,
}

impl FeedQuery {
    pub fn run(&self, mut posts: Vec<Post>, now: DateTime<Utc>) -> FeedPage {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        posts.retain(|post| {
            self.tags.iter().all(|tag| post.has_tag(tag))
                && needle.as_deref().is_none_or(|n| matches_search(post, n))
        });
        for post in &mut posts {
            post.refresh_derived(now);
        }
        posts.sort_by(|a, b| self.sort.compare(a, b));

        let total = posts.len();
        match self.page {
            None => FeedPage {
                posts,
                total,
                total_pages: usize::from(total > 0),
            },
            Some(page) => FeedPage {
                posts: posts
                    .into_iter()
                    .skip(page.offset())
                    .take(page.size)
                    .collect(),
                total,
                total_pages: total.div_ceil(page.size),
            },
        }
    }
}

fn matches_search(post: &Post, needle: &str) -> bool {
    post.title.to_lowercase().contains(needle)
        || post.description.to_lowercase().contains(needle)
        || post.content.to_lowercase().contains(needle)
        || post.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

/// How many posts carry a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Count tags across posts, grouping case-insensitively under the first
/// spelling seen. Sorted by count descending, then by tag.
pub fn tag_counts(posts: &[Post]) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = Vec::new();
    for tag in posts.iter().flat_map(|p| p.tags.iter()) {
        match counts.iter_mut().find(|c| same_tag(&c.tag, tag)) {
            Some(entry) => entry.count += 1,
            None => counts.push(TagCount {
                tag: tag.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewPost;
    use chrono::TimeDelta;

    fn post(title: &str, tags: &[&str], age_days: i64, views: u64, now: DateTime<Utc>) -> Post {
        let mut post = Post::new(
            NewPost {
                title: title.to_string(),
                content: format!("Body of {title}"),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            },
            now - TimeDelta::days(age_days),
        )
        .unwrap();
        post.views = views;
        post
    }

    fn fixture(now: DateTime<Utc>) -> Vec<Post> {
        vec![
            post("Old Classic", &["rust"], 60, 600, now),
            post("Fresh Take", &["rust", "web"], 1, 30, now),
            post("Middle Ground", &["web"], 10, 100, now),
        ]
    }

    fn slugs(page: &FeedPage) -> Vec<&str> {
        page.posts.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_sort_new() {
        let now = Utc::now();
        let page = FeedQuery::default().run(fixture(now), now);
        assert_eq!(
            slugs(&page),
            vec!["fresh-take", "middle-ground", "old-classic"]
        );
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_sort_popular_and_trending() {
        let now = Utc::now();
        let popular = FeedQuery {
            sort: SortOrder::Popular,
            ..Default::default()
        }
        .run(fixture(now), now);
        assert_eq!(
            slugs(&popular),
            vec!["old-classic", "middle-ground", "fresh-take"]
        );

        // fresh: 30*1.5/1 = 45, middle: 100/10 = 10, old: 600/60 = 10 -> tie on slug
        let trending = FeedQuery {
            sort: SortOrder::Trending,
            ..Default::default()
        }
        .run(fixture(now), now);
        assert_eq!(
            slugs(&trending),
            vec!["fresh-take", "middle-ground", "old-classic"]
        );
        assert!((trending.posts[0].trend_score - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_tag_filter_requires_all_tags() {
        let now = Utc::now();
        let page = FeedQuery {
            tags: vec!["RUST".into(), "web".into()],
            ..Default::default()
        }
        .run(fixture(now), now);
        assert_eq!(slugs(&page), vec!["fresh-take"]);
    }

    #[test]
    fn test_tag_filter_and_counts_fold_non_ascii_case() {
        let now = Utc::now();
        let posts = vec![
            post("Kahve", &["Türkçe"], 1, 0, now),
            post("Çay", &["TÜRKÇE", "içecek"], 2, 0, now),
        ];

        let page = FeedQuery {
            tags: vec!["türkçe".into()],
            ..Default::default()
        }
        .run(posts.clone(), now);
        assert_eq!(page.total, 2);

        assert_eq!(
            tag_counts(&posts),
            vec![
                TagCount {
                    tag: "Türkçe".into(),
                    count: 2
                },
                TagCount {
                    tag: "içecek".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_search() {
        let now = Utc::now();
        let page = FeedQuery {
            search: Some("  CLASSIC ".into()),
            ..Default::default()
        }
        .run(fixture(now), now);
        assert_eq!(slugs(&page), vec!["old-classic"]);

        let by_tag = FeedQuery {
            search: Some("we".into()),
            ..Default::default()
        }
        .run(fixture(now), now);
        assert_eq!(by_tag.total, 2);

        let blank = FeedQuery {
            search: Some("   ".into()),
            ..Default::default()
        }
        .run(fixture(now), now);
        assert_eq!(blank.total, 3);
    }

    #[test]
    fn test_paging() {
        let now = Utc::now();
        let page = FeedQuery {
            page: Some(Page::new(2, Some(2))),
            ..Default::default()
        }
        .run(fixture(now), now);
        assert_eq!(slugs(&page), vec!["old-classic"]);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);

        let beyond = FeedQuery {
            page: Some(Page::new(9, Some(2))),
            ..Default::default()
        }
        .run(fixture(now), now);
        assert!(beyond.posts.is_empty());
        assert_eq!(beyond.total, 3);
    }

    #[test]
    fn test_page_clamping() {
        assert_eq!(Page::new(0, None), Page { number: 1, size: 10 });
        assert_eq!(Page::new(3, Some(0)).size, 1);
        assert_eq!(Page::new(3, Some(1000)).size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_empty_feed() {
        let page = FeedQuery::default().run(Vec::new(), Utc::now());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_tag_counts() {
        let now = Utc::now();
        let mut posts = fixture(now);
        posts.push(post("Another", &["Rust", "cli"], 2, 0, now));

        let counts = tag_counts(&posts);
        assert_eq!(
            counts,
            vec![
                TagCount {
                    tag: "rust".into(),
                    count: 3
                },
                TagCount {
                    tag: "web".into(),
                    count: 2
                },
                TagCount {
                    tag: "cli".into(),
                    count: 1
                },
            ]
        );
    }
}
