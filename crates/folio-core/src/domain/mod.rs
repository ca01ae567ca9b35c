//! Domain entities and pure logic - the core business objects.

mod admin;
mod feed;
mod post;
mod text;
mod trend;

pub use admin::{
    AdminAccount, AdminProfile, DEFAULT_NICKNAME, DEFAULT_PROFILE_AVATAR, ProfilePatch, Role,
};
pub use feed::{FeedPage, FeedQuery, Page, SortOrder, TagCount, tag_counts};
pub use post::{Author, DEFAULT_AUTHOR_AVATAR, DEFAULT_AUTHOR_NAME, NewPost, Post, PostPatch};
pub use text::{normalize_cover_image, normalize_tags, read_time_minutes, slugify};
pub use trend::{RECENCY_BONUS, RECENCY_WINDOW_DAYS, trend_score};
