//! Domain entities - the core business objects.

mod category;
mod comment;
mod post;
mod schema;
mod user;

pub use category::CategorySummary;
pub use comment::{Comment, NewComment};
pub use post::{NewPost, PopulatedPost, Post, PostPatch, slugify};
pub use schema::Schema;
pub use user::AuthorSummary;
