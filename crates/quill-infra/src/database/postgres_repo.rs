//! PostgreSQL post store.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use quill_core::domain::{
    AuthorSummary, CategorySummary, NewComment, PopulatedPost, Post, PostPatch,
};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

impl PostgresPostRepository {
    /// Resolve `author` and `category` with one `IN` query per table.
    async fn populate(&self, models: Vec<post::Model>) -> Result<Vec<PopulatedPost>, RepoError> {
        let author_ids = distinct(models.iter().filter_map(|m| m.author_id));
        let category_ids = distinct(models.iter().filter_map(|m| m.category_id));

        let (authors, categories) = futures::try_join!(
            self.load_authors(author_ids),
            self.load_categories(category_ids)
        )?;

        Ok(models
            .into_iter()
            .map(|model| {
                let author = model.author_id.and_then(|id| authors.get(&id).cloned());
                let category = model.category_id.and_then(|id| categories.get(&id).cloned());
                PopulatedPost::new(model.into(), author, category)
            })
            .collect())
    }

    async fn load_authors(&self, ids: Vec<Uuid>) -> Result<HashMap<Uuid, AuthorSummary>, RepoError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(users.into_iter().map(|u| (u.id, u.into())).collect())
    }

    async fn load_categories(
        &self,
        ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, CategorySummary>, RepoError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let categories = CategoryEntity::find()
            .filter(category::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(categories.into_iter().map(|c| (c.id, c.into())).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_populated(&self) -> Result<Vec<PopulatedPost>, RepoError> {
        let models = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        tracing::debug!(count = models.len(), "Listing posts");
        self.populate(models).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PopulatedPost>, RepoError> {
        let model = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        match model {
            Some(model) => Ok(self.populate(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, RepoError> {
        let Some(current) = BaseRepository::<Post, Uuid>::find_by_id(self, id).await? else {
            return Ok(None);
        };

        let mut draft = current;
        draft.apply(patch);
        draft.validate()?;

        // Counters and comments are owned by their own atomic statements.
        let mut active: post::ActiveModel = draft.into();
        active.view_count = NotSet;
        active.comments = NotSet;
        active.created_at = NotSet;

        match active.update(&self.db).await {
            Ok(model) => Ok(Some(model.into())),
            // Deleted after the read above.
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(write_error(e)),
        }
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<Option<i64>, RepoError> {
        let updated = PostEntity::update_many()
            .col_expr(
                post::Column::ViewCount,
                Expr::col(post::Column::ViewCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await
            .map_err(query_error)?;

        Ok(updated.into_iter().next().map(|model| model.view_count))
    }

    async fn add_comment(
        &self,
        id: Uuid,
        comment: NewComment,
    ) -> Result<Option<Post>, RepoError> {
        if BaseRepository::<Post, Uuid>::find_by_id(self, id)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let comment = comment.into_comment()?;
        let appended = serde_json::to_value([&comment])
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let updated = PostEntity::update_many()
            .col_expr(
                post::Column::Comments,
                Expr::cust_with_values(r#""comments" || $1"#, [appended]),
            )
            .col_expr(
                post::Column::UpdatedAt,
                Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(
                    comment.created_at,
                )),
            )
            .filter(post::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await
            .map_err(write_error)?;

        Ok(updated.into_iter().next().map(Into::into))
    }
}

fn distinct(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    ids.collect::<BTreeSet<_>>().into_iter().collect()
}
