use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, EntityTrait, QueryOrder, Set,
    SqlErr,
};

use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::{self, NewMovie, RankedMovie},
};

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_ranked(&self) -> AppResult<Vec<RankedMovie>> {
        let movies = movie::Entity::find()
            .order_by_desc(movie::Column::Rating)
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models::rank(movies))
    }

    pub async fn get(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn update_review(
        &self,
        id: i32,
        rating: f64,
        review: &str,
    ) -> AppResult<movie::Model> {
        let Some(existing) = self.get(id).await? else {
            return Err(AppError::NotFound(id));
        };

        let mut model: movie::ActiveModel = existing.into();
        model.rating = Set(rating);
        model.review = Set(review.to_string());
        Ok(model.update(&self.db).await?)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(id));
        }
        Ok(())
    }

    pub async fn create(&self, new: NewMovie) -> AppResult<i32> {
        let title = new.title.clone();
        let model = movie::ActiveModel {
            id: NotSet,
            title: Set(new.title),
            year: Set(new.year),
            description: Set(new.description),
            rating: Set(new.rating),
            ranking: Set(0.0),
            review: Set(new.review),
            img_url: Set(new.img_url),
        };

        match movie::Entity::insert(model).exec(&self.db).await {
            Ok(res) => Ok(res.last_insert_id),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AppError::Conflict(title))
            },
            Err(err) => Err(err.into()),
        }
    }
}
