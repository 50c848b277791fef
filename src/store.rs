use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::debug;

use crate::{
    entities::{movie, user},
    error::AppResult,
    models::{MovieUpdate, NewMovie},
};

/// Data access layer: the only path between handlers and the database.
/// Every method is a single commit; "not found" is a `None`/`false`
/// result, never an error.
#[derive(Clone)]
pub struct Store {
    db: DatabaseConnection,
}

impl Store {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_user(&self, name: &str) -> AppResult<user::Model> {
        let user = user::ActiveModel { name: Set(name.to_string()), ..Default::default() }
            .insert(&self.db)
            .await?;
        debug!(user_id = user.id, "created user");
        Ok(user)
    }

    pub async fn get_users(&self) -> AppResult<Vec<user::Model>> {
        Ok(user::Entity::find().all(&self.db).await?)
    }

    pub async fn get_user_by_id(&self, user_id: i32) -> AppResult<Option<user::Model>> {
        Ok(user::Entity::find_by_id(user_id).one(&self.db).await?)
    }

    pub async fn get_movie(&self, movie_id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(movie_id).one(&self.db).await?)
    }

    /// The user's movies in insertion order; empty when the user does not
    /// exist.
    pub async fn get_movies(&self, user_id: i32) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find()
            .filter(movie::Column::UserId.eq(user_id))
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Case-insensitive substring match on movie name (sqlite `LIKE`).
    pub async fn search_movies(&self, user_id: i32, query: &str) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find()
            .filter(movie::Column::UserId.eq(user_id))
            .filter(movie::Column::Name.contains(query))
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// `None` when the user does not exist; the movie is not inserted.
    pub async fn add_movie(
        &self,
        user_id: i32,
        movie: NewMovie,
    ) -> AppResult<Option<movie::Model>> {
        if self.get_user_by_id(user_id).await?.is_none() {
            return Ok(None);
        }

        let movie = movie::ActiveModel {
            name: Set(movie.name),
            director: Set(movie.director),
            year: Set(movie.year),
            poster_url: Set(movie.poster_url),
            user_id: Set(user_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!(movie_id = movie.id, user_id = user_id, "added movie");
        Ok(Some(movie))
    }

    /// Applies only the supplied fields; `None` when the movie does not
    /// exist.
    pub async fn update_movie(
        &self,
        movie_id: i32,
        fields: MovieUpdate,
    ) -> AppResult<Option<movie::Model>> {
        let Some(movie) = movie::Entity::find_by_id(movie_id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: movie::ActiveModel = movie.clone().into();
        let mut dirty = false;
        if let Some(name) = fields.name {
            active.name = Set(name);
            dirty = true;
        }
        if let Some(director) = fields.director {
            active.director = Set(director);
            dirty = true;
        }
        if let Some(year) = fields.year {
            active.year = Set(year);
            dirty = true;
        }
        if let Some(poster_url) = fields.poster_url {
            active.poster_url = Set(poster_url);
            dirty = true;
        }

        if !dirty {
            return Ok(Some(movie));
        }

        let updated = active.update(&self.db).await?;
        debug!(movie_id = updated.id, "updated movie");
        Ok(Some(updated))
    }

    pub async fn delete_movie(&self, movie_id: i32) -> AppResult<bool> {
        let res = movie::Entity::delete_by_id(movie_id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    /// Removes the user and every movie they own in one transaction. The
    /// schema also declares `ON DELETE CASCADE` on the foreign key.
    pub async fn delete_user(&self, user_id: i32) -> AppResult<bool> {
        let txn = self.db.begin().await?;

        movie::Entity::delete_many()
            .filter(movie::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        let res = user::Entity::delete_by_id(user_id).exec(&txn).await?;

        txn.commit().await?;

        if res.rows_affected > 0 {
            debug!(user_id = user_id, "deleted user and their movies");
        }
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use migration::Migrator;
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;

    use super::*;

    async fn test_store() -> Store {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        Store::new(db)
    }

    fn inception() -> NewMovie {
        NewMovie {
            name: "Inception".to_string(),
            director: "Christopher Nolan".to_string(),
            year: 2010,
            poster_url: Some("https://posters.example/inception.jpg".to_string()),
        }
    }

    fn alien() -> NewMovie {
        NewMovie {
            name: "Alien".to_string(),
            director: "Ridley Scott".to_string(),
            year: 1979,
            poster_url: None,
        }
    }

    #[tokio::test]
    async fn created_user_is_retrievable_by_id() {
        let store = test_store().await;

        let ada = store.create_user("Ada").await.unwrap();
        let found = store.get_user_by_id(ada.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Ada");

        assert!(store.get_user_by_id(ada.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_user_names_are_allowed() {
        let store = test_store().await;

        let first = store.create_user("Ada").await.unwrap();
        let second = store.create_user("Ada").await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.get_users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_movies_tracks_additions_in_insertion_order() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();

        let first = store.add_movie(ada.id, inception()).await.unwrap().unwrap();
        let second = store.add_movie(ada.id, alien()).await.unwrap().unwrap();

        let movies = store.get_movies(ada.id).await.unwrap();
        assert_eq!(
            movies.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );

        assert!(store.delete_movie(first.id).await.unwrap());
        let movies = store.get_movies(ada.id).await.unwrap();
        assert_eq!(movies.iter().map(|m| m.id).collect::<Vec<_>>(), vec![second.id]);
    }

    #[tokio::test]
    async fn movies_are_scoped_to_their_owner() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();
        let bob = store.create_user("Bob").await.unwrap();

        store.add_movie(ada.id, inception()).await.unwrap();
        store.add_movie(bob.id, alien()).await.unwrap();

        let movies = store.get_movies(ada.id).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].name, "Inception");
    }

    #[tokio::test]
    async fn add_movie_to_unknown_user_inserts_nothing() {
        let store = test_store().await;

        assert!(store.add_movie(42, inception()).await.unwrap().is_none());
        assert!(store.get_movies(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_matches_substring_ignoring_case() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();
        store.add_movie(ada.id, inception()).await.unwrap();
        store.add_movie(ada.id, alien()).await.unwrap();

        let hits = store.search_movies(ada.id, "incep").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Inception");

        let hits = store.search_movies(ada.id, "EN").await.unwrap();
        assert_eq!(hits.len(), 2);

        assert!(store.search_movies(ada.id, "matrix").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_with_only_year_leaves_other_fields() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();
        let movie = store.add_movie(ada.id, inception()).await.unwrap().unwrap();

        let updated = store
            .update_movie(movie.id, MovieUpdate { year: Some(2020), ..Default::default() })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.year, 2020);
        assert_eq!(updated.name, "Inception");
        assert_eq!(updated.director, "Christopher Nolan");
        assert_eq!(updated.poster_url.as_deref(), Some("https://posters.example/inception.jpg"));
        assert_eq!(updated.user_id, ada.id);
    }

    #[tokio::test]
    async fn update_can_clear_the_poster() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();
        let movie = store.add_movie(ada.id, inception()).await.unwrap().unwrap();

        let updated = store
            .update_movie(movie.id, MovieUpdate { poster_url: Some(None), ..Default::default() })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.poster_url, None);
        assert_eq!(updated.name, "Inception");
    }

    #[tokio::test]
    async fn update_with_no_fields_returns_the_unchanged_movie() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();
        let movie = store.add_movie(ada.id, alien()).await.unwrap().unwrap();

        let same = store.update_movie(movie.id, MovieUpdate::default()).await.unwrap().unwrap();
        assert_eq!(same, movie);
    }

    #[tokio::test]
    async fn update_of_unknown_movie_returns_none() {
        let store = test_store().await;
        let fields = MovieUpdate { year: Some(2020), ..Default::default() };
        assert!(store.update_movie(7, fields).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_movie_reports_found() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();
        let movie = store.add_movie(ada.id, alien()).await.unwrap().unwrap();

        assert!(store.delete_movie(movie.id).await.unwrap());
        assert!(!store.delete_movie(movie.id).await.unwrap());
        assert!(store.get_movie(movie.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_user_cascades_to_movies() {
        let store = test_store().await;
        let ada = store.create_user("Ada").await.unwrap();
        let bob = store.create_user("Bob").await.unwrap();
        let adas = store.add_movie(ada.id, inception()).await.unwrap().unwrap();
        let bobs = store.add_movie(bob.id, alien()).await.unwrap().unwrap();

        assert!(store.delete_user(ada.id).await.unwrap());

        assert!(store.get_user_by_id(ada.id).await.unwrap().is_none());
        assert!(store.get_movies(ada.id).await.unwrap().is_empty());
        assert!(store.get_movie(adas.id).await.unwrap().is_none());

        // Bob's collection is untouched
        assert_eq!(store.get_movie(bobs.id).await.unwrap().unwrap().name, "Alien");
    }

    #[tokio::test]
    async fn delete_of_unknown_user_returns_false() {
        let store = test_store().await;
        assert!(!store.delete_user(99).await.unwrap());
    }
}
