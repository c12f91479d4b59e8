//! Application state shared across handlers

use common::validators::ScoreBounds;
use sqlx::PgPool;

use crate::{
    middleware::JwtVerifier,
    models::catalog::CatalogKind,
    repositories::{
        CatalogRepository, CommentRepository, ReviewRepository, TitleRepository, UserRepository,
    },
    settings::Settings,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_verifier: JwtVerifier,
    pub user_repository: UserRepository,
    pub category_repository: CatalogRepository,
    pub genre_repository: CatalogRepository,
    pub title_repository: TitleRepository,
    pub review_repository: ReviewRepository,
    pub comment_repository: CommentRepository,
    pub score_bounds: ScoreBounds,
    pub min_year: i32,
}

impl AppState {
    pub fn new(pool: PgPool, jwt_verifier: JwtVerifier, settings: &Settings) -> Self {
        Self {
            jwt_verifier,
            user_repository: UserRepository::new(pool.clone()),
            category_repository: CatalogRepository::new(pool.clone(), CatalogKind::Category),
            genre_repository: CatalogRepository::new(pool.clone(), CatalogKind::Genre),
            title_repository: TitleRepository::new(pool.clone()),
            review_repository: ReviewRepository::new(pool.clone()),
            comment_repository: CommentRepository::new(pool),
            score_bounds: settings.score_bounds(),
            min_year: settings.min_year,
        }
    }

    pub fn catalog(&self, kind: CatalogKind) -> &CatalogRepository {
        match kind {
            CatalogKind::Category => &self.category_repository,
            CatalogKind::Genre => &self.genre_repository,
        }
    }
}
