//! Page-load fan-out for the dashboard and the admin console.
//!
//! # Design
//! The independent list fetches a view needs are issued concurrently on
//! scoped threads and joined before returning. If any fetch fails the whole
//! load fails with that error (fetches are joined in a fixed order, the first
//! failure in that order wins). Nothing is cached: after a mutation the
//! caller loads the view again.

use std::thread::{self, ScopedJoinHandle};

use crate::api::Api;
use crate::error::ApiError;
use crate::token::TokenSource;
use crate::transport::Transport;
use crate::types::{Movie, MovieId, Review, User, UserId};

fn join<T>(handle: ScopedJoinHandle<'_, T>) -> T {
    handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

fn find_movie(movies: &[Movie], id: MovieId) -> Option<&Movie> {
    movies.iter().find(|m| m.id == id)
}

/// What a signed-in user sees: the catalog and the reviews.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub user_id: UserId,
    pub movies: Vec<Movie>,
    pub reviews: Vec<Review>,
}

impl Dashboard {
    pub fn load<T, S>(api: &Api<T, S>, user_id: UserId) -> Result<Self, ApiError>
    where
        T: Transport + Sync,
        S: TokenSource + Sync,
    {
        let (movies, reviews) = thread::scope(|scope| {
            let movies = scope.spawn(|| api.list_movies());
            let reviews = scope.spawn(|| api.list_reviews());
            (join(movies), join(reviews))
        });
        Ok(Self {
            user_id,
            movies: movies?,
            reviews: reviews?,
        })
    }

    /// Reviews written by the dashboard's user.
    pub fn my_reviews(&self) -> impl Iterator<Item = &Review> {
        self.reviews.iter().filter(move |r| r.user_id == self.user_id)
    }

    pub fn movie_for(&self, review: &Review) -> Option<&Movie> {
        find_movie(&self.movies, review.movie_id)
    }

    /// Movies the user has not reviewed yet.
    pub fn unreviewed_movies(&self) -> impl Iterator<Item = &Movie> {
        self.movies
            .iter()
            .filter(move |m| !self.my_reviews().any(|r| r.movie_id == m.id))
    }
}

/// Everything the admin console manages.
#[derive(Debug, Clone)]
pub struct AdminConsole {
    pub users: Vec<User>,
    pub movies: Vec<Movie>,
    pub reviews: Vec<Review>,
}

impl AdminConsole {
    pub fn load<T, S>(api: &Api<T, S>) -> Result<Self, ApiError>
    where
        T: Transport + Sync,
        S: TokenSource + Sync,
    {
        let (users, movies, reviews) = thread::scope(|scope| {
            let users = scope.spawn(|| api.list_users());
            let movies = scope.spawn(|| api.list_movies());
            let reviews = scope.spawn(|| api.list_reviews());
            (join(users), join(movies), join(reviews))
        });
        Ok(Self {
            users: users?,
            movies: movies?,
            reviews: reviews?,
        })
    }

    pub fn user_for(&self, review: &Review) -> Option<&User> {
        self.users.iter().find(|u| u.id == review.user_id)
    }

    pub fn movie_for(&self, review: &Review) -> Option<&Movie> {
        find_movie(&self.movies, review.movie_id)
    }
}
