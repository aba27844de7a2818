//! One call per operation: build, execute, parse.
//!
//! # Design
//! `Api` pairs an `ApiClient` with a `Transport`. Each method is a single
//! attempt with no retry, queueing or backoff. A transport failure maps to
//! the same `ApiError::Failed(op)` a rejected status does, so callers see one
//! failure kind per operation.

use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::operation::Operation;
use crate::token::TokenSource;
use crate::transport::Transport;
use crate::types::{
    LoginResponse, Movie, MovieId, MovieUpdate, NewMovie, NewReview, NewUser, Review, ReviewUpdate,
    User, UserId, UserUpdate,
};

pub struct Api<T, S> {
    client: ApiClient<S>,
    transport: T,
}

#[cfg(feature = "ureq")]
impl<S: TokenSource> Api<crate::transport::UreqTransport, S> {
    /// Client for `config.base_url` over ureq, honoring `config.timeout`.
    pub fn from_config(config: &crate::config::ClientConfig, tokens: S) -> Self {
        Self::new(
            ApiClient::new(&config.base_url, tokens),
            crate::transport::UreqTransport::with_timeout(config.timeout),
        )
    }
}

impl<T: Transport, S: TokenSource> Api<T, S> {
    pub fn new(client: ApiClient<S>, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ApiClient<S> {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send(&self, op: Operation, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(
            operation = ?op,
            method = %request.method,
            path = %request.path,
            authorized = request.header("authorization").is_some(),
            "sending request"
        );
        self.transport.execute(request).map_err(|e| {
            warn!(operation = ?op, error = %e, "transport failure");
            ApiError::Failed(op)
        })
    }

    pub fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let req = self.client.build_login(email, password)?;
        self.client.parse_login(self.send(Operation::Login, req)?)
    }

    pub fn register(&self, input: &NewUser) -> Result<User, ApiError> {
        let req = self.client.build_register(input)?;
        self.client.parse_register(self.send(Operation::Register, req)?)
    }

    pub fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let req = self.client.build_list_users();
        self.client.parse_list_users(self.send(Operation::ListUsers, req)?)
    }

    pub fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        let req = self.client.build_get_user(id);
        self.client.parse_get_user(self.send(Operation::GetUser, req)?)
    }

    pub fn update_user(&self, id: UserId, input: &UserUpdate) -> Result<User, ApiError> {
        let req = self.client.build_update_user(id, input)?;
        self.client.parse_update_user(self.send(Operation::UpdateUser, req)?)
    }

    pub fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        let req = self.client.build_delete_user(id);
        self.client.parse_delete_user(self.send(Operation::DeleteUser, req)?)
    }

    pub fn list_movies(&self) -> Result<Vec<Movie>, ApiError> {
        let req = self.client.build_list_movies();
        self.client.parse_list_movies(self.send(Operation::ListMovies, req)?)
    }

    pub fn get_movie(&self, id: MovieId) -> Result<Movie, ApiError> {
        let req = self.client.build_get_movie(id);
        self.client.parse_get_movie(self.send(Operation::GetMovie, req)?)
    }

    pub fn create_movie(&self, input: &NewMovie) -> Result<Movie, ApiError> {
        let req = self.client.build_create_movie(input)?;
        self.client.parse_create_movie(self.send(Operation::CreateMovie, req)?)
    }

    pub fn update_movie(&self, id: MovieId, input: &MovieUpdate) -> Result<Movie, ApiError> {
        let req = self.client.build_update_movie(id, input)?;
        self.client.parse_update_movie(self.send(Operation::UpdateMovie, req)?)
    }

    pub fn delete_movie(&self, id: MovieId) -> Result<(), ApiError> {
        let req = self.client.build_delete_movie(id);
        self.client.parse_delete_movie(self.send(Operation::DeleteMovie, req)?)
    }

    pub fn list_reviews(&self) -> Result<Vec<Review>, ApiError> {
        let req = self.client.build_list_reviews();
        self.client.parse_list_reviews(self.send(Operation::ListReviews, req)?)
    }

    pub fn get_review(&self, user_id: UserId, movie_id: MovieId) -> Result<Review, ApiError> {
        let req = self.client.build_get_review(user_id, movie_id);
        self.client.parse_get_review(self.send(Operation::GetReview, req)?)
    }

    pub fn create_review(&self, input: &NewReview) -> Result<Review, ApiError> {
        let req = self.client.build_create_review(input)?;
        self.client.parse_create_review(self.send(Operation::CreateReview, req)?)
    }

    pub fn update_review(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        input: &ReviewUpdate,
    ) -> Result<Review, ApiError> {
        let req = self.client.build_update_review(user_id, movie_id, input)?;
        self.client.parse_update_review(self.send(Operation::UpdateReview, req)?)
    }

    pub fn delete_review(&self, user_id: UserId, movie_id: MovieId) -> Result<(), ApiError> {
        let req = self.client.build_delete_review(user_id, movie_id);
        self.client.parse_delete_review(self.send(Operation::DeleteReview, req)?)
    }
}
