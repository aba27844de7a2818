//! HTTP request builder and response parser for the movie-review API.
//!
//! # Design
//! `ApiClient` holds a `base_url` and a `TokenSource`, and carries no other
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Executing the round-trip is someone else's job (`Api`,
//! or any host with its own HTTP stack).
//!
//! Header shaping depends only on the operation:
//! - public catalog reads send no headers;
//! - every other request sends `content-type: application/json`;
//! - authorization-requiring requests add `authorization: Bearer <token>`
//!   when the token source has one, read at build time. Without a token the
//!   request is still built and the server gets to reject it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::operation::Operation;
use crate::token::TokenSource;
use crate::types::{
    Credentials, LoginResponse, Movie, MovieId, MovieUpdate, NewMovie, NewReview, NewUser, Review,
    ReviewUpdate, User, UserId, UserUpdate,
};

/// Synchronous client for the movie-review API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct ApiClient<S> {
    base_url: String,
    tokens: S,
}

impl<S: TokenSource> ApiClient<S> {
    pub fn new(base_url: &str, tokens: S) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    // --- auth ---

    pub fn build_login(&self, email: &str, password: &str) -> Result<HttpRequest, ApiError> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.json_request(Operation::Login, HttpMethod::Post, "/auth/login".to_string(), &credentials)
    }

    pub fn build_register(&self, input: &NewUser) -> Result<HttpRequest, ApiError> {
        self.json_request(Operation::Register, HttpMethod::Post, "/user".to_string(), input)
    }

    // --- users ---

    pub fn build_list_users(&self) -> HttpRequest {
        self.request(Operation::ListUsers, HttpMethod::Get, "/user".to_string(), None)
    }

    pub fn build_get_user(&self, id: UserId) -> HttpRequest {
        self.request(Operation::GetUser, HttpMethod::Get, format!("/user/{id}"), None)
    }

    pub fn build_update_user(&self, id: UserId, input: &UserUpdate) -> Result<HttpRequest, ApiError> {
        self.json_request(Operation::UpdateUser, HttpMethod::Put, format!("/user/{id}"), input)
    }

    pub fn build_delete_user(&self, id: UserId) -> HttpRequest {
        self.request(Operation::DeleteUser, HttpMethod::Delete, format!("/user/{id}"), None)
    }

    // --- movies ---

    pub fn build_list_movies(&self) -> HttpRequest {
        self.request(Operation::ListMovies, HttpMethod::Get, "/movies".to_string(), None)
    }

    pub fn build_get_movie(&self, id: MovieId) -> HttpRequest {
        self.request(Operation::GetMovie, HttpMethod::Get, format!("/movies/{id}"), None)
    }

    pub fn build_create_movie(&self, input: &NewMovie) -> Result<HttpRequest, ApiError> {
        self.json_request(Operation::CreateMovie, HttpMethod::Post, "/movies".to_string(), input)
    }

    pub fn build_update_movie(&self, id: MovieId, input: &MovieUpdate) -> Result<HttpRequest, ApiError> {
        self.json_request(Operation::UpdateMovie, HttpMethod::Put, format!("/movies/{id}"), input)
    }

    pub fn build_delete_movie(&self, id: MovieId) -> HttpRequest {
        self.request(Operation::DeleteMovie, HttpMethod::Delete, format!("/movies/{id}"), None)
    }

    // --- reviews ---

    pub fn build_list_reviews(&self) -> HttpRequest {
        self.request(Operation::ListReviews, HttpMethod::Get, "/reviews".to_string(), None)
    }

    pub fn build_get_review(&self, user_id: UserId, movie_id: MovieId) -> HttpRequest {
        self.request(
            Operation::GetReview,
            HttpMethod::Get,
            format!("/reviews/{user_id}/{movie_id}"),
            None,
        )
    }

    pub fn build_create_review(&self, input: &NewReview) -> Result<HttpRequest, ApiError> {
        self.json_request(Operation::CreateReview, HttpMethod::Post, "/reviews".to_string(), input)
    }

    pub fn build_update_review(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        input: &ReviewUpdate,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(
            Operation::UpdateReview,
            HttpMethod::Put,
            format!("/reviews/{user_id}/{movie_id}"),
            input,
        )
    }

    pub fn build_delete_review(&self, user_id: UserId, movie_id: MovieId) -> HttpRequest {
        self.request(
            Operation::DeleteReview,
            HttpMethod::Delete,
            format!("/reviews/{user_id}/{movie_id}"),
            None,
        )
    }

    fn request(&self, op: Operation, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: self.headers_for(op),
            body,
        }
    }

    fn json_request<T: Serialize>(
        &self,
        op: Operation,
        method: HttpMethod,
        path: String,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.request(op, method, path, Some(body)))
    }

    fn headers_for(&self, op: Operation) -> Vec<(String, String)> {
        if op.is_public_read() {
            return Vec::new();
        }
        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        if op.requires_auth() {
            if let Some(token) = self.tokens.token() {
                headers.push(("authorization".to_string(), format!("Bearer {token}")));
            }
        }
        headers
    }
}

impl<S> ApiClient<S> {
    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResponse, ApiError> {
        parse_json(Operation::Login, response)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_json(Operation::Register, response)
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        parse_json(Operation::ListUsers, response)
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_json(Operation::GetUser, response)
    }

    pub fn parse_update_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_json(Operation::UpdateUser, response)
    }

    pub fn parse_delete_user(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(Operation::DeleteUser, &response)
    }

    pub fn parse_list_movies(&self, response: HttpResponse) -> Result<Vec<Movie>, ApiError> {
        parse_json(Operation::ListMovies, response)
    }

    pub fn parse_get_movie(&self, response: HttpResponse) -> Result<Movie, ApiError> {
        parse_json(Operation::GetMovie, response)
    }

    pub fn parse_create_movie(&self, response: HttpResponse) -> Result<Movie, ApiError> {
        parse_json(Operation::CreateMovie, response)
    }

    pub fn parse_update_movie(&self, response: HttpResponse) -> Result<Movie, ApiError> {
        parse_json(Operation::UpdateMovie, response)
    }

    pub fn parse_delete_movie(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(Operation::DeleteMovie, &response)
    }

    pub fn parse_list_reviews(&self, response: HttpResponse) -> Result<Vec<Review>, ApiError> {
        parse_json(Operation::ListReviews, response)
    }

    pub fn parse_get_review(&self, response: HttpResponse) -> Result<Review, ApiError> {
        parse_json(Operation::GetReview, response)
    }

    pub fn parse_create_review(&self, response: HttpResponse) -> Result<Review, ApiError> {
        parse_json(Operation::CreateReview, response)
    }

    pub fn parse_update_review(&self, response: HttpResponse) -> Result<Review, ApiError> {
        parse_json(Operation::UpdateReview, response)
    }

    pub fn parse_delete_review(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(Operation::DeleteReview, &response)
    }
}

fn parse_json<T: DeserializeOwned>(op: Operation, response: HttpResponse) -> Result<T, ApiError> {
    check_status(op, &response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Any 2xx passes. Everything else collapses into `ApiError::Failed`; the
/// status only reaches the log.
fn check_status(op: Operation, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    warn!(operation = ?op, status = response.status, "request rejected");
    Err(ApiError::Failed(op))
}
