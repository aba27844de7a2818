//! The sixteen remote operations and what each one needs.
//!
//! Every request the client builds is tagged with an `Operation`. The tag
//! decides whether a bearer token is attached and which generic message a
//! failure or success maps to.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Register,
    ListUsers,
    GetUser,
    UpdateUser,
    DeleteUser,
    ListMovies,
    GetMovie,
    CreateMovie,
    UpdateMovie,
    DeleteMovie,
    ListReviews,
    GetReview,
    CreateReview,
    UpdateReview,
    DeleteReview,
}

impl Operation {
    pub const ALL: [Operation; 16] = [
        Operation::Login,
        Operation::Register,
        Operation::ListUsers,
        Operation::GetUser,
        Operation::UpdateUser,
        Operation::DeleteUser,
        Operation::ListMovies,
        Operation::GetMovie,
        Operation::CreateMovie,
        Operation::UpdateMovie,
        Operation::DeleteMovie,
        Operation::ListReviews,
        Operation::GetReview,
        Operation::CreateReview,
        Operation::UpdateReview,
        Operation::DeleteReview,
    ];

    /// Whether the request carries the session's bearer token.
    pub fn requires_auth(self) -> bool {
        !matches!(
            self,
            Operation::Login
                | Operation::Register
                | Operation::ListMovies
                | Operation::GetMovie
                | Operation::ListReviews
                | Operation::GetReview
        )
    }

    /// Unauthenticated catalog reads. These go out with no headers at all.
    pub fn is_public_read(self) -> bool {
        matches!(
            self,
            Operation::ListMovies | Operation::GetMovie | Operation::ListReviews | Operation::GetReview
        )
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Login => "login failed",
            Operation::Register => "registration failed",
            Operation::ListUsers => "failed to fetch users",
            Operation::GetUser => "failed to fetch user",
            Operation::UpdateUser => "failed to update user",
            Operation::DeleteUser => "failed to delete user",
            Operation::ListMovies => "failed to fetch movies",
            Operation::GetMovie => "failed to fetch movie",
            Operation::CreateMovie => "failed to create movie",
            Operation::UpdateMovie => "failed to update movie",
            Operation::DeleteMovie => "failed to delete movie",
            Operation::ListReviews => "failed to fetch reviews",
            Operation::GetReview => "failed to fetch review",
            Operation::CreateReview => "failed to create review",
            Operation::UpdateReview => "failed to update review",
            Operation::DeleteReview => "failed to delete review",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Operation::Login => "logged in",
            Operation::Register => "user registered",
            Operation::ListUsers => "users loaded",
            Operation::GetUser => "user loaded",
            Operation::UpdateUser => "user updated",
            Operation::DeleteUser => "user deleted",
            Operation::ListMovies => "movies loaded",
            Operation::GetMovie => "movie loaded",
            Operation::CreateMovie => "movie created",
            Operation::UpdateMovie => "movie updated",
            Operation::DeleteMovie => "movie deleted",
            Operation::ListReviews => "reviews loaded",
            Operation::GetReview => "review loaded",
            Operation::CreateReview => "review created",
            Operation::UpdateReview => "review updated",
            Operation::DeleteReview => "review deleted",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.failure_message())
    }
}
