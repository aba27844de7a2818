//! Domain DTOs for the movie-review API.
//!
//! # Design
//! Rust field names are English; `serde` renames map them onto the remote
//! service's JSON names (`nome`, `idFilme`, ...). These types are defined
//! independently from the mock-server's; the integration tests catch schema
//! drift between the two.
//!
//! Create payloads omit server-assigned ids. Update payloads have every field
//! optional and skip `None` on serialization, so a PUT body carries only what
//! the caller intends to change.

use serde::{Deserialize, Serialize};

pub type UserId = u64;
pub type MovieId = u64;
pub type GenreId = u32;

/// Authorization scope of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "tipoUsuario")]
    pub role: Role,
    /// Active/inactive flag.
    pub status: bool,
    #[serde(rename = "apelido")]
    pub nickname: String,
    #[serde(rename = "dataNascimento")]
    pub birth_date: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

/// Successful login: the bearer token plus the authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Registration payload. The password is sent once and never read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "tipoUsuario")]
    pub role: Role,
    pub status: bool,
    #[serde(rename = "apelido")]
    pub nickname: String,
    #[serde(rename = "dataNascimento")]
    pub birth_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "tipoUsuario", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
    #[serde(rename = "apelido", skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(rename = "dataNascimento", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    #[serde(rename = "nome")]
    pub title: String,
    #[serde(rename = "diretor")]
    pub director: String,
    #[serde(rename = "anoLancamento")]
    pub release_year: u16,
    /// Minutes.
    #[serde(rename = "duracao")]
    pub duration: u32,
    #[serde(rename = "produtora")]
    pub studio: String,
    /// Content rating, freeform.
    #[serde(rename = "classificacao")]
    pub rating: String,
    /// Poster URL.
    pub poster: String,
    #[serde(rename = "generos", default)]
    pub genres: Vec<GenreId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMovie {
    #[serde(rename = "nome")]
    pub title: String,
    #[serde(rename = "diretor")]
    pub director: String,
    #[serde(rename = "anoLancamento")]
    pub release_year: u16,
    #[serde(rename = "duracao")]
    pub duration: u32,
    #[serde(rename = "produtora")]
    pub studio: String,
    #[serde(rename = "classificacao")]
    pub rating: String,
    pub poster: String,
    #[serde(rename = "generos", default)]
    pub genres: Vec<GenreId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieUpdate {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "diretor", skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(rename = "anoLancamento", skip_serializing_if = "Option::is_none")]
    pub release_year: Option<u16>,
    #[serde(rename = "duracao", skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(rename = "produtora", skip_serializing_if = "Option::is_none")]
    pub studio: Option<String>,
    #[serde(rename = "classificacao", skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(rename = "generos", skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<GenreId>>,
}

/// A user's review of a movie. The `(user_id, movie_id)` pair is the
/// identity; there is no surrogate key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
    #[serde(rename = "idFilme")]
    pub movie_id: MovieId,
    /// 1 to 10.
    #[serde(rename = "nota")]
    pub score: u8,
    #[serde(rename = "comentario")]
    pub comment: String,
    /// Embedded author, when the server chooses to include it.
    #[serde(rename = "usuario", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(rename = "filme", default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<Movie>,
}

impl Review {
    pub fn key(&self) -> (UserId, MovieId) {
        (self.user_id, self.movie_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    #[serde(rename = "idUsuario")]
    pub user_id: UserId,
    #[serde(rename = "idFilme")]
    pub movie_id: MovieId,
    #[serde(rename = "nota")]
    pub score: u8,
    #[serde(rename = "comentario")]
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewUpdate {
    #[serde(rename = "nota", skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(rename = "comentario", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
