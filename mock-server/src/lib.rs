use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{header, request::Parts, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

/// Seeded administrator account, present in every fresh `app()`.
pub const ADMIN_EMAIL: &str = "admin@cinereview.local";
pub const ADMIN_PASSWORD: &str = "admin";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoUsuario {
    User,
    Admin,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub nome: String,
    pub email: String,
    pub tipo_usuario: TipoUsuario,
    pub status: bool,
    pub apelido: String,
    pub data_nascimento: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub nome: String,
    pub email: String,
    pub senha: String,
    pub tipo_usuario: TipoUsuario,
    #[serde(default = "active")]
    pub status: bool,
    pub apelido: String,
    pub data_nascimento: String,
}

fn active() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub tipo_usuario: Option<TipoUsuario>,
    pub status: Option<bool>,
    pub apelido: Option<String>,
    pub data_nascimento: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: u64,
    pub nome: String,
    pub diretor: String,
    pub ano_lancamento: u16,
    pub duracao: u32,
    pub produtora: String,
    pub classificacao: String,
    pub poster: String,
    pub generos: Vec<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub nome: String,
    pub diretor: String,
    pub ano_lancamento: u16,
    pub duracao: u32,
    pub produtora: String,
    pub classificacao: String,
    pub poster: String,
    #[serde(default)]
    pub generos: Vec<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovie {
    pub nome: Option<String>,
    pub diretor: Option<String>,
    pub ano_lancamento: Option<u16>,
    pub duracao: Option<u32>,
    pub produtora: Option<String>,
    pub classificacao: Option<String>,
    pub poster: Option<String>,
    pub generos: Option<Vec<u32>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id_usuario: u64,
    pub id_filme: u64,
    pub nota: u8,
    pub comentario: String,
}

#[derive(Deserialize)]
pub struct UpdateReview {
    pub nota: Option<u8>,
    pub comentario: Option<String>,
}

struct Account {
    user: User,
    senha: String,
}

/// In-memory state of the whole service.
pub struct Store {
    users: BTreeMap<u64, Account>,
    movies: BTreeMap<u64, Movie>,
    reviews: BTreeMap<(u64, u64), Review>,
    sessions: HashMap<String, u64>,
    next_user_id: u64,
    next_movie_id: u64,
}

impl Store {
    fn seeded() -> Self {
        let mut store = Store {
            users: BTreeMap::new(),
            movies: BTreeMap::new(),
            reviews: BTreeMap::new(),
            sessions: HashMap::new(),
            next_user_id: 1,
            next_movie_id: 1,
        };
        store.add_user(NewUser {
            nome: "Administrator".to_string(),
            email: ADMIN_EMAIL.to_string(),
            senha: ADMIN_PASSWORD.to_string(),
            tipo_usuario: TipoUsuario::Admin,
            status: true,
            apelido: "admin".to_string(),
            data_nascimento: "1970-01-01".to_string(),
        });
        store
    }

    fn add_user(&mut self, input: NewUser) -> User {
        let user = User {
            id: self.next_user_id,
            nome: input.nome,
            email: input.email,
            tipo_usuario: input.tipo_usuario,
            status: input.status,
            apelido: input.apelido,
            data_nascimento: input.data_nascimento,
        };
        self.next_user_id += 1;
        self.users.insert(
            user.id,
            Account {
                user: user.clone(),
                senha: input.senha,
            },
        );
        user
    }

    fn email_taken(&self, email: &str) -> bool {
        self.users.values().any(|a| a.user.email == email)
    }
}

pub type Db = Arc<RwLock<Store>>;

/// The authenticated account behind a bearer token.
pub struct Caller {
    pub id: u64,
    pub role: TipoUsuario,
}

impl Caller {
    fn require_admin(&self) -> Result<(), StatusCode> {
        if self.role == TipoUsuario::Admin {
            Ok(())
        } else {
            Err(StatusCode::FORBIDDEN)
        }
    }

    fn require_self_or_admin(&self, user_id: u64) -> Result<(), StatusCode> {
        if self.id == user_id {
            Ok(())
        } else {
            self.require_admin()
        }
    }
}

impl FromRequestParts<Db> for Caller {
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .ok_or(StatusCode::UNAUTHORIZED)?;
        let store = db.read().await;
        let id = *store.sessions.get(token).ok_or(StatusCode::UNAUTHORIZED)?;
        let account = store.users.get(&id).ok_or(StatusCode::UNAUTHORIZED)?;
        Ok(Caller {
            id,
            role: account.user.tipo_usuario,
        })
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    Router::new()
        .route("/auth/login", post(login))
        .route("/user", get(list_users).post(register))
        .route("/user/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/movies", get(list_movies).post(create_movie))
        .route("/movies/{id}", get(get_movie).put(update_movie).delete(delete_movie))
        .route("/reviews", get(list_reviews).post(create_review))
        .route(
            "/reviews/{user_id}/{movie_id}",
            get(get_review).put(update_review).delete(delete_review),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- auth ---

async fn login(
    State(db): State<Db>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, StatusCode> {
    let mut store = db.write().await;
    let user = store
        .users
        .values()
        .find(|a| a.user.email == input.email && a.senha == input.senha)
        .map(|a| a.user.clone())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    if !user.status {
        return Err(StatusCode::FORBIDDEN);
    }
    let token = Uuid::new_v4().simple().to_string();
    store.sessions.insert(token.clone(), user.id);
    info!(user_id = user.id, "session opened");
    Ok(Json(LoginResponse { token, user }))
}

// --- users ---

async fn register(
    State(db): State<Db>,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), StatusCode> {
    let mut store = db.write().await;
    if store.email_taken(&input.email) {
        return Err(StatusCode::CONFLICT);
    }
    let user = store.add_user(input);
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users(caller: Caller, State(db): State<Db>) -> Result<Json<Vec<User>>, StatusCode> {
    caller.require_admin()?;
    let store = db.read().await;
    Ok(Json(store.users.values().map(|a| a.user.clone()).collect()))
}

async fn get_user(
    caller: Caller,
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<User>, StatusCode> {
    caller.require_self_or_admin(id)?;
    let store = db.read().await;
    store
        .users
        .get(&id)
        .map(|a| Json(a.user.clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_user(
    caller: Caller,
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<User>, StatusCode> {
    caller.require_self_or_admin(id)?;
    if input.tipo_usuario.is_some() {
        caller.require_admin()?;
    }
    let mut store = db.write().await;
    let user = &mut store.users.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?.user;
    if let Some(nome) = input.nome {
        user.nome = nome;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    if let Some(tipo_usuario) = input.tipo_usuario {
        user.tipo_usuario = tipo_usuario;
    }
    if let Some(status) = input.status {
        user.status = status;
    }
    if let Some(apelido) = input.apelido {
        user.apelido = apelido;
    }
    if let Some(data_nascimento) = input.data_nascimento {
        user.data_nascimento = data_nascimento;
    }
    Ok(Json(user.clone()))
}

async fn delete_user(
    caller: Caller,
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    caller.require_admin()?;
    let mut store = db.write().await;
    store.users.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    store.reviews.retain(|(user_id, _), _| *user_id != id);
    store.sessions.retain(|_, user_id| *user_id != id);
    Ok(StatusCode::NO_CONTENT)
}

// --- movies ---

async fn list_movies(State(db): State<Db>) -> Json<Vec<Movie>> {
    let store = db.read().await;
    Json(store.movies.values().cloned().collect())
}

async fn get_movie(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Movie>, StatusCode> {
    let store = db.read().await;
    store.movies.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_movie(
    caller: Caller,
    State(db): State<Db>,
    Json(input): Json<NewMovie>,
) -> Result<(StatusCode, Json<Movie>), StatusCode> {
    caller.require_admin()?;
    let mut store = db.write().await;
    let movie = Movie {
        id: store.next_movie_id,
        nome: input.nome,
        diretor: input.diretor,
        ano_lancamento: input.ano_lancamento,
        duracao: input.duracao,
        produtora: input.produtora,
        classificacao: input.classificacao,
        poster: input.poster,
        generos: input.generos,
    };
    store.next_movie_id += 1;
    store.movies.insert(movie.id, movie.clone());
    Ok((StatusCode::CREATED, Json(movie)))
}

async fn update_movie(
    caller: Caller,
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateMovie>,
) -> Result<Json<Movie>, StatusCode> {
    caller.require_admin()?;
    let mut store = db.write().await;
    let movie = store.movies.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(nome) = input.nome {
        movie.nome = nome;
    }
    if let Some(diretor) = input.diretor {
        movie.diretor = diretor;
    }
    if let Some(ano_lancamento) = input.ano_lancamento {
        movie.ano_lancamento = ano_lancamento;
    }
    if let Some(duracao) = input.duracao {
        movie.duracao = duracao;
    }
    if let Some(produtora) = input.produtora {
        movie.produtora = produtora;
    }
    if let Some(classificacao) = input.classificacao {
        movie.classificacao = classificacao;
    }
    if let Some(poster) = input.poster {
        movie.poster = poster;
    }
    if let Some(generos) = input.generos {
        movie.generos = generos;
    }
    Ok(Json(movie.clone()))
}

async fn delete_movie(
    caller: Caller,
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    caller.require_admin()?;
    let mut store = db.write().await;
    store.movies.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    store.reviews.retain(|(_, movie_id), _| *movie_id != id);
    Ok(StatusCode::NO_CONTENT)
}

// --- reviews ---

fn valid_nota(nota: u8) -> Result<(), StatusCode> {
    if (1..=10).contains(&nota) {
        Ok(())
    } else {
        Err(StatusCode::BAD_REQUEST)
    }
}

async fn list_reviews(State(db): State<Db>) -> Json<Vec<Review>> {
    let store = db.read().await;
    Json(store.reviews.values().cloned().collect())
}

async fn get_review(
    State(db): State<Db>,
    Path(key): Path<(u64, u64)>,
) -> Result<Json<Review>, StatusCode> {
    let store = db.read().await;
    store.reviews.get(&key).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_review(
    caller: Caller,
    State(db): State<Db>,
    Json(input): Json<Review>,
) -> Result<(StatusCode, Json<Review>), StatusCode> {
    caller.require_self_or_admin(input.id_usuario)?;
    valid_nota(input.nota)?;
    let mut store = db.write().await;
    if !store.users.contains_key(&input.id_usuario) || !store.movies.contains_key(&input.id_filme) {
        return Err(StatusCode::NOT_FOUND);
    }
    let key = (input.id_usuario, input.id_filme);
    if store.reviews.contains_key(&key) {
        return Err(StatusCode::CONFLICT);
    }
    store.reviews.insert(key, input.clone());
    Ok((StatusCode::CREATED, Json(input)))
}

async fn update_review(
    caller: Caller,
    State(db): State<Db>,
    Path((user_id, movie_id)): Path<(u64, u64)>,
    Json(input): Json<UpdateReview>,
) -> Result<Json<Review>, StatusCode> {
    caller.require_self_or_admin(user_id)?;
    if let Some(nota) = input.nota {
        valid_nota(nota)?;
    }
    let mut store = db.write().await;
    let review = store
        .reviews
        .get_mut(&(user_id, movie_id))
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(nota) = input.nota {
        review.nota = nota;
    }
    if let Some(comentario) = input.comentario {
        review.comentario = comentario;
    }
    Ok(Json(review.clone()))
}

async fn delete_review(
    caller: Caller,
    State(db): State<Db>,
    Path((user_id, movie_id)): Path<(u64, u64)>,
) -> Result<StatusCode, StatusCode> {
    caller.require_self_or_admin(user_id)?;
    let mut store = db.write().await;
    store
        .reviews
        .remove(&(user_id, movie_id))
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}
