use axum::{
    http::{self, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use mock_server::{app, LoginResponse, Movie, Review, User, ADMIN_EMAIL, ADMIN_PASSWORD};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body.to_string()).unwrap()
}

fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<String> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(String::new()).unwrap()
}

async fn send(app: &Router, request: Request<String>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn login(app: &Router, email: &str, senha: &str) -> LoginResponse {
    let body = serde_json::json!({"email": email, "senha": senha}).to_string();
    let resp = send(app, json_request("POST", "/auth/login", None, &body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

async fn register(app: &Router, email: &str) -> User {
    let body = serde_json::json!({
        "nome": "Member",
        "email": email,
        "senha": "pw",
        "tipoUsuario": "user",
        "status": true,
        "apelido": "member",
        "dataNascimento": "2000-01-01"
    })
    .to_string();
    let resp = send(app, json_request("POST", "/user", None, &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

const MOVIE: &str = r#"{"nome":"Heat","diretor":"Michael Mann","anoLancamento":1995,"duracao":170,"produtora":"Warner","classificacao":"16","poster":"http://p/heat.jpg","generos":[1,2]}"#;

// --- auth ---

#[tokio::test]
async fn seeded_admin_can_log_in() {
    let app = app();
    let session = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert!(!session.token.is_empty());
    assert_eq!(session.user.email, ADMIN_EMAIL);
}

#[tokio::test]
async fn wrong_password_returns_401() {
    let app = app();
    let body = serde_json::json!({"email": ADMIN_EMAIL, "senha": "nope"}).to_string();
    let resp = send(&app, json_request("POST", "/auth/login", None, &body)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_duplicate_email_returns_409() {
    let app = app();
    register(&app, "dup@example.com").await;
    let body = serde_json::json!({
        "nome": "Again", "email": "dup@example.com", "senha": "pw", "tipoUsuario": "user",
        "apelido": "again", "dataNascimento": "2000-01-01"
    })
    .to_string();
    let resp = send(&app, json_request("POST", "/user", None, &body)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

// --- users ---

#[tokio::test]
async fn list_users_requires_token() {
    let app = app();
    let resp = send(&app, bare_request("GET", "/user", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = send(&app, bare_request("GET", "/user", Some("forged"))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_users_is_admin_only() {
    let app = app();
    register(&app, "member@example.com").await;
    let member = login(&app, "member@example.com", "pw").await;

    let resp = send(&app, bare_request("GET", "/user", Some(&member.token))).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let resp = send(&app, bare_request("GET", "/user", Some(&admin.token))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<User> = body_json(resp).await;
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn partial_user_update_keeps_other_fields() {
    let app = app();
    let created = register(&app, "member@example.com").await;
    let member = login(&app, "member@example.com", "pw").await;

    let uri = format!("/user/{}", created.id);
    let resp = send(&app, json_request("PUT", &uri, Some(&member.token), r#"{"nome":"X"}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: User = body_json(resp).await;
    assert_eq!(updated.nome, "X");
    assert_eq!(updated.apelido, "member");
    assert_eq!(updated.email, "member@example.com");
}

#[tokio::test]
async fn member_cannot_promote_self() {
    let app = app();
    let created = register(&app, "member@example.com").await;
    let member = login(&app, "member@example.com", "pw").await;

    let uri = format!("/user/{}", created.id);
    let resp = send(
        &app,
        json_request("PUT", &uri, Some(&member.token), r#"{"tipoUsuario":"admin"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- movies ---

#[tokio::test]
async fn movies_are_publicly_readable() {
    let app = app();
    let resp = send(&app, bare_request("GET", "/movies", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let movies: Vec<Movie> = body_json(resp).await;
    assert!(movies.is_empty());

    let resp = send(&app, bare_request("GET", "/movies/1", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn movie_mutations_are_admin_only() {
    let app = app();
    register(&app, "member@example.com").await;
    let member = login(&app, "member@example.com", "pw").await;

    let resp = send(&app, json_request("POST", "/movies", Some(&member.token), MOVIE)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = send(&app, json_request("POST", "/movies", None, MOVIE)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_movie_id_returns_400() {
    let app = app();
    let resp = send(&app, bare_request("GET", "/movies/not-a-number", None)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- reviews ---

#[tokio::test]
async fn review_score_out_of_range_returns_400() {
    let app = app();
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    send(&app, json_request("POST", "/movies", Some(&admin.token), MOVIE)).await;

    let body = format!(
        r#"{{"idUsuario":{},"idFilme":1,"nota":11,"comentario":"too much"}}"#,
        admin.user.id
    );
    let resp = send(&app, json_request("POST", "/reviews", Some(&admin.token), &body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn member_cannot_review_as_someone_else() {
    let app = app();
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    send(&app, json_request("POST", "/movies", Some(&admin.token), MOVIE)).await;
    register(&app, "member@example.com").await;
    let member = login(&app, "member@example.com", "pw").await;

    let body = format!(
        r#"{{"idUsuario":{},"idFilme":1,"nota":5,"comentario":"forged"}}"#,
        admin.user.id
    );
    let resp = send(&app, json_request("POST", "/reviews", Some(&member.token), &body)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- full review lifecycle ---

#[tokio::test]
async fn review_lifecycle() {
    let app = app();
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    // create a movie to review
    let resp = send(&app, json_request("POST", "/movies", Some(&admin.token), MOVIE)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let movie: Movie = body_json(resp).await;

    let member_user = register(&app, "member@example.com").await;
    let member = login(&app, "member@example.com", "pw").await;
    let key_uri = format!("/reviews/{}/{}", member_user.id, movie.id);

    // create
    let body = format!(
        r#"{{"idUsuario":{},"idFilme":{},"nota":8,"comentario":"ok"}}"#,
        member_user.id, movie.id
    );
    let resp = send(&app, json_request("POST", "/reviews", Some(&member.token), &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // second review of the same pair
    let resp = send(&app, json_request("POST", "/reviews", Some(&member.token), &body)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // get, public
    let resp = send(&app, bare_request("GET", &key_uri, None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let review: Review = body_json(resp).await;
    assert_eq!(review.nota, 8);

    // partial update
    let resp = send(
        &app,
        json_request("PUT", &key_uri, Some(&member.token), r#"{"comentario":"better"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let review: Review = body_json(resp).await;
    assert_eq!(review.nota, 8); // unchanged
    assert_eq!(review.comentario, "better");

    // delete
    let resp = send(&app, bare_request("DELETE", &key_uri, Some(&member.token))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // list after delete
    let resp = send(&app, bare_request("GET", "/reviews", None)).await;
    let reviews: Vec<Review> = body_json(resp).await;
    assert!(reviews.is_empty());

    // get after delete
    let resp = send(&app, bare_request("GET", &key_uri, None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_movie_drops_its_reviews() {
    let app = app();
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let resp = send(&app, json_request("POST", "/movies", Some(&admin.token), MOVIE)).await;
    let movie: Movie = body_json(resp).await;

    let body = format!(
        r#"{{"idUsuario":{},"idFilme":{},"nota":7,"comentario":"fine"}}"#,
        admin.user.id, movie.id
    );
    send(&app, json_request("POST", "/reviews", Some(&admin.token), &body)).await;

    let resp = send(
        &app,
        bare_request("DELETE", &format!("/movies/{}", movie.id), Some(&admin.token)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, bare_request("GET", "/reviews", None)).await;
    let reviews: Vec<Review> = body_json(resp).await;
    assert!(reviews.is_empty());
}
