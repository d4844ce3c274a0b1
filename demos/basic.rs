//! Minimal burrow demo: CRUD-style JSON endpoints behind global and
//! route-local middleware.
//!
//! Run with:
//!   cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl http://localhost:3000/users/self
//!   curl -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl -X DELETE http://localhost:3000/users/42                       # 401
//!   curl -X DELETE -H 'authorization: Bearer x' http://localhost:3000/users/42
//!   curl http://localhost:3000/nope                                      # 404

use burrow::middleware::{self, Next};
use burrow::{Method, Request, Response, Route, Router, Server};
use http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct User {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct NewUser {
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), burrow::Error> {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .middleware(middleware::trace)
        .middleware(default_headers)
        .get("/users/:id", get_user)
        .get("/users/self", current_user)
        .post("/users", create_user)
        .route(Method::Delete, "/users/:id", Route::new(delete_user).middleware(require_token))
        .not_found(|req: Request| async move {
            Response::error(StatusCode::NOT_FOUND, format!("no route for {}", req.path()))
        });

    Server::bind("0.0.0.0:3000").serve(app).await
}

// GET /users/:id
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(StatusCode::OK, &User { id: id.to_owned(), name: "alice".into() })
}

// GET /users/self (the static segment wins over `:id`)
async fn current_user(_req: Request) -> Response {
    Response::json(StatusCode::OK, &User { id: "0".into(), name: "me".into() })
}

// POST /users
//
// A malformed body turns into a 500 structured error through `?`-style
// `Result` returns.
async fn create_user(req: Request) -> Result<Response, burrow::Error> {
    let input: NewUser = req.bind_json()?;
    let user = User { id: "99".into(), name: input.name };
    Ok(Response::with_headers(
        [("location", "/users/99")],
        Response::json(StatusCode::CREATED, &user),
    ))
}

// DELETE /users/:id → 204 No Content
async fn delete_user(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn require_token(req: Request, next: Next) -> Response {
    if !req.headers().has("authorization") {
        return Response::error(StatusCode::UNAUTHORIZED, "missing bearer token");
    }
    next.run(req).await
}

async fn default_headers(req: Request, next: Next) -> Response {
    let res = next.run(req).await;
    Response::with_headers([("cache-control", "no-store"), ("x-content-type-options", "nosniff")], res)
}
