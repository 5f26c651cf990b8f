// Life of a request:
// 1. HTTP request comes in
// 2. Public routes:
//     - /register: parse credentials, store the new identity, acknowledge
//     - /login: parse credentials, verify them, issue a signed token
//    Protected routes:
//     - Guard extracts the bearer token and verifies it
//     - If valid, claims are attached and the handler runs
//     - Otherwise the request is rejected with 401
//
// System components:
//  - Token codec (HS256 JWT)
//  - Credential verifier / user store
//  - Auth service
//  - Access guard middleware

pub mod auth;
pub mod config;
pub mod routes;
pub mod time;

#[cfg(test)]
mod e2e_tests;
#[cfg(test)]
mod testing;

pub use routes::{AppState, app};
