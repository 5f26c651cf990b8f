//! End-to-end tests at the HTTP request/response level.
//!
//! Each test file covers a specific scenario, driving the full router
//! in-process with a simulated clock and a seeded user store.

#![cfg(test)]

mod helpers;

mod test_health;
mod test_login;
mod test_register;
mod test_token_expiry;
