//! JSON payloads shared by every server

use serde::Serialize;

/// `GET /hello` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Greeting {
    pub message: &'static str,
}

pub const GREETING: Greeting = Greeting {
    message: "Hello, World!",
};

/// `GET /user/:id` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User<'a> {
    pub id: &'a str,
    pub name: String,
}

impl<'a> User<'a> {
    /// Echo `id` back with a `"User <id>"` name. No validation.
    pub fn from_id(id: &'a str) -> Self {
        Self {
            id,
            name: format!("User {id}"),
        }
    }
}
