//! HTTP API: chat dispatcher, routing, and request/response mapping.

pub mod app;
pub mod chat;
pub mod middleware;
