// # Routes Module
//
// - HTTP route handlers for the CodeFuture server, grouped by API area.
// - Which auth gate wraps which route is decided in `server.rs`.
//
// ## Available Route Modules
// - `health`: health check endpoint
// - `auth`: email/password signup and login
// - `social`: Google/GitHub login and the demo social login
// - `roadmap`: roadmap progress endpoints
// - `lessons`: lesson plans, courses, tutor chat and code execution
// - `community`: community posts
// - `contact`: contact form
// - `math`: arithmetic demo

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// Health check and monitoring endpoints
pub mod health;

/// Email/password authentication
pub mod auth;

/// OAuth and demo social login
pub mod social;

/// Roadmap progress endpoints
pub mod roadmap;

pub mod math;

/// Lesson plans, courses, chat and code execution
pub mod lessons;

/// Community posts
pub mod community;

/// Contact form submissions
pub mod contact;

/// `Json` whose rejection is rendered as an [`ApiError`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `Query` whose rejection is rendered as an [`ApiError`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);
