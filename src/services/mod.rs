//! # Services Module
//!
//! Business logic that sits between the HTTP handlers and the store/AI
//! collaborators: the roadmap progress controller and outbound mail.

pub mod mailer;
pub mod roadmap;

pub use mailer::Mailer;
pub use roadmap::{RoadmapController, RoadmapLookup};
