//! Backend for a personal portfolio site.
//!
//! - [`chat`]: relay between the site's chat widget and an upstream LLM.
//! - [`api`]: Axum router, handlers and error mapping.
//! - [`site`]: sitemap and robots.txt rendering.
//! - [`config`]: environment-driven configuration.

pub mod api;
pub mod chat;
pub mod config;
pub mod site;
