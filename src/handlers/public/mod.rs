// handlers/public/mod.rs - Public handlers (no session required)
//
// Liveness, the sign-in landing page, published blog posts and the identity
// provider's webhook endpoint.
//
// Security Level: None, or the shared webhook secret
// Route Prefix: /, /health, /sign-in, /api/blog/*, /api/webhooks/*

pub mod blog;
pub mod health;
pub mod sign_in;
pub mod webhooks;

pub use blog::{list as blog_list, show as blog_show};
pub use health::{health, root};
pub use sign_in::sign_in_page;
pub use webhooks::identity as identity_webhook;
