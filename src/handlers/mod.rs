// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no session) → Protected (session + project access) → Elevated (admin)
//
// Every tier sits behind the session middleware; the tiers differ in which
// guard their handlers extract.

pub mod page;

pub mod public;    // Tier 1: /, /health, /sign-in, /api/blog/*, /api/webhooks/*
pub mod protected; // Tier 2: /projects/*, /api/me, /api/projects/:id/*
pub mod elevated;  // Tier 3: /admin/*, /api/admin/*
