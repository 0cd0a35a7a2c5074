// middleware/route_matcher.rs - Coarse path classification applied before any handler runs
//
// The matcher only decides whether a session is required. Which actor may
// do what is decided by `access::policy`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Static assets and framework internals; bypass session handling entirely
    Excluded,
    Public,
    Protected,
}

const EXCLUDED_PREFIXES: &[&str] = &["/_next/", "/static/", "/assets/"];
const EXCLUDED_PATHS: &[&str] = &["/favicon.ico", "/robots.txt"];

/// Public routes; a trailing `*` matches the path itself and anything below it
const PUBLIC_ROUTES: &[&str] = &[
    "/",
    "/health",
    "/sign-in*",
    "/sign-up*",
    "/blog*",
    "/api/blog*",
    "/api/webhooks*",
];

pub fn classify(path: &str) -> RouteClass {
    if is_excluded(path) {
        return RouteClass::Excluded;
    }
    if PUBLIC_ROUTES.iter().any(|pattern| matches_pattern(pattern, path)) {
        return RouteClass::Public;
    }
    RouteClass::Protected
}

/// API paths answer with status codes; everything else is a page and gets redirects
pub fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

fn is_excluded(path: &str) -> bool {
    if EXCLUDED_PATHS.contains(&path) || EXCLUDED_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return true;
    }
    // Anything whose last segment carries a file extension is a static file
    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(stem, ext)| !stem.is_empty() && !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(false)
}

fn matches_pattern(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => {
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .map(|rest| rest.starts_with('/') || rest.starts_with('?'))
                    .unwrap_or(false)
        }
        None => path == pattern,
    }
}
