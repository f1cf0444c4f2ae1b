//! Best-effort CORS failure detection.
//!
//! This is a heuristic, not an origin policy. A response is flagged when its body mentions
//! `access-control` or `cors` in any casing. When strict mode is on, every non-`ok` response is
//! flagged as well. The keyword check always runs, whatever the strict setting.

const KEYWORDS: [&str; 2] = ["access-control", "cors"];

/// What triggered the heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorsSignal {
    /// Strict mode and a non-`ok` status
    NotOk,
    /// The body mentions one of the CORS keywords
    BodyKeyword,
}

pub fn detect(strict: bool, ok: bool, body: &str) -> Option<CorsSignal> {
    if strict && !ok {
        return Some(CorsSignal::NotOk);
    }

    let body = body.to_ascii_lowercase();
    if KEYWORDS.iter().any(|k| body.contains(k)) {
        return Some(CorsSignal::BodyKeyword);
    }
    None
}
