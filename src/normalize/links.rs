use std::collections::HashSet;

use crate::roster::RawStudentRecord;
use crate::utils;

use super::Link;

/// Well-known site, portfolio and social keys, in display order.
pub const LINK_KEYS: [&str; 12] = [
    "clt_website",
    "charlotte",
    "charlotte_edu",
    "github",
    "githubio",
    "itis3135",
    "personal",
    "portfolio",
    "website",
    "freecodecamp",
    "codecademy",
    "linkedin",
];

/// Well-known keys first (the `links` map, then the record itself), then any
/// other `links` entries in the order they appear. Deduplicated by href.
pub fn gather_links(raw: &RawStudentRecord) -> Vec<Link> {
    let link_map = raw.get("links").and_then(|v| v.as_object());
    let mut seen: HashSet<String> = HashSet::new();
    let mut collected: Vec<Link> = Vec::new();

    let mut push = |key: &str, href: String| {
        if seen.insert(href.clone()) {
            collected.push(Link {
                key: key.to_string(),
                href,
            });
        }
    };

    for key in LINK_KEYS {
        let href = link_map
            .and_then(|m| utils::opt_text(m.get(key)))
            .or_else(|| utils::opt_text(raw.get(key)));
        if let Some(href) = href {
            push(key, href);
        }
    }

    if let Some(map) = link_map {
        for (key, value) in map {
            if let Some(href) = utils::text_value(value) {
                push(key.as_str(), href);
            }
        }
    }

    collected
}
