//! Bulk import parsing: free-form pasted text to (front, back) card pairs.
//!
//! One card per non-empty line. Candidate separators are tried in priority
//! order so that padded forms like `" - "` win over a bare `"-"` that may
//! appear inside a phrase. Lines that fail to parse are dropped without
//! error; this is a best-effort convenience, not a validating importer.

/// Candidate separators in priority order. The ordering is a designed
/// tie-break and must not be reordered: `"a-b - c"` splits on `" - "`
/// (front `"a-b"`), not on the bare `"-"`.
const SEPARATORS: [&str; 14] = [
    "\t", " - ", " — ", " | ", " ; ", ", ", " -", "- ", "-", "|", ";", ",", " —", "— ",
];

/// Parses multi-line input into ordered (front, back) pairs.
pub fn parse_pairs(input: &str) -> Vec<(String, String)> {
    input.lines().filter_map(parse_line).collect()
}

fn parse_line(raw: &str) -> Option<(String, String)> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    for sep in SEPARATORS {
        let parts: Vec<&str> = line.split(sep).collect();
        if parts.len() >= 2 {
            let front = parts[0].trim();
            // Everything after the first segment is the back, rejoined with
            // the same separator so later occurrences survive intact.
            let back = parts[1..].join(sep);
            let back = back.trim();
            if !front.is_empty() && !back.is_empty() {
                return Some((front.to_string(), back.to_string()));
            }
        }
    }

    None
}
