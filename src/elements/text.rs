use serde_json::{json, Value};

/// Convert plain-text TLE content (2-line or 3-line blocks, as served by
/// catalog text endpoints or stored in `.tle` files) into element records.
pub fn parse_tle_text(content: &str) -> Vec<Value> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut records = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            records.push(json!({
                "TLE_LINE1": lines[i],
                "TLE_LINE2": lines[i + 1],
            }));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            records.push(json!({
                "OBJECT_NAME": lines[i].strip_prefix("0 ").unwrap_or(lines[i]),
                "TLE_LINE1": lines[i + 1],
                "TLE_LINE2": lines[i + 2],
            }));
            i += 3;
        } else {
            log::warn!("Skipping unrecognised TLE text line: {}", lines[i]);
            i += 1;
        }
    }

    records
}
