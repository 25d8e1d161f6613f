//! Entrant ingestion for hosts
//!
//! Normalizes follower exports (JSON arrays or simple `name,image` CSV) into
//! `{name, image}` records. The simulation core only ever sees the normalized
//! form.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// A normalized entrant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub name: String,
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Raw export row; several exporters name the same fields differently
#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    name: Option<String>,
    full_name: Option<String>,
    username: Option<String>,
    pk: Option<Value>,
    id: Option<Value>,
    image: Option<String>,
    profile_pic_url: Option<String>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn id_label(v: Option<Value>) -> Option<String> {
    match v? {
        Value::String(s) => non_empty(Some(s)),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn placeholder_name(index: usize) -> String {
    format!("Follower {}", index + 1)
}

impl RawRecord {
    fn normalize(self, index: usize) -> RosterRecord {
        let username = non_empty(self.username);
        let name = non_empty(self.name)
            .or_else(|| non_empty(self.full_name))
            .or_else(|| username.clone())
            .or_else(|| id_label(self.pk))
            .or_else(|| id_label(self.id))
            .unwrap_or_else(|| placeholder_name(index));
        let image = non_empty(self.image).or_else(|| non_empty(self.profile_pic_url));
        RosterRecord {
            name,
            image,
            username,
        }
    }
}

fn require_entrants(records: Vec<RosterRecord>) -> Result<Vec<RosterRecord>> {
    if records.is_empty() {
        return Err(Error::EmptyRoster);
    }
    Ok(records)
}

/// Parse a JSON array of follower records
pub fn parse_roster_json(json: &str) -> Result<Vec<RosterRecord>> {
    let raw: Vec<RawRecord> = serde_json::from_str(json)?;
    require_entrants(
        raw.into_iter()
            .enumerate()
            .map(|(i, r)| r.normalize(i))
            .collect(),
    )
}

/// Parse CSV with a header row containing `name` and/or `image` columns
pub fn parse_roster_csv(text: &str) -> Result<Vec<RosterRecord>> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let Some(header) = lines.next() else {
        return Err(Error::EmptyRoster);
    };
    let columns: Vec<String> = header.split(',').map(|c| c.trim().to_lowercase()).collect();
    let name_col = columns.iter().position(|c| c == "name");
    let image_col = columns.iter().position(|c| c == "image");

    let records = lines
        .enumerate()
        .map(|(i, line)| {
            let cells: Vec<&str> = line.split(',').collect();
            let cell = |col: Option<usize>| {
                col.and_then(|c| cells.get(c))
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            };
            RosterRecord {
                name: cell(name_col).unwrap_or_else(|| placeholder_name(i)),
                image: cell(image_col),
                username: None,
            }
        })
        .collect();
    require_entrants(records)
}

/// Load a roster file, choosing the parser by extension (`.csv`, else JSON)
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<RosterRecord>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let records = if is_csv {
        parse_roster_csv(&text)?
    } else {
        parse_roster_json(&text)?
    };
    log::info!("Loaded {} entrants from {}", records.len(), path.display());
    Ok(records)
}

/// Placeholder entrants for demos and tests
pub fn sample_roster(count: usize) -> Vec<RosterRecord> {
    (0..count)
        .map(|i| RosterRecord {
            name: placeholder_name(i),
            image: Some(format!("https://picsum.photos/seed/fbr-{i}/128")),
            username: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_name_fallbacks() {
        let json = r#"[
            { "name": "Ana", "image": "a.png" },
            { "full_name": "Bo Li", "profile_pic_url": "b.png", "username": "boli" },
            { "username": "cee" },
            { "pk": 12345 },
            { "name": "  " }
        ]"#;
        let roster = parse_roster_json(json).unwrap();
        assert_eq!(roster.len(), 5);
        assert_eq!(roster[0].name, "Ana");
        assert_eq!(roster[0].image.as_deref(), Some("a.png"));
        assert_eq!(roster[1].name, "Bo Li");
        assert_eq!(roster[1].image.as_deref(), Some("b.png"));
        assert_eq!(roster[1].username.as_deref(), Some("boli"));
        assert_eq!(roster[2].name, "cee");
        assert_eq!(roster[3].name, "12345");
        assert_eq!(roster[4].name, "Follower 5");
        assert_eq!(roster[4].image, None);
    }

    #[test]
    fn test_csv_columns() {
        let csv = "Name,Image,followers\nAna,a.png,10\n,b.png,3\n\nCee,,1\n";
        let roster = parse_roster_csv(csv).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0].name, "Ana");
        assert_eq!(roster[1].name, "Follower 2");
        assert_eq!(roster[1].image.as_deref(), Some("b.png"));
        assert_eq!(roster[2].image, None);
    }

    #[test]
    fn test_empty_rosters_rejected() {
        assert!(matches!(parse_roster_json("[]"), Err(Error::EmptyRoster)));
        assert!(matches!(parse_roster_csv("name,image\n"), Err(Error::EmptyRoster)));
        assert!(matches!(parse_roster_json("{}"), Err(Error::Json(_))));
    }

    #[test]
    fn test_sample_roster() {
        let roster = sample_roster(3);
        assert_eq!(roster[2].name, "Follower 3");
        assert!(roster.iter().all(|r| r.image.is_some()));
    }
}
