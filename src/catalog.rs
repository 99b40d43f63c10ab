use crate::core::AccentColors;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExhibitStatus {
    Available,
    ComingSoon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Metadata record supplied by each exhibit.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ExhibitMeta {
    pub id: u32,
    pub name: String,
    pub title: String,
    pub year: u16,
    pub status: ExhibitStatus,
    pub difficulty: Difficulty,
    pub duration_minutes: u16,
    pub layer: String,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<u32>,
    pub accents: AccentColors,
    pub description: String,
}

/// Query surface consumed by navigation UI. Read-only over a fixed set of
/// metadata records.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<ExhibitMeta>,
}

impl Catalog {
    pub fn new(entries: Vec<ExhibitMeta>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ExhibitMeta] {
        &self.entries
    }

    pub fn by_id(&self, id: u32) -> Option<&ExhibitMeta> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn available(&self) -> impl Iterator<Item = &ExhibitMeta> {
        self.entries
            .iter()
            .filter(|e| e.status == ExhibitStatus::Available)
    }

    pub fn by_layer<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a ExhibitMeta> {
        self.entries
            .iter()
            .filter(move |e| e.layer.eq_ignore_ascii_case(layer))
    }

    /// Substring match over id/name/title/layer, falling back to an in-order
    /// subsequence match so partial typing like "tnsmsn" still finds
    /// "transmission".
    pub fn search<'a>(&'a self, query: &str) -> Vec<&'a ExhibitMeta> {
        let q = query.trim().to_ascii_lowercase();
        if q.is_empty() {
            return self.entries.iter().collect();
        }

        let mut hits: Vec<&ExhibitMeta> = self
            .entries
            .iter()
            .filter(|e| {
                e.id.to_string().contains(&q)
                    || e.name.to_ascii_lowercase().contains(&q)
                    || e.title.to_ascii_lowercase().contains(&q)
                    || e.layer.to_ascii_lowercase().contains(&q)
            })
            .collect();

        if hits.is_empty() {
            hits = self
                .entries
                .iter()
                .filter(|e| {
                    is_subsequence(&q, &e.name.to_ascii_lowercase())
                        || is_subsequence(&q, &e.title.to_ascii_lowercase())
                })
                .collect();
        }

        hits
    }
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut chars = haystack.chars();
    needle.chars().all(|n| chars.any(|h| h == n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: u32, name: &str, title: &str, layer: &str, status: ExhibitStatus) -> ExhibitMeta {
        ExhibitMeta {
            id,
            name: name.to_string(),
            title: title.to_string(),
            year: 2022,
            status,
            difficulty: Difficulty::Beginner,
            duration_minutes: 12,
            layer: layer.to_string(),
            concepts: vec![],
            prerequisites: vec![],
            accents: AccentColors::default(),
            description: String::new(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            meta(
                9293,
                "tcp",
                "Transmission Control Protocol",
                "transport",
                ExhibitStatus::Available,
            ),
            meta(
                4271,
                "bgp",
                "Border Gateway Protocol",
                "routing",
                ExhibitStatus::Available,
            ),
            meta(
                9000,
                "quic",
                "QUIC",
                "transport",
                ExhibitStatus::ComingSoon,
            ),
        ])
    }

    #[test]
    fn by_id_finds_exact_record() {
        let c = catalog();
        assert_eq!(c.by_id(4271).unwrap().name, "bgp");
        assert!(c.by_id(1).is_none());
    }

    #[test]
    fn available_filters_out_coming_soon() {
        let c = catalog();
        let ids: Vec<u32> = c.available().map(|e| e.id).collect();
        assert_eq!(ids, vec![9293, 4271]);
    }

    #[test]
    fn by_layer_is_case_insensitive() {
        let c = catalog();
        assert_eq!(c.by_layer("Transport").count(), 2);
        assert_eq!(c.by_layer("routing").count(), 1);
    }

    #[test]
    fn search_matches_substring_on_title_and_id() {
        let c = catalog();
        assert_eq!(c.search("gateway")[0].name, "bgp");
        assert_eq!(c.search("9293")[0].name, "tcp");
    }

    #[test]
    fn search_falls_back_to_subsequence() {
        let c = catalog();
        let hits = c.search("tnsmsn");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "tcp");
    }

    #[test]
    fn empty_query_returns_everything() {
        let c = catalog();
        assert_eq!(c.search("  ").len(), 3);
    }
}
