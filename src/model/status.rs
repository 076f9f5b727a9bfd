use indexmap::IndexMap;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A named status with its display color (`#RRGGBB`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub name: String,
    pub color: String,
}

impl Status {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Status {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Colors assigned to statuses discovered during import, cycling
pub const PASTEL_COLORS: [&str; 10] = [
    "#FFB3BA", "#FFDFBA", "#FFFFBA", "#BAFFC9", "#BAE1FF", "#E2CFCF", "#C9C9FF", "#D4A5A5",
    "#FFD1DC", "#B2B2B2",
];

/// Palette color for the i-th discovered status (wraps)
pub fn pastel_color(i: usize) -> &'static str {
    PASTEL_COLORS[i % PASTEL_COLORS.len()]
}

/// Ordered status palette. Position is meaning: index 0 is the least
/// advanced status and ranks grow from there, so aggregation compares
/// statuses by their index here.
///
/// Serializes as a JSON array of `{name, color}`. Deserialization also
/// accepts an object keyed by stringified indexes (`{"0": {...}}`), a
/// shape older exports used for the statuses field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRegistry {
    colors: IndexMap<String, String>,
}

impl Default for StatusRegistry {
    fn default() -> Self {
        StatusRegistry::from_statuses(vec![
            Status::new("To Do", "#FFB3BA"),
            Status::new("In Progress", "#FFDFBA"),
            Status::new("Done", "#FFFFBA"),
            Status::new("Closed", "#BAFFC9"),
        ])
    }
}

impl StatusRegistry {
    /// Empty registry (no statuses at all)
    pub fn empty() -> Self {
        StatusRegistry {
            colors: IndexMap::new(),
        }
    }

    /// Build from an ordered status list. A repeated name keeps its first
    /// position and takes the last color seen.
    pub fn from_statuses(statuses: Vec<Status>) -> Self {
        let mut colors = IndexMap::new();
        for s in statuses {
            colors.insert(s.name, s.color);
        }
        StatusRegistry { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Rank of a status name; lower = less advanced. Unknown names have
    /// no rank and aggregation treats them as ranking below nothing.
    pub fn rank(&self, name: &str) -> Option<usize> {
        self.colors.get_index_of(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.colors.contains_key(name)
    }

    pub fn color(&self, name: &str) -> Option<&str> {
        self.colors.get(name).map(String::as_str)
    }

    /// Name of the least advanced status, if any
    pub fn first_name(&self) -> Option<&str> {
        self.colors.keys().next().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<Status> {
        self.colors
            .get_index(index)
            .map(|(n, c)| Status::new(n.clone(), c.clone()))
    }

    /// Iterate `(name, color)` in rank order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colors.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }

    pub fn to_statuses(&self) -> Vec<Status> {
        self.colors
            .iter()
            .map(|(n, c)| Status::new(n.clone(), c.clone()))
            .collect()
    }

    /// Append a status. If the name already exists its color is updated
    /// in place and the rank does not change.
    pub fn push(&mut self, name: impl Into<String>, color: impl Into<String>) {
        self.colors.insert(name.into(), color.into());
    }

    /// Replace the status at `index`, keeping its rank. Returns false if
    /// the index is out of range.
    pub fn update_at(&mut self, index: usize, name: impl Into<String>, color: impl Into<String>) -> bool {
        if index >= self.colors.len() {
            return false;
        }
        let mut statuses = self.to_statuses();
        statuses[index] = Status::new(name, color);
        *self = StatusRegistry::from_statuses(statuses);
        true
    }

    /// Remove the status at `index`, shifting later ranks down. Returns
    /// false if the index is out of range.
    pub fn remove_at(&mut self, index: usize) -> bool {
        self.colors.shift_remove_index(index).is_some()
    }

    /// Discard all statuses and adopt `statuses` as the new palette
    pub fn replace_all(&mut self, statuses: Vec<Status>) {
        *self = StatusRegistry::from_statuses(statuses);
    }
}

impl Serialize for StatusRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.colors.iter().map(|(n, c)| Status::new(n.clone(), c.clone())))
    }
}

impl<'de> Deserialize<'de> for StatusRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(Vec<Status>),
            Indexed(IndexMap<String, Status>),
        }

        let statuses = match Repr::deserialize(deserializer)? {
            Repr::List(list) => list,
            Repr::Indexed(map) => {
                let mut entries: Vec<(usize, Status)> = Vec::with_capacity(map.len());
                for (key, status) in map {
                    let index: usize = key
                        .parse()
                        .map_err(|_| D::Error::custom(format!("non-numeric status index `{key}`")))?;
                    entries.push((index, status));
                }
                entries.sort_by_key(|(i, _)| *i);
                entries.into_iter().map(|(_, s)| s).collect()
            }
        };
        Ok(StatusRegistry::from_statuses(statuses))
    }
}
