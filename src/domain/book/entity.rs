use serde::{Deserialize, Deserializer, Serialize};

/// Opaque identifier assigned by the remote catalogue.
///
/// Servers disagree on whether ids are strings or numbers, so both decode
/// into the same textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BookId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => BookId(text),
            RawId::Number(number) => BookId(number.to_string()),
        })
    }
}

/// The content of a book record, without identity.
///
/// This is the payload sent on create/update and the result of a
/// successful form validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookDetails {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    pub genre: String,
    pub pages: u32,
    pub rating: f64,
    pub price: f64,
}

/// A persisted book. Always carries the id the remote service assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    #[serde(flatten)]
    pub details: BookDetails,
}

impl Book {
    pub fn new(id: BookId, details: BookDetails) -> Self {
        Self { id, details }
    }

    pub fn title(&self) -> &str {
        &self.details.title
    }
}
