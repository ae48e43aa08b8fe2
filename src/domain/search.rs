use serde::{Deserialize, Serialize};

/// One hit from the external book-search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub info_link: Option<String>,
}

impl VolumeSummary {
    /// Authors joined for display, e.g. "Pratchett, Gaiman".
    pub fn byline(&self) -> String {
        self.authors.join(", ")
    }
}
