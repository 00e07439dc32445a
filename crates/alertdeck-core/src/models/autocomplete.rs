use serde::{Deserialize, Serialize};

/// Filter hint offered to the user while typing a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Autocomplete {
    /// Full filter expression, e.g. `cluster=dev`.
    pub value: String,
    /// Fragments the hint should match on.
    pub tokens: Vec<String>,
}
