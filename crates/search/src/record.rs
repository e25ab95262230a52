//! Inventory records and the in-memory dataset.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::normalize::normalize_optional;

/// The four columns every inventory table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Field {
    /// Part code (not guaranteed unique)
    Code,
    /// Free-text description
    Description,
    /// Storage location
    Location,
    /// Category, from a small open set
    Category,
}

impl Field {
    /// All fields in canonical column order.
    pub const ALL: [Field; 4] = [
        Field::Code,
        Field::Description,
        Field::Location,
        Field::Category,
    ];

    /// Canonical (title-cased) column header.
    pub fn header(self) -> &'static str {
        match self {
            Field::Code => "Codice",
            Field::Description => "Descrizione",
            Field::Location => "Ubicazione",
            Field::Category => "Categoria",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Normalized copies of a record's fields, computed once at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFields {
    pub code: String,
    pub description: String,
    pub location: String,
    pub category: String,
}

/// One inventory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Part code
    pub code: String,
    /// Description as shown to the user
    pub description: String,
    /// Storage location
    pub location: String,
    /// Category
    pub category: String,
    #[serde(skip)]
    normalized: NormalizedFields,
}

impl Record {
    /// Build a record from raw values. Absent values become empty strings.
    pub fn new(
        code: Option<&str>,
        description: Option<&str>,
        location: Option<&str>,
        category: Option<&str>,
    ) -> Self {
        let normalized = NormalizedFields {
            code: normalize_optional(code),
            description: normalize_optional(description),
            location: normalize_optional(location),
            category: normalize_optional(category),
        };

        Self {
            code: code.unwrap_or_default().to_string(),
            description: description.unwrap_or_default().to_string(),
            location: location.unwrap_or_default().to_string(),
            category: category.unwrap_or_default().to_string(),
            normalized,
        }
    }

    /// Cached normalized fields.
    #[inline]
    pub fn normalized(&self) -> &NormalizedFields {
        &self.normalized
    }

    /// Raw display value of a field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Code => &self.code,
            Field::Description => &self.description,
            Field::Location => &self.location,
            Field::Category => &self.category,
        }
    }
}

/// Ordered, immutable collection of records loaded for a session.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Wrap records, keeping their order.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// All records in source order.
    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct non-blank categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.category.trim())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_normalizes_once() {
        let record = Record::new(Some(" C-100 "), Some("Pèrno FILETTATO"), Some("A1"), None);
        assert_eq!(record.normalized().code, "c-100");
        assert_eq!(record.normalized().description, "perno filettato");
        assert_eq!(record.normalized().category, "");
        assert_eq!(record.description, "Pèrno FILETTATO");
    }

    #[test]
    fn test_absent_values_are_empty() {
        let record = Record::new(None, None, None, None);
        assert_eq!(record.code, "");
        assert_eq!(record.normalized(), &NormalizedFields::default());
    }

    #[test]
    fn test_categories_sorted_distinct() {
        let dataset: Dataset = [
            Record::new(Some("1"), None, None, Some("Motori")),
            Record::new(Some("2"), None, None, Some("Filtri")),
            Record::new(Some("3"), None, None, Some("Motori")),
            Record::new(Some("4"), None, None, Some("  ")),
        ]
        .into_iter()
        .collect();

        assert_eq!(dataset.categories(), vec!["Filtri", "Motori"]);
    }

    #[test]
    fn test_field_headers() {
        let headers: Vec<_> = Field::ALL.iter().map(|f| f.header()).collect();
        assert_eq!(headers, vec!["Codice", "Descrizione", "Ubicazione", "Categoria"]);
    }
}
