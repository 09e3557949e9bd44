//! Core domain model for the distripet catalog.
//!
//! This crate defines the fundamental types used throughout the system:
//! - `ProductRecord`: one product row from the distribution feed
//! - `Audience`: which catalog is being browsed (`vet` or `pet`)
//! - `SelectionPath`: the current drill-down position, 0 to 3 levels deep
//! - `CategoryStat`: per-category badge counts for sidebar rendering

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Catalog audience.
///
/// Veterinary clinics and pet shops browse the same product feed through
/// independent taxonomies; nothing is shared between the two even when
/// category ids happen to coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// Veterinary clinics
    Vet,
    /// Pet shops
    Pet,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vet => "vet",
            Self::Pet => "pet",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a session hands the core an audience tag it doesn't know.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown audience '{0}', expected 'vet' or 'pet'")]
pub struct AudienceParseError(String);

impl FromStr for Audience {
    type Err = AudienceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vet" => Ok(Self::Vet),
            "pet" => Ok(Self::Pet),
            other => Err(AudienceParseError(other.to_string())),
        }
    }
}

/// A product row from the distribution feed.
///
/// The feed carries no hierarchical taxonomy: `brand` is the only reliable
/// classifying field (historically overloaded as description and even as
/// category), and `subcategory_signal` is filled only for part of the
/// assortment. All classification downstream works off these two strings
/// plus `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Opaque unique identifier assigned by the feed
    pub id: String,

    /// Free-text product name
    #[serde(default)]
    pub name: String,

    /// Free-text brand/laboratory label
    #[serde(default)]
    pub brand: String,

    /// Specific-category label when the feed operator filled one, else empty
    #[serde(default)]
    pub subcategory_signal: String,

    /// List price; consulted by pricing/visibility subsystems, never by
    /// classification
    #[serde(default)]
    pub price: f64,

    /// Units on hand; same caveat as `price`
    #[serde(default)]
    pub stock: u32,
}

impl ProductRecord {
    /// Create a minimal record for testing.
    pub fn new(id: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            brand: brand.into(),
            subcategory_signal: String::new(),
            price: 0.0,
            stock: 0,
        }
    }

    /// Whether the record carries any text a classifier could work with.
    ///
    /// Records with neither brand nor name belong to no category; they still
    /// appear in the unfiltered, path-less product list.
    pub fn is_classifiable(&self) -> bool {
        !self.brand.trim().is_empty() || !self.name.trim().is_empty()
    }
}

/// Hard depth limit of a drill-down path: top category, subcategory, brand.
pub const MAX_DEPTH: usize = 3;

/// Errors from building or extending a [`SelectionPath`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("selection path is limited to {MAX_DEPTH} levels")]
    DepthExceeded,
}

/// The user's current drill-down position.
///
/// An empty path is the catalog root; each appended segment narrows the
/// selection by one level. Paths deeper than [`MAX_DEPTH`] are
/// unrepresentable, including through deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SelectionPath(Vec<String>);

impl SelectionPath {
    /// The empty path: no filters applied.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = Self::root();
        for segment in segments {
            path.push(segment)?;
        }
        Ok(path)
    }

    /// Append one level ("select option").
    pub fn push(&mut self, segment: impl Into<String>) -> Result<(), PathError> {
        if self.0.len() >= MAX_DEPTH {
            return Err(PathError::DepthExceeded);
        }
        self.0.push(segment.into());
        Ok(())
    }

    /// Drop the deepest level ("go back"). Returns `None` at the root.
    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    /// Reset to the catalog root ("clear").
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, level: usize) -> Option<&str> {
        self.0.get(level).map(String::as_str)
    }

    /// A copy of this path extended by one segment, used when probing
    /// candidate options without mutating the caller's position.
    pub fn child(&self, segment: impl Into<String>) -> Result<Self, PathError> {
        let mut next = self.clone();
        next.push(segment)?;
        Ok(next)
    }
}

impl TryFrom<Vec<String>> for SelectionPath {
    type Error = PathError;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_segments(segments)
    }
}

impl From<SelectionPath> for Vec<String> {
    fn from(path: SelectionPath) -> Self {
        path.0
    }
}

/// Sidebar badge row: one top-level category and how many products land in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    /// Stable category slug (e.g. `alimento-perro`)
    pub id: String,

    /// Human label declared by the taxonomy
    pub display_name: String,

    /// Number of feed products classified into this category
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_from_str() {
        assert_eq!("vet".parse::<Audience>().unwrap(), Audience::Vet);
        assert_eq!("PET".parse::<Audience>().unwrap(), Audience::Pet);
        assert_eq!(" Vet ".parse::<Audience>().unwrap(), Audience::Vet);
        assert!("wholesale".parse::<Audience>().is_err());
    }

    #[test]
    fn test_record_serialization() {
        let record = ProductRecord::new("P-001", "Manada");
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ProductRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, "P-001");
        assert_eq!(parsed.brand, "Manada");
    }

    #[test]
    fn test_record_tolerant_decoding() {
        // Feed rows often omit everything but the id.
        let parsed: ProductRecord = serde_json::from_str(r#"{"id":"P-002"}"#).unwrap();
        assert_eq!(parsed.brand, "");
        assert_eq!(parsed.subcategory_signal, "");
        assert_eq!(parsed.stock, 0);
        assert!(!parsed.is_classifiable());
    }

    #[test]
    fn test_is_classifiable() {
        let mut record = ProductRecord::new("P-003", "");
        assert!(!record.is_classifiable());
        record.name = "Collar antipulgas".to_string();
        assert!(record.is_classifiable());
    }

    #[test]
    fn test_path_depth_limit() {
        let mut path = SelectionPath::root();
        path.push("alimento-perro").unwrap();
        path.push("economico").unwrap();
        path.push("manada").unwrap();
        assert_eq!(path.depth(), 3);
        assert_eq!(path.push("extra"), Err(PathError::DepthExceeded));
    }

    #[test]
    fn test_path_transitions() {
        let mut path = SelectionPath::from_segments(["alimento-perro", "economico"]).unwrap();
        assert_eq!(path.get(1), Some("economico"));
        assert_eq!(path.pop(), Some("economico".to_string()));
        path.clear();
        assert!(path.is_root());
        assert_eq!(path.pop(), None);
    }

    #[test]
    fn test_path_child_does_not_mutate() {
        let path = SelectionPath::from_segments(["alimento-perro"]).unwrap();
        let child = path.child("economico").unwrap();
        assert_eq!(path.depth(), 1);
        assert_eq!(child.depth(), 2);
    }

    #[test]
    fn test_path_deserialization_enforces_depth() {
        let ok: SelectionPath = serde_json::from_str(r#"["a","b","c"]"#).unwrap();
        assert_eq!(ok.depth(), 3);
        let too_deep = serde_json::from_str::<SelectionPath>(r#"["a","b","c","d"]"#);
        assert!(too_deep.is_err());
    }
}
