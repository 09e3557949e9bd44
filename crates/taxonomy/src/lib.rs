//! Per-audience taxonomy configuration.
//!
//! Only the top level of the catalog hierarchy is declared here: each
//! category carries keyword rules that decide membership from the feed's
//! free-text fields. Subcategories and brands are never declared — they are
//! discovered from whatever strings the matching products actually carry.
//!
//! The taxonomy is a plain data value injected into the engine, so each
//! audience gets its own independent instance and tests can build throwaway
//! tables without touching the shipped ones.

use distripet_model::{Audience, ProductRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which product field a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    Brand,
    Name,
    SubcategorySignal,
}

impl MatchField {
    /// The raw field value on a record, before any normalization.
    pub fn value_of<'a>(&self, product: &'a ProductRecord) -> &'a str {
        match self {
            Self::Brand => &product.brand,
            Self::Name => &product.name,
            Self::SubcategorySignal => &product.subcategory_signal,
        }
    }
}

/// One keyword predicate of a category.
///
/// A rule matches when its keyword and the field value contain each other in
/// either direction, and none of the negative keywords appear in that same
/// field. Negatives exist to split overloaded brand vocabulary, e.g. a
/// "pharma" rule that must not swallow "leon pharma" products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRule {
    pub field: MatchField,

    pub keyword: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub negative_keywords: Vec<String>,
}

impl MatchRule {
    pub fn new(field: MatchField, keyword: impl Into<String>) -> Self {
        Self {
            field,
            keyword: keyword.into(),
            negative_keywords: Vec::new(),
        }
    }

    pub fn with_negatives<I, S>(mut self, negatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.negative_keywords = negatives.into_iter().map(Into::into).collect();
        self
    }
}

/// A declared top-level category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyNode {
    /// Stable slug used in selection paths (e.g. `alimento-perro`)
    pub id: String,

    /// Human label for sidebars and breadcrumbs
    pub display_name: String,

    /// Membership predicates, OR-ed together
    pub rules: Vec<MatchRule>,
}

impl TaxonomyNode {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        rules: Vec<MatchRule>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            rules,
        }
    }
}

/// Errors from taxonomy construction or asset loading.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("taxonomy for '{0}' declares no categories")]
    Empty(Audience),

    #[error("duplicate category id '{0}'")]
    DuplicateCategory(String),

    #[error("category '{0}' has a rule with a blank keyword")]
    BlankKeyword(String),

    #[error("invalid taxonomy document: {0}")]
    Parse(#[from] serde_json::Error),
}

// Serde shadow for the versioned, human-edited JSON asset.
#[derive(Serialize, Deserialize)]
struct TaxonomyDoc {
    audience: Audience,
    categories: Vec<TaxonomyNode>,
}

/// An audience's complete, ordered top-level category set.
///
/// Declaration order is meaningful twice over: it is the sidebar order, and
/// it is the documented tie-break when a product matches more than one
/// category.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    audience: Audience,
    nodes: Vec<TaxonomyNode>,
}

impl Taxonomy {
    /// Build a validated taxonomy. Rejects empty tables, duplicate ids and
    /// blank keywords; anything else the editors wrote stands as-is.
    pub fn new(audience: Audience, nodes: Vec<TaxonomyNode>) -> Result<Self, TaxonomyError> {
        if nodes.is_empty() {
            return Err(TaxonomyError::Empty(audience));
        }
        for (i, node) in nodes.iter().enumerate() {
            if nodes[..i].iter().any(|earlier| earlier.id == node.id) {
                return Err(TaxonomyError::DuplicateCategory(node.id.clone()));
            }
            if node.rules.iter().any(|rule| rule.keyword.trim().is_empty()) {
                return Err(TaxonomyError::BlankKeyword(node.id.clone()));
            }
        }
        Ok(Self { audience, nodes })
    }

    /// Load a taxonomy from its JSON asset and run the same validation as
    /// [`Taxonomy::new`].
    pub fn from_json(text: &str) -> Result<Self, TaxonomyError> {
        let doc: TaxonomyDoc = serde_json::from_str(text)?;
        Self::new(doc.audience, doc.categories)
    }

    /// Serialize back into the asset format.
    pub fn to_json(&self) -> Result<String, TaxonomyError> {
        let doc = TaxonomyDoc {
            audience: self.audience,
            categories: self.nodes.clone(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    pub fn audience(&self) -> Audience {
        self.audience
    }

    pub fn nodes(&self) -> &[TaxonomyNode] {
        &self.nodes
    }

    /// Category ids in declaration order.
    pub fn category_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.id.as_str())
    }

    pub fn node(&self, id: &str) -> Option<&TaxonomyNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.node(id).map(|node| node.display_name.as_str())
    }

    /// The shipped table for an audience.
    pub fn builtin(audience: Audience) -> Self {
        let nodes = match audience {
            Audience::Vet => vet_nodes(),
            Audience::Pet => pet_nodes(),
        };
        Self::new(audience, nodes).expect("builtin taxonomy is valid")
    }
}

fn brand(keyword: &str) -> MatchRule {
    MatchRule::new(MatchField::Brand, keyword)
}

fn name(keyword: &str) -> MatchRule {
    MatchRule::new(MatchField::Name, keyword)
}

fn vet_nodes() -> Vec<TaxonomyNode> {
    vec![
        TaxonomyNode::new(
            "alimento-perro",
            "Alimento Perro",
            vec![
                brand("manada"),
                brand("old prince"),
                brand("sieger").with_negatives(["sieger cat"]),
                name("perro").with_negatives(["gato"]),
            ],
        ),
        TaxonomyNode::new(
            "alimento-gato",
            "Alimento Gato",
            vec![brand("feline"), brand("sieger cat"), name("gato")],
        ),
        TaxonomyNode::new(
            "farmacia",
            "Farmacia",
            vec![
                brand("leon pharma"),
                brand("zoetis"),
                brand("holliday"),
                brand("labyes"),
                brand("ruminal"),
            ],
        ),
        TaxonomyNode::new(
            "descartables",
            "Descartables",
            vec![
                brand("pharma").with_negatives(["leon pharma"]),
                brand("descartable"),
                name("jeringa"),
                name("guante"),
            ],
        ),
        TaxonomyNode::new(
            "instrumental",
            "Instrumental",
            vec![brand("instrumental"), name("tijera"), name("pinza")],
        ),
        TaxonomyNode::new(
            "accesorios",
            "Accesorios",
            vec![brand("accesorio"), name("collar"), name("correa")],
        ),
    ]
}

fn pet_nodes() -> Vec<TaxonomyNode> {
    vec![
        TaxonomyNode::new(
            "alimento-perro",
            "Alimento Perro",
            vec![
                brand("manada"),
                brand("old prince"),
                brand("sieger").with_negatives(["sieger cat"]),
                name("perro").with_negatives(["gato"]),
            ],
        ),
        TaxonomyNode::new(
            "alimento-gato",
            "Alimento Gato",
            vec![brand("feline"), brand("sieger cat"), name("gato")],
        ),
        TaxonomyNode::new(
            "juguetes",
            "Juguetes",
            vec![brand("kong"), name("juguete"), name("pelota")],
        ),
        TaxonomyNode::new(
            "accesorios",
            "Accesorios",
            vec![brand("accesorio"), name("collar"), name("correa"), name("cucha")],
        ),
        TaxonomyNode::new(
            "higiene",
            "Higiene",
            vec![brand("osspret"), name("shampoo"), name("piedras")],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_validate() {
        let vet = Taxonomy::builtin(Audience::Vet);
        let pet = Taxonomy::builtin(Audience::Pet);
        assert_eq!(vet.audience(), Audience::Vet);
        assert_eq!(pet.audience(), Audience::Pet);
        assert!(vet.category_ids().count() > pet.category_ids().count());
    }

    #[test]
    fn test_declaration_order_preserved() {
        let vet = Taxonomy::builtin(Audience::Vet);
        let ids: Vec<_> = vet.category_ids().collect();
        assert_eq!(ids[0], "alimento-perro");
        assert_eq!(ids[1], "alimento-gato");
        assert!(ids.contains(&"descartables"));
    }

    #[test]
    fn test_node_lookup() {
        let vet = Taxonomy::builtin(Audience::Vet);
        assert_eq!(vet.display_name("farmacia"), Some("Farmacia"));
        assert!(vet.node("no-such-category").is_none());
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let nodes = vec![
            TaxonomyNode::new("alimento-perro", "Alimento Perro", vec![brand("manada")]),
            TaxonomyNode::new("alimento-perro", "Alimento Perro Bis", vec![brand("sieger")]),
        ];
        assert!(matches!(
            Taxonomy::new(Audience::Vet, nodes),
            Err(TaxonomyError::DuplicateCategory(id)) if id == "alimento-perro"
        ));
    }

    #[test]
    fn test_blank_keyword_rejected() {
        let nodes = vec![TaxonomyNode::new(
            "farmacia",
            "Farmacia",
            vec![brand("   ")],
        )];
        assert!(matches!(
            Taxonomy::new(Audience::Vet, nodes),
            Err(TaxonomyError::BlankKeyword(id)) if id == "farmacia"
        ));
    }

    #[test]
    fn test_empty_taxonomy_rejected() {
        assert!(matches!(
            Taxonomy::new(Audience::Pet, Vec::new()),
            Err(TaxonomyError::Empty(Audience::Pet))
        ));
    }

    #[test]
    fn test_json_asset_round_trip() {
        let original = Taxonomy::builtin(Audience::Vet);
        let text = original.to_json().unwrap();
        let loaded = Taxonomy::from_json(&text).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_json_asset_validation() {
        let doc = r#"{
            "audience": "vet",
            "categories": [
                {"id": "farmacia", "display_name": "Farmacia",
                 "rules": [{"field": "brand", "keyword": ""}]}
            ]
        }"#;
        assert!(matches!(
            Taxonomy::from_json(doc),
            Err(TaxonomyError::BlankKeyword(_))
        ));
    }

    #[test]
    fn test_value_of() {
        let mut product = ProductRecord::new("P-1", "Zoetis");
        product.name = "Vacuna triple".to_string();
        product.subcategory_signal = "vacunas".to_string();
        assert_eq!(MatchField::Brand.value_of(&product), "Zoetis");
        assert_eq!(MatchField::Name.value_of(&product), "Vacuna triple");
        assert_eq!(MatchField::SubcategorySignal.value_of(&product), "vacunas");
    }
}
