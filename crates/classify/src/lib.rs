//! Heuristic product classification.
//!
//! Pure functions that decide top-level category membership from the feed's
//! free-text fields. The feed has no authoritative category column, so
//! membership is keyword containment: a rule matches when its keyword and
//! the field value contain each other in either direction, minus negative
//! keywords. Everything is compared lowercase and trimmed.

use distripet_model::ProductRecord;
use distripet_taxonomy::{MatchRule, Taxonomy, TaxonomyNode};

/// Normalize text for comparison: lowercase, trimmed.
///
/// The same normalization is used for rule keywords and for the exact
/// equality filtering at the subcategory and brand levels.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Evaluate one keyword predicate against a record.
///
/// An empty field value never matches, whatever the keyword; containment is
/// checked both ways to tolerate the feed writing either the longer or the
/// shorter form of a brand.
pub fn rule_matches(rule: &MatchRule, product: &ProductRecord) -> bool {
    let field = normalize(rule.field.value_of(product));
    if field.is_empty() {
        return false;
    }

    let keyword = normalize(&rule.keyword);
    if keyword.is_empty() {
        return false;
    }

    if !field.contains(&keyword) && !keyword.contains(&field) {
        return false;
    }

    !rule
        .negative_keywords
        .iter()
        .any(|negative| field.contains(&normalize(negative)))
}

/// Whether a record belongs to a category node: OR across its rules.
pub fn matches_node(node: &TaxonomyNode, product: &ProductRecord) -> bool {
    node.rules.iter().any(|rule| rule_matches(rule, product))
}

/// Whether a record belongs to the named top-level category.
///
/// Records without brand and name classify into nothing; an id the taxonomy
/// doesn't declare is simply "no match".
pub fn classify(taxonomy: &Taxonomy, product: &ProductRecord, category_id: &str) -> bool {
    if !product.is_classifiable() {
        return false;
    }
    match taxonomy.node(category_id) {
        Some(node) => matches_node(node, product),
        None => false,
    }
}

/// The first-declared category that claims a record.
///
/// Rules are not disjoint across categories, so a record can satisfy several
/// of them; single-category consumers resolve the overlap by declaration
/// order. Disjointness itself is a taxonomy-asset concern.
pub fn primary_category<'a>(taxonomy: &'a Taxonomy, product: &ProductRecord) -> Option<&'a str> {
    if !product.is_classifiable() {
        return None;
    }
    taxonomy
        .nodes()
        .iter()
        .find(|node| matches_node(node, product))
        .map(|node| node.id.as_str())
}
