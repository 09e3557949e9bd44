//! Progressive drill-down navigation.
//!
//! Given a partial selection path, computes the valid next-level options and
//! the product count behind each one. The top level is static configuration;
//! the subcategory and brand levels are discovered from whichever strings
//! the currently-matching products carry, which is why two branches of the
//! catalog can expose completely different vocabularies.
//!
//! Counts are always computed by extending the path and re-filtering, so a
//! count can never disagree with what the caller sees after selecting that
//! option.

use std::collections::{BTreeMap, BTreeSet};

use distripet_classify::{matches_node, normalize};
use distripet_filter::apply_path;
use distripet_model::{CategoryStat, ProductRecord, SelectionPath};
use distripet_taxonomy::Taxonomy;

/// The next-level option identifiers for a path, or `None` when the branch
/// is terminal.
///
/// Depth 0 returns the declared category ids in declaration order, even for
/// categories nothing currently matches. Depths 1 and 2 return the distinct
/// non-empty normalized subcategory signals / brands of the filtered subset,
/// sorted lexicographically. Depth 3 is the hard limit.
pub fn options_at(
    taxonomy: &Taxonomy,
    products: &[ProductRecord],
    path: &SelectionPath,
) -> Option<Vec<String>> {
    match path.depth() {
        0 => Some(taxonomy.category_ids().map(str::to_string).collect()),
        1 => distinct_values(&apply_path(taxonomy, products, path), |p| &p.subcategory_signal),
        2 => distinct_values(&apply_path(taxonomy, products, path), |p| &p.brand),
        _ => None,
    }
}

/// Product count per option, keyed by option identifier.
///
/// `None` exactly when [`options_at`] is `None`. Each count is the length of
/// the subset the caller would get by appending that option to the path.
pub fn counts_at(
    taxonomy: &Taxonomy,
    products: &[ProductRecord],
    path: &SelectionPath,
) -> Option<BTreeMap<String, usize>> {
    let options = options_at(taxonomy, products, path)?;
    let mut counts = BTreeMap::new();
    for option in options {
        let extended = path
            .child(option.as_str())
            .expect("an option extends a non-terminal path");
        let count = apply_path(taxonomy, products, &extended).len();
        counts.insert(option, count);
    }
    Some(counts)
}

/// Whether no further drill-down exists below this path.
pub fn is_terminal(taxonomy: &Taxonomy, products: &[ProductRecord], path: &SelectionPath) -> bool {
    options_at(taxonomy, products, path).is_none()
}

/// Badge counts for every declared top-level category, in declaration order.
pub fn top_level_stats(taxonomy: &Taxonomy, products: &[ProductRecord]) -> Vec<CategoryStat> {
    taxonomy
        .nodes()
        .iter()
        .map(|node| {
            let path = SelectionPath::from_segments([node.id.as_str()])
                .expect("a single segment fits within the depth cap");
            CategoryStat {
                id: node.id.clone(),
                display_name: node.display_name.clone(),
                count: apply_path(taxonomy, products, &path).len(),
            }
        })
        .collect()
}

fn distinct_values<F>(subset: &[&ProductRecord], field: F) -> Option<Vec<String>>
where
    F: Fn(&ProductRecord) -> &str,
{
    let values: BTreeSet<String> = subset
        .iter()
        .map(|product| normalize(field(product)))
        .filter(|value| !value.is_empty())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.into_iter().collect())
    }
}

/// Precomputed per-category buckets for one product-set version.
///
/// Bucketing pays the O(products × rules) classification cost once instead
/// of on every keystroke-driven re-render. Answers are observably identical
/// to the free functions; the caller rebuilds the index when the product set
/// changes.
pub struct CatalogIndex<'a> {
    taxonomy: &'a Taxonomy,
    products: &'a [ProductRecord],
    buckets: Vec<(String, Vec<&'a ProductRecord>)>,
}

impl<'a> CatalogIndex<'a> {
    pub fn new(taxonomy: &'a Taxonomy, products: &'a [ProductRecord]) -> Self {
        let buckets = taxonomy
            .nodes()
            .iter()
            .map(|node| {
                let members: Vec<&ProductRecord> = products
                    .iter()
                    .filter(|product| product.is_classifiable() && matches_node(node, product))
                    .collect();
                (node.id.clone(), members)
            })
            .collect();
        Self {
            taxonomy,
            products,
            buckets,
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        self.taxonomy
    }

    /// The filtered subset for a path, serving level 0 from the buckets.
    pub fn filtered(&self, path: &SelectionPath) -> Vec<&'a ProductRecord> {
        let mut subset: Vec<&ProductRecord> = match path.get(0) {
            None => self.products.iter().collect(),
            Some(category_id) => self
                .buckets
                .iter()
                .find(|(id, _)| id == category_id)
                .map(|(_, members)| members.clone())
                .unwrap_or_default(),
        };

        if let Some(subcategory) = path.get(1) {
            let wanted = normalize(subcategory);
            subset.retain(|product| normalize(&product.subcategory_signal) == wanted);
        }

        if let Some(brand) = path.get(2) {
            let wanted = normalize(brand);
            subset.retain(|product| normalize(&product.brand) == wanted);
        }

        subset
    }

    pub fn options_at(&self, path: &SelectionPath) -> Option<Vec<String>> {
        match path.depth() {
            0 => Some(self.taxonomy.category_ids().map(str::to_string).collect()),
            1 => distinct_values(&self.filtered(path), |p| &p.subcategory_signal),
            2 => distinct_values(&self.filtered(path), |p| &p.brand),
            _ => None,
        }
    }

    pub fn counts_at(&self, path: &SelectionPath) -> Option<BTreeMap<String, usize>> {
        let options = self.options_at(path)?;
        let mut counts = BTreeMap::new();
        for option in options {
            let extended = path
                .child(option.as_str())
                .expect("an option extends a non-terminal path");
            counts.insert(option, self.filtered(&extended).len());
        }
        Some(counts)
    }

    pub fn is_terminal(&self, path: &SelectionPath) -> bool {
        self.options_at(path).is_none()
    }

    pub fn stats(&self) -> Vec<CategoryStat> {
        self.taxonomy
            .nodes()
            .iter()
            .zip(&self.buckets)
            .map(|(node, (_, members))| CategoryStat {
                id: node.id.clone(),
                display_name: node.display_name.clone(),
                count: members.len(),
            })
            .collect()
    }
}
