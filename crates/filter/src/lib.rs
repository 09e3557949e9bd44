//! Selection-path filtering.
//!
//! Applies a drill-down path to the product feed one level at a time:
//! heuristic classification at the top level, then exact (normalized)
//! equality on the subcategory signal and the brand. Ordering of the result
//! is whatever the feed supplied; sorting is a presentation concern.

use distripet_classify::{classify, normalize};
use distripet_model::{ProductRecord, SelectionPath};
use distripet_taxonomy::Taxonomy;

/// Filter a product slice down to the records matching every level of the
/// path.
///
/// The empty path returns everything. A path segment that no longer names a
/// valid option (a stale category, a vanished subcategory) just produces an
/// empty result; callers recover by shortening the path.
pub fn apply_path<'a>(
    taxonomy: &Taxonomy,
    products: &'a [ProductRecord],
    path: &SelectionPath,
) -> Vec<&'a ProductRecord> {
    let mut subset: Vec<&ProductRecord> = products.iter().collect();

    if let Some(category_id) = path.get(0) {
        subset.retain(|product| classify(taxonomy, product, category_id));
    }

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

#[cfg(test)]
mod tests {
    use super::*;
    use distripet_model::Audience;
    use pretty_assertions::assert_eq;

    fn make_product(id: &str, brand: &str, signal: &str) -> ProductRecord {
        let mut product = ProductRecord::new(id, brand);
        product.subcategory_signal = signal.to_string();
        product
    }

    fn feed() -> Vec<ProductRecord> {
        vec![
            make_product("1", "Manada", "economico"),
            make_product("2", "Royal Canin", ""),
            make_product("3", "Old Prince", "premium"),
            make_product("4", "Leon Pharma", "antibioticos"),
        ]
    }

    fn vet() -> Taxonomy {
        Taxonomy::builtin(Audience::Vet)
    }

    #[test]
    fn test_empty_path_is_identity() {
        let products = feed();
        let subset = apply_path(&vet(), &products, &SelectionPath::root());
        let ids: Vec<_> = subset.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_level_0_classification() {
        let products = feed();
        let path = SelectionPath::from_segments(["alimento-perro"]).unwrap();
        let subset = apply_path(&vet(), &products, &path);
        let ids: Vec<_> = subset.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_level_1_exact_equality() {
        let products = feed();
        let path = SelectionPath::from_segments(["alimento-perro", "economico"]).unwrap();
        let subset = apply_path(&vet(), &products, &path);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].id, "1");
    }

    #[test]
    fn test_level_1_equality_is_normalized_not_fuzzy() {
        let mut products = feed();
        products[0].subcategory_signal = "  Economico ".to_string();
        let path = SelectionPath::from_segments(["alimento-perro", "economico"]).unwrap();
        assert_eq!(apply_path(&vet(), &products, &path).len(), 1);

        let near_miss = SelectionPath::from_segments(["alimento-perro", "economicos"]).unwrap();
        assert!(apply_path(&vet(), &products, &near_miss).is_empty());
    }

    #[test]
    fn test_full_depth_path() {
        let products = feed();
        let path =
            SelectionPath::from_segments(["alimento-perro", "economico", "manada"]).unwrap();
        let subset = apply_path(&vet(), &products, &path);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].id, "1");
    }

    #[test]
    fn test_stale_segment_yields_empty_not_error() {
        let products = feed();
        let stale = SelectionPath::from_segments(["alimento-perro", "descontinuado"]).unwrap();
        assert!(apply_path(&vet(), &products, &stale).is_empty());

        let unknown_category = SelectionPath::from_segments(["no-such-category"]).unwrap();
        assert!(apply_path(&vet(), &products, &unknown_category).is_empty());
    }

    #[test]
    fn test_monotonic_narrowing() {
        let products = feed();
        let taxonomy = vet();
        let mut path = SelectionPath::root();
        let mut previous = apply_path(&taxonomy, &products, &path).len();
        for segment in ["alimento-perro", "economico", "manada"] {
            path.push(segment).unwrap();
            let next = apply_path(&taxonomy, &products, &path).len();
            assert!(next <= previous);
            previous = next;
        }
    }

    #[test]
    fn test_apply_path_is_idempotent() {
        let products = feed();
        let taxonomy = vet();
        let path = SelectionPath::from_segments(["farmacia"]).unwrap();
        let first: Vec<_> = apply_path(&taxonomy, &products, &path)
            .iter()
            .map(|p| p.id.clone())
            .collect();
        let second: Vec<_> = apply_path(&taxonomy, &products, &path)
            .iter()
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["4"]);
    }
}
