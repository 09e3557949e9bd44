//! Presentation strings for the catalog UI.
//!
//! Turns engine output into what sidebars, menus and breadcrumbs actually
//! render: display names for declared categories, title-cased verbatim text
//! for the data-discovered levels, and option rows with counts.

use std::collections::BTreeMap;

use distripet_model::SelectionPath;
use distripet_taxonomy::Taxonomy;
use serde::{Deserialize, Serialize};

/// What the breadcrumb shows before any drill-down has happened.
pub const ROOT_BREADCRUMB: &str = "Todos los productos";

/// Uppercase the first letter of each word, leaving the rest untouched.
///
/// Discovered option values arrive lowercased from the engine, so this is
/// enough to make `royal canin` render as `Royal Canin`.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a selection path as a breadcrumb.
///
/// The top-level segment resolves through the taxonomy's declared display
/// name (falling back to title-casing for ids the taxonomy no longer knows);
/// subcategory and brand segments are title-cased verbatim.
pub fn breadcrumb(taxonomy: &Taxonomy, path: &SelectionPath) -> String {
    if path.is_root() {
        return ROOT_BREADCRUMB.to_string();
    }

    path.segments()
        .iter()
        .enumerate()
        .map(|(level, segment)| {
            if level == 0 {
                taxonomy
                    .display_name(segment)
                    .map(str::to_string)
                    .unwrap_or_else(|| title_case(segment))
            } else {
                title_case(segment)
            }
        })
        .collect::<Vec<_>>()
        .join(" → ")
}

/// One sidebar/menu row: the selectable value, its label, and how many
/// products selecting it would leave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionItem {
    pub value: String,
    pub label: String,
    pub count: usize,
}

/// Zip a level's options with their counts into renderable rows.
///
/// Labels follow the breadcrumb convention: declared display names at the
/// root, title-cased values below it. Options missing from the count map
/// render as zero rather than disappearing.
pub fn option_items(
    taxonomy: &Taxonomy,
    path: &SelectionPath,
    options: &[String],
    counts: &BTreeMap<String, usize>,
) -> Vec<OptionItem> {
    options
        .iter()
        .map(|option| {
            let label = if path.is_root() {
                taxonomy
                    .display_name(option)
                    .map(str::to_string)
                    .unwrap_or_else(|| title_case(option))
            } else {
                title_case(option)
            };
            OptionItem {
                value: option.clone(),
                label,
                count: counts.get(option).copied().unwrap_or(0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use distripet_model::Audience;

    fn vet() -> Taxonomy {
        Taxonomy::builtin(Audience::Vet)
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("royal canin"), "Royal Canin");
        assert_eq!(title_case("economico"), "Economico");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_breadcrumb_root_placeholder() {
        assert_eq!(breadcrumb(&vet(), &SelectionPath::root()), ROOT_BREADCRUMB);
    }

    #[test]
    fn test_breadcrumb_full_path() {
        let path =
            SelectionPath::from_segments(["alimento-perro", "economico", "manada"]).unwrap();
        assert_eq!(
            breadcrumb(&vet(), &path),
            "Alimento Perro → Economico → Manada"
        );
    }

    #[test]
    fn test_breadcrumb_unknown_category_falls_back() {
        let path = SelectionPath::from_segments(["descontinuados"]).unwrap();
        assert_eq!(breadcrumb(&vet(), &path), "Descontinuados");
    }

    #[test]
    fn test_option_items_at_root_use_display_names() {
        let taxonomy = vet();
        let options = vec!["alimento-perro".to_string(), "farmacia".to_string()];
        let counts = BTreeMap::from([
            ("alimento-perro".to_string(), 3),
            ("farmacia".to_string(), 1),
        ]);
        let items = option_items(&taxonomy, &SelectionPath::root(), &options, &counts);
        assert_eq!(items[0].label, "Alimento Perro");
        assert_eq!(items[0].count, 3);
        assert_eq!(items[1].label, "Farmacia");
    }

    #[test]
    fn test_option_items_below_root_title_case() {
        let taxonomy = vet();
        let path = SelectionPath::from_segments(["alimento-perro"]).unwrap();
        let options = vec!["economico".to_string()];
        let items = option_items(&taxonomy, &path, &options, &BTreeMap::new());
        assert_eq!(items[0].label, "Economico");
        assert_eq!(items[0].count, 0);
    }
}
