//! Resolve column definitions from declarative column element attributes.
//!
//! Boolean attributes are presence-tested (`<grid-column sortable>`);
//! numeric attributes that do not parse to a finite number are treated as
//! absent.
//!
//! ```html
//! <grid-column field="price" header="Price" type="number" width="120"
//!              min-width="80" sortable lock-position></grid-column>
//! ```

use crate::types::{Align, ColumnDef, ColumnType};

impl ColumnDef {
    /// Build a definition from `(name, value)` attribute pairs.
    ///
    /// Returns `None` when no non-empty `field` attribute is present.
    pub fn from_attributes<'a, I>(attrs: I) -> Option<ColumnDef>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut def = ColumnDef::default();
        let mut has_field = false;

        for (name, value) in attrs {
            match name {
                "field" => {
                    let field = value.trim();
                    if !field.is_empty() {
                        def.field = field.to_string();
                        has_field = true;
                    }
                }
                "header" | "header-name" => def.header_name = Some(value.to_string()),
                "width" => def.width = parse_number(value),
                "min-width" => def.min_width = parse_number(value),
                "max-width" => def.max_width = parse_number(value),
                "flex" => def.flex = parse_number(value),
                "type" => def.column_type = ColumnType::parse(value),
                "align" => def.align = Align::parse(value),
                "sortable" => def.sortable = true,
                "filterable" => def.filterable = true,
                "editable" => def.editable = true,
                "resizable" => def.resizable = true,
                "hidden" => def.hidden = true,
                "lock-position" => def.lock_position = true,
                "lock-visible" => def.lock_visible = true,
                _ => {}
            }
        }

        has_field.then_some(def)
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_full_attribute_set() {
        let def = ColumnDef::from_attributes([
            ("field", "price"),
            ("header", "Price"),
            ("type", "number"),
            ("width", "120"),
            ("min-width", "80"),
            ("align", "right"),
            ("sortable", ""),
            ("lock-position", ""),
        ])
        .unwrap();
        assert_eq!(def.field, "price");
        assert_eq!(def.header(), "Price");
        assert_eq!(def.column_type, ColumnType::Number);
        assert_eq!(def.width, Some(120.0));
        assert_eq!(def.min_width, Some(80.0));
        assert_eq!(def.align, Some(Align::Right));
        assert!(def.sortable);
        assert!(def.lock_position);
        assert!(!def.hidden);
    }

    #[test]
    fn test_invalid_numbers_are_absent() {
        let attrs = [("field", "a"), ("width", "wide"), ("flex", "NaN")];
        let def = ColumnDef::from_attributes(attrs).unwrap();
        assert_eq!(def.width, None);
        assert_eq!(def.flex, None);
    }

    #[test]
    fn test_missing_field() {
        assert!(ColumnDef::from_attributes([("header", "A")]).is_none());
        assert!(ColumnDef::from_attributes([("field", "  ")]).is_none());
    }

    #[test]
    fn test_unknown_type_is_text() {
        let def = ColumnDef::from_attributes([("field", "a"), ("type", "currency")]).unwrap();
        assert_eq!(def.column_type, ColumnType::Text);
    }
}
