//! Route templates for span names and metric labels.
//!
//! Identifiers are replaced by the name of the resource they follow, so
//! `/books/0199.../reviews` becomes `/books/{book}/reviews`. This keeps label cardinality bounded.

use uuid::Uuid;

/// Placeholder for an identifier following `collection`.
fn placeholder(collection: &str) -> &'static str {
    match collection {
        "books" => "{book}",
        "genres" => "{genre}",
        "reviews" => "{review}",
        "items" => "{item}",
        "orders" => "{order}",
        "discount-codes" => "{code}",
        _ => "{uuid}",
    }
}

pub(super) fn route_template(path: &str) -> String {
    let mut template = String::with_capacity(path.len());
    let mut previous = "";

    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        template.push('/');

        if Uuid::parse_str(segment).is_ok() {
            template.push_str(placeholder(previous));
        } else {
            template.push_str(segment);
        }

        previous = segment;
    }

    if template.is_empty() {
        template.push('/');
    }

    template
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "0199a3c4-5e6f-7a8b-9c0d-1e2f3a4b5c6d";

    #[test]
    fn root_stays_root() {
        assert_eq!(route_template("/"), "/");
        assert_eq!(route_template(""), "/");
    }

    #[test]
    fn static_paths_are_unchanged() {
        assert_eq!(route_template("/cart/discount"), "/cart/discount");
        assert_eq!(route_template("/reports/admin/"), "/reports/admin");
    }

    #[test]
    fn identifiers_are_named_after_their_collection() {
        assert_eq!(
            route_template(&format!("/books/{ID}/reviews")),
            "/books/{book}/reviews"
        );
        assert_eq!(route_template(&format!("/cart/items/{ID}")), "/cart/items/{item}");
        assert_eq!(
            route_template(&format!("/orders/{ID}/status")),
            "/orders/{order}/status"
        );
        assert_eq!(
            route_template(&format!("/discount-codes/{ID}")),
            "/discount-codes/{code}"
        );
    }

    #[test]
    fn unknown_collections_fall_back_to_uuid() {
        assert_eq!(route_template(&format!("/things/{ID}")), "/things/{uuid}");
    }
}
