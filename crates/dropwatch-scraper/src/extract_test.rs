use serde_json::json;

use super::*;

#[test]
fn extracts_complete_descriptors() {
    let page = json!({
        "products": [
            {
                "id": 301_569_562,
                "handle": "gore-tex-shell-jacket",
                "title": "GORE-TEX Shell Jacket",
                "price": "£398",
                "image_url": "https://cdn.example.com/shell.jpg"
            },
            {
                "id": "301569563",
                "handle": "small-box-tee",
                "title": "Small Box Tee",
                "price": 54,
                "image": { "src": "https://cdn.example.com/tee.jpg" }
            }
        ]
    });

    let products = extract_products("jackets", &page).expect("extraction should succeed");
    assert_eq!(products.len(), 2);

    assert_eq!(products[0].id, "301569562");
    assert_eq!(products[0].handle, "gore-tex-shell-jacket");
    assert_eq!(products[0].price, "£398");
    assert_eq!(products[0].image, "https://cdn.example.com/shell.jpg");

    // Numeric price and nested image shape both normalize to strings.
    assert_eq!(products[1].id, "301569563");
    assert_eq!(products[1].price, "54");
    assert_eq!(products[1].image, "https://cdn.example.com/tee.jpg");
}

#[test]
fn descriptor_without_id_is_skipped_not_fatal() {
    let page = json!({
        "products": [
            { "id": 1, "handle": "a", "title": "A", "price": "£10" },
            { "id": 2, "handle": "b", "title": "B", "price": "£20" },
            { "handle": "no-id", "title": "Malformed", "price": "£30" },
            { "id": 4, "handle": "d", "title": "D", "price": "£40" },
            { "id": 5, "handle": "e", "title": "E", "price": "£50" }
        ]
    });

    let products = extract_products("shirts", &page).expect("extraction should succeed");
    assert_eq!(products.len(), 4, "the malformed entry must be dropped");
    let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "4", "5"]);
}

#[test]
fn descriptor_without_handle_is_skipped() {
    let page = json!({
        "products": [
            { "id": 1, "title": "No Handle", "price": "£10" },
            { "id": 2, "handle": "ok", "title": "OK", "price": "£20" }
        ]
    });

    let products = extract_products("hats", &page).expect("extraction should succeed");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].handle, "ok");
}

#[test]
fn missing_descriptive_fields_default_to_empty() {
    let page = json!({
        "products": [ { "id": 9, "handle": "bare" } ]
    });

    let products = extract_products("bags", &page).expect("extraction should succeed");
    assert_eq!(products[0].title, "");
    assert_eq!(products[0].price, "");
    assert_eq!(products[0].image, "");
}

#[test]
fn document_without_products_array_is_an_extraction_error() {
    let page = json!({ "error": "not found" });
    let result = extract_products("skate", &page);
    assert!(
        matches!(result, Err(ScraperError::Extraction { ref category, .. }) if category == "skate"),
        "expected Extraction error, got: {result:?}"
    );
}

#[test]
fn empty_products_array_extracts_nothing() {
    let page = json!({ "products": [] });
    let products = extract_products("shoes", &page).expect("extraction should succeed");
    assert!(products.is_empty());
}
