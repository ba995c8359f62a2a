use super::*;
use crate::test_support::product;

fn catalog() -> CatalogStore {
    CatalogStore::with_products(vec![
        product("abc-1", "Widget", 5, 10.0),
        product("w-2", "Big ABCs", 0, 12.0),
        product("z-3", "Gadget", 2, 8.0),
    ])
}

#[test]
fn filters_by_name_or_id_case_insensitively() {
    let catalog = catalog();
    let mut selector = ProductSelector::default();
    selector.set_query("AbC");

    let ids: Vec<&str> = selector
        .options(&catalog)
        .iter()
        .map(|option| option.product.id.as_str())
        .collect();
    assert_eq!(ids, vec!["abc-1", "w-2"]);
    assert!(selector.is_open());
}

#[test]
fn out_of_stock_products_are_disabled_with_reason() {
    let catalog = catalog();
    let selector = ProductSelector::default();
    let options = selector.options(&catalog);

    let blocked = options
        .iter()
        .find(|option| option.product.id.as_str() == "w-2")
        .expect("option");
    assert!(!blocked.enabled);
    assert_eq!(blocked.disabled_reason, Some(INSUFFICIENT_STOCK_REASON));
    assert!(options
        .iter()
        .filter(|option| option.product.id.as_str() != "w-2")
        .all(|option| option.enabled && option.disabled_reason.is_none()));
}

#[test]
fn selecting_clears_query_and_closes() {
    let catalog = catalog();
    let mut selector = ProductSelector::default();
    selector.set_query("gad");

    selector
        .select(&ProductId::new("z-3"), &catalog)
        .expect("select");

    assert_eq!(selector.selected(), Some(&ProductId::new("z-3")));
    assert_eq!(selector.query(), "");
    assert!(!selector.is_open());
    assert_eq!(
        selector.selected_product(&catalog).map(|p| p.name.as_str()),
        Some("Gadget")
    );
}

#[test]
fn cannot_select_unavailable_or_unknown_product() {
    let catalog = catalog();
    let mut selector = ProductSelector::default();

    assert_eq!(
        selector.select(&ProductId::new("w-2"), &catalog),
        Err(ValidationError::ProductUnavailable(ProductId::new("w-2")))
    );
    assert_eq!(
        selector.select(&ProductId::new("nope"), &catalog),
        Err(ValidationError::UnknownProduct(ProductId::new("nope")))
    );
    assert!(selector.selected().is_none());
}

#[test]
fn outside_interaction_closes_dropdown() {
    let mut selector = ProductSelector::default();
    selector.toggle();
    assert!(selector.is_open());
    selector.interaction_outside();
    assert!(!selector.is_open());
}
