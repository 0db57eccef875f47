//! End-to-end coverage for the category page and its filter grid
//! fragment: band filters, dietary toggles, text search, and sorting.

#![allow(clippy::unwrap_used)]

use healthy_corner_integration_tests::TestContext;

#[tokio::test]
async fn category_page_renders_panel_and_full_grid() {
    let ctx = TestContext::new().await;

    let body = ctx.get_ok("/categories/bowls").await;

    assert!(body.contains("Signature Bowls"));
    assert!(body.contains("Showing 2 of 2 dishes"));
    assert!(body.contains("Grilled Chicken Bowl"));
    assert!(body.contains("Falafel Power Bowl"));

    // Band ceilings come from the covering spec over the category's
    // items: calories round up to the next 50, price to the next 10
    assert!(body.contains(r#"max="650""#));
    assert!(body.contains(r#"max="120""#));

    // All six sort options are offered
    assert!(body.contains(r#"<option value="name""#));
    assert!(body.contains(r#"<option value="price-desc""#));
    assert!(body.contains(r#"<option value="protein-desc""#));
}

#[tokio::test]
async fn unknown_category_returns_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/categories/desserts").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn grid_fragment_filters_by_dietary_toggle() {
    let ctx = TestContext::new().await;

    let body = ctx.get_ok("/categories/bowls/grid?vegetarian=1").await;

    assert!(body.contains("Showing 1 of 2 dishes"));
    assert!(body.contains("Falafel Power Bowl"));
    assert!(!body.contains("Grilled Chicken Bowl"));

    // The fragment swaps into the page, it is not a page itself
    assert!(!body.contains("<html"));
}

#[tokio::test]
async fn grid_fragment_matches_text_against_descriptions() {
    let ctx = TestContext::new().await;

    let body = ctx.get_ok("/categories/bowls/grid?q=peanut").await;

    assert!(body.contains("Showing 1 of 2 dishes"));
    assert!(body.contains("Grilled Chicken Bowl"));
    assert!(!body.contains("Falafel Power Bowl"));
}

#[tokio::test]
async fn grid_fragment_applies_price_and_calorie_bands() {
    let ctx = TestContext::new().await;

    // Chicken bowl is 120 MRU, falafel 80
    let body = ctx.get_ok("/categories/bowls/grid?price_max=100").await;
    assert!(body.contains("Showing 1 of 2 dishes"));
    assert!(body.contains("Falafel Power Bowl"));

    // Falafel is 610 kcal, chicken 520
    let body = ctx.get_ok("/categories/bowls/grid?cal_min=600").await;
    assert!(body.contains("Showing 1 of 2 dishes"));
    assert!(body.contains("Falafel Power Bowl"));
    assert!(!body.contains("Grilled Chicken Bowl"));
}

#[tokio::test]
async fn grid_fragment_sorts_by_the_requested_key() {
    let ctx = TestContext::new().await;

    let body = ctx.get_ok("/categories/bowls/grid?sort=price-desc").await;
    let chicken = body.find("Grilled Chicken Bowl").unwrap();
    let falafel = body.find("Falafel Power Bowl").unwrap();
    assert!(chicken < falafel, "price-desc puts 120 MRU before 80 MRU");

    let body = ctx.get_ok("/categories/bowls/grid?sort=price-asc").await;
    let chicken = body.find("Grilled Chicken Bowl").unwrap();
    let falafel = body.find("Falafel Power Bowl").unwrap();
    assert!(falafel < chicken, "price-asc puts 80 MRU before 120 MRU");
}

#[tokio::test]
async fn reversed_band_matches_nothing() {
    let ctx = TestContext::new().await;

    let body = ctx
        .get_ok("/categories/bowls/grid?cal_min=600&cal_max=100")
        .await;

    assert!(body.contains("Showing 0 of 2 dishes"));
    assert!(body.contains("No dishes match these filters."));
}

#[tokio::test]
async fn empty_band_overrides_keep_the_covering_band() {
    let ctx = TestContext::new().await;

    // Untouched number inputs submit empty strings; both items stay
    let body = ctx
        .get_ok("/categories/bowls/grid?cal_min=&cal_max=&price_min=&price_max=&q=")
        .await;

    assert!(body.contains("Showing 2 of 2 dishes"));
}

#[tokio::test]
async fn full_page_applies_filters_without_javascript() {
    let ctx = TestContext::new().await;

    // The panel is a plain form; submitting it reloads the whole page
    let body = ctx
        .get_ok("/categories/bowls?vegetarian=1&sort=price-asc")
        .await;

    assert!(body.contains("<html"));
    assert!(body.contains("Showing 1 of 2 dishes"));
    assert!(body.contains("Falafel Power Bowl"));

    // The submitted state is reflected back into the panel
    assert!(body.contains(r#"name="vegetarian" value="1" checked"#));
    assert!(body.contains(r#"<option value="price-asc" selected"#));
}
