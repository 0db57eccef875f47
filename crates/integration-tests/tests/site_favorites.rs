//! End-to-end coverage for session-backed favorites: the toggle
//! fragment, the header badge, and the saved items page.

#![allow(clippy::unwrap_used)]

use healthy_corner_integration_tests::{TestContext, fixtures};

#[tokio::test]
async fn favorites_page_starts_empty() {
    let ctx = TestContext::new().await;

    let body = ctx.get_ok("/favorites").await;

    assert!(body.contains("Nothing saved yet."));
    assert!(body.contains("Browse the menu"));
}

#[tokio::test]
async fn badge_is_blank_until_something_is_saved() {
    let ctx = TestContext::new().await;

    let body = ctx.get_ok("/favorites/count").await;

    assert!(body.contains(r#"id="favorites-count""#));
    assert!(!body.chars().any(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn toggling_saves_an_item_and_fires_the_badge_refresh() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form("/favorites/toggle", &[("id", fixtures::CHICKEN_BOWL_ID)])
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("hx-trigger").unwrap(),
        "favorites-updated"
    );

    let set_cookie = response.headers().get("set-cookie").unwrap();
    assert!(set_cookie.to_str().unwrap().contains("hc_session"));

    let button = response.text().await.unwrap();
    assert!(button.contains("is-active"));
    assert!(button.contains(r#"aria-pressed="true""#));
    assert!(button.contains("Remove from favorites"));

    // The session cookie carries the set into later requests
    let badge = ctx.get_ok("/favorites/count").await;
    assert!(badge.contains(">1</span>"));
}

#[tokio::test]
async fn toggling_twice_removes_the_item_again() {
    let ctx = TestContext::new().await;

    ctx.post_form("/favorites/toggle", &[("id", fixtures::LEMONADE_ID)])
        .await;
    let response = ctx
        .post_form("/favorites/toggle", &[("id", fixtures::LEMONADE_ID)])
        .await;

    assert_eq!(response.status(), 200);
    let button = response.text().await.unwrap();
    assert!(!button.contains("is-active"));
    assert!(button.contains(r#"aria-pressed="false""#));
    assert!(button.contains("Save to favorites"));

    let body = ctx.get_ok("/favorites").await;
    assert!(body.contains("Nothing saved yet."));
}

#[tokio::test]
async fn saved_items_page_keeps_the_order_items_were_saved_in() {
    let ctx = TestContext::new().await;

    // Save the smoothie first even though the chicken bowl sorts earlier
    ctx.post_form("/favorites/toggle", &[("id", fixtures::SMOOTHIE_ID)])
        .await;
    ctx.post_form("/favorites/toggle", &[("id", fixtures::CHICKEN_BOWL_ID)])
        .await;

    let badge = ctx.get_ok("/favorites/count").await;
    assert!(badge.contains(">2</span>"));

    let body = ctx.get_ok("/favorites").await;
    let smoothie = body.find("Mango Smoothie").unwrap();
    let chicken = body.find("Grilled Chicken Bowl").unwrap();
    assert!(smoothie < chicken);
}

#[tokio::test]
async fn saved_hearts_show_as_active_across_the_site() {
    let ctx = TestContext::new().await;

    ctx.post_form("/favorites/toggle", &[("id", fixtures::FALAFEL_BOWL_ID)])
        .await;

    let body = ctx.get_ok("/categories/bowls").await;
    let falafel_card = body.find("falafel-power-bowl").unwrap();
    let active = body.find("is-active").unwrap();

    // The active heart sits on the falafel card, and the detail page
    // agrees with it
    assert!(active > falafel_card);
    let detail = ctx.get_ok("/menu/falafel-power-bowl").await;
    assert!(detail.contains("is-active"));
}

#[tokio::test]
async fn items_gone_from_the_store_drop_off_the_saved_page() {
    let ctx = TestContext::new().await;

    // A well-formed id whose row no longer exists: the toggle itself
    // succeeds (the session does not consult the store), but the saved
    // items page silently drops it
    let retired = uuid::Uuid::new_v4().to_string();
    let response = ctx
        .post_form("/favorites/toggle", &[("id", retired.as_str())])
        .await;
    assert_eq!(response.status(), 200);

    let body = ctx.get_ok("/favorites").await;
    assert!(body.contains("Nothing saved yet."));
}

#[tokio::test]
async fn malformed_ids_are_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_form("/favorites/toggle", &[("id", "not-a-uuid")])
        .await;

    assert_eq!(response.status(), 400);
    let body = response.text().await.unwrap();
    assert!(body.contains("Unknown item"));

    let badge = ctx.get_ok("/favorites/count").await;
    assert!(!badge.contains(">1</span>"));
}

#[tokio::test]
async fn sessions_are_isolated_between_visitors() {
    let ctx = TestContext::new().await;

    ctx.post_form("/favorites/toggle", &[("id", fixtures::CHICKEN_BOWL_ID)])
        .await;
    let badge = ctx.get_ok("/favorites/count").await;
    assert!(badge.contains(">1</span>"));

    // A cookie-less client is a different visitor
    let stranger = reqwest::Client::new();
    let body = stranger
        .get(format!("{}/favorites/count", ctx.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains(">1</span>"));
}
