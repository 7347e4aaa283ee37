//! The franchisee dashboard: store listing, creation, and two-step close.

use jwt_pizza_integration_tests::TestServer;

#[tokio::test]
async fn franchisee_sees_their_franchise_and_revenue() {
    let server = TestServer::spawn().await;
    server.login("f@jwt.com", "a").await;

    let dashboard = server.get("/franchise-dashboard").await;
    assert!(dashboard.contains("LotaPizza"));
    assert!(dashboard.contains("Lehi"));
    assert!(dashboard.contains("Springville"));
    assert!(dashboard.contains("100 ₿"));
    assert!(dashboard.contains("200 ₿"));
}

#[tokio::test]
async fn diner_sees_the_franchising_pitch() {
    let server = TestServer::spawn().await;
    server.login("d@jwt.com", "a").await;

    let dashboard = server.get("/franchise-dashboard").await;
    assert!(dashboard.contains("So you want a piece of the pie?"));
    assert!(!dashboard.contains("LotaPizza"));
}

#[tokio::test]
async fn anonymous_visitor_is_sent_to_login() {
    let server = TestServer::spawn().await;

    let body = server.get("/franchise-dashboard").await;
    assert!(body.contains("Welcome back"));
}

#[tokio::test]
async fn franchisee_can_create_store() {
    let server = TestServer::spawn().await;
    server.login("f@jwt.com", "a").await;

    let form = server.get("/franchise-dashboard/store/create").await;
    assert!(form.contains("Create store"));
    assert!(form.contains("store name"));

    let dashboard = server
        .post_form(
            "/franchise-dashboard/store/create",
            &[("name", "New Store")],
        )
        .await;
    assert!(dashboard.contains("New Store"), "new store is reflected");
}

#[tokio::test]
async fn close_store_requires_two_confirms() {
    let server = TestServer::spawn().await;
    server.login("f@jwt.com", "a").await;

    // First click opens the confirmation naming the store; nothing deleted
    let confirm = server.get("/franchise-dashboard/store/4/close").await;
    assert!(confirm.contains("Sorry to bring you back to reality"));
    assert!(confirm.contains("Lehi"));
    assert_eq!(server.backend.state().store_deletes, 0);

    // Cancel returns to the dashboard unchanged and disarms the confirmation
    let dashboard = server.get("/franchise-dashboard").await;
    assert!(dashboard.contains("Lehi"));
    assert_eq!(server.backend.state().store_deletes, 0);

    // A confirm after cancel has no armed slot and performs no DELETE
    let dashboard = server
        .post_form("/franchise-dashboard/store/4/close", &[])
        .await;
    assert!(dashboard.contains("Lehi"));
    assert_eq!(server.backend.state().store_deletes, 0);

    // The real two-step close performs exactly one DELETE
    server.get("/franchise-dashboard/store/4/close").await;
    let dashboard = server
        .post_form("/franchise-dashboard/store/4/close", &[])
        .await;
    assert_eq!(server.backend.state().store_deletes, 1);
    assert!(!dashboard.contains("Lehi"), "closed store is gone");
    assert!(dashboard.contains("Springville"));
}

#[tokio::test]
async fn confirmation_for_one_store_does_not_authorize_another() {
    let server = TestServer::spawn().await;
    server.login("f@jwt.com", "a").await;

    // Arm the confirmation for Lehi (store 4), then confirm against 5
    server.get("/franchise-dashboard/store/4/close").await;
    let dashboard = server
        .post_form("/franchise-dashboard/store/5/close", &[])
        .await;

    assert_eq!(server.backend.state().store_deletes, 0);
    assert!(dashboard.contains("Lehi"));
    assert!(dashboard.contains("Springville"));
}
