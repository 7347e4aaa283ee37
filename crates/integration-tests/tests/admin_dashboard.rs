//! The admin dashboard: franchise and user administration.

use jwt_pizza_integration_tests::TestServer;

#[tokio::test]
async fn admin_dashboard_lists_franchises_and_users() {
    let server = TestServer::spawn().await;
    server.login("a@jwt.com", "a").await;

    let dashboard = server.get("/admin-dashboard").await;
    assert!(dashboard.contains("Mama Ricci's kitchen"));
    assert!(dashboard.contains("Keep the dough rolling"));
    assert!(dashboard.contains("LotaPizza"));
    assert!(dashboard.contains("PizzaCorp"));
    assert!(dashboard.contains("Users"));
    assert!(dashboard.contains("Kai Chen"));
    assert!(dashboard.contains("d@jwt.com"));
    assert!(dashboard.contains("Pizza User"));
}

#[tokio::test]
async fn filter_users_by_name_substring() {
    let server = TestServer::spawn().await;
    server.login("a@jwt.com", "a").await;

    let filtered = server.get("/admin-dashboard?user_filter=Kai").await;
    assert!(filtered.contains("Kai Chen"));
    assert!(!filtered.contains("Pizza User"));

    // An empty filter returns the full unfiltered page
    let unfiltered = server.get("/admin-dashboard?user_filter=").await;
    assert!(unfiltered.contains("Kai Chen"));
    assert!(unfiltered.contains("Pizza User"));
}

#[tokio::test]
async fn filter_franchises_by_name() {
    let server = TestServer::spawn().await;
    server.login("a@jwt.com", "a").await;

    let filtered = server.get("/admin-dashboard?franchise_filter=Lota").await;
    assert!(filtered.contains("LotaPizza"));
    assert!(!filtered.contains("PizzaCorp"));
}

#[tokio::test]
async fn delete_user_refreshes_the_list() {
    let server = TestServer::spawn().await;
    server.login("a@jwt.com", "a").await;

    let dashboard = server.get("/admin-dashboard").await;
    assert!(dashboard.contains("Kai Chen"));

    let dashboard = server
        .post_form("/admin-dashboard/user/3/delete", &[])
        .await;
    assert_eq!(server.backend.state().user_deletes, 1);
    assert!(!dashboard.contains("Kai Chen"));
    assert!(dashboard.contains("Pizza User"));
}

#[tokio::test]
async fn admin_can_create_franchise() {
    let server = TestServer::spawn().await;
    server.login("a@jwt.com", "a").await;

    let form = server.get("/admin-dashboard/franchise/create").await;
    assert!(form.contains("franchise name"));
    assert!(form.contains("franchisee admin email"));

    let dashboard = server
        .post_form(
            "/admin-dashboard/franchise/create",
            &[("name", "New Franchise"), ("admin_email", "new@franchise.com")],
        )
        .await;
    assert!(dashboard.contains("New Franchise"));
}

#[tokio::test]
async fn close_franchise_requires_two_confirms() {
    let server = TestServer::spawn().await;
    server.login("a@jwt.com", "a").await;

    // First click: confirmation view naming the franchise, no DELETE yet
    let confirm = server.get("/admin-dashboard/franchise/2/close").await;
    assert!(confirm.contains("Sorry to bring you back to reality"));
    assert!(confirm.contains("PizzaCorp"));
    assert_eq!(server.backend.state().franchise_deletes, 0);

    // Second click: exactly one DELETE, entity gone from the next render
    let dashboard = server
        .post_form("/admin-dashboard/franchise/2/close", &[])
        .await;
    assert_eq!(server.backend.state().franchise_deletes, 1);
    assert!(!dashboard.contains("PizzaCorp"));
    assert!(dashboard.contains("LotaPizza"));

    // A confirm that was never armed performs no call
    let dashboard = server
        .post_form("/admin-dashboard/franchise/1/close", &[])
        .await;
    assert_eq!(server.backend.state().franchise_deletes, 1);
    assert!(dashboard.contains("LotaPizza"));
}

#[tokio::test]
async fn non_admin_sees_backend_rejection() {
    let server = TestServer::spawn().await;
    server.login("d@jwt.com", "a").await;

    // The client offers nothing but does not enforce; the backend rejects
    // the user list and the rejection is surfaced
    let dashboard = server.get("/admin-dashboard").await;
    assert!(dashboard.contains("unauthorized"));
    assert!(!dashboard.contains("Kai Chen"));
}
