//! Registration, login, logout, and profile editing.

use jwt_pizza_integration_tests::TestServer;

#[tokio::test]
async fn register_shows_initials_badge() {
    let server = TestServer::spawn().await;

    let body = server
        .post_form(
            "/register",
            &[
                ("name", "Test User"),
                ("email", "test@test.com"),
                ("password", "password123"),
            ],
        )
        .await;

    // The redirect lands on the home page with the badge rendered
    assert!(body.contains(">TU<"), "expected initials badge, got: {body}");
    assert!(body.contains("Logout"));
}

#[tokio::test]
async fn register_duplicate_email_stays_on_form() {
    let server = TestServer::spawn().await;

    let body = server
        .post_form(
            "/register",
            &[
                ("name", "Someone Else"),
                ("email", "d@jwt.com"),
                ("password", "pw"),
            ],
        )
        .await;

    assert!(body.contains("Welcome to the party"));
    assert!(body.contains("Email already in use"));

    // No session was established
    let home = server.get("/").await;
    assert!(home.contains("Login"));
    assert!(!home.contains(">SE<"));
}

#[tokio::test]
async fn login_and_logout() {
    let server = TestServer::spawn().await;

    let body = server.login("d@jwt.com", "a").await;
    assert!(body.contains(">KC<"), "expected initials badge, got: {body}");
    assert!(body.contains("Logout"));

    let body = server.get("/logout").await;
    assert!(body.contains("Login"));
    assert!(!body.contains(">KC<"));
}

#[tokio::test]
async fn failed_login_stays_on_form_without_session() {
    let server = TestServer::spawn().await;

    let body = server.login("wrong@test.com", "wrong").await;
    assert!(body.contains("Welcome back"));
    assert!(body.contains("Invalid credentials"));

    let home = server.get("/").await;
    assert!(home.contains("Login"), "no session should exist");
}

#[tokio::test]
async fn stale_token_degrades_to_anonymous() {
    let server = TestServer::spawn().await;

    server.login("d@jwt.com", "a").await;

    // Invalidate the token server-side; the persisted cookie now points at
    // nothing and the next render is anonymous
    server.backend.state().tokens.clear();

    let home = server.get("/").await;
    assert!(home.contains("Login"));
    assert!(!home.contains(">KC<"));
}

#[tokio::test]
async fn profile_edit_updates_name_and_survives_relogin() {
    let server = TestServer::spawn().await;

    server
        .post_form(
            "/register",
            &[
                ("name", "pizza diner"),
                ("email", "user77@jwt.com"),
                ("password", "diner"),
            ],
        )
        .await;

    let dashboard = server.get("/diner-dashboard").await;
    assert!(dashboard.contains("Your pizza kitchen"));
    assert!(dashboard.contains("pizza diner"));
    assert!(dashboard.contains("user77@jwt.com"));

    let edit_page = server.get("/diner-dashboard/edit").await;
    assert!(edit_page.contains("Edit user"));

    let dashboard = server
        .post_form(
            "/diner-dashboard/edit",
            &[
                ("name", "pizza dinerx"),
                ("email", "user77@jwt.com"),
                ("password", ""),
            ],
        )
        .await;
    assert!(dashboard.contains("pizza dinerx"));

    // The edit persists across logout and login
    server.get("/logout").await;
    server.login("user77@jwt.com", "diner").await;
    let dashboard = server.get("/diner-dashboard").await;
    assert!(dashboard.contains("pizza dinerx"));
}

#[tokio::test]
async fn diner_dashboard_shows_order_history() {
    let server = TestServer::spawn().await;

    server.login("d@jwt.com", "a").await;
    let dashboard = server.get("/diner-dashboard").await;

    assert!(dashboard.contains("Your pizza kitchen"));
    assert!(dashboard.contains("Veggie"));
    assert!(dashboard.contains("0.0038"));
}
