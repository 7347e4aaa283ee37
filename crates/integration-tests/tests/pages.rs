//! Informational pages, docs, and the 404 view.

use jwt_pizza_integration_tests::TestServer;

#[tokio::test]
async fn home_page_has_hero_and_footer() {
    let server = TestServer::spawn().await;

    let home = server.get("/").await;
    assert!(home.contains("The web&#39;s best pizza") || home.contains("The web's best pizza"));
    assert!(home.contains("Order now"));
    assert!(home.contains("If you want to support"));
}

#[tokio::test]
async fn about_page_renders_markdown_content() {
    let server = TestServer::spawn().await;

    let about = server.get("/about").await;
    assert!(about.contains("At JWT Pizza"));
    assert!(about.contains("authentic Italian pizza"));
}

#[tokio::test]
async fn history_page_renders_markdown_content() {
    let server = TestServer::spawn().await;

    let history = server.get("/history").await;
    assert!(history.contains("Mama Rucci"));
    assert!(history.contains("secret family recipe"));
}

#[tokio::test]
async fn docs_page_renders_the_api_catalog() {
    let server = TestServer::spawn().await;

    let docs = server.get("/docs").await;
    assert!(docs.contains("JWT Pizza API"));
    assert!(docs.contains("1.0.0"));
    assert!(docs.contains("/api/order/menu"));
}

#[tokio::test]
async fn unknown_route_renders_oops() {
    let server = TestServer::spawn().await;

    assert_eq!(server.get_status("/nonexistent-page").await, 404);

    let body = server.get("/nonexistent-page").await;
    assert!(body.contains("Oops"));
    assert!(body.contains("dropped a pizza on the floor"));
}
