//! The cart and checkout workflow, end to end.

use jwt_pizza_integration_tests::TestServer;

/// Select the Lehi store and put two pizzas in the cart.
async fn fill_cart(server: &TestServer) -> String {
    server.post_form("/menu/store", &[("store", "1:4")]).await;
    server.post_form("/menu/add", &[("menu_id", "1")]).await;
    server.post_form("/menu/add", &[("menu_id", "2")]).await
}

#[tokio::test]
async fn order_two_pizzas_with_login() {
    let server = TestServer::spawn().await;
    server.login("d@jwt.com", "a").await;

    let menu = server.get("/menu").await;
    assert!(menu.contains("Awesome is a click away"));
    assert!(menu.contains("Veggie"));
    assert!(menu.contains("Lehi"));

    let menu = fill_cart(&server).await;
    assert!(menu.contains("Selected pizzas: 2"));

    let payment = server.post_form("/menu/checkout", &[]).await;
    assert!(payment.contains("Send me those 2 pizzas right now!"));
    assert!(payment.contains("0.008"));
    assert!(payment.contains("Lehi"));

    let delivery = server.post_form("/payment", &[]).await;
    assert!(delivery.contains("Here is your JWT Pizza!"));
    assert!(delivery.contains("0.008"), "server total is displayed");
    assert!(delivery.contains("eyJpYXQ"));

    assert_eq!(server.backend.state().order_posts, 1);

    // Success cleared the cart
    let menu = server.get("/menu").await;
    assert!(menu.contains("Selected pizzas: 0"));
}

#[tokio::test]
async fn checkout_disabled_until_store_and_items() {
    let server = TestServer::spawn().await;
    server.login("d@jwt.com", "a").await;

    // Empty cart: the button is disabled and the POST bounces back
    let menu = server.get("/menu").await;
    assert!(menu.contains("disabled"));

    let bounced = server.post_form("/menu/checkout", &[]).await;
    assert!(bounced.contains("Awesome is a click away"));

    // Items without a store still cannot check out
    let menu = server.post_form("/menu/add", &[("menu_id", "1")]).await;
    assert!(menu.contains("Selected pizzas: 1"));
    assert!(menu.contains("disabled"));

    // A store without items cannot either
    let server2 = TestServer::spawn().await;
    server2.login("d@jwt.com", "a").await;
    let menu = server2.post_form("/menu/store", &[("store", "1:4")]).await;
    assert!(menu.contains("disabled"));

    // Both present: enabled
    let menu = server.post_form("/menu/store", &[("store", "1:4")]).await;
    assert!(!menu.contains("disabled"));

    assert_eq!(server.backend.state().order_posts, 0);
}

#[tokio::test]
async fn duplicate_pizzas_are_priced_twice() {
    let server = TestServer::spawn().await;
    server.login("d@jwt.com", "a").await;

    server.post_form("/menu/store", &[("store", "1:4")]).await;
    server.post_form("/menu/add", &[("menu_id", "3")]).await;
    let menu = server.post_form("/menu/add", &[("menu_id", "3")]).await;

    assert!(menu.contains("Selected pizzas: 2"));

    // Two Margaritas at 0.0014, summed the way the storefront sums them
    let expected: jwt_pizza_core::Price = ["0.0014", "0.0014"]
        .iter()
        .map(|s| s.parse::<jwt_pizza_core::Price>().expect("price"))
        .sum();
    assert!(menu.contains(&expected.to_string()));
}

#[tokio::test]
async fn remove_item_updates_count() {
    let server = TestServer::spawn().await;
    server.login("d@jwt.com", "a").await;

    fill_cart(&server).await;
    let menu = server.post_form("/menu/remove", &[("index", "0")]).await;
    assert!(menu.contains("Selected pizzas: 1"));
    assert!(!menu.contains("Remove Veggie"));
    assert!(menu.contains("Remove Pepperoni"));
}

#[tokio::test]
async fn payment_failure_preserves_cart_and_shows_message() {
    let server = TestServer::spawn().await;
    server.login("d@jwt.com", "a").await;

    fill_cart(&server).await;
    server.post_form("/menu/checkout", &[]).await;

    server.backend.state().fail_orders = true;

    let payment = server.post_form("/payment", &[]).await;
    assert!(payment.contains("Payment failed"), "server message verbatim");
    assert!(payment.contains("Send me those 2 pizzas right now!"));

    // The cart was not cleared; the user can retry
    let menu = server.get("/menu").await;
    assert!(menu.contains("Selected pizzas: 2"));

    // Retry after the backend recovers succeeds with the same cart
    server.backend.state().fail_orders = false;
    server.post_form("/menu/checkout", &[]).await;
    let delivery = server.post_form("/payment", &[]).await;
    assert!(delivery.contains("Here is your JWT Pizza!"));
    assert_eq!(server.backend.state().order_posts, 2);
}

#[tokio::test]
async fn anonymous_checkout_resumes_at_payment_after_login() {
    let server = TestServer::spawn().await;

    fill_cart(&server).await;
    let login_page = server.post_form("/menu/checkout", &[]).await;
    assert!(
        login_page.contains("Welcome back"),
        "anonymous checkout redirects to login"
    );

    // Logging in resumes exactly at the payment step with the cart intact
    let payment = server.login("d@jwt.com", "a").await;
    assert!(payment.contains("Send me those 2 pizzas right now!"));
    assert!(payment.contains("0.008"));

    let delivery = server.post_form("/payment", &[]).await;
    assert!(delivery.contains("Here is your JWT Pizza!"));
}

#[tokio::test]
async fn cancel_discards_selection_without_network_call() {
    let server = TestServer::spawn().await;
    server.login("d@jwt.com", "a").await;

    fill_cart(&server).await;
    server.post_form("/menu/checkout", &[]).await;

    let menu = server.post_form("/payment/cancel", &[]).await;
    assert!(menu.contains("Awesome is a click away"));
    assert!(menu.contains("Selected pizzas: 0"));
    assert_eq!(server.backend.state().order_posts, 0);
}

#[tokio::test]
async fn verify_receipt_shows_validity_and_payload() {
    let server = TestServer::spawn().await;
    server.login("d@jwt.com", "a").await;

    fill_cart(&server).await;
    server.post_form("/menu/checkout", &[]).await;
    server.post_form("/payment", &[]).await;

    let verified = server.post_form("/delivery/verify", &[]).await;
    assert!(verified.contains("valid"));
    assert!(verified.contains("Test Vendor"));

    // Verification is read-only: no further orders were created
    assert_eq!(server.backend.state().order_posts, 1);
}

#[tokio::test]
async fn order_more_returns_to_fresh_menu() {
    let server = TestServer::spawn().await;
    server.login("d@jwt.com", "a").await;

    fill_cart(&server).await;
    server.post_form("/menu/checkout", &[]).await;
    server.post_form("/payment", &[]).await;

    let menu = server.get("/menu").await;
    assert!(menu.contains("Selected pizzas: 0"));

    // The receipt was consumed; the delivery view is gone
    let menu_again = server.get("/delivery").await;
    assert!(menu_again.contains("Awesome is a click away"));
}
