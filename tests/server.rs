//! End-to-end tests over real HTTP.

mod common;

use common::{scenario_app, start_server};

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_serves_application_over_http() {
    let (addr, shutdown) = start_server(scenario_app()).await;
    let client = client();

    let res = client.get(format!("http://{addr}/books")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "books");

    let res = client
        .get(format!("http://{addr}/users/2"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "second user");

    shutdown.trigger();
}

#[tokio::test]
async fn test_not_found_over_http() {
    let (addr, shutdown) = start_server(scenario_app()).await;

    let res = client()
        .get(format!("http://{addr}/other?page=2"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "Cannot GET /other?page=2");

    shutdown.trigger();
}

#[tokio::test]
async fn test_client_request_id_is_echoed() {
    let (addr, shutdown) = start_server(scenario_app()).await;

    let res = client()
        .get(format!("http://{addr}/"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me");
    assert_eq!(res.text().await.unwrap(), "home");

    shutdown.trigger();
}
