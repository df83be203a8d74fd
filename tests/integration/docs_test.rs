use reqwest::{header, Client, StatusCode};
use serde_json::{json, Value};

use super::common::{
    start_broken_schema_backend, start_gateway, start_mock_backend, unreachable_backend,
    upstream_schema, PUBLIC_API_URL,
};

#[test_log::test(tokio::test)]
async fn test_docs_page_points_at_prefixed_schema() {
    let gateway = start_gateway(&start_mock_backend().await).await;

    let response = Client::new()
        .get(format!("{}/docs", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(response.headers()["x-dns-prefetch-control"], "on");
    assert!(response.headers().contains_key("x-request-id"));

    let body = response.text().await.unwrap();
    assert!(body.contains("url: '/docs/openapi.json'"));
    assert!(!body.contains("'/openapi.json'"));
    assert!(body.contains("/docs/oauth2-redirect"));
}

#[test_log::test(tokio::test)]
async fn test_docs_trailing_slash_redirects_to_docs_root() {
    let gateway = start_gateway(&start_mock_backend().await).await;

    let no_redirects = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let response = no_redirects
        .get(format!("{}/docs/", gateway))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/docs");

    let response = Client::new()
        .get(format!("{}/docs/", gateway))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("url: '/docs/openapi.json'"));
}

#[test_log::test(tokio::test)]
async fn test_unknown_route_is_not_found() {
    let gateway = start_gateway(&start_mock_backend().await).await;

    let response = Client::new()
        .get(format!("{}/dashboards", gateway))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_schema_keeps_document_order() {
    let gateway = start_gateway(&start_mock_backend().await).await;

    let body = Client::new()
        .get(format!("{}/docs/openapi.json", gateway))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let position = |needle: &str| body.find(needle).unwrap();
    assert!(position("\"openapi\"") < position("\"info\""));
    assert!(position("\"info\"") < position("\"paths\""));
    assert!(position("/api/bi/reports/{report_id}") < position("/api/bi/dashboards"));
    assert!(position("/api/bi/dashboards") < position("/api/health"));
}

#[test_log::test(tokio::test)]
async fn test_nested_docs_html_is_rewritten() {
    let gateway = start_gateway(&start_mock_backend().await).await;

    let body = Client::new()
        .get(format!("{}/docs/oauth2-redirect", gateway))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(body, "<script>fetch('/docs/openapi.json')</script>");
}

#[test_log::test(tokio::test)]
async fn test_docs_assets_pass_through() {
    let gateway = start_gateway(&start_mock_backend().await).await;

    let response = Client::new()
        .get(format!("{}/docs/swagger-ui.css", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    assert_eq!(
        response.text().await.unwrap(),
        "body { color: '/openapi.json'; }"
    );
}

#[test_log::test(tokio::test)]
async fn test_schema_is_remounted_under_api() {
    let gateway = start_gateway(&start_mock_backend().await).await;

    let response = Client::new()
        .get(format!("{}/docs/openapi.json", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

    let schema: Value = response.json().await.unwrap();
    let original = upstream_schema();

    let paths = schema["paths"].as_object().unwrap();
    assert_eq!(paths.len(), original["paths"].as_object().unwrap().len());
    for (route, operations) in original["paths"].as_object().unwrap() {
        assert_eq!(&paths[&format!("/api{}", route)], operations);
    }
    assert_eq!(schema["servers"], json!([{"url": PUBLIC_API_URL}]));
    assert_eq!(schema["info"], original["info"]);
    assert_eq!(schema["openapi"], "3.1.0");
}

#[test_log::test(tokio::test)]
async fn test_accept_and_user_agent_are_forwarded() {
    let gateway = start_gateway(&start_mock_backend().await).await;

    let echoed: Value = Client::new()
        .get(format!("{}/docs/echo-headers", gateway))
        .header(header::ACCEPT, "application/json")
        .header(header::USER_AGENT, "docs-gateway-tests/1.0")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(echoed["accept"], "application/json");
    assert_eq!(echoed["user_agent"], "docs-gateway-tests/1.0");
}

#[test_log::test(tokio::test)]
async fn test_malformed_schema_is_served_unchanged() {
    let gateway = start_gateway(&start_broken_schema_backend().await).await;

    let response = Client::new()
        .get(format!("{}/docs/openapi.json", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), r#"{"paths": {"/x": "#);
}

#[test_log::test(tokio::test)]
async fn test_missing_docs_page_keeps_upstream_status() {
    let gateway = start_gateway(&start_mock_backend().await).await;

    let response = Client::new()
        .get(format!("{}/docs/does-not-exist", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_unreachable_upstream_yields_500() {
    let gateway = start_gateway(&unreachable_backend().await).await;

    let response = Client::new()
        .get(format!("{}/docs/openapi.json", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(response.text().await.unwrap(), "Error fetching OpenAPI docs");
}
