mod common;

use anyhow::Result;
use axum::http::{header, Method, StatusCode};

use common::{call, test_app};

#[tokio::test]
async fn api_docs_are_public() -> Result<()> {
    let app = test_app().await?;

    let res = call(&app, Method::GET, "/v3/api-docs", None, None).await?;
    assert_eq!(res.status, StatusCode::OK);

    let doc = res.json();
    assert_eq!(doc["info"]["title"], "Person API");
    assert_eq!(doc["info"]["version"], "v1");
    assert!(doc["paths"]["/v1/post-person"]["post"].is_object());
    Ok(())
}

#[tokio::test]
async fn swagger_ui_is_public() -> Result<()> {
    let app = test_app().await?;

    let res = call(&app, Method::GET, "/swagger-ui/index.html", None, None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res
        .headers
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()?
        .starts_with("text/html"));
    Ok(())
}

#[tokio::test]
async fn legacy_swagger_page_redirects_to_ui() -> Result<()> {
    let app = test_app().await?;

    let res = call(&app, Method::GET, "/swagger-ui.html", None, None).await?;
    assert_eq!(res.status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(res.headers.get(header::LOCATION).unwrap(), "/swagger-ui/index.html");
    Ok(())
}

#[tokio::test]
async fn api_docs_describe_basic_auth() -> Result<()> {
    let app = test_app().await?;

    let doc = call(&app, Method::GET, "/v3/api-docs", None, None).await?.json();
    assert_eq!(doc["components"]["securitySchemes"]["basicAuth"]["scheme"], "basic");
    assert!(doc["components"]["schemas"]["Person"].is_object());
    Ok(())
}

#[tokio::test]
async fn index_and_health_are_public() -> Result<()> {
    let app = test_app().await?;

    let res = call(&app, Method::GET, "/", None, None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["name"], "Person API");

    let res = call(&app, Method::GET, "/health", None, None).await?;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    Ok(())
}
