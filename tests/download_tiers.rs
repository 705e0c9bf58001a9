mod helpers;

use std::time::Duration;

use helpers::{BROWSER_UA, MINIMAL_UA, NoUserAgent, UserAgent, fast_config, jpeg_bytes, png_bytes};
use pixelgrab::{PipelineError, Tier, fetch_image};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

#[tokio::test]
async fn full_tier_sends_browser_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/img/a.jpg"))
        .and(UserAgent(BROWSER_UA))
        .and(header("referer", "https://127.0.0.1/"))
        .and(header("sec-fetch-dest", "image"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(jpeg_bytes(64, 48))
                .insert_header("Content-Type", "image/jpeg"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/img/a.jpg", mock_server.uri());
    let image = fetch_image(&url, &fast_config()).await.unwrap();

    assert_eq!(image.tier, Tier::Full);
    assert_eq!(image.content_type, "image/jpeg");
    assert_eq!((image.width, image.height), (64, 48));
}

#[tokio::test]
async fn forbidden_full_tier_retries_with_minimal_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(UserAgent(BROWSER_UA))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(UserAgent(MINIMAL_UA))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(10, 20)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(NoUserAgent)
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let url = format!("{}/protected.png", mock_server.uri());
    let image = fetch_image(&url, &fast_config()).await.unwrap();

    assert_eq!(image.tier, Tier::Minimal);
    assert_eq!(image.content_type, "image/png");
    assert_eq!((image.width, image.height), (10, 20));
}

#[tokio::test]
async fn unauthorized_counts_as_denied() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(UserAgent(BROWSER_UA))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(UserAgent(MINIMAL_UA))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(2, 2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/a.png", mock_server.uri());
    let image = fetch_image(&url, &fast_config()).await.unwrap();
    assert_eq!(image.tier, Tier::Minimal);
}

#[tokio::test]
async fn transport_error_on_full_tier_skips_to_bare() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(UserAgent(BROWSER_UA))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(png_bytes(4, 4))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(UserAgent(MINIMAL_UA))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(4, 4)))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(NoUserAgent)
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(7, 3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/slow.png", mock_server.uri());
    let image = fetch_image(&url, &fast_config()).await.unwrap();

    assert_eq!(image.tier, Tier::Bare);
    assert_eq!((image.width, image.height), (7, 3));
}

#[tokio::test]
async fn undecodable_body_on_full_tier_skips_to_bare() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(UserAgent(BROWSER_UA))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes("<html>Please enable JavaScript</html>".as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(UserAgent(MINIMAL_UA))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(1, 1)))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(NoUserAgent)
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(5, 5)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/wall.jpg", mock_server.uri());
    let image = fetch_image(&url, &fast_config()).await.unwrap();
    assert_eq!(image.tier, Tier::Bare);
}

#[tokio::test]
async fn other_status_on_full_tier_is_terminal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(UserAgent(BROWSER_UA))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(UserAgent(MINIMAL_UA))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(1, 1)))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(NoUserAgent)
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(1, 1)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let url = format!("{}/gone.png", mock_server.uri());
    let err = fetch_image(&url, &fast_config()).await.unwrap_err();
    assert!(matches!(err, PipelineError::FetchFailed { .. }), "{err:?}");
}

#[tokio::test]
async fn denied_everywhere_reports_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(3)
        .mount(&mock_server)
        .await;

    let url = format!("{}/private.jpg", mock_server.uri());
    let err = fetch_image(&url, &fast_config()).await.unwrap_err();
    assert!(matches!(err, PipelineError::Forbidden { .. }), "{err:?}");
}

#[tokio::test]
async fn never_an_image_reports_decode_failed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"GIF87a-not-really".as_slice()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let url = format!("{}/fake.gif", mock_server.uri());
    let err = fetch_image(&url, &fast_config()).await.unwrap_err();
    assert!(matches!(err, PipelineError::DecodeFailed { .. }), "{err:?}");
}

#[tokio::test]
async fn oversized_image_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(200, 200)))
        .mount(&mock_server)
        .await;

    let config = fast_config().with_max_image_bytes(64);
    let url = format!("{}/big.png", mock_server.uri());
    let err = fetch_image(&url, &config).await.unwrap_err();
    assert!(matches!(err, PipelineError::FetchFailed { .. }), "{err:?}");
}

#[tokio::test]
async fn unparsable_image_url_fails_without_network() {
    let err = fetch_image("::not a url::", &fast_config()).await.unwrap_err();
    assert!(matches!(err, PipelineError::FetchFailed { .. }));
}
