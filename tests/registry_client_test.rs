//! Integration tests for the registry client against a mock HTTP server

use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use std::sync::Arc;
use tourmark::adapters::registry::{EnvCredential, RegistryClient, StaticCredential};
use tourmark::config::{secret_string, RegistryConfig, RetryConfig};
use tourmark::domain::{ErrorKind, PoiId};

fn config(server: &ServerGuard) -> RegistryConfig {
    RegistryConfig {
        base_url: server.url(),
        service_key: None,
        service_key_env: None,
        retry: RetryConfig {
            max_retries: 3,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 2.0,
        },
        ..RegistryConfig::default()
    }
}

fn client(server: &ServerGuard) -> RegistryClient {
    RegistryClient::new(config(server))
        .unwrap()
        .with_credential(Arc::new(StaticCredential::new(secret_string(
            "test-key".to_string(),
        ))))
}

fn envelope(items: Value, total_count: u64) -> String {
    json!({
        "response": {
            "header": { "resultCode": "0000", "resultMsg": "OK" },
            "body": {
                "items": items,
                "numOfRows": 10,
                "pageNo": 1,
                "totalCount": total_count
            }
        }
    })
    .to_string()
}

fn place(id: &str, title: &str) -> Value {
    json!({
        "contentid": id,
        "contenttypeid": "12",
        "title": title,
        "addr1": "서울특별시 종로구 사직로 161",
        "addr2": "",
        "mapx": "126.9769930325",
        "mapy": "37.5788222356",
        "firstimage": "http://tong.visitkorea.or.kr/cms/resource/33/2678633_image2_1.jpg",
        "modifiedtime": "20240301120000"
    })
}

#[tokio::test]
async fn test_list_sends_common_params_and_filters() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/areaBasedList1")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("serviceKey".into(), "test-key".into()),
            Matcher::UrlEncoded("MobileOS".into(), "ETC".into()),
            Matcher::UrlEncoded("MobileApp".into(), "tourmark".into()),
            Matcher::UrlEncoded("_type".into(), "json".into()),
            Matcher::UrlEncoded("areaCode".into(), "1".into()),
            Matcher::UrlEncoded("contentTypeId".into(), "12".into()),
            Matcher::UrlEncoded("numOfRows".into(), "21".into()),
            Matcher::UrlEncoded("pageNo".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(
            json!({ "item": [place("126508", "경복궁"), place("126512", "창덕궁")] }),
            45,
        ))
        .create_async()
        .await;

    let page = client(&server)
        .list_by_area_and_category(Some("1"), Some("12"), 21, 1)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.total_count, 45);
    assert_eq!(page.records[0].id.as_str(), "126508");
    let coords = page.records[0].coordinates.unwrap();
    assert_eq!(coords.raw_x, 1_269_769_930);
}

#[tokio::test]
async fn test_absent_items_normalize_to_empty() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/searchKeyword1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(envelope(json!(""), 0))
        .create_async()
        .await;

    let page = client(&server)
        .search_by_keyword("nowhere", None, None, 10, 1)
        .await
        .unwrap();
    assert!(page.records.is_empty());
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn test_single_item_equals_one_element_array() {
    let mut server = Server::new_async().await;
    let _single = server
        .mock("GET", "/searchKeyword1")
        .match_query(Matcher::UrlEncoded("keyword".into(), "single".into()))
        .with_status(200)
        .with_body(envelope(json!({ "item": place("126508", "경복궁") }), 1))
        .create_async()
        .await;
    let _array = server
        .mock("GET", "/searchKeyword1")
        .match_query(Matcher::UrlEncoded("keyword".into(), "array".into()))
        .with_status(200)
        .with_body(envelope(json!({ "item": [place("126508", "경복궁")] }), 1))
        .create_async()
        .await;

    let client = client(&server);
    let single = client
        .search_by_keyword("single", None, None, 10, 1)
        .await
        .unwrap();
    let array = client
        .search_by_keyword("array", None, None, 10, 1)
        .await
        .unwrap();
    assert_eq!(single.records, array.records);
    assert_eq!(single.records.len(), 1);
}

#[tokio::test]
async fn test_identical_requests_hit_the_cache() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/detailCommon1")
        .match_query(Matcher::UrlEncoded("contentId".into(), "126508".into()))
        .with_status(200)
        .with_body(envelope(json!({ "item": place("126508", "경복궁") }), 1))
        .expect(1)
        .create_async()
        .await;

    let client = client(&server);
    let id = PoiId::new("126508").unwrap();
    let first = client.get_detail(&id).await.unwrap().unwrap();
    let second = client.get_detail(&id).await.unwrap().unwrap();

    mock.assert_async().await;
    assert_eq!(first, second);
    assert_eq!(client.cache().len(), 1);
}

#[tokio::test]
async fn test_registry_error_code_is_domain_error_and_not_retried() {
    let mut server = Server::new_async().await;
    let body = json!({
        "response": {
            "header": {
                "resultCode": "30",
                "resultMsg": "SERVICE KEY IS NOT REGISTERED ERROR."
            }
        }
    })
    .to_string();
    let mock = server
        .mock("GET", "/areaBasedList1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(body)
        .expect(1)
        .create_async()
        .await;

    let err = client(&server)
        .list_by_area_and_category(None, None, 10, 1)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert_eq!(err.code(), Some("30"));
    assert!(err.to_string().contains("NOT REGISTERED"));
}

#[tokio::test]
async fn test_server_errors_are_retried_then_surface_status() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/areaBasedList1")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(3)
        .create_async()
        .await;

    let err = client(&server)
        .list_by_area_and_category(None, None, 10, 1)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/detailImage1")
        .match_query(Matcher::Any)
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let err = client(&server)
        .get_images(&PoiId::new("126508").unwrap(), 10, 1)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_missing_credential_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = RegistryConfig {
        service_key_env: Some("TOURMARK_IT_NEVER_SET_SERVICE_KEY".to_string()),
        ..config(&server)
    };
    let err = RegistryClient::new(config)
        .unwrap()
        .list_by_area_and_category(None, None, 10, 1)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_blank_keyword_is_rejected_before_any_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = client(&server)
        .search_by_keyword("   ", None, None, 10, 1)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_rotated_key_is_used_on_next_call() {
    const VAR: &str = "TOURMARK_IT_ROTATING_SERVICE_KEY";
    let mut server = Server::new_async().await;
    let old_key = server
        .mock("GET", "/areaBasedList1")
        .match_query(Matcher::UrlEncoded("serviceKey".into(), "key-one".into()))
        .with_status(200)
        .with_body(envelope(json!(""), 0))
        .expect(1)
        .create_async()
        .await;
    let new_key = server
        .mock("GET", "/areaBasedList1")
        .match_query(Matcher::UrlEncoded("serviceKey".into(), "key-two".into()))
        .with_status(200)
        .with_body(envelope(json!(""), 0))
        .expect(1)
        .create_async()
        .await;

    let client = RegistryClient::new(config(&server))
        .unwrap()
        .with_credential(Arc::new(EnvCredential::new(VAR)));

    std::env::set_var(VAR, "key-one");
    client
        .list_by_area_and_category(None, None, 10, 1)
        .await
        .unwrap();

    std::env::set_var(VAR, "key-two");
    client
        .list_by_area_and_category(None, None, 10, 2)
        .await
        .unwrap();
    std::env::remove_var(VAR);

    old_key.assert_async().await;
    new_key.assert_async().await;
}

#[tokio::test]
async fn test_detail_intro_and_images() {
    let mut server = Server::new_async().await;
    let _intro = server
        .mock("GET", "/detailIntro1")
        .match_query(Matcher::UrlEncoded("contentTypeId".into(), "39".into()))
        .with_status(200)
        .with_body(envelope(
            json!({ "item": {
                "contentid": "2733967",
                "contenttypeid": "39",
                "opentimefood": "11:00~21:00",
                "restdatefood": "월요일",
                "parkingfood": ""
            }}),
            1,
        ))
        .create_async()
        .await;
    let _images = server
        .mock("GET", "/detailImage1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(envelope(
            json!({ "item": [
                { "originimgurl": "http://example.com/a.jpg", "smallimageurl": "http://example.com/a_s.jpg", "imgname": "a" },
                { "originimgurl": "", "imgname": "broken" }
            ]}),
            2,
        ))
        .create_async()
        .await;

    let client = client(&server);
    let id = PoiId::new("2733967").unwrap();

    let info = client.get_operating_info(&id, "39").await.unwrap().unwrap();
    assert_eq!(info.opening_hours(), Some("11:00~21:00"));
    assert_eq!(info.rest_days(), Some("월요일"));
    assert_eq!(info.parking(), None);
    assert!(info.field("contentid").is_none());

    let images = client.get_images(&id, 10, 1).await.unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].origin_url, "http://example.com/a.jpg");
}
