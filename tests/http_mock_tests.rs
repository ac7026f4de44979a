#![cfg(feature = "http-mock")]

use asconnect::apps::GetAppInfoQuery;
use asconnect::users::ListInvitationsQuery;
use asconnect::{AppStoreConnectClient, Config};
use httpmock::{Method::GET, MockServer};
use serde_json::json;

fn mock_client(server: &MockServer) -> AppStoreConnectClient {
    let cfg = Config {
        issuer_id: "ignored".into(),
        key_id: "ignored".into(),
        p8_private_key_pem: "ignored".into(),
    };
    AppStoreConnectClient::new(cfg, true)
        .unwrap()
        .with_static_token("test")
        .with_base_url(reqwest::Url::parse(&server.base_url()).unwrap())
}

#[tokio::test]
async fn get_app_info_deserializes_typed_response() {
    let server = MockServer::start();

    let _m = server.mock(|when, then| {
        when.method(GET).path("/v1/appInfos/info1");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "data": {
                    "id": "info1",
                    "type": "appInfos",
                    "attributes": {
                        "appStoreState": "READY_FOR_SALE",
                        "appStoreAgeRating": "FOUR_PLUS"
                    },
                    "links": {"self": "https://example.com/v1/appInfos/info1"}
                },
                "links": {"self": "https://example.com/v1/appInfos/info1"}
            }));
    });

    let client = mock_client(&server);
    let res = client
        .get_app_info("info1", &GetAppInfoQuery::default())
        .await
        .unwrap();
    assert_eq!(res.data.id, "info1");
    let attrs = res.data.attributes.unwrap();
    assert_eq!(
        attrs.app_store_state,
        Some(asconnect::apps::AppStoreVersionState::ReadyForSale)
    );
    assert_eq!(
        attrs.app_store_age_rating,
        Some(asconnect::apps::AppStoreAgeRating::FourPlus)
    );
}

#[tokio::test]
async fn list_invitations_sends_comma_joined_filters() {
    let server = MockServer::start();

    let _m = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/userInvitations")
            .query_param("filter[roles]", "ADMIN,DEVELOPER")
            .query_param("limit", "10");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "data": [{
                    "id": "inv1",
                    "type": "userInvitations",
                    "attributes": {"email": "dev@example.com", "roles": ["DEVELOPER"]},
                    "links": {}
                }],
                "links": {}
            }));
    });

    let client = mock_client(&server);
    let query = ListInvitationsQuery {
        filter_roles: vec!["ADMIN".into(), "DEVELOPER".into()],
        limit: Some(10),
        ..Default::default()
    };
    let res = client.list_invitations(&query).await.unwrap();
    assert_eq!(res.data.len(), 1);
    let attrs = res.data[0].attributes.clone().unwrap();
    assert_eq!(attrs.email.as_deref(), Some("dev@example.com"));
    assert_eq!(attrs.roles, Some(vec![asconnect::users::UserRole::Developer]));
}

#[tokio::test]
async fn list_all_follows_next_links() {
    let server = MockServer::start();

    let page2_url = server.url("/v1/apps?cursor=next");
    let _p1 = server.mock(|when, then| {
        when.method(GET).path("/v1/apps").query_param_exists("limit");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "data": [{"id": "app1"}],
                "links": {"next": page2_url}
            }));
    });
    let _p2 = server.mock(|when, then| {
        when.method(GET).path("/v1/apps").query_param("cursor", "next");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"data": [{"id": "app2"}], "links": {}}));
    });

    let client = mock_client(&server);
    let items = client.list_all("v1/apps?limit=200").await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], "app1");
    assert_eq!(items[1]["id"], "app2");
}
