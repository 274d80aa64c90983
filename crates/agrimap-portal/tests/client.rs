//! Integration tests for `PortalClient` using wiremock HTTP mocks.

use agrimap_core::MachineType;
use agrimap_portal::{FavoriteEntry, PortalClient, PortalError};
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PortalClient {
    PortalClient::new(base_url, 30, "agrimap/0.1 (test)")
        .expect("client construction should not fail")
}

#[tokio::test]
async fn rental_locations_parses_string_counts_and_null_coordinates() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "name": "Aewol Depot",
            "lat": null,
            "lng": null,
            "address": "Jeju-si Aewol-eup 123",
            "phone": "",
            "tractor": "12",
            "cultivator": "0",
            "manager": "3",
            "rootcrop": "0",
            "thresher": "1",
            "seeder": "0",
            "riceTransplanter": "5",
            "riceHarvester": "2",
            "other": "trailer"
        },
        {
            "name": "Hongseong Depot",
            "lat": 36.6012,
            "lng": 126.6608,
            "address": "Chungcheongnam-do Hongseong-gun 45",
            "phone": "041-630-1234",
            "tractor": "7",
            "other": ""
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/map/rental-locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let records = client.rental_locations().await.expect("should parse feed");

    assert_eq!(records.len(), 2);
    let aewol = &records[0];
    assert_eq!(aewol.count(MachineType::Tractor), 12);
    assert_eq!(aewol.count(MachineType::RiceTransplanter), 5);
    assert!(aewol.needs_geocoding());
    assert_eq!(aewol.phone, None);
    assert!(aewol.has_other_equipment());

    let hongseong = &records[1];
    assert!(!hongseong.needs_geocoding());
    assert_eq!(hongseong.phone.as_deref(), Some("041-630-1234"));
    assert_eq!(hongseong.count(MachineType::Cultivator), 0, "absent count field parses as zero");
}

#[tokio::test]
async fn rental_locations_surfaces_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/map/rental-locations"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.rental_locations().await;
    assert!(matches!(result, Err(PortalError::Http(_))));
}

#[tokio::test]
async fn favorite_list_sends_bearer_token() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        { "type": "rental", "item_id": "Aewol Depot", "item_name": "Aewol Depot", "address": "Jeju-si" },
        { "type": "term", "item_id": "tillage", "item_name": "tillage", "address": "" }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/favorite/list"))
        .and(header("Authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let favorites = client
        .favorite_list("user-token")
        .await
        .expect("should parse favorites");

    assert_eq!(favorites.len(), 2);
    assert!(favorites[0].is_rental("Aewol Depot"));
    assert!(!favorites[1].is_rental("tillage"), "non-rental rows never match");
}

#[tokio::test]
async fn favorite_add_posts_the_entry() {
    let server = MockServer::start().await;

    let entry = FavoriteEntry::rental("Aewol Depot", "Jeju-si Aewol-eup 123");

    Mock::given(method("POST"))
        .and(path("/api/favorite/add"))
        .and(header("Authorization", "Bearer user-token"))
        .and(body_json(&entry))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .favorite_add("user-token", &entry)
        .await
        .expect("add should succeed");
}

#[tokio::test]
async fn favorite_add_maps_conflict_to_already_favorited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/favorite/add"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let entry = FavoriteEntry::rental("Aewol Depot", "Jeju-si");
    let result = client.favorite_add("user-token", &entry).await;
    assert!(
        matches!(result, Err(PortalError::AlreadyFavorited { ref item_id }) if item_id == "Aewol Depot")
    );
}

#[tokio::test]
async fn favorite_remove_percent_encodes_the_name() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/favorite/remove/rental/Aewol%20Depot$"))
        .and(header("Authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .favorite_remove("user-token", "rental", "Aewol Depot")
        .await
        .expect("remove should succeed");
}

#[tokio::test]
async fn favorite_remove_maps_missing_row_to_not_favorited() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/favorite/remove/rental/.*$"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.favorite_remove("user-token", "rental", "Gone Depot").await;
    assert!(
        matches!(result, Err(PortalError::NotFavorited { ref item_id }) if item_id == "Gone Depot")
    );
}
