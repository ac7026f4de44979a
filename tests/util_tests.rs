use serde_json::json;

#[test]
fn resource_name_and_id_fallbacks() {
    let v = json!({"id":"abc","attributes": {"name": "My App"}});
    assert_eq!(asconnect::resource_name(&v), "My App");
    assert_eq!(asconnect::resource_id(&v), "abc");

    let v2 = json!({"id":"def","attributes": {"versionString": "1.2.3"}});
    assert_eq!(asconnect::resource_name(&v2), "1.2.3");
    assert_eq!(asconnect::resource_id(&v2), "def");

    let v3 = json!({"id":"ghi","attributes": {"email": "dev@example.com"}});
    assert_eq!(asconnect::resource_name(&v3), "dev@example.com");

    let v4 = json!({"id":"jkl"});
    assert_eq!(asconnect::resource_name(&v4), "jkl");
    assert_eq!(asconnect::resource_id(&v4), "jkl");
}

#[test]
fn pretty_state_prefers_app_store_state() {
    let v = json!({"attributes": {"appStoreState": "READY_FOR_SALE", "state": "SOMETHING"}});
    assert_eq!(asconnect::pretty_state(&v), "READY_FOR_SALE");
    let v2 = json!({"attributes": {"state": "ACCEPTED"}});
    assert_eq!(asconnect::pretty_state(&v2), "ACCEPTED");
    let v3 = json!({"id": "x"});
    assert_eq!(asconnect::pretty_state(&v3), "UNKNOWN");
}
