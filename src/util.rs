use serde_json::Value;

pub fn resource_name(resource: &Value) -> String {
    if let Some(attrs) = resource.get("attributes") {
        if let Some(s) = attrs.get("name").and_then(|n| n.as_str()) {
            return s.to_string();
        }
        if let Some(s) = attrs.get("versionString").and_then(|n| n.as_str()) {
            return s.to_string();
        }
        if let Some(s) = attrs.get("email").and_then(|n| n.as_str()) {
            return s.to_string();
        }
    }
    resource
        .get("id")
        .and_then(|i| i.as_str())
        .unwrap_or("<unknown>")
        .to_string()
}

pub fn resource_id(resource: &Value) -> String {
    resource
        .get("id")
        .and_then(|i| i.as_str())
        .unwrap_or("")
        .to_string()
}

pub fn pretty_state(resource: &Value) -> String {
    let attributes = resource.get("attributes");
    let state = attributes
        .and_then(|a| a.get("appStoreState"))
        .and_then(|s| s.as_str())
        .or_else(|| {
            attributes
                .and_then(|a| a.get("state"))
                .and_then(|s| s.as_str())
        })
        .unwrap_or("UNKNOWN");
    state.to_string()
}
