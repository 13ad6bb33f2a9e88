use super::*;

fn fields() -> NewProject {
    NewProject {
        name: "Bridge Retrofit".to_string(),
        address: "1 Harbor Way".to_string(),
        manager_name: "Pat Doe".to_string(),
        manager_phone: "555-000-1111".to_string(),
    }
}

#[test]
fn test_project_read_maps_to_project() {
    let json = r#"{
        "id": "42",
        "project_name": "Depot",
        "location": "9 Rail St",
        "project_manager": {
            "id": "m1",
            "name": "Jo",
            "phone": "555-1",
            "created_at": "2025-01-01T00:00:00",
            "last_updated": "2025-01-01T00:00:00"
        },
        "permits": [{
            "id": "p1",
            "project_id": "42",
            "issued_at": "2025-01-01T00:00:00",
            "expires_at": "2026-01-01T00:00:00",
            "image_url": "https://example.com/p1.png",
            "created_at": "2025-01-01T00:00:00",
            "last_updated": "2025-01-01T00:00:00"
        }]
    }"#;

    let project: Project = serde_json::from_str::<ProjectRead>(json).unwrap().into();

    assert_eq!(project.id, "42");
    assert_eq!(project.name, "Depot");
    assert_eq!(project.address, "9 Rail St");
    assert_eq!(project.manager_name, "Jo");
    assert_eq!(project.manager_phone, "555-1");
    assert_eq!(project.permits.len(), 1);
    assert_eq!(project.permits[0].image_url, "https://example.com/p1.png");
}

#[test]
fn test_project_read_null_permits() {
    let json = r#"{
        "id": "7",
        "project_name": "Shed",
        "location": "Yard",
        "project_manager": {"name": "A", "phone": "1"},
        "permits": null
    }"#;
    let project: Project = serde_json::from_str::<ProjectRead>(json).unwrap().into();
    assert!(project.permits.is_empty());
}

#[test]
fn test_project_write_shape() {
    let body = serde_json::to_value(ProjectWrite::from(&fields())).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "project_name": "Bridge Retrofit",
            "location": "1 Harbor Way",
            "project_manager": {"name": "Pat Doe", "phone": "555-000-1111"}
        })
    );
}

#[test]
fn test_validate_requires_every_field() {
    assert!(fields().validate().is_ok());

    let mut missing = fields();
    missing.address = "  ".to_string();
    missing.manager_phone.clear();
    let err = missing.validate().unwrap_err().to_string();
    assert!(err.contains("address"));
    assert!(err.contains("manager phone"));
}

#[test]
fn test_sample_projects() {
    let samples = sample_projects();
    assert_eq!(samples.len(), 5);
    assert_eq!(samples[0].name, "Downtown Office Renovation");
    assert_eq!(samples[0].permits.len(), 1);
    assert!(samples[1..].iter().all(|p| p.permits.is_empty()));
}

#[test]
fn test_in_memory_create_get_update() {
    let api = InMemoryProjectApi::with_projects(sample_projects());

    let created = api.create_project(&fields()).unwrap();
    assert_eq!(created.id, "6");
    assert_eq!(api.list_projects().unwrap().len(), 6);
    assert_eq!(api.get_project("6").unwrap(), Some(created));
    assert_eq!(api.get_project("missing").unwrap(), None);

    let mut changed = fields();
    changed.manager_name = "Sam Roe".to_string();
    let updated = api.update_project("6", &changed).unwrap();
    assert_eq!(updated.manager_name, "Sam Roe");
}

#[test]
fn test_in_memory_create_rejects_blank_fields() {
    let api = InMemoryProjectApi::default();
    assert!(api.create_project(&NewProject::default()).is_err());
    assert!(api.list_projects().unwrap().is_empty());
}

#[test]
fn test_remote_list_falls_back_to_samples() {
    let api = RemoteProjectApi::new(HttpClient::new("http://127.0.0.1:9"));
    assert_eq!(api.list_projects().unwrap(), sample_projects());
}

#[test]
fn test_remote_get_surfaces_transport_errors() {
    let api = RemoteProjectApi::new(HttpClient::new("http://127.0.0.1:9"));
    assert!(matches!(api.get_project("1"), Err(ApiError::Transport { .. })));
}

#[test]
fn test_http_client_url_join() {
    let http = HttpClient::new("http://127.0.0.1:8000/");
    assert_eq!(http.url("/v1/projects/"), "http://127.0.0.1:8000/v1/projects/");
    assert_eq!(http.base_url(), "http://127.0.0.1:8000");
}

#[test]
fn test_not_found_detection() {
    let err = ApiError::Status {
        url: "u".to_string(),
        status: 404,
    };
    assert!(err.is_not_found());
    let err = ApiError::Status {
        url: "u".to_string(),
        status: 500,
    };
    assert!(!err.is_not_found());
}
