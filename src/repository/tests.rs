use super::*;
use crate::blueprint::CanonicalRect;

fn image() -> ImageSource {
    ImageSource::Url("http://127.0.0.1:8000/static/blueprint.png".to_string())
}

#[test]
fn test_create_then_list() {
    let repo = InMemoryBlueprintRepository::new();
    let created = repo.create_blueprint("p1", image()).unwrap();

    assert_eq!(created.name, "Unnamed Blueprint");
    assert!(created.mappings.is_empty());

    let listed = repo.list_blueprints("p1").unwrap();
    assert_eq!(listed, vec![created]);
    assert!(repo.list_blueprints("p2").unwrap().is_empty());
}

#[test]
fn test_created_ids_are_unique() {
    let repo = InMemoryBlueprintRepository::new();
    let a = repo.create_blueprint("p1", image()).unwrap();
    let b = repo.create_blueprint("p1", image()).unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn test_rename_to_empty_falls_back_to_default() {
    let repo = InMemoryBlueprintRepository::new();
    let bp = repo.create_blueprint("p1", image()).unwrap();

    let stored = repo.rename_blueprint("p1", &bp.id, "Ground Floor").unwrap();
    assert_eq!(stored, "Ground Floor");

    let stored = repo.rename_blueprint("p1", &bp.id, "").unwrap();
    assert_eq!(stored, "Unnamed Blueprint");
    assert_eq!(repo.list_blueprints("p1").unwrap()[0].name, "Unnamed Blueprint");
}

#[test]
fn test_delete_blueprint() {
    let repo = InMemoryBlueprintRepository::new();
    let keep = repo.create_blueprint("p1", image()).unwrap();
    let drop = repo.create_blueprint("p1", image()).unwrap();

    repo.delete_blueprint("p1", &drop.id).unwrap();

    let listed = repo.list_blueprints("p1").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, keep.id);
    assert!(repo.delete_blueprint("p1", &drop.id).is_err());
}

#[test]
fn test_save_mappings_replaces_collection() {
    let repo = InMemoryBlueprintRepository::new();
    let bp = repo.create_blueprint("p1", image()).unwrap();
    let mappings = vec![
        Mapping::new(1, CanonicalRect::from_coords([0.0, 0.0, 10.0, 10.0])),
        Mapping::new(2, CanonicalRect::from_coords([5.0, 5.0, 15.0, 15.0])),
    ];

    repo.save_mappings("p1", &bp.id, &mappings).unwrap();
    assert_eq!(repo.list_blueprints("p1").unwrap()[0].mappings, mappings);

    repo.save_mappings("p1", &bp.id, &mappings[..1]).unwrap();
    assert_eq!(repo.list_blueprints("p1").unwrap()[0].mappings.len(), 1);
}

#[test]
fn test_operations_on_unknown_blueprint_fail() {
    let repo = InMemoryBlueprintRepository::new();
    assert!(repo.rename_blueprint("p1", "missing", "x").is_err());
    assert!(repo.save_mappings("p1", "missing", &[]).is_err());
}

#[test]
fn test_merge_remote_keeps_local_state() {
    let repo = InMemoryBlueprintRepository::new();
    let first = repo
        .merge_remote("p1", vec![Blueprint::new("img-1", image())])
        .unwrap();
    assert_eq!(first.len(), 1);

    repo.rename_blueprint("p1", "img-1", "Roof").unwrap();
    let mapping = Mapping::new(1, CanonicalRect::from_coords([1.0, 1.0, 2.0, 2.0]));
    repo.save_mappings("p1", "img-1", std::slice::from_ref(&mapping))
        .unwrap();
    let local = repo
        .create_blueprint("p1", ImageSource::File("plan.png".into()))
        .unwrap();

    let merged = repo
        .merge_remote(
            "p1",
            vec![Blueprint::new("img-1", image()), Blueprint::new("img-2", image())],
        )
        .unwrap();

    let ids: Vec<&str> = merged.iter().map(|bp| bp.id.as_str()).collect();
    assert_eq!(ids, vec!["img-1", "img-2", local.id.as_str()]);
    assert_eq!(merged[0].name, "Roof");
    assert_eq!(merged[0].mappings, vec![mapping]);
    assert_eq!(merged[1].name, "Unnamed Blueprint");
}

#[test]
fn test_remote_list_falls_back_to_local_copies() {
    // Nothing listens on the discard port, so the request fails fast.
    let repo = RemoteBlueprintRepository::new(crate::api::HttpClient::new("http://127.0.0.1:9"));
    let bp = repo.create_blueprint("p1", image()).unwrap();

    let listed = repo.list_blueprints("p1").unwrap();
    assert_eq!(listed, vec![bp]);
}
