//! End-to-end flow: load a project from disk, resolve it per target,
//! retire a stage, and persist the result.

use pretty_assertions::assert_eq;
use serde_json::json;
use stagecfg_core::{Error, PopulateOptions, Project, Region, Stage, Variables};
use stagecfg_fs::{DocumentStore, NormalizedPath};
use stagecfg_test_utils::{RecordingTeardown, TestProject, fixtures};
use std::sync::Arc;

#[test]
fn each_target_resolves_its_own_bucket() {
    let test = TestProject::new();
    test.save_fixture(&fixtures::billing_project());
    let project = Project::load(test.context()).unwrap();

    let targets = [
        ("prod", "us-east-1", "prod-east"),
        ("prod", "eu-west-1", "prod-default"),
        ("dev", "us-east-1", "global"),
    ];
    for (stage, region, bucket) in targets {
        let out = project
            .to_object_populated(test.context(), &PopulateOptions::for_target(stage, region))
            .unwrap();
        let env = &out["components"]["payments"]["functions"]["charge"]["environment"];
        assert_eq!(env["BUCKET"], bucket, "target {stage}/{region}");
        assert_eq!(env["STAGE"], stage);
        assert_eq!(env["TAGS"]["region"], region);
    }
}

#[test]
fn new_region_override_takes_effect_after_reload() {
    let test = TestProject::new();
    let mut project = test.save_fixture(&fixtures::billing_project());

    let mut region = Region::new("ap-south-1");
    region.set_variables([("bucket", "prod-mumbai")].into_iter().collect::<Variables>());
    project.set_region("prod", region).unwrap();
    project.save(test.context()).unwrap();

    let reloaded = Project::load(test.context()).unwrap();
    let out = reloaded
        .to_object_populated(test.context(), &PopulateOptions::for_target("prod", "ap-south-1"))
        .unwrap();
    assert_eq!(
        out["resources"]["defaultResources"]["Resources"]["Bucket"]["BucketName"],
        "prod-mumbai"
    );
}

#[tokio::test]
async fn retiring_a_stage_persists_without_it() {
    let recorder = Arc::new(RecordingTeardown::new());
    let test = TestProject::new().with_teardown(recorder.clone());
    let mut project = test.save_fixture(&fixtures::billing_project());

    let teardown = project.remove_stage("dev", test.context());
    project.save(test.context()).unwrap();
    teardown.await.unwrap();

    let on_disk: serde_json::Value = DocumentStore::new()
        .load(&NormalizedPath::new(test.root()).join("stagecfg.json"))
        .unwrap();
    assert!(on_disk["stages"].get("dev").is_none());
    assert!(on_disk["stages"].get("prod").is_some());
    assert_eq!(recorder.calls(), vec!["dev/us-east-1", "dev"]);

    let reloaded = Project::load(test.context()).unwrap();
    let err = reloaded.get_region("dev", "us-east-1").unwrap_err();
    assert!(matches!(err, Error::StageNotFound { .. }));
}

#[test]
fn fresh_project_saves_with_default_stack() {
    let test = TestProject::new();
    let mut project = Project::new();
    project.name = "greenfield".into();
    project.set_stage(Stage::new("dev"));
    project.set_region("dev", Region::new("us-west-2")).unwrap();
    project.save(test.context()).unwrap();

    let data: serde_json::Value = DocumentStore::new()
        .load(&NormalizedPath::new(test.root()).join("stagecfg.json"))
        .unwrap();
    assert_eq!(data["resources"], json!({"defaultResources": {"name": "defaultResources"}}));
    assert_eq!(data["stages"]["dev"]["regions"]["us-west-2"]["name"], "us-west-2");

    let file = test.context().file_path(&["stagecfg.json"]).unwrap();
    assert!(file.is_file());
}
