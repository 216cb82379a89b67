//! End-to-end runs against a mock Snyk deployment.

use serde_json::{json, Value};
use snyk_migrate_to_github_app::{
    ApiEndpoints, MigrationOutcome, OutcomeSink, Runner, RunnerConfig, RunnerError, Target, Tenant,
    REST_API_VERSION,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Captures structured outcomes instead of printing them.
#[derive(Default)]
struct RecordingSink {
    listed: Vec<String>,
    total: Option<usize>,
    outcomes: Vec<(String, MigrationOutcome)>,
}

impl OutcomeSink for RecordingSink {
    fn target_listed(&mut self, target: &Target) {
        self.listed.push(target.id.clone());
    }

    fn listing_total(&mut self, count: usize) {
        self.total = Some(count);
    }

    fn migration_outcome(&mut self, target: &Target, outcome: &MigrationOutcome) {
        self.outcomes.push((target.id.clone(), outcome.clone()));
    }
}

fn runner_for(server: &MockServer, dry_run: bool, include_github_targets: bool) -> Runner {
    let base = server.uri();
    let config = RunnerConfig::new(
        "org-1".to_string(),
        "test-token".to_string(),
        Tenant::Default,
        dry_run,
        include_github_targets,
    )
    .with_endpoints(ApiEndpoints::new(&base, &base, &base));
    Runner::new(config).unwrap()
}

async fn mount_integrations_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/org/org-1/integrations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "github-enterprise": "b8a53e5f-0000-0000-0000-000000000000",
            "github-cloud-app": "c9b64f60-0000-0000-0000-000000000000",
        })))
        .mount(server)
        .await;
}

fn targets_body(count: usize, prefix: &str, next: Value) -> Value {
    let data: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("{prefix}-{i}"),
                "attributes": { "displayName": format!("acme/{prefix}-{i}") },
            })
        })
        .collect();
    json!({ "data": data, "links": { "next": next } })
}

#[tokio::test]
async fn dry_run_lists_two_pages_without_mutating() {
    let server = MockServer::start().await;
    mount_integrations_ok(&server).await;

    // Dry run must never issue a mutating request.
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orgs/org-1/targets"))
        .and(query_param("starting_after", "cursor-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(targets_body(40, "p2", json!(""))))
        .expect(1)
        .mount(&server)
        .await;

    let next = format!(
        "orgs/org-1/targets?version={REST_API_VERSION}&limit=100\
         &origin=github-enterprise&excludeEmpty=false&starting_after=cursor-2"
    );
    Mock::given(method("GET"))
        .and(path("/orgs/org-1/targets"))
        .and(query_param("origin", "github-enterprise"))
        .respond_with(ResponseTemplate::new(200).set_body_json(targets_body(60, "p1", json!(next))))
        .expect(1)
        .mount(&server)
        .await;

    let runner = runner_for(&server, true, false);
    let mut sink = RecordingSink::default();
    let summary = runner.run(&mut sink).await.unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.targets_discovered, 100);
    assert_eq!(sink.listed.len(), 100);
    assert_eq!(sink.total, Some(100));
    assert!(sink.outcomes.is_empty());
}

#[tokio::test]
async fn live_run_issues_one_patch_per_target_and_continues() {
    let server = MockServer::start().await;
    mount_integrations_ok(&server).await;

    Mock::given(method("GET"))
        .and(path("/orgs/org-1/targets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "abc123", "attributes": { "displayName": "acme/one" } },
                { "id": "def456", "attributes": { "displayName": "acme/two" } },
                { "id": "ghi789", "attributes": { "displayName": "acme/three" } },
            ],
            "links": {},
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/orgs/org-1/targets/abc123"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/orgs/org-1/targets/def456"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/orgs/org-1/targets/ghi789"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let runner = runner_for(&server, false, false);
    let mut sink = RecordingSink::default();
    let summary = runner.run(&mut sink).await.unwrap();

    // A 409 is informational; the batch ran to the end.
    assert_eq!(
        sink.outcomes,
        vec![
            ("abc123".to_string(), MigrationOutcome::AlreadyMigrated),
            ("def456".to_string(), MigrationOutcome::Migrated),
            ("ghi789".to_string(), MigrationOutcome::Failed { status: 503 }),
        ]
    );
    assert_eq!(summary.migrated, 1);
    assert_eq!(summary.already_migrated, 1);
    assert_eq!(summary.failed, 1);
    assert!(summary.has_failures());
}

#[tokio::test]
async fn include_github_targets_concatenates_both_origins() {
    let server = MockServer::start().await;
    mount_integrations_ok(&server).await;

    Mock::given(method("GET"))
        .and(path("/orgs/org-1/targets"))
        .and(query_param("origin", "github-enterprise"))
        .respond_with(ResponseTemplate::new(200).set_body_json(targets_body(2, "ghe", json!(""))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/org-1/targets"))
        .and(query_param("origin", "github"))
        .respond_with(ResponseTemplate::new(200).set_body_json(targets_body(1, "gh", json!(""))))
        .expect(1)
        .mount(&server)
        .await;

    let runner = runner_for(&server, true, true);
    let mut sink = RecordingSink::default();
    let summary = runner.run(&mut sink).await.unwrap();

    assert_eq!(summary.targets_discovered, 3);
    assert_eq!(sink.listed, vec!["ghe-0", "ghe-1", "gh-0"]);
}

#[tokio::test]
async fn verification_gate_aborts_before_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/org/org-1/integrations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "github-enterprise": "b8a53e5f-0000-0000-0000-000000000000",
        })))
        .mount(&server)
        .await;

    // Neither listing nor mutation may happen after a failed gate.
    Mock::given(method("GET"))
        .and(path("/orgs/org-1/targets"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let runner = runner_for(&server, false, false);
    let mut sink = RecordingSink::default();
    let err = runner.run(&mut sink).await.unwrap_err();

    assert!(matches!(err, RunnerError::Verify(_)));
    assert!(sink.outcomes.is_empty());
}
