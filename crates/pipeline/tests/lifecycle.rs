//! End-to-end lifecycle runs against a scripted transport.

use kata_api::testing::ScriptedTransport;
use kata_api::Method;
use kata_core::{Context, RetryConfig};
use kata_files::AlwaysConfirm;
use kata_model::{Difficulty, Exercise, Solution};
use kata_pipeline::{Pipeline, SubmitOptions, ToolchainRegistry};
use serde_json::json;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

const CONFIG_PATH: &str = "/api/v1/solutions/sol-1/files/.exercism/config.json";
const SUBMISSIONS_PATH: &str = "/api/v2/solutions/sol-1/submissions";
const TEST_RUN_PATH: &str = "/api/v2/solutions/sol-1/submissions/sub-1/test_run";
const ITERATIONS_PATH: &str = "/api/v2/solutions/sol-1/iterations";
const SOLUTION_PATH: &str = "/api/v2/solutions/sol-1";
const EXERCISES_PATH: &str = "/api/v2/tracks/rust/exercises?sideload[]=solutions";

fn context(dir: &TempDir) -> Context {
    Context::new(dir.path(), "token")
        .unwrap()
        .with_cache_dir(None)
        .with_retry(RetryConfig {
            max_attempts: 3,
            min_timeout: Duration::from_millis(1),
            max_timeout: Duration::from_millis(2),
        })
}

fn solution_json(status: &str) -> serde_json::Value {
    let mut inner = json!({
        "uuid": "sol-1",
        "status": status,
        "track_slug": "rust",
        "exercise_slug": "gigasecond",
    });
    if status != "started" {
        inner["num_iterations"] = json!(1);
        inner["latest_iteration"] = json!({
            "tests_status": "passed",
            "is_published": status == "published",
        });
    }
    json!({ "solution": inner })
}

fn solution(status: &str) -> Solution {
    Solution::from_payload(&solution_json(status)).unwrap()
}

fn exercise(sol: Option<Solution>) -> Exercise {
    Exercise {
        track: "rust".to_string(),
        slug: "gigasecond".to_string(),
        difficulty: Difficulty::Easy,
        unlocked: true,
        solution: sol,
    }
}

fn write_local(dir: &TempDir, content: &str) {
    let path = dir.path().join("rust/gigasecond/src/lib.rs");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn manifest() -> serde_json::Value {
    json!({ "files": { "solution": ["src/lib.rs"], "test": [], "editor": [] } })
}

#[tokio::test]
async fn submit_creates_an_iteration_after_a_queued_test_run() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    write_local(&dir, "pub fn after() {}");

    let transport = ScriptedTransport::new();
    transport
        .route(Method::Get, CONFIG_PATH, manifest())
        .route(
            Method::Post,
            SUBMISSIONS_PATH,
            json!({ "submission": { "uuid": "sub-1" } }),
        )
        .route(Method::Get, TEST_RUN_PATH, json!({ "test_run": { "status": "queued" } }))
        .route(Method::Get, TEST_RUN_PATH, json!({ "test_run": { "status": "queued" } }))
        .route(Method::Get, TEST_RUN_PATH, json!({ "test_run": { "status": "pass" } }))
        .route(
            Method::Post,
            ITERATIONS_PATH,
            json!({ "iteration": { "tests_status": "passed" } }),
        )
        .route(Method::Get, SOLUTION_PATH, solution_json("iterated"));
    let client = transport.client();

    let toolchains = ToolchainRegistry::new();
    let pipeline = Pipeline::new(&client, &ctx, &toolchains, &AlwaysConfirm);
    let mut sol = solution("started");

    let submitted = pipeline
        .submit(&mut sol, &SubmitOptions::default())
        .await
        .unwrap();

    assert!(submitted);
    assert!(sol.iterated());
    // manifest + upload + 3 polls + iteration + sync
    assert_eq!(transport.calls(), 7);
}

#[tokio::test]
async fn failed_test_run_is_false_and_creates_no_iteration() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    write_local(&dir, "pub fn after() {}");

    // No iterations route: the run fails loudly if one is attempted
    let transport = ScriptedTransport::new();
    transport
        .route(Method::Get, CONFIG_PATH, manifest())
        .route(
            Method::Post,
            SUBMISSIONS_PATH,
            json!({ "submission": { "uuid": "sub-1" } }),
        )
        .route(Method::Get, TEST_RUN_PATH, json!({ "test_run": { "status": "fail" } }));
    let client = transport.client();

    let toolchains = ToolchainRegistry::new();
    let pipeline = Pipeline::new(&client, &ctx, &toolchains, &AlwaysConfirm);
    let mut sol = solution("started");

    let submitted = pipeline
        .submit(&mut sol, &SubmitOptions::default())
        .await
        .unwrap();

    assert!(!submitted);
    assert!(!sol.iterated());
    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn exhausted_test_run_polling_is_false_not_an_error() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    write_local(&dir, "pub fn after() {}");

    let transport = ScriptedTransport::new();
    transport
        .route(Method::Get, CONFIG_PATH, manifest())
        .route(
            Method::Post,
            SUBMISSIONS_PATH,
            json!({ "submission": { "uuid": "sub-1" } }),
        )
        .route(Method::Get, TEST_RUN_PATH, json!({ "test_run": { "status": "queued" } }));
    let client = transport.client();

    let toolchains = ToolchainRegistry::new();
    let pipeline = Pipeline::new(&client, &ctx, &toolchains, &AlwaysConfirm);
    let mut sol = solution("started");

    let submitted = pipeline
        .submit(&mut sol, &SubmitOptions::default())
        .await
        .unwrap();

    assert!(!submitted);
    // manifest + upload + max_attempts polls
    assert_eq!(transport.calls(), 5);
}

#[tokio::test]
async fn submit_without_an_accepted_submission_is_false() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    write_local(&dir, "pub fn after() {}");

    let transport = ScriptedTransport::new();
    transport
        .route(Method::Get, CONFIG_PATH, manifest())
        .route(Method::Post, SUBMISSIONS_PATH, json!({}));
    let client = transport.client();

    let toolchains = ToolchainRegistry::new();
    let pipeline = Pipeline::new(&client, &ctx, &toolchains, &AlwaysConfirm);
    let mut sol = solution("started");

    let submitted = pipeline
        .submit(&mut sol, &SubmitOptions::default())
        .await
        .unwrap();

    assert!(!submitted);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn unchanged_iterated_solution_short_circuits_the_submit() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);
    write_local(&dir, "iterated body");

    let transport = ScriptedTransport::new();
    transport
        .route(Method::Get, CONFIG_PATH, manifest())
        .route(
            Method::Get,
            "/api/v2/solutions/sol-1/last_iteration_files",
            json!({ "files": [
                { "filename": "src/lib.rs", "content": "iterated body" },
            ]}),
        );
    let client = transport.client();

    let toolchains = ToolchainRegistry::new();
    let pipeline = Pipeline::new(&client, &ctx, &toolchains, &AlwaysConfirm);
    let mut sol = solution("iterated");

    let submitted = pipeline
        .submit(&mut sol, &SubmitOptions::default())
        .await
        .unwrap();

    assert!(submitted);
    // manifest + remote bundle; no upload, no test run
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn complete_is_idempotent_without_network_calls() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let transport = ScriptedTransport::new();
    let client = transport.client();
    let toolchains = ToolchainRegistry::new();
    let pipeline = Pipeline::new(&client, &ctx, &toolchains, &AlwaysConfirm);

    let mut ex = exercise(Some(solution("completed")));
    assert!(pipeline.complete(&mut ex).await.unwrap());
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn complete_requires_an_iteration() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let transport = ScriptedTransport::new();
    let client = transport.client();
    let toolchains = ToolchainRegistry::new();
    let pipeline = Pipeline::new(&client, &ctx, &toolchains, &AlwaysConfirm);

    let mut started = exercise(Some(solution("started")));
    assert!(!pipeline.complete(&mut started).await.unwrap());

    let mut unstarted = exercise(None);
    assert!(!pipeline.complete(&mut unstarted).await.unwrap());

    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn complete_marks_the_solution_and_rechecks_unlocks() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let before = json!({
        "exercises": [
            { "slug": "gigasecond", "difficulty": "easy", "is_unlocked": true },
            { "slug": "forth", "difficulty": "hard", "is_unlocked": false },
        ],
        "solutions": []
    });
    let after = json!({
        "exercises": [
            { "slug": "gigasecond", "difficulty": "easy", "is_unlocked": true },
            { "slug": "forth", "difficulty": "hard", "is_unlocked": true },
        ],
        "solutions": []
    });

    let transport = ScriptedTransport::new();
    transport
        .route(Method::Get, EXERCISES_PATH, before)
        .route(Method::Get, EXERCISES_PATH, after)
        .route(Method::Patch, "/api/v2/solutions/sol-1/complete", json!({}))
        .route(Method::Get, SOLUTION_PATH, solution_json("completed"));
    let client = transport.client();

    let toolchains = ToolchainRegistry::new();
    let pipeline = Pipeline::new(&client, &ctx, &toolchains, &AlwaysConfirm);

    let mut ex = exercise(Some(solution("iterated")));
    let completed = pipeline.complete(&mut ex).await.unwrap();

    assert!(completed);
    assert!(ex.solution.as_ref().unwrap().completed());
    // before listing + complete + sync + after listing
    assert_eq!(transport.calls(), 4);
}

#[tokio::test]
async fn publish_is_idempotent_and_requires_completion() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let transport = ScriptedTransport::new();
    let client = transport.client();
    let toolchains = ToolchainRegistry::new();
    let pipeline = Pipeline::new(&client, &ctx, &toolchains, &AlwaysConfirm);

    let mut published = solution("published");
    assert!(pipeline.publish(&mut published).await.unwrap());

    let mut iterated = solution("iterated");
    assert!(!pipeline.publish(&mut iterated).await.unwrap());

    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn publish_patches_solution_and_iteration_then_syncs() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let transport = ScriptedTransport::new();
    transport
        .route(Method::Patch, "/api/v2/solutions/sol-1/publish", json!({}))
        .route(
            Method::Patch,
            "/api/v2/solutions/sol-1/published_iteration",
            json!({}),
        )
        .route(Method::Get, SOLUTION_PATH, solution_json("published"));
    let client = transport.client();

    let toolchains = ToolchainRegistry::new();
    let pipeline = Pipeline::new(&client, &ctx, &toolchains, &AlwaysConfirm);

    let mut sol = solution("completed");
    let published = pipeline.publish(&mut sol).await.unwrap();

    assert!(published);
    assert!(sol.published());
    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn update_of_a_current_solution_is_a_noop_success() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let transport = ScriptedTransport::new();
    let client = transport.client();
    let toolchains = ToolchainRegistry::new();
    let pipeline = Pipeline::new(&client, &ctx, &toolchains, &AlwaysConfirm);

    let mut sol = solution("iterated");
    assert!(pipeline.update(&mut sol).await.unwrap());
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn update_succeeds_even_when_refreshed_tests_fail() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let refreshed = json!({ "solution": {
        "uuid": "sol-1",
        "status": "iterated",
        "num_iterations": 2,
        "is_out_of_date": false,
        "track_slug": "rust",
        "exercise_slug": "gigasecond",
        "latest_iteration": { "tests_status": "failed" },
    }});

    let transport = ScriptedTransport::new();
    transport
        .route(Method::Patch, "/api/v2/solutions/sol-1/sync", json!({}))
        .route(Method::Get, SOLUTION_PATH, refreshed);
    let client = transport.client();

    let toolchains = ToolchainRegistry::new();
    let pipeline = Pipeline::new(&client, &ctx, &toolchains, &AlwaysConfirm);

    let mut sol = solution("iterated");
    sol.out_of_date = true;

    let updated = pipeline.update(&mut sol).await.unwrap();

    assert!(updated, "a failing refreshed iteration is a degraded success");
    assert!(!sol.out_of_date);
    assert!(sol.iteration.as_ref().unwrap().failing());
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn start_downloads_the_fresh_solution() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir);

    let transport = ScriptedTransport::new();
    transport
        .route(
            Method::Patch,
            "/api/v2/tracks/rust/exercises/gigasecond/start",
            solution_json("started"),
        )
        .route(Method::Get, SOLUTION_PATH, solution_json("started"))
        .route(Method::Get, CONFIG_PATH, manifest())
        .route(
            Method::Get,
            "/api/v1/solutions/sol-1/files/src/lib.rs",
            json!("pub fn after() {}"),
        );
    let client = transport.client();

    let toolchains = ToolchainRegistry::new();
    let pipeline = Pipeline::new(&client, &ctx, &toolchains, &AlwaysConfirm);

    let sol = pipeline.start("rust", "gigasecond").await.unwrap();

    assert_eq!(sol.uuid, "sol-1");
    let local = dir.path().join("rust/gigasecond/src/lib.rs");
    assert_eq!(fs::read_to_string(local).unwrap(), "pub fn after() {}");
}
