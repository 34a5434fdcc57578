use std::collections::BTreeSet;
use std::io::Write;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use httpmock::prelude::*;
use runners_app::server::router;
use runners_app::{IterationOutcome, PollState, Poller};
use runners_cloud::http::build_client;
use runners_cloud::{
    ComputeInstancesClient, Endpoints, IamTokenProvider, InstanceCensus, NameFilter,
    ResourceDirectoryClient,
};
use runners_config::ScheduleSettings;
use runners_telemetry::{Metrics, RUNNER_UP};
use runners_test_support::fixtures::{folders_body, instances_body, token_body};
use runners_test_support::keys::private_key_with_banner;
use runners_test_support::metrics::gauge_samples;
use tower::ServiceExt;

type CloudPoller = Poller<IamTokenProvider, ResourceDirectoryClient, ComputeInstancesClient>;

fn cloud_poller(
    server: &MockServer,
    key_path: &std::path::Path,
    metrics: Metrics,
) -> anyhow::Result<CloudPoller> {
    let endpoints = Endpoints::with_base_url(&server.base_url());
    let client = build_client()?;
    Ok(Poller::new(
        IamTokenProvider::new(
            client.clone(),
            endpoints.token,
            "ajetestaccount",
            "ajetestkey",
            key_path,
        ),
        ResourceDirectoryClient::new(client.clone(), endpoints.folders, "b1gtestcloud"),
        InstanceCensus::new(
            ComputeInstancesClient::new(client, endpoints.instances),
            NameFilter::new("runner", BTreeSet::from(["runner-broken".to_string()])),
        ),
        metrics,
        ScheduleSettings {
            scrape_interval: Duration::from_secs(30),
            token_ttl: Duration::from_secs(3600),
        },
    ))
}

#[tokio::test]
async fn scrape_cycle_is_visible_on_metrics_endpoint() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let token = server.mock(|when, then| {
        when.method(POST).path("/iam/v1/tokens").query_param_exists("jwt");
        then.status(200).json_body(token_body("t1-e2e\n"));
    });
    let folders = server.mock(|when, then| {
        when.method(GET)
            .path("/resource-manager/v1/folders")
            .query_param("cloud_id", "b1gtestcloud")
            .header("authorization", "Bearer t1-e2e");
        then.status(200)
            .json_body(folders_body(&[("prod", "f1"), ("dev", "f2")]));
    });
    let prod = server.mock(|when, then| {
        when.method(GET)
            .path("/compute/v1/instances")
            .query_param("folder_id", "f1")
            .header("authorization", "Bearer t1-e2e");
        then.status(200)
            .json_body(instances_body(&["runner-1", "runner-broken", "db"]));
    });
    let dev = server.mock(|when, then| {
        when.method(GET)
            .path("/compute/v1/instances")
            .query_param("folder_id", "f2");
        then.status(200).json_body(instances_body(&[]));
    });

    let mut key = tempfile::NamedTempFile::new()?;
    key.write_all(private_key_with_banner().as_bytes())?;
    let metrics = Metrics::new()?;
    let mut poller = cloud_poller(&server, key.path(), metrics.clone())?;

    let first = poller.run_iteration().await;
    let second = poller.run_iteration().await;

    assert_eq!(
        first,
        IterationOutcome::Published {
            folders: 2,
            updated: 2
        }
    );
    assert_eq!(second, first);
    assert_eq!(poller.state(), PollState::Scraping);
    token.assert_calls(1);
    folders.assert_calls(1);
    prod.assert_calls(2);
    dev.assert_calls(2);

    let response = router(metrics)
        .oneshot(Request::builder().uri("/metrics").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = String::from_utf8(to_bytes(response.into_body(), usize::MAX).await?.to_vec())?;

    let samples = gauge_samples(&body, RUNNER_UP);
    assert_eq!(samples.len(), 2);
    assert_eq!(samples.get(&("prod".to_string(), "f1".to_string())), Some(&1));
    assert_eq!(samples.get(&("dev".to_string(), "f2".to_string())), Some(&0));
    Ok(())
}

#[tokio::test]
async fn rejected_folder_listing_leaves_metrics_empty() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/iam/v1/tokens");
        then.status(200).json_body(token_body("t1-e2e"));
    });
    let folders = server.mock(|when, then| {
        when.method(GET).path("/resource-manager/v1/folders");
        then.status(403).body("{\"message\":\"permission denied\"}");
    });
    let instances = server.mock(|when, then| {
        when.method(GET).path("/compute/v1/instances");
        then.status(200).json_body(instances_body(&["runner-1"]));
    });

    let mut key = tempfile::NamedTempFile::new()?;
    key.write_all(private_key_with_banner().as_bytes())?;
    let metrics = Metrics::new()?;
    let mut poller = cloud_poller(&server, key.path(), metrics.clone())?;

    assert_eq!(poller.run_iteration().await, IterationOutcome::FoldersFailed);
    assert_eq!(poller.state(), PollState::NeedsFolders);
    folders.assert_calls(1);
    instances.assert_calls(0);
    assert!(gauge_samples(&metrics.render()?, RUNNER_UP).is_empty());
    Ok(())
}
