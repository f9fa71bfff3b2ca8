mod common;

use std::sync::Arc;

use common::{credentials, test_context, CountingOpener, MockPage, NoGate};
use novel_migrate::config::{Config, CredentialStore, SourceSettings};
use novel_migrate::events::{RecordingSink, TransferEvent};
use novel_migrate::{MigrateError, Pipeline, Platform, Timings, TransferRequest};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KAKUYOMU_WORK: &str = "https://kakuyomu.jp/my/works/16818622177542595290";

fn config(server: &MockServer) -> Config {
    Config {
        sources: SourceSettings {
            narou_api_url: format!("{}/novelapi/api/", server.uri()),
            narou_novel_url: format!("{}/novel", server.uri()),
            narou_mypage_url: format!("{}/mypage", server.uri()),
            kakuyomu_base_url: server.uri(),
            ..SourceSettings::default()
        },
        timings: Timings::instant(),
        ..Config::default()
    }
}

fn store() -> CredentialStore {
    CredentialStore::default()
        .with(Platform::Kakuyomu, credentials())
        .with(Platform::Narou, credentials())
}

fn opener(page: &MockPage) -> CountingOpener {
    CountingOpener::new(page.clone(), test_context(Arc::new(NoGate), RecordingSink::new()))
}

/// 任何请求都不应该到达
async fn forbid_requests(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

async fn mount_narou(server: &MockServer, total: usize, failing: Option<usize>) {
    Mock::given(method("GET"))
        .and(path("/novelapi/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"allcount": 1},
            {
                "ncode": "N1234AB",
                "title": "迁移测试",
                "writer": "作者",
                "userid": 1,
                "general_all_no": total,
                "noveltype": 1
            }
        ])))
        .mount(server)
        .await;
    for n in 1..=total {
        let response = if failing == Some(n) {
            ResponseTemplate::new(500)
        } else {
            ResponseTemplate::new(200).set_body_raw(
                format!(
                    r#"<h1 class="p-novel__title">第{n}話</h1><div class="p-novel__text">本文{n}</div>"#
                ),
                "text/html; charset=utf-8",
            )
        };
        Mock::given(method("GET"))
            .and(path(format!("/novel/n1234ab/{}/", n)))
            .respond_with(response)
            .mount(server)
            .await;
    }
}

fn request(source: Platform, destination: Platform, url: &str) -> TransferRequest {
    TransferRequest {
        source,
        destination,
        identifier: "n1234ab".to_string(),
        destination_url: url.to_string(),
    }
}

#[tokio::test]
async fn same_platform_is_rejected_before_any_io() {
    let server = MockServer::start().await;
    forbid_requests(&server).await;
    let page = MockPage::new();
    let opener = opener(&page);
    let pipeline = Pipeline::new(config(&server), store(), Arc::new(RecordingSink::new()));

    let result = pipeline
        .run(
            &request(Platform::Narou, Platform::Narou, "https://syosetu.com/x/"),
            &opener,
        )
        .await;

    assert!(matches!(result, Err(MigrateError::SamePlatform(Platform::Narou))));
    assert_eq!(opener.opens(), 0);
    assert!(page.actions().is_empty());
}

#[tokio::test]
async fn unsupported_platform_is_rejected_before_any_io() {
    let server = MockServer::start().await;
    forbid_requests(&server).await;
    let page = MockPage::new();
    let opener = opener(&page);
    let pipeline = Pipeline::new(config(&server), store(), Arc::new(RecordingSink::new()));

    let result = pipeline
        .run(
            &request(
                Platform::Narou,
                Platform::AlphaPolis,
                "https://www.alphapolis.co.jp/",
            ),
            &opener,
        )
        .await;

    assert!(matches!(
        result,
        Err(MigrateError::Unsupported(Platform::AlphaPolis))
    ));
    assert_eq!(opener.opens(), 0);
}

#[tokio::test]
async fn missing_credentials_are_rejected_before_any_io() {
    let server = MockServer::start().await;
    forbid_requests(&server).await;
    let page = MockPage::new();
    let opener = opener(&page);
    let pipeline = Pipeline::new(
        config(&server),
        CredentialStore::default(),
        Arc::new(RecordingSink::new()),
    );

    let result = pipeline
        .run(
            &request(Platform::Narou, Platform::Kakuyomu, KAKUYOMU_WORK),
            &opener,
        )
        .await;

    assert!(matches!(
        result,
        Err(MigrateError::MissingCredentials {
            platform: Platform::Kakuyomu
        })
    ));
    assert_eq!(opener.opens(), 0);
}

#[tokio::test]
async fn destination_url_must_belong_to_destination() {
    let server = MockServer::start().await;
    forbid_requests(&server).await;
    let page = MockPage::new();
    let opener = opener(&page);
    let pipeline = Pipeline::new(config(&server), store(), Arc::new(RecordingSink::new()));

    let result = pipeline
        .run(
            &request(
                Platform::Narou,
                Platform::Kakuyomu,
                "https://syosetu.com/draftepisode/input/ncode/1/",
            ),
            &opener,
        )
        .await;

    assert!(matches!(result, Err(MigrateError::DomainMismatch { .. })));
    assert_eq!(opener.opens(), 0);
}

#[tokio::test]
async fn migrates_narou_work_to_kakuyomu() {
    let server = MockServer::start().await;
    mount_narou(&server, 3, None).await;
    let page = MockPage::new();
    let opener = opener(&page);
    let sink = RecordingSink::new();
    let pipeline = Pipeline::new(config(&server), store(), Arc::new(sink.clone()));

    let report = pipeline
        .run(
            &request(Platform::Narou, Platform::Kakuyomu, KAKUYOMU_WORK),
            &opener,
        )
        .await
        .expect("migration succeeds");

    assert!(report.is_success());
    assert_eq!(report.work.title, "迁移测试");
    assert_eq!(report.publish.completed, 3);
    assert_eq!(opener.opens(), 1);
    assert_eq!(
        page.filled_values("[name=title]"),
        vec!["第1話", "第2話", "第3話"]
    );
    assert_eq!(
        page.filled_values("[name=body]"),
        vec!["本文1", "本文2", "本文3"]
    );
    assert!(sink.take().iter().any(|e| matches!(
        e,
        TransferEvent::WorkResolved {
            platform: Platform::Narou,
            total: Some(3),
            ..
        }
    )));
}

#[tokio::test]
async fn partial_extraction_still_publishes_what_was_fetched() {
    let server = MockServer::start().await;
    mount_narou(&server, 3, Some(3)).await;
    let page = MockPage::new();
    let opener = opener(&page);
    let pipeline = Pipeline::new(config(&server), store(), Arc::new(RecordingSink::new()));

    let report = pipeline
        .run(
            &request(Platform::Narou, Platform::Kakuyomu, KAKUYOMU_WORK),
            &opener,
        )
        .await
        .expect("partial migration still reports");

    assert!(report.extraction.is_partial());
    assert!(!report.is_success());
    assert_eq!(report.publish.total, 2);
    assert!(report.publish.is_complete());
    assert_eq!(page.filled_values("[name=title]"), vec!["第1話", "第2話"]);
}

#[tokio::test]
async fn nothing_fetched_means_nothing_published() {
    let server = MockServer::start().await;
    mount_narou(&server, 2, Some(1)).await;
    let page = MockPage::new();
    let opener = opener(&page);
    let pipeline = Pipeline::new(config(&server), store(), Arc::new(RecordingSink::new()));

    let result = pipeline
        .run(
            &request(Platform::Narou, Platform::Kakuyomu, KAKUYOMU_WORK),
            &opener,
        )
        .await;

    assert!(matches!(result, Err(MigrateError::NothingToMigrate(_))));
    assert_eq!(opener.opens(), 0);
}

#[tokio::test]
async fn unknown_work_does_not_open_browser() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/novelapi/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"allcount": 0}])))
        .mount(&server)
        .await;
    let page = MockPage::new();
    let opener = opener(&page);
    let pipeline = Pipeline::new(config(&server), store(), Arc::new(RecordingSink::new()));

    let result = pipeline
        .run(
            &request(Platform::Narou, Platform::Kakuyomu, KAKUYOMU_WORK),
            &opener,
        )
        .await;

    assert!(matches!(result, Err(MigrateError::WorkNotFound(_))));
    assert_eq!(opener.opens(), 0);
}

#[tokio::test]
async fn login_failure_reports_unpublished_episodes() {
    let server = MockServer::start().await;
    mount_narou(&server, 3, None).await;
    let page = MockPage::new().without("[name=email]");
    let opener = opener(&page);
    let sink = RecordingSink::new();
    let pipeline = Pipeline::new(config(&server), store(), Arc::new(sink.clone()));

    let result = pipeline
        .run(
            &request(Platform::Narou, Platform::Kakuyomu, KAKUYOMU_WORK),
            &opener,
        )
        .await;

    assert!(matches!(result, Err(MigrateError::LoginFailed { .. })));
    assert_eq!(opener.opens(), 1);
    assert!(page.filled_values("[name=title]").is_empty());
    assert!(sink.take().iter().any(|e| matches!(
        e,
        TransferEvent::PublishAborted {
            completed: 0,
            total: 3,
            ..
        }
    )));
}
