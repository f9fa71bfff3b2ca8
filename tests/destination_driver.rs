mod common;

use std::sync::Arc;

use common::{credentials, test_context, Action, MockPage, NoGate, ScriptedGate};
use novel_migrate::config::Credentials;
use novel_migrate::destinations::{
    DestinationPlatform, DriverState, KakuyomuDriver, NarouDriver, PublishAbort,
};
use novel_migrate::events::{RecordingSink, TransferEvent};
use novel_migrate::{Episode, EpisodeSequence, MigrateError};

const KAKUYOMU_WORK: &str = "https://kakuyomu.jp/my/works/16818622177542595290";
const KAKUYOMU_FORM: &str = "https://kakuyomu.jp/my/works/16818622177542595290/episodes/new";
const NAROU_WORK: &str = "https://syosetu.com/draftepisode/input/ncode/2875635/";
const NAROU_CHALLENGE: &str = "https://syosetu.com/user2stepauth/input/authtoken/";

fn episodes(count: usize) -> EpisodeSequence {
    (1..=count)
        .map(|n| Episode::new(format!("第{}話", n), format!("　本文{}", n)))
        .collect::<Vec<_>>()
        .into()
}

fn kakuyomu_driver(page: &MockPage, sink: RecordingSink) -> KakuyomuDriver<MockPage> {
    KakuyomuDriver::new(page.clone(), credentials(), test_context(Arc::new(NoGate), sink))
        .expect("credentials are configured")
}

#[tokio::test]
async fn publish_stops_at_first_missing_field() {
    let page = MockPage::new().fields_vanish_on_visit(KAKUYOMU_FORM, 2, &["[name=title]"]);
    let sink = RecordingSink::new();
    let mut driver = kakuyomu_driver(&page, sink.clone());

    driver.login().await.expect("login");
    let report = driver
        .publish_sequence(KAKUYOMU_WORK, &episodes(5))
        .await
        .expect("publish returns a report");

    assert_eq!(report.total, 5);
    assert_eq!(report.completed, 1);
    assert_eq!(
        report.abort,
        Some(PublishAbort::FieldTimeout {
            position: 2,
            field: "[name=title]".to_string(),
        })
    );
    assert_eq!(driver.state(), DriverState::Aborted);

    // 第 3 话以后不再打开表单
    assert_eq!(page.visits(KAKUYOMU_FORM), 2);
    assert_eq!(page.clicks("#updateButton"), 1);
    assert_eq!(page.filled_values("[name=title]"), vec!["第1話"]);

    let events = sink.take();
    assert!(events.contains(&TransferEvent::EpisodePublished {
        position: 1,
        total: 5
    }));
    assert!(events
        .iter()
        .any(|e| matches!(e, TransferEvent::PublishAborted { completed: 1, total: 5, .. })));
}

#[tokio::test]
async fn aborted_driver_rejects_further_publishing() {
    let page = MockPage::new().fields_vanish_on_visit(KAKUYOMU_FORM, 1, &["[name=body]"]);
    let mut driver = kakuyomu_driver(&page, RecordingSink::new());

    driver.login().await.expect("login");
    let report = driver
        .publish_sequence(KAKUYOMU_WORK, &episodes(2))
        .await
        .expect("report");
    assert_eq!(report.completed, 0);

    let again = driver.publish_sequence(KAKUYOMU_WORK, &episodes(2)).await;
    assert!(matches!(
        again,
        Err(MigrateError::InvalidState {
            expected: "Authenticated",
            actual: "Aborted"
        })
    ));
}

#[tokio::test]
async fn publishes_in_order_and_returns_to_authenticated() {
    let page = MockPage::new();
    let sink = RecordingSink::new();
    let mut driver = kakuyomu_driver(&page, sink.clone());

    driver.login().await.expect("login");
    let report = driver
        .publish_sequence(&format!("{}/", KAKUYOMU_WORK), &episodes(3))
        .await
        .expect("report");

    assert!(report.is_complete());
    assert_eq!(report.completed, 3);
    assert_eq!(driver.state(), DriverState::Authenticated);
    assert_eq!(
        page.filled_values("[name=title]"),
        vec!["第1話", "第2話", "第3話"]
    );
    assert_eq!(
        page.filled_values("[name=body]"),
        vec!["　本文1", "　本文2", "　本文3"]
    );
    assert!(sink
        .take()
        .contains(&TransferEvent::PublishFinished { total: 3 }));
}

#[tokio::test]
async fn domain_mismatch_submits_nothing() {
    let page = MockPage::new();
    let mut driver = kakuyomu_driver(&page, RecordingSink::new());
    driver.login().await.expect("login");
    let before = page.actions().len();

    let result = driver.publish_sequence(NAROU_WORK, &episodes(3)).await;

    assert!(matches!(result, Err(MigrateError::DomainMismatch { .. })));
    assert_eq!(page.actions().len(), before);
    assert_eq!(driver.state(), DriverState::Authenticated);
}

#[tokio::test]
async fn publishing_before_login_is_rejected() {
    let page = MockPage::new();
    let mut driver = kakuyomu_driver(&page, RecordingSink::new());

    let result = driver.publish_sequence(KAKUYOMU_WORK, &episodes(1)).await;

    assert!(matches!(
        result,
        Err(MigrateError::InvalidState {
            expected: "Authenticated",
            actual: "Unauthenticated"
        })
    ));
    assert!(page.actions().is_empty());
}

#[test]
fn empty_password_is_rejected_at_construction() {
    let result = NarouDriver::new(
        MockPage::new(),
        Credentials::new("writer@example.com", ""),
        test_context(Arc::new(NoGate), RecordingSink::new()),
    );
    assert!(matches!(
        result,
        Err(MigrateError::MissingCredentials { .. })
    ));
}

#[tokio::test]
async fn login_fails_when_form_never_appears() {
    let page = MockPage::new().without("[name=email]");
    let mut driver = kakuyomu_driver(&page, RecordingSink::new());

    let result = driver.login().await;

    assert!(matches!(result, Err(MigrateError::LoginFailed { .. })));
    assert_eq!(driver.state(), DriverState::Unauthenticated);
    assert!(!page.actions().iter().any(|a| matches!(a, Action::Click(_))));
}

#[tokio::test]
async fn login_fails_when_landing_redirects_to_login() {
    let page = MockPage::new().redirect(
        "https://kakuyomu.jp/my",
        "https://kakuyomu.jp/auth/login/email?location=%2Fmy",
    );
    let mut driver = kakuyomu_driver(&page, RecordingSink::new());

    let result = driver.login().await;

    assert!(matches!(result, Err(MigrateError::LoginFailed { .. })));
    assert_eq!(driver.state(), DriverState::Unauthenticated);
}

#[tokio::test]
async fn falls_back_to_generic_submit_button() {
    let page = MockPage::new().without(r#"button[form="usernoveldatainputForm"]"#);
    let mut driver = NarouDriver::new(
        page.clone(),
        credentials(),
        test_context(Arc::new(NoGate), RecordingSink::new()),
    )
    .expect("driver");

    driver.login().await.expect("login");
    let report = driver
        .publish_sequence(NAROU_WORK, &episodes(2))
        .await
        .expect("report");

    assert!(report.is_complete());
    assert_eq!(page.clicks("button[type=submit]"), 2);
    assert_eq!(page.clicks("#mainsubmit"), 1);
    // 作品管理 URL 本身就是投稿表单
    assert_eq!(page.visits(NAROU_WORK.trim_end_matches('/')), 2);
}

#[tokio::test]
async fn second_factor_waits_for_confirmation() {
    let page = MockPage::new().on_click("#mainsubmit", NAROU_CHALLENGE);
    let gate = Arc::new(ScriptedGate::resolving(
        page.clone(),
        "https://syosetu.com/user/top/",
    ));
    let sink = RecordingSink::new();
    let mut driver =
        NarouDriver::new(page.clone(), credentials(), test_context(gate.clone(), sink.clone()))
            .expect("driver");

    driver.login().await.expect("login after confirmation");

    assert_eq!(gate.calls(), 1);
    assert_eq!(driver.state(), DriverState::Authenticated);
    assert!(sink.take().iter().any(|e| matches!(
        e,
        TransferEvent::SecondFactorRequired { url, .. } if url == NAROU_CHALLENGE
    )));
}

#[tokio::test]
async fn unresolved_second_factor_fails_login() {
    let page = MockPage::new().on_click("#mainsubmit", NAROU_CHALLENGE);
    let gate = Arc::new(ScriptedGate::stuck(page.clone()));
    let mut driver = NarouDriver::new(
        page.clone(),
        credentials(),
        test_context(gate.clone(), RecordingSink::new()),
    )
    .expect("driver");

    let result = driver.login().await;

    assert!(matches!(
        result,
        Err(MigrateError::SecondFactorUnresolved { .. })
    ));
    assert_eq!(gate.calls(), 3);
    assert_eq!(driver.state(), DriverState::Unauthenticated);
}
