//! Orchestration tests driven by a paused Tokio clock.


use std::sync::Arc;
use std::time::Duration;

use rstest::{fixture, rstest};
use tokio::time::Instant;

use super::{CheckWatcher, Disposition, WatchTiming};
use crate::error::WatchError;
use crate::github::locator::{CommitSha, RepositoryLocator};
use crate::github::models::CheckConclusion;
use crate::github::models::test_support::{
    FIXTURE_SHA, completed_run, in_progress_run, queued_run,
};
use crate::github::repository::CheckRunRepository;
use crate::notify::test_support::RecordingNotifier;
use crate::notify::{MockNotifier, Notifier};

use scripted_gateway::ScriptedGateway;

const COMMIT_URL: &str =
    "https://github.com/owner/repo/commit/0123456789abcdef0123456789abcdef01234567";

#[fixture]
fn sha() -> CommitSha {
    CommitSha::new(FIXTURE_SHA).expect("sha should be valid")
}

fn watcher<Notify>(
    gateway: &Arc<ScriptedGateway>,
    notifier: Arc<Notify>,
    timing: WatchTiming,
) -> CheckWatcher<ScriptedGateway, Notify>
where
    Notify: Notifier + 'static,
{
    let locator = RepositoryLocator::from_slug("owner/repo", "https://github.com")
        .expect("locator should parse");
    let repository = CheckRunRepository::new(Arc::clone(gateway), locator);
    CheckWatcher::new(repository, notifier, timing)
}

fn assert_elapsed(started: Instant, expected: Duration) {
    let elapsed = started.elapsed();
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_secs(1),
        "expected about {expected:?}, took {elapsed:?}"
    );
}

fn silent_notifier() -> Arc<MockNotifier> {
    let mut notifier = MockNotifier::new();
    notifier.expect_notify().never();
    Arc::new(notifier)
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn zero_check_runs_complete_without_polling(sha: CommitSha) {
    let gateway = Arc::new(ScriptedGateway::listing(Vec::new()));
    let watcher = watcher(&gateway, silent_notifier(), WatchTiming::default());

    let report = watcher
        .wait_for_actions(&sha, "")
        .await
        .expect("an empty commit should not fail");

    assert_eq!(report.discovered, 0);
    assert_eq!(report.watched(), 0);
    assert!(gateway.polled_ids().is_empty());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn only_required_checks_are_polled(sha: CommitSha) {
    let gateway = Arc::new(
        ScriptedGateway::listing(vec![
            queued_run(1, "build"),
            queued_run(2, "lint"),
            queued_run(3, "test"),
            queued_run(4, "deploy"),
        ])
        .script(1, vec![Ok(completed_run(1, "build", CheckConclusion::Success))])
        .script(3, vec![Ok(completed_run(3, "test", CheckConclusion::Success))]),
    );
    let watcher = watcher(&gateway, silent_notifier(), WatchTiming::default());

    let report = watcher
        .wait_for_actions(&sha, " build , test ")
        .await
        .expect("watch should succeed");

    assert_eq!(report.discovered, 4);
    assert_eq!(report.watched(), 2);
    assert_eq!(gateway.polled_ids(), vec![1, 3]);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn blank_required_list_polls_every_check(sha: CommitSha) {
    let gateway = Arc::new(
        ScriptedGateway::listing(vec![queued_run(1, "build"), queued_run(2, "lint")])
            .script(1, vec![Ok(completed_run(1, "build", CheckConclusion::Skipped))])
            .script(2, vec![Ok(completed_run(2, "lint", CheckConclusion::Neutral))]),
    );
    let watcher = watcher(&gateway, silent_notifier(), WatchTiming::default());

    let report = watcher
        .wait_for_actions(&sha, " , ")
        .await
        .expect("watch should succeed");

    assert_eq!(gateway.polled_ids(), vec![1, 2]);
    assert_eq!(report.ignored(), 2);
}

#[rstest]
#[case::failure(CheckConclusion::Failure)]
#[case::timed_out(CheckConclusion::TimedOut)]
#[tokio::test(start_paused = true)]
async fn unsuccessful_conclusion_notifies_once(
    sha: CommitSha,
    #[case] conclusion: CheckConclusion,
) {
    let gateway = Arc::new(
        ScriptedGateway::listing(vec![queued_run(9, "integration")])
            .script(9, vec![Ok(completed_run(9, "integration", conclusion))]),
    );
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .withf(move |event| {
            event.name == "integration"
                && event.conclusion == conclusion.as_str()
                && event.check_url == "https://github.com/owner/repo/runs/9"
                && event.commit_url == COMMIT_URL
        })
        .times(1)
        .return_const(());
    let watcher = watcher(&gateway, Arc::new(notifier), WatchTiming::default());

    let report = watcher
        .wait_for_actions(&sha, "integration")
        .await
        .expect("an unsuccessful check is not a watch failure");

    assert_eq!(report.notified(), 1);
    assert_eq!(
        report.outcomes.first().map(|outcome| outcome.disposition),
        Some(Disposition::Notified)
    );
}

#[rstest]
#[case::branch_name("main")]
#[case::abbreviated_sha("0123456")]
#[tokio::test(start_paused = true)]
async fn commit_link_uses_the_checks_head_sha(#[case] requested: &str) {
    let gateway = Arc::new(
        ScriptedGateway::listing(vec![queued_run(4, "build")])
            .script(4, vec![Ok(completed_run(4, "build", CheckConclusion::Failure))]),
    );
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .withf(|event| event.commit_url == COMMIT_URL)
        .times(1)
        .return_const(());
    let watcher = watcher(&gateway, Arc::new(notifier), WatchTiming::default());
    let sha = CommitSha::new(requested).expect("ref should be valid");

    watcher
        .wait_for_actions(&sha, "")
        .await
        .expect("watch should succeed");
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn commit_link_falls_back_to_requested_ref_without_head_sha() {
    let mut completed = completed_run(4, "build", CheckConclusion::TimedOut);
    completed.head_sha = String::new();
    let gateway = Arc::new(
        ScriptedGateway::listing(vec![queued_run(4, "build")]).script(4, vec![Ok(completed)]),
    );
    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .withf(|event| event.commit_url == "https://github.com/owner/repo/commit/main")
        .times(1)
        .return_const(());
    let watcher = watcher(&gateway, Arc::new(notifier), WatchTiming::default());
    let sha = CommitSha::new("main").expect("ref should be valid");

    watcher
        .wait_for_actions(&sha, "")
        .await
        .expect("watch should succeed");
}

#[rstest]
#[case::success(Some(CheckConclusion::Success))]
#[case::cancelled(Some(CheckConclusion::Cancelled))]
#[case::action_required(Some(CheckConclusion::ActionRequired))]
#[case::missing(None)]
#[tokio::test(start_paused = true)]
async fn other_conclusions_are_ignored(sha: CommitSha, #[case] conclusion: Option<CheckConclusion>) {
    let mut completed = completed_run(5, "build", CheckConclusion::Success);
    completed.conclusion = conclusion;
    let gateway = Arc::new(
        ScriptedGateway::listing(vec![queued_run(5, "build")]).script(5, vec![Ok(completed)]),
    );
    let watcher = watcher(&gateway, silent_notifier(), WatchTiming::default());

    let report = watcher
        .wait_for_actions(&sha, "")
        .await
        .expect("watch should succeed");

    assert_eq!(report.ignored(), 1);
    assert_eq!(
        report.outcomes.first().and_then(|outcome| outcome.conclusion),
        conclusion
    );
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn discovery_failure_stops_before_polling(sha: CommitSha) {
    let gateway = Arc::new(ScriptedGateway::failing_discovery(WatchError::Authentication {
        message: "Bad credentials".to_owned(),
    }));
    let watcher = watcher(&gateway, silent_notifier(), WatchTiming::default());

    let error = watcher
        .wait_for_actions(&sha, "")
        .await
        .expect_err("discovery failure should fail the watch");

    assert_eq!(
        error,
        WatchError::Authentication {
            message: "Bad credentials".to_owned(),
        }
    );
    assert!(gateway.polled_ids().is_empty());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn one_failing_query_fails_the_watch_but_others_still_finish(sha: CommitSha) {
    let names: Vec<String> = (1..=10).map(|id| format!("check-{id}")).collect();
    let mut gateway = ScriptedGateway::listing(
        (1..=10_u64)
            .zip(&names)
            .map(|(id, name)| queued_run(id, name))
            .collect(),
    );
    for (id, name) in (1..=10_u64).zip(&names) {
        let step = match id {
            4 => Err(WatchError::Network {
                message: "connection reset".to_owned(),
            }),
            2 | 7 => Ok(completed_run(id, name, CheckConclusion::Failure)),
            _ => Ok(completed_run(id, name, CheckConclusion::Success)),
        };
        gateway = gateway.script(id, vec![Ok(in_progress_run(id, name)), step]);
    }
    let gateway = Arc::new(gateway);
    let notifier = Arc::new(RecordingNotifier::default());
    let watcher = watcher(&gateway, Arc::clone(&notifier), WatchTiming::default());

    let error = watcher
        .wait_for_actions(&sha, "")
        .await
        .expect_err("the failing query should surface");

    assert!(matches!(error, WatchError::Network { .. }), "got {error:?}");
    assert_eq!(notifier.notified_names(), vec!["check-2", "check-7"]);
    assert_eq!(gateway.polled_ids().len(), 10);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn pending_check_is_polled_until_it_completes(sha: CommitSha) {
    let gateway = Arc::new(
        ScriptedGateway::listing(vec![queued_run(3, "build")]).script(
            3,
            vec![
                Ok(queued_run(3, "build")),
                Ok(in_progress_run(3, "build")),
                Ok(in_progress_run(3, "build")),
                Ok(completed_run(3, "build", CheckConclusion::Success)),
            ],
        ),
    );
    let watcher = watcher(&gateway, silent_notifier(), WatchTiming::default());
    let started = Instant::now();

    watcher
        .wait_for_actions(&sha, "")
        .await
        .expect("watch should succeed");

    assert_eq!(gateway.status_calls(3), 4);
    assert_elapsed(started, Duration::from_secs(15 + 3 * 5));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn settle_delay_runs_before_discovery(sha: CommitSha) {
    let gateway = Arc::new(ScriptedGateway::listing(Vec::new()));
    let timing = WatchTiming {
        settle_delay: Duration::from_secs(40),
        ..WatchTiming::default()
    };
    let watcher = watcher(&gateway, silent_notifier(), timing);
    let started = Instant::now();

    watcher
        .wait_for_actions(&sha, "")
        .await
        .expect("watch should succeed");

    assert_elapsed(started, Duration::from_secs(40));
    assert_eq!(gateway.list_calls(), 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn max_wait_turns_a_stuck_check_into_a_timeout(sha: CommitSha) {
    let gateway = Arc::new(
        ScriptedGateway::listing(vec![queued_run(8, "e2e")])
            .script(8, vec![Ok(in_progress_run(8, "e2e"))]),
    );
    let timing = WatchTiming::default().with_max_wait(Some(Duration::from_secs(60)));
    let watcher = watcher(&gateway, silent_notifier(), timing);

    let error = watcher
        .wait_for_actions(&sha, "")
        .await
        .expect_err("a check that never completes should time out");

    assert_eq!(
        error,
        WatchError::PollTimeout {
            check: "e2e".to_owned(),
            waited_seconds: 60,
        }
    );
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_outstanding_polls(sha: CommitSha) {
    let gateway = Arc::new(
        ScriptedGateway::listing(vec![queued_run(8, "e2e")])
            .script(8, vec![Ok(in_progress_run(8, "e2e"))]),
    );
    let watcher = watcher(&gateway, silent_notifier(), WatchTiming::default());
    let token = watcher.cancellation_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(60)).await;
        token.cancel();
    });

    let error = watcher
        .wait_for_actions(&sha, "")
        .await
        .expect_err("cancellation should stop the watch");

    assert_eq!(error, WatchError::Cancelled);
    assert!(gateway.status_calls(8) >= 2, "check should have been polled");
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn cancellation_during_settle_skips_discovery(sha: CommitSha) {
    let gateway = Arc::new(ScriptedGateway::listing(vec![queued_run(1, "build")]));
    let token = tokio_util::sync::CancellationToken::new();
    token.cancel();
    let watcher = watcher(&gateway, silent_notifier(), WatchTiming::default())
        .with_cancellation(token);

    let error = watcher
        .wait_for_actions(&sha, "")
        .await
        .expect_err("a cancelled watch should not start");

    assert_eq!(error, WatchError::Cancelled);
    assert_eq!(gateway.list_calls(), 0);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn panicking_poll_task_is_reported_as_task_failure(sha: CommitSha) {
    let gateway = Arc::new(ScriptedGateway::listing(vec![queued_run(1, "unscripted")]));
    let watcher = watcher(&gateway, silent_notifier(), WatchTiming::default());

    let error = watcher
        .wait_for_actions(&sha, "")
        .await
        .expect_err("a panicking task should fail the watch");

    assert!(matches!(error, WatchError::TaskFailed { .. }), "got {error:?}");
}
