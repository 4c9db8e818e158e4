// ABOUTME: Tests for the convergence wait against a scripted platform.
// ABOUTME: Uses tokio's paused clock so multi-minute waits finish instantly.

mod support;

use proptest::prelude::*;
use releasectl::platform::DeploymentStatus;
use releasectl::release::{ConvergencePolicy, ConvergenceState, StopSignal, await_convergence};
use std::time::Duration;
use support::fakes::{
    Calls, ScriptedPlatform, Step, cluster, convergence_policy, failed, pending, primary, service,
};

#[tokio::test(start_paused = true)]
async fn converges_once_counts_match_and_deployment_is_primary() {
    support::init_tracing();
    let calls = Calls::default();
    let platform = ScriptedPlatform::new(
        &calls,
        vec![pending(0, 1), pending(1, 1), primary(1, 1)],
    );

    let report = await_convergence(
        &platform,
        &cluster(),
        &service(),
        &convergence_policy(),
        &StopSignal::new(),
    )
    .await;

    assert_eq!(report.state, ConvergenceState::Converged);
    assert_eq!(report.ticks, 3);
    assert_eq!(report.elapsed, Duration::from_secs(60));
    assert_eq!(calls.count("describe"), 3);
}

#[tokio::test(start_paused = true)]
async fn converges_on_fourth_tick_at_ninety_seconds() {
    let calls = Calls::default();
    let platform = ScriptedPlatform::new(
        &calls,
        vec![pending(0, 1), pending(0, 1), pending(0, 1), primary(1, 1)],
    );

    let report = await_convergence(
        &platform,
        &cluster(),
        &service(),
        &convergence_policy(),
        &StopSignal::new(),
    )
    .await;

    assert_eq!(report.state, ConvergenceState::Converged);
    assert_eq!(report.ticks, 4);
    assert_eq!(report.elapsed, Duration::from_secs(90));
    assert_eq!(calls.count("describe"), 4);
}

#[tokio::test(start_paused = true)]
async fn failed_status_overrides_matching_counts() {
    let calls = Calls::default();
    let platform = ScriptedPlatform::new(&calls, vec![pending(0, 1), failed(1, 1)]);

    let report = await_convergence(
        &platform,
        &cluster(),
        &service(),
        &convergence_policy(),
        &StopSignal::new(),
    )
    .await;

    assert_eq!(report.state, ConvergenceState::Failed);
    assert_eq!(report.ticks, 2);
    let last = report.last_snapshot.unwrap();
    assert_eq!(last.deployment_status, DeploymentStatus::Failed);
    assert_eq!(calls.count("describe"), 2);
}

#[tokio::test(start_paused = true)]
async fn times_out_after_four_ticks_with_two_minute_budget() {
    let calls = Calls::default();
    let platform = ScriptedPlatform::new(&calls, vec![pending(0, 1)]);

    let report = await_convergence(
        &platform,
        &cluster(),
        &service(),
        &convergence_policy(),
        &StopSignal::new(),
    )
    .await;

    // Ticks at 0s, 30s, 60s, 90s; the 120s check sees the deadline.
    assert_eq!(report.state, ConvergenceState::TimedOut);
    assert_eq!(report.ticks, 4);
    assert_eq!(calls.count("describe"), 4);
    assert_eq!(report.elapsed, Duration::from_secs(120));
}

#[tokio::test(start_paused = true)]
async fn unobservable_service_times_out_instead_of_failing() {
    let calls = Calls::default();
    let platform = ScriptedPlatform::new(&calls, vec![Step::Unavailable]);

    let report = await_convergence(
        &platform,
        &cluster(),
        &service(),
        &convergence_policy(),
        &StopSignal::new(),
    )
    .await;

    assert_eq!(report.state, ConvergenceState::TimedOut);
    assert_eq!(report.unobserved_ticks, report.ticks);
    assert!(report.last_snapshot.is_none());
}

#[tokio::test(start_paused = true)]
async fn transient_describe_error_does_not_end_the_wait() {
    let calls = Calls::default();
    let platform = ScriptedPlatform::new(
        &calls,
        vec![pending(0, 2), Step::Unavailable, primary(2, 2)],
    );

    let report = await_convergence(
        &platform,
        &cluster(),
        &service(),
        &convergence_policy(),
        &StopSignal::new(),
    )
    .await;

    assert_eq!(report.state, ConvergenceState::Converged);
    assert_eq!(report.ticks, 3);
    assert_eq!(report.unobserved_ticks, 1);
}

#[tokio::test(start_paused = true)]
async fn stop_request_ends_the_wait_before_the_next_sleep() {
    let calls = Calls::default();
    let stop = StopSignal::new();
    let platform =
        ScriptedPlatform::new(&calls, vec![pending(0, 1)]).stopping_on(2, stop.clone());

    let report = await_convergence(
        &platform,
        &cluster(),
        &service(),
        &convergence_policy(),
        &stop,
    )
    .await;

    assert_eq!(report.state, ConvergenceState::Stopped);
    assert_eq!(report.ticks, 2);
    assert_eq!(report.elapsed, Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn stop_during_sleep_wakes_the_wait_early() {
    let calls = Calls::default();
    let stop = StopSignal::new();
    let platform = ScriptedPlatform::new(&calls, vec![pending(0, 1)]);

    let trigger = stop.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(45)).await;
        trigger.request();
    });

    let report = await_convergence(
        &platform,
        &cluster(),
        &service(),
        &convergence_policy(),
        &stop,
    )
    .await;

    assert_eq!(report.state, ConvergenceState::Stopped);
    assert_eq!(report.ticks, 2);
    assert_eq!(report.elapsed, Duration::from_secs(45));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ticks_match_budget_over_interval_rounded_up(
        interval_secs in 1u64..=60,
        factor in 1u64..=20,
        extra in 0u64..60,
    ) {
        let poll_interval = Duration::from_secs(interval_secs);
        let max_wait = Duration::from_secs(interval_secs * factor + extra);
        let policy = ConvergencePolicy::new(max_wait, poll_interval).unwrap();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();

        let report = runtime.block_on(async {
            let calls = Calls::default();
            let platform = ScriptedPlatform::new(&calls, vec![pending(0, 1)]);
            await_convergence(&platform, &cluster(), &service(), &policy, &StopSignal::new()).await
        });

        // One tick at every multiple of the interval strictly before the deadline.
        let bound = max_wait.as_secs().div_ceil(poll_interval.as_secs());
        prop_assert_eq!(report.state, ConvergenceState::TimedOut);
        prop_assert_eq!(u64::from(report.ticks), bound);
        if extra == 0 {
            prop_assert_eq!(u64::from(report.ticks), factor);
        }
    }
}
