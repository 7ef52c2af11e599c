//! Scheduler loop: heartbeat cadence, poll gating, brew dispatch, stop.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use totobin_agent::app::events::AppEvent;
use totobin_agent::app::model::{ActuatorLine, BrewStep, OrderId};
use totobin_agent::config::AgentConfig;
use totobin_agent::error::Error;
use totobin_agent::scheduler::Scheduler;

use crate::mock_hw::{ManualClock, MockLines, MockRemote, RecordingSink, ms, thai_tea};

fn scheduler() -> Scheduler {
    Scheduler::new(&AgentConfig::default())
}

fn gaps(times: &[Duration]) -> Vec<Duration> {
    times.windows(2).map(|w| w[1] - w[0]).collect()
}

#[test]
fn first_tick_heartbeats_and_polls() {
    let mut clock = ManualClock::new();
    let mut hw = MockLines::new(clock.time());
    let mut remote = MockRemote::new(clock.time());
    let mut sink = RecordingSink::new();
    let mut sched = scheduler();

    let report = sched.tick(&mut hw, &mut remote, &mut clock, &mut sink).unwrap();

    assert!(report.heartbeat_sent);
    assert!(report.polled);
    assert!(report.brew.is_none());
    assert_eq!(sched.last_poll(), Some(Duration::ZERO));
    assert_eq!(sched.last_heartbeat(), Some(Duration::ZERO));
}

#[test]
fn empty_polls_change_nothing() {
    let mut clock = ManualClock::new();
    let mut hw = MockLines::new(clock.time());
    let mut remote = MockRemote::new(clock.time()).with_orders([None, None, None]);
    let mut sink = RecordingSink::new();
    let mut sched = scheduler();

    for _ in 0..3 {
        sched.tick(&mut hw, &mut remote, &mut clock, &mut sink).unwrap();
        clock_advance(&mut clock, ms(5_000));
    }

    assert_eq!(remote.polls.len(), 3);
    assert!(remote.updates.is_empty());
    assert!(hw.calls.is_empty(), "idle polling never touches GPIO");
    assert!(!sched.session().is_brewing());
}

fn clock_advance(clock: &mut ManualClock, by: Duration) {
    use totobin_agent::app::ports::ClockPort;
    clock.sleep(by);
}

#[test]
fn poll_waits_for_interval() {
    let mut clock = ManualClock::new();
    let mut hw = MockLines::new(clock.time());
    let mut remote = MockRemote::new(clock.time());
    let mut sink = RecordingSink::new();
    let mut sched = scheduler();

    sched.tick(&mut hw, &mut remote, &mut clock, &mut sink).unwrap();
    clock_advance(&mut clock, ms(4_900));
    let report = sched.tick(&mut hw, &mut remote, &mut clock, &mut sink).unwrap();
    assert!(!report.polled);

    clock_advance(&mut clock, ms(100));
    let report = sched.tick(&mut hw, &mut remote, &mut clock, &mut sink).unwrap();
    assert!(report.polled);
    assert_eq!(remote.polls, [ms(0), ms(5_000)]);
}

#[test]
fn order_is_brewed_within_the_tick() {
    let mut clock = ManualClock::new();
    let mut hw = MockLines::new(clock.time());
    let mut remote = MockRemote::new(clock.time()).with_orders([Some(thai_tea())]);
    let mut sink = RecordingSink::new();
    let mut sched = scheduler();

    let report = sched.tick(&mut hw, &mut remote, &mut clock, &mut sink).unwrap();

    let brew = report.brew.expect("order should have been brewed");
    assert_eq!(brew.order_id, OrderId::new("O1"));
    assert_eq!(remote.updates.len(), 5);
    assert!(!sched.session().is_brewing());
    assert!(!hw.any_on());
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::OrderReceived { drink_name, .. } if drink_name == "Thai Tea")),
        1
    );

    // Poll timestamp is the tick start, so the next tick polls at once.
    assert_eq!(sched.last_poll(), Some(Duration::ZERO));
    let next = sched.tick(&mut hw, &mut remote, &mut clock, &mut sink).unwrap();
    assert!(next.polled);
}

#[test]
fn no_heartbeat_or_poll_during_a_brew() {
    let mut clock = ManualClock::new();
    let mut hw = MockLines::new(clock.time());
    let mut remote = MockRemote::new(clock.time()).with_orders([Some(thai_tea())]);
    let mut sink = RecordingSink::new();
    let mut sched = scheduler();

    sched.tick(&mut hw, &mut remote, &mut clock, &mut sink).unwrap();

    let first = remote.updates[0].0;
    let last = remote.updates[4].0;
    assert!(remote.polls.iter().all(|t| *t <= first || *t > last));
    assert!(remote.heartbeats.iter().all(|t| *t <= first || *t > last));
    assert_eq!(remote.polls.len(), 1);
    assert_eq!(remote.heartbeats.len(), 1);
}

#[test]
fn run_keeps_heartbeat_and_poll_cadence() {
    let stop = Arc::new(AtomicBool::new(false));
    let mut clock = ManualClock::new().stop_at(ms(65_000), Arc::clone(&stop));
    let mut hw = MockLines::new(clock.time());
    let mut remote = MockRemote::new(clock.time());
    let mut sink = RecordingSink::new();
    let mut sched = scheduler();

    sched.run(&mut hw, &mut remote, &mut clock, &mut sink, &stop).unwrap();

    assert_eq!(remote.heartbeats, [ms(0), ms(30_000), ms(60_000)]);
    assert_eq!(remote.polls.len(), 13);
    assert!(gaps(&remote.polls).iter().all(|g| *g >= ms(5_000)));

    assert_eq!(
        sink.events.first(),
        Some(&AppEvent::Started {
            hardware_id: "odroid-001".into()
        })
    );
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped));
}

#[test]
fn missed_heartbeat_is_not_retried_early() {
    let stop = Arc::new(AtomicBool::new(false));
    let mut clock = ManualClock::new().stop_at(ms(31_000), Arc::clone(&stop));
    let mut hw = MockLines::new(clock.time());
    let mut remote = MockRemote::new(clock.time());
    remote.heartbeat_ok = false;
    let mut sink = RecordingSink::new();
    let mut sched = scheduler();

    sched.run(&mut hw, &mut remote, &mut clock, &mut sink, &stop).unwrap();

    assert_eq!(remote.heartbeats, [ms(0), ms(30_000)]);
    assert_eq!(sink.count(|e| *e == AppEvent::HeartbeatMissed), 2);
}

#[test]
fn heartbeat_resumes_after_a_long_brew() {
    let stop = Arc::new(AtomicBool::new(false));
    let mut clock = ManualClock::new().stop_at(ms(40_000), Arc::clone(&stop));
    let mut hw = MockLines::new(clock.time());
    // Two orders in a row keep the loop parked for 35 s.
    let mut remote = MockRemote::new(clock.time()).with_orders([Some(thai_tea()), Some(thai_tea())]);
    let mut sink = RecordingSink::new();
    let mut sched = scheduler();

    sched.run(&mut hw, &mut remote, &mut clock, &mut sink, &stop).unwrap();

    assert_eq!(remote.updates.len(), 10);
    assert_eq!(remote.heartbeats.len(), 2);
    assert!(remote.heartbeats[1] >= ms(35_000), "second heartbeat waits for the brews");
}

#[test]
fn stop_before_start_runs_no_ticks() {
    let stop = AtomicBool::new(true);
    let mut clock = ManualClock::new();
    let mut hw = MockLines::new(clock.time());
    let mut remote = MockRemote::new(clock.time());
    let mut sink = RecordingSink::new();
    let mut sched = scheduler();

    sched.run(&mut hw, &mut remote, &mut clock, &mut sink, &stop).unwrap();

    assert!(remote.polls.is_empty());
    assert!(remote.heartbeats.is_empty());
    assert_eq!(sink.events.len(), 2);
}

#[test]
fn stop_during_brew_is_honoured_after_it() {
    let stop = Arc::new(AtomicBool::new(false));
    // Raised a second into the brew.
    let mut clock = ManualClock::new().stop_at(ms(1_000), Arc::clone(&stop));
    let mut hw = MockLines::new(clock.time());
    let mut remote = MockRemote::new(clock.time()).with_orders([Some(thai_tea())]);
    let mut sink = RecordingSink::new();
    let mut sched = scheduler();

    sched.run(&mut hw, &mut remote, &mut clock, &mut sink, &stop).unwrap();

    assert_eq!(remote.steps().last(), Some(&BrewStep::Completed));
    assert_eq!(remote.polls.len(), 1);
    assert!(!hw.any_on());
}

#[test]
fn step_fault_does_not_stop_the_loop() {
    let mut clock = ManualClock::new();
    let mut hw = MockLines::new(clock.time());
    hw.fail_write = Some((ActuatorLine::Valve, true));
    let mut remote = MockRemote::new(clock.time()).with_orders([Some(thai_tea()), Some(thai_tea())]);
    let mut sink = RecordingSink::new();
    let mut sched = scheduler();

    let first = sched.tick(&mut hw, &mut remote, &mut clock, &mut sink).unwrap();
    let second = sched.tick(&mut hw, &mut remote, &mut clock, &mut sink).unwrap();

    assert!(first.brew.unwrap().outcome.is_error());
    assert!(second.brew.unwrap().outcome.is_error());
    assert_eq!(remote.updates.iter().filter(|(_, u)| u.error).count(), 2);
}

#[test]
fn unsafe_teardown_stops_the_loop() {
    let stop = Arc::new(AtomicBool::new(false));
    let mut clock = ManualClock::new().stop_at(ms(120_000), Arc::clone(&stop));
    let mut hw = MockLines::new(clock.time());
    hw.fail_all_off = true;
    let mut remote = MockRemote::new(clock.time()).with_orders([Some(thai_tea()), Some(thai_tea())]);
    let mut sink = RecordingSink::new();
    let mut sched = scheduler();

    let err = sched
        .run(&mut hw, &mut remote, &mut clock, &mut sink, &stop)
        .unwrap_err();

    assert_eq!(err, Error::UnsafeTeardown(OrderId::new("O1")));
    assert_eq!(remote.orders.len(), 1, "second order never fetched");
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped));
}
