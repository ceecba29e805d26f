//! Top-level controller tests.
//!
//! Drives a full `System` and checks the end-to-end guarantees: one response per
//! accepted command exactly one cycle later, in order, with no loss under
//! backpressure, plus the reset line.

use expctl_core::config::{Config, StepPolicy};
use expctl_core::core::{Controller, ControllerInputs, CycleControl, CycleMode};
use expctl_core::protocol::{Command, ResponseKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::TestContext;

fn config_with(step_policy: StepPolicy, tx_fifo_depth: usize) -> Config {
    let mut config = Config::default();
    config.controller.step_policy = step_policy;
    config.controller.tx_fifo_depth = tx_fifo_depth;
    config
}

#[test]
fn idle_queue_produces_no_strobes() {
    let mut ctx = TestContext::new();
    for report in ctx.run(50) {
        assert_eq!(report.dequeued, None);
        assert_eq!(report.enqueued, None);
        assert!(!report.outputs.exp_wen);
        assert!(!report.outputs.exp_reset);
        assert!(!report.outputs.exp_clk_en);
    }
    assert_eq!(ctx.system.controller.stats.idle_cycles, 50);
}

#[test]
fn response_follows_acceptance_by_one_cycle() {
    let mut ctx = TestContext::new();
    ctx.send(Command::Read { addr: 1 });
    let reports = ctx.run(3);
    assert!(reports[0].dequeued.is_some());
    assert_eq!(reports[0].enqueued, None);
    assert!(reports[1].enqueued.is_some());
    assert_eq!(reports[2].enqueued, None);
}

#[test]
fn write_then_read_echoes_value() {
    let mut ctx = TestContext::new();
    ctx.send(Command::Write {
        addr: 5,
        data: 0x2A,
    });
    ctx.send(Command::Read { addr: 5 });
    let _ = ctx.run(4);
    let write = ctx.receive().unwrap();
    let read = ctx.receive().unwrap();
    assert_eq!(write.kind, Some(ResponseKind::Write));
    assert_eq!(read.kind, Some(ResponseKind::Read));
    assert_eq!(read.addr, 5);
    assert_eq!(read.data, 0x2A);
    assert_eq!(ctx.register(5), Some(0x2A));
}

#[test]
fn step_response_and_clock_window() {
    let mut ctx = TestContext::new();
    ctx.send(Command::Step { cycles: 3 });
    let reports = ctx.run(8);
    let enables: Vec<bool> = reports.iter().map(|r| r.outputs.exp_clk_en).collect();
    assert_eq!(
        enables,
        vec![false, true, true, true, false, false, false, false]
    );
    let response = ctx.receive().unwrap();
    assert_eq!(response.kind, Some(ResponseKind::Step));
    assert_eq!(response.value, 0);
    assert_eq!(ctx.clocked_cycles(), 3);
}

#[test]
fn status_mid_step_reports_remaining() {
    let mut ctx = TestContext::new();
    ctx.send(Command::Step { cycles: 5 });
    ctx.send(Command::Status);
    let _ = ctx.run(3);
    let _ = ctx.receive().unwrap();
    let status = ctx.receive().unwrap();
    assert_eq!(status.kind, Some(ResponseKind::Status));
    assert!(status.stepping());
    assert!(!status.autonomous());
    assert_eq!(status.remaining_steps(), 4);
    assert_eq!(status.value, 0);
}

#[test]
fn cycle_count_snapshot_advances() {
    let mut ctx = TestContext::new();
    let _ = ctx.exchange(Command::Step { cycles: 10 });
    let _ = ctx.run(20);
    let status = ctx.exchange(Command::Status);
    assert_eq!(status.value, 10);
    assert!(!status.stepping());
}

#[test]
fn start_pause_cycle() {
    let mut ctx = TestContext::new();
    assert_eq!(ctx.exchange(Command::Pause).kind, Some(ResponseKind::PauseRejected));
    assert_eq!(ctx.exchange(Command::Start).kind, Some(ResponseKind::Start));
    assert!(ctx.system.controller.clock_enable());
    assert_eq!(ctx.exchange(Command::Start).kind, Some(ResponseKind::StartRejected));
    assert_eq!(
        ctx.exchange(Command::Step { cycles: 2 }).kind,
        Some(ResponseKind::StepRejected)
    );
    let status = ctx.exchange(Command::Status);
    assert!(status.autonomous());
    assert_eq!(ctx.exchange(Command::Pause).kind, Some(ResponseKind::Pause));
    assert!(!ctx.system.controller.clock_enable());
}

#[test]
fn pause_drops_enable_on_next_cycle() {
    let mut ctx = TestContext::new();
    let _ = ctx.exchange(Command::Start);
    ctx.send(Command::Pause);
    let reports = ctx.run(3);
    assert!(reports[0].dequeued.is_some());
    assert!(reports[0].outputs.exp_clk_en);
    assert!(!reports[1].outputs.exp_clk_en);
    assert!(!reports[2].outputs.exp_clk_en);
}

#[rstest]
#[case::ignore(StepPolicy::Ignore, ResponseKind::StepRejected, 4)]
#[case::restart(StepPolicy::Restart, ResponseKind::Step, 1 + 6)]
#[case::extend(StepPolicy::Extend, ResponseKind::Step, 1 + 3 + 6)]
fn step_while_stepping(
    #[case] policy: StepPolicy,
    #[case] second: ResponseKind,
    #[case] clocked: u64,
) {
    let mut ctx = TestContext::with_config(config_with(policy, 16));
    ctx.send(Command::Step { cycles: 4 });
    ctx.send(Command::Step { cycles: 6 });
    let _ = ctx.run(30);
    assert_eq!(ctx.receive().unwrap().kind, Some(ResponseKind::Step));
    assert_eq!(ctx.receive().unwrap().kind, Some(second));
    assert_eq!(ctx.clocked_cycles(), clocked);
}

#[test]
fn reset_command_leaves_cycle_control_alone() {
    let mut ctx = TestContext::new();
    ctx.send(Command::Step { cycles: 6 });
    ctx.send(Command::Reset);
    let reports = ctx.run(3);
    assert!(reports[1].outputs.exp_reset);
    assert!(reports[2].outputs.exp_clk_en);
    assert_eq!(ctx.system.controller.state().cycle.mode, CycleMode::Manual);
    assert!(ctx.system.controller.state().cycle.remaining > 0);
}

#[test]
fn unrecognized_opcode_is_answered() {
    let mut ctx = TestContext::new();
    let response = ctx.exchange(Command::Raw(0x7F00_0050_0012_3456));
    assert_eq!(response.kind, Some(ResponseKind::Unrecognized { opcode: 0x7F }));
    assert_eq!(response.opcode, 0xFF);
    assert_eq!(response.addr, 0);
    assert_eq!(response.data, 0x7F);
    assert_eq!(ctx.system.controller.stats.cmd_unrecognized, 1);
}

#[test]
fn backpressure_with_single_slot_fifo() {
    let mut ctx = TestContext::with_config(config_with(StepPolicy::Ignore, 1));
    for addr in 0..3 {
        ctx.send(Command::Read { addr });
    }
    let reports = ctx.run(4);
    assert!(reports[0].dequeued.is_some());
    assert!(reports.iter().skip(1).all(|r| r.dequeued.is_none()));
    assert_eq!(ctx.system.tx.len(), 1);
    assert_eq!(ctx.system.rx.len(), 2);

    let mut addrs = Vec::new();
    for _ in 0..20 {
        if let Some(response) = ctx.receive() {
            addrs.push(response.addr);
        }
        let _ = ctx.tick();
    }
    assert_eq!(addrs, vec![0, 1, 2]);
    assert_eq!(ctx.system.controller.stats.responses_dropped, 0);
    assert!(ctx.system.controller.stats.stalls_tx_full > 0);
}

#[test]
fn reset_line_discards_in_flight_response() {
    let mut ctx = TestContext::new();
    let _ = ctx.exchange(Command::Start);
    ctx.send(Command::Read { addr: 0 });
    let _ = ctx.tick();
    assert!(!ctx.system.controller.is_idle());

    ctx.system.assert_reset();
    let _ = ctx.run(5);
    assert_eq!(ctx.receive(), None);
    assert_eq!(ctx.system.controller.state().cycle, CycleControl::new());
    assert!(!ctx.system.controller.clock_enable());
    assert_eq!(ctx.system.controller.stats.reset_events, 1);
}

#[test]
fn reset_line_stops_counted_step() {
    let mut ctx = TestContext::new();
    let _ = ctx.exchange(Command::Step { cycles: 100 });
    assert!(ctx.system.controller.clock_enable());
    assert!(ctx.system.controller.state().cycle.remaining > 0);

    ctx.system.assert_reset();
    assert_eq!(ctx.system.controller.state().cycle, CycleControl::new());
    assert!(!ctx.system.controller.clock_enable());

    let clocked = ctx.clocked_cycles();
    let reports = ctx.run(20);
    assert!(reports.iter().all(|r| !r.outputs.exp_clk_en));
    assert_eq!(ctx.clocked_cycles(), clocked);
}

#[test]
fn status_reports_step_count_wider_than_sixteen_bits() {
    let mut ctx = TestContext::new();
    let step = ctx.exchange(Command::Step { cycles: 0x2_0005 });
    assert_eq!(step.kind, Some(ResponseKind::Step));

    // STEP accepted in cycle 0; STATUS is composed in cycle 3, after the
    // enabled edges of cycles 1 and 2.
    let status = ctx.exchange(Command::Status);
    assert_eq!(status.kind, Some(ResponseKind::Status));
    assert!(status.stepping());
    assert_eq!(status.remaining_steps(), 0x2_0003);
    assert_eq!(ctx.system.controller.state().cycle.remaining, 0x2_0002);
}

#[test]
fn evaluate_does_not_mutate() {
    let controller = Controller::new(&Config::default());
    let inputs = ControllerInputs {
        rx_head: Some(Command::Start.encode(controller.protocol())),
        ..ControllerInputs::default()
    };
    let before = *controller.state();
    let eval = controller.evaluate(&inputs);
    assert!(eval.outputs.rx_dequeue);
    assert_eq!(*controller.state(), before);
    assert_eq!(eval.next.cycle.mode, CycleMode::Autonomous);
}

/// Host behaviour for one cycle of the ordering property.
#[derive(Clone, Copy, Debug)]
enum HostAction {
    Send(Command),
    Drain,
    Wait,
}

fn host_action() -> impl Strategy<Value = HostAction> {
    prop_oneof![
        (0..8_u64).prop_map(|addr| HostAction::Send(Command::Read { addr })),
        ((0..8_u64), any::<u16>())
            .prop_map(|(addr, data)| HostAction::Send(Command::Write { addr, data: data.into() })),
        (0..4_u64).prop_map(|cycles| HostAction::Send(Command::Step { cycles })),
        Just(HostAction::Send(Command::Start)),
        Just(HostAction::Send(Command::Pause)),
        Just(HostAction::Send(Command::Status)),
        Just(HostAction::Send(Command::Raw(0xEE00_0000_0000_0000))),
        Just(HostAction::Drain),
        Just(HostAction::Wait),
    ]
}

proptest! {
    #[test]
    fn every_accepted_command_answered_next_cycle_in_order(
        actions in prop::collection::vec(host_action(), 1..80),
        tx_depth in 1_usize..4,
    ) {
        let mut ctx = TestContext::with_config(config_with(StepPolicy::Ignore, tx_depth));
        let mut accepted = Vec::new();
        let mut answered = Vec::new();

        let tail = std::iter::repeat_n(HostAction::Drain, 64);
        for action in actions.iter().copied().chain(tail) {
            match action {
                HostAction::Send(command) => {
                    let word = command.encode(&ctx.protocol());
                    let _ = ctx.system.send(word);
                }
                HostAction::Drain => while ctx.system.receive().is_some() {},
                HostAction::Wait => {}
            }
            let report = ctx.tick();
            if let Some(word) = report.dequeued {
                accepted.push((report.cycle, word));
            }
            if report.enqueued.is_some() {
                answered.push(report.cycle);
            }
        }

        prop_assert_eq!(accepted.len(), answered.len());
        for ((accept_cycle, _), answer_cycle) in accepted.iter().zip(&answered) {
            prop_assert_eq!(accept_cycle + 1, *answer_cycle);
        }
        prop_assert_eq!(ctx.system.controller.stats.responses_dropped, 0);
    }
}
