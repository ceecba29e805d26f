//! Simulator run-loop tests.

use expctl_core::common::SimError;
use expctl_core::config::Config;
use expctl_core::protocol::ResponseKind;
use expctl_core::sim::{Simulator, parse_script};
use pretty_assertions::assert_eq;

fn run(config: &Config, script: &str) -> Result<expctl_core::sim::RunReport, SimError> {
    let items = parse_script(script).unwrap();
    Simulator::new(config).run(&items)
}

#[test]
fn answers_every_command_in_order() {
    let report = run(
        &Config::default(),
        "write 3 0x77\nread 3\nstep 4\nstatus\nraw 0xEE00000000000000",
    )
    .unwrap();
    assert_eq!(report.sent, 5);
    let kinds: Vec<_> = report.responses.iter().map(|r| r.response.kind).collect();
    assert_eq!(
        kinds,
        vec![
            Some(ResponseKind::Write),
            Some(ResponseKind::Read),
            Some(ResponseKind::Step),
            Some(ResponseKind::Status),
            Some(ResponseKind::Unrecognized { opcode: 0xEE }),
        ]
    );
    assert_eq!(report.responses[1].response.data, 0x77);
    let cycles: Vec<u64> = report.responses.iter().map(|r| r.cycle).collect();
    assert!(cycles.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn idle_spaces_commands() {
    let report = run(&Config::default(), "status\nidle 10\nstatus").unwrap();
    assert_eq!(report.responses.len(), 2);
    let gap = report.responses[1].cycle - report.responses[0].cycle;
    assert_eq!(gap, 11);
}

#[test]
fn idle_lets_step_finish() {
    let config = Config::default();
    let items = parse_script("step 5\nidle 10").unwrap();
    let mut sim = Simulator::new(&config);
    let report = sim.run(&items).unwrap();
    assert_eq!(report.responses.len(), 1);
    assert_eq!(sim.stats().experiment_cycles, 5);
    assert!(!sim.system.controller.clock_enable());
}

#[test]
fn state_carries_over_between_runs() {
    let config = Config::default();
    let mut sim = Simulator::new(&config);
    let _ = sim.run(&parse_script("start").unwrap()).unwrap();
    let report = sim.run(&parse_script("start\npause").unwrap()).unwrap();
    let kinds: Vec<_> = report.responses.iter().map(|r| r.response.kind).collect();
    assert_eq!(
        kinds,
        vec![Some(ResponseKind::StartRejected), Some(ResponseKind::Pause)]
    );
}

#[test]
fn small_fifos_still_answer_everything() {
    let mut config = Config::default();
    config.controller.rx_fifo_depth = 1;
    config.controller.tx_fifo_depth = 1;
    let script: String = (0..20).map(|i| format!("write {i} {}\n", i * 3)).collect();
    let report = run(&config, &script).unwrap();
    assert_eq!(report.sent, 20);
    assert_eq!(report.responses.len(), 20);
    for (i, record) in report.responses.iter().enumerate() {
        assert_eq!(record.response.addr, i as u64);
    }
}

#[test]
fn cycle_limit_is_an_error() {
    let mut config = Config::default();
    config.general.max_cycles = 5;
    let err = run(&config, "idle 100\nstatus").unwrap_err();
    assert_eq!(
        err,
        SimError::CycleLimit {
            limit: 5,
            sent: 0,
            answered: 0
        }
    );
}

#[test]
fn empty_script_takes_no_cycles() {
    let report = run(&Config::default(), "").unwrap();
    assert_eq!(report.cycles, 0);
    assert!(report.responses.is_empty());
}
