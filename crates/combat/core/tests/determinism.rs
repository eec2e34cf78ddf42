use combat_core::combat::{is_canonical_order, validate_canonical_order};
use combat_core::{
    CombatEventBuffer, EntityId, EntityState, EventBudgets, Fixed, FixedVec2, SimulationConfig,
    SkillDefinition, SkillId, SkillTable, Tick, TickDriver, TileGrid, WorldCommand, ZoneCombat,
    ZoneId, ZoneState, state_checksum,
};
use proptest::prelude::*;

fn config() -> SimulationConfig {
    SimulationConfig::new(SkillTable::new(vec![
        SkillDefinition::new(SkillId(1), 9, Fixed::from_int(20)),
        SkillDefinition::new(SkillId(2), 23, Fixed::from_int(20)).with_cooldown(3),
        SkillDefinition::new(SkillId(3), 4, Fixed::from_int(20)).with_threat_percent(400),
    ]))
    .with_budgets(EventBudgets {
        max_events_per_tick: 16,
        max_retained_events: 48,
        max_snapshot_events: 8,
        max_combat_log_events: 64,
    })
}

fn initial() -> ZoneCombat {
    let entities = (1..=8)
        .map(|id| EntityState::new(EntityId(id), 60 + id as i32 * 5, FixedVec2::from_ints(id as i32, 0)))
        .collect();
    let zone = ZoneState::new(ZoneId(4), entities, TileGrid::default());
    ZoneCombat::new(zone, CombatEventBuffer::new(config().budgets))
}

fn arb_command() -> impl Strategy<Value = WorldCommand> {
    (1u32..=8, 1u32..=4, 1u32..=8).prop_map(|(caster, skill, target)| {
        WorldCommand::cast_at_entity(EntityId(caster), SkillId(skill), EntityId(target))
    })
}

fn shuffled(mut commands: Vec<WorldCommand>, seed: u64) -> Vec<WorldCommand> {
    let mut state = seed | 1;
    for i in (1..commands.len()).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        commands.swap(i, (state % (i as u64 + 1)) as usize);
    }
    commands
}

fn run(ticks: &[Vec<WorldCommand>]) -> ZoneCombat {
    let config = config();
    let driver = TickDriver::new(&config);
    let mut state = initial();
    for (tick, commands) in ticks.iter().enumerate() {
        let outcome = driver.step(Tick(tick as u64 + 1), state, commands);
        assert!(validate_canonical_order(outcome.state.history.events()).is_ok());
        assert!(is_canonical_order(outcome.state.history.log_events()));
        assert!(outcome.state.ledger.validate().is_ok());
        assert!(outcome.state.zone.validate().is_ok());
        state = outcome.state;
    }
    state
}

#[test]
fn identical_runs_produce_identical_checksums() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let ticks: Vec<Vec<WorldCommand>> = (0..6)
        .map(|tick| {
            (1..=8)
                .map(|caster| {
                    let target = (caster + tick) % 8 + 1;
                    WorldCommand::cast_at_entity(EntityId(caster), SkillId(tick % 3 + 1), EntityId(target))
                })
                .collect()
        })
        .collect();

    let first = run(&ticks);
    let second = run(&ticks);
    assert_eq!(first, second);

    let a = state_checksum(&first.zone, first.history.events());
    let b = state_checksum(&second.zone, second.history.events());
    assert_eq!(hex::encode(a.as_bytes()), hex::encode(b.as_bytes()));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn arrival_order_never_changes_the_outcome(
        ticks in prop::collection::vec(prop::collection::vec(arb_command(), 0..24), 1..6),
        seed in any::<u64>(),
    ) {
        let reordered: Vec<Vec<WorldCommand>> = ticks
            .iter()
            .enumerate()
            .map(|(i, commands)| shuffled(commands.clone(), seed.wrapping_add(i as u64)))
            .collect();

        let a = run(&ticks);
        let b = run(&reordered);
        prop_assert_eq!(&a.zone, &b.zone);
        prop_assert_eq!(a.history.events(), b.history.events());
        prop_assert_eq!(a.history.log_events(), b.history.log_events());
        prop_assert_eq!(&a.ledger, &b.ledger);
        prop_assert_eq!(
            state_checksum(&a.zone, a.history.events()),
            state_checksum(&b.zone, b.history.events())
        );
    }
}
