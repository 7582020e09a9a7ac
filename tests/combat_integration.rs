//! Combat integration tests
//!
//! End-to-end battles driven through the public API: the phase machine on
//! its own, and full attacks orchestrated by `CombatManager` on a world.

use warfront::campaign::{Army, HexCoord, WorldState};
use warfront::combat::{
    find_target, ActiveCombat, AttackResult, CavalryStance, CombatEventType, CombatManager,
    CombatModifiers, CombatOutcome, CombatPhase, SideCombatState, SideModifiers, TerrainType,
    UnitType,
};
use warfront::core::{ArmyId, CombatConfig, OwnerId};

const RED: OwnerId = OwnerId(1);
const BLUE: OwnerId = OwnerId(2);

fn run_to_end(combat: &mut ActiveCombat, dt: f64, modifiers: &CombatModifiers) -> Vec<CombatEventType> {
    let config = CombatConfig::default();
    let mut events = Vec::new();
    let mut ticks = 0;
    while !combat.is_finished() {
        events.extend(combat.update(dt, &config, modifiers).events.into_iter().map(|e| e.event_type));
        ticks += 1;
        assert!(ticks < 100_000, "combat did not terminate");
    }
    events
}

/// Swordsmen charge archers with the ranged exchange skipped
#[test]
fn test_swordsmen_overrun_archers() {
    let config = CombatConfig::default();
    let mut combat = ActiveCombat::new(
        SideCombatState::new(ArmyId::new(), [(UnitType::Swordsman, 10)], CavalryStance::Frontline),
        SideCombatState::new(ArmyId::new(), [(UnitType::Archer, 5)], CavalryStance::Frontline),
        HexCoord::new(0, 0),
        TerrainType::Plains,
    );

    combat.skip_ranged_exchange(&config);
    assert!(combat.phase() > CombatPhase::RangedExchange);

    run_to_end(&mut combat, 0.1, &CombatModifiers::default());

    assert_eq!(combat.outcome(), CombatOutcome::AttackerVictory);
    assert_eq!(combat.defender.total_units(), 0);
    assert_eq!(combat.defender.total_casualties(), 5);
    assert!(combat.attacker.total_units() > 0);
}

/// Flanking cavalry goes for the archers even with infantry in the way
#[test]
fn test_flanking_cavalry_prefers_archers() {
    let defender = SideCombatState::new(
        ArmyId::new(),
        [(UnitType::Swordsman, 8), (UnitType::Archer, 4)],
        CavalryStance::Frontline,
    );
    let target = find_target(UnitType::Knight.category(), CavalryStance::Flank, &defender);
    assert_eq!(target, Some(UnitType::Archer));

    let target = find_target(UnitType::Knight.category(), CavalryStance::Frontline, &defender);
    assert_eq!(target, Some(UnitType::Swordsman));
}

#[test]
fn test_phases_recorded_in_order() {
    let mut combat = ActiveCombat::new(
        SideCombatState::new(
            ArmyId::new(),
            [(UnitType::Swordsman, 6), (UnitType::Archer, 4)],
            CavalryStance::Frontline,
        ),
        SideCombatState::new(
            ArmyId::new(),
            [(UnitType::Pikeman, 5), (UnitType::Crossbowman, 3)],
            CavalryStance::Frontline,
        ),
        HexCoord::new(0, 0),
        TerrainType::Plains,
    );

    let events = run_to_end(&mut combat, 0.25, &CombatModifiers::default());

    let phases: Vec<CombatPhase> = combat.phase_records().iter().map(|r| r.phase).collect();
    let mut sorted = phases.clone();
    sorted.sort();
    assert_eq!(phases, sorted, "phases never move backwards");
    assert_eq!(phases.first(), Some(&CombatPhase::RangedExchange));

    // Ranged exchange lasts exactly the engagement threshold when nobody is wiped out early
    let first = &combat.phase_records()[0];
    assert!((first.duration - CombatConfig::default().melee_engagement_threshold).abs() < 1e-9);

    let ended: Vec<CombatOutcome> = events
        .iter()
        .filter_map(|e| match e {
            CombatEventType::CombatEnded { outcome } => Some(*outcome),
            _ => None,
        })
        .collect();
    assert_eq!(ended, vec![combat.outcome()]);

    // Per-phase casualties add up to the side totals
    let attacker_losses: u32 = combat
        .phase_records()
        .iter()
        .map(|r| r.total_casualties(warfront::combat::Side::Attacker))
        .sum();
    assert_eq!(attacker_losses, combat.attacker.total_casualties());
}

#[test]
fn test_damage_multiplier_speeds_up_victory() {
    let build = || {
        ActiveCombat::new(
            SideCombatState::new(ArmyId::new(), [(UnitType::Swordsman, 10)], CavalryStance::Frontline),
            SideCombatState::new(ArmyId::new(), [(UnitType::Militia, 10)], CavalryStance::Frontline),
            HexCoord::new(0, 0),
            TerrainType::Plains,
        )
    };

    let mut plain = build();
    run_to_end(&mut plain, 0.1, &CombatModifiers::default());

    let mut boosted = build();
    let modifiers = CombatModifiers::new(SideModifiers::default().with_damage_multiplier(2.0), SideModifiers::default());
    run_to_end(&mut boosted, 0.1, &modifiers);

    assert_eq!(boosted.outcome(), CombatOutcome::AttackerVictory);
    assert!(boosted.elapsed_time() <= plain.elapsed_time());
    assert!(boosted.attacker.total_casualties() <= plain.attacker.total_casualties());
}

#[test]
fn test_hills_slow_the_attacker() {
    let build = |terrain| {
        ActiveCombat::new(
            SideCombatState::new(ArmyId::new(), [(UnitType::Swordsman, 10)], CavalryStance::Frontline),
            SideCombatState::new(ArmyId::new(), [(UnitType::Archer, 5)], CavalryStance::Frontline),
            HexCoord::new(0, 0),
            terrain,
        )
    };

    let mut open = build(TerrainType::Plains);
    run_to_end(&mut open, 0.1, &CombatModifiers::default());
    let mut hills = build(TerrainType::Hills);
    run_to_end(&mut hills, 0.1, &CombatModifiers::default());

    assert!(hills.elapsed_time() >= open.elapsed_time());
    assert!(hills.defender.total_damage_dealt() >= open.defender.total_damage_dealt());
}

#[test]
fn test_manager_battle_updates_world() {
    let mut world = WorldState::new();
    world.declare_war(RED, BLUE);
    let tile = HexCoord::new(0, 0);
    world.set_terrain(tile, TerrainType::Forest);

    let attacker = world.add_army(
        Army::new(ArmyId::new(), RED, HexCoord::new(0, 1))
            .with_units(UnitType::Swordsman, 10)
            .with_units(UnitType::Knight, 4),
    );
    let defender = world.add_army(
        Army::new(ArmyId::new(), BLUE, tile)
            .with_units(UnitType::Archer, 5)
            .with_units(UnitType::Militia, 3)
            .arrived(2.0),
    );

    let mut manager = CombatManager::new(CombatConfig::default());
    let AttackResult::Engaged { combat_id, defender: engaged } =
        manager.initiate_attack(&mut world, attacker, tile).expect("attack should start")
    else {
        panic!("expected an engagement");
    };
    assert_eq!(engaged, defender);
    assert_eq!(manager.get(combat_id).map(|c| c.terrain()), Some(TerrainType::Forest));

    let mut ticks = 0;
    while !manager.is_idle() {
        manager.update(&mut world, 0.2, &CombatModifiers::default());
        ticks += 1;
        assert!(ticks < 50_000);
    }

    let report = &manager.reports()[0];
    assert_eq!(report.combat_id, combat_id);
    assert_eq!(report.outcome, CombatOutcome::AttackerVictory);
    assert!(world.get_army(defender).is_none());

    let survivor = world.get_army(attacker).expect("attacker survives");
    assert!(!survivor.is_in_combat());
    let expected: std::collections::BTreeMap<UnitType, u32> = report.attacker.survivors.clone();
    assert_eq!(survivor.composition, expected);
}

/// A combat saved mid-fight resumes once relinked
#[test]
fn test_saved_combat_resumes() {
    let mut world = WorldState::new();
    world.declare_war(RED, BLUE);
    let tile = HexCoord::new(0, 0);
    let attacker = world.add_army(Army::new(ArmyId::new(), RED, HexCoord::new(1, 0)).with_units(UnitType::Knight, 6));
    world.add_army(Army::new(ArmyId::new(), BLUE, tile).with_units(UnitType::Pikeman, 4));

    let mut manager = CombatManager::default();
    let AttackResult::Engaged { combat_id, .. } =
        manager.initiate_attack(&mut world, attacker, tile).expect("attack should start")
    else {
        panic!("expected an engagement");
    };
    for _ in 0..40 {
        manager.update(&mut world, 0.1, &CombatModifiers::default());
    }

    let saved = serde_json::to_string(manager.get(combat_id).expect("still fighting")).expect("combat should serialize");
    let loaded: ActiveCombat = serde_json::from_str(&saved).expect("combat should deserialize");
    assert!(!loaded.is_linked());
    assert_eq!(loaded.elapsed_time(), manager.get(combat_id).map(|c| c.elapsed_time()).unwrap_or_default());

    // Fresh manager, same world: the loaded combat picks up where it left off
    let mut resumed = CombatManager::default();
    let id = resumed.restore(&mut world, loaded).expect("armies still exist");
    assert_eq!(id, combat_id);
    assert!(resumed.get(id).map(|c| c.is_linked()).unwrap_or(false));

    while !resumed.is_idle() {
        resumed.update(&mut world, 0.1, &CombatModifiers::default());
    }
    assert_eq!(resumed.reports().len(), 1);
    assert_ne!(resumed.reports()[0].outcome, CombatOutcome::Draw);
}
