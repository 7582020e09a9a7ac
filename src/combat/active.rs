//! Active combat - the phase state machine and per-tick resolution
//!
//! Each tick: attack timers -> volleys (both sides, simultaneous) ->
//! damage application -> phase transitions -> end check

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::campaign::army::Army;
use crate::campaign::hex::HexCoord;
use crate::combat::catalog::{UnitCategory, UnitType};
use crate::combat::modifiers::CombatModifiers;
use crate::combat::phase::{CombatOutcome, CombatPhase, CombatPhaseRecord, PhaseTally};
use crate::combat::side::{Side, SideCombatState};
use crate::combat::targeting::{find_target, CavalryStance};
use crate::combat::terrain::TerrainType;
use crate::core::config::CombatConfig;
use crate::core::error::Result;
use crate::core::types::{CombatId, GameTime};

/// Something collaborators may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEventType {
    PhaseChanged {
        from: CombatPhase,
        to: CombatPhase,
        record: CombatPhaseRecord,
    },
    CombatEnded {
        outcome: CombatOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub combat_id: CombatId,
    pub time: GameTime,
    pub event_type: CombatEventType,
}

/// Events produced by a single update
#[derive(Debug, Clone, Default)]
pub struct CombatEventLog {
    pub events: Vec<CombatEvent>,
}

impl CombatEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, combat_id: CombatId, time: GameTime, event_type: CombatEventType) {
        self.events.push(CombatEvent {
            combat_id,
            time,
            event_type,
        });
    }

    pub fn extend(&mut self, other: CombatEventLog) {
        self.events.extend(other.events);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn ended(&self) -> Option<CombatOutcome> {
        self.events.iter().find_map(|e| match e.event_type {
            CombatEventType::CombatEnded { outcome } => Some(outcome),
            _ => None,
        })
    }
}

/// A batch of identical hits from one unit type in one tick
#[derive(Debug, Clone, Copy)]
struct Volley {
    unit_type: UnitType,
    /// Number of per-unit hits, possibly fractional once spill is applied
    hits: f64,
}

/// One battle between an attacking army and the front defender of a tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveCombat {
    pub id: CombatId,
    pub attacker: SideCombatState,
    pub defender: SideCombatState,
    phase: CombatPhase,
    elapsed_time: GameTime,
    phase_start_time: GameTime,
    location: HexCoord,
    terrain: TerrainType,
    terrain_defense_bonus: f64,
    terrain_attack_penalty: f64,
    entrenchment_bonus: f64,
    tally: PhaseTally,
    phase_records: Vec<CombatPhaseRecord>,
}

impl ActiveCombat {
    pub fn new(
        attacker: SideCombatState,
        defender: SideCombatState,
        location: HexCoord,
        terrain: TerrainType,
    ) -> Self {
        let modifiers = terrain.modifiers();
        Self {
            id: CombatId::new(),
            attacker,
            defender,
            phase: CombatPhase::RangedExchange,
            elapsed_time: 0.0,
            phase_start_time: 0.0,
            location,
            terrain,
            terrain_defense_bonus: modifiers.defender_defense_bonus,
            terrain_attack_penalty: modifiers.attacker_attack_penalty,
            entrenchment_bonus: 0.0,
            tally: PhaseTally::default(),
            phase_records: Vec::new(),
        }
    }

    /// Build a combat from live army snapshots
    pub fn from_armies(attacker: &Army, defender: &Army, location: HexCoord, terrain: TerrainType) -> Self {
        Self::new(
            SideCombatState::from_army(attacker),
            SideCombatState::from_army(defender),
            location,
            terrain,
        )
    }

    /// Extra damage reduction for a defender fighting from entrenchments
    pub fn with_entrenchment_bonus(mut self, bonus: f64) -> Self {
        self.entrenchment_bonus = bonus;
        self
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn elapsed_time(&self) -> GameTime {
        self.elapsed_time
    }

    pub fn phase_start_time(&self) -> GameTime {
        self.phase_start_time
    }

    pub fn location(&self) -> HexCoord {
        self.location
    }

    pub fn terrain(&self) -> TerrainType {
        self.terrain
    }

    pub fn terrain_defense_bonus(&self) -> f64 {
        self.terrain_defense_bonus
    }

    pub fn terrain_attack_penalty(&self) -> f64 {
        self.terrain_attack_penalty
    }

    pub fn entrenchment_bonus(&self) -> f64 {
        self.entrenchment_bonus
    }

    pub fn phase_records(&self) -> &[CombatPhaseRecord] {
        &self.phase_records
    }

    pub fn side(&self, side: Side) -> &SideCombatState {
        match side {
            Side::Attacker => &self.attacker,
            Side::Defender => &self.defender,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideCombatState {
        match side {
            Side::Attacker => &mut self.attacker,
            Side::Defender => &mut self.defender,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Has either side run out of units?
    pub fn should_end(&self) -> bool {
        self.attacker.is_destroyed() || self.defender.is_destroyed()
    }

    /// Outcome from current survivors; authoritative once ended
    pub fn outcome(&self) -> CombatOutcome {
        CombatOutcome::from_survivors(self.attacker.total_units(), self.defender.total_units())
    }

    /// Re-bind both sides to their live armies after loading a saved combat
    pub fn link_armies(&mut self, attacker: &Army, defender: &Army) -> Result<()> {
        self.attacker.link(attacker)?;
        self.defender.link(defender)?;
        Ok(())
    }

    pub fn is_linked(&self) -> bool {
        self.attacker.is_linked() && self.defender.is_linked()
    }

    /// Fast-forward the clock past the ranged exchange without fighting it
    pub fn skip_ranged_exchange(&mut self, config: &CombatConfig) -> CombatEventLog {
        let mut events = CombatEventLog::new();
        if self.phase == CombatPhase::RangedExchange {
            self.elapsed_time = self.elapsed_time.max(config.melee_engagement_threshold);
            self.advance_phase(config, &mut events);
        }
        events
    }

    /// Advance the combat by `dt` simulated seconds
    pub fn update(&mut self, dt: f64, config: &CombatConfig, modifiers: &CombatModifiers) -> CombatEventLog {
        assert!(dt.is_finite() && dt >= 0.0, "tick length must be finite and non-negative, got {}", dt);
        for side in [Side::Attacker, Side::Defender] {
            let speed = modifiers.for_side(side).attack_speed_multiplier;
            assert!(
                speed.is_finite() && speed > 0.0,
                "{:?} attack speed multiplier must be finite and positive, got {}",
                side,
                speed
            );
        }

        let mut events = CombatEventLog::new();
        if self.is_finished() {
            return events;
        }

        self.elapsed_time += dt;

        // Volleys are sized from start-of-tick counts so both sides strike together
        let attacker_volleys = self.collect_volleys(Side::Attacker, dt, modifiers);
        let defender_volleys = self.collect_volleys(Side::Defender, dt, modifiers);

        for volley in attacker_volleys {
            self.resolve_volley(Side::Attacker, volley, config, modifiers);
        }
        for volley in defender_volleys {
            self.resolve_volley(Side::Defender, volley, config, modifiers);
        }

        self.advance_phase(config, &mut events);
        events
    }

    /// Can this unit type strike in the current phase?
    fn can_fight(&self, side: Side, unit_type: UnitType) -> bool {
        let state = self.side(side);

        if unit_type.category() == UnitCategory::Cavalry
            && state.cavalry_stance == CavalryStance::Reserve
            && self.phase < CombatPhase::Cleanup
        {
            // Reserves commit early only when nothing else is left to fight
            let has_other_units = state
                .living_types()
                .any(|(t, _)| t.category() != UnitCategory::Cavalry);
            return !has_other_units;
        }

        true
    }

    fn collect_volleys(&mut self, side: Side, dt: f64, modifiers: &CombatModifiers) -> Vec<Volley> {
        let speed = modifiers.for_side(side).attack_speed_multiplier;
        let ready: Vec<(UnitType, u32)> = self
            .side(side)
            .living_types()
            .filter(|(unit_type, _)| self.can_fight(side, *unit_type))
            .collect();

        let mut volleys = Vec::with_capacity(ready.len());
        for (unit_type, count) in ready {
            let interval = unit_type.combat_stats().attack_interval_secs / speed;
            let attacks = self.side_mut(side).advance_attack_timer(unit_type, dt, interval);
            if attacks > 0 {
                volleys.push(Volley {
                    unit_type,
                    hits: count as f64 * attacks as f64,
                });
            }
        }
        volleys
    }

    /// Per-unit damage of one hit after every multiplier
    fn hit_damage(
        &self,
        side: Side,
        attacker_type: UnitType,
        target_type: UnitType,
        config: &CombatConfig,
        modifiers: &CombatModifiers,
    ) -> f64 {
        let attacker_stats = attacker_type.combat_stats();
        let target_stats = target_type.combat_stats();
        let target_armor = modifiers.for_side(side.opponent()).armor_bonus;

        let mut damage = attacker_stats.hit_damage_against(&target_stats, target_armor);
        damage *= attacker_stats.bonuses.against(target_type.category());

        if attacker_type.category() == UnitCategory::Cavalry
            && self.side(side).cavalry_stance == CavalryStance::Flank
            && target_type.category() == UnitCategory::Ranged
        {
            damage *= config.cavalry_flank_bonus;
        }

        damage *= modifiers.for_side(side).damage_multiplier;

        if side == Side::Attacker {
            let reduction = (self.terrain_defense_bonus + self.entrenchment_bonus).min(config.max_defense_reduction);
            damage *= (1.0 - self.terrain_attack_penalty) * (1.0 - reduction);
        }

        damage.max(config.minimum_hit_damage)
    }

    /// Spend a volley, spilling any overkill into the next target
    fn resolve_volley(&mut self, side: Side, volley: Volley, config: &CombatConfig, modifiers: &CombatModifiers) {
        let category = volley.unit_type.category();
        let stance = self.side(side).cavalry_stance;
        let enemy = side.opponent();
        let mut hits = volley.hits;

        while hits > 0.0 {
            let Some(target) = find_target(category, stance, self.side(enemy)) else {
                break;
            };

            let per_hit = self.hit_damage(side, volley.unit_type, target, config, modifiers);
            let capacity = self.side(enemy).remaining_health(target);
            let total = per_hit * hits;
            let (applied, spent) = if total <= capacity {
                (total, hits)
            } else {
                (capacity, capacity / per_hit)
            };

            let kills = self.side_mut(enemy).apply_damage(total, target);
            self.side_mut(side).track_damage_dealt(applied, volley.unit_type);
            self.tally.record_damage(side, applied);
            self.tally.record_casualties(enemy, target, kills);

            debug!(
                "{:?} {:?} x{:.2} -> {:?}: {:.1} damage, {} killed",
                side, volley.unit_type, spent, target, applied, kills
            );

            if total <= capacity {
                break;
            }
            hits -= spent;
        }
    }

    /// Apply every transition whose condition holds, in order
    fn advance_phase(&mut self, config: &CombatConfig, events: &mut CombatEventLog) {
        loop {
            let next = match self.phase {
                CombatPhase::RangedExchange if self.elapsed_time >= config.melee_engagement_threshold => {
                    Some(CombatPhase::MeleeEngagement)
                }
                CombatPhase::MeleeEngagement
                    if self.attacker.melee_units() == 0 || self.defender.melee_units() == 0 =>
                {
                    Some(CombatPhase::Cleanup)
                }
                CombatPhase::Cleanup if self.should_end() => Some(CombatPhase::Ended),
                _ => None,
            };

            match next {
                Some(phase) => self.transition(phase, events),
                None => break,
            }
        }

        if self.should_end() && !self.is_finished() {
            self.transition(CombatPhase::Ended, events);
        }
    }

    fn transition(&mut self, to: CombatPhase, events: &mut CombatEventLog) {
        let from = self.phase;
        let record = self.tally.finish(from, self.phase_start_time, self.elapsed_time);

        info!(
            "Combat at {:?}: {:?} -> {:?} after {:.1}s ({} / {} units left)",
            self.location,
            from,
            to,
            record.duration,
            self.attacker.total_units(),
            self.defender.total_units()
        );

        self.phase_records.push(record.clone());
        self.phase = to;
        self.phase_start_time = self.elapsed_time;
        events.push(self.id, self.elapsed_time, CombatEventType::PhaseChanged { from, to, record });

        if to == CombatPhase::Ended {
            let outcome = self.outcome();
            info!("Combat at {:?} ended: {:?}", self.location, outcome);
            events.push(self.id, self.elapsed_time, CombatEventType::CombatEnded { outcome });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::modifiers::SideModifiers;
    use crate::core::types::ArmyId;

    fn side(composition: &[(UnitType, u32)], stance: CavalryStance) -> SideCombatState {
        SideCombatState::new(ArmyId::new(), composition.iter().copied(), stance)
    }

    fn combat(attacker: &[(UnitType, u32)], defender: &[(UnitType, u32)]) -> ActiveCombat {
        ActiveCombat::new(
            side(attacker, CavalryStance::Frontline),
            side(defender, CavalryStance::Frontline),
            HexCoord::new(0, 0),
            TerrainType::Plains,
        )
    }

    fn run_to_end(combat: &mut ActiveCombat, dt: f64) -> usize {
        let config = CombatConfig::default();
        let modifiers = CombatModifiers::default();
        let mut ticks = 0;
        while !combat.is_finished() && ticks < 10_000 {
            combat.update(dt, &config, &modifiers);
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn test_starts_in_ranged_exchange() {
        let combat = combat(&[(UnitType::Swordsman, 1)], &[(UnitType::Archer, 1)]);
        assert_eq!(combat.phase(), CombatPhase::RangedExchange);
        assert_eq!(combat.elapsed_time(), 0.0);
        assert!(combat.phase_records().is_empty());
    }

    #[test]
    fn test_infantry_fights_during_ranged_exchange() {
        let mut combat = combat(&[(UnitType::Swordsman, 10)], &[(UnitType::Militia, 10)]);
        let config = CombatConfig::default();
        combat.update(2.0, &config, &CombatModifiers::default());
        assert_eq!(combat.phase(), CombatPhase::RangedExchange);
        // One swing each: swordsmen 12 - 1 armor, militia 6 - 2 armor
        assert_eq!(combat.defender.total_damage_received(), 110.0);
        assert_eq!(combat.attacker.total_damage_received(), 40.0);
    }

    #[test]
    fn test_units_killed_this_tick_still_strike() {
        let mut combat = combat(&[(UnitType::Mangonel, 10)], &[(UnitType::Archer, 1)]);
        let config = CombatConfig::default();
        combat.update(5.0, &config, &CombatModifiers::default());
        assert!(combat.defender.is_destroyed());
        // Both archer shots (8 pierce - 1 armor) are sized from the start-of-tick count
        assert_eq!(combat.attacker.total_damage_received(), 14.0);
        assert_eq!(combat.defender.total_damage_dealt(), 14.0);
    }

    #[test]
    #[should_panic(expected = "attack speed multiplier")]
    fn test_zero_attack_speed_rejected() {
        let mut combat = combat(&[(UnitType::Swordsman, 1)], &[(UnitType::Militia, 1)]);
        let modifiers = CombatModifiers::new(SideModifiers::default().with_attack_speed(0.0), SideModifiers::default());
        combat.update(0.5, &CombatConfig::default(), &modifiers);
    }

    #[test]
    #[should_panic(expected = "attack speed multiplier")]
    fn test_negative_attack_speed_rejected() {
        let mut combat = combat(&[(UnitType::Swordsman, 1)], &[(UnitType::Militia, 1)]);
        let modifiers = CombatModifiers::new(SideModifiers::default(), SideModifiers::default().with_attack_speed(-1.0));
        combat.update(0.5, &CombatConfig::default(), &modifiers);
    }

    #[test]
    fn test_archers_fire_during_ranged_exchange() {
        let mut combat = combat(&[(UnitType::Archer, 5)], &[(UnitType::Swordsman, 10)]);
        let config = CombatConfig::default();
        combat.update(2.0, &config, &CombatModifiers::default());
        // 5 archers, pierce 8 vs pierce armor 1
        assert_eq!(combat.defender.total_damage_received(), 35.0);
        assert_eq!(combat.phase(), CombatPhase::RangedExchange);
    }

    #[test]
    fn test_threshold_moves_to_melee() {
        let mut combat = combat(&[(UnitType::Swordsman, 10)], &[(UnitType::Militia, 10)]);
        let config = CombatConfig::default();
        let events = combat.update(config.melee_engagement_threshold, &config, &CombatModifiers::default());
        assert_eq!(combat.phase(), CombatPhase::MeleeEngagement);
        assert_eq!(combat.phase_records().len(), 1);
        assert_eq!(combat.phase_records()[0].phase, CombatPhase::RangedExchange);
        assert!(matches!(
            events.events[0].event_type,
            CombatEventType::PhaseChanged {
                from: CombatPhase::RangedExchange,
                to: CombatPhase::MeleeEngagement,
                ..
            }
        ));
    }

    #[test]
    fn test_swordsmen_beat_archers() {
        let mut combat = combat(&[(UnitType::Swordsman, 10)], &[(UnitType::Archer, 5)]);
        let config = CombatConfig::default();
        combat.skip_ranged_exchange(&config);
        // The archers field no melee units, so the lines never hold
        assert_eq!(combat.phase(), CombatPhase::Cleanup);

        run_to_end(&mut combat, 0.1);

        assert_eq!(combat.phase(), CombatPhase::Ended);
        assert_eq!(combat.defender.total_units(), 0);
        assert_eq!(combat.outcome(), CombatOutcome::AttackerVictory);
    }

    #[test]
    fn test_coarse_tick_fires_multiple_attacks() {
        let mut slow = combat(&[(UnitType::Archer, 1)], &[(UnitType::Knight, 1)]);
        let config = CombatConfig::default();
        slow.update(2.9, &config, &CombatModifiers::default());
        // One shot: 8 pierce - 2 armor
        assert_eq!(slow.defender.total_damage_received(), 6.0);

        let mut faster = combat(&[(UnitType::Archer, 1)], &[(UnitType::Knight, 1)]);
        let modifiers = CombatModifiers::new(SideModifiers::default().with_attack_speed(2.0), SideModifiers::default());
        faster.update(2.9, &config, &modifiers);
        assert_eq!(faster.defender.total_damage_received(), 12.0);
    }

    #[test]
    fn test_overkill_spills_to_next_target() {
        let mut combat = combat(&[(UnitType::Mangonel, 3)], &[(UnitType::Archer, 1), (UnitType::Crossbowman, 3)]);
        let config = CombatConfig::default();
        combat.update(5.0, &config, &CombatModifiers::default());
        // 3 hits of 25 * 1.5: the archer absorbs 70, the crossbows take the other 42.5
        assert_eq!(combat.defender.get_units(UnitType::Archer), 0);
        assert_eq!(combat.defender.get_units(UnitType::Crossbowman), 3);
        assert!((combat.defender.accumulator(UnitType::Crossbowman) - 42.5).abs() < 1e-9);
        assert!((combat.attacker.total_damage_dealt() - 112.5).abs() < 1e-9);
    }

    #[test]
    fn test_terrain_reduces_attacker_damage() {
        let config = CombatConfig::default();
        let mut open = combat(&[(UnitType::Archer, 10)], &[(UnitType::Swordsman, 10)]);
        let mut hills = ActiveCombat::new(
            side(&[(UnitType::Archer, 10)], CavalryStance::Frontline),
            side(&[(UnitType::Swordsman, 10)], CavalryStance::Frontline),
            HexCoord::new(0, 0),
            TerrainType::Hills,
        );
        open.update(2.0, &config, &CombatModifiers::default());
        hills.update(2.0, &config, &CombatModifiers::default());
        assert!(hills.attacker.total_damage_dealt() < open.attacker.total_damage_dealt());
        assert_eq!(hills.terrain_defense_bonus(), TerrainType::Hills.defense_bonus());
    }

    #[test]
    fn test_entrenchment_reduces_attacker_damage() {
        let config = CombatConfig::default();
        let mut plain = combat(&[(UnitType::Archer, 10)], &[(UnitType::Swordsman, 10)]);
        let mut dug_in = combat(&[(UnitType::Archer, 10)], &[(UnitType::Swordsman, 10)])
            .with_entrenchment_bonus(config.entrenchment_defense_bonus);
        plain.update(2.0, &config, &CombatModifiers::default());
        dug_in.update(2.0, &config, &CombatModifiers::default());
        assert!(dug_in.attacker.total_damage_dealt() < plain.attacker.total_damage_dealt());
    }

    #[test]
    fn test_flank_bonus_applies_to_ranged_targets() {
        let config = CombatConfig::default();
        let mut flank = ActiveCombat::new(
            side(&[(UnitType::Knight, 1)], CavalryStance::Flank),
            side(&[(UnitType::Archer, 10), (UnitType::Swordsman, 10)], CavalryStance::Frontline),
            HexCoord::new(0, 0),
            TerrainType::Plains,
        );
        flank.skip_ranged_exchange(&config);
        flank.update(1.8, &config, &CombatModifiers::default());
        // Knight 14 melee vs archer armor 0, x1.25
        assert_eq!(flank.defender.damage_received(UnitType::Archer), 17.5);
        assert_eq!(flank.defender.damage_received(UnitType::Swordsman), 0.0);
    }

    #[test]
    fn test_reserve_cavalry_waits_for_cleanup() {
        let config = CombatConfig::default();
        let mut combat = ActiveCombat::new(
            side(&[(UnitType::Knight, 5), (UnitType::Archer, 1)], CavalryStance::Reserve),
            side(&[(UnitType::Militia, 10)], CavalryStance::Frontline),
            HexCoord::new(0, 0),
            TerrainType::Plains,
        );
        combat.skip_ranged_exchange(&config);
        combat.update(1.8, &config, &CombatModifiers::default());
        assert_eq!(combat.attacker.damage_dealt(UnitType::Knight), 0.0);
    }

    #[test]
    fn test_lone_reserve_commits() {
        let mut combat = ActiveCombat::new(
            side(&[(UnitType::Knight, 5)], CavalryStance::Reserve),
            side(&[(UnitType::Militia, 5)], CavalryStance::Frontline),
            HexCoord::new(0, 0),
            TerrainType::Plains,
        );
        run_to_end(&mut combat, 0.5);
        assert!(combat.is_finished());
        assert!(combat.attacker.damage_dealt(UnitType::Knight) > 0.0);
    }

    #[test]
    fn test_ranged_only_sides_terminate() {
        let mut combat = combat(&[(UnitType::Archer, 5)], &[(UnitType::Crossbowman, 5)]);
        run_to_end(&mut combat, 0.25);
        assert!(combat.is_finished());
        assert_eq!(combat.phase_records().last().map(|r| r.phase), Some(CombatPhase::Cleanup));
    }

    #[test]
    fn test_wipe_during_ranged_exchange_ends_immediately() {
        let mut combat = combat(&[(UnitType::Mangonel, 10)], &[(UnitType::Archer, 1)]);
        let config = CombatConfig::default();
        let events = combat.update(5.0, &config, &CombatModifiers::default());
        assert!(combat.is_finished());
        assert_eq!(events.ended(), Some(CombatOutcome::AttackerVictory));
        let phases: Vec<CombatPhase> = combat.phase_records().iter().map(|r| r.phase).collect();
        assert_eq!(
            phases,
            vec![CombatPhase::RangedExchange, CombatPhase::MeleeEngagement, CombatPhase::Cleanup]
        );
    }

    #[test]
    fn test_update_after_end_is_noop() {
        let mut combat = combat(&[(UnitType::Swordsman, 10)], &[(UnitType::Archer, 1)]);
        run_to_end(&mut combat, 0.5);
        let records = combat.phase_records().len();
        let elapsed = combat.elapsed_time();
        let events = combat.update(1.0, &CombatConfig::default(), &CombatModifiers::default());
        assert!(events.is_empty());
        assert_eq!(combat.phase_records().len(), records);
        assert_eq!(combat.elapsed_time(), elapsed);
    }

    #[test]
    fn test_phase_casualties_conserved() {
        let mut combat = combat(
            &[(UnitType::Swordsman, 8), (UnitType::Archer, 4)],
            &[(UnitType::Pikeman, 6), (UnitType::Knight, 3)],
        );
        run_to_end(&mut combat, 0.3);
        for side in [Side::Attacker, Side::Defender] {
            let recorded: u32 = combat.phase_records().iter().map(|r| r.total_casualties(side)).sum();
            assert_eq!(recorded, combat.side(side).total_casualties());
        }
    }

    #[test]
    fn test_serde_round_trip_needs_relink() {
        let mut combat = combat(&[(UnitType::Swordsman, 3)], &[(UnitType::Archer, 3)]);
        combat.update(1.0, &CombatConfig::default(), &CombatModifiers::default());
        let json = serde_json::to_string(&combat).expect("serialize");
        let restored: ActiveCombat = serde_json::from_str(&json).expect("deserialize");
        assert!(!restored.is_linked());
        assert_eq!(restored.elapsed_time(), combat.elapsed_time());
        assert_eq!(restored.phase(), combat.phase());
        assert_eq!(restored.attacker.army_id, combat.attacker.army_id);
    }
}
