//! Simulation step - advances every monster once per poll
//!
//! Per monster, in registry order:
//! hunger tick -> action (eat or wander) -> corpse decay
//!
//! Due times are computed from the last scheduled time, not from `now`, so
//! late polls do not accumulate drift. At most one hunger tick and one action
//! are applied per poll; a poll that falls several periods behind does not
//! batch the missed ticks.

use serde::Serialize;

use crate::core::config::PenConfig;
use crate::core::types::{wrap_column, Millis, MonsterId, WRITABLE_WIDTH};
use crate::entity::registry::Handle;
use crate::simulation::state::{Pen, SimulationState};
use crate::simulation::wander::Wander;

/// Events generated during a simulation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PenEvent {
    /// A hunger tick elapsed
    Hungered { id: MonsterId, hunger: u32, at: Millis },
    /// Hunger reached the death threshold
    Died { id: MonsterId, at: Millis },
    /// A monster ate the treat it was standing on
    Ate {
        id: MonsterId,
        position: u8,
        hunger: u32,
        at: Millis,
    },
    /// A monster wandered one column
    Moved {
        id: MonsterId,
        from: u8,
        to: u8,
        at: Millis,
    },
    /// A fully decayed corpse left the pen
    Removed { id: MonsterId, at: Millis },
}

/// Run one simulation step at clock reading `now`
///
/// Returns the events that occurred, in the order they happened.
pub fn run_simulation_step(
    state: &mut SimulationState,
    now: Millis,
    config: &PenConfig,
    wander: &mut impl Wander,
) -> Vec<PenEvent> {
    let mut events = Vec::new();

    let mut cursor = state.pen.monsters.head();
    while let Some(handle) = cursor {
        // Capture the successor before this node can be unlinked
        cursor = state.pen.monsters.next_of(handle);
        step_monster(&mut state.pen, handle, now, config, wander, &mut events);
    }

    events
}

fn step_monster(
    pen: &mut Pen,
    handle: Handle,
    now: Millis,
    config: &PenConfig,
    wander: &mut impl Wander,
    events: &mut Vec<PenEvent>,
) {
    let Pen {
        monsters, treats, ..
    } = pen;

    let Some(monster) = monsters.get_mut(handle) else {
        return;
    };
    assert!(
        (monster.position as usize) < WRITABLE_WIDTH,
        "monster {} is off the strip at {}",
        monster.id,
        monster.position
    );

    // Configured or inserted already at the threshold
    if monster.alive && monster.hunger >= config.death_hunger {
        monster.kill(now);
        tracing::info!("Monster {} starved at {}ms", monster.id, now);
        events.push(PenEvent::Died { id: monster.id, at: now });
    }

    // Hunger tick
    if monster.alive {
        let due = monster.next_hunger_due(config.hunger_period_ms);
        if now >= due {
            monster.hunger += 1;
            tracing::debug!("Monster {} hunger now {}", monster.id, monster.hunger);
            events.push(PenEvent::Hungered {
                id: monster.id,
                hunger: monster.hunger,
                at: now,
            });

            if monster.hunger >= config.death_hunger {
                monster.kill(now);
                tracing::info!("Monster {} starved at {}ms", monster.id, now);
                events.push(PenEvent::Died { id: monster.id, at: now });
            }
            monster.last_hunger_tick_at = due;
        }
    }

    // Action: eat what is underfoot, otherwise wander
    if monster.alive {
        let due = monster.next_action_due(config.action_period_ms);
        if now >= due {
            let position = monster.position as usize;
            if monster.hunger > 0 && treats[position] {
                treats[position] = false;
                monster.hunger -= 1;
                tracing::debug!(
                    "Monster {} ate treat at {}, hunger now {}",
                    monster.id,
                    position,
                    monster.hunger
                );
                events.push(PenEvent::Ate {
                    id: monster.id,
                    position: monster.position,
                    hunger: monster.hunger,
                    at: now,
                });
            } else {
                let from = monster.position;
                let step = wander.choose(monster, now);
                monster.position = wrap_column(from as i32 + step.offset());
                events.push(PenEvent::Moved {
                    id: monster.id,
                    from,
                    to: monster.position,
                    at: now,
                });
            }
            monster.last_acted_at = due;
        }
    }

    // Corpse decay
    if monster.is_decayed(now, config.decay_duration_ms) {
        let id = monster.id;
        monsters.remove(handle);
        tracing::info!("Monster {} decayed and was removed at {}ms", id, now);
        events.push(PenEvent::Removed { id, at: now });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Species;
    use crate::entity::monster::Monster;
    use crate::simulation::wander::Step;

    /// Always steps the same way
    struct Fixed(Step);

    impl Wander for Fixed {
        fn choose(&mut self, _monster: &Monster, _now: Millis) -> Step {
            self.0
        }
    }

    fn config() -> PenConfig {
        let mut config = PenConfig::default();
        config.monsters.clear();
        config
    }

    fn state_with(monster: Monster) -> (SimulationState, Handle) {
        let mut state = SimulationState::new(&config());
        let handle = state.pen.monsters.insert(monster).unwrap();
        (state, handle)
    }

    #[test]
    fn test_hunger_tick_uses_scheduled_time() {
        let config = config();
        let (mut state, handle) =
            state_with(Monster::new(MonsterId(0), Species::Fuzzball, 3, 0));

        // Poll late: the next due time stays on the 10s grid
        run_simulation_step(&mut state, 10_400, &config, &mut Fixed(Step::Right));

        let monster = state.pen.monsters.get(handle).unwrap();
        assert_eq!(monster.hunger, 1);
        assert_eq!(monster.last_hunger_tick_at, 10_000);
    }

    #[test]
    fn test_missed_ticks_are_not_batched() {
        let config = config();
        let (mut state, handle) =
            state_with(Monster::new(MonsterId(0), Species::Fuzzball, 3, 0));

        run_simulation_step(&mut state, 35_000, &config, &mut Fixed(Step::Right));

        let monster = state.pen.monsters.get(handle).unwrap();
        assert_eq!(monster.hunger, 1);
        assert_eq!(monster.last_hunger_tick_at, 10_000);
        assert_eq!(monster.last_acted_at, 1_000);
        assert_eq!(monster.position, 4);
    }

    #[test]
    fn test_frozen_clock_does_not_drive_fast_monster() {
        let mut config = config();
        config.action_period_ms = 2;
        config.hunger_period_ms = 2;
        let (mut state, handle) =
            state_with(Monster::new(MonsterId(0), Species::Bat, 3, 0));

        for _ in 0..30 {
            let events = run_simulation_step(&mut state, 0, &config, &mut Fixed(Step::Right));
            assert!(events.is_empty());
        }
        let monster = state.pen.monsters.get(handle).unwrap();
        assert!(monster.alive);
        assert_eq!(monster.hunger, 0);
        assert_eq!(monster.position, 3);

        // Once time moves, the 1ms floor applies
        let events = run_simulation_step(&mut state, 1, &config, &mut Fixed(Step::Right));
        assert_eq!(events.len(), 2);
        assert_eq!(state.pen.monsters.get(handle).unwrap().last_acted_at, 1);
    }

    #[test]
    fn test_move_wraps_at_both_edges() {
        let config = config();
        let (mut state, handle) =
            state_with(Monster::new(MonsterId(0), Species::Fuzzball, 0, 0));

        run_simulation_step(&mut state, 1_000, &config, &mut Fixed(Step::Left));
        assert_eq!(state.pen.monsters.get(handle).unwrap().position, 14);

        run_simulation_step(&mut state, 2_000, &config, &mut Fixed(Step::Right));
        assert_eq!(state.pen.monsters.get(handle).unwrap().position, 0);
    }

    #[test]
    fn test_hungry_monster_eats_treat_underfoot() {
        let config = config();
        let (mut state, handle) = state_with(
            Monster::new(MonsterId(0), Species::Fuzzball, 5, 0).with_hunger(2),
        );
        state.pen.treats[5] = true;

        let events = run_simulation_step(&mut state, 1_000, &config, &mut Fixed(Step::Left));

        let monster = state.pen.monsters.get(handle).unwrap();
        assert_eq!(monster.hunger, 1);
        assert_eq!(monster.position, 5, "eating replaces the move");
        assert!(!state.pen.treats[5]);
        assert_eq!(
            events,
            vec![PenEvent::Ate {
                id: MonsterId(0),
                position: 5,
                hunger: 1,
                at: 1_000
            }]
        );
    }

    #[test]
    fn test_sated_monster_walks_over_treat() {
        let config = config();
        let (mut state, handle) =
            state_with(Monster::new(MonsterId(0), Species::Fuzzball, 5, 0));
        state.pen.treats[5] = true;

        run_simulation_step(&mut state, 1_000, &config, &mut Fixed(Step::Right));

        assert!(state.pen.treats[5]);
        assert_eq!(state.pen.monsters.get(handle).unwrap().position, 6);
    }

    #[test]
    fn test_monster_at_threshold_dies_on_next_step() {
        let config = config();
        let (mut state, handle) = state_with(
            Monster::new(MonsterId(0), Species::Dragon, 5, 0).with_hunger(config.death_hunger),
        );

        let events = run_simulation_step(&mut state, 1, &config, &mut Fixed(Step::Right));

        let monster = state.pen.monsters.get(handle).unwrap();
        assert!(!monster.alive);
        assert_eq!(monster.died_at, Some(1));
        assert_eq!(events, vec![PenEvent::Died { id: MonsterId(0), at: 1 }]);
    }

    #[test]
    fn test_corpse_is_removed_strictly_after_decay() {
        let config = config();
        let mut monster = Monster::new(MonsterId(0), Species::Slime, 5, 0);
        monster.kill(1_000);
        let (mut state, handle) = state_with(monster);

        let boundary = 1_000 + config.decay_duration_ms;
        run_simulation_step(&mut state, boundary, &config, &mut Fixed(Step::Right));
        assert!(state.pen.monsters.contains(handle));
        assert_eq!(state.pen.monsters.get(handle).unwrap().position, 5, "corpses stay put");

        let events =
            run_simulation_step(&mut state, boundary + 1, &config, &mut Fixed(Step::Right));
        assert!(state.pen.monsters.is_empty());
        assert_eq!(
            events,
            vec![PenEvent::Removed {
                id: MonsterId(0),
                at: boundary + 1
            }]
        );
    }

    #[test]
    fn test_removal_mid_list_keeps_processing_successors() {
        let config = config();
        let mut state = SimulationState::new(&config);
        let mut corpse = Monster::new(MonsterId(1), Species::Slime, 5, 0);
        corpse.kill(0);
        state.pen.monsters.insert(Monster::new(MonsterId(0), Species::Fuzzball, 1, 0)).unwrap();
        state.pen.monsters.insert(corpse).unwrap();
        let last = state
            .pen
            .monsters
            .insert(Monster::new(MonsterId(2), Species::Fuzzball, 9, 0))
            .unwrap();

        let now = config.decay_duration_ms + 1;
        run_simulation_step(&mut state, now, &config, &mut Fixed(Step::Right));

        let ids: Vec<_> = state.pen.monsters.iter().map(|(_, m)| m.id.0).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(state.pen.monsters.get(last).unwrap().position, 10);
        assert!(state.pen.monsters.check_links().is_ok());
    }
}
