//! Match report and placement derivation
//!
//! Built from a concluded match for whatever stores leaderboards. Placement 1 is
//! the winner; everyone else ranks by reverse elimination order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::sim::{LogEvent, SimState};

/// One entrant's line in the final standings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub name: String,
    pub image: Option<String>,
    pub kills: u32,
    /// Rounded total damage dealt
    pub damage_dealt: u32,
    pub alive: bool,
    /// 1 = winner; None if never eliminated and not the winner
    pub placement: Option<u32>,
}

/// Summary handed to leaderboard construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub seed: Option<String>,
    pub ticks: u64,
    pub winner: Option<String>,
    pub count: usize,
    pub standings: Vec<Standing>,
}

impl MatchReport {
    pub fn from_state(state: &SimState) -> Self {
        let n = state.entities.len() as u32;

        let mut eliminated: Vec<(u64, u32)> = state
            .clock
            .log
            .iter()
            .filter_map(|e| match e {
                LogEvent::Eliminate { tick, id, .. } => Some((*tick, *id)),
                _ => None,
            })
            .collect();
        // Log is already tick-ordered; the stable sort keeps same-tick order
        eliminated.sort_by_key(|&(tick, _)| tick);

        let placement_of = |id: u32| -> Option<u32> {
            if state.clock.winner == Some(id) {
                return Some(1);
            }
            eliminated
                .iter()
                .position(|&(_, e)| e == id)
                .map(|idx| n.saturating_sub(idx as u32).max(2))
        };

        let mut standings: Vec<Standing> = state
            .entities
            .iter()
            .map(|e| Standing {
                name: e.name.clone(),
                image: e.image.clone(),
                kills: e.kills,
                damage_dealt: e.damage_dealt.round() as u32,
                alive: e.alive,
                placement: placement_of(e.id),
            })
            .collect();

        standings.sort_by(|a, b| {
            a.placement
                .unwrap_or(u32::MAX)
                .cmp(&b.placement.unwrap_or(u32::MAX))
                .then(b.kills.cmp(&a.kills))
                .then(b.damage_dealt.cmp(&a.damage_dealt))
                .then_with(|| a.name.cmp(&b.name))
        });

        // Same person entered twice keeps their best line
        let mut seen = HashSet::new();
        standings.retain(|s| seen.insert((s.name.clone(), s.image.clone())));

        Self {
            seed: state.rng.seed().map(str::to_string),
            ticks: state.clock.ticks,
            winner: state.winner().map(|w| w.name.clone()),
            count: state.entities.len(),
            standings,
        }
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Downloadable battle log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleLogExport {
    pub ticks: u64,
    pub winner: Option<String>,
    pub events: Vec<LogEvent>,
}

impl BattleLogExport {
    pub fn from_state(state: &SimState) -> Self {
        Self {
            ticks: state.clock.ticks,
            winner: state.winner().map(|w| w.name.clone()),
            events: state.clock.log.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimPhase, SimRng};

    fn finished_state() -> SimState {
        let mut state = SimState::new(SimRng::seeded("report"));
        for name in ["Ana", "Bo", "Cee", "Dee", "Ana"] {
            state.add_entity(name, None);
        }
        // Bo falls first, then Dee, then the second Ana; Cee wins
        let falls = [(10, 1, 2), (25, 3, 2), (40, 4, 2)];
        for (tick, id, by) in falls {
            state.entities[id as usize].alive = false;
            state.clock.log.push(LogEvent::Eliminate {
                tick,
                id,
                name: state.entities[id as usize].name.clone(),
                by_id: Some(by),
                by: Some("Cee".into()),
            });
        }
        state.entities[2].kills = 3;
        state.entities[0].damage_dealt = 12.4;
        state.clock.ticks = 55;
        state.clock.winner = Some(2);
        state.clock.phase = SimPhase::Concluded;
        state
    }

    #[test]
    fn test_placements_follow_elimination_order() {
        let report = MatchReport::from_state(&finished_state());
        assert_eq!(report.winner.as_deref(), Some("Cee"));
        assert_eq!(report.count, 5);
        assert_eq!(report.seed.as_deref(), Some("report"));

        let order: Vec<(&str, Option<u32>)> = report
            .standings
            .iter()
            .map(|s| (s.name.as_str(), s.placement))
            .collect();
        // Bo 5th, Dee 4th, second Ana 3rd; first Ana (still alive, unplaced)
        // is deduplicated away in favor of the placed entry
        assert_eq!(
            order,
            vec![("Cee", Some(1)), ("Ana", Some(3)), ("Dee", Some(4)), ("Bo", Some(5))]
        );
    }

    #[test]
    fn test_unplaced_sorted_by_kills_then_damage_then_name() {
        let mut state = SimState::new(SimRng::seeded("x"));
        for name in ["Zed", "Amy", "Max"] {
            state.add_entity(name, None);
        }
        state.entities[0].kills = 2;
        state.entities[1].damage_dealt = 30.0;
        state.entities[2].damage_dealt = 30.0;
        let report = MatchReport::from_state(&state);
        let names: Vec<&str> = report.standings.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Max"]);
        assert!(report.standings.iter().all(|s| s.placement.is_none()));
    }

    #[test]
    fn test_log_export_json() {
        let export = BattleLogExport::from_state(&finished_state());
        let json = export.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["winner"], "Cee");
        assert_eq!(value["events"].as_array().map(|a| a.len()), Some(3));
        assert_eq!(value["events"][0]["type"], "eliminate");
    }
}
