//! Team configuration: which team plays where and its color

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use tracing::{error, info};

use crate::color::Color;
use crate::persistence::Persistence;
use crate::types::ScreenSide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamType {
    #[default]
    Home,
    Away,
    Extra,
}

impl TeamType {
    /// Color a team of this type gets until the operator picks one
    pub fn default_color(&self) -> Color {
        match self {
            TeamType::Home => Color::BLUE,
            TeamType::Away => Color::RED,
            TeamType::Extra => Color::GREEN,
        }
    }
}

impl fmt::Display for TeamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TeamType::Home => "Home",
            TeamType::Away => "Away",
            TeamType::Extra => "Extra",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for TeamType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(TeamType::Home),
            "away" => Ok(TeamType::Away),
            "extra" => Ok(TeamType::Extra),
            other => Err(anyhow::anyhow!("Unknown team type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub team_type: TeamType,
    pub team_color: Color,
}

impl TeamInfo {
    fn with_defaults(team_type: TeamType) -> Self {
        Self {
            team_type,
            team_color: team_type.default_color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamConfigState {
    pub teams: Vec<TeamInfo>,
}

/// Owner of the team list
///
/// The first entry is always the home team and the second the away team;
/// anything after that is an extra team.
pub struct TeamConfig {
    state: TeamConfigState,
    persistence: Rc<dyn Persistence>,
}

impl TeamConfig {
    pub fn new(persistence: Rc<dyn Persistence>) -> Self {
        let state = persistence.load_teams();
        let mut config = Self { state, persistence };
        if config.ensure_defaults() {
            info!("Applied default team configuration");
            config.save_settings();
        }
        config
    }

    /// Force slots 0 and 1 to home and away; true if anything changed
    fn ensure_defaults(&mut self) -> bool {
        let mut updated = false;
        for (index, team_type) in [(0, TeamType::Home), (1, TeamType::Away)] {
            match self.state.teams.get_mut(index) {
                None => {
                    self.state.teams.push(TeamInfo::with_defaults(team_type));
                    updated = true;
                }
                Some(team) if team.team_type != team_type => {
                    *team = TeamInfo::with_defaults(team_type);
                    updated = true;
                }
                Some(_) => {}
            }
        }
        updated
    }

    /// Team indices for each of home, away and extra set on `side`, in that order
    pub fn indices_for_side(&self, side: &ScreenSide) -> Vec<usize> {
        let mut indices = Vec::new();
        if side.home {
            indices.push(self.index_for_team(TeamType::Home));
        }
        if side.away {
            indices.push(self.index_for_team(TeamType::Away));
        }
        if side.extra {
            indices.push(self.index_for_team(TeamType::Extra));
        }
        indices
    }

    /// First team of `team_type`, falling back to the home slot
    pub fn index_for_team(&self, team_type: TeamType) -> usize {
        self.state
            .teams
            .iter()
            .position(|t| t.team_type == team_type)
            .unwrap_or(0)
    }

    /// Index of the first team of `team_type`, appending one with default
    /// color if there is none
    pub fn find_or_add_team(&mut self, team_type: TeamType) -> usize {
        if let Some(index) = self.state.teams.iter().position(|t| t.team_type == team_type) {
            return index;
        }
        info!(team = %team_type, "Adding team");
        self.state.teams.push(TeamInfo::with_defaults(team_type));
        self.state.teams.len() - 1
    }

    pub fn team_color(&self, index: usize) -> Color {
        self.team_info(index).team_color
    }

    pub fn team_color_for_side(&self, side: &ScreenSide) -> Vec<Color> {
        self.indices_for_side(side)
            .into_iter()
            .map(|index| self.team_color(index))
            .collect()
    }

    pub fn team_name(&self, index: usize) -> String {
        self.team_info(index).team_type.to_string()
    }

    pub fn set_color(&mut self, index: usize, color: Color) {
        self.check_index(index);
        self.state.teams[index].team_color = color;
    }

    pub fn team_info(&self, index: usize) -> TeamInfo {
        self.check_index(index);
        self.state.teams[index].clone()
    }

    pub fn number_of_teams(&self) -> usize {
        self.state.teams.len()
    }

    pub fn save_settings(&self) {
        if let Err(e) = self.persistence.save_teams(&self.state) {
            error!(error = ?e, "Failed to save team configuration");
        }
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.state.teams.len(),
            "team index {} out of range (have {} teams)",
            index,
            self.state.teams.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::testing::MemoryPersistence;

    #[test]
    fn test_defaults_applied_and_saved() {
        let persistence = Rc::new(MemoryPersistence::default());
        let config = TeamConfig::new(persistence.clone());

        assert_eq!(config.number_of_teams(), 2);
        assert_eq!(config.team_info(0).team_type, TeamType::Home);
        assert_eq!(config.team_color(0), Color::BLUE);
        assert_eq!(config.team_info(1).team_type, TeamType::Away);
        assert_eq!(config.team_color(1), Color::RED);
        assert_eq!(persistence.team_saves.get(), 1);
        assert_eq!(persistence.teams.borrow().teams.len(), 2);
    }

    #[test]
    fn test_valid_config_is_not_resaved() {
        let persistence = Rc::new(MemoryPersistence::default());
        *persistence.teams.borrow_mut() = TeamConfigState {
            teams: vec![
                TeamInfo { team_type: TeamType::Home, team_color: Color::new(10, 20, 30) },
                TeamInfo { team_type: TeamType::Away, team_color: Color::WHITE },
                TeamInfo::with_defaults(TeamType::Extra),
            ],
        };
        let config = TeamConfig::new(persistence.clone());

        assert_eq!(persistence.team_saves.get(), 0);
        assert_eq!(config.team_color(0), Color::new(10, 20, 30));
        assert_eq!(config.team_color(2), Color::GREEN);
        assert_eq!(config.team_name(2), "Extra");
    }

    #[test]
    fn test_wrong_order_is_repaired() {
        let persistence = Rc::new(MemoryPersistence::default());
        *persistence.teams.borrow_mut() = TeamConfigState {
            teams: vec![TeamInfo { team_type: TeamType::Away, team_color: Color::WHITE }],
        };
        let config = TeamConfig::new(persistence.clone());

        assert_eq!(config.team_info(0), TeamInfo::with_defaults(TeamType::Home));
        assert_eq!(config.team_info(1), TeamInfo::with_defaults(TeamType::Away));
        assert_eq!(persistence.team_saves.get(), 1);
    }

    #[test]
    fn test_indices_and_colors_for_side() {
        let persistence = Rc::new(MemoryPersistence::default());
        let config = TeamConfig::new(persistence);

        assert_eq!(config.indices_for_side(&ScreenSide::away_side()), vec![1]);
        assert_eq!(
            config.team_color_for_side(&ScreenSide::all_side()),
            // No extra team configured: falls back to the home slot
            vec![Color::BLUE, Color::RED, Color::BLUE]
        );
        assert!(config.indices_for_side(&ScreenSide::control_side()).is_empty());
    }

    #[test]
    fn test_set_color_requires_save() {
        let persistence = Rc::new(MemoryPersistence::default());
        let mut config = TeamConfig::new(persistence.clone());
        config.set_color(1, Color::GREEN);

        assert_eq!(config.team_color(1), Color::GREEN);
        assert_eq!(persistence.teams.borrow().teams[1].team_color, Color::RED);
        config.save_settings();
        assert_eq!(persistence.teams.borrow().teams[1].team_color, Color::GREEN);
    }

    #[test]
    fn test_find_or_add_team() {
        let persistence = Rc::new(MemoryPersistence::default());
        let mut config = TeamConfig::new(persistence);

        assert_eq!(config.find_or_add_team(TeamType::Away), 1);
        assert_eq!(config.find_or_add_team(TeamType::Extra), 2);
        assert_eq!(config.find_or_add_team(TeamType::Extra), 2);
        assert_eq!(config.number_of_teams(), 3);
        assert_eq!(config.team_color_for_side(&ScreenSide::extra_side()), vec![Color::GREEN]);
    }

    #[test]
    fn test_parse_team_type() {
        assert_eq!("Away".parse::<TeamType>().unwrap(), TeamType::Away);
        assert!("visitors".parse::<TeamType>().is_err());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_team_info_out_of_range_panics() {
        let config = TeamConfig::new(Rc::new(MemoryPersistence::default()));
        config.team_info(5);
    }
}
