//! Closed key universes for fixed-key tables

use core::fmt;

/// A small, enumerable set of keys known ahead of time.
pub trait KeySet: Copy + Sized + 'static {
    /// Every member of the set, in declaration order
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == key)
    }
}

/// Statistics tracked for every player.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PlayerStat {
    Goals,
    Assists,
    Tackles,
    Interceptions,
    StarSkill,
    WeakFootAbility,
    Weight,
    Height,
    GamesPlayed,
}

impl KeySet for PlayerStat {
    const ALL: &'static [Self] = &[
        PlayerStat::Goals,
        PlayerStat::Assists,
        PlayerStat::Tackles,
        PlayerStat::Interceptions,
        PlayerStat::StarSkill,
        PlayerStat::WeakFootAbility,
        PlayerStat::Weight,
        PlayerStat::Height,
        PlayerStat::GamesPlayed,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            PlayerStat::Goals => "Goals",
            PlayerStat::Assists => "Assists",
            PlayerStat::Tackles => "Tackles",
            PlayerStat::Interceptions => "Interceptions",
            PlayerStat::StarSkill => "Star Skill",
            PlayerStat::WeakFootAbility => "Weak Foot Ability",
            PlayerStat::Weight => "Weight",
            PlayerStat::Height => "Height",
            PlayerStat::GamesPlayed => "Games Played",
        }
    }
}

impl fmt::Display for PlayerStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_every_stat() {
        for stat in PlayerStat::ALL {
            assert_eq!(PlayerStat::parse(stat.as_str()), Some(*stat));
        }
    }

    #[test]
    fn parse_is_exact() {
        assert_eq!(PlayerStat::parse("goals"), None);
        assert_eq!(PlayerStat::parse("Goals "), None);
        assert_eq!(PlayerStat::parse(""), None);
        assert_eq!(PlayerStat::parse("Points"), None);
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = PlayerStat::ALL.iter().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PlayerStat::ALL.len());
    }
}
