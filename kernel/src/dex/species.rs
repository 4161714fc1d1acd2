//! Species records: learnsets, lineage, breeding data.

use serde::{Deserialize, Serialize};

use crate::dex::ids::{AbilityId, BreedingCategory, Era, SpeciesId, TypeTag};
use crate::dex::machines::MachineSet;

/// One level-up entry: the ability is learned on reaching `level`.
///
/// Serialized as a `[level, ability]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u8, AbilityId)", into = "(u8, AbilityId)")]
pub struct LevelMove {
    pub level: u8,
    pub ability: AbilityId,
}

impl From<(u8, AbilityId)> for LevelMove {
    fn from((level, ability): (u8, AbilityId)) -> Self {
        Self { level, ability }
    }
}

impl From<LevelMove> for (u8, AbilityId) {
    fn from(m: LevelMove) -> Self {
        (m.level, m.ability)
    }
}

/// A level-up list, ordered by level ascending.
///
/// Order is established by [`Learnset::normalize`] when the data set is
/// built; [`Learnset::up_to`] relies on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Learnset(Vec<LevelMove>);

impl Learnset {
    #[must_use]
    pub fn new(entries: Vec<LevelMove>) -> Self {
        let mut set = Self(entries);
        set.normalize();
        set
    }

    /// Stable sort by level.
    pub fn normalize(&mut self) {
        self.0.sort_by_key(|m| m.level);
    }

    /// Abilities learned at or below `level`.
    pub fn up_to(&self, level: u8) -> impl Iterator<Item = AbilityId> + '_ {
        self.0
            .iter()
            .take_while(move |m| m.level <= level)
            .map(|m| m.ability)
    }

    /// Whether `ability` is learned at or below `level`.
    #[must_use]
    pub fn learns_by(&self, ability: AbilityId, level: u8) -> bool {
        self.up_to(level).any(|a| a == ability)
    }

    /// Whether `ability` appears anywhere in the list.
    #[must_use]
    pub fn contains(&self, ability: AbilityId) -> bool {
        self.0.iter().any(|m| m.ability == ability)
    }

    pub fn entries(&self) -> &[LevelMove] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What it takes for a predecessor to evolve into this species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvolutionTrigger {
    /// Level-up at or above `level`.
    Level { level: u8 },
    /// Level-up with high friendship.
    Friendship,
    Trade,
    Item,
    Other,
}

/// Earliest level a friendship evolution can happen: hatch at 5, then one level-up.
pub const FRIENDSHIP_EVOLUTION_LEVEL: u8 = 6;

impl EvolutionTrigger {
    /// Minimum level at which the evolved form can exist.
    ///
    /// Triggers without a level-up report 1.
    #[must_use]
    pub fn required_level(self) -> u8 {
        match self {
            Self::Level { level } => level,
            Self::Friendship => FRIENDSHIP_EVOLUTION_LEVEL,
            Self::Trade | Self::Item | Self::Other => 1,
        }
    }

    /// Whether the evolution happens during a level-up.
    #[must_use]
    pub fn requires_level_up(self) -> bool {
        self.required_level() > 1
    }
}

/// Link from an evolved species back to its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evolution {
    pub from: SpeciesId,
    pub trigger: EvolutionTrigger,
}

/// Gender ratio as the female share in sixteenths; `None` is genderless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenderRatio(pub Option<u8>);

impl GenderRatio {
    pub const GENDERLESS: Self = Self(None);
    pub const ALL_FEMALE: Self = Self(Some(16));
    pub const EVEN: Self = Self(Some(8));

    /// Whether a male individual can exist.
    #[must_use]
    pub fn male_possible(self) -> bool {
        self.0.is_some_and(|female| female < 16)
    }
}

/// One of the six base stats, or their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    Total,
}

impl Stat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hp => "hp",
            Self::Attack => "attack",
            Self::Defense => "defense",
            Self::SpAttack => "sp_attack",
            Self::SpDefense => "sp_defense",
            Self::Speed => "speed",
            Self::Total => "total",
        }
    }
}

/// Base stats, serialized as `[hp, attack, defense, sp_attack, sp_defense, speed]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 6]", into = "[u8; 6]")]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    #[must_use]
    pub fn total(self) -> u16 {
        [self.hp, self.attack, self.defense, self.sp_attack, self.sp_defense, self.speed]
            .into_iter()
            .map(u16::from)
            .sum()
    }

    #[must_use]
    pub fn get(self, stat: Stat) -> u16 {
        match stat {
            Stat::Hp => self.hp.into(),
            Stat::Attack => self.attack.into(),
            Stat::Defense => self.defense.into(),
            Stat::SpAttack => self.sp_attack.into(),
            Stat::SpDefense => self.sp_defense.into(),
            Stat::Speed => self.speed.into(),
            Stat::Total => self.total(),
        }
    }
}

impl From<[u8; 6]> for BaseStats {
    fn from([hp, attack, defense, sp_attack, sp_defense, speed]: [u8; 6]) -> Self {
        Self {
            hp,
            attack,
            defense,
            sp_attack,
            sp_defense,
            speed,
        }
    }
}

impl From<BaseStats> for [u8; 6] {
    fn from(s: BaseStats) -> Self {
        [s.hp, s.attack, s.defense, s.sp_attack, s.sp_defense, s.speed]
    }
}

/// Immutable reference record for one species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub id: SpeciesId,
    pub name: String,
    pub types: [TypeTag; 2],
    #[serde(default)]
    pub base_stats: BaseStats,
    #[serde(default)]
    pub breeding: Vec<BreedingCategory>,
    #[serde(default)]
    pub evolves_from: Option<Evolution>,
    #[serde(default)]
    pub learnset: Learnset,
    #[serde(default)]
    pub legacy_learnset: Learnset,
    /// Extra level-up list honored only by one historical ruleset.
    #[serde(default)]
    pub supplemental_learnset: Option<Learnset>,
    #[serde(default)]
    pub machines: MachineSet,
    #[serde(default)]
    pub legacy_machines: MachineSet,
    /// Abilities obtainable only by inheritance through breeding.
    #[serde(default)]
    pub breeding_only: Vec<AbilityId>,
    #[serde(default)]
    pub gender: GenderRatio,
    /// Whether the species exists in the legacy era.
    #[serde(default)]
    pub legacy: bool,
}

impl SpeciesRecord {
    /// The level-up list for an era.
    #[must_use]
    pub fn learnset_for(&self, era: Era) -> &Learnset {
        match era {
            Era::Current => &self.learnset,
            Era::Legacy => &self.legacy_learnset,
        }
    }

    /// The machine compatibility set for an era.
    #[must_use]
    pub fn machines_for(&self, era: Era) -> &MachineSet {
        match era {
            Era::Current => &self.machines,
            Era::Legacy => &self.legacy_machines,
        }
    }

    /// Whether the species has the given type tag in either slot.
    #[must_use]
    pub fn has_type(&self, tag: TypeTag) -> bool {
        self.types.contains(&tag)
    }

    /// Whether `category` appears in the species' own category list.
    #[must_use]
    pub fn in_category(&self, category: BreedingCategory) -> bool {
        self.breeding.contains(&category)
    }

    /// Whether the species is flagged as a juvenile that cannot breed itself.
    #[must_use]
    pub fn is_juvenile(&self) -> bool {
        self.breeding.first() == Some(&BreedingCategory::UNDISCOVERED)
    }

    /// Normalize learnset ordering in place.
    pub(crate) fn normalize(&mut self) {
        self.learnset.normalize();
        self.legacy_learnset.normalize();
        if let Some(extra) = self.supplemental_learnset.as_mut() {
            extra.normalize();
        }
    }

    /// Every ability id the record refers to, with the field it came from.
    pub(crate) fn referenced_abilities(&self) -> impl Iterator<Item = (&'static str, AbilityId)> + '_ {
        let learnset = self.learnset.entries().iter().map(|m| ("learnset", m.ability));
        let legacy = self
            .legacy_learnset
            .entries()
            .iter()
            .map(|m| ("legacy_learnset", m.ability));
        let extra = self
            .supplemental_learnset
            .iter()
            .flat_map(|l| l.entries().iter())
            .map(|m| ("supplemental_learnset", m.ability));
        let bred = self.breeding_only.iter().map(|&a| ("breeding_only", a));
        learnset.chain(legacy).chain(extra).chain(bred)
    }
}
