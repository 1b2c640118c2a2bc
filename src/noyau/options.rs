//! Options de la calculatrice (base d’affichage, mode d’angle, groupement des chiffres).
//!
//! Seules les options connues existent : `setOption` sur un nom inconnu échoue
//! (`InvalidOption`), `getOption` sur un nom inconnu échoue (`OptionNotFound`).

use serde::{Deserialize, Serialize};

use super::erreur::{Erreur, Resultat};

pub const OPTION_BASE: &str = "base";
pub const OPTION_ANGLE_MODE: &str = "angleMode";
pub const OPTION_DIGIT_GROUPING: &str = "digitGrouping";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModeAngle {
    #[default]
    Degrees,
    Radians,
}

impl ModeAngle {
    pub fn nom(self) -> &'static str {
        match self {
            ModeAngle::Degrees => "degrees",
            ModeAngle::Radians => "radians",
        }
    }

    /// "degrees"/"deg"/"0" ou "radians"/"rad"/"1".
    pub fn depuis_texte(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "degrees" | "deg" | "0" => Some(ModeAngle::Degrees),
            "radians" | "rad" | "1" => Some(ModeAngle::Radians),
            _ => None,
        }
    }
}

/// Base d’affichage : 2, 8, 10 ou 16 uniquement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Base(u32);

impl Base {
    pub const BIN: Base = Base(2);
    pub const OCT: Base = Base(8);
    pub const DEC: Base = Base(10);
    pub const HEX: Base = Base(16);

    pub fn valeur(self) -> u32 {
        self.0
    }
}

impl Default for Base {
    fn default() -> Self {
        Base::DEC
    }
}

impl TryFrom<u32> for Base {
    type Error = Erreur;

    fn try_from(b: u32) -> Resultat<Self> {
        match b {
            2 | 8 | 10 | 16 => Ok(Base(b)),
            _ => Err(Erreur::InvalidOption(format!("base invalide: {b}"))),
        }
    }
}

impl From<Base> for u32 {
    fn from(b: Base) -> u32 {
        b.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    pub base: Base,
    pub angle_mode: ModeAngle,
    pub digit_grouping: bool,
}
