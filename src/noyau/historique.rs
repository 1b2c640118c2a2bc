// src/noyau/historique.rs
//
// Annuler / rétablir
// ------------------
// - chaque push réussi dépose l’état d’avant dans `passe`
// - annuler : l’état courant part dans `futur`, on revient au dernier de `passe`
// - rétablir : l’inverse
// - un nouveau push vide `futur`
// - `passe` est borné : les plus anciens états sont oubliés

use std::collections::{BTreeMap, VecDeque};

use super::element::ElementPile;
use super::options::Options;

/// nombre maximal d’états annulables
pub const HISTORIQUE_MAX: usize = 256;

/// Copie complète de ce qu’un push peut modifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instantane {
    pub pile: Vec<ElementPile>,
    pub variables: BTreeMap<String, ElementPile>,
    pub options: Options,
}

#[derive(Clone, Debug, Default)]
pub struct Historique {
    passe: VecDeque<Instantane>,
    futur: Vec<Instantane>,
}

impl Historique {
    pub fn enregistre(&mut self, avant: Instantane) {
        if self.passe.len() == HISTORIQUE_MAX {
            self.passe.pop_front();
        }
        self.passe.push_back(avant);
        self.futur.clear();
    }

    /// État à restaurer ; `courant` est gardé pour rétablir.
    pub fn annule(&mut self, courant: Instantane) -> Option<Instantane> {
        let precedent = self.passe.pop_back()?;
        self.futur.push(courant);
        Some(precedent)
    }

    pub fn retablit(&mut self, courant: Instantane) -> Option<Instantane> {
        let suivant = self.futur.pop()?;
        self.passe.push_back(courant);
        Some(suivant)
    }

    pub fn annulables(&self) -> usize {
        self.passe.len()
    }

    pub fn retablissables(&self) -> usize {
        self.futur.len()
    }
}
