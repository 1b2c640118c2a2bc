// src/noyau/sauvegarde.rs
//
// Instantané sérialisable de la calculatrice : {stack, variables, options}.
// Le noyau ne touche jamais au disque ; l’appelant stocke le JSON où il veut.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::element::ElementSauve;
use super::erreur::{Erreur, Resultat};
use super::options::Options;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSauvegarde {
    /// du fond vers le sommet
    pub stack: Vec<ElementSauve>,
    pub variables: BTreeMap<String, ElementSauve>,
    pub options: Options,
}

impl ConfigSauvegarde {
    pub fn vers_json(&self) -> Resultat<String> {
        serde_json::to_string(self).map_err(|e| Erreur::parse(e.to_string()))
    }

    pub fn depuis_json(texte: &str) -> Resultat<Self> {
        serde_json::from_str(texte).map_err(|e| Erreur::parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::options::{Base, ModeAngle};

    #[test]
    fn json_minimal_accepte() {
        let c = ConfigSauvegarde::depuis_json("{}").unwrap();
        assert_eq!(c, ConfigSauvegarde::default());
    }

    #[test]
    fn json_complet() {
        let texte = r#"{
            "stack": [{"type": "NumericStackItem", "args": ["1/3", null]}],
            "variables": {"r": {"type": "ExpressionStackItem", "args": ["2*x"]}},
            "options": {"base": 8, "angleMode": "radians", "digitGrouping": true}
        }"#;
        let c = ConfigSauvegarde::depuis_json(texte).unwrap();
        assert_eq!(c.stack.len(), 1);
        assert_eq!(c.variables["r"].genre, "ExpressionStackItem");
        assert_eq!(c.options.base, Base::OCT);
        assert_eq!(c.options.angle_mode, ModeAngle::Radians);

        let relu = ConfigSauvegarde::depuis_json(&c.vers_json().unwrap()).unwrap();
        assert_eq!(relu, c);
    }

    #[test]
    fn json_invalide() {
        assert!(matches!(
            ConfigSauvegarde::depuis_json("[1, 2"),
            Err(Erreur::ParseError(_))
        ));
        assert!(ConfigSauvegarde::depuis_json(r#"{"options": {"base": 3}}"#).is_err());
    }
}
