// src/noyau/element.rs
//
// Élément de pile : valeur numérique OU expression littérale (texte sans les quotes).
// Les deux variantes se sauvegardent sous la forme {type, args}.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use super::erreur::{Erreur, Resultat};
use super::options::Options;
use super::unites::Unites;
use super::valeur::{lire_magnitude_exacte, Valeur};

pub const TYPE_NUMERIQUE: &str = "NumericStackItem";
pub const TYPE_EXPRESSION: &str = "ExpressionStackItem";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementPile {
    Numerique(Valeur),
    Expression(String),
}

/// Forme sauvegardée d’un élément.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementSauve {
    #[serde(rename = "type")]
    pub genre: String,
    pub args: Vec<Json>,
}

impl ElementPile {
    /// 'texte' => Expression(texte) ; None si le jeton n’est pas entre quotes
    /// ou si le texte contient lui-même une quote.
    pub fn depuis_quotes(jeton: &str) -> Option<Self> {
        let t = jeton.strip_prefix('\'')?.strip_suffix('\'')?;
        if t.contains('\'') {
            return None;
        }
        Some(ElementPile::Expression(t.to_string()))
    }

    pub fn expression(&self) -> Option<&str> {
        match self {
            ElementPile::Expression(t) => Some(t),
            ElementPile::Numerique(_) => None,
        }
    }

    pub fn rendu(&self, options: &Options) -> String {
        match self {
            ElementPile::Numerique(v) => v.rendu(options.base, options.digit_grouping),
            ElementPile::Expression(t) => format!("'{t}'"),
        }
    }

    pub fn vers_sauve(&self) -> ElementSauve {
        match self {
            ElementPile::Numerique(v) => ElementSauve {
                genre: TYPE_NUMERIQUE.to_string(),
                args: vec![
                    Json::String(v.magnitude_exacte()),
                    if v.a_des_unites() {
                        Json::String(v.unites.to_string())
                    } else {
                        Json::Null
                    },
                ],
            },
            ElementPile::Expression(t) => ElementSauve {
                genre: TYPE_EXPRESSION.to_string(),
                args: vec![Json::String(t.clone())],
            },
        }
    }

    pub fn depuis_sauve(s: &ElementSauve) -> Resultat<Self> {
        match s.genre.as_str() {
            TYPE_NUMERIQUE => {
                let magnitude = match s.args.first() {
                    Some(Json::String(t)) => lire_magnitude_exacte(t)?,
                    // nombre JSON brut (sauvegarde écrite à la main)
                    Some(Json::Number(n)) => lire_magnitude_exacte(&n.to_string())?,
                    _ => return Err(Erreur::parse("élément numérique sans magnitude")),
                };
                let unites = match s.args.get(1) {
                    None | Some(Json::Null) => Unites::aucune(),
                    Some(Json::String(u)) if u.is_empty() => Unites::aucune(),
                    Some(Json::String(u)) => Unites::parse(u)?,
                    Some(_) => return Err(Erreur::parse("unité sauvegardée invalide")),
                };
                Ok(ElementPile::Numerique(Valeur::avec_unites(magnitude, unites)))
            }
            TYPE_EXPRESSION => match s.args.first() {
                Some(Json::String(t)) if !t.contains('\'') => {
                    Ok(ElementPile::Expression(t.clone()))
                }
                Some(Json::String(_)) => Err(Erreur::parse("quote dans une expression")),
                _ => Err(Erreur::parse("élément expression sans texte")),
            },
            autre => Err(Erreur::parse(format!("type d’élément inconnu: '{autre}'"))),
        }
    }
}

impl From<Valeur> for ElementPile {
    fn from(v: Valeur) -> Self {
        ElementPile::Numerique(v)
    }
}
