//! Noyau de la calculatrice RPN
//!
//! Organisation interne :
//! - erreur.rs       : Erreur (typée) + Resultat
//! - unites.rs       : registre des unités, algèbre des produits d’unités
//! - precision.rs    : noyau décimal (entiers mis à l’échelle) : √, exp, ln, trigo, π
//! - format.rs       : rendu des magnitudes (base, groupement, exposant)
//! - valeur.rs       : valeur numérique (magnitude exacte + unités), lecture du texte
//! - options.rs      : base, mode d’angle, groupement des chiffres
//! - element.rs      : élément de pile (numérique | expression)
//! - sauvegarde.rs   : instantané JSON (pile + variables + options)
//! - historique.rs   : annuler / rétablir (instantanés bornés)
//! - calculatrice.rs : état + dispatch de push
//! - operateurs/     : registre fermé des opérateurs
//! - jetons.rs       : tokenisation infixe
//! - rpn.rs          : shunting-yard + construction Noeud
//! - expr.rs         : Noeud + rejeu postfixe
//! - eval.rs         : programme compilé (segments ';') sur contexte enfant
//! - graphe.rs       : échantillonnage en x pour le tracé

pub mod calculatrice;
pub mod element;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod format;
pub mod graphe;
pub mod historique;
pub mod jetons;
pub mod operateurs;
pub mod options;
pub mod precision;
pub mod rpn;
pub mod sauvegarde;
pub mod unites;
pub mod valeur;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use calculatrice::Calculatrice;
pub use element::ElementPile;
pub use erreur::{Erreur, Resultat};
pub use eval::execute;
pub use options::{Base, ModeAngle, Options};
pub use sauvegarde::ConfigSauvegarde;
pub use valeur::Valeur;
