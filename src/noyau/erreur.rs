//! Erreurs du noyau.
//!
//! Toutes les erreurs sont locales et récupérables : une opération qui échoue
//! laisse la calculatrice exactement dans l’état où elle était avant l’appel.

use thiserror::Error;

pub type Resultat<T> = Result<T, Erreur>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Erreur {
    #[error("pas assez d’éléments sur la pile (requis: {requis}, présents: {presents})")]
    StackUnderflow { requis: usize, presents: usize },

    #[error("division par zéro")]
    DivideByZero,

    #[error("unités incompatibles: '{0}' et '{1}'")]
    IncompatibleUnits(String, String),

    #[error("unité inconnue: '{0}'")]
    InvalidUnit(String),

    #[error("opérande invalide: {0}")]
    InvalidOperand(String),

    #[error("impossible d’écraser l’opérateur '{0}'")]
    NameCollision(String),

    #[error("option invalide: {0}")]
    InvalidOption(String),

    #[error("option introuvable: '{0}'")]
    OptionNotFound(String),

    #[error("erreur de lecture: {0}")]
    ParseError(String),

    #[error("hors domaine: {0}")]
    Domain(String),

    #[error("rien à annuler")]
    NothingToUndo,

    #[error("rien à rétablir")]
    NothingToRedo,
}

impl Erreur {
    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        Erreur::ParseError(msg.into())
    }

    pub(crate) fn operande(msg: impl Into<String>) -> Self {
        Erreur::InvalidOperand(msg.into())
    }

    pub(crate) fn domaine(msg: impl Into<String>) -> Self {
        Erreur::Domain(msg.into())
    }
}
