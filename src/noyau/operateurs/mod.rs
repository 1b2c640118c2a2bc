//! Registre des opérateurs
//!
//! Ensemble fermé : chaque opérateur expose ses mots-clés (insensibles à la casse),
//! son arité (éléments consommés) et son effet sur la pile.
//!
//! - math.rs : arithmétique, fonctions, trigo, constantes
//! - pile.rs : contrôle de pile, modes, variables, options, eval, convert
//!
//! undo / redo passent directement par l’historique de la calculatrice.

mod math;
mod pile;

use super::calculatrice::Calculatrice;
use super::erreur::Resultat;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operateur {
    // binaires
    Ajouter,
    Soustraire,
    Multiplier,
    Diviser,
    Puissance,
    RacineN,
    Modulo,
    Atan2,
    Log,

    // unaires
    Racine,
    Ln,
    Log10,
    Log2,
    Negation,
    Inverse,

    // trigo
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    DegVersRad,
    RadVersDeg,

    // constantes
    Pi,
    E,

    // modes
    Degres,
    Radians,
    Hex,
    Dec,
    Oct,
    Bin,

    // pile
    Dup,
    Swap,
    Drop,
    Effacer,

    // variables, options, compilateur, unités
    Stocker,
    Set,
    Get,
    Eval,
    Convertir,

    // historique
    Annuler,
    Retablir,
}

use Operateur::*;

pub const TOUS: [Operateur; 42] = [
    Ajouter, Soustraire, Multiplier, Diviser, Puissance, RacineN, Modulo, Atan2, Log,
    Racine, Ln, Log10, Log2, Negation, Inverse,
    Sin, Cos, Tan, Asin, Acos, Atan, DegVersRad, RadVersDeg,
    Pi, E,
    Degres, Radians, Hex, Dec, Oct, Bin,
    Dup, Swap, Drop, Effacer,
    Stocker, Set, Get, Eval, Convertir,
    Annuler, Retablir,
];

impl Operateur {
    pub fn mots_cles(self) -> &'static [&'static str] {
        match self {
            Ajouter => &["add", "plus", "+"],
            Soustraire => &["minus", "subtract", "sub", "-"],
            Multiplier => &["multiply", "mul", "times", "*"],
            Diviser => &["divide", "div", "divideby", "/"],
            Puissance => &["pow", "power", "^"],
            RacineN => &["nroot"],
            Modulo => &["mod", "%"],
            Atan2 => &["atan2"],
            Log => &["log"],

            Racine => &["sqrt", "squareroot"],
            Ln => &["ln"],
            Log10 => &["log10"],
            Log2 => &["log2"],
            Negation => &["neg", "negate"],
            Inverse => &["inv", "inverse"],

            Sin => &["sin", "sine"],
            Cos => &["cos", "cosine"],
            Tan => &["tan", "tangent"],
            Asin => &["asin", "asine"],
            Acos => &["acos", "acosine"],
            Atan => &["atan", "atangent"],
            DegVersRad => &["deg2rad"],
            RadVersDeg => &["rad2deg"],

            Pi => &["pi"],
            E => &["e"],

            Degres => &["deg", "degrees"],
            Radians => &["rad", "radians"],
            Hex => &["hex"],
            Dec => &["dec"],
            Oct => &["oct"],
            Bin => &["bin"],

            Dup => &["dup"],
            Swap => &["swap"],
            Drop => &["drop"],
            Effacer => &["clr", "clear"],

            Stocker => &["store", "sto"],
            Set => &["set"],
            Get => &["get"],
            Eval => &["eval"],
            Convertir => &["convert"],

            Annuler => &["undo"],
            Retablir => &["redo"],
        }
    }

    pub fn correspond(self, jeton: &str) -> bool {
        let j = jeton.trim().to_lowercase();
        self.mots_cles().iter().any(|m| *m == j)
    }

    pub fn trouve(jeton: &str) -> Option<Operateur> {
        let j = jeton.trim().to_lowercase();
        TOUS.into_iter()
            .find(|op| op.mots_cles().iter().any(|m| *m == j))
    }

    /// Nombre d’éléments consommés (vérifié par le compilateur sur les appels).
    pub fn arite(self) -> usize {
        match self {
            Ajouter | Soustraire | Multiplier | Diviser | Puissance | RacineN | Modulo
            | Atan2 | Log | Swap | Stocker | Set | Convertir => 2,

            Racine | Ln | Log10 | Log2 | Negation | Inverse | Sin | Cos | Tan | Asin | Acos
            | Atan | DegVersRad | RadVersDeg | Dup | Drop | Get | Eval => 1,

            Pi | E | Degres | Radians | Hex | Dec | Oct | Bin | Effacer | Annuler
            | Retablir => 0,
        }
    }

    /// Tout-ou-rien : en cas d’erreur, la calculatrice n’a pas changé.
    pub fn execute(self, calc: &mut Calculatrice) -> Resultat<()> {
        match self {
            Ajouter | Soustraire | Multiplier | Diviser | Puissance | RacineN | Modulo
            | Atan2 | Log => math::binaire(self, calc),

            Racine | Ln | Log10 | Log2 | Negation | Inverse | Sin | Cos | Tan | Asin | Acos
            | Atan | DegVersRad | RadVersDeg => math::unaire(self, calc),

            Pi | E => math::constante(self, calc),

            Degres | Radians | Hex | Dec | Oct | Bin => pile::mode(self, calc),

            Dup => pile::dup(calc),
            Swap => pile::swap(calc),
            Drop => pile::drop(calc),
            Effacer => pile::effacer(calc),

            Stocker => pile::stocker(calc),
            Set => pile::set(calc),
            Get => pile::get(calc),
            Eval => pile::eval(calc),
            Convertir => pile::convertir(calc),

            Annuler => calc.undo(),
            Retablir => calc.redo(),
        }
    }
}

/// Union des mots-clés (ordre du registre, sans doublon).
pub fn mots_cles_tous() -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for op in TOUS {
        for m in op.mots_cles() {
            if !out.contains(m) {
                out.push(m);
            }
        }
    }
    out
}
