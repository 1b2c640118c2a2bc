//! Noyau : évaluation d’expressions infixes
//!
//! tokenize -> découpe ';' -> RPN -> Noeud -> rejeu sur un contexte enfant -> pile enfant
//!
//! Le contexte enfant copie options et variables (pile vide) : rien ne remonte
//! vers l’appelant, sauf les éléments renvoyés.

use tracing::{debug, trace};

use super::calculatrice::Calculatrice;
use super::element::ElementPile;
use super::erreur::{Erreur, Resultat};
use super::expr::Noeud;
use super::jetons::{format_tokens, tokenize, Tok};
use super::rpn::{from_rpn, to_rpn};

/// Programme compilé : une ou plusieurs expressions séparées par ';'.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Programme {
    segments: Vec<Noeud>,
}

impl Programme {
    /// Compile un texte. Les segments vides (";;", ';' final) sont ignorés ;
    /// un programme sans aucune expression est une erreur.
    pub fn compile(texte: &str) -> Resultat<Programme> {
        let jetons = tokenize(texte)?;
        trace!(jetons = %format_tokens(&jetons), "jetons");

        let mut segments = Vec::new();
        for morceau in jetons.split(|t| *t == Tok::PointVirgule) {
            if morceau.is_empty() {
                continue;
            }
            let rpn = to_rpn(morceau)?;
            let arbre = from_rpn(&rpn)?;
            trace!(arbre = %arbre, noeuds = arbre.taille(), "segment compilé");
            segments.push(arbre);
        }

        if segments.is_empty() {
            return Err(Erreur::parse("expression vide"));
        }
        Ok(Programme { segments })
    }

    pub fn segments(&self) -> &[Noeud] {
        &self.segments
    }

    /// Rejoue chaque segment dans l’ordre sur un contexte enfant,
    /// puis renvoie toute la pile enfant (plus ancien d’abord).
    pub fn execute(&self, calc: &Calculatrice) -> Resultat<Vec<ElementPile>> {
        let mut enfant = calc.sous_contexte()?;
        for s in &self.segments {
            s.rejoue(&mut enfant)?;
        }
        let n = enfant.size();
        enfant.pop(n)
    }
}

/// Compile puis exécute `texte` contre les variables et options de `calc`.
pub fn execute(texte: &str, calc: &Calculatrice) -> Resultat<Vec<ElementPile>> {
    let programme = Programme::compile(texte)?;
    let res = programme.execute(calc);
    match &res {
        Ok(r) => debug!(texte, resultats = r.len(), "eval"),
        Err(e) => debug!(texte, erreur = %e, "eval en échec"),
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::options::ModeAngle;

    fn rendu(texte: &str, calc: &Calculatrice) -> Vec<String> {
        execute(texte, calc)
            .unwrap()
            .iter()
            .map(|e| e.rendu(calc.options()))
            .collect()
    }

    #[test]
    fn simple() {
        let c = Calculatrice::new();
        assert_eq!(rendu("1 + 1", &c), ["2"]);
        assert_eq!(rendu("-42", &c), ["-42"]);
        assert_eq!(rendu("4 + 3 * 2", &c), ["10"]);
        assert_eq!(rendu("( 4 + 3 ) * 2", &c), ["14"]);
    }

    #[test]
    fn infixe_egal_postfixe() {
        let c = Calculatrice::new();
        let infixe = execute("1 + 1", &c).unwrap();
        let mut p = Calculatrice::new();
        p.push_tous(["1", "1", "+"]).unwrap();
        assert_eq!(infixe, p.pop(1).unwrap());
    }

    #[test]
    fn fonctions_et_modes() {
        let c = Calculatrice::new();
        assert_eq!(rendu("sin(30)", &c), ["0.5"]);
        assert_eq!(rendu("radians; sin(pi/6)", &c), ["0.5"]);
        assert_eq!(rendu("sqrt(16) + atan2(1, 1)", &c), ["49"]);
        assert_eq!(rendu("2 ^ 10", &c), ["1024"]);
    }

    #[test]
    fn plusieurs_resultats_dans_l_ordre() {
        let c = Calculatrice::new();
        assert_eq!(rendu("1; 2; 3*4", &c), ["1", "2", "12"]);
        assert_eq!(rendu(";; 5 ;", &c), ["5"]);
    }

    #[test]
    fn variables() {
        let mut c = Calculatrice::new();
        c.push_tous(["5", "'a'", "store"]).unwrap();
        assert_eq!(rendu("a+2", &c), ["7"]);

        c.push_tous(["'a*a'", "'carre'", "store"]).unwrap();
        assert_eq!(rendu("carre - 1", &c), ["24"]);
    }

    #[test]
    fn unites_infixes() {
        let c = Calculatrice::new();
        assert_eq!(rendu("3_m / 4_cm", &c), ["75"]);
        assert_eq!(rendu("1_m + 50_cm", &c), ["1.5_m"]);
    }

    #[test]
    fn erreurs() {
        let c = Calculatrice::new();
        for t in ["", "  ", ";", "1 +", "sin(1, 2)", "foo(1)", "(1"] {
            assert!(
                matches!(execute(t, &c), Err(Erreur::ParseError(_))),
                "{t:?}"
            );
        }
        assert_eq!(execute("1 / 0", &c), Err(Erreur::DivideByZero));
        assert!(matches!(
            execute("inconnue + 1", &c),
            Err(Erreur::ParseError(_))
        ));
    }

    #[test]
    fn aucune_fuite_vers_l_appelant() {
        let mut c = Calculatrice::new();
        c.push("9").unwrap();
        let r = execute("rad; hex; 1; 2", &c).unwrap();
        assert_eq!(r.len(), 2);
        assert_eq!(c.options().angle_mode, ModeAngle::Degrees);
        assert_eq!(c.to_string_stack(), "9");
        assert!(c.variables().is_empty());
    }

    #[test]
    fn programme_compile_une_fois() {
        let p = Programme::compile("x * 2; x").unwrap();
        assert_eq!(p.segments().len(), 2);
        let mut c = Calculatrice::new();
        c.push_tous(["3", "'x'", "store"]).unwrap();
        let r = p.execute(&c).unwrap();
        assert_eq!(r.len(), 2);
    }
}
