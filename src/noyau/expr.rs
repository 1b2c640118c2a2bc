// src/noyau/expr.rs
//
// AST d’une expression infixe.
// - Valeur : texte littéral (nombre, variable ou mot-clé), poussé tel quel
// - Unaire : moins unaire (poussé comme "neg")
// - Binaire : + - * / ^ (^ poussé comme "pow")
// - Appel : fonction nommée, arguments évalués de gauche à droite
//
// Le rejeu est un parcours postfixe : les opérandes d’abord, l’opérateur ensuite.
// Itératif (pile explicite) : une expression très imbriquée ne fait pas déborder la pile d’appel.

use std::fmt;

use super::calculatrice::Calculatrice;
use super::erreur::Resultat;
use super::rpn::OpBin;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Noeud {
    Valeur(String),
    Unaire(&'static str, Box<Noeud>),
    Binaire(OpBin, Box<Noeud>, Box<Noeud>),
    Appel(String, Vec<Noeud>),
}

enum Tache<'a> {
    Visite(&'a Noeud),
    Pousse(&'a str),
}

impl Noeud {
    /// Pousse l’arbre sur `calc` en ordre postfixe.
    /// S’arrête à la première erreur (la calculatrice est un contexte jetable).
    pub fn rejoue(&self, calc: &mut Calculatrice) -> Resultat<()> {
        let mut taches: Vec<Tache<'_>> = vec![Tache::Visite(self)];

        while let Some(t) = taches.pop() {
            match t {
                Tache::Pousse(jeton) => calc.push(jeton)?,

                Tache::Visite(Noeud::Valeur(s)) => calc.push(s)?,

                Tache::Visite(Noeud::Unaire(op, a)) => {
                    taches.push(Tache::Pousse(*op));
                    taches.push(Tache::Visite(a));
                }

                Tache::Visite(Noeud::Binaire(op, a, b)) => {
                    // LIFO : a est visité avant b
                    taches.push(Tache::Pousse(op.jeton()));
                    taches.push(Tache::Visite(b));
                    taches.push(Tache::Visite(a));
                }

                Tache::Visite(Noeud::Appel(nom, args)) => {
                    taches.push(Tache::Pousse(nom));
                    taches.extend(args.iter().rev().map(Tache::Visite));
                }
            }
        }
        Ok(())
    }

    /// Nombre de noeuds (journalisation).
    pub fn taille(&self) -> usize {
        let mut n = 0;
        let mut pile: Vec<&Noeud> = vec![self];
        while let Some(e) = pile.pop() {
            n += 1;
            match e {
                Noeud::Valeur(_) => {}
                Noeud::Unaire(_, a) => pile.push(a),
                Noeud::Binaire(_, a, b) => {
                    pile.push(a);
                    pile.push(b);
                }
                Noeud::Appel(_, args) => pile.extend(args.iter()),
            }
        }
        n
    }
}

/// Forme infixe entièrement parenthésée.
impl fmt::Display for Noeud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Noeud::Valeur(s) => write!(f, "{s}"),
            Noeud::Unaire(_, a) => write!(f, "(-{a})"),
            Noeud::Binaire(op, a, b) => write!(f, "({a} {} {b})", op.symbole()),
            Noeud::Appel(nom, args) => {
                write!(f, "{nom}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
        }
    }
}
