// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok (une seule expression, sans ';') en RPN (postfix)
// - Puis reconstruire le Noeud
//
// Règles:
// - Ident suivi de '(' => appel de fonction (nombre d’arguments compté)
// - Ident seul         => valeur (mot-clé ou variable, résolu à l’exécution)
// - Moins unaire       => opérateur préfixe Neg (plus fort que * /, plus faible que ^)
// - ^ associatif à droite, les autres à gauche
//
// NOTE:
// - Pas de multiplication implicite : "2 x" est refusé.

use super::erreur::{Erreur, Resultat};
use super::expr::Noeud;
use super::jetons::Tok;
use super::operateurs::Operateur;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBin {
    Plus,
    Moins,
    Fois,
    Divise,
    Puissance,
}

impl OpBin {
    fn depuis(t: &Tok) -> Option<OpBin> {
        match t {
            Tok::Plus => Some(OpBin::Plus),
            Tok::Minus => Some(OpBin::Moins),
            Tok::Star => Some(OpBin::Fois),
            Tok::Slash => Some(OpBin::Divise),
            Tok::Caret => Some(OpBin::Puissance),
            _ => None,
        }
    }

    /// Jeton poussé sur la calculatrice.
    pub fn jeton(self) -> &'static str {
        match self {
            OpBin::Plus => "+",
            OpBin::Moins => "-",
            OpBin::Fois => "*",
            OpBin::Divise => "/",
            OpBin::Puissance => "pow",
        }
    }

    pub fn symbole(self) -> &'static str {
        match self {
            OpBin::Puissance => "^",
            _ => self.jeton(),
        }
    }
}

const PRECEDENCE_NEG: i32 = 3;

fn precedence(op: OpBin) -> i32 {
    match op {
        OpBin::Plus | OpBin::Moins => 1,
        OpBin::Fois | OpBin::Divise => 2,
        OpBin::Puissance => 4,
    }
}

fn is_right_associative(op: OpBin) -> bool {
    matches!(op, OpBin::Puissance)
}

/// Élément de sortie RPN.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElemRpn {
    Valeur(String),
    Bin(OpBin),
    Neg,
    Appel(String, usize),
}

/// Élément en attente sur la pile d’opérateurs.
#[derive(Debug)]
enum Attente {
    Bin(OpBin),
    Neg,
    Par {
        fonction: Option<String>,
        virgules: usize,
    },
}

fn precedence_attente(a: &Attente) -> Option<i32> {
    match a {
        Attente::Bin(op) => Some(precedence(*op)),
        Attente::Neg => Some(PRECEDENCE_NEG),
        Attente::Par { .. } => None,
    }
}

fn vers_sortie(a: Attente) -> Option<ElemRpn> {
    match a {
        Attente::Bin(op) => Some(ElemRpn::Bin(op)),
        Attente::Neg => Some(ElemRpn::Neg),
        Attente::Par { .. } => None,
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("atan2"), LPar, Num("1"), Virgule, Num("2"), RPar]
///   rpn:    [Valeur("1"), Valeur("2"), Appel("atan2", 2)]
pub fn to_rpn(tokens: &[Tok]) -> Resultat<Vec<ElemRpn>> {
    let mut out: Vec<ElemRpn> = Vec::new();
    let mut ops: Vec<Attente> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire.
    let mut prev_was_value = false;
    let mut prev_was_lpar = false;

    let mut i = 0;
    while i < tokens.len() {
        let tok = &tokens[i];
        let lpar_avant = prev_was_lpar;
        prev_was_lpar = false;

        match tok {
            Tok::Num(s) | Tok::Ident(s) => {
                if prev_was_value {
                    return Err(Erreur::parse(format!("opérateur attendu avant '{s}'")));
                }
                let appel = matches!(tok, Tok::Ident(_)) && tokens.get(i + 1) == Some(&Tok::LPar);
                if appel {
                    ops.push(Attente::Par {
                        fonction: Some(s.clone()),
                        virgules: 0,
                    });
                    prev_was_lpar = true;
                    prev_was_value = false;
                    i += 1;
                } else {
                    out.push(ElemRpn::Valeur(s.clone()));
                    prev_was_value = true;
                }
            }

            Tok::LPar => {
                if prev_was_value {
                    return Err(Erreur::parse("opérateur attendu avant '('"));
                }
                ops.push(Attente::Par {
                    fonction: None,
                    virgules: 0,
                });
                prev_was_lpar = true;
            }

            Tok::Virgule => {
                if !prev_was_value {
                    return Err(Erreur::parse("argument vide"));
                }
                depile_jusqu_a_parenthese(&mut ops, &mut out);
                match ops.last_mut() {
                    Some(Attente::Par {
                        fonction: Some(_),
                        virgules,
                    }) => *virgules += 1,
                    _ => return Err(Erreur::parse("virgule hors d’un appel")),
                }
                prev_was_value = false;
            }

            Tok::RPar => {
                let appel_vide = lpar_avant
                    && matches!(ops.last(), Some(Attente::Par { fonction: Some(_), .. }));
                if !prev_was_value && !appel_vide {
                    return Err(Erreur::parse("expression incomplète avant ')'"));
                }

                // dépile jusqu’à '('
                depile_jusqu_a_parenthese(&mut ops, &mut out);
                match ops.pop() {
                    Some(Attente::Par { fonction, virgules }) => {
                        if let Some(nom) = fonction {
                            let n = if appel_vide { 0 } else { virgules + 1 };
                            out.push(ElemRpn::Appel(nom, n));
                        } else if virgules > 0 {
                            return Err(Erreur::parse("virgule hors d’un appel"));
                        }
                    }
                    _ => return Err(Erreur::parse("parenthèse fermante sans ouvrante")),
                }
                prev_was_value = true;
            }

            Tok::Minus if !prev_was_value => {
                // moins unaire : préfixe, rien à dépiler
                ops.push(Attente::Neg);
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                let Some(op) = OpBin::depuis(tok) else {
                    return Err(Erreur::parse("opérateur inconnu"));
                };
                if !prev_was_value {
                    return Err(Erreur::parse(format!(
                        "opérande manquante avant '{}'",
                        op.symbole()
                    )));
                }

                let p_tok = precedence(op);
                while let Some(p_top) = ops.last().and_then(precedence_attente) {
                    let doit_pop = if is_right_associative(op) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };
                    if !doit_pop {
                        break;
                    }
                    if let Some(e) = ops.pop().and_then(vers_sortie) {
                        out.push(e);
                    }
                }

                ops.push(Attente::Bin(op));
                prev_was_value = false;
            }

            Tok::PointVirgule => {
                return Err(Erreur::parse("';' inattendu dans une expression"));
            }
        }
        i += 1;
    }

    if !prev_was_value {
        return Err(Erreur::parse("expression incomplète"));
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        match vers_sortie(op) {
            Some(e) => out.push(e),
            None => return Err(Erreur::parse("parenthèses non fermées")),
        }
    }

    Ok(out)
}

fn depile_jusqu_a_parenthese(ops: &mut Vec<Attente>, out: &mut Vec<ElemRpn>) {
    while let Some(top) = ops.last() {
        if matches!(top, Attente::Par { .. }) {
            break;
        }
        if let Some(e) = ops.pop().and_then(vers_sortie) {
            out.push(e);
        }
    }
}

/// Construit un Noeud à partir d’une RPN.
///
/// - Appel(nom, n) : nom doit être un opérateur dont l’arité vaut n
pub fn from_rpn(rpn: &[ElemRpn]) -> Resultat<Noeud> {
    let invalide = || Erreur::parse("expression invalide");
    let mut st: Vec<Noeud> = Vec::new();

    for e in rpn {
        match e {
            ElemRpn::Valeur(s) => st.push(Noeud::Valeur(s.clone())),

            ElemRpn::Bin(op) => {
                let b = st.pop().ok_or_else(invalide)?;
                let a = st.pop().ok_or_else(invalide)?;
                st.push(Noeud::Binaire(*op, Box::new(a), Box::new(b)));
            }

            ElemRpn::Neg => {
                let a = st.pop().ok_or_else(invalide)?;
                st.push(Noeud::Unaire("neg", Box::new(a)));
            }

            ElemRpn::Appel(nom, n) => {
                let op = Operateur::trouve(nom)
                    .ok_or_else(|| Erreur::parse(format!("fonction inconnue: '{nom}'")))?;
                if op.arite() != *n {
                    return Err(Erreur::parse(format!(
                        "{nom} attend {} argument(s), {n} fourni(s)",
                        op.arite()
                    )));
                }
                if st.len() < *n {
                    return Err(invalide());
                }
                let args = st.split_off(st.len() - n);
                st.push(Noeud::Appel(nom.clone(), args));
            }
        }
    }

    match (st.pop(), st.is_empty()) {
        (Some(racine), true) => Ok(racine),
        _ => Err(invalide()),
    }
}
