// src/noyau/operateurs/pile.rs
//
// Contrôle de pile, modes, variables, options, eval, convert

use super::Operateur;
use crate::noyau::calculatrice::Calculatrice;
use crate::noyau::element::ElementPile;
use crate::noyau::erreur::{Erreur, Resultat};
use crate::noyau::eval;
use crate::noyau::options::{Base, ModeAngle};
use crate::noyau::unites::Unites;

fn nom_expression<'a>(e: &'a ElementPile, role: &str) -> Resultat<&'a str> {
    e.expression()
        .ok_or_else(|| Erreur::operande(format!("{role} doit être une expression")))
}

pub(super) fn mode(op: Operateur, calc: &mut Calculatrice) -> Resultat<()> {
    let o = calc.options_mut();
    match op {
        Operateur::Degres => o.angle_mode = ModeAngle::Degrees,
        Operateur::Radians => o.angle_mode = ModeAngle::Radians,
        Operateur::Hex => o.base = Base::HEX,
        Operateur::Dec => o.base = Base::DEC,
        Operateur::Oct => o.base = Base::OCT,
        Operateur::Bin => o.base = Base::BIN,
        _ => unreachable!("opérateur non modal: {op:?}"),
    }
    Ok(())
}

pub(super) fn dup(calc: &mut Calculatrice) -> Resultat<()> {
    let sommet = calc.consulte(1)?[0].clone();
    calc.push_element(sommet);
    Ok(())
}

pub(super) fn swap(calc: &mut Calculatrice) -> Resultat<()> {
    let args = calc.consulte(2)?;
    let (a, b) = (args[0].clone(), args[1].clone());
    calc.remplace(2, vec![b, a]);
    Ok(())
}

pub(super) fn drop(calc: &mut Calculatrice) -> Resultat<()> {
    calc.consulte(1)?;
    calc.remplace(1, Vec::new());
    Ok(())
}

pub(super) fn effacer(calc: &mut Calculatrice) -> Resultat<()> {
    calc.vide();
    Ok(())
}

/// valeur (avant-dernier), nom (sommet)
pub(super) fn stocker(calc: &mut Calculatrice) -> Resultat<()> {
    let args = calc.consulte(2)?;
    let valeur = args[0].clone();
    let nom = nom_expression(&args[1], "le nom")?.to_string();
    calc.store(&nom, valeur)?;
    calc.remplace(2, Vec::new());
    Ok(())
}

/// nom (avant-dernier), valeur (sommet)
pub(super) fn set(calc: &mut Calculatrice) -> Resultat<()> {
    let args = calc.consulte(2)?;
    let nom = nom_expression(&args[0], "le nom d’option")?.to_string();
    let valeur = args[1].clone();
    calc.set_option(&nom, &valeur)?;
    calc.remplace(2, Vec::new());
    Ok(())
}

pub(super) fn get(calc: &mut Calculatrice) -> Resultat<()> {
    let args = calc.consulte(1)?;
    let nom = nom_expression(&args[0], "le nom d’option")?;
    let v = calc.get_option(nom)?;
    calc.remplace(1, vec![v]);
    Ok(())
}

pub(super) fn eval(calc: &mut Calculatrice) -> Resultat<()> {
    let args = calc.consulte(1)?;
    let texte = nom_expression(&args[0], "l’opérande")?;
    let resultats = eval::execute(texte, calc)?;
    calc.remplace(1, resultats);
    Ok(())
}

/// valeur (avant-dernier), unités cibles (sommet, '_' de tête toléré)
pub(super) fn convertir(calc: &mut Calculatrice) -> Resultat<()> {
    let args = calc.consulte(2)?;
    let cible = nom_expression(&args[1], "l’unité cible")?;
    let cible = Unites::parse(cible.trim().trim_start_matches('_'))?;
    let valeur = calc.resoudre(&args[0])?;
    let r = valeur.convertir(&cible)?;
    calc.remplace(2, vec![ElementPile::Numerique(r)]);
    Ok(())
}
