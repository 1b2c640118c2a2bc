// src/noyau/operateurs/math.rs
//
// Arithmétique et fonctions
// - a = avant-dernier, b = sommet ; un seul résultat poussé
// - + - * / : unités respectées
// - les autres fonctions travaillent sur la magnitude seule (résultat sans unité)
// - trigo directe : entrée convertie selon le mode ; trigo inverse : sortie convertie

use num_bigint::BigInt;
use num_rational::BigRational;

use super::Operateur;
use crate::noyau::calculatrice::Calculatrice;
use crate::noyau::element::ElementPile;
use crate::noyau::erreur::Resultat;
use crate::noyau::precision;
use crate::noyau::valeur::{modulo, Valeur};

fn sans_unite(m: BigRational) -> Valeur {
    Valeur::nombre(m)
}

pub(super) fn binaire(op: Operateur, calc: &mut Calculatrice) -> Resultat<()> {
    let args = calc.consulte(2)?;
    let a = calc.resoudre(&args[0])?;
    let b = calc.resoudre(&args[1])?;
    let mode = calc.options().angle_mode;

    let (x, y) = (&a.magnitude, &b.magnitude);
    let r = match op {
        Operateur::Ajouter => a.ajouter(&b)?,
        Operateur::Soustraire => a.soustraire(&b)?,
        Operateur::Multiplier => a.multiplier(&b),
        Operateur::Diviser => a.diviser(&b)?,
        Operateur::Puissance => sans_unite(precision::puissance(x, y)?),
        Operateur::RacineN => sans_unite(precision::racine_n(x, y)?),
        Operateur::Modulo => sans_unite(modulo(x, y)?),
        Operateur::Atan2 => sans_unite(precision::atan2(x, y, mode)),
        Operateur::Log => sans_unite(precision::log_base(x, y)?),
        _ => unreachable!("opérateur non binaire: {op:?}"),
    };

    calc.remplace(2, vec![ElementPile::Numerique(r)]);
    Ok(())
}

pub(super) fn unaire(op: Operateur, calc: &mut Calculatrice) -> Resultat<()> {
    let args = calc.consulte(1)?;
    let a = calc.resoudre(&args[0])?;
    let mode = calc.options().angle_mode;
    let x = &a.magnitude;

    let r = match op {
        Operateur::Negation => a.negation(),
        Operateur::Inverse => a.inverse()?,
        Operateur::Racine => sans_unite(precision::racine(x)?),
        Operateur::Ln => sans_unite(precision::ln(x)?),
        Operateur::Log10 => sans_unite(precision::log_base(x, &entier(10))?),
        Operateur::Log2 => sans_unite(precision::log_base(x, &entier(2))?),
        Operateur::Sin => sans_unite(precision::sin(x, mode)),
        Operateur::Cos => sans_unite(precision::cos(x, mode)),
        Operateur::Tan => sans_unite(precision::tan(x, mode)?),
        Operateur::Asin => sans_unite(precision::asin(x, mode)?),
        Operateur::Acos => sans_unite(precision::acos(x, mode)?),
        Operateur::Atan => sans_unite(precision::atan(x, mode)),
        Operateur::DegVersRad => sans_unite(precision::deg_vers_rad(x)),
        Operateur::RadVersDeg => sans_unite(precision::rad_vers_deg(x)),
        _ => unreachable!("opérateur non unaire: {op:?}"),
    };

    calc.remplace(1, vec![ElementPile::Numerique(r)]);
    Ok(())
}

pub(super) fn constante(op: Operateur, calc: &mut Calculatrice) -> Resultat<()> {
    let v = match op {
        Operateur::Pi => precision::pi(),
        _ => precision::e(),
    };
    calc.push_element(ElementPile::Numerique(sans_unite(v)));
    Ok(())
}

fn entier(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}
