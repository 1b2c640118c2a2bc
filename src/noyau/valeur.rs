// src/noyau/valeur.rs
//
// Valeur numérique = magnitude exacte (rationnel) + unités éventuelles
// -------------------------------------------------------------------
// Lecture (ordre) :
//   1) suffixe d’unités après le dernier '_' (validé contre le registre)
//   2) retrait des séparateurs ',' et ' '
//   3) true / false
//   4) préfixes 0x / 0b / 0 (octal) avec '-' optionnel
//   5) décimal : signe, fraction, exposant e±N
//
// Arithmétique :
//   - + / - : la seconde opérande est convertie dans les unités de la première ;
//             une seule opérande avec unités => on garde celle qui existe
//   - * / / : algèbre des unités (m/cm => 100 sans unité)

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::fmt;

use super::erreur::{Erreur, Resultat};
use super::format::{format_exact, format_magnitude};
use super::options::Base;
use super::precision::puissance_entiere;
use super::unites::Unites;

/// |exposant| décimal maximal accepté en lecture
const EXPOSANT_MAX: i64 = 10_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Valeur {
    pub magnitude: BigRational,
    pub unites: Unites,
}

impl Valeur {
    pub fn nombre(magnitude: BigRational) -> Self {
        Self {
            magnitude,
            unites: Unites::aucune(),
        }
    }

    pub fn entier(n: i64) -> Self {
        Self::nombre(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn avec_unites(magnitude: BigRational, unites: Unites) -> Self {
        Self { magnitude, unites }
    }

    pub fn a_des_unites(&self) -> bool {
        !self.unites.est_vide()
    }

    pub fn est_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    /* ------------------------ Lecture ------------------------ */

    pub fn parse(texte: &str) -> Resultat<Self> {
        let s = texte.trim();
        if s.is_empty() {
            return Err(Erreur::parse("nombre vide"));
        }

        let (corps, unites) = match s.rfind('_') {
            Some(i) => (&s[..i], Unites::parse(&s[i + 1..])?),
            None => (s, Unites::aucune()),
        };

        let magnitude = lire_magnitude(corps)
            .ok_or_else(|| Erreur::parse(format!("nombre invalide: '{texte}'")))?;
        Ok(Self { magnitude, unites })
    }

    /* ------------------------ Rendu ------------------------ */

    pub fn rendu(&self, base: Base, groupement: bool) -> String {
        let m = format_magnitude(&self.magnitude, base, groupement);
        if self.a_des_unites() {
            format!("{m}_{}", self.unites)
        } else {
            m
        }
    }

    /// Magnitude écrite sans perte (sauvegarde).
    pub fn magnitude_exacte(&self) -> String {
        format_exact(&self.magnitude)
    }

    /* ------------------------ Arithmétique ------------------------ */

    fn additive(&self, autre: &Valeur, signe: i64) -> Resultat<Valeur> {
        let b = match (self.a_des_unites(), autre.a_des_unites()) {
            (true, true) => &autre.magnitude * autre.unites.facteur_vers(&self.unites)?,
            _ => autre.magnitude.clone(),
        };
        let unites = if self.a_des_unites() {
            self.unites.clone()
        } else {
            autre.unites.clone()
        };
        let magnitude = if signe > 0 {
            &self.magnitude + b
        } else {
            &self.magnitude - b
        };
        Ok(Valeur { magnitude, unites })
    }

    pub fn ajouter(&self, autre: &Valeur) -> Resultat<Valeur> {
        self.additive(autre, 1)
    }

    pub fn soustraire(&self, autre: &Valeur) -> Resultat<Valeur> {
        self.additive(autre, -1)
    }

    pub fn multiplier(&self, autre: &Valeur) -> Valeur {
        let (unites, echelle) = self.unites.multiplier(&autre.unites);
        Valeur {
            magnitude: &self.magnitude * &autre.magnitude * echelle,
            unites,
        }
    }

    pub fn diviser(&self, autre: &Valeur) -> Resultat<Valeur> {
        if autre.est_zero() {
            return Err(Erreur::DivideByZero);
        }
        let (unites, echelle) = self.unites.diviser(&autre.unites);
        Ok(Valeur {
            magnitude: &self.magnitude / &autre.magnitude * echelle,
            unites,
        })
    }

    pub fn negation(&self) -> Valeur {
        Valeur {
            magnitude: -&self.magnitude,
            unites: self.unites.clone(),
        }
    }

    pub fn inverse(&self) -> Resultat<Valeur> {
        Valeur::entier(1).diviser(self)
    }

    /// Conversion vers d’autres unités ; une valeur sans unité est simplement étiquetée.
    pub fn convertir(&self, cible: &Unites) -> Resultat<Valeur> {
        if !self.a_des_unites() {
            return Ok(Valeur::avec_unites(self.magnitude.clone(), cible.clone()));
        }
        let f = self.unites.facteur_vers(cible)?;
        Ok(Valeur::avec_unites(&self.magnitude * f, cible.clone()))
    }
}

impl fmt::Display for Valeur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendu(Base::DEC, false))
    }
}

/* ------------------------ Lecture de la magnitude ------------------------ */

fn lire_magnitude(corps: &str) -> Option<BigRational> {
    let s: String = corps.chars().filter(|c| *c != ',' && *c != ' ').collect();
    if s.is_empty() {
        return None;
    }

    match s.to_lowercase().as_str() {
        "true" => return Some(BigRational::one()),
        "false" => return Some(BigRational::zero()),
        _ => {}
    }

    let (negatif, reste) = match s.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, s.strip_prefix('+').unwrap_or(&s)),
    };

    let bas = reste.to_lowercase();
    let v = if let Some(h) = bas.strip_prefix("0x") {
        lire_radix(h, 16)?
    } else if let Some(b) = bas.strip_prefix("0b") {
        lire_radix(b, 2)?
    } else if est_octal(&bas) {
        lire_radix(&bas[1..], 8)?
    } else {
        lire_decimal(&bas)?
    };

    Some(if negatif { -v } else { v })
}

/// "017", "07.4" : zéro de tête suivi uniquement de chiffres 0-7 (un point au plus)
fn est_octal(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() > 1
        && b[0] == b'0'
        && b[1] != b'.'
        && b.iter().all(|c| matches!(c, b'0'..=b'7' | b'.'))
        && b.iter().filter(|c| **c == b'.').count() <= 1
}

fn lire_radix(s: &str, base: u32) -> Option<BigRational> {
    let (ent, frac) = match s.split_once('.') {
        Some((e, f)) => (e, f),
        None => (s, ""),
    };
    if ent.is_empty() || (s.contains('.') && frac.is_empty()) {
        return None;
    }
    // parse_bytes accepterait un signe au milieu des chiffres
    if !ent.chars().chain(frac.chars()).all(|c| c.is_digit(base)) {
        return None;
    }

    let entier = BigInt::parse_bytes(ent.as_bytes(), base)?;
    let mut v = BigRational::from_integer(entier);

    if !frac.is_empty() {
        let f = BigInt::parse_bytes(frac.as_bytes(), base)?;
        let denom = puissance_entiere(
            &BigRational::from_integer(BigInt::from(base)),
            frac.len() as i64,
        );
        v += BigRational::from_integer(f) / denom;
    }
    Some(v)
}

/// chiffres [. chiffres] [e [+-] chiffres] ; au moins un chiffre de mantisse
fn lire_decimal(s: &str) -> Option<BigRational> {
    let (mantisse, exposant) = match s.find('e') {
        Some(i) => {
            let e = &s[i + 1..];
            let e = e.strip_prefix('+').unwrap_or(e);
            if e.is_empty() || !e.trim_start_matches('-').bytes().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let n: i64 = e.parse().ok()?;
            if n.abs() > EXPOSANT_MAX {
                return None;
            }
            (&s[..i], n)
        }
        None => (s, 0),
    };

    let (ent, frac) = match mantisse.split_once('.') {
        Some((e, f)) => (e, f),
        None => (mantisse, ""),
    };
    if ent.is_empty() && frac.is_empty() {
        return None;
    }
    if !ent.bytes().chain(frac.bytes()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let chiffres = format!("{ent}{frac}");
    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;
    let dix = BigRational::from_integer(BigInt::from(10));
    Some(BigRational::from_integer(n) * puissance_entiere(&dix, exposant - frac.len() as i64))
}

/// Lecture d’une magnitude écrite par `magnitude_exacte` ("n/d" ou décimal).
pub fn lire_magnitude_exacte(s: &str) -> Resultat<BigRational> {
    let err = || Erreur::parse(format!("magnitude invalide: '{s}'"));
    match s.split_once('/') {
        Some((n, d)) => {
            let n = BigInt::parse_bytes(n.trim().as_bytes(), 10).ok_or_else(err)?;
            let d = BigInt::parse_bytes(d.trim().as_bytes(), 10).ok_or_else(err)?;
            if d.is_zero() {
                return Err(err());
            }
            Ok(BigRational::new(n, d))
        }
        None => {
            let t = s.trim();
            let (neg, corps) = match t.strip_prefix('-') {
                Some(r) => (true, r),
                None => (false, t),
            };
            let v = lire_decimal(corps).ok_or_else(err)?;
            Ok(if neg { -v } else { v })
        }
    }
}

/// a mod b, signe du dividende
pub fn modulo(a: &BigRational, b: &BigRational) -> Resultat<BigRational> {
    if b.is_zero() {
        return Err(Erreur::DivideByZero);
    }
    let q = (a / b).trunc();
    let r = a - b * q;
    debug_assert!(r.is_zero() || r.is_negative() == a.is_negative());
    Ok(r)
}
