// src/noyau/format.rs
//
// Rendu des magnitudes
// --------------------
// - base 10 : 20 chiffres significatifs, notation exposant si e >= 21 ou e < -7
// - bases 2/8/16 : préfixes 0b / 0 / 0x, au plus 16 chiffres fractionnaires
// - groupement : "," des milliers + espace tous les 3 chiffres fractionnaires (base 10),
//   paquets de 4 caractères séparés par des espaces ailleurs
// - forme exacte (sauvegarde) : décimal fini, sinon "n/d"

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::options::Base;
use super::precision::pow10;

pub const CHIFFRES_SIGNIFICATIFS: usize = 20;
pub const CHIFFRES_FRACTION_RADIX: usize = 16;

const EXPOSANT_MAX_POSITIONNEL: i64 = 21;
const EXPOSANT_MIN_POSITIONNEL: i64 = -7;

/* ------------------------ Décimal (scaled -> texte) ------------------------ */

/// Convertit un entier “scalé” (×10^digits) en texte décimal.
pub fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;
    let signe = if neg { "-" } else { "" };

    if digits == 0 {
        return format!("{signe}{int_part}");
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }
    format!("{signe}{int_part}.{frac}")
}

/// Écriture exacte : décimal fini si le dénominateur n’a que 2 et 5, sinon "n/d".
pub fn format_exact(r: &BigRational) -> String {
    let mut d = r.denom().clone();
    let (deux, cinq) = (BigInt::from(2), BigInt::from(5));
    let (mut a, mut b) = (0usize, 0usize);
    while (&d % &deux).is_zero() {
        d /= &deux;
        a += 1;
    }
    while (&d % &cinq).is_zero() {
        d /= &cinq;
        b += 1;
    }
    if !d.is_one() {
        return format!("{}/{}", r.numer(), r.denom());
    }

    let k = a.max(b);
    let scaled = r.numer() * pow10(k) / r.denom();
    scaled_to_decimal(scaled, k)
}

/* ------------------------ Base 10 ------------------------ */

/// floor(log10 |x|) pour x non nul
fn exposant_decimal(x: &BigRational) -> i64 {
    let n = x.numer().abs().to_str_radix(10).len() as i64;
    let d = x.denom().to_str_radix(10).len() as i64;
    let mut e = n - d;
    let abs = x.abs();
    if abs < puissance_dix(e) {
        e -= 1;
    } else if abs >= puissance_dix(e + 1) {
        e += 1;
    }
    e
}

fn puissance_dix(e: i64) -> BigRational {
    if e >= 0 {
        BigRational::from_integer(pow10(e as usize))
    } else {
        BigRational::new(BigInt::one(), pow10((-e) as usize))
    }
}

/// (chiffres significatifs sans zéros de queue, exposant décimal)
fn significatifs(x: &BigRational) -> (String, i64) {
    let mut e = exposant_decimal(x);
    let echelle = puissance_dix(CHIFFRES_SIGNIFICATIFS as i64 - 1 - e);
    let v = x.abs() * echelle;

    // arrondi demi vers le haut
    let demi = BigRational::new(BigInt::one(), BigInt::from(2));
    let mut m = (v + demi).floor().to_integer();
    if m >= pow10(CHIFFRES_SIGNIFICATIFS) {
        m /= 10;
        e += 1;
    }

    let s = m.to_str_radix(10);
    (s.trim_end_matches('0').to_string(), e)
}

fn groupe_milliers(entier: &str) -> String {
    let n = entier.len();
    let mut out = String::with_capacity(n + n / 3);
    for (i, c) in entier.chars().enumerate() {
        if i > 0 && (n - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn groupe_fraction(frac: &str, taille: usize) -> String {
    frac.as_bytes()
        .chunks(taille)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn assemble_decimal(entier: &str, frac: &str, groupement: bool) -> String {
    let entier = if groupement {
        groupe_milliers(entier)
    } else {
        entier.to_string()
    };
    match (frac.is_empty(), groupement) {
        (true, _) => entier,
        (false, false) => format!("{entier}.{frac}"),
        (false, true) => format!("{entier}.{}", groupe_fraction(frac, 3)),
    }
}

fn format_base10(x: &BigRational, groupement: bool) -> String {
    let (s, e) = significatifs(x);
    let signe = if x.is_negative() { "-" } else { "" };

    if !(EXPOSANT_MIN_POSITIONNEL..EXPOSANT_MAX_POSITIONNEL).contains(&e) {
        let (tete, reste) = s.split_at(1);
        let mantisse = assemble_decimal(tete, reste, groupement);
        let se = if e >= 0 { "+" } else { "-" };
        return format!("{signe}{mantisse}e{se}{}", e.abs());
    }

    let (entier, frac) = if e >= 0 {
        let e = e as usize;
        if s.len() > e + 1 {
            (s[..e + 1].to_string(), s[e + 1..].to_string())
        } else {
            (format!("{s}{}", "0".repeat(e + 1 - s.len())), String::new())
        }
    } else {
        ("0".to_string(), format!("{}{s}", "0".repeat((-e - 1) as usize)))
    };

    format!("{signe}{}", assemble_decimal(&entier, &frac, groupement))
}

/* ------------------------ Bases 2 / 8 / 16 ------------------------ */

pub fn prefixe_base(base: Base) -> &'static str {
    match base.valeur() {
        2 => "0b",
        8 => "0",
        16 => "0x",
        _ => "",
    }
}

fn groupe_radix(chiffres: &str, depuis_droite: bool) -> String {
    if !depuis_droite {
        return groupe_fraction(chiffres, 4);
    }
    let n = chiffres.len();
    let mut out = String::with_capacity(n + n / 4);
    for (i, c) in chiffres.chars().enumerate() {
        if i > 0 && (n - i) % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

fn format_radix(x: &BigRational, base: Base, groupement: bool) -> String {
    let b = base.valeur();
    let abs = x.abs();
    let entier = abs.trunc().to_integer();
    let mut reste = abs.fract();

    let mut frac = String::new();
    let rb = BigRational::from_integer(BigInt::from(b));
    while !reste.is_zero() && frac.len() < CHIFFRES_FRACTION_RADIX {
        reste *= &rb;
        let chiffre = reste.trunc().to_integer();
        reste = reste.fract();
        frac.push_str(&chiffre.to_str_radix(b));
    }
    let frac = frac.trim_end_matches('0');

    let signe = if x.is_negative() { "-" } else { "" };
    let chiffres_entiers = entier.to_str_radix(b);

    // 0 en octal reste "0"
    if base == Base::OCT && entier.is_zero() && frac.is_empty() {
        return "0".to_string();
    }

    let (e, f) = if groupement {
        (groupe_radix(&chiffres_entiers, true), groupe_radix(frac, false))
    } else {
        (chiffres_entiers, frac.to_string())
    };
    let prefixe = prefixe_base(base);
    if f.is_empty() {
        format!("{signe}{prefixe}{e}")
    } else {
        format!("{signe}{prefixe}{e}.{f}")
    }
}

/// Rendu d’une magnitude selon la base et le groupement.
pub fn format_magnitude(x: &BigRational, base: Base, groupement: bool) -> String {
    if x.is_zero() {
        return "0".to_string();
    }
    if base == Base::DEC {
        format_base10(x, groupement)
    } else {
        format_radix(x, base, groupement)
    }
}
