// src/noyau/precision.rs
//
// Noyau de précision (entiers "scalés")
// -------------------------------------
// - Un réel x est représenté par l’entier floor(x * 10^digits)
// - Calcul à CHIFFRES_TRAVAIL décimales, résultat arrondi à CHIFFRES_RESULTAT
//   (sin 30° donne exactement 1/2, log10 1000 exactement 3)
// - π (Machin) et ln 2 (2·atanh 1/3) en cache par précision
// - Puissances entières exactes sur les rationnels

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use super::erreur::{Erreur, Resultat};
use super::options::ModeAngle;

pub const CHIFFRES_TRAVAIL: usize = 60;
pub const CHIFFRES_RESULTAT: usize = 40;

/// chiffres de garde internes (séries, réductions)
const GARDE: usize = 10;

/// e^23000 ≈ 10^9989 : au-delà on refuse
const LIMITE_EXP: i64 = 23_000;

/// exposant entier maximal calculé exactement
const LIMITE_PUISSANCE_EXACTE: i64 = 100_000;

/* ------------------------ Outils scalés ------------------------ */

pub(crate) fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// r -> entier scalé (troncature vers zéro)
fn rational_scaled(r: &BigRational, digits: usize) -> BigInt {
    (r.numer() * pow10(digits)) / r.denom()
}

/// scalé (×10^digits) -> rationnel arrondi (demi loin de zéro) à CHIFFRES_RESULTAT décimales
fn arrondi(scaled: &BigInt, digits: usize) -> BigRational {
    if digits <= CHIFFRES_RESULTAT {
        return BigRational::new(scaled.clone(), pow10(digits));
    }
    let d = pow10(digits - CHIFFRES_RESULTAT);
    let demi: BigInt = &d / 2;
    let q: BigInt = if scaled.is_negative() {
        let absolu: BigInt = (-scaled + &demi) / &d;
        -absolu
    } else {
        (scaled + &demi) / &d
    };
    BigRational::new(q, pow10(CHIFFRES_RESULTAT))
}

/// racine entière (Newton), n >= 0
fn isqrt(n: &BigInt) -> BigInt {
    if n <= &BigInt::one() {
        return n.clone();
    }
    let mut x = BigInt::one() << ((n.bits() as usize).div_ceil(2));
    loop {
        let y = (&x + n / &x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// sqrt(r) en entier scalé : floor( sqrt(r) * 10^digits )
fn rational_sqrt_scaled(r: &BigRational, digits: usize) -> BigInt {
    isqrt(&((r.numer() * pow10(2 * digits)) / r.denom()))
}

/* ------------------------ Constantes + cache ------------------------ */

/// arctan(1/q) en entier scalé via série alternée
fn arctan_inv_q_scaled(q: i64, scale: &BigInt) -> BigInt {
    let q = BigInt::from(q);
    let q2 = &q * &q;

    let mut k: u64 = 0;
    let mut q_pow = q;
    let mut sum = BigInt::zero();

    loop {
        let term = scale / (&q_pow * BigInt::from(2 * k + 1));
        if term.is_zero() {
            break;
        }
        if k % 2 == 0 {
            sum += term;
        } else {
            sum -= term;
        }
        q_pow *= &q2;
        k += 1;
    }
    sum
}

/// atanh(z) pour |z| < 1, z scalé
fn atanh_scaled(z: &BigInt, scale: &BigInt) -> BigInt {
    let z2 = z * z / scale;
    let mut terme = z.clone();
    let mut somme = BigInt::zero();
    let mut k: u64 = 0;
    loop {
        let t = &terme / BigInt::from(2 * k + 1);
        if t.is_zero() {
            break;
        }
        somme += t;
        terme = terme * &z2 / scale;
        k += 1;
    }
    somme
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Constante {
    Pi,
    Ln2,
}

fn constante_compute(c: Constante, digits: usize) -> BigInt {
    let scale = pow10(digits + GARDE);
    let v = match c {
        // Machin : π = 16*atan(1/5) - 4*atan(1/239)
        Constante::Pi => {
            BigInt::from(16) * arctan_inv_q_scaled(5, &scale)
                - BigInt::from(4) * arctan_inv_q_scaled(239, &scale)
        }
        // ln 2 = 2*atanh(1/3)
        Constante::Ln2 => atanh_scaled(&(&scale / 3), &scale) * 2,
    };
    v / pow10(GARDE)
}

/// une seule entrée par constante : la plus précise calculée jusqu’ici
static CACHE: OnceLock<Mutex<HashMap<Constante, (usize, BigInt)>>> = OnceLock::new();

fn constante_scaled(c: Constante, digits: usize) -> BigInt {
    let m = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = m.lock().unwrap_or_else(|p| p.into_inner());

    if let Some((d, v)) = guard.get(&c) {
        if *d >= digits {
            return v / pow10(*d - digits);
        }
    }

    let v = constante_compute(c, digits);
    tracing::trace!(constante = ?c, digits, "constante calculée");
    guard.insert(c, (digits, v.clone()));
    v
}

/* ------------------------ exp / ln ------------------------ */

/// exp(x), x scalé à `digits`
fn exp_scaled(x: &BigInt, digits: usize) -> BigInt {
    let scale = pow10(digits);
    if x.is_negative() {
        let pos = exp_scaled(&-x, digits);
        return (&scale * &scale) / pos;
    }

    // réduction : x / 2^k < 1, puis k mises au carré
    let mut k: usize = 0;
    while (x >> k) >= scale {
        k += 1;
    }
    let p = digits + GARDE + k / 3 + 1;
    let sc = pow10(p);
    let r = (x * pow10(p - digits)) >> k;

    let mut somme = sc.clone();
    let mut terme = sc.clone();
    let mut n: u64 = 1;
    loop {
        terme = terme * &r / (&sc * BigInt::from(n));
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        n += 1;
    }

    for _ in 0..k {
        somme = &somme * &somme / &sc;
    }
    somme / pow10(p - digits)
}

/// ln(r), r > 0, scalé à `digits`
fn ln_scaled(r: &BigRational, digits: usize) -> BigInt {
    let p = digits + GARDE;
    let sc = pow10(p);
    let n = r.numer();
    let d = r.denom();

    // r = m * 2^k avec m dans (1/2, 2)
    let k = n.bits() as i64 - d.bits() as i64;
    let (num, den) = if k >= 0 {
        (n.clone(), d << (k as usize))
    } else {
        (n << ((-k) as usize), d.clone())
    };

    // ln m = 2 atanh((m-1)/(m+1))
    let z = ((&num - &den) * &sc) / (&num + &den);
    let ln_m = atanh_scaled(&z, &sc) * 2;

    let total = constante_scaled(Constante::Ln2, p) * BigInt::from(k) + ln_m;
    total / pow10(GARDE)
}

/* ------------------------ Trigo ------------------------ */

/// (sin x, cos x), x scalé à `digits` (radians)
fn sin_cos_scaled(x: &BigInt, digits: usize) -> (BigInt, BigInt) {
    // la réduction modulo 2π consomme autant de chiffres que la partie entière
    let p = digits + GARDE + (x.bits() as usize) * 3 / 10;
    let sc = pow10(p);
    let f = pow10(p - digits);

    let pi = constante_scaled(Constante::Pi, p);
    let deux_pi = &pi * 2;
    let mut xr: BigInt = (x * &f) % &deux_pi;
    if xr > pi {
        xr -= &deux_pi;
    } else if xr < -&pi {
        xr += &deux_pi;
    }

    let x2 = &xr * &xr / &sc;

    let mut sin = BigInt::zero();
    let mut terme = xr.clone();
    let mut n: u64 = 1;
    while !terme.is_zero() {
        sin += &terme;
        terme = -(terme * &x2) / (&sc * BigInt::from((n + 1) * (n + 2)));
        n += 2;
    }

    let mut cos = BigInt::zero();
    let mut terme = sc.clone();
    let mut n: u64 = 0;
    while !terme.is_zero() {
        cos += &terme;
        terme = -(terme * &x2) / (&sc * BigInt::from((n + 1) * (n + 2)));
        n += 2;
    }

    (sin / &f, cos / &f)
}

/// atan pour |x| <= 1 : deux demi-angles puis série
fn atan_petit(x: &BigInt, sc: &BigInt) -> BigInt {
    let mut y = x.clone();
    for _ in 0..2 {
        let rac = isqrt(&(sc * sc + &y * &y));
        y = (&y * sc) / (sc + rac);
    }

    let y2 = &y * &y / sc;
    let mut terme = y;
    let mut somme = BigInt::zero();
    let mut k: u64 = 0;
    loop {
        let t = &terme / BigInt::from(2 * k + 1);
        if t.is_zero() {
            break;
        }
        if k % 2 == 0 {
            somme += t;
        } else {
            somme -= t;
        }
        terme = terme * &y2 / sc;
        k += 1;
    }
    somme * 4
}

/// atan(x), x scalé à `digits`, résultat en radians scalé
fn atan_scaled(x: &BigInt, digits: usize) -> BigInt {
    let p = digits + GARDE;
    let sc = pow10(p);
    let xp = x * pow10(GARDE);

    let r = if xp.abs() > sc {
        // atan(x) = ±π/2 - atan(1/x)
        let demi_pi: BigInt = constante_scaled(Constante::Pi, p) / 2;
        let inv = (&sc * &sc) / &xp;
        let base = atan_petit(&inv, &sc);
        if xp.is_positive() {
            demi_pi - base
        } else {
            -demi_pi - base
        }
    } else {
        atan_petit(&xp, &sc)
    };
    r / pow10(GARDE)
}

fn angle_entree(x: &BigRational, mode: ModeAngle, digits: usize) -> BigInt {
    let xs = rational_scaled(x, digits);
    match mode {
        ModeAngle::Radians => xs,
        ModeAngle::Degrees => {
            xs * constante_scaled(Constante::Pi, digits) / (pow10(digits) * BigInt::from(180))
        }
    }
}

fn angle_sortie(rad: BigInt, mode: ModeAngle, digits: usize) -> BigInt {
    match mode {
        ModeAngle::Radians => rad,
        ModeAngle::Degrees => {
            rad * BigInt::from(180) * pow10(digits) / constante_scaled(Constante::Pi, digits)
        }
    }
}

/* ------------------------ API publique ------------------------ */

const P: usize = CHIFFRES_TRAVAIL;

/// π à la précision de travail (non arrondi)
pub fn pi() -> BigRational {
    BigRational::new(constante_scaled(Constante::Pi, P), pow10(P))
}

pub fn e() -> BigRational {
    BigRational::new(exp_scaled(&pow10(P), P), pow10(P))
}

pub fn deg_vers_rad(x: &BigRational) -> BigRational {
    arrondi(&angle_entree(x, ModeAngle::Degrees, P), P)
}

pub fn rad_vers_deg(x: &BigRational) -> BigRational {
    arrondi(
        &angle_sortie(rational_scaled(x, P), ModeAngle::Degrees, P),
        P,
    )
}

/// √x, exact si numérateur et dénominateur sont des carrés parfaits
pub fn racine(x: &BigRational) -> Resultat<BigRational> {
    if x.is_negative() {
        return Err(Erreur::domaine("racine d’un nombre négatif"));
    }
    let (rn, rd) = (isqrt(x.numer()), isqrt(x.denom()));
    if &(&rn * &rn) == x.numer() && &(&rd * &rd) == x.denom() {
        return Ok(BigRational::new(rn, rd));
    }
    Ok(arrondi(&rational_sqrt_scaled(x, P), P))
}

pub fn ln(x: &BigRational) -> Resultat<BigRational> {
    if !x.is_positive() {
        return Err(Erreur::domaine("logarithme d’un nombre non positif"));
    }
    Ok(arrondi(&ln_scaled(x, P), P))
}

/// log de x en base b
pub fn log_base(x: &BigRational, b: &BigRational) -> Resultat<BigRational> {
    if !x.is_positive() || !b.is_positive() {
        return Err(Erreur::domaine("logarithme d’un nombre non positif"));
    }
    if b.is_one() {
        return Err(Erreur::DivideByZero);
    }
    let lx = ln_scaled(x, P);
    let lb = ln_scaled(b, P);
    // base trop proche de 1 : ln b s’annule à la précision de travail
    if lb.is_zero() {
        return Err(Erreur::DivideByZero);
    }
    Ok(arrondi(&(lx * pow10(P) / lb), P))
}

pub fn sin(x: &BigRational, mode: ModeAngle) -> BigRational {
    let (s, _) = sin_cos_scaled(&angle_entree(x, mode, P), P);
    arrondi(&s, P)
}

pub fn cos(x: &BigRational, mode: ModeAngle) -> BigRational {
    let (_, c) = sin_cos_scaled(&angle_entree(x, mode, P), P);
    arrondi(&c, P)
}

pub fn tan(x: &BigRational, mode: ModeAngle) -> Resultat<BigRational> {
    let (s, c) = sin_cos_scaled(&angle_entree(x, mode, P), P);
    if arrondi(&c, P).is_zero() {
        return Err(Erreur::domaine("tangente indéfinie"));
    }
    Ok(arrondi(&(s * pow10(P) / c), P))
}

pub fn atan(x: &BigRational, mode: ModeAngle) -> BigRational {
    let r = atan_scaled(&rational_scaled(x, P), P);
    arrondi(&angle_sortie(r, mode, P), P)
}

fn asin_rad(x: &BigRational) -> Resultat<BigInt> {
    if x.abs() > BigRational::one() {
        return Err(Erreur::domaine("argument hors de [-1, 1]"));
    }
    let demi_pi: BigInt = constante_scaled(Constante::Pi, P) / 2;
    if x.is_one() {
        return Ok(demi_pi);
    }
    if x == &-BigRational::one() {
        return Ok(-demi_pi);
    }
    // asin x = atan(x / √(1 - x²))
    let sc = pow10(P);
    let xs = rational_scaled(x, P);
    let rac = isqrt(&(&sc * &sc - &xs * &xs));
    Ok(atan_scaled(&(xs * &sc / rac), P))
}

pub fn asin(x: &BigRational, mode: ModeAngle) -> Resultat<BigRational> {
    let r = asin_rad(x)?;
    Ok(arrondi(&angle_sortie(r, mode, P), P))
}

pub fn acos(x: &BigRational, mode: ModeAngle) -> Resultat<BigRational> {
    let demi_pi: BigInt = constante_scaled(Constante::Pi, P) / 2;
    let r = demi_pi - asin_rad(x)?;
    Ok(arrondi(&angle_sortie(r, mode, P), P))
}

/// atan2(y, x) ; atan2(0, 0) = 0
pub fn atan2(y: &BigRational, x: &BigRational, mode: ModeAngle) -> BigRational {
    let pi = constante_scaled(Constante::Pi, P);
    let r: BigInt = if x.is_zero() {
        let demi_pi: BigInt = &pi / 2;
        if y.is_positive() {
            demi_pi
        } else if y.is_negative() {
            -demi_pi
        } else {
            BigInt::zero()
        }
    } else {
        let base = atan_scaled(&rational_scaled(&(y / x), P), P);
        if x.is_positive() {
            base
        } else if y.is_negative() {
            base - pi
        } else {
            base + pi
        }
    };
    arrondi(&angle_sortie(r, mode, P), P)
}

/// base^exp exact (exp entier). base nulle avec exp < 0 : à exclure par l’appelant.
pub fn puissance_entiere(base: &BigRational, exp: i64) -> BigRational {
    if exp == 0 {
        return BigRational::one();
    }
    if exp < 0 {
        return puissance_entiere(base, -exp).recip();
    }

    let mut e = exp as u64;
    let mut acc = BigRational::one();
    let mut b = base.clone();

    while e > 0 {
        if (e & 1) == 1 {
            acc *= &b;
        }
        e >>= 1;
        if e > 0 {
            b = &b * &b;
        }
    }
    acc
}

fn exposant_exact(base: &BigRational, b: &BigRational) -> Option<i64> {
    if !b.is_integer() {
        return None;
    }
    let n = b.to_integer().to_i64()?;
    if n.abs() > LIMITE_PUISSANCE_EXACTE {
        return None;
    }
    let bits = base.numer().bits() + base.denom().bits();
    if bits.saturating_mul(n.unsigned_abs()) > 4_000_000 {
        return None;
    }
    Some(n)
}

/// a^b ; exact pour b entier raisonnable, sinon exp(b ln a)
pub fn puissance(a: &BigRational, b: &BigRational) -> Resultat<BigRational> {
    if a.is_zero() {
        return if b.is_positive() {
            Ok(BigRational::zero())
        } else if b.is_zero() {
            Ok(BigRational::one())
        } else {
            Err(Erreur::DivideByZero)
        };
    }
    if let Some(n) = exposant_exact(a, b) {
        return Ok(puissance_entiere(a, n));
    }
    if a.abs().is_one() && b.is_integer() {
        let impair = (b.to_integer() % BigInt::from(2)) != BigInt::zero();
        return Ok(if a.is_negative() && impair {
            -BigRational::one()
        } else {
            BigRational::one()
        });
    }

    let negatif = a.is_negative();
    if negatif && !b.is_integer() {
        return Err(Erreur::domaine("puissance non entière d’un nombre négatif"));
    }

    let sc = pow10(P);
    let l = ln_scaled(&a.abs(), P);
    let y = rational_scaled(b, P) * l / &sc;
    if y > BigInt::from(LIMITE_EXP) * &sc {
        return Err(Erreur::domaine("résultat trop grand"));
    }
    if y < BigInt::from(-LIMITE_EXP) * &sc {
        return Ok(BigRational::zero());
    }
    let mut r = arrondi(&exp_scaled(&y, P), P);
    if negatif && (b.to_integer() % BigInt::from(2)) != BigInt::zero() {
        r = -r;
    }
    Ok(r)
}

/// racine n-ième ; indice nul => DivideByZero ; base négative admise pour n entier impair
pub fn racine_n(a: &BigRational, n: &BigRational) -> Resultat<BigRational> {
    if n.is_zero() {
        return Err(Erreur::DivideByZero);
    }
    if a.is_negative() {
        let impair = n.is_integer() && (n.to_integer() % BigInt::from(2)) != BigInt::zero();
        if !impair {
            return Err(Erreur::domaine("racine paire d’un nombre négatif"));
        }
        return Ok(-puissance(&-a, &n.recip())?);
    }
    puissance(a, &n.recip())
}
