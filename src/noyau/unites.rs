// src/noyau/unites.rs
//
// Registre d’unités + algèbre des unités
// --------------------------------------
// - Table statique générée une seule fois : préfixes SI (yotta…yocto) × grandeurs de base
// - Multiplicateurs EXACTS (rationnels) vers l’unité canonique du genre
// - Unites : produit ordonné de facteurs (alias, exposant), ex: "m/s^2", "1/m", "m*s"
//
// Règles:
// - lookup exact, sensible à la casse (pas d’inférence de préfixe hors table)
// - addition/soustraction : même signature dimensionnelle exigée
// - multiplication/division : facteurs du même genre fusionnés (m / cm => 100, sans unité)

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use super::erreur::{Erreur, Resultat};
use super::precision::{puissance_entiere, rad_vers_deg};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Genre {
    Longueur,
    Duree,
    Masse,
    Information,
    Angle,
    SansDimension,
}

#[derive(Clone, Debug)]
pub struct Unite {
    pub alias: String,
    pub nom: String,
    pub genre: Genre,
    /// Multiplicateur vers l’unité canonique du genre (m, s, g, bit, degré, 1).
    pub multiplicateur: BigRational,
}

/* ------------------------ Table (générée une fois) ------------------------ */

/// (symbole, nom, puissance de 10)
const PREFIXES_SI: [(&str, &str, i32); 21] = [
    ("Y", "yotta", 24),
    ("Z", "zetta", 21),
    ("E", "exa", 18),
    ("P", "peta", 15),
    ("T", "tera", 12),
    ("G", "giga", 9),
    ("M", "mega", 6),
    ("k", "kilo", 3),
    ("h", "hecto", 2),
    ("da", "deca", 1),
    ("", "", 0),
    ("d", "deci", -1),
    ("c", "centi", -2),
    ("m", "milli", -3),
    ("u", "micro", -6),
    ("n", "nano", -9),
    ("p", "pico", -12),
    ("f", "femto", -15),
    ("a", "atto", -18),
    ("z", "zepto", -21),
    ("y", "yocto", -24),
];

fn rat(n: i64, d: i64) -> BigRational {
    BigRational::new(BigInt::from(n), BigInt::from(d))
}

fn puissance_dix(n: i32) -> BigRational {
    puissance_entiere(&BigRational::from_integer(BigInt::from(10)), n as i64)
}

fn ajoute(table: &mut Vec<Unite>, alias: &str, nom: &str, genre: Genre, mult: BigRational) {
    table.push(Unite {
        alias: alias.to_string(),
        nom: nom.to_string(),
        genre,
        multiplicateur: mult,
    });
}

fn ajoute_si(table: &mut Vec<Unite>, suffixe: &str, nom: &str, genre: Genre) {
    ajoute_si_fois(table, suffixe, nom, genre, &BigRational::one());
}

fn ajoute_si_fois(
    table: &mut Vec<Unite>,
    suffixe: &str,
    nom: &str,
    genre: Genre,
    base: &BigRational,
) {
    for (p, pnom, exp) in PREFIXES_SI {
        ajoute(
            table,
            &format!("{p}{suffixe}"),
            &format!("{pnom}{nom}"),
            genre,
            base * puissance_dix(exp),
        );
    }
}

fn construit_registre() -> Vec<Unite> {
    let mut t = Vec::with_capacity(140);

    // Longueur (mètres)
    ajoute(&mut t, "in", "inches", Genre::Longueur, rat(254, 10000));
    ajoute(&mut t, "ft", "feet", Genre::Longueur, rat(3048, 10000));
    ajoute(&mut t, "yd", "yards", Genre::Longueur, rat(9144, 10000));
    ajoute(&mut t, "mi", "miles", Genre::Longueur, rat(1609344, 1000));
    ajoute_si(&mut t, "m", "meters", Genre::Longueur);

    // Durée (secondes)
    ajoute(&mut t, "min", "minutes", Genre::Duree, rat(60, 1));
    ajoute(&mut t, "h", "hours", Genre::Duree, rat(3600, 1));
    ajoute(&mut t, "day", "days", Genre::Duree, rat(86400, 1));
    ajoute_si(&mut t, "s", "seconds", Genre::Duree);

    // Masse (grammes)
    ajoute(&mut t, "lb", "pounds", Genre::Masse, rat(45359237, 100000));
    ajoute(&mut t, "oz", "ounces", Genre::Masse, rat(28349523125, 1000000000));
    ajoute_si(&mut t, "g", "grams", Genre::Masse);

    // Information (bits)
    ajoute_si(&mut t, "b", "bits", Genre::Information);
    ajoute_si_fois(&mut t, "B", "bytes", Genre::Information, &rat(8, 1));

    // Angle (degrés) ; le radian passe par π arrondi
    ajoute(&mut t, "deg", "degrees", Genre::Angle, BigRational::one());
    ajoute(&mut t, "grad", "gradians", Genre::Angle, rat(9, 10));
    ajoute(&mut t, "rad", "radians", Genre::Angle, rad_vers_deg(&BigRational::one()));

    // Sans dimension
    ajoute(&mut t, "pct", "percent", Genre::SansDimension, rat(1, 100));
    ajoute(&mut t, "ppm", "parts per million", Genre::SansDimension, rat(1, 1000000));
    ajoute(&mut t, "ppb", "parts per billion", Genre::SansDimension, rat(1, 1000000000));

    t
}

static REGISTRE: OnceLock<Vec<Unite>> = OnceLock::new();

/// Table complète (lecture seule, process entier).
pub fn registre() -> &'static [Unite] {
    REGISTRE.get_or_init(construit_registre)
}

/// Recherche exacte (sensible à la casse).
pub fn lookup(alias: &str) -> Option<&'static Unite> {
    registre().iter().find(|u| u.alias == alias)
}

fn unite_ou_erreur(alias: &str) -> Resultat<&'static Unite> {
    lookup(alias).ok_or_else(|| Erreur::InvalidUnit(alias.to_string()))
}

/// Conversion d’une valeur entre deux expressions d’unités (alias simples inclus).
/// - alias identiques => no-op
/// - genres différents => IncompatibleUnits
pub fn convert(valeur: &BigRational, de: &str, vers: &str) -> Resultat<BigRational> {
    if de == vers {
        Unites::parse(de)?;
        return Ok(valeur.clone());
    }
    let u_de = Unites::parse(de)?;
    let u_vers = Unites::parse(vers)?;
    Ok(valeur * u_de.facteur_vers(&u_vers)?)
}

/* ------------------------ Expression d’unités ------------------------ */

/// Produit ordonné de facteurs (alias, exposant non nul).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Unites {
    facteurs: Vec<(String, i32)>,
}

impl Unites {
    pub fn aucune() -> Self {
        Self::default()
    }

    pub fn est_vide(&self) -> bool {
        self.facteurs.is_empty()
    }

    /// Lit "m", "m/s", "m*s", "m/s^2", "1/m", "kg*m/s^2".
    pub fn parse(texte: &str) -> Resultat<Self> {
        let s = texte.trim();
        if s.is_empty() {
            return Err(Erreur::InvalidUnit(texte.to_string()));
        }

        let mut out = Unites::aucune();
        for (i, partie) in s.split('/').enumerate() {
            let signe = if i == 0 { 1 } else { -1 };
            let partie = partie.trim();

            // "1/m" : numérateur vide
            if i == 0 && partie == "1" {
                continue;
            }

            for facteur in partie.split('*') {
                let (alias, exp) = lire_facteur(facteur.trim(), texte)?;
                unite_ou_erreur(alias)?;
                out.fusionne_alias(alias, signe * exp);
            }
        }

        if out.est_vide() {
            return Err(Erreur::InvalidUnit(texte.to_string()));
        }
        Ok(out)
    }

    /// Alias simple (utile pour les tests et le rendu).
    pub fn alias(&self) -> Option<&str> {
        match self.facteurs.as_slice() {
            [(a, 1)] => Some(a.as_str()),
            _ => None,
        }
    }

    fn fusionne_alias(&mut self, alias: &str, exp: i32) {
        if let Some(pos) = self.facteurs.iter().position(|(a, _)| a == alias) {
            self.facteurs[pos].1 += exp;
            if self.facteurs[pos].1 == 0 {
                self.facteurs.remove(pos);
            }
        } else if exp != 0 {
            self.facteurs.push((alias.to_string(), exp));
        }
    }

    /// Signature dimensionnelle : genre -> exposant (exposants nuls retirés).
    pub fn signature(&self) -> BTreeMap<Genre, i32> {
        let mut sig = BTreeMap::new();
        for (alias, exp) in &self.facteurs {
            if let Some(u) = lookup(alias) {
                *sig.entry(u.genre).or_insert(0) += exp;
            }
        }
        sig.retain(|_, e| *e != 0);
        sig
    }

    /// Produit des multiplicateurs (vers les unités canoniques).
    pub fn multiplicateur(&self) -> BigRational {
        let mut m = BigRational::one();
        for (alias, exp) in &self.facteurs {
            if let Some(u) = lookup(alias) {
                m *= puissance_entiere(&u.multiplicateur, *exp as i64);
            }
        }
        m
    }

    pub fn meme_genre(&self, autre: &Unites) -> bool {
        self.signature() == autre.signature()
    }

    /// Facteur f tel que: valeur_dans(self) * f = valeur_dans(cible).
    pub fn facteur_vers(&self, cible: &Unites) -> Resultat<BigRational> {
        if self == cible {
            return Ok(BigRational::one());
        }
        if !self.meme_genre(cible) {
            return Err(Erreur::IncompatibleUnits(self.to_string(), cible.to_string()));
        }
        Ok(self.multiplicateur() / cible.multiplicateur())
    }

    /// self * autre => (unités, facteur d’échelle à appliquer au produit des magnitudes).
    pub fn multiplier(&self, autre: &Unites) -> (Unites, BigRational) {
        self.combine(autre, 1)
    }

    /// self / autre => (unités, facteur d’échelle à appliquer au quotient des magnitudes).
    pub fn diviser(&self, autre: &Unites) -> (Unites, BigRational) {
        self.combine(autre, -1)
    }

    fn combine(&self, autre: &Unites, signe: i32) -> (Unites, BigRational) {
        let mut acc = self.clone();
        let mut echelle = BigRational::one();

        for (alias_b, exp_b) in &autre.facteurs {
            let exp_b = signe * exp_b;
            let Some(ub) = lookup(alias_b) else {
                continue;
            };

            // même alias d’abord, sinon premier facteur du même genre
            let cible = acc
                .facteurs
                .iter()
                .position(|(a, _)| a == alias_b)
                .or_else(|| {
                    acc.facteurs
                        .iter()
                        .position(|(a, _)| lookup(a).is_some_and(|u| u.genre == ub.genre))
                });

            match cible {
                Some(pos) => {
                    let alias_a = acc.facteurs[pos].0.clone();
                    if let Some(ua) = lookup(&alias_a) {
                        let ratio = &ub.multiplicateur / &ua.multiplicateur;
                        echelle *= puissance_entiere(&ratio, exp_b as i64);
                    }
                    acc.fusionne_alias(&alias_a, exp_b);
                }
                None => acc.fusionne_alias(alias_b, exp_b),
            }
        }

        (acc, echelle)
    }
}

fn lire_facteur<'a>(facteur: &'a str, texte: &str) -> Resultat<(&'a str, i32)> {
    let (alias, exp) = match facteur.split_once('^') {
        Some((a, e)) => {
            let n = e
                .trim()
                .parse::<i32>()
                .map_err(|_| Erreur::InvalidUnit(texte.to_string()))?;
            (a.trim(), n)
        }
        None => (facteur, 1),
    };
    if alias.is_empty() || exp == 0 {
        return Err(Erreur::InvalidUnit(texte.to_string()));
    }
    Ok((alias, exp))
}

impl fmt::Display for Unites {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn ecrit(parts: &[(&String, i32)]) -> String {
            parts
                .iter()
                .map(|(a, e)| {
                    if *e == 1 {
                        (*a).clone()
                    } else {
                        format!("{a}^{e}")
                    }
                })
                .collect::<Vec<_>>()
                .join("*")
        }

        let num: Vec<(&String, i32)> = self
            .facteurs
            .iter()
            .filter(|(_, e)| *e > 0)
            .map(|(a, e)| (a, *e))
            .collect();
        let den: Vec<(&String, i32)> = self
            .facteurs
            .iter()
            .filter(|(_, e)| *e < 0)
            .map(|(a, e)| (a, -*e))
            .collect();

        match (num.is_empty(), den.is_empty()) {
            (true, true) => Ok(()),
            (false, true) => write!(f, "{}", ecrit(&num)),
            (true, false) => write!(f, "1/{}", ecrit(&den)),
            (false, false) => write!(f, "{}/{}", ecrit(&num), ecrit(&den)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn table_generee_prefixes_si() {
        let km = lookup("km").unwrap();
        assert_eq!(km.genre, Genre::Longueur);
        assert_eq!(km.multiplicateur, r(1000, 1));

        let ym = lookup("ym").unwrap();
        assert_eq!(ym.nom, "yoctometers");

        assert_eq!(lookup("us").unwrap().genre, Genre::Duree);
        assert_eq!(lookup("kg").unwrap().genre, Genre::Masse);
    }

    #[test]
    fn information_et_angle() {
        assert_eq!(lookup("kB").unwrap().genre, Genre::Information);
        assert_eq!(convert(&r(1, 1), "kB", "b").unwrap(), r(8000, 1));
        assert_eq!(convert(&r(16, 1), "Mb", "MB").unwrap(), r(2, 1));
        assert!(lookup("Kb").is_none());

        assert_eq!(convert(&r(100, 1), "grad", "deg").unwrap(), r(90, 1));
        let un_rad = convert(&r(1, 1), "rad", "deg").unwrap();
        assert!(un_rad > r(57, 1) && un_rad < r(58, 1));
        assert!(matches!(
            convert(&r(1, 1), "rad", "B"),
            Err(Erreur::IncompatibleUnits(_, _))
        ));
    }

    #[test]
    fn aliases_uniques() {
        let t = registre();
        for (i, u) in t.iter().enumerate() {
            assert!(
                t[i + 1..].iter().all(|v| v.alias != u.alias),
                "alias en double: {}",
                u.alias
            );
        }
    }

    #[test]
    fn lookup_sensible_casse() {
        assert!(lookup("Mm").is_some());
        assert!(lookup("MM").is_none());
        assert!(lookup("meters").is_none());
    }

    #[test]
    fn convert_mm_vers_m() {
        let v = convert(&r(42, 1), "mm", "m").unwrap();
        assert_eq!(v, r(42, 1000));
    }

    #[test]
    fn convert_identique_noop() {
        assert_eq!(convert(&r(7, 1), "ft", "ft").unwrap(), r(7, 1));
    }

    #[test]
    fn convert_genres_differents() {
        let e = convert(&r(42, 1), "mm", "s").unwrap_err();
        assert!(matches!(e, Erreur::IncompatibleUnits(_, _)));
    }

    #[test]
    fn convert_unite_inconnue() {
        let e = convert(&r(1, 1), "mm", "furlong").unwrap_err();
        assert_eq!(e, Erreur::InvalidUnit("furlong".into()));
    }

    #[test]
    fn convert_imperial() {
        assert_eq!(convert(&r(1, 1), "ft", "in").unwrap(), r(12, 1));
        assert_eq!(convert(&r(1, 1), "mi", "ft").unwrap(), r(5280, 1));
    }

    #[test]
    fn convert_compose_vitesse() {
        // 1 m/s = 3.6 km/h
        assert_eq!(convert(&r(1, 1), "m/s", "km/h").unwrap(), r(18, 5));
    }

    #[test]
    fn parse_et_affiche() {
        for s in ["m", "m/s", "m*s", "1/m", "m/s^2", "kg*m/s^2"] {
            assert_eq!(Unites::parse(s).unwrap().to_string(), s);
        }
        assert_eq!(Unites::parse("m*m").unwrap().to_string(), "m^2");
    }

    #[test]
    fn parse_refuse_vide_et_inconnu() {
        assert!(Unites::parse("").is_err());
        assert!(Unites::parse("m/").is_err());
        assert!(Unites::parse("m^0").is_err());
        assert!(Unites::parse("parsec").is_err());
    }

    #[test]
    fn division_meme_genre_annule() {
        let m = Unites::parse("m").unwrap();
        let cm = Unites::parse("cm").unwrap();
        let (u, echelle) = m.diviser(&cm);
        assert!(u.est_vide());
        assert_eq!(echelle, r(100, 1));
    }

    #[test]
    fn multiplication_genres_differents() {
        let m = Unites::parse("m").unwrap();
        let s = Unites::parse("s").unwrap();
        let (u, echelle) = m.multiplier(&s);
        assert_eq!(u.to_string(), "m*s");
        assert!(echelle.is_one());

        let (u, _) = Unites::aucune().diviser(&m);
        assert_eq!(u.to_string(), "1/m");
    }

    #[test]
    fn multiplication_meme_genre_convertit_vers_premier() {
        // 1 m * 1 cm = 0.01 m^2
        let m = Unites::parse("m").unwrap();
        let cm = Unites::parse("cm").unwrap();
        let (u, echelle) = m.multiplier(&cm);
        assert_eq!(u.to_string(), "m^2");
        assert_eq!(echelle, r(1, 100));
    }
}
