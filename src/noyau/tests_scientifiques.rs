//! Tests scientifiques (campagne) : invariants de la pile + propriétés.
//!
//! But : vérifier les contrats observables sans faire chauffer la machine.
//! - profondeur : opérateur valide => n - arité + résultats ; échec => pile identique
//! - équivalences : infixe (eval) == postfixe (push)
//! - aller-retour : lecture/rendu, getConfig/loadConfig (proptest)
//! - budget temps global sur les campagnes longues

use std::time::{Duration, Instant};

use num_bigint::BigInt;
use num_rational::BigRational;
use proptest::prelude::*;

use super::calculatrice::Calculatrice;
use super::element::ElementPile;
use super::erreur::Erreur;
use super::eval::execute;
use super::options::{Base, ModeAngle, Options};
use super::sauvegarde::ConfigSauvegarde;
use super::unites::Unites;
use super::valeur::Valeur;

fn calc(jetons: &[&str]) -> Calculatrice {
    let mut c = Calculatrice::new();
    c.push_tous(jetons)
        .unwrap_or_else(|e| panic!("jetons={jetons:?} err={e}"));
    c
}

fn sommet(jetons: &[&str]) -> String {
    let c = calc(jetons);
    c.peek(0).unwrap().rendu(c.options())
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Profondeur de pile ------------------------ */

#[test]
fn sci_profondeur_binaires() {
    for op in ["+", "-", "*", "/", "pow", "nroot", "mod", "atan2", "log"] {
        let mut c = calc(&["8", "2", "5"]);
        c.push(op).unwrap_or_else(|e| panic!("op={op} err={e}"));
        assert_eq!(c.size(), 2, "op={op}");
    }
}

#[test]
fn sci_profondeur_echec_inchangee() {
    let cas: &[(&[&str], &str)] = &[
        (&["1"], "+"),
        (&["1", "0"], "/"),
        (&["0"], "inv"),
        (&["-4"], "sqrt"),
        (&["0"], "ln"),
        (&["2"], "asin"),
        (&["1_m", "1_kg"], "-"),
        (&["5"], "eval"),
        (&["1", "2"], "store"),
        (&["'nope'"], "get"),
        (&["1_m", "'kg'"], "convert"),
    ];
    for (avant, op) in cas {
        let mut c = calc(avant);
        let pile = c.to_string_stack();
        assert!(c.push(op).is_err(), "op={op} avant={avant:?}");
        assert_eq!(c.to_string_stack(), pile, "op={op} avant={avant:?}");
        assert_eq!(c.size(), avant.len());
    }
}

#[test]
fn sci_modes_sans_effet_sur_la_pile() {
    for m in ["deg", "rad", "hex", "dec", "oct", "bin"] {
        let c = calc(&["1", "2", m]);
        assert_eq!(c.size(), 2, "mode={m}");
    }
    // idempotence
    let a = calc(&["rad", "deg"]);
    let b = calc(&["rad", "deg", "deg"]);
    assert_eq!(a.options(), b.options());
}

/* ------------------------ Équivalences ------------------------ */

#[test]
fn sci_push_egal_valeurs_preparsees() {
    let a = calc(&["1.5_m", "25_cm", "+"]);
    let x = Valeur::parse("1.5_m").unwrap();
    let y = Valeur::parse("25_cm").unwrap();
    assert_eq!(
        a.peek(0).unwrap(),
        &ElementPile::Numerique(x.ajouter(&y).unwrap())
    );
}

#[test]
fn sci_infixe_egal_postfixe() {
    let paires: &[(&str, &[&str])] = &[
        ("1 + 1", &["1", "1", "+"]),
        ("2 * (3 + 4) - 5", &["2", "3", "4", "+", "*", "5", "-"]),
        ("2 ^ 3 ^ 2", &["2", "3", "2", "pow", "pow"]),
        ("-sqrt(16) / 8", &["16", "sqrt", "neg", "8", "/"]),
        ("atan2(1, 0) + cos(60)", &["1", "0", "atan2", "60", "cos", "+"]),
        ("3_m / 4_cm", &["3_m", "4_cm", "/"]),
    ];
    let base = Calculatrice::new();
    for (infixe, postfixe) in paires {
        let r = execute(infixe, &base).unwrap_or_else(|e| panic!("{infixe:?}: {e}"));
        let mut p = calc(postfixe);
        assert_eq!(r, p.pop(1).unwrap(), "{infixe:?}");
    }
}

#[test]
fn sci_valeurs_de_reference() {
    assert_eq!(sommet(&["30", "sin"]), "0.5");
    assert_eq!(sommet(&["'sin(30)'", "eval"]), "0.5");
    assert_eq!(sommet(&["42", "'mm'", "convert"]), "42_mm");
    assert_eq!(sommet(&["42_mm", "'m'", "convert"]), "0.042_m");
    assert_eq!(sommet(&["3_m", "4_cm", "/"]), "75");
    assert_eq!(sommet(&["3_m", "4", "/"]), "0.75_m");
    assert_eq!(sommet(&["3_m", "4_s", "/"]), "0.75_m/s");
    assert_eq!(sommet(&["2", "0.5", "pow"]), "1.4142135623730950488");
    assert_eq!(sommet(&["1", "3", "/"]), "0.33333333333333333333");
    assert_eq!(sommet(&["1e21"]), "1e+21");
    assert_eq!(sommet(&["2", "70", "pow"]), "1.1805916207174113034e+21");

    let mut c = calc(&["42_mm", "'s'"]);
    assert!(matches!(c.push("convert"), Err(Erreur::IncompatibleUnits(_, _))));
}

#[test]
fn sci_trigo_exacte_aux_angles_remarquables() {
    let cas: &[(&[&str], &str)] = &[
        (&["30", "sin"], "0.5"),
        (&["60", "cos"], "0.5"),
        (&["45", "tan"], "1"),
        (&["180", "sin"], "0"),
        (&["90", "cos"], "0"),
        (&["-30", "sin"], "-0.5"),
        (&["390", "sin"], "0.5"),
        (&["1", "acos"], "0"),
        (&["-1", "asin"], "-90"),
        (&["rad", "pi", "cos"], "-1"),
    ];
    for (jetons, attendu) in cas {
        assert_eq!(sommet(jetons), *attendu, "{jetons:?}");
    }
    let mut c = calc(&["90"]);
    assert!(matches!(c.push("tan"), Err(Erreur::Domain(_))));
}

#[test]
fn sci_identites_numeriques() {
    // sin² + cos² = 1 (arrondi à 40 chiffres)
    for angle in ["17", "1.5", "123.456", "-71"] {
        let c = calc(&[angle, "sin", "2", "pow", angle, "cos", "2", "pow", "+"]);
        assert_eq!(c.to_string_stack(), "1", "angle={angle}");
    }
    // ln(e^x) = x
    assert_eq!(sommet(&["e", "2.5", "pow", "ln"]), "2.5");
    // log2(2^k) = k
    assert_eq!(sommet(&["2", "64", "pow", "log2"]), "64");
}

/* ------------------------ Isolation de eval ------------------------ */

#[test]
fn sci_eval_ne_fuit_pas() {
    let mut c = calc(&["1", "2", "3", "'v'", "store"]);
    let options = *c.options();
    c.push_tous(["'hex; rad; 99; drop; clr; 4'", "eval"]).unwrap();
    assert_eq!(c.options(), &options);
    assert_eq!(c.to_string_stack(), "4\n2\n1");
    assert_eq!(c.variables().len(), 1);
}

#[test]
fn sci_auto_reference_bornee() {
    let t0 = Instant::now();
    let mut c = calc(&["'boucle + 1'", "'boucle'", "store"]);
    let e = c.push_tous(["boucle", "1", "+"]).unwrap_err();
    assert!(matches!(e, Erreur::ParseError(_)));
    assert_eq!(c.size(), 2);
    budget(t0, Duration::from_secs(5));
}

/* ------------------------ Stress contrôlé ------------------------ */

#[test]
fn sci_stress_somme_longue() {
    let t0 = Instant::now();
    let expr = vec!["1/2"; 2000].join(" + ");
    let r = execute(&expr, &Calculatrice::new()).unwrap();
    assert_eq!(r.len(), 1);
    assert_eq!(r[0].rendu(&Options::default()), "1000");
    budget(t0, Duration::from_secs(5));
}

#[test]
fn sci_stress_bigint() {
    let t0 = Instant::now();
    let big = "9".repeat(200);
    let c = calc(&[big.as_str(), "7", "/", "1", "7", "/", "+"]);
    assert_eq!(c.size(), 1);
    assert!(c.to_string_stack().contains("e+199"));
    budget(t0, Duration::from_secs(2));
}

/* ------------------------ Propriétés (proptest) ------------------------ */

fn base_strategie() -> impl Strategy<Value = Base> {
    prop_oneof![Just(Base::BIN), Just(Base::OCT), Just(Base::DEC), Just(Base::HEX)]
}

fn unite_strategie() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![
        Just(None),
        Just(Some("m")),
        Just(Some("cm")),
        Just(Some("s")),
        Just(Some("kg")),
        Just(Some("m/s")),
    ]
}

proptest! {
    #[test]
    fn prop_entier_relu_dans_chaque_base(n in -1_000_000_000_000i64..1_000_000_000_000i64, base in base_strategie()) {
        let v = Valeur::entier(n);
        let texte = v.rendu(base, false);
        let relu = Valeur::parse(&texte).unwrap();
        prop_assert_eq!(relu, v, "texte={}", texte);
    }

    #[test]
    fn prop_decimal_relu_avec_groupement(n in -1_000_000_000i64..1_000_000_000i64, k in 0u32..6, groupe in any::<bool>()) {
        let x = BigRational::new(BigInt::from(n), BigInt::from(10i64.pow(k)));
        let v = Valeur::nombre(x);
        let texte = v.rendu(Base::DEC, groupe);
        let relu = Valeur::parse(&texte).unwrap();
        prop_assert_eq!(relu, v, "texte={}", texte);
    }

    #[test]
    fn prop_config_aller_retour(
        elements in prop::collection::vec((-10_000i64..10_000, 1i64..50, unite_strategie()), 0..8),
        base in base_strategie(),
        radians in any::<bool>(),
        groupe in any::<bool>(),
    ) {
        let mut c = Calculatrice::new();
        for (i, (n, d, u)) in elements.iter().enumerate() {
            let m = BigRational::new(BigInt::from(*n), BigInt::from(*d));
            let v = match u {
                Some(u) => Valeur::avec_unites(m, Unites::parse(u).unwrap()),
                None => Valeur::nombre(m),
            };
            c.push_element(ElementPile::Numerique(v.clone()));
            if i % 3 == 0 {
                c.store(&format!("v{i}"), ElementPile::Numerique(v)).unwrap();
            }
        }
        c.push_element(ElementPile::Expression("v0 * 2".into()));
        let o = c.options_mut();
        o.base = base;
        o.angle_mode = if radians { ModeAngle::Radians } else { ModeAngle::Degrees };
        o.digit_grouping = groupe;

        let json = c.get_config().vers_json().unwrap();
        let relu = ConfigSauvegarde::depuis_json(&json).unwrap();
        let mut d = Calculatrice::new();
        d.load_config(&relu).unwrap();

        prop_assert_eq!(d.elements(), c.elements());
        prop_assert_eq!(d.variables(), c.variables());
        prop_assert_eq!(d.options(), c.options());
        prop_assert_eq!(d.to_string_stack(), c.to_string_stack());
    }
}
