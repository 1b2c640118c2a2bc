//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler push/eval sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - longueur bornée
//! - budget temps global
//! - invariant clé : un push qui échoue laisse la pile, les variables et les options intactes

use std::time::{Duration, Instant};

use super::calculatrice::Calculatrice;
use super::erreur::Erreur;
use super::eval::execute;
use super::operateurs::mots_cles_tous;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    fn choix<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.pick(items.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération (bornée) ------------------------ */

const NOMBRES: &[&str] = &[
    "0", "1", "2", "-3", "0.5", "1e3", "2e-4", "0xff", "0b101", "017", "1,000", "true",
    "42_mm", "3_m", "4_cm", "2_s", "1.5_km", "10_m/s", "1_kg", "90", "-1",
];

const EXPRESSIONS: &[&str] = &[
    "'1 + 1'", "'x'", "'sin(30)'", "'2 * y'", "'m'", "'mm'", "'_cm'", "'s'", "'base'",
    "'angleMode'", "'digitGrouping'", "'radians'", "'16'", "'1 +'", "'1; 2'", "'sqrt(-1)'",
];

const NOMS: &[&str] = &["x", "y", "Z"];

fn gen_jeton(rng: &mut Rng, mots: &[&'static str]) -> String {
    match rng.pick(10) {
        0..=3 => rng.choix(NOMBRES).to_string(),
        4..=6 => rng.choix(mots).to_string(),
        7 | 8 => rng.choix(EXPRESSIONS).to_string(),
        _ => {
            let n = rng.choix(NOMS);
            if rng.coin() {
                n.to_string()
            } else {
                format!("'{n}'")
            }
        }
    }
}

fn gen_atome(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => format!("{}", rng.pick(20)),
        1 => "pi".to_string(),
        2 => rng.choix(&["x", "y", "e"]).to_string(),
        3 => format!("{}.{}", rng.pick(10), rng.pick(100)),
        4 => rng.choix(&["3_m", "4_cm", "0"]).to_string(),
        _ => format!("{}", rng.pick(5)),
    }
}

fn gen_infixe(rng: &mut Rng, profondeur: usize) -> String {
    if profondeur == 0 {
        return gen_atome(rng);
    }
    let a = gen_infixe(rng, profondeur - 1);
    match rng.pick(9) {
        0 => gen_atome(rng),
        1 => format!("({a} + {})", gen_infixe(rng, profondeur - 1)),
        2 => format!("({a} - {})", gen_infixe(rng, profondeur - 1)),
        3 => format!("{a} * {}", gen_infixe(rng, profondeur - 1)),
        4 => format!("{a} / {}", gen_infixe(rng, profondeur - 1)),
        5 => format!("-{a}"),
        6 => format!("{}({a})", rng.choix(&["sin", "cos", "sqrt", "ln", "inv", "atan"])),
        7 => format!("atan2({a}, {})", gen_infixe(rng, profondeur - 1)),
        _ => format!("{a} ^ {}", rng.pick(4)),
    }
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_push_tout_ou_rien() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    let mots = mots_cles_tous();
    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut c = Calculatrice::new();

    let mut vus_ok = 0usize;
    let mut vus_err = 0usize;

    for _ in 0..1500 {
        budget(t0, max);

        let jeton = gen_jeton(&mut rng, &mots);
        let avant = c.clone();
        match c.push(&jeton) {
            Ok(()) => vus_ok += 1,
            Err(_) => {
                assert_eq!(c.elements(), avant.elements(), "jeton={jeton:?}");
                assert_eq!(c.variables(), avant.variables(), "jeton={jeton:?}");
                assert_eq!(c.options(), avant.options(), "jeton={jeton:?}");
                vus_err += 1;
            }
        }

        // garde la pile petite
        if c.size() > 12 {
            c.push("clr").unwrap();
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(vus_ok > 100, "trop peu de succès: {vus_ok}");
    assert!(vus_err > 10, "trop peu d’erreurs: {vus_err}");
}

#[test]
fn fuzz_safe_determinisme() {
    let rejoue = || {
        let mots = mots_cles_tous();
        let mut rng = Rng::new(0xBADC0DE_u64);
        let mut c = Calculatrice::new();
        let mut trace = Vec::new();
        for _ in 0..300 {
            let j = gen_jeton(&mut rng, &mots);
            trace.push(c.push(&j).map_err(|e| e.to_string()));
            if c.size() > 12 {
                let _ = c.push("clr");
            }
        }
        (trace, c.to_string_stack())
    };
    assert_eq!(rejoue(), rejoue());
}

#[test]
fn fuzz_safe_infixe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    let mut rng = Rng::new(0x5EED_u64);
    let mut c = Calculatrice::new();
    c.push_tous(["2", "'x'", "store", "0.5", "'y'", "store"]).unwrap();

    let mut vus_ok = 0usize;
    for _ in 0..300 {
        budget(t0, max);

        let expr = gen_infixe(&mut rng, 4);
        match execute(&expr, &c) {
            Ok(r) => {
                assert_eq!(r.len(), 1, "expr={expr:?}");
                vus_ok += 1;
            }
            Err(e) => assert!(
                matches!(
                    e,
                    Erreur::DivideByZero
                        | Erreur::Domain(_)
                        | Erreur::IncompatibleUnits(_, _)
                ),
                "erreur non attendue: expr={expr:?} err={e}"
            ),
        }
    }
    assert!(vus_ok > 50, "trop peu de succès: {vus_ok}");
    // l’appelant n’a pas bougé
    assert_eq!(c.size(), 0);
    assert_eq!(c.variables().len(), 2);
}

#[test]
fn fuzz_safe_texte_arbitraire_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let alphabet: Vec<char> = "0123456789+-*/^(),;._ xyeπ√'abmsk".chars().collect();
    let mut rng = Rng::new(0xFEED_u64);
    let c = Calculatrice::new();

    for _ in 0..2000 {
        budget(t0, max);
        let n = rng.pick(16) as usize;
        let texte: String = (0..n)
            .map(|_| alphabet[rng.pick(alphabet.len() as u32) as usize])
            .collect();
        // seul critère : pas de panique
        let _ = execute(&texte, &c);
        let mut d = c.clone();
        let _ = d.push(&texte);
    }
}
