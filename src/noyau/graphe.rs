// src/noyau/graphe.rs
//
// Échantillonnage d’une expression en x (pour le tracé).
// - compilée une seule fois, rejouée pour chaque x
// - x lié comme variable avant chaque échantillon
// - échantillon en échec ou non numérique => None (la courbe est coupée)

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::ToPrimitive;
use tracing::debug;

use super::calculatrice::Calculatrice;
use super::element::ElementPile;
use super::erreur::{Erreur, Resultat};
use super::eval::Programme;
use super::valeur::Valeur;

pub const VARIABLE_X: &str = "x";

/// `nombre` échantillons régulièrement espacés sur [min_x, max_x] (bornes comprises).
pub fn echantillonner(
    expression: &str,
    calc: &Calculatrice,
    min_x: f64,
    max_x: f64,
    nombre: usize,
) -> Resultat<Vec<(f64, Option<f64>)>> {
    let programme = Programme::compile(expression)?;

    let borne = |v: f64| {
        BigRational::from_float(v)
            .ok_or_else(|| Erreur::operande(format!("borne non finie: {v}")))
    };
    let a = borne(min_x)?;
    let b = borne(max_x)?;
    if nombre < 2 || a >= b {
        return Err(Erreur::operande("intervalle d’échantillonnage vide"));
    }

    let pas = (&b - &a) / BigRational::from_integer(BigInt::from(nombre - 1));
    let mut base = calc.clone_sans_pile();

    let mut points = Vec::with_capacity(nombre);
    let mut trous = 0usize;
    for i in 0..nombre {
        let x = &a + &pas * BigRational::from_integer(BigInt::from(i));
        let xf = x.to_f64().unwrap_or(f64::NAN);
        base.store(VARIABLE_X, ElementPile::Numerique(Valeur::nombre(x)))?;

        let y = match programme.execute(&base).as_deref() {
            Ok([ElementPile::Numerique(v)]) => v.magnitude.to_f64().filter(|y| y.is_finite()),
            _ => None,
        };
        if y.is_none() {
            trous += 1;
        }
        points.push((xf, y));
    }

    debug!(expression, nombre, trous, "échantillonnage");
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn droite() {
        let c = Calculatrice::new();
        let p = echantillonner("2*x + 1", &c, 0.0, 4.0, 5).unwrap();
        let ys: Vec<f64> = p.iter().map(|(_, y)| y.unwrap()).collect();
        assert_eq!(ys, vec![1.0, 3.0, 5.0, 7.0, 9.0]);
        assert_eq!(p[4].0, 4.0);
    }

    #[test]
    fn trous_hors_domaine() {
        let c = Calculatrice::new();
        let p = echantillonner("sqrt(x)", &c, -1.0, 1.0, 3).unwrap();
        assert_eq!(p[0].1, None);
        assert_eq!(p[1].1, Some(0.0));
        assert_eq!(p[2].1, Some(1.0));

        let p = echantillonner("1/x", &c, -1.0, 1.0, 3).unwrap();
        assert_eq!(p[1].1, None);
    }

    #[test]
    fn variables_et_mode_de_l_appelant() {
        let mut c = Calculatrice::new();
        c.push_tous(["10", "'k'", "store"]).unwrap();
        let p = echantillonner("k*x; x", &c, 0.0, 1.0, 2).unwrap();
        // deux résultats : pas une valeur unique
        assert!(p.iter().all(|(_, y)| y.is_none()));

        let p = echantillonner("k*sin(x)", &c, 0.0, 90.0, 2).unwrap();
        assert_eq!(p[1].1, Some(10.0));
        assert!(c.variable("x").is_none());
    }

    #[test]
    fn entrees_invalides() {
        let c = Calculatrice::new();
        assert!(matches!(
            echantillonner("x +", &c, 0.0, 1.0, 10),
            Err(Erreur::ParseError(_))
        ));
        assert!(echantillonner("x", &c, 1.0, 0.0, 10).is_err());
        assert!(echantillonner("x", &c, 0.0, 1.0, 1).is_err());
        assert!(echantillonner("x", &c, f64::NAN, 1.0, 10).is_err());
    }
}
