//! Calculatrice RPN : noyau d’évaluation (pile, opérateurs, unités, expressions infixes).
//!
//! L’interface eframe vit dans le binaire (src/main.rs, src/app*).

pub mod noyau;
