//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir la ligne d’entrée, la calculatrice, le dernier message d’erreur
//! et le tracé courant ; offrir les actions (valider, C, AC, tracer) sans logique d’affichage.
//!
//! Contrats :
//! - Aucune arithmétique ici : tout passe par `Calculatrice::push`.
//! - Une ligne est découpée en jetons (les 'expressions' entre quotes restent entières),
//!   poussés dans l’ordre ; au premier échec, les jetons déjà poussés restent.

use calculatrice_rpn::noyau::graphe;
use calculatrice_rpn::noyau::{Calculatrice, ConfigSauvegarde};
use tracing::{info, warn};

/// Clé du stockage eframe (JSON de getConfig).
pub const CLE_STOCKAGE: &str = "calculatrice_rpn.config";

/// Nombre d’échantillons du tracé.
pub const ECHANTILLONS_TRACE: usize = 200;

#[derive(Clone, Debug)]
pub struct Trace {
    pub expression: String,
    pub min_x: f64,
    pub max_x: f64,
    pub points: Vec<(f64, Option<f64>)>,
}

impl Default for Trace {
    fn default() -> Self {
        Self {
            expression: String::new(),
            min_x: -10.0,
            max_x: 10.0,
            points: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- noyau ---
    pub calc: Calculatrice,

    // --- sorties ---
    pub erreur: String,
    pub trace: Trace,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            entree: String::new(),
            calc: Calculatrice::new(),
            erreur: String::new(),
            trace: Trace::default(),
            focus_entree: true,
        }
    }
}

/// Découpe une ligne en jetons (espaces), sans couper l’intérieur des quotes.
/// Une quote non refermée garde le reste de la ligne dans le même jeton.
pub fn decoupe_entree(ligne: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut courant = String::new();
    let mut dans_quotes = false;

    for c in ligne.chars() {
        match c {
            '\'' => {
                dans_quotes = !dans_quotes;
                courant.push(c);
            }
            c if c.is_whitespace() && !dans_quotes => {
                if !courant.is_empty() {
                    out.push(std::mem::take(&mut courant));
                }
            }
            _ => courant.push(c),
        }
    }
    if !courant.is_empty() {
        out.push(courant);
    }
    out
}

impl AppCalc {
    /// Restaure l’état sauvegardé ; un instantané illisible est ignoré (état neuf).
    pub fn depuis_stockage(storage: Option<&dyn eframe::Storage>) -> Self {
        let mut app = Self::default();
        if let Some(json) = storage.and_then(|s| s.get_string(CLE_STOCKAGE)) {
            if let Err(e) = app.charger_config(&json) {
                warn!(erreur = %e, "configuration sauvegardée ignorée");
            }
        }
        app
    }

    pub fn charger_config(&mut self, json: &str) -> calculatrice_rpn::noyau::Resultat<()> {
        let config = ConfigSauvegarde::depuis_json(json)?;
        self.calc.load_config(&config)?;
        info!(elements = self.calc.size(), "configuration restaurée");
        Ok(())
    }

    pub fn vers_config(&self) -> Option<String> {
        match self.calc.get_config().vers_json() {
            Ok(json) => Some(json),
            Err(e) => {
                warn!(erreur = %e, "sauvegarde impossible");
                None
            }
        }
    }

    /* ------------------------ Actions ------------------------ */

    /// Enter / "=" : pousse les jetons de la ligne.
    /// Ligne vide : `dup` du sommet, comme sur les calculatrices RPN.
    pub fn valider(&mut self) {
        let jetons = decoupe_entree(&self.entree);
        let jetons = if jetons.is_empty() {
            vec!["dup".to_string()]
        } else {
            jetons
        };

        self.erreur.clear();
        for j in &jetons {
            if let Err(e) = self.calc.push(j) {
                warn!(jeton = %j, erreur = %e, "jeton refusé");
                self.set_erreur(format!("{j} : {e}"));
                return;
            }
        }
        self.entree.clear();
        self.focus_entree = true;
    }

    /// Bouton d’opérateur : la ligne en cours est poussée d’abord.
    pub fn appliquer(&mut self, mot_cle: &str) {
        if !self.entree.trim().is_empty() {
            self.entree.push(' ');
        }
        self.entree.push_str(mot_cle);
        self.valider();
    }

    /// C : effacer seulement l’entrée.
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// AC : calculatrice neuve (pile, variables, options) + entrée + tracé.
    pub fn reset_total(&mut self) {
        *self = Self::default();
    }

    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.erreur = msg.into();
        self.focus_entree = true;
    }

    /// Mots-clés et variables commençant par le dernier jeton de l’entrée.
    pub fn completions(&self) -> Vec<String> {
        let prefixe = match self.entree.rsplit(char::is_whitespace).next() {
            Some(p) if !p.is_empty() && !p.starts_with('\'') => p.to_lowercase(),
            _ => return Vec::new(),
        };

        let mots = self.calc.auto_completes().into_iter().map(str::to_string);
        let vars = self.calc.variables().keys().cloned();
        mots.chain(vars)
            .filter(|m| m.to_lowercase().starts_with(&prefixe) && m.to_lowercase() != prefixe)
            .collect()
    }

    /// Remplace le dernier jeton de l’entrée par `mot`.
    pub fn completer(&mut self, mot: &str) {
        let garde = self
            .entree
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        self.entree.truncate(garde);
        self.entree.push_str(mot);
        self.focus_entree = true;
    }

    /// Échantillonne l’expression du tracé avec les variables et options courantes.
    pub fn tracer(&mut self) {
        let t = &mut self.trace;
        match graphe::echantillonner(
            &t.expression,
            &self.calc,
            t.min_x,
            t.max_x,
            ECHANTILLONS_TRACE,
        ) {
            Ok(points) => {
                t.points = points;
                self.erreur.clear();
            }
            Err(e) => {
                warn!(expression = %t.expression, erreur = %e, "tracé impossible");
                t.points.clear();
                self.set_erreur(format!("tracé : {e}"));
            }
        }
    }
}
