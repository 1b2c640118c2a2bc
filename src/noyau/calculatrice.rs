// src/noyau/calculatrice.rs
//
// État de la calculatrice : pile + variables + options
// ----------------------------------------------------
// push(jeton) : opérateur -> variable -> 'expression' -> nombre
//
// Règles:
// - tout-ou-rien : un opérateur qui échoue laisse l’état intact
//   (les opérateurs consultent, calculent, puis remplacent)
// - un nom de variable ne masque jamais un mot-clé d’opérateur
// - les éléments Expression se résolvent par le compilateur, profondeur bornée
// - chaque push réussi est annulable (undo / redo), sauf dans un contexte d’évaluation

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::element::ElementPile;
use super::erreur::{Erreur, Resultat};
use super::eval;
use super::format::format_exact;
use super::historique::{Historique, Instantane};
use super::operateurs::{self, Operateur};
use super::options::{
    Base, ModeAngle, Options, OPTION_ANGLE_MODE, OPTION_BASE, OPTION_DIGIT_GROUPING,
};
use super::sauvegarde::ConfigSauvegarde;
use super::valeur::Valeur;

/// profondeur maximale d’imbrication des évaluations
pub const PROFONDEUR_MAX: usize = 64;

#[derive(Clone, Debug, Default)]
pub struct Calculatrice {
    pile: Vec<ElementPile>,
    variables: BTreeMap<String, ElementPile>,
    options: Options,
    profondeur: usize,
    // None dans les contextes d’évaluation
    historique: Option<Historique>,
}

impl Calculatrice {
    pub fn new() -> Self {
        Self {
            historique: Some(Historique::default()),
            ..Self::default()
        }
    }

    /* ------------------------ push ------------------------ */

    pub fn push(&mut self, jeton: &str) -> Resultat<()> {
        let t = jeton.trim();
        if t.is_empty() {
            return Err(Erreur::parse("jeton vide"));
        }

        let op = Operateur::trouve(t);
        if let Some(op @ (Operateur::Annuler | Operateur::Retablir)) = op {
            debug!(jeton = t, operateur = ?op, "historique");
            return op.execute(self);
        }

        let avant = self.historique.is_some().then(|| self.instantane());
        self.applique(t, op)?;
        if let (Some(h), Some(avant)) = (self.historique.as_mut(), avant) {
            h.enregistre(avant);
        }
        Ok(())
    }

    fn applique(&mut self, t: &str, op: Option<Operateur>) -> Resultat<()> {
        if let Some(op) = op {
            debug!(jeton = t, operateur = ?op, "opérateur");
            return op.execute(self);
        }

        if let Some(v) = self.variables.get(t) {
            trace!(nom = t, "variable");
            self.pile.push(v.clone());
            return Ok(());
        }

        if let Some(e) = ElementPile::depuis_quotes(t) {
            self.pile.push(e);
            return Ok(());
        }

        let v = Valeur::parse(t)?;
        self.pile.push(ElementPile::Numerique(v));
        Ok(())
    }

    /// Jetons poussés strictement dans l’ordre ; ceux déjà appliqués restent en cas d’échec.
    pub fn push_tous<I, S>(&mut self, jetons: I) -> Resultat<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for j in jetons {
            self.push(j.as_ref())?;
        }
        Ok(())
    }

    /// Élément déjà résolu : poussé tel quel.
    pub fn push_element(&mut self, e: ElementPile) {
        self.pile.push(e);
    }

    /* ------------------------ pile ------------------------ */

    /// Retire `nombre` éléments, rendus du plus ancien au plus récent.
    pub fn pop(&mut self, nombre: usize) -> Resultat<Vec<ElementPile>> {
        self.consulte(nombre)?;
        let debut = self.pile.len() - nombre;
        Ok(self.pile.split_off(debut))
    }

    /// 0 = sommet
    pub fn peek(&self, depuis_sommet: usize) -> Resultat<&ElementPile> {
        let n = self.pile.len();
        if depuis_sommet >= n {
            return Err(Erreur::StackUnderflow {
                requis: depuis_sommet + 1,
                presents: n,
            });
        }
        Ok(&self.pile[n - 1 - depuis_sommet])
    }

    pub fn size(&self) -> usize {
        self.pile.len()
    }

    pub fn elements(&self) -> &[ElementPile] {
        &self.pile
    }

    /// Les `nombre` éléments du sommet (plus ancien d’abord), sans les retirer.
    pub(crate) fn consulte(&self, nombre: usize) -> Resultat<&[ElementPile]> {
        let n = self.pile.len();
        if nombre > n {
            return Err(Erreur::StackUnderflow {
                requis: nombre,
                presents: n,
            });
        }
        Ok(&self.pile[n - nombre..])
    }

    /// Remplace les `nombre` éléments du sommet (déjà validés par `consulte`).
    pub(crate) fn remplace(&mut self, nombre: usize, resultats: Vec<ElementPile>) {
        let n = self.pile.len();
        self.pile.truncate(n.saturating_sub(nombre));
        self.pile.extend(resultats);
    }

    pub(crate) fn vide(&mut self) {
        self.pile.clear();
    }

    /* ------------------------ historique ------------------------ */

    fn instantane(&self) -> Instantane {
        Instantane {
            pile: self.pile.clone(),
            variables: self.variables.clone(),
            options: self.options,
        }
    }

    fn restaure(&mut self, e: Instantane) {
        self.pile = e.pile;
        self.variables = e.variables;
        self.options = e.options;
    }

    /// Revient à l’état d’avant le dernier push réussi.
    pub fn undo(&mut self) -> Resultat<()> {
        let courant = self.instantane();
        let precedent = self
            .historique
            .as_mut()
            .and_then(|h| h.annule(courant))
            .ok_or(Erreur::NothingToUndo)?;
        self.restaure(precedent);
        Ok(())
    }

    pub fn redo(&mut self) -> Resultat<()> {
        let courant = self.instantane();
        let suivant = self
            .historique
            .as_mut()
            .and_then(|h| h.retablit(courant))
            .ok_or(Erreur::NothingToRedo)?;
        self.restaure(suivant);
        Ok(())
    }

    /// (annulables, rétablissables)
    pub fn historique(&self) -> (usize, usize) {
        self.historique
            .as_ref()
            .map_or((0, 0), |h| (h.annulables(), h.retablissables()))
    }

    /* ------------------------ variables ------------------------ */

    pub fn store(&mut self, nom: &str, element: ElementPile) -> Resultat<()> {
        let nom = nom.trim();
        if nom.is_empty() {
            return Err(Erreur::operande("nom de variable vide"));
        }
        if let Some(op) = Operateur::trouve(nom) {
            trace!(nom, operateur = ?op, "collision");
            return Err(Erreur::NameCollision(nom.to_string()));
        }
        self.variables.insert(nom.to_string(), element);
        Ok(())
    }

    pub fn variable(&self, nom: &str) -> Option<&ElementPile> {
        self.variables.get(nom)
    }

    pub fn variables(&self) -> &BTreeMap<String, ElementPile> {
        &self.variables
    }

    /* ------------------------ options ------------------------ */

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub(crate) fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn get_option(&self, nom: &str) -> Resultat<ElementPile> {
        let o = &self.options;
        match nom {
            OPTION_BASE => Ok(Valeur::entier(o.base.valeur() as i64).into()),
            OPTION_ANGLE_MODE => Ok(ElementPile::Expression(o.angle_mode.nom().to_string())),
            OPTION_DIGIT_GROUPING => Ok(Valeur::entier(o.digit_grouping as i64).into()),
            _ => Err(Erreur::OptionNotFound(nom.to_string())),
        }
    }

    /// Valide entièrement avant de modifier.
    pub fn set_option(&mut self, nom: &str, valeur: &ElementPile) -> Resultat<()> {
        let texte = texte_option(valeur)?;
        let invalide = || Erreur::InvalidOption(format!("{nom} = {texte}"));

        match nom {
            OPTION_BASE => {
                let b = texte
                    .parse::<u32>()
                    .map_err(|_| invalide())
                    .and_then(Base::try_from)?;
                self.options.base = b;
            }
            OPTION_ANGLE_MODE => {
                self.options.angle_mode = ModeAngle::depuis_texte(&texte).ok_or_else(invalide)?;
            }
            OPTION_DIGIT_GROUPING => {
                self.options.digit_grouping = match texte.to_lowercase().as_str() {
                    "1" | "true" => true,
                    "0" | "false" => false,
                    _ => return Err(invalide()),
                };
            }
            _ => return Err(Erreur::InvalidOption(nom.to_string())),
        }
        debug!(option = nom, valeur = %texte, "option modifiée");
        Ok(())
    }

    /* ------------------------ divers ------------------------ */

    /// Union des mots-clés de tous les opérateurs.
    pub fn auto_completes(&self) -> Vec<&'static str> {
        operateurs::mots_cles_tous()
    }

    pub fn get_config(&self) -> ConfigSauvegarde {
        ConfigSauvegarde {
            stack: self.pile.iter().map(ElementPile::vers_sauve).collect(),
            variables: self
                .variables
                .iter()
                .map(|(k, v)| (k.clone(), v.vers_sauve()))
                .collect(),
            options: self.options,
        }
    }

    /// Tout l’instantané est validé avant de remplacer l’état.
    pub fn load_config(&mut self, config: &ConfigSauvegarde) -> Resultat<()> {
        let pile = config
            .stack
            .iter()
            .map(ElementPile::depuis_sauve)
            .collect::<Resultat<Vec<_>>>()?;

        let mut variables = BTreeMap::new();
        for (nom, s) in &config.variables {
            if Operateur::trouve(nom).is_some() {
                return Err(Erreur::NameCollision(nom.clone()));
            }
            variables.insert(nom.clone(), ElementPile::depuis_sauve(s)?);
        }

        debug!(
            pile = pile.len(),
            variables = variables.len(),
            "configuration chargée"
        );
        self.pile = pile;
        self.variables = variables;
        self.options = config.options;
        // l’état chargé devient le point de départ
        if self.historique.is_some() {
            self.historique = Some(Historique::default());
        }
        Ok(())
    }

    /// Copie des options et variables, pile vide.
    pub fn clone_sans_pile(&self) -> Calculatrice {
        Calculatrice {
            pile: Vec::new(),
            variables: self.variables.clone(),
            options: self.options,
            profondeur: self.profondeur,
            historique: None,
        }
    }

    /// Contexte d’évaluation imbriqué (profondeur + 1, bornée).
    pub(crate) fn sous_contexte(&self) -> Resultat<Calculatrice> {
        if self.profondeur >= PROFONDEUR_MAX {
            return Err(Erreur::parse("récursion trop profonde"));
        }
        let mut c = self.clone_sans_pile();
        c.profondeur += 1;
        Ok(c)
    }

    /// Sommet en premier, une ligne par élément.
    pub fn to_string_stack(&self) -> String {
        self.pile
            .iter()
            .rev()
            .map(|e| e.rendu(&self.options))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Valeur numérique d’un élément (une Expression est évaluée).
    pub fn resoudre(&self, element: &ElementPile) -> Resultat<Valeur> {
        match element {
            ElementPile::Numerique(v) => Ok(v.clone()),
            ElementPile::Expression(t) => {
                let res = eval::execute(t, self)?;
                match res.as_slice() {
                    [ElementPile::Numerique(v)] => Ok(v.clone()),
                    [e @ ElementPile::Expression(_)] => self.sous_contexte()?.resoudre(e),
                    _ => Err(Erreur::operande(format!(
                        "'{t}' ne donne pas une valeur unique"
                    ))),
                }
            }
        }
    }
}

/// Texte d’une valeur d’option : expression brute, ou magnitude exacte sans unité.
fn texte_option(valeur: &ElementPile) -> Resultat<String> {
    match valeur {
        ElementPile::Expression(t) => Ok(t.trim().to_string()),
        ElementPile::Numerique(v) if v.a_des_unites() => {
            Err(Erreur::InvalidOption(format!("valeur avec unités: {v}")))
        }
        ElementPile::Numerique(v) if v.magnitude.is_integer() => {
            Ok(v.magnitude.to_integer().to_string())
        }
        ElementPile::Numerique(v) => Ok(format_exact(&v.magnitude)),
    }
}
