// src/app/vue.rs
//
// Vue (UI egui), natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Pile affichée sommet en bas (niveau 1), comme sur une calculatrice RPN
// - Clavier : Enter pousse la ligne (quand le champ est focus)
// - Tactile : gros boutons d’opérateurs, focus redonné après clic (focus_entree)
// - Complétion des mots-clés et variables sous l’entrée
// - Tracé simple (painter), échantillons None = courbe coupée
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;

use super::etat::AppCalc;

/// Boutons d’opérateurs : (étiquette, mot-clé poussé)
const TOUCHES: &[&[(&str, &str)]] = &[
    &[("+", "+"), ("-", "-"), ("×", "*"), ("÷", "/"), ("xʸ", "pow"), ("ʸ√x", "nroot")],
    &[("√", "sqrt"), ("1/x", "inv"), ("±", "neg"), ("mod", "mod"), ("ln", "ln"), ("log", "log10")],
    &[("sin", "sin"), ("cos", "cos"), ("tan", "tan"), ("asin", "asin"), ("acos", "acos"), ("atan", "atan")],
    &[("π", "pi"), ("e", "e"), ("dup", "dup"), ("swap", "swap"), ("drop", "drop"), ("clr", "clr")],
    &[("sto", "store"), ("eval", "eval"), ("conv", "convert"), ("deg", "deg"), ("rad", "rad"), ("hex", "hex")],
    &[("dec", "dec"), ("oct", "oct"), ("bin", "bin"), ("undo", "undo"), ("redo", "redo")],
];

const NIVEAUX_VISIBLES: usize = 8;

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice RPN");
                self.ui_modes(ui);
                ui.add_space(6.0);

                self.ui_pile(ui);

                ui.add_space(8.0);
                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_touches(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_trace(ui);
            });
    }

    fn ui_modes(&self, ui: &mut egui::Ui) {
        let o = self.calc.options();
        ui.horizontal(|ui| {
            ui.weak(format!("angle : {}", o.angle_mode.nom()));
            ui.separator();
            ui.weak(format!("base : {}", o.base.valeur()));
            ui.separator();
            ui.weak(format!("{} variable(s)", self.calc.variables().len()));
        });
    }

    fn ui_pile(&self, ui: &mut egui::Ui) {
        let lignes: Vec<String> = self
            .calc
            .elements()
            .iter()
            .map(|e| e.rendu(self.calc.options()))
            .collect();

        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                let n = lignes.len();
                // niveaux vides au-dessus pour garder une hauteur stable
                for niveau in (1..=NIVEAUX_VISIBLES.max(n)).rev() {
                    let texte = if niveau <= n { lignes[n - niveau].as_str() } else { "" };
                    ui.horizontal(|ui| {
                        ui.monospace(format!("{niveau:>2}:"));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.monospace(texte);
                        });
                    });
                }
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: 3_m 4_cm /   '2*x + 1' eval   42 'r' store")
                .id_salt("entree_edit")
                .code_editor(),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if resp.lost_focus() && enter {
            self.valider();
            self.focus_entree = true;
        }

        // Complétion
        let propositions = self.completions();
        if !propositions.is_empty() {
            ui.horizontal_wrapped(|ui| {
                for p in propositions.iter().take(12) {
                    if ui.small_button(p).clicked() {
                        self.completer(p);
                    }
                }
            });
        }

        ui.horizontal(|ui| {
            if ui
                .add_sized([56.0, 30.0], egui::Button::new("Enter"))
                .clicked()
            {
                self.valider();
            }
            if ui
                .add_sized([56.0, 30.0], egui::Button::new("C"))
                .on_hover_text("Efface seulement l’entrée")
                .clicked()
            {
                self.clear_entree();
            }
            if ui
                .add_sized([56.0, 30.0], egui::Button::new("AC"))
                .on_hover_text("Pile, variables et options remises à zéro")
                .clicked()
            {
                self.reset_total();
            }
        });

        if !self.erreur.is_empty() {
            ui.add_space(4.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_touches(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("touches_operateurs")
            .num_columns(6)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for rangee in TOUCHES {
                    for (etiquette, mot_cle) in rangee.iter() {
                        let resp = ui
                            .add_sized([60.0, 32.0], egui::Button::new(*etiquette))
                            .on_hover_text(*mot_cle);
                        if resp.clicked() {
                            self.appliquer(mot_cle);
                        }
                    }
                    ui.end_row();
                }
            });
    }

    fn ui_trace(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Tracé")
            .default_open(false)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label("y =");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.trace.expression)
                            .hint_text("sin(x) * x")
                            .id_salt("trace_expression")
                            .desired_width(220.0),
                    );
                    if ui.button("Tracer").clicked() {
                        self.tracer();
                    }
                });
                ui.horizontal(|ui| {
                    ui.label("x de");
                    ui.add(egui::DragValue::new(&mut self.trace.min_x).speed(0.5));
                    ui.label("à");
                    ui.add(egui::DragValue::new(&mut self.trace.max_x).speed(0.5));
                });

                dessine_courbe(ui, &self.trace.points);
            });
    }
}

/// Courbe dans un cadre ; l’échelle y suit les valeurs présentes.
fn dessine_courbe(ui: &mut egui::Ui, points: &[(f64, Option<f64>)]) {
    let taille = egui::vec2(ui.available_width(), 220.0);
    let (resp, painter) = ui.allocate_painter(taille, egui::Sense::hover());
    let cadre = resp.rect;
    let visuals = ui.visuals();
    painter.rect_filled(cadre, 4.0, visuals.extreme_bg_color);

    let ys = points.iter().filter_map(|(_, y)| *y);
    let (y_min, y_max) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), y| {
        (a.min(y), b.max(y))
    });
    let (Some((x_min, _)), Some((x_max, _))) = (points.first(), points.last()) else {
        return;
    };
    if !y_min.is_finite() || !y_max.is_finite() || x_max <= x_min {
        return;
    }
    let (y_min, y_max) = if y_max - y_min < 1e-12 {
        (y_min - 1.0, y_max + 1.0)
    } else {
        (y_min, y_max)
    };

    let vers_ecran = |x: f64, y: f64| {
        let u = ((x - x_min) / (x_max - x_min)) as f32;
        let v = ((y - y_min) / (y_max - y_min)) as f32;
        egui::pos2(
            cadre.left() + u * cadre.width(),
            cadre.bottom() - v * cadre.height(),
        )
    };

    // axes
    let axe = egui::Stroke::new(1.0, visuals.weak_text_color());
    if y_min <= 0.0 && 0.0 <= y_max {
        painter.line_segment([vers_ecran(*x_min, 0.0), vers_ecran(*x_max, 0.0)], axe);
    }
    if *x_min <= 0.0 && 0.0 <= *x_max {
        painter.line_segment([vers_ecran(0.0, y_min), vers_ecran(0.0, y_max)], axe);
    }

    let trait_courbe = egui::Stroke::new(1.5, visuals.strong_text_color());
    for paire in points.windows(2) {
        if let [(x0, Some(y0)), (x1, Some(y1))] = paire {
            painter.line_segment([vers_ecran(*x0, *y0), vers_ecran(*x1, *y1)], trait_courbe);
        }
    }
}
