// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Clavier : Enter évalue (quand le champ est focus)
// - Pavé à 5 colonnes, secondes fonctions en infobulle
// - Indicateurs S / A / STO / unité, historique, catalogue des constantes
//
// Toute la logique des touches vit dans etat.rs (appuie) : ici on ne fait que dessiner.

use eframe::egui;

use super::etat::{AppCalc, ModeTouche, Touche};
use crate::noyau::{MARQUEUR_ERREUR, CONSTANTES};

/// Une case du pavé : libellé, seconde fonction (infobulle), touche.
struct Case {
    label: &'static str,
    second: &'static str,
    touche: Touche,
}

const fn case(label: &'static str, second: &'static str, touche: Touche) -> Case {
    Case {
        label,
        second,
        touche,
    }
}

/// Pavé (lignes de 5), du haut vers le bas.
const PAVE: [[Case; 5]; 10] = [
    [
        case("ON", "", Touche::Marche),
        case("SHIFT", "", Touche::Shift),
        case("ALPHA", "", Touche::Alpha),
        case("STO", "", Touche::Sto),
        case("DRG", "", Touche::Unite),
    ],
    [
        case("hyp", "asinh", Touche::Fonction("hyp")),
        case("x!", "", Touche::Texte("!")),
        case("nPr", "", Touche::Texte("P")),
        case("nCr", "", Touche::Texte("C")),
        case("Ran#", "", Touche::Texte("Ran#")),
    ],
    [
        case("µ", "", Touche::Texte("µ")),
        case("m", "", Touche::Texte("m")),
        case("k", "", Touche::Texte("k")),
        case("G", "", Touche::Texte("G")),
        case("∫dx", "d/dx", Touche::Texte("int(")),
    ],
    [
        case("Σ", "x!", Touche::Texte("sum(")),
        case("x", "", Touche::Texte("x")),
        case(",", "", Touche::Virgule),
        case("gcd", "lcm", Touche::Fonction("gcd")),
        case("Abs", "", Touche::Fonction("abs")),
    ],
    [
        case("xⁿ", "", Touche::Operateur('^')),
        case("√", "∛", Touche::Fonction("√")),
        case("log", "ln", Touche::Fonction("log")),
        case("ln", "", Touche::Fonction("ln")),
        case("exp", "", Touche::Fonction("exp")),
    ],
    [
        case("sin", "sin⁻¹", Touche::Fonction("sin")),
        case("cos", "cos⁻¹", Touche::Fonction("cos")),
        case("tan", "tan⁻¹", Touche::Fonction("tan")),
        case("(", "", Touche::ParOuvrante),
        case(")", "", Touche::ParFermante),
    ],
    [
        case("7", "π / X", Touche::Chiffre(7)),
        case("8", "e / Y", Touche::Chiffre(8)),
        case("9", "M", Touche::Chiffre(9)),
        case("DEL", "", Touche::Del),
        case("AC", "OFF", Touche::Ac),
    ],
    [
        case("4", "A", Touche::Chiffre(4)),
        case("5", "B", Touche::Chiffre(5)),
        case("6", "C", Touche::Chiffre(6)),
        case("×", "", Touche::Operateur('×')),
        case("÷", "", Touche::Operateur('÷')),
    ],
    [
        case("1", "D", Touche::Chiffre(1)),
        case("2", "E", Touche::Chiffre(2)),
        case("3", "F", Touche::Chiffre(3)),
        case("+", "", Touche::Operateur('+')),
        case("-", "", Touche::Operateur('-')),
    ],
    [
        case("0", "", Touche::Chiffre(0)),
        case(".", "", Touche::Point),
        case("EXP", "π", Touche::Exp),
        case("Ans", "", Touche::Ans),
        case("=", "", Touche::Egal),
    ],
];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(crate::TITRE_APP);
                ui.add_space(6.0);

                self.ui_ecran(ui);

                ui.add_space(8.0);
                self.ui_pave(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_historique(ui);
                self.ui_catalogue(ui);
                if self.afficher_demarche {
                    self.ui_demarche(ui);
                }
            });
    }

    fn ui_ecran(&mut self, ui: &mut egui::Ui) {
        // Indicateurs
        ui.horizontal(|ui| {
            Self::indicateur(ui, "S", self.mode == ModeTouche::ShiftEnAttente);
            Self::indicateur(ui, "A", self.mode == ModeTouche::AlphaEnAttente);
            Self::indicateur(ui, "STO", self.mode == ModeTouche::StoEnAttente);
            ui.separator();
            ui.monospace(self.unite.libelle());
            if !self.allume {
                ui.separator();
                ui.weak("OFF");
            }
        });

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add_enabled(
            self.allume,
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: sin(30)+5C2, int(x^2,0,3), 2k×Ans")
                .id_salt("entree_edit")
                .code_editor(),
        );

        // Si on a cliqué une touche, on redonne le focus
        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // --- Clavier : Enter évalue (seulement si le champ est focus) ---
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if resp.has_focus() && enter {
            self.appuie(Touche::Egal);
        }

        ui.add_space(4.0);

        let affichage = if self.allume { self.affichage.as_str() } else { "" };
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(affichage).monospace().size(26.0));
                });
            });

        if self.affichage == MARQUEUR_ERREUR && !self.erreur.is_empty() {
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        } else if !self.message.is_empty() {
            ui.weak(&self.message);
        }
    }

    fn indicateur(ui: &mut egui::Ui, texte: &str, actif: bool) {
        let t = egui::RichText::new(texte).monospace().strong();
        if actif {
            ui.label(t.color(ui.visuals().warn_fg_color));
        } else {
            ui.label(t.weak());
        }
    }

    fn ui_pave(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_calculatrice")
            .num_columns(5)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for ligne in &PAVE {
                    for c in ligne {
                        self.bouton(ui, c);
                    }
                    ui.end_row();
                }
            });
    }

    fn bouton(&mut self, ui: &mut egui::Ui, c: &Case) {
        let mut resp = ui.add_sized([62.0, 30.0], egui::Button::new(c.label));
        if !c.second.is_empty() {
            resp = resp.on_hover_text(format!("SHIFT/ALPHA : {}", c.second));
        }
        if resp.clicked() {
            self.appuie(c.touche);
        }
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        let mut rappel: Option<usize> = None;
        let mut effacer = false;

        egui::CollapsingHeader::new(format!("Historique ({})", self.historique.len()))
            .default_open(false)
            .show(ui, |ui| {
                if self.historique.is_empty() {
                    ui.weak("vide");
                    return;
                }
                for (i, h) in self.historique.iter().enumerate() {
                    ui.horizontal(|ui| {
                        if ui.small_button("↺").on_hover_text("Rappeler").clicked() {
                            rappel = Some(i);
                        }
                        ui.monospace(format!("{} = {}", h.expression, h.resultat));
                    });
                }
                if ui.button("Effacer l’historique").clicked() {
                    effacer = true;
                }
            });

        if let Some(i) = rappel {
            self.rappelle(i);
        }
        if effacer {
            self.efface_historique();
        }
    }

    fn ui_catalogue(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Constantes")
            .default_open(false)
            .show(ui, |ui| {
                egui::Grid::new("catalogue_constantes")
                    .num_columns(3)
                    .striped(true)
                    .show(ui, |ui| {
                        for k in CONSTANTES.iter() {
                            if ui.button(k.symbole).on_hover_text(k.nom).clicked() {
                                self.insere_constante(k.nom);
                            }
                            ui.monospace(format!("{:e}", k.valeur));
                            ui.label(k.description);
                            ui.end_row();
                        }
                    });
            });
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(false)
            .show(ui, |ui| {
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", &self.demarche.jetons);
                Self::champ_demarche(ui, "RPN", "demarche_rpn", &self.demarche.rpn);
                Self::champ_demarche(ui, "Avant", "demarche_avant", &self.demarche.avant);
                Self::champ_demarche(ui, "Après", "demarche_apres", &self.demarche.apres);
                Self::champ_demarche(ui, "Note", "demarche_note", &self.demarche.note);
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        Self::champ_monospace(ui, id, contenu, 2);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule “stable”, sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }
}
