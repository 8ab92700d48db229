//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir l’état de la calculatrice (entrée, affichage, Ans, variables,
//! historique, unité) et la machine à états des touches SHIFT / ALPHA / STO.
//!
//! Contrats :
//! - Le noyau n’est appelé qu’à « = » ; les touches ne font que construire l’entrée.
//! - Un mode en attente (SHIFT, ALPHA, STO) consomme exactement UNE touche, puis Normal.
//! - Hors tension, seule la touche ON est prise en compte.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::noyau::{
    evaluer_detaille, Contexte, DemarcheNoyau, UniteAngle, MARQUEUR_ERREUR, VARIABLES_MEMOIRE,
};
use crate::reglages::Reglages;

/// Mode du clavier : au plus une touche de préfixe en attente.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeTouche {
    #[default]
    Normal,
    ShiftEnAttente,
    AlphaEnAttente,
    StoEnAttente,
}

/// Touches du pavé. Les libellés des fonctions sont ceux de la face avant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Touche {
    Chiffre(u8),
    Point,
    /// + - × ÷ ^
    Operateur(char),
    ParOuvrante,
    ParFermante,
    Virgule,
    /// sin cos tan √ log ln abs gcd hyp : insèrent "nom("
    Fonction(&'static str),
    /// Insertion littérale : ! µ m k G int( sum( Ran#
    Texte(&'static str),
    /// ×10^ (SHIFT : π)
    Exp,
    Ans,

    Shift,
    Alpha,
    Sto,

    Del,
    Ac,
    Egal,
    Unite,
    Marche,
}

/// Lettre mémoire portée par un chiffre (ALPHA / STO).
pub fn lettre_du_chiffre(c: u8) -> Option<&'static str> {
    match c {
        4 => Some("A"),
        5 => Some("B"),
        6 => Some("C"),
        1 => Some("D"),
        2 => Some("E"),
        3 => Some("F"),
        7 => Some("X"),
        8 => Some("Y"),
        9 => Some("M"),
        _ => None,
    }
}

/// Seconde fonction (SHIFT) ; None = même effet que sans SHIFT.
fn seconde_fonction(t: Touche) -> Option<&'static str> {
    match t {
        Touche::Chiffre(7) => Some("π"),
        Touche::Chiffre(8) => Some("e"),
        Touche::Fonction("sin") => Some("asin("),
        Touche::Fonction("cos") => Some("acos("),
        Touche::Fonction("tan") => Some("atan("),
        Touche::Fonction("√") => Some("∛("),
        Touche::Fonction("log") => Some("ln("),
        Touche::Fonction("hyp") => Some("asinh("),
        Touche::Fonction("gcd") => Some("lcm("),
        Touche::Texte("int(") => Some("diff("),
        Touche::Texte("sum(") => Some("!"),
        Touche::Exp => Some("π"),
        _ => None,
    }
}

/// Motifs retirés d’un bloc par DEL (du plus long au plus court).
const MOTIFS_DEL: [&str; 22] = [
    "asinh(", "sinh(", "asin(", "acos(", "atan(", "diff(", "sin(", "cos(", "tan(", "int(",
    "sum(", "gcd(", "lcm(", "abs(", "log(", "ln(", "×10^", "Ran#", "Ans", "10^", "√(", "∛(",
];

#[derive(Clone, Debug, PartialEq)]
pub struct EntreeHistorique {
    pub expression: String,
    pub resultat: String,
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub affichage: String, // dernier résultat, "Error", ou "0"
    pub erreur: String,    // détail de la dernière erreur (jamais renvoyé par le noyau public)
    pub message: String,   // retour bref (ex : "→ A")

    // --- machine à états des touches ---
    pub mode: ModeTouche,
    pub allume: bool,

    // --- mémoire ---
    pub unite: UniteAngle,
    pub ans: String,
    pub variables: BTreeMap<String, f64>,
    pub historique: Vec<EntreeHistorique>, // plus récent en tête
    pub historique_max: usize,

    // --- démarche (panneau d’explication) ---
    pub demarche: DemarcheNoyau,
    pub afficher_demarche: bool,

    // --- UX ---
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self::new(&Reglages::default())
    }
}

impl AppCalc {
    pub fn new(reglages: &Reglages) -> Self {
        Self {
            entree: String::new(),
            affichage: "0".to_string(),
            erreur: String::new(),
            message: String::new(),
            mode: ModeTouche::Normal,
            allume: true,
            unite: reglages.unite,
            ans: "0".to_string(),
            variables: VARIABLES_MEMOIRE
                .iter()
                .map(|v| (v.to_string(), 0.0))
                .collect(),
            historique: Vec::new(),
            historique_max: reglages.historique_max,
            demarche: DemarcheNoyau::default(),
            afficher_demarche: reglages.afficher_demarche,
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }

    /* ------------------------ Machine à états ------------------------ */

    /// Traite une touche. Un mode en attente est consommé par la touche suivante.
    pub fn appuie(&mut self, t: Touche) {
        self.focus_entree = true;

        if !self.allume {
            if t == Touche::Marche {
                self.bascule_marche();
            }
            return;
        }

        // Touches de préfixe : bascule (appui répété = annulation)
        let prefixe = match t {
            Touche::Shift => Some(ModeTouche::ShiftEnAttente),
            Touche::Alpha => Some(ModeTouche::AlphaEnAttente),
            Touche::Sto => Some(ModeTouche::StoEnAttente),
            _ => None,
        };
        if let Some(m) = prefixe {
            self.mode = if self.mode == m { ModeTouche::Normal } else { m };
            return;
        }

        let mode = std::mem::take(&mut self.mode);
        match mode {
            ModeTouche::Normal => self.touche_normale(t),
            ModeTouche::ShiftEnAttente => self.touche_shift(t),
            ModeTouche::AlphaEnAttente => self.touche_alpha(t),
            ModeTouche::StoEnAttente => self.touche_sto(t),
        }
    }

    fn touche_normale(&mut self, t: Touche) {
        match t {
            Touche::Chiffre(c) => self.insere(&c.to_string()),
            Touche::Point => self.insere("."),
            Touche::Operateur(op) => self.insere(&op.to_string()),
            Touche::ParOuvrante => self.insere("("),
            Touche::ParFermante => self.insere(")"),
            Touche::Virgule => self.insere(","),
            Touche::Fonction("hyp") => self.insere("sinh("),
            Touche::Fonction(f) => self.insere(&format!("{f}(")),
            Touche::Texte(s) => self.insere(s),
            Touche::Exp => self.insere("×10^"),
            Touche::Ans => self.insere("Ans"),

            Touche::Del => self.efface_dernier(),
            Touche::Ac => self.clear_entree(),
            Touche::Egal => self.execute(),
            Touche::Unite => self.unite = self.unite.bascule(),
            Touche::Marche => self.bascule_marche(),

            Touche::Shift | Touche::Alpha | Touche::Sto => {}
        }
    }

    fn touche_shift(&mut self, t: Touche) {
        if t == Touche::Ac {
            self.bascule_marche();
            return;
        }
        match seconde_fonction(t) {
            Some(s) => self.insere(s),
            None => self.touche_normale(t),
        }
    }

    fn touche_alpha(&mut self, t: Touche) {
        if let Touche::Chiffre(c) = t {
            if let Some(lettre) = lettre_du_chiffre(c) {
                self.insere(lettre);
            }
        }
    }

    /// STO + chiffre : range le résultat affiché dans la lettre correspondante.
    fn touche_sto(&mut self, t: Touche) {
        let Touche::Chiffre(c) = t else { return };
        let Some(lettre) = lettre_du_chiffre(c) else { return };

        let valeur = self.affichage.parse::<f64>().unwrap_or(0.0);
        self.variables.insert(lettre.to_string(), valeur);
        self.message = format!("{} → {lettre}", self.affichage_ou_zero());
        info!("STO {lettre} = {valeur}");
    }

    fn affichage_ou_zero(&self) -> &str {
        if self.affichage == MARQUEUR_ERREUR {
            "0"
        } else {
            &self.affichage
        }
    }

    /* ------------------------ Actions (état seulement) ------------------------ */

    fn insere(&mut self, s: &str) {
        self.entree.push_str(s);
        self.message.clear();
    }

    /// AC : efface l’entrée et l’affichage.
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.affichage = "0".to_string();
        self.erreur.clear();
        self.message.clear();
        self.mode = ModeTouche::Normal;
        self.focus_entree = true;
    }

    /// ON / SHIFT+AC : bascule marche/arrêt. L’arrêt efface l’entrée et les modes,
    /// la mémoire (Ans, variables, historique) est conservée.
    pub fn bascule_marche(&mut self) {
        self.allume = !self.allume;
        self.mode = ModeTouche::Normal;
        if !self.allume {
            self.entree.clear();
            self.message.clear();
        } else {
            self.affichage = "0".to_string();
        }
        debug!("alimentation: {}", if self.allume { "ON" } else { "OFF" });
    }

    /// DEL « intelligent » : retire d’un coup les motifs utiles ("sin(", "Ans", etc.).
    pub fn efface_dernier(&mut self) {
        // Retire espaces finaux
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }

        for pat in MOTIFS_DEL {
            if self.entree.ends_with(pat) {
                let garde = self.entree.len() - pat.len();
                self.entree.truncate(garde);
                return;
            }
        }

        // Sinon : un caractère
        self.entree.pop();
    }

    /// « = » : évalue l’entrée (ou, vide, le dernier affichage).
    /// Succès : Ans, historique, affichage ; échec : "Error", entrée conservée.
    pub fn execute(&mut self) {
        let cible = if self.entree.trim().is_empty() {
            self.affichage.clone()
        } else {
            self.entree.clone()
        };
        if cible.trim().is_empty() || cible == "0" || cible == MARQUEUR_ERREUR {
            return;
        }

        let ctx = Contexte {
            unite: self.unite,
            ans: self.ans.clone(),
            variables: self.variables.clone(),
        };

        match evaluer_detaille(&cible, &ctx) {
            Ok((resultat, demarche)) => {
                debug!("{cible:?} = {resultat}");
                self.ans = resultat.clone();
                self.historique.insert(
                    0,
                    EntreeHistorique {
                        expression: cible,
                        resultat: resultat.clone(),
                    },
                );
                self.historique.truncate(self.historique_max);
                self.affichage = resultat;
                self.demarche = demarche;
                self.erreur.clear();
                self.entree.clear();
            }
            Err(e) => {
                debug!("{cible:?} : {e}");
                self.affichage = MARQUEUR_ERREUR.to_string();
                self.erreur = e.to_string();
                self.demarche = DemarcheNoyau::default();
            }
        }
        self.message.clear();
    }

    /// Catalogue : insère un nom de constante. Collé à un chiffre ou une lettre,
    /// il serait relu autrement (2k = 2000, Ak inconnu) : "×" explicite.
    pub fn insere_constante(&mut self, nom: &str) {
        if !self.allume {
            return;
        }
        if self
            .entree
            .ends_with(|c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '#'))
        {
            self.entree.push('×');
        }
        self.insere(nom);
        self.focus_entree = true;
    }

    /// Rappel d’une ligne d’historique dans l’entrée.
    pub fn rappelle(&mut self, index: usize) {
        if let Some(h) = self.historique.get(index) {
            self.entree = h.expression.clone();
            self.focus_entree = true;
        }
    }

    pub fn efface_historique(&mut self) {
        self.historique.clear();
    }
}
