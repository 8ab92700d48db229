// src/noyau/contexte.rs
//
// Entrées d’une évaluation autres que l’expression : unité d’angle, dernier
// résultat (Ans) et variables mémoire. Jamais modifiées par le noyau.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lettres des variables mémoire (touches ALPHA / STO).
pub const VARIABLES_MEMOIRE: [&str; 9] = ["A", "B", "C", "D", "E", "F", "X", "Y", "M"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UniteAngle {
    #[default]
    #[serde(rename = "deg")]
    Degres,
    #[serde(rename = "rad")]
    Radians,
}

impl UniteAngle {
    pub fn libelle(self) -> &'static str {
        match self {
            UniteAngle::Degres => "DEG",
            UniteAngle::Radians => "RAD",
        }
    }

    pub fn bascule(self) -> Self {
        match self {
            UniteAngle::Degres => UniteAngle::Radians,
            UniteAngle::Radians => UniteAngle::Degres,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Contexte {
    pub unite: UniteAngle,
    /// Dernier résultat affiché (substitué à `Ans`).
    pub ans: String,
    /// Variables mémoire ; une lettre absente vaut 0.
    pub variables: BTreeMap<String, f64>,
}

impl Default for Contexte {
    fn default() -> Self {
        Self {
            unite: UniteAngle::default(),
            ans: "0".to_string(),
            variables: BTreeMap::new(),
        }
    }
}

impl Contexte {
    pub fn new(unite: UniteAngle, ans: impl Into<String>) -> Self {
        Self {
            unite,
            ans: ans.into(),
            variables: BTreeMap::new(),
        }
    }

    pub fn avec_variable(mut self, nom: &str, valeur: f64) -> Self {
        self.variables.insert(nom.to_string(), valeur);
        self
    }

    pub fn variable(&self, nom: &str) -> f64 {
        self.variables.get(nom).copied().unwrap_or(0.0)
    }
}
