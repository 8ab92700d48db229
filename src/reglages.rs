// src/reglages.rs
//
// Réglages utilisateur (facultatifs) : $CONFIG/calculatrice_sci/reglages.toml
// ------------------------------------------------------------------------
// - fichier absent  -> valeurs par défaut
// - fichier invalide -> valeurs par défaut + avertissement (jamais d’échec au démarrage)
// - champs manquants -> valeur par défaut du champ
//
// En wasm32 il n’y a pas de dossier de configuration : valeurs par défaut.
//
// Exemple :
//   unite = "rad"
//   historique_max = 100
//   afficher_demarche = false

use serde::{Deserialize, Serialize};

use crate::noyau::UniteAngle;

/// Dossier (sous le dossier de config de l’OS) et nom de fichier.
pub const DOSSIER: &str = "calculatrice_sci";
pub const FICHIER: &str = "reglages.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reglages {
    /// Unité d’angle au démarrage.
    pub unite: UniteAngle,
    /// Nombre d’entrées conservées dans l’historique.
    pub historique_max: usize,
    /// Panneau « Démarche » visible.
    pub afficher_demarche: bool,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            unite: UniteAngle::Degres,
            historique_max: 50,
            afficher_demarche: true,
        }
    }
}

impl Reglages {
    pub fn depuis_toml(texte: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(texte)
    }

    /// Chemin du fichier de réglages (None si l’OS n’a pas de dossier de config).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn chemin() -> Option<std::path::PathBuf> {
        let mut p = dirs::config_dir()?;
        p.push(DOSSIER);
        p.push(FICHIER);
        Some(p)
    }

    /// Charge les réglages ; n’échoue jamais.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn charger() -> Self {
        match Self::chemin() {
            Some(p) => Self::charger_depuis(&p),
            None => {
                log::debug!("pas de dossier de configuration : réglages par défaut");
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn charger_depuis(chemin: &std::path::Path) -> Self {
        let texte = match std::fs::read_to_string(chemin) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{} absent : réglages par défaut", chemin.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("lecture de {} impossible ({e}) : réglages par défaut", chemin.display());
                return Self::default();
            }
        };

        match Self::depuis_toml(&texte) {
            Ok(r) => {
                log::info!("réglages chargés depuis {}", chemin.display());
                r
            }
            Err(e) => {
                log::warn!("{} invalide ({e}) : réglages par défaut", chemin.display());
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn charger() -> Self {
        Self::default()
    }
}
