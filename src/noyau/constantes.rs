// src/noyau/constantes.rs
//
// Table des constantes physiques (lecture seule, partagée par tout le process).
// Le noyau ne s’en sert que pour la substitution ; l’app l’affiche dans le catalogue.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constante {
    /// Identifiant tel qu’on le tape dans une expression (mot entier).
    pub nom: &'static str,
    /// Symbole d’affichage (catalogue).
    pub symbole: &'static str,
    pub valeur: f64,
    pub description: &'static str,
}

pub static CONSTANTES: [Constante; 9] = [
    Constante {
        nom: "c",
        symbole: "c",
        valeur: 299_792_458.0,
        description: "vitesse de la lumière (m/s)",
    },
    Constante {
        nom: "g",
        symbole: "g",
        valeur: 9.806_65,
        description: "pesanteur standard (m/s²)",
    },
    Constante {
        nom: "h",
        symbole: "h",
        valeur: 6.626_070_15e-34,
        description: "constante de Planck (J·s)",
    },
    Constante {
        nom: "G",
        symbole: "G",
        valeur: 6.674_30e-11,
        description: "constante gravitationnelle (m³/(kg·s²))",
    },
    Constante {
        nom: "Na",
        symbole: "Nₐ",
        valeur: 6.022_140_76e23,
        description: "nombre d’Avogadro (1/mol)",
    },
    Constante {
        nom: "R",
        symbole: "R",
        valeur: 8.314_462_618,
        description: "constante des gaz parfaits (J/(mol·K))",
    },
    Constante {
        nom: "k",
        symbole: "k",
        valeur: 1.380_649e-23,
        description: "constante de Boltzmann (J/K)",
    },
    Constante {
        nom: "eps0",
        symbole: "ε₀",
        valeur: 8.854_187e-12,
        description: "permittivité du vide (F/m)",
    },
    Constante {
        nom: "mu0",
        symbole: "µ₀",
        valeur: 1.256_637e-6,
        description: "perméabilité du vide (H/m)",
    },
];

/// Valeur d’une constante par son identifiant exact (sensible à la casse : g ≠ G).
pub fn constante(nom: &str) -> Option<f64> {
    CONSTANTES.iter().find(|c| c.nom == nom).map(|c| c.valeur)
}
