// src/noyau/erreurs.rs
//
// Taxonomie d’erreurs du noyau.
// - Syntaxe     : expression mal formée (parenthèses, jeton inattendu, opérande vide…)
// - Domaine     : opération indéfinie pour ces entrées (0 diviseur, (-1)!, ln(0)…)
// - Depassement : le résultat sort de la plage f64
//
// Toutes les variantes se replient sur le même marqueur "Error" à la frontière
// (voir eval.rs) ; la variante reste visible pour les tests via `categorie()`.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurCalc {
    #[error("erreur de syntaxe : {0}")]
    Syntaxe(String),

    #[error("erreur de domaine : {0}")]
    Domaine(String),

    #[error("dépassement : {0}")]
    Depassement(String),
}

/// Catégorie seule (sans message), pratique pour les assertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Categorie {
    Syntaxe,
    Domaine,
    Depassement,
}

impl ErreurCalc {
    pub fn syntaxe(msg: impl Into<String>) -> Self {
        ErreurCalc::Syntaxe(msg.into())
    }

    pub fn domaine(msg: impl Into<String>) -> Self {
        ErreurCalc::Domaine(msg.into())
    }

    pub fn depassement(msg: impl Into<String>) -> Self {
        ErreurCalc::Depassement(msg.into())
    }

    pub fn categorie(&self) -> Categorie {
        match self {
            ErreurCalc::Syntaxe(_) => Categorie::Syntaxe,
            ErreurCalc::Domaine(_) => Categorie::Domaine,
            ErreurCalc::Depassement(_) => Categorie::Depassement,
        }
    }
}

pub type Resultat<T> = std::result::Result<T, ErreurCalc>;
