//! Noyau d’évaluation f64
//!
//! Organisation interne :
//! - jetons.rs        : tokenisation (aucune substitution textuelle)
//! - normalisation.rs : glyphes, Ans, constantes, suffixes, produit implicite
//! - rpn.rs           : shunting-yard + construction Expr
//! - expr.rs          : AST (grammaire fermée) + liste blanche des fonctions
//! - trig.rs          : unité d’angle (réécriture de l’AST)
//! - numerique.rs     : int/sum/diff, n!, nPr, nCr
//! - calcul.rs        : évaluateur final
//! - format.rs        : affichage du résultat et de la démarche
//! - eval.rs          : pipeline complet, repli sur "Error"

pub mod calcul;
pub mod constantes;
pub mod contexte;
pub mod erreurs;
pub mod eval;
pub mod expr;
pub mod format;
pub mod jetons;
pub mod normalisation;
pub mod numerique;
pub mod rpn;
pub mod trig;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use constantes::{constante, Constante, CONSTANTES};
pub use contexte::{Contexte, UniteAngle, VARIABLES_MEMOIRE};
pub use erreurs::{Categorie, ErreurCalc};
pub use eval::{evaluer, evaluer_contexte, evaluer_detaille, DemarcheNoyau, MARQUEUR_ERREUR};
