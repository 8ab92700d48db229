//! Noyau — évaluation (pipeline réel)
//!
//! tokenize -> normalise -> RPN -> Expr -> unité d’angle -> passe numérique
//!        -> calcul f64 -> format
//!
//! Seul endroit où une erreur se replie sur le marqueur "Error".

use log::{debug, warn};

use super::calcul::evalue;
use super::contexte::{Contexte, UniteAngle};
use super::erreurs::{ErreurCalc, Resultat};
use super::format::{format_expr_pretty, formate_resultat};
use super::jetons::{format_tokens, tokenize};
use super::normalisation::normalise;
use super::numerique::{passe_numerique, Budget};
use super::rpn::{from_rpn, to_rpn};
use super::trig::applique_unite_angle;

/// Chaîne renvoyée à la place d’un résultat quand l’évaluation échoue.
pub const MARQUEUR_ERREUR: &str = "Error";

/// Garde-fous (les passes sur l’AST sont récursives).
const LONGUEUR_MAX: usize = 4096;
const PROFONDEUR_MAX: usize = 256;

#[derive(Default, Clone, Debug)]
pub struct DemarcheNoyau {
    pub jetons: String,
    pub rpn: String,
    pub avant: String,
    pub apres: String,
    pub note: String,
}

/// API publique : évalue une expression avec une unité d’angle et la réponse précédente.
/// Totale : renvoie le résultat formaté ou `MARQUEUR_ERREUR`.
pub fn evaluer(expression: &str, unite: UniteAngle, ans: &str) -> String {
    evaluer_contexte(expression, &Contexte::new(unite, ans))
}

/// Comme `evaluer`, avec les variables mémoire du contexte.
pub fn evaluer_contexte(expression: &str, ctx: &Contexte) -> String {
    match evaluer_detaille(expression, ctx) {
        Ok((resultat, _)) => resultat,
        Err(e) => {
            warn!("évaluation de {expression:?} : {e}");
            MARQUEUR_ERREUR.to_string()
        }
    }
}

/// Évalue et retourne :
/// - le résultat formaté
/// - la démarche (jetons, rpn, avant/après les passes)
pub fn evaluer_detaille(expr_str: &str, ctx: &Contexte) -> Resultat<(String, DemarcheNoyau)> {
    let s = expr_str.trim();
    if s.is_empty() {
        return Err(ErreurCalc::syntaxe("entrée vide"));
    }
    if s.chars().count() > LONGUEUR_MAX {
        return Err(ErreurCalc::syntaxe(format!(
            "expression trop longue (max {LONGUEUR_MAX} caractères)"
        )));
    }

    // 1) Jetons bruts puis canoniques
    let bruts = tokenize(s)?;
    let jetons = normalise(bruts, ctx)?;
    let jetons_txt = format_tokens(&jetons);
    debug!("jetons: {jetons_txt}");

    // 2) RPN
    let rpn = to_rpn(&jetons)?;
    let rpn_txt = format_tokens(&rpn);
    debug!("rpn: {rpn_txt}");

    // 3) AST
    let expr0 = from_rpn(&rpn)?;
    if expr0.profondeur() > PROFONDEUR_MAX {
        return Err(ErreurCalc::syntaxe(format!(
            "expression trop imbriquée (max {PROFONDEUR_MAX} niveaux)"
        )));
    }
    let avant = format_expr_pretty(&expr0);

    // 4) Unité d’angle (réécriture trig)
    let expr1 = applique_unite_angle(expr0, ctx.unite);

    // 5) Méthodes numériques fermées + n!, nPr, nCr
    // un budget pour toute l’évaluation (passe + calcul final)
    let budget = Budget::default();
    let expr2 = passe_numerique(expr1, &budget)?;
    let apres = format_expr_pretty(&expr2);
    debug!("après passes: {apres}");

    // 6) Calcul final + format
    let v = evalue(&expr2, None, &budget)?;
    let resultat = formate_resultat(v)?;
    debug!("résultat: {resultat}");

    let d = DemarcheNoyau {
        jetons: jetons_txt,
        rpn: rpn_txt,
        avant,
        apres,
        note: format!(
            "Pipeline ({}) : jetons → normalisation → RPN → Expr → trig → méthodes numériques → calcul → format.",
            ctx.unite.libelle()
        ),
    };

    Ok((resultat, d))
}
