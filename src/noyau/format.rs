// src/noyau/format.rs
//
// Affichage : résultat final + expressions pour la démarche.

use super::erreurs::{ErreurCalc, Resultat};
use super::expr::Expr;

/// Au-delà (en valeur absolue) : notation scientifique.
const SEUIL_GRAND: f64 = 1e15;
/// En deçà (non nul) : notation scientifique.
const SEUIL_PETIT: f64 = 1e-12;

/* ------------------------ Résultat final ------------------------ */

/// Formate un résultat numérique.
/// - NaN -> erreur de domaine ; ±∞ -> dépassement
/// - |r| > 1e15 ou 0 < |r| < 1e-12 -> mantisse à 8 décimales, exposant signé (1.50000000e+20)
/// - sinon 12 chiffres significatifs, zéros de queue retirés ; -0 s’affiche 0
///
/// La sortie est relisible par le noyau : formater(relire(s)) == s.
pub fn formate_resultat(v: f64) -> Resultat<String> {
    if v.is_nan() {
        return Err(ErreurCalc::domaine("résultat non numérique"));
    }
    if v.is_infinite() {
        return Err(ErreurCalc::depassement("résultat infini"));
    }

    if !zone_scientifique(v) {
        return Ok(format_decimal(v));
    }

    // l’arrondi de la mantisse peut ramener la valeur sur un seuil (9.99999999999e-13)
    let s = format_scientifique(v);
    let relu: f64 = s.parse().unwrap_or(v);
    if zone_scientifique(relu) {
        Ok(s)
    } else {
        Ok(format_decimal(relu))
    }
}

fn zone_scientifique(v: f64) -> bool {
    let a = v.abs();
    a > SEUIL_GRAND || (a > 0.0 && a < SEUIL_PETIT)
}

fn format_scientifique(v: f64) -> String {
    // Rust écrit "1.50000000e20" : on ajoute le '+' des exposants positifs
    let s = format!("{v:.8e}");
    match s.split_once('e') {
        Some((mantisse, exp)) if !exp.starts_with('-') => format!("{mantisse}e+{exp}"),
        _ => s,
    }
}

fn format_decimal(v: f64) -> String {
    // arrondi à 12 chiffres significatifs, puis écriture la plus courte
    let arrondi: f64 = format!("{v:.11e}").parse().unwrap_or(v);
    if arrondi == 0.0 {
        return "0".to_string();
    }
    format!("{arrondi}")
}

/* ------------------------ Démarche ------------------------ */

fn format_num(v: f64) -> String {
    if v.is_finite() {
        formate_resultat(v).unwrap_or_else(|_| v.to_string())
    } else {
        v.to_string()
    }
}

/// Écriture infixe entièrement parenthésée (pas de règle de priorité à deviner).
pub fn format_expr_pretty(e: &Expr) -> String {
    use Expr::*;

    match e {
        Num(v) if *v < 0.0 => format!("({})", format_num(*v)),
        Num(v) => format_num(*v),
        Var(s) => s.clone(),

        Neg(a) => format!("-{}", format_expr_pretty(a)),
        Fact(a) => format!("{}!", format_expr_pretty(a)),

        Add(a, b) => binaire(a, "+", b),
        Sub(a, b) => binaire(a, "-", b),
        Mul(a, b) => binaire(a, "*", b),
        Div(a, b) => binaire(a, "/", b),
        Pow(a, b) => binaire(a, "^", b),
        Perm(a, b) => binaire(a, "P", b),
        Comb(a, b) => binaire(a, "C", b),

        Appel(f, args) => format!("{}({})", f.nom(), liste(args.iter())),

        Integrale(f, a, b) => format!("int({})", liste([&**f, &**a, &**b])),
        Somme(f, a, b) => format!("sum({})", liste([&**f, &**a, &**b])),
        Derivee(f, x0) => format!("diff({})", liste([&**f, &**x0])),
    }
}

fn binaire(a: &Expr, op: &str, b: &Expr) -> String {
    format!("({}{op}{})", format_expr_pretty(a), format_expr_pretty(b))
}

fn liste<'a>(args: impl IntoIterator<Item = &'a Expr>) -> String {
    args.into_iter()
        .map(format_expr_pretty)
        .collect::<Vec<_>>()
        .join(", ")
}
