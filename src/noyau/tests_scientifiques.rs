//! Tests scientifiques (campagne) : propriétés du noyau + limites contrôlées.
//!
//! But : vérifier les résultats attendus d’une calculatrice sans faire chauffer la machine.
//! - budget temps sur les tests de stress
//! - tailles bornées (profondeur, longueur)
//!
//! Notes :
//! - les comparaisons portent sur la chaîne affichée (12 chiffres significatifs),
//!   sauf pour les méthodes approchées (diff) où l’on compare à une tolérance.
//! - le degré est l’unité par défaut ; les tests en radians le disent explicitement.

use std::time::{Duration, Instant};

use super::contexte::UniteAngle::{self, Degres, Radians};
use super::eval::{evaluer, MARQUEUR_ERREUR};

fn deg(expr: &str) -> String {
    evaluer(expr, Degres, "0")
}

fn rad(expr: &str) -> String {
    evaluer(expr, Radians, "0")
}

fn assert_res(expr: &str, unite: UniteAngle, attendu: &str) {
    assert_eq!(evaluer(expr, unite, "0"), attendu, "expr={expr:?} ({unite:?})");
}

fn assert_erreur(expr: &str) {
    assert_eq!(deg(expr), MARQUEUR_ERREUR, "expr={expr:?} devait échouer");
}

fn valeur(expr: &str, unite: UniteAngle) -> f64 {
    let s = evaluer(expr, unite, "0");
    s.parse()
        .unwrap_or_else(|_| panic!("expr={expr:?} : résultat non numérique {s:?}"))
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Arithmétique et priorités ------------------------ */

#[test]
fn sci_priorites() {
    assert_res("2+3×4", Degres, "14");
    assert_res("2+3*4", Degres, "14");
    assert_res("(2+3)×4", Degres, "20");
    assert_res("2^3^2", Degres, "512");
    assert_res("-2^2", Degres, "-4");
    assert_res("2*-3", Degres, "-6");
    assert_res("10-4-3", Degres, "3");
    assert_res("2÷4", Degres, "0.5");
}

#[test]
fn sci_produit_implicite() {
    assert_res("2(3+1)", Degres, "8");
    assert_res("(1+1)(2+1)", Degres, "6");
    assert_res("2π", Degres, "6.28318530718");
}

/* ------------------------ Trig et unité d’angle ------------------------ */

#[test]
fn sci_trig_degres() {
    assert_res("sin(30)", Degres, "0.5");
    assert_res("cos(60)", Degres, "0.5");
    assert_res("tan(45)", Degres, "1");
    assert_res("asin(0.5)", Degres, "30");
    assert_res("acos(0)", Degres, "90");
}

#[test]
fn sci_trig_radians() {
    assert_res("sin(Math.PI/6)", Radians, "0.5");
    assert_res("sin(pi/2)", Radians, "1");
    assert_res("atan(1)*4", Radians, "3.14159265359");
}

#[test]
fn sci_hyperboliques_independantes_de_l_unite() {
    for e in ["sinh(1)", "cosh(2)", "tanh(0.5)", "asinh(1)"] {
        assert_eq!(deg(e), rad(e), "expr={e:?}");
    }
}

#[test]
fn sci_trig_inverse_hors_domaine() {
    assert_erreur("asin(2)");
    assert_erreur("acos(-1.5)");
}

/* ------------------------ Méthodes numériques ------------------------ */

#[test]
fn sci_somme() {
    assert_res("sum(x^2,1,3)", Degres, "14");
    assert_res("sum(x,1,100)", Degres, "5050");
    // bornes inversées : somme vide
    assert_res("sum(x,5,1)", Degres, "0");
}

#[test]
fn sci_integrale() {
    assert_res("int(x,0,1)", Degres, "0.5");
    assert_res("int(x^2,0,3)", Degres, "9");
    // bornes inversées : intégrale signée
    assert_res("int(x,1,0)", Degres, "-0.5");
    assert!((valeur("int(sin(x),0,pi)", Radians) - 2.0).abs() < 1e-9);
}

#[test]
fn sci_derivee() {
    assert!((valeur("diff(x^2,3)", Degres) - 6.0).abs() < 1e-4);
    assert!((valeur("diff(exp(x),0)", Degres) - 1.0).abs() < 1e-4);
    // intégrale à borne libre, dérivée en 2 : d/dx ∫_0^x 1 = 1
    assert!((valeur("diff(int(1,0,x),2)", Degres) - 1.0).abs() < 1e-4);
}

#[test]
fn sci_virgules_imbriquees() {
    assert_res("int(sum(x,1,2),0,1)", Degres, "3");
    assert_res("gcd(gcd(12,18),4)", Degres, "2");
    assert_res("sum(gcd(x,6),1,6)", Degres, "15");
}

/* ------------------------ Combinatoire ------------------------ */

#[test]
fn sci_combinatoire() {
    assert_res("5!", Degres, "120");
    assert_res("0!", Degres, "1");
    assert_res("5C2", Degres, "10");
    assert_res("5P2", Degres, "20");
    assert_res("3!!", Degres, "720");
    assert_res("-3!", Degres, "-6");
    // nPr / nCr lient leurs littéraux voisins avant le signe et la puissance
    assert_res("-5C2", Degres, "-10");
    assert_res("-5P2", Degres, "-20");
    assert_res("2^5C2", Degres, "1024");
    assert_res("5C2^2", Degres, "100");
    assert_erreur("(-1)!");
    assert_erreur("2.5!");
    assert_erreur("2C5");
    assert_erreur("171!");
}

/* ------------------------ Suffixes, constantes, Ans ------------------------ */

#[test]
fn sci_suffixes() {
    assert_res("5k", Degres, "5000");
    // le suffixe fait partie du littéral : (2k)^2, et non 2×(10^3)^2 = 2000000
    assert_res("2k^2", Degres, "4000000");
    assert_res("3m", Degres, "0.003");
    assert_res("4µ", Degres, "0.000004");
    assert_res("1G/1M", Degres, "1000");
}

#[test]
fn sci_constantes_sans_collision() {
    assert_eq!(deg("exp(1)"), deg("e"));
    assert_res("c", Degres, "299792458");
    assert_res("g", Degres, "9.80665");
    assert_res("h", Degres, "6.62607015e-34");
    assert_res("2mu0", Degres, "0.000002513274");
}

#[test]
fn sci_ans() {
    assert_eq!(evaluer("Ans+1", Degres, "5"), "6");
    assert_eq!(evaluer("2Ans", Degres, "-3"), "-6");
    assert_eq!(evaluer("Ans", Degres, "1.50000000e+20"), "1.50000000e+20");
    assert_eq!(evaluer("Ans+1", Degres, "sin(30)"), MARQUEUR_ERREUR);
}

/* ------------------------ Erreurs ------------------------ */

#[test]
fn sci_erreurs() {
    assert_erreur("5/0");
    assert_erreur("(");
    assert_erreur("2+)");
    assert_erreur("sqrt(-1)");
    assert_erreur("ln(0)");
    assert_erreur("log(-2)");
    assert_erreur("foo(2)");
    assert_erreur("x+1");
    assert_erreur("10^400");
    assert_erreur("1..2");
}

/* ------------------------ Format et relecture ------------------------ */

#[test]
fn sci_formatage() {
    assert_res("0.1+0.2", Degres, "0.3");
    assert_res("10^20", Degres, "1.00000000e+20");
    assert_res("1/3", Degres, "0.333333333333");
    assert_res("2^-50", Degres, "8.88178420e-16");
    assert_res("-0", Degres, "0");
    // hors zone scientifique : toujours en décimal, jamais "1e-7"
    assert_res("10^-7", Degres, "0.0000001");
    assert_res("1e-7", Degres, "0.0000001");
}

#[test]
fn sci_relecture_idempotente() {
    for e in [
        "10^20", "-10^20", "1/3", "-7/2", "2^-50", "pi", "123456789012345", "c*1000000000",
    ] {
        let r = deg(e);
        assert_ne!(r, MARQUEUR_ERREUR, "expr={e:?}");
        assert_eq!(deg(&r), r, "relecture de {r:?} (depuis {e:?})");
    }
}

#[test]
fn sci_determinisme() {
    for e in ["sin(30)+int(x^3,0,2)", "sum(1/x,1,50)", "52C5/5!"] {
        assert_eq!(deg(e), deg(e), "expr={e:?}");
    }
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_taille_somme_safe() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    // 80 termes, arbre penché à gauche : profondeur 80, sous la limite
    let mut expr = String::new();
    for k in 0..80 {
        if k > 0 {
            expr.push_str(" + ");
        }
        expr.push_str("1/2");
        budget(t0, max);
    }

    assert_res(&expr, Degres, "40");
}

#[test]
fn sci_stress_profondeur_racines_safe() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    // sqrt((...)^2) alterné : reste fini, profondeur modérée
    let mut expr = "4".to_string();
    for k in 0..60 {
        expr = if k % 2 == 0 {
            format!("sqrt({expr})")
        } else {
            format!("({expr})^2")
        };
        budget(t0, max);
    }

    assert_res(&expr, Degres, "4");
}

#[test]
fn sci_stress_somme_maximale() {
    // 1 000 000 termes : dernière taille acceptée
    assert_res("sum(1,1,1000000)", Degres, "1000000");
    assert_erreur("sum(1,1,1000001)");
}

#[test]
fn sci_stress_sommes_dependantes_bornees() {
    let max = Duration::from_millis(1500);

    // méthode interne dépendante de x : des centaines de millions d’appels sans budget global
    for e in [
        "sum(sum(1,1,x),1,20000)",
        "sum(sum(sum(1,1,x),1,x),1,1000)",
        "int(int(int(x,0,x),0,x),0,1)",
    ] {
        let t0 = Instant::now();
        assert_erreur(e);
        budget(t0, max);
    }

    // petite version : sous le budget, résultat exact
    assert_res("sum(sum(1,1,x),1,100)", Degres, "5050");
}

#[test]
fn sci_stress_combinatoire_grande() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    assert_res("1000C2", Degres, "499500");
    assert_erreur("100000P50000");
    budget(t0, max);
}
