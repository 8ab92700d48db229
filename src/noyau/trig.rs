// src/noyau/trig.rs
//
// Expansion trig selon l’unité d’angle (réécriture de l’AST, avant toute évaluation)
// --------------------------------------------------------------------------------
// - Degrés  : sin/cos/tan(a)    -> sin/cos/tan(a · π/180)
//             asin/acos/atan(a) -> (180/π) · asin/acos/atan(a)
// - Radians : aucune conversion
// - Hyperboliques (sinh, asinh…) : jamais converties
//
// La réécriture descend partout, y compris dans les intégrandes de int/sum/diff.

use std::f64::consts::PI;

use super::contexte::UniteAngle;
use super::expr::Expr;

pub const DEG_VERS_RAD: f64 = PI / 180.0;
pub const RAD_VERS_DEG: f64 = 180.0 / PI;

/// Applique l’unité d’angle à tout l’arbre.
pub fn applique_unite_angle(expr: Expr, unite: UniteAngle) -> Expr {
    match unite {
        UniteAngle::Radians => expr,
        UniteAngle::Degres => en_degres(expr),
    }
}

fn en_degres(expr: Expr) -> Expr {
    use Expr::*;

    let b = |e: Box<Expr>| Box::new(en_degres(*e));

    match expr {
        // --- trig au noeud courant ---
        Appel(f, args) if f.est_trig_directe() => {
            let args = args
                .into_iter()
                .map(|a| Mul(Box::new(en_degres(a)), Box::new(Num(DEG_VERS_RAD))))
                .collect();
            Appel(f, args)
        }
        Appel(f, args) if f.est_trig_inverse() => {
            let args = args.into_iter().map(en_degres).collect();
            Mul(Box::new(Num(RAD_VERS_DEG)), Box::new(Appel(f, args)))
        }
        Appel(f, args) => Appel(f, args.into_iter().map(en_degres).collect()),

        // --- descente structurée ---
        Neg(a) => Neg(b(a)),
        Fact(a) => Fact(b(a)),
        Add(x, y) => Add(b(x), b(y)),
        Sub(x, y) => Sub(b(x), b(y)),
        Mul(x, y) => Mul(b(x), b(y)),
        Div(x, y) => Div(b(x), b(y)),
        Pow(x, y) => Pow(b(x), b(y)),
        Perm(x, y) => Perm(b(x), b(y)),
        Comb(x, y) => Comb(b(x), b(y)),

        Integrale(f, lo, hi) => Integrale(b(f), b(lo), b(hi)),
        Somme(f, lo, hi) => Somme(b(f), b(lo), b(hi)),
        Derivee(f, x0) => Derivee(b(f), b(x0)),

        // --- feuilles ---
        Num(_) | Var(_) => expr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::expr::Fonction;

    fn appel(f: Fonction, v: f64) -> Expr {
        Expr::Appel(f, vec![Expr::Num(v)])
    }

    #[test]
    fn radians_inchange() {
        let e = appel(Fonction::Sin, 1.0);
        assert_eq!(applique_unite_angle(e.clone(), UniteAngle::Radians), e);
    }

    #[test]
    fn degres_directe_convertit_argument() {
        let e = applique_unite_angle(appel(Fonction::Cos, 60.0), UniteAngle::Degres);
        let attendu = Expr::Appel(
            Fonction::Cos,
            vec![Expr::Mul(
                Box::new(Expr::Num(60.0)),
                Box::new(Expr::Num(DEG_VERS_RAD)),
            )],
        );
        assert_eq!(e, attendu);
    }

    #[test]
    fn degres_inverse_convertit_resultat() {
        let e = applique_unite_angle(appel(Fonction::Atan, 1.0), UniteAngle::Degres);
        assert!(matches!(e, Expr::Mul(ref k, _) if **k == Expr::Num(RAD_VERS_DEG)));
    }

    #[test]
    fn hyperboliques_jamais_converties() {
        let e = appel(Fonction::Sinh, 1.0);
        assert_eq!(applique_unite_angle(e.clone(), UniteAngle::Degres), e);
    }
}
