// src/noyau/calcul.rs
//
// Évaluateur final (f64), restreint à la grammaire fermée de `Expr`.
// - domaine vérifié ici : division par 0, √ négatif, ln/log ≤ 0, gcd/lcm non entiers
// - les NaN/±∞ « naturels » (asin(2), 10^400…) remontent tels quels : format.rs tranche
// - `x` n’est lié que par int/sum/diff ; ailleurs c’est une erreur de syntaxe

use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

use super::erreurs::{ErreurCalc, Resultat};
use super::expr::{Expr, Fonction};
use super::numerique::{
    combinaisons, derivee_centrale, factorielle, permutations, simpson, somme, Budget,
};

/// Évalue `expr` ; `x` est la valeur liée de la variable libre, s’il y en a une.
/// Chaque appel d’intégrande (int/sum/diff, à tout niveau) est imputé à `budget`.
pub fn evalue(expr: &Expr, x: Option<f64>, budget: &Budget) -> Resultat<f64> {
    use Expr::*;

    let v = match expr {
        Num(v) => *v,
        Var(nom) => x.ok_or_else(|| {
            ErreurCalc::syntaxe(format!("variable {nom} hors de int/sum/diff"))
        })?,

        Neg(a) => -evalue(a, x, budget)?,
        Add(a, b) => evalue(a, x, budget)? + evalue(b, x, budget)?,
        Sub(a, b) => evalue(a, x, budget)? - evalue(b, x, budget)?,
        Mul(a, b) => evalue(a, x, budget)? * evalue(b, x, budget)?,
        Div(a, b) => {
            let n = evalue(a, x, budget)?;
            let d = evalue(b, x, budget)?;
            if d == 0.0 {
                return Err(ErreurCalc::domaine("division par zéro"));
            }
            n / d
        }
        Pow(a, b) => evalue(a, x, budget)?.powf(evalue(b, x, budget)?),

        Fact(a) => factorielle(evalue(a, x, budget)?)?,
        Perm(n, r) => permutations(evalue(n, x, budget)?, evalue(r, x, budget)?)?,
        Comb(n, r) => combinaisons(evalue(n, x, budget)?, evalue(r, x, budget)?)?,

        Appel(f, args) => {
            let vals = args
                .iter()
                .map(|a| evalue(a, x, budget))
                .collect::<Resultat<Vec<f64>>>()?;
            applique(*f, &vals)?
        }

        // f est réévaluée avec SA propre liaison de x
        Integrale(f, a, b) => {
            let (a, b) = (evalue(a, x, budget)?, evalue(b, x, budget)?);
            simpson(integrande(f, budget), a, b)?
        }
        Somme(f, debut, fin) => {
            let (d, n) = (evalue(debut, x, budget)?, evalue(fin, x, budget)?);
            somme(integrande(f, budget), d, n)?
        }
        Derivee(f, x0) => {
            let x0 = evalue(x0, x, budget)?;
            derivee_centrale(integrande(f, budget), x0)?
        }
    };

    Ok(v)
}

/// f(t) avec x := t, un appel imputé au budget.
fn integrande<'a>(f: &'a Expr, budget: &'a Budget) -> impl FnMut(f64) -> Resultat<f64> + 'a {
    move |t| {
        budget.consomme()?;
        evalue(f, Some(t), budget)
    }
}

fn applique(f: Fonction, a: &[f64]) -> Resultat<f64> {
    use Fonction::*;

    if a.len() != f.arite() {
        return Err(ErreurCalc::syntaxe(format!(
            "{}: {} argument(s) attendu(s), {} reçu(s)",
            f.nom(),
            f.arite(),
            a.len()
        )));
    }

    let v = match f {
        Sin => a[0].sin(),
        Cos => a[0].cos(),
        Tan => a[0].tan(),
        Asin => a[0].asin(),
        Acos => a[0].acos(),
        Atan => a[0].atan(),

        Sinh => a[0].sinh(),
        Cosh => a[0].cosh(),
        Tanh => a[0].tanh(),
        Asinh => a[0].asinh(),
        Acosh => a[0].acosh(),
        Atanh => a[0].atanh(),

        Ln => {
            strictement_positif(a[0], "ln")?;
            a[0].ln()
        }
        Log => {
            strictement_positif(a[0], "log")?;
            a[0].log10()
        }
        Exp => a[0].exp(),
        Sqrt => {
            if a[0] < 0.0 {
                return Err(ErreurCalc::domaine(format!("√ d’un négatif ({})", a[0])));
            }
            a[0].sqrt()
        }
        Cbrt => a[0].cbrt(),
        Abs => a[0].abs(),
        Floor => a[0].floor(),

        Gcd => pgcd(entier(a[0], "gcd")?, entier(a[1], "gcd")?),
        Lcm => {
            let (p, q) = (entier(a[0], "lcm")?, entier(a[1], "lcm")?);
            let g = pgcd(p, q);
            if g == 0.0 {
                0.0
            } else {
                (p / g * q).abs()
            }
        }

        Ran => aleatoire(),
    };

    Ok(v)
}

fn strictement_positif(v: f64, quoi: &str) -> Resultat<()> {
    if v <= 0.0 {
        return Err(ErreurCalc::domaine(format!("{quoi} de {v} (≤ 0)")));
    }
    Ok(())
}

fn entier(v: f64, quoi: &str) -> Resultat<f64> {
    if !v.is_finite() || v.fract() != 0.0 {
        return Err(ErreurCalc::domaine(format!("{quoi}: entier attendu, reçu {v}")));
    }
    Ok(v.abs())
}

/// Euclide sur des entiers portés par f64 (déjà positifs).
fn pgcd(mut a: f64, mut b: f64) -> f64 {
    while b != 0.0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/* ------------------------ Ran# ------------------------ */

// LCG 64 bits par thread, graine = horloge (aucune reproductibilité attendue).
thread_local! {
    static ETAT_ALEA: Cell<u64> = Cell::new(graine());
}

fn graine() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x9E37_79B9_7F4A_7C15);
    nanos | 1
}

/// Uniforme dans [0, 1).
fn aleatoire() -> f64 {
    ETAT_ALEA.with(|etat| {
        let s = etat
            .get()
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        etat.set(s);
        (s >> 11) as f64 / (1u64 << 53) as f64
    })
}
