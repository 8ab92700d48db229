// src/noyau/numerique.rs
//
// Méthodes numériques et combinatoire exacte.
// - int(f, a, b)   : Simpson composite, 500 sous-intervalles, résultat signé si a > b
// - sum(f, d, n)   : bornes arrondies à l’entier le plus proche, somme vide si d > n
// - diff(f, x0)    : différence centrée, h = 1e-6
// - n!, nPr, nCr   : produits exacts en BigUint, arrêt dès que la valeur dépasse f64
//
// `passe_numerique` remplace chaque méthode FERMÉE (bornes sans x) et chaque
// n!, nPr, nCr à opérandes littéraux par un littéral, de l’intérieur vers l’extérieur.
//
// Un seul `Budget` par évaluation : chaque appel de l’intégrande (toutes méthodes,
// tous niveaux d’imbrication) en consomme une unité.

use std::cell::Cell;

use log::trace;
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};

use super::calcul::evalue;
use super::erreurs::{ErreurCalc, Resultat};
use super::expr::Expr;

pub const SIMPSON_INTERVALLES: usize = 500;
pub const PAS_DERIVEE: f64 = 1e-6;
pub const SOMME_MAX_TERMES: i64 = 1_000_000;

/// Au-delà, n! n’est plus représentable en f64.
pub const FACTORIELLE_MAX: u64 = 170;

/// Appels d’intégrande autorisés pour UNE évaluation complète.
/// sum(…,1,1000000) seul passe ; une somme dépendante dans une somme s’arrête.
pub const BUDGET_EVALUATIONS: u64 = 2_000_000;

/// Plus grand entier exactement représentable en f64 (2^53).
const ENTIER_EXACT_MAX: f64 = 9_007_199_254_740_992.0;

/// f64::MAX < 2^1024 : au-delà de 1024 bits, le produit est infini en f64.
const BITS_F64_MAX: u64 = 1024;

/* ------------------------ Budget ------------------------ */

/// Compteur partagé (par référence) entre la passe numérique et le calcul final.
#[derive(Debug)]
pub struct Budget {
    restant: Cell<u64>,
}

impl Default for Budget {
    fn default() -> Self {
        Self::new(BUDGET_EVALUATIONS)
    }
}

impl Budget {
    pub fn new(max: u64) -> Self {
        Self {
            restant: Cell::new(max),
        }
    }

    /// Réserve un appel d’intégrande ; Domaine une fois le budget épuisé.
    pub fn consomme(&self) -> Resultat<()> {
        match self.restant.get() {
            0 => Err(ErreurCalc::domaine(format!(
                "méthodes imbriquées : plus de {BUDGET_EVALUATIONS} évaluations"
            ))),
            r => {
                self.restant.set(r - 1);
                Ok(())
            }
        }
    }

    pub fn restant(&self) -> u64 {
        self.restant.get()
    }
}

/* ------------------------ Méthodes numériques ------------------------ */

/// Simpson composite sur [a, b]. Si a > b, le pas est négatif : résultat signé.
pub fn simpson<F>(mut f: F, a: f64, b: f64) -> Resultat<f64>
where
    F: FnMut(f64) -> Resultat<f64>,
{
    let n = SIMPSON_INTERVALLES;
    let h = (b - a) / n as f64;

    let mut acc = f(a)? + f(b)?;
    for i in 1..n {
        let poids = if i % 2 == 1 { 4.0 } else { 2.0 };
        acc += poids * f(a + i as f64 * h)?;
    }

    Ok(acc * h / 3.0)
}

/// Σ f(i) pour i entier de round(debut) à round(fin).
pub fn somme<F>(mut f: F, debut: f64, fin: f64) -> Resultat<f64>
where
    F: FnMut(f64) -> Resultat<f64>,
{
    let d = borne_entiere(debut)?;
    let n = borne_entiere(fin)?;
    if d > n {
        return Ok(0.0);
    }

    let termes = n as i128 - d as i128 + 1;
    if termes > SOMME_MAX_TERMES as i128 {
        return Err(ErreurCalc::domaine(format!(
            "sum: {termes} termes (max {SOMME_MAX_TERMES})"
        )));
    }

    let mut acc = 0.0;
    for i in d..=n {
        acc += f(i as f64)?;
    }
    Ok(acc)
}

/// Arrondi « demi vers +∞ » (floor(v + 0.5)), borne finie exigée.
fn borne_entiere(v: f64) -> Resultat<i64> {
    if !v.is_finite() {
        return Err(ErreurCalc::domaine("sum: borne non finie"));
    }
    let r = (v + 0.5).floor();
    if r.abs() > ENTIER_EXACT_MAX {
        return Err(ErreurCalc::domaine("sum: borne trop grande"));
    }
    Ok(r as i64)
}

/// (f(x0 + h) − f(x0 − h)) / 2h
pub fn derivee_centrale<F>(mut f: F, x0: f64) -> Resultat<f64>
where
    F: FnMut(f64) -> Resultat<f64>,
{
    let h = PAS_DERIVEE;
    Ok((f(x0 + h)? - f(x0 - h)?) / (2.0 * h))
}

/* ------------------------ Combinatoire exacte ------------------------ */

/// Opérande entier positif ou nul, exactement représentable.
fn entier_naturel(v: f64, quoi: &str) -> Resultat<u64> {
    if !v.is_finite() || v.fract() != 0.0 {
        return Err(ErreurCalc::domaine(format!("{quoi}: entier attendu, reçu {v}")));
    }
    if v < 0.0 {
        return Err(ErreurCalc::domaine(format!("{quoi}: entier négatif {v}")));
    }
    if v > ENTIER_EXACT_MAX {
        return Err(ErreurCalc::domaine(format!("{quoi}: entier trop grand {v}")));
    }
    Ok(v as u64)
}

/// Conversion finale : +∞ si la valeur sort de f64.
fn vers_f64(n: &BigUint) -> f64 {
    if n.bits() > BITS_F64_MAX {
        return f64::INFINITY;
    }
    n.to_f64().unwrap_or(f64::INFINITY)
}

/// lo · (lo+1) · … · hi (1 si lo > hi), arrêt anticipé au-delà de f64.
fn produit(lo: u64, hi: u64) -> f64 {
    let mut acc = BigUint::one();
    for k in lo..=hi {
        acc *= k;
        if acc.bits() > BITS_F64_MAX {
            return f64::INFINITY;
        }
    }
    vers_f64(&acc)
}

fn fini_ou_depassement(v: f64, quoi: &str) -> Resultat<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ErreurCalc::depassement(format!("{quoi}: résultat hors plage")))
    }
}

pub fn factorielle(v: f64) -> Resultat<f64> {
    let n = entier_naturel(v, "n!")?;
    if n > FACTORIELLE_MAX {
        return Err(ErreurCalc::depassement(format!(
            "{n}! dépasse la plage (max {FACTORIELLE_MAX}!)"
        )));
    }
    Ok(produit(2, n))
}

/// nPr = n! / (n−r)!
pub fn permutations(n: f64, r: f64) -> Resultat<f64> {
    let n = entier_naturel(n, "nPr")?;
    let r = entier_naturel(r, "nPr")?;
    if r > n {
        return Err(ErreurCalc::domaine(format!("nPr: r = {r} > n = {n}")));
    }
    fini_ou_depassement(produit(n - r + 1, n), "nPr")
}

/// nCr = n! / (r! (n−r)!)
pub fn combinaisons(n: f64, r: f64) -> Resultat<f64> {
    let n = entier_naturel(n, "nCr")?;
    let r = entier_naturel(r, "nCr")?;
    if r > n {
        return Err(ErreurCalc::domaine(format!("nCr: r = {r} > n = {n}")));
    }

    // C(n−r'+k, k) est entier à chaque étape et croît avec k
    let r2 = r.min(n - r);
    let mut acc = BigUint::one();
    for k in 1..=r2 {
        acc = acc * (n - r2 + k) / k;
        if acc.bits() > BITS_F64_MAX {
            return Err(ErreurCalc::depassement("nCr: résultat hors plage"));
        }
    }
    fini_ou_depassement(vers_f64(&acc), "nCr")
}

/* ------------------------ Passe numérique ------------------------ */

/// Replie les noeuds fermés en littéraux (enfants d’abord).
pub fn passe_numerique(expr: Expr, budget: &Budget) -> Resultat<Expr> {
    use Expr::*;

    let b = |e: Box<Expr>| -> Resultat<Box<Expr>> {
        Ok(Box::new(passe_numerique(*e, budget)?))
    };

    let out = match expr {
        Num(_) | Var(_) => expr,

        Neg(a) => Neg(b(a)?),
        Add(x, y) => Add(b(x)?, b(y)?),
        Sub(x, y) => Sub(b(x)?, b(y)?),
        Mul(x, y) => Mul(b(x)?, b(y)?),
        Div(x, y) => Div(b(x)?, b(y)?),
        Pow(x, y) => Pow(b(x)?, b(y)?),

        Appel(f, args) => Appel(
            f,
            args.into_iter()
                .map(|a| passe_numerique(a, budget))
                .collect::<Resultat<Vec<_>>>()?,
        ),

        Fact(a) => match *b(a)? {
            Num(v) => Num(factorielle(v)?),
            a => Fact(Box::new(a)),
        },
        Perm(x, y) => match (*b(x)?, *b(y)?) {
            (Num(n), Num(r)) => Num(permutations(n, r)?),
            (x, y) => Perm(Box::new(x), Box::new(y)),
        },
        Comb(x, y) => match (*b(x)?, *b(y)?) {
            (Num(n), Num(r)) => Num(combinaisons(n, r)?),
            (x, y) => Comb(Box::new(x), Box::new(y)),
        },

        Integrale(f, lo, hi) => replie_si_fermee(Integrale(b(f)?, b(lo)?, b(hi)?), budget)?,
        Somme(f, lo, hi) => replie_si_fermee(Somme(b(f)?, b(lo)?, b(hi)?), budget)?,
        Derivee(f, x0) => replie_si_fermee(Derivee(b(f)?, b(x0)?), budget)?,
    };

    Ok(out)
}

fn replie_si_fermee(methode: Expr, budget: &Budget) -> Resultat<Expr> {
    if methode.contient_var_libre() {
        return Ok(methode);
    }
    let v = evalue(&methode, None, budget)?;
    trace!("passe numérique: méthode repliée -> {v}");
    Ok(Expr::Num(v))
}
