// src/noyau/normalisation.rs
//
// Normalisation du flux de jetons (aucune évaluation ici) :
// - glyphes × ÷ -> opérateurs canoniques ; π, e -> littéraux
// - Ans -> ( valeur précédente )
// - ln, log, √, ∛, abs… -> fonctions canoniques ; int/sum/diff -> méthodes
// - suffixes d’ingénierie repliés dans le littéral (5k -> 5000)
// - constantes et variables mémoire -> littéraux
// - produit implicite : 2π, 3sin(30), 2(1+1), (1)(2)
//
// Seuls des jetons ENTIERS sont remplacés : "e" ne touche jamais "exp" ni "eps0".

use std::f64::consts::{E, PI};

use log::trace;

use super::constantes::constante;
use super::contexte::{Contexte, VARIABLES_MEMOIRE};
use super::erreurs::{ErreurCalc, Resultat};
use super::expr::{Fonction, Methode, VAR_LIBRE};
use super::jetons::{tokenize, Tok};

/// Exposant décimal d’un suffixe d’ingénierie.
pub fn exposant_suffixe(s: char) -> Option<i32> {
    match s {
        'G' => Some(9),
        'M' => Some(6),
        'k' => Some(3),
        'm' => Some(-3),
        'µ' | 'u' => Some(-6),
        _ => None,
    }
}

/// v × 10^exp. Division pour les exposants négatifs (5m = 5/1000, pas 5×0.001).
fn applique_suffixe(v: f64, exp: i32) -> f64 {
    if exp >= 0 {
        v * 10f64.powi(exp)
    } else {
        v / 10f64.powi(-exp)
    }
}

/// Normalise une suite de jetons bruts en suite canonique.
pub fn normalise(jetons: Vec<Tok>, ctx: &Contexte) -> Resultat<Vec<Tok>> {
    let mut out: Vec<Tok> = Vec::with_capacity(jetons.len() + 8);

    for tok in jetons {
        let canon: Vec<Tok> = match tok {
            Tok::Glyphe('×') => vec![Tok::Star],
            Tok::Glyphe('÷') => vec![Tok::Slash],
            Tok::Glyphe('π') => vec![Tok::Num(PI)],
            Tok::Glyphe('√') => vec![Tok::Fonction(Fonction::Sqrt)],
            Tok::Glyphe('∛') => vec![Tok::Fonction(Fonction::Cbrt)],
            Tok::Glyphe(g) => {
                return Err(ErreurCalc::syntaxe(format!("glyphe inconnu: '{g}'")));
            }

            Tok::Suffixe(s) => {
                let exp = exposant_suffixe(s)
                    .ok_or_else(|| ErreurCalc::syntaxe(format!("suffixe inconnu: '{s}'")))?;
                match out.last_mut() {
                    Some(Tok::Num(v)) => *v = applique_suffixe(*v, exp),
                    _ => {
                        return Err(ErreurCalc::syntaxe(format!(
                            "suffixe '{s}' sans nombre devant"
                        )))
                    }
                }
                continue;
            }

            Tok::Ident(nom) => normalise_ident(&nom, ctx)?,

            autre => vec![autre],
        };

        for t in canon {
            pousse(&mut out, t);
        }
    }

    trace!("normalisation: {} jetons", out.len());
    Ok(out)
}

/// Empile un jeton canonique, en insérant le produit implicite si besoin.
fn pousse(out: &mut Vec<Tok>, t: Tok) {
    let commence_valeur = matches!(
        t,
        Tok::Num(_) | Tok::Ident(_) | Tok::LPar | Tok::Fonction(_) | Tok::Methode(_)
    );
    if commence_valeur && out.last().is_some_and(Tok::termine_valeur) {
        out.push(Tok::Star);
    }
    out.push(t);
}

fn normalise_ident(nom: &str, ctx: &Contexte) -> Resultat<Vec<Tok>> {
    // Constantes mathématiques
    match nom {
        "pi" | "Math.PI" => return Ok(vec![Tok::Num(PI)]),
        "e" | "Math.E" => return Ok(vec![Tok::Num(E)]),
        "Ans" => return ans_parenthese(&ctx.ans),
        "Ran#" => {
            return Ok(vec![
                Tok::Fonction(Fonction::Ran),
                Tok::LPar,
                Tok::RPar,
            ])
        }
        _ => {}
    }

    // Alias Math.xxx : Math.log est le logarithme NÉPÉRIEN, Math.log10 le décimal
    if let Some(membre) = nom.strip_prefix("Math.") {
        let f = match membre {
            "log" => Some(Fonction::Ln),
            "log10" => Some(Fonction::Log),
            "random" => Some(Fonction::Ran),
            autre => Fonction::depuis_nom(autre),
        };
        return f
            .map(|f| vec![Tok::Fonction(f)])
            .ok_or_else(|| ErreurCalc::syntaxe(format!("identifiant inconnu: {nom}")));
    }

    if let Some(f) = Fonction::depuis_nom(nom) {
        return Ok(vec![Tok::Fonction(f)]);
    }
    if let Some(m) = Methode::depuis_nom(nom) {
        return Ok(vec![Tok::Methode(m)]);
    }
    if let Some(v) = constante(nom) {
        return Ok(vec![Tok::Num(v)]);
    }
    if VARIABLES_MEMOIRE.contains(&nom) {
        return Ok(vec![Tok::Num(ctx.variable(nom))]);
    }
    if nom == VAR_LIBRE {
        return Ok(vec![Tok::Ident(nom.to_string())]);
    }

    Err(ErreurCalc::syntaxe(format!("identifiant inconnu: {nom}")))
}

/// Ans -> ( valeur ). La valeur doit être un nombre formaté (éventuellement signé).
fn ans_parenthese(ans: &str) -> Resultat<Vec<Tok>> {
    let jetons = tokenize(ans.trim())?;
    let numerique = !jetons.is_empty()
        && jetons
            .iter()
            .all(|t| matches!(t, Tok::Num(_) | Tok::Plus | Tok::Minus));
    if !numerique {
        return Err(ErreurCalc::syntaxe(format!("Ans invalide: {ans:?}")));
    }

    let mut out = Vec::with_capacity(jetons.len() + 2);
    out.push(Tok::LPar);
    out.extend(jetons);
    out.push(Tok::RPar);
    Ok(out)
}
