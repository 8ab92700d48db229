// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir la suite de Tok NORMALISÉE en RPN (postfix)
// - Puis reconstruire Expr
//
// Règles:
// - Fonction / Methode : doit être suivie de '(' ; sort après sa parenthèse fermante,
//   une fois le nombre d’arguments vérifié (arité fixe).
// - Virgule : séparateur d’arguments au niveau de SA parenthèse seulement
//   (on suit la profondeur : int(sum(x,1,2),0,1) est correct).
// - Moins unaire : si '-' arrive quand on n’attend PAS d’opérateur => Neg (préfixe).
// - '!' postfixe : sort directement (priorité maximale).
//
// Priorités (croissantes) : + -  <  * /  <  neg  <  ^ (droite)  <  P C  <  !
// (nPr / nCr lient d’abord leurs deux littéraux voisins : -5C2 = -(5C2), 2^5C2 = 2^(5C2))

use super::erreurs::{ErreurCalc, Resultat};
use super::expr::Expr;
use super::jetons::{format_tokens, Tok};

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Neg => 3,
        Tok::Caret => 4,
        Tok::Perm | Tok::Comb => 5,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Caret | Tok::Neg)
}

fn is_appelable(t: &Tok) -> bool {
    matches!(t, Tok::Fonction(_) | Tok::Methode(_))
}

fn nom_appel(t: &Tok) -> String {
    format_tokens(std::slice::from_ref(t))
}

fn arite_attendue(t: &Tok) -> usize {
    match t {
        Tok::Fonction(f) => f.arite(),
        Tok::Methode(m) => m.arite(),
        _ => 0,
    }
}

/// Parenthèse ouverte : appartient-elle à un appel ? (compte des virgules vues)
#[derive(Clone, Copy, Debug)]
enum Ouvrante {
    Groupe,
    Appel { virgules: usize },
}

/// Convertit une suite de jetons normalisés en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Fonction(sin), LPar, Num(1), Plus, Num(2), RPar]
///   rpn:    [Num(1), Num(2), Plus, Fonction(sin)]
pub fn to_rpn(tokens: &[Tok]) -> Resultat<Vec<Tok>> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();
    let mut ouvrantes: Vec<Ouvrante> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire et les opérandes manquants.
    let mut prev_was_value = false;

    // Après un nom de fonction, seule '(' est admise.
    let mut attend_parenthese = false;

    for tok in tokens.iter().cloned() {
        if attend_parenthese && tok != Tok::LPar {
            let nom = ops.last().map(nom_appel).unwrap_or_default();
            return Err(ErreurCalc::syntaxe(format!("'(' attendue après {nom}")));
        }

        match tok {
            Tok::Num(_) | Tok::Ident(_) => {
                if prev_was_value {
                    return Err(ErreurCalc::syntaxe("opérateur manquant"));
                }
                out.push(tok);
                prev_was_value = true;
            }

            Tok::Fonction(_) | Tok::Methode(_) => {
                if prev_was_value {
                    return Err(ErreurCalc::syntaxe("opérateur manquant"));
                }
                ops.push(tok);
                attend_parenthese = true;
            }

            Tok::LPar => {
                if prev_was_value {
                    return Err(ErreurCalc::syntaxe("opérateur manquant"));
                }
                ouvrantes.push(if attend_parenthese {
                    Ouvrante::Appel { virgules: 0 }
                } else {
                    Ouvrante::Groupe
                });
                ops.push(tok);
                attend_parenthese = false;
                prev_was_value = false;
            }

            Tok::Virgule => {
                if !prev_was_value {
                    return Err(ErreurCalc::syntaxe("argument vide"));
                }
                depile_jusqu_a_ouvrante(&mut ops, &mut out)?;
                match ouvrantes.last_mut() {
                    Some(Ouvrante::Appel { virgules }) => *virgules += 1,
                    _ => return Err(ErreurCalc::syntaxe("virgule hors d’un appel de fonction")),
                }
                prev_was_value = false;
            }

            Tok::RPar => {
                depile_jusqu_a_ouvrante(&mut ops, &mut out)?;
                ops.pop(); // la '(' elle-même

                match ouvrantes.pop() {
                    Some(Ouvrante::Appel { virgules }) => {
                        let f = ops
                            .pop()
                            .filter(is_appelable)
                            .ok_or_else(|| ErreurCalc::syntaxe("appel de fonction invalide"))?;

                        let nb_args = match (prev_was_value, virgules) {
                            (true, v) => v + 1,
                            (false, 0) => 0,
                            (false, _) => return Err(ErreurCalc::syntaxe("argument vide")),
                        };
                        let attendu = arite_attendue(&f);
                        if nb_args != attendu {
                            return Err(ErreurCalc::syntaxe(format!(
                                "{} attend {attendu} argument(s), {nb_args} fourni(s)",
                                nom_appel(&f)
                            )));
                        }
                        out.push(f);
                    }
                    Some(Ouvrante::Groupe) => {
                        if !prev_was_value {
                            return Err(ErreurCalc::syntaxe("parenthèses vides"));
                        }
                    }
                    None => return Err(ErreurCalc::syntaxe("parenthèse fermante en trop")),
                }

                prev_was_value = true;
            }

            Tok::Bang => {
                if !prev_was_value {
                    return Err(ErreurCalc::syntaxe("'!' sans opérande"));
                }
                // postfixe, priorité maximale : sortie directe
                out.push(tok);
            }

            Tok::Minus | Tok::Plus if !prev_was_value => {
                // signe unaire : '-' devient Neg (préfixe), '+' est ignoré
                if tok == Tok::Minus {
                    ops.push(Tok::Neg);
                }
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret | Tok::Perm
            | Tok::Comb => {
                if !prev_was_value {
                    return Err(ErreurCalc::syntaxe(format!(
                        "opérande manquant avant '{}'",
                        nom_appel(&tok)
                    )));
                }

                // dépile tant que:
                // - on n'est pas bloqué par '(' ou par une fonction
                // - et la précédence/associativité exige de sortir l'opérateur du haut
                while let Some(top) = ops.last() {
                    if matches!(top, Tok::LPar) || is_appelable(top) {
                        break;
                    }

                    let p_top = precedence(top);
                    let p_tok = precedence(&tok);

                    let doit_pop = if is_right_associative(&tok) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };

                    if !doit_pop {
                        break;
                    }
                    if let Some(op) = ops.pop() {
                        out.push(op);
                    }
                }

                ops.push(tok);
                prev_was_value = false;
            }

            Tok::Neg | Tok::Glyphe(_) | Tok::Suffixe(_) => {
                return Err(ErreurCalc::syntaxe(format!(
                    "jeton non normalisé: {}",
                    nom_appel(&tok)
                )));
            }
        }
    }

    if attend_parenthese {
        return Err(ErreurCalc::syntaxe("appel de fonction incomplet"));
    }
    if !prev_was_value {
        return Err(ErreurCalc::syntaxe(if tokens.is_empty() {
            "expression vide"
        } else {
            "expression incomplète"
        }));
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) || is_appelable(&op) {
            return Err(ErreurCalc::syntaxe("parenthèses non fermées"));
        }
        out.push(op);
    }

    Ok(out)
}

/// Dépile les opérateurs jusqu’à la '(' courante (exclue). Erreur si aucune.
fn depile_jusqu_a_ouvrante(ops: &mut Vec<Tok>, out: &mut Vec<Tok>) -> Resultat<()> {
    loop {
        match ops.last() {
            Some(Tok::LPar) => return Ok(()),
            Some(_) => {
                if let Some(op) = ops.pop() {
                    out.push(op);
                }
            }
            None => return Err(ErreurCalc::syntaxe("parenthèses mal équilibrées")),
        }
    }
}

/// Construit une Expr à partir d’une RPN.
pub fn from_rpn(rpn: &[Tok]) -> Resultat<Expr> {
    let mut st: Vec<Expr> = Vec::new();

    fn pop(st: &mut Vec<Expr>) -> Resultat<Box<Expr>> {
        st.pop()
            .map(Box::new)
            .ok_or_else(|| ErreurCalc::syntaxe("expression invalide"))
    }

    for tok in rpn.iter().cloned() {
        let e = match tok {
            Tok::Num(v) => Expr::Num(v),
            Tok::Ident(name) => Expr::Var(name),

            Tok::Neg => Expr::Neg(pop(&mut st)?),
            Tok::Bang => Expr::Fact(pop(&mut st)?),

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret | Tok::Perm
            | Tok::Comb => {
                let b = pop(&mut st)?;
                let a = pop(&mut st)?;
                match tok {
                    Tok::Plus => Expr::Add(a, b),
                    Tok::Minus => Expr::Sub(a, b),
                    Tok::Star => Expr::Mul(a, b),
                    Tok::Slash => Expr::Div(a, b),
                    Tok::Caret => Expr::Pow(a, b),
                    Tok::Perm => Expr::Perm(a, b),
                    _ => Expr::Comb(a, b),
                }
            }

            Tok::Fonction(f) => {
                let n = f.arite();
                if st.len() < n {
                    return Err(ErreurCalc::syntaxe("fonction sans argument"));
                }
                let args = st.split_off(st.len() - n);
                Expr::Appel(f, args)
            }

            Tok::Methode(m) => {
                use super::expr::Methode;
                match m {
                    Methode::Integrale => {
                        let b = pop(&mut st)?;
                        let a = pop(&mut st)?;
                        let f = pop(&mut st)?;
                        Expr::Integrale(f, a, b)
                    }
                    Methode::Somme => {
                        let fin = pop(&mut st)?;
                        let debut = pop(&mut st)?;
                        let f = pop(&mut st)?;
                        Expr::Somme(f, debut, fin)
                    }
                    Methode::Derivee => {
                        let x0 = pop(&mut st)?;
                        let f = pop(&mut st)?;
                        Expr::Derivee(f, x0)
                    }
                }
            }

            Tok::LPar | Tok::RPar | Tok::Virgule | Tok::Glyphe(_) | Tok::Suffixe(_) => {
                return Err(ErreurCalc::syntaxe("jeton inattendu en RPN"));
            }
        };
        st.push(e);
    }

    if st.len() != 1 {
        return Err(ErreurCalc::syntaxe("expression invalide"));
    }
    st.pop()
        .ok_or_else(|| ErreurCalc::syntaxe("expression invalide"))
}
