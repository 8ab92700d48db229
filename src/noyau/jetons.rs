// src/noyau/jetons.rs
//
// Analyse lexicale : la chaîne devient une suite d’unités lexicales AVANT toute
// substitution. Les passes suivantes ne remplacent que des jetons entiers
// (jamais de remplacement aveugle dans le texte : "e" ne touche pas "exp").

use super::erreurs::{ErreurCalc, Resultat};
use super::expr::{Fonction, Methode};

/// Suffixes d’ingénierie reconnus juste après un littéral.
pub const SUFFIXES: [char; 6] = ['G', 'M', 'k', 'm', 'µ', 'u'];

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(f64),

    // Tout mot qui n’est ni nombre ni opérateur : sin, x, Ans, pi, Ran#, Math.PI…
    // NOTE: la normalisation décide si c’est une fonction, une constante ou une variable.
    Ident(String),

    // Glyphes de calculatrice : × ÷ π √ ∛
    Glyphe(char),

    // Suffixe d’ingénierie collé au nombre qui précède (5k, 3µ)
    Suffixe(char),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^ ou ** (puissance canonique)
    Bang,  // ! postfixe
    Perm,  // nPr
    Comb,  // nCr
    Virgule,

    LPar,
    RPar,

    // Jetons canoniques (produits par normalisation / rpn)
    Fonction(Fonction),
    Methode(Methode),
    Neg, // moins unaire
}

impl Tok {
    /// Sur un flux normalisé : le jeton termine-t-il une valeur ?
    /// (sert au moins unaire et au produit implicite)
    pub fn termine_valeur(&self) -> bool {
        matches!(self, Tok::Num(_) | Tok::Ident(_) | Tok::RPar | Tok::Bang)
    }
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - nombres décimaux, notation scientifique (1.5e-3, 1.00000000e+20)
/// - suffixes d’ingénierie collés (5k, 3µ, 2G)
/// - opérateurs + - * / ^ ** ! et glyphes × ÷
/// - nPr / nCr (P ou C entre deux valeurs : 5C2, (4)P(2))
/// - parenthèses, virgule
/// - π √ ∛
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]*, plus "Ran#" et "Math.xxx"
pub fn tokenize(s: &str) -> Resultat<Vec<Tok>> {
    let mut out: Vec<Tok> = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Opérateurs / ponctuation (1 caractère)
        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            ',' => Some(Tok::Virgule),
            '+' => Some(Tok::Plus),
            '-' | '−' => Some(Tok::Minus),
            '/' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            '!' => Some(Tok::Bang),
            '×' | '÷' | 'π' | '√' | '∛' => Some(Tok::Glyphe(c)),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // * ou **
        if c == '*' {
            if i + 1 < chars.len() && chars[i + 1] == '*' {
                out.push(Tok::Caret);
                i += 2;
            } else {
                out.push(Tok::Star);
                i += 1;
            }
            continue;
        }

        // Nombre (avec exposant éventuel)
        if c.is_ascii_digit() || (c == '.' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit())
        {
            let (valeur, fin) = lire_nombre(&chars, i)?;
            out.push(Tok::Num(valeur));
            i = fin;

            // Suffixe collé : seulement si la lettre ne commence pas un identifiant plus long
            // (2mu0 = 2·mu0, pas 2m·u0).
            if i < chars.len() && SUFFIXES.contains(&chars[i]) && !continue_ident(&chars, i + 1) {
                out.push(Tok::Suffixe(chars[i]));
                i += 1;
            }
            continue;
        }

        // nPr / nCr : P ou C coincé entre une valeur et un nombre (ou une parenthèse)
        if (c == 'P' || c == 'C')
            && matches!(
                out.last(),
                Some(Tok::Num(_) | Tok::RPar | Tok::Suffixe(_) | Tok::Bang)
            )
            && i + 1 < chars.len()
            && (chars[i + 1].is_ascii_digit() || chars[i + 1] == '(')
        {
            out.push(if c == 'P' { Tok::Perm } else { Tok::Comb });
            i += 1;
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let mut word: String = chars[start..i].iter().collect();

            // Math.PI, Math.sqrt… (alias hérités du clavier d’origine)
            if word == "Math"
                && i + 1 < chars.len()
                && chars[i] == '.'
                && chars[i + 1].is_ascii_alphabetic()
            {
                i += 1;
                let start_m = i;
                while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                let membre: String = chars[start_m..i].iter().collect();
                word = format!("Math.{membre}");
            }

            // Ran# (touche aléatoire)
            if word == "Ran" && i < chars.len() && chars[i] == '#' {
                i += 1;
                word.push('#');
            }

            out.push(Tok::Ident(word));
            continue;
        }

        return Err(ErreurCalc::syntaxe(format!("caractère inattendu: '{c}'")));
    }

    Ok(out)
}

/// Vrai si chars[i] prolonge un identifiant.
fn continue_ident(chars: &[char], i: usize) -> bool {
    i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_')
}

/// Lit un littéral à partir de `start`. Retourne (valeur, indice de fin).
fn lire_nombre(chars: &[char], start: usize) -> Resultat<(f64, usize)> {
    let mut i = start;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }

    // Exposant : e/E suivi d’un chiffre, ou d’un signe puis d’un chiffre.
    // Sinon le "e" reste un identifiant (2e = 2·e).
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }

    if i < chars.len() && chars[i] == '.' {
        return Err(ErreurCalc::syntaxe("nombre invalide (deux points décimaux)"));
    }

    let txt: String = chars[start..i].iter().collect();
    let v = txt
        .parse::<f64>()
        .map_err(|_| ErreurCalc::syntaxe(format!("nombre invalide: {txt}")))?;
    Ok((v, i))
}

/// Format utilitaire (démarche) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num(v) => format!("{v}"),
            Tok::Ident(name) => name.clone(),
            Tok::Glyphe(g) => g.to_string(),
            Tok::Suffixe(s) => format!("[{s}]"),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),
            Tok::Bang => "!".to_string(),
            Tok::Perm => "P".to_string(),
            Tok::Comb => "C".to_string(),
            Tok::Virgule => ",".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),

            Tok::Fonction(f) => f.nom().to_string(),
            Tok::Methode(m) => m.nom().to_string(),
            Tok::Neg => "neg".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<Tok> {
        tokenize(s).unwrap_or_else(|e| panic!("tokenize({s:?}) erreur: {e}"))
    }

    #[test]
    fn notation_scientifique() {
        assert_eq!(toks("1.00000000e+20"), vec![Tok::Num(1e20)]);
        assert_eq!(toks("2.5e-3"), vec![Tok::Num(2.5e-3)]);
        assert_eq!(toks(".5"), vec![Tok::Num(0.5)]);
    }

    #[test]
    fn e_seul_reste_identifiant() {
        assert_eq!(toks("2e"), vec![Tok::Num(2.0), Tok::Ident("e".into())]);
        assert_eq!(
            toks("exp(1)"),
            vec![
                Tok::Ident("exp".into()),
                Tok::LPar,
                Tok::Num(1.0),
                Tok::RPar
            ]
        );
    }

    #[test]
    fn suffixes_et_identifiants() {
        assert_eq!(toks("5k"), vec![Tok::Num(5.0), Tok::Suffixe('k')]);
        assert_eq!(toks("3µ"), vec![Tok::Num(3.0), Tok::Suffixe('µ')]);
        // mu0 est une constante, pas "m" + "u0"
        assert_eq!(toks("2mu0"), vec![Tok::Num(2.0), Tok::Ident("mu0".into())]);
    }

    #[test]
    fn combinatoire_et_puissance() {
        assert_eq!(toks("5C2"), vec![Tok::Num(5.0), Tok::Comb, Tok::Num(2.0)]);
        assert_eq!(toks("5P2"), vec![Tok::Num(5.0), Tok::Perm, Tok::Num(2.0)]);
        assert_eq!(toks("2**3"), vec![Tok::Num(2.0), Tok::Caret, Tok::Num(3.0)]);
        // C seul = variable mémoire
        assert_eq!(toks("C"), vec![Tok::Ident("C".into())]);
    }

    #[test]
    fn alias_math_et_ran() {
        assert_eq!(toks("Math.PI"), vec![Tok::Ident("Math.PI".into())]);
        assert_eq!(toks("Ran#"), vec![Tok::Ident("Ran#".into())]);
    }

    #[test]
    fn caracteres_invalides() {
        assert!(tokenize("2 $ 3").is_err());
        assert!(tokenize("1.2.3").is_err());
    }
}
