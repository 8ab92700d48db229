//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée, méthodes numériques jamais imbriquées (coût 501²)
//! - budget temps global
//! - on accepte les erreurs de domaine/dépassement (division par zéro, ln(-1)…)
//!   mais jamais une erreur de syntaxe sur une expression générée valide
//! - invariant clé : tout résultat non "Error" se relit à l’identique

use std::time::{Duration, Instant};

use super::contexte::{Contexte, UniteAngle};
use super::erreurs::Categorie;
use super::eval::{evaluer, evaluer_detaille, MARQUEUR_ERREUR};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    fn choose<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.pick(items.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    let n = rng.pick(12);
    match rng.pick(6) {
        0 => format!("{n}.{}", rng.pick(100)),
        1 => format!("{}{}", n + 1, rng.choose(&["k", "m", "µ"])),
        2 => format!("{n}e{}", rng.pick(5)),
        _ => n.to_string(),
    }
}

fn gen_atom(rng: &mut Rng, avec_x: bool) -> String {
    match rng.pick(if avec_x { 8 } else { 7 }) {
        0..=2 => gen_nombre(rng),
        3 => rng.choose(&["π", "pi", "e", "Math.PI"]).to_string(),
        4 => rng.choose(&["c", "g", "h", "Na", "eps0"]).to_string(),
        5 => rng.choose(&["A", "B", "X", "M"]).to_string(),
        6 => "Ans".to_string(),
        _ => "x".to_string(),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize, avec_x: bool) -> String {
    if depth == 0 {
        return gen_atom(rng, avec_x);
    }

    let sous = |rng: &mut Rng| gen_expr(rng, depth - 1, avec_x);

    match rng.pick(10) {
        0 => gen_atom(rng, avec_x),
        1 => format!("({}+{})", sous(rng), sous(rng)),
        2 => format!("({}-{})", sous(rng), sous(rng)),
        3 => format!("({}×{})", sous(rng), sous(rng)),
        4 => format!("({}÷{})", sous(rng), sous(rng)),
        5 => format!("({})^{}", sous(rng), rng.pick(4)),
        6 => {
            let f = rng.choose(&[
                "sin", "cos", "tan", "asin", "atan", "sinh", "ln", "log", "sqrt", "√", "∛",
                "abs", "exp", "floor",
            ]);
            format!("{f}({})", sous(rng))
        }
        7 => format!("{}!", rng.pick(8)),
        8 => format!("{}{}{}", 5 + rng.pick(6), rng.choose(&["C", "P"]), rng.pick(5)),
        _ => {
            if rng.coin() {
                format!("-{}", sous(rng))
            } else {
                format!("gcd({},{})", rng.pick(40), rng.pick(40))
            }
        }
    }
}

/// Appel de méthode numérique fermé, intégrande en x (jamais de méthode imbriquée).
fn gen_methode(rng: &mut Rng) -> String {
    let f = gen_expr(rng, 2, true);
    match rng.pick(3) {
        0 => format!("int({f},{},{})", rng.pick(3), rng.pick(4)),
        1 => format!("sum({f},{},{})", rng.pick(4), rng.pick(12)),
        _ => format!("diff({f},{})", 1 + rng.pick(3)),
    }
}

fn contexte_fuzz(rng: &mut Rng) -> Contexte {
    let unite = if rng.coin() {
        UniteAngle::Degres
    } else {
        UniteAngle::Radians
    };
    Contexte::new(unite, rng.choose(&["0", "-2.5", "1.00000000e+20", "42"]))
        .avec_variable("A", 3.0)
        .avec_variable("X", -1.5)
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_relecture() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1500);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..150 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4, false);
        let ctx = contexte_fuzz(&mut rng);

        let r1 = evaluer_detaille(&expr, &ctx);
        let r2 = evaluer_detaille(&expr, &ctx);

        match (r1, r2) {
            (Ok((a, _)), Ok((b, _))) => {
                assert_eq!(a, b, "non déterministe: expr={expr:?}");
                let relu = evaluer(&a, ctx.unite, "0");
                assert_eq!(relu, a, "relecture: expr={expr:?}");
                seen_ok += 1;
            }
            (Err(e1), Err(e2)) => {
                assert_eq!(e1, e2, "non déterministe: expr={expr:?}");
                assert_ne!(
                    e1.categorie(),
                    Categorie::Syntaxe,
                    "erreur de syntaxe sur expression générée: expr={expr:?} err={e1}"
                );
                seen_err += 1;
            }
            (a, b) => panic!("non déterministe: expr={expr:?} {a:?} / {b:?}"),
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_methodes_numeriques() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1500);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..60 {
        budget(t0, max);

        let expr = gen_methode(&mut rng);
        let ctx = contexte_fuzz(&mut rng);

        match evaluer_detaille(&expr, &ctx) {
            Ok((r, d)) => {
                assert_ne!(r, MARQUEUR_ERREUR);
                // méthode fermée : repliée en littéral par la passe numérique
                assert!(
                    !d.apres.contains("int(") && !d.apres.contains("sum("),
                    "non repliée: expr={expr:?} apres={}",
                    d.apres
                );
            }
            Err(e) => assert_ne!(
                e.categorie(),
                Categorie::Syntaxe,
                "erreur de syntaxe: expr={expr:?} err={e}"
            ),
        }
    }
}

#[test]
fn fuzz_safe_octets_arbitraires_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let alphabet: Vec<char> = "0123456789+-*/^!(),.eEkmµxPCπ√×÷ AnsMathsincolgqrtu#"
        .chars()
        .collect();
    let mut rng = Rng::new(0xFEED_u64);

    for _ in 0..400 {
        budget(t0, max);

        let len = 1 + rng.pick(24) as usize;
        let expr: String = (0..len)
            .map(|_| alphabet[rng.pick(alphabet.len() as u32) as usize])
            .collect();

        // totalité : jamais de panique, toujours une chaîne
        let r = evaluer(&expr, UniteAngle::Degres, "0");
        assert!(!r.is_empty(), "expr={expr:?}");
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);

    let expr = somme_balancee("1/2", 800);
    budget(t0, max);

    // 800*(1/2) = 400
    assert_eq!(evaluer(&expr, UniteAngle::Degres, "0"), "400");
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}
