// src/noyau/expr.rs
//
// AST numérique (f64).
// - Num   : littéral
// - Var   : variable libre (x) des méthodes numériques ; liée par int/sum/diff
// - Appel : fonction de la liste blanche (aucun autre nom n’est évaluable)
// - Integrale / Somme / Derivee : méthodes numériques, f est une expression en x
//
// IMPORTANT (SAFE):
// - la grammaire est fermée : rien d’autre que ces noeuds n’atteint l’évaluateur.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,

    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,

    Ln,
    Log, // base 10
    Exp,
    Sqrt,
    Cbrt,
    Abs,
    Floor,
    Gcd,
    Lcm,
    Ran, // aléatoire [0,1)
}

impl Fonction {
    /// Nom canonique -> fonction. Les alias (√, Math.log10…) sont traités en normalisation.
    pub fn depuis_nom(nom: &str) -> Option<Self> {
        use Fonction::*;
        let f = match nom {
            "sin" => Sin,
            "cos" => Cos,
            "tan" => Tan,
            "asin" => Asin,
            "acos" => Acos,
            "atan" => Atan,
            "sinh" => Sinh,
            "cosh" => Cosh,
            "tanh" => Tanh,
            "asinh" => Asinh,
            "acosh" => Acosh,
            "atanh" => Atanh,
            "ln" => Ln,
            "log" => Log,
            "exp" => Exp,
            "sqrt" => Sqrt,
            "cbrt" => Cbrt,
            "abs" => Abs,
            "floor" => Floor,
            "gcd" => Gcd,
            "lcm" => Lcm,
            "ran" => Ran,
            _ => return None,
        };
        Some(f)
    }

    pub fn nom(self) -> &'static str {
        use Fonction::*;
        match self {
            Sin => "sin",
            Cos => "cos",
            Tan => "tan",
            Asin => "asin",
            Acos => "acos",
            Atan => "atan",
            Sinh => "sinh",
            Cosh => "cosh",
            Tanh => "tanh",
            Asinh => "asinh",
            Acosh => "acosh",
            Atanh => "atanh",
            Ln => "ln",
            Log => "log",
            Exp => "exp",
            Sqrt => "sqrt",
            Cbrt => "cbrt",
            Abs => "abs",
            Floor => "floor",
            Gcd => "gcd",
            Lcm => "lcm",
            Ran => "ran",
        }
    }

    pub fn arite(self) -> usize {
        match self {
            Fonction::Ran => 0,
            Fonction::Gcd | Fonction::Lcm => 2,
            _ => 1,
        }
    }

    /// sin, cos, tan : argument converti si l’unité est le degré.
    pub fn est_trig_directe(self) -> bool {
        matches!(self, Fonction::Sin | Fonction::Cos | Fonction::Tan)
    }

    /// asin, acos, atan : résultat converti si l’unité est le degré.
    pub fn est_trig_inverse(self) -> bool {
        matches!(self, Fonction::Asin | Fonction::Acos | Fonction::Atan)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Methode {
    Integrale, // int(f, a, b)
    Somme,     // sum(f, debut, fin)
    Derivee,   // diff(f, x0)
}

impl Methode {
    pub fn depuis_nom(nom: &str) -> Option<Self> {
        match nom {
            "int" => Some(Methode::Integrale),
            "sum" => Some(Methode::Somme),
            "diff" => Some(Methode::Derivee),
            _ => None,
        }
    }

    pub fn nom(self) -> &'static str {
        match self {
            Methode::Integrale => "int",
            Methode::Somme => "sum",
            Methode::Derivee => "diff",
        }
    }

    pub fn arite(self) -> usize {
        match self {
            Methode::Integrale | Methode::Somme => 3,
            Methode::Derivee => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(f64),
    Var(String),

    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),

    Fact(Box<Expr>),
    Perm(Box<Expr>, Box<Expr>),
    Comb(Box<Expr>, Box<Expr>),

    Appel(Fonction, Vec<Expr>),

    Integrale(Box<Expr>, Box<Expr>, Box<Expr>), // f, a, b
    Somme(Box<Expr>, Box<Expr>, Box<Expr>),     // f, debut, fin
    Derivee(Box<Expr>, Box<Expr>),              // f, x0
}

/// Nom de la variable liée par int/sum/diff.
pub const VAR_LIBRE: &str = "x";

impl Expr {
    pub fn num(v: f64) -> Expr {
        Expr::Num(v)
    }

    /// Détecte une variable libre (non liée par une méthode numérique englobante).
    /// Itératif + garde-fous : si l’arbre est trop gros, on retourne true
    /// (SAFE => la passe numérique ne replie pas, l’évaluateur s’en charge).
    pub fn contient_var_libre(&self) -> bool {
        use Expr::*;

        const MAX_PILE: usize = 8192;
        const MAX_NOEUDS: usize = 200_000;

        let mut pile: Vec<&Expr> = Vec::with_capacity(64);
        pile.push(self);

        let mut visites: usize = 0;

        while let Some(e) = pile.pop() {
            visites += 1;
            if visites > MAX_NOEUDS || pile.len() > MAX_PILE {
                return true;
            }

            match e {
                Var(_) => return true,
                Num(_) => {}

                Neg(a) | Fact(a) => pile.push(a.as_ref()),

                Add(a, b) | Sub(a, b) | Mul(a, b) | Div(a, b) | Pow(a, b) | Perm(a, b)
                | Comb(a, b) => {
                    pile.push(a.as_ref());
                    pile.push(b.as_ref());
                }

                Appel(_, args) => pile.extend(args.iter()),

                // f lie x : seules les bornes comptent
                Integrale(_, a, b) | Somme(_, a, b) => {
                    pile.push(a.as_ref());
                    pile.push(b.as_ref());
                }
                Derivee(_, x0) => pile.push(x0.as_ref()),
            }
        }

        false
    }

    /// Profondeur de l’arbre (itératif : utilisable avant toute passe récursive).
    pub fn profondeur(&self) -> usize {
        use Expr::*;

        let mut pile: Vec<(&Expr, usize)> = vec![(self, 1)];
        let mut max = 0;

        while let Some((e, d)) = pile.pop() {
            max = max.max(d);
            match e {
                Num(_) | Var(_) => {}
                Neg(a) | Fact(a) => pile.push((a, d + 1)),
                Add(a, b) | Sub(a, b) | Mul(a, b) | Div(a, b) | Pow(a, b) | Perm(a, b)
                | Comb(a, b) | Derivee(a, b) => {
                    pile.push((a, d + 1));
                    pile.push((b, d + 1));
                }
                Appel(_, args) => pile.extend(args.iter().map(|a| (a, d + 1))),
                Integrale(f, a, b) | Somme(f, a, b) => {
                    pile.push((f, d + 1));
                    pile.push((a, d + 1));
                    pile.push((b, d + 1));
                }
            }
        }

        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bx(e: Expr) -> Box<Expr> {
        Box::new(e)
    }

    #[test]
    fn var_liee_par_integrale() {
        let x = Expr::Var(VAR_LIBRE.into());
        let int = Expr::Integrale(bx(x.clone()), bx(Expr::num(0.0)), bx(Expr::num(1.0)));
        assert!(!int.contient_var_libre());

        // borne dépendante de x : pas fermée
        let int2 = Expr::Integrale(bx(Expr::num(1.0)), bx(Expr::num(0.0)), bx(x.clone()));
        assert!(int2.contient_var_libre());
        assert!(Expr::Add(bx(x), bx(Expr::num(1.0))).contient_var_libre());
    }

    #[test]
    fn noms_et_arites() {
        for nom in ["sin", "gcd", "ran", "log"] {
            let f = Fonction::depuis_nom(nom).unwrap();
            assert_eq!(f.nom(), nom);
        }
        assert_eq!(Fonction::Ran.arite(), 0);
        assert_eq!(Methode::depuis_nom("diff").map(Methode::arite), Some(2));
        assert!(Fonction::depuis_nom("eval").is_none());
    }

    #[test]
    fn profondeur_chaine() {
        let mut e = Expr::num(1.0);
        for _ in 0..9 {
            e = Expr::Neg(bx(e));
        }
        assert_eq!(e.profondeur(), 10);
        assert_eq!(Expr::Appel(Fonction::Ran, vec![]).profondeur(), 1);
    }
}
