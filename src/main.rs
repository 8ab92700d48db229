// src/main.rs
//
// Calculatrice scientifique — point d’entrée NATIF + WEB (WASM)
// -------------------------------------------------------------
// But:
// - NATIF (Linux/Windows/macOS) : ligne de commande (clap) ; sans --expr, interface eframe
// - WEB  (wasm32)              : eframe::WebRunner + WebOptions + <canvas>
//
// Côté WEB (WASM) : ton index.html doit contenir un canvas :
//   <canvas id="the_canvas_id"></canvas>
//
// Exemples natifs :
//   calculatrice_sci --expr "sin(30)+5C2"
//   calculatrice_sci --expr "sin(pi/6)" --unite rad --demarche
//   RUST_LOG=debug calculatrice_sci

#![cfg_attr(target_arch = "wasm32", allow(unused_imports))]

use eframe::egui;

mod app;
mod noyau;
mod reglages;

use app::AppCalc;
use reglages::Reglages;

/// Titre unique (natif + web).
const TITRE_APP: &str = "Calculatrice scientifique";

/* ------------------------ Ligne de commande (natif) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Parser, Debug)]
#[command(version, about = "Calculatrice scientifique (noyau f64 + interface egui)")]
struct Cli {
    /// Expression à évaluer sans interface graphique
    #[arg(short, long)]
    expr: Option<String>,

    /// Unité d’angle (prioritaire sur reglages.toml)
    #[arg(short, long, value_enum)]
    unite: Option<UniteCli>,

    /// Valeur substituée à `Ans`
    #[arg(long, default_value = "0")]
    ans: String,

    /// Affiche jetons, RPN et AST avant/après les passes
    #[arg(long)]
    demarche: bool,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum UniteCli {
    Deg,
    Rad,
}

#[cfg(not(target_arch = "wasm32"))]
impl From<UniteCli> for noyau::UniteAngle {
    fn from(u: UniteCli) -> Self {
        match u {
            UniteCli::Deg => noyau::UniteAngle::Degres,
            UniteCli::Rad => noyau::UniteAngle::Radians,
        }
    }
}

/// Évaluation unique : résultat (ou "Error") sur stdout, code de sortie 1 en cas d’erreur.
#[cfg(not(target_arch = "wasm32"))]
fn calcul_en_ligne(cli: &Cli, expr: &str, unite: noyau::UniteAngle) -> std::process::ExitCode {
    use std::process::ExitCode;

    let ctx = noyau::Contexte::new(unite, cli.ans.as_str());

    match noyau::evaluer_detaille(expr, &ctx) {
        Ok((resultat, d)) => {
            if cli.demarche {
                println!("jetons : {}", d.jetons);
                println!("rpn    : {}", d.rpn);
                println!("avant  : {}", d.avant);
                println!("après  : {}", d.apres);
                println!("note   : {}", d.note);
            }
            println!("{resultat}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            if cli.demarche {
                eprintln!("{e}");
            }
            log::warn!("{expr:?} : {e}");
            println!("{}", noyau::MARQUEUR_ERREUR);
            ExitCode::FAILURE
        }
    }
}

/* ------------------------ Entrée NATIF (PC) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;
    use std::process::ExitCode;

    // RUST_LOG=info|debug|trace (silencieux par défaut)
    env_logger::init();

    let cli = Cli::parse();

    let mut reglages = Reglages::charger();
    if let Some(u) = cli.unite {
        reglages.unite = u.into();
    }

    if let Some(expr) = cli.expr.as_deref() {
        return calcul_en_ligne(&cli, expr, reglages.unite);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([420.0, 820.0])
            .with_min_inner_size([380.0, 640.0]),
        ..Default::default()
    };

    let app = AppCalc::new(&reglages);
    let lancement = eframe::run_native(TITRE_APP, options, Box::new(move |_cc| Ok(Box::new(app))));

    match lancement {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("interface graphique : {e}");
            ExitCode::FAILURE
        }
    }
}

/* ------------------------ Entrée WEB (WASM) ------------------------ */

#[cfg(target_arch = "wasm32")]
fn main() {
    // En wasm32, le démarrage réel passe par `start()` (wasm_bindgen).
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AppCalc, Reglages, TITRE_APP};

    use wasm_bindgen::JsCast;
    use web_sys::{window, HtmlCanvasElement};

    /// ID du canvas attendu dans index.html.
    const CANVAS_ID: &str = "the_canvas_id";

    /// Point d’entrée automatique au chargement de la page.
    /// - Fixe le titre de l’onglet (document.title)
    /// - Récupère le <canvas id="the_canvas_id">
    /// - Démarre eframe WebRunner dessus
    #[wasm_bindgen::prelude::wasm_bindgen(start)]
    pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
        // 1) window/document
        let w = window().ok_or_else(|| js_err("window() indisponible"))?;
        let d = w
            .document()
            .ok_or_else(|| js_err("document() indisponible"))?;

        d.set_title(TITRE_APP);

        // 2) canvas
        let canvas: HtmlCanvasElement = d
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| js_err("canvas introuvable (id incorrect dans index.html)"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_err("l’élément trouvé n’est pas un <canvas>"))?;

        // 3) run web (pas de dossier de config : réglages par défaut)
        let app = AppCalc::new(&Reglages::charger());

        eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(move |_cc| Ok(Box::new(app))),
            )
            .await
    }

    fn js_err(msg: &str) -> wasm_bindgen::JsValue {
        wasm_bindgen::JsValue::from_str(msg)
    }
}
