use clap::Parser;
use wasm_bindgen::prelude::*;

mod board;
mod settings;
mod utils;

/// Options read from the page's location hash, e.g. `#-vv&--seed=42`.
#[derive(Parser, Debug)]
struct HashArgs {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    game: board::GameProps,
}

impl HashArgs {
    /// Parses `hash`, falling back to defaults when it is not a valid option list.
    fn parse_hash(hash: &str) -> (Self, Option<clap::Error>) {
        match Self::try_parse_from(hash.split(['#', '&'])) {
            Ok(args) => (args, None),
            Err(err) => (Self::parse_from([""]), Some(err)),
        }
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let hash = window().location().hash().unwrap_or_default();
    let (args, parse_error) = HashArgs::parse_hash(&hash);
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    if let Some(err) = parse_error {
        log::warn!("ignoring location hash {:?}: {}", hash, err);
    }

    let Some(root) = document().get_element_by_id("game") else {
        log::error!("missing id=\"game\" element, nothing to render");
        return;
    };

    log::debug!("starting with {:?}", args.game);
    yew::Renderer::<board::GameView>::with_root_and_props(root, args.game).render();
}
