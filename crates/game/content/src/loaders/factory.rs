//! Content factory for building catalogs from data files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use combat_core::config::CombatRules;
use combat_core::env::{Catalogs, ElementMatrix};
use tracing::info;

use crate::loaders::{
    AbilityLoader, Diagnostic, Diagnostics, ElementLoader, LoadResult, MoveLoader, RulesLoader,
};

const EMBEDDED_MOVES: &str = include_str!("../../data/moves.ron");
const EMBEDDED_ABILITIES: &str = include_str!("../../data/abilities.ron");
const EMBEDDED_ELEMENTS: &str = include_str!("../../data/elements.ron");
const EMBEDDED_RULES: &str = include_str!("../../data/rules.toml");

/// Everything produced by one load.
#[derive(Clone, Debug)]
pub struct LoadedContent {
    pub catalogs: Catalogs,
    pub rules: CombatRules,
    /// Entries that were skipped or partially loaded.
    pub diagnostics: Vec<Diagnostic>,
}

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── abilities.ron
/// ├── moves.ron
/// ├── elements.ron   (optional, neutral matrix when absent)
/// └── rules.toml     (optional, default rules when absent)
/// ```
pub struct ContentFactory {
    data_dir: Option<PathBuf>,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
        }
    }

    /// A factory serving the content compiled into this crate.
    pub fn embedded() -> Self {
        Self { data_dir: None }
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Loads abilities, then moves (which reference them), then the element
    /// matrix and rules.
    pub fn load(&self) -> LoadResult<LoadedContent> {
        match &self.data_dir {
            Some(dir) => load_dir(dir),
            None => load_embedded(),
        }
    }
}

fn load_embedded() -> LoadResult<LoadedContent> {
    let mut items = Vec::new();
    let abilities = AbilityLoader::parse(
        EMBEDDED_ABILITIES,
        &mut Diagnostics::new("embedded:abilities.ron", &mut items),
    )?;
    let moves = MoveLoader::parse(
        EMBEDDED_MOVES,
        &abilities,
        &mut Diagnostics::new("embedded:moves.ron", &mut items),
    )?;
    let elements = ElementLoader::parse(
        EMBEDDED_ELEMENTS,
        &mut Diagnostics::new("embedded:elements.ron", &mut items),
    )?;
    let rules = RulesLoader::parse(
        EMBEDDED_RULES,
        &mut Diagnostics::new("embedded:rules.toml", &mut items),
    )?;
    Ok(finish(
        Catalogs {
            moves,
            abilities,
            elements: Arc::new(elements),
        },
        rules,
        items,
    ))
}

fn load_dir(dir: &Path) -> LoadResult<LoadedContent> {
    let mut items = Vec::new();

    let path = dir.join("abilities.ron");
    let source = path.display().to_string();
    let abilities = AbilityLoader::load(&path, &mut Diagnostics::new(&source, &mut items))?;

    let path = dir.join("moves.ron");
    let source = path.display().to_string();
    let moves = MoveLoader::load(&path, &abilities, &mut Diagnostics::new(&source, &mut items))?;

    let path = dir.join("elements.ron");
    let source = path.display().to_string();
    let elements = if path.exists() {
        ElementLoader::load(&path, &mut Diagnostics::new(&source, &mut items))?
    } else {
        info!(path = %source, "no element matrix; all pairs are neutral");
        ElementMatrix::new()
    };

    let path = dir.join("rules.toml");
    let source = path.display().to_string();
    let rules = if path.exists() {
        RulesLoader::load(&path, &mut Diagnostics::new(&source, &mut items))?
    } else {
        info!(path = %source, "no rules file; using default rules");
        CombatRules::default()
    };

    Ok(finish(
        Catalogs {
            moves,
            abilities,
            elements: Arc::new(elements),
        },
        rules,
        items,
    ))
}

fn finish(catalogs: Catalogs, rules: CombatRules, diagnostics: Vec<Diagnostic>) -> LoadedContent {
    info!(
        moves = catalogs.moves.len(),
        abilities = catalogs.abilities.len(),
        element_pairs = catalogs.elements.len(),
        diagnostics = diagnostics.len(),
        "content loaded"
    );
    LoadedContent {
        catalogs,
        rules,
        diagnostics,
    }
}
