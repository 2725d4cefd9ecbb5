pub mod force;
pub mod plan;
pub mod roll;
pub mod sl;
pub mod subjects;

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use sk_director::{ActorSnapshot, DirectorConfig};

/// Load the configuration file (if any) and apply the seed override.
pub fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<DirectorConfig, String> {
    let config = match path {
        Some(path) => DirectorConfig::load(path).map_err(|e| e.to_string())?,
        None => DirectorConfig::default(),
    };
    Ok(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

/// Read an actor snapshot from a JSON file.
fn load_actor(path: &Path) -> Result<ActorSnapshot, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    ActorSnapshot::from_json(&json).map_err(|e| format!("invalid actor {}: {e}", path.display()))
}

/// The random source for commands that do not go through a director.
fn rng(config: &DirectorConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
