//! Policy configuration
//!
//! Layers, lowest precedence first:
//! 1. built-in defaults ([`CodeGenerationPolicy::default`])
//! 2. the policy file given with `--config` (TOML, YAML or JSON)
//! 3. `UMBRELLO_CODEGEN__*` environment variables, `__` separating nested
//!    keys (`UMBRELLO_CODEGEN__CPP__PACKAGE_IS_NAMESPACE=false`)
//! 4. command line flags, applied by the caller
//!
//! A `.env` file in the working directory is loaded before the environment
//! is read.

use std::path::Path;

use anyhow::Context;
use config::{Config, Environment, File};
use umbrello_codegen::CodeGenerationPolicy;

pub const ENV_PREFIX: &str = "UMBRELLO_CODEGEN";
pub const ENV_SEPARATOR: &str = "__";

pub fn load_policy(config_file: Option<&Path>) -> anyhow::Result<CodeGenerationPolicy> {
    // a missing .env is fine
    let _ = dotenvy::dotenv();

    let defaults = Config::try_from(&CodeGenerationPolicy::default())
        .context("Failed to serialize default policy")?;
    let mut builder = Config::builder().add_source(defaults);

    if let Some(path) = config_file {
        if !path.is_file() {
            anyhow::bail!("Policy file {} does not exist", path.display());
        }
        builder = builder.add_source(File::from(path));
    }

    let policy: CodeGenerationPolicy = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        )
        .build()
        .context("Failed to build policy configuration")?
        .try_deserialize()
        .context("Failed to parse policy configuration")?;

    tracing::debug!(?policy, "policy loaded");
    Ok(policy)
}
