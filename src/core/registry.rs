// resolver registry - named resolvers loaded from a toml file

use crate::Error;
use crate::core::claude::Claude;
use crate::core::openai::OpenAi;
use crate::core::resolver::Resolver;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// One `[[resolver]]` table from the config file.
#[derive(Clone, Deserialize)]
pub struct ResolverConfig {
    pub name: String,
    pub kind: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default, rename = "resolver")]
    resolvers: Vec<ResolverConfig>,
}

#[derive(Default)]
pub struct Registry {
    resolvers: BTreeMap<String, Box<dyn Resolver>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // eager: a missing key or unknown kind fails here, not on the first question
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;

        let registry = Self::parse(&text)
            .map_err(|e| match e {
                Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
                other => other,
            })?;

        info!(path = %path.display(), resolvers = registry.len(), "loaded resolver registry");
        Ok(registry)
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        let file: ConfigFile =
            toml::from_str(text).map_err(|e| Error::Config(e.message().to_string()))?;

        if file.resolvers.is_empty() {
            return Err(Error::Config("no [[resolver]] entries".to_string()));
        }

        Self::from_configs(file.resolvers)
    }

    pub fn from_configs(configs: Vec<ResolverConfig>) -> Result<Self, Error> {
        let mut registry = Self::new();
        for config in configs {
            registry.check_name(&config.name)?;
            let resolver = build(&config)?;
            registry.insert(config.name, resolver)?;
        }
        Ok(registry)
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        resolver: Box<dyn Resolver>,
    ) -> Result<(), Error> {
        let name = name.into();
        self.check_name(&name)?;

        debug!(resolver = %name, model = resolver.model(), "registered resolver");
        self.resolvers.insert(name, resolver);
        Ok(())
    }

    fn check_name(&self, name: &str) -> Result<(), Error> {
        if name.trim().is_empty() {
            return Err(Error::Config("resolver name cannot be empty".to_string()));
        }
        if self.resolvers.contains_key(name) {
            return Err(Error::Config(format!("duplicate resolver name '{name}'")));
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Resolver> {
        self.resolvers.get(name).map(|r| r.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolvers.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.resolvers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("resolvers", &self.resolvers.keys().collect::<Vec<_>>())
            .finish()
    }
}

// one constructor per known kind
fn build(config: &ResolverConfig) -> Result<Box<dyn Resolver>, Error> {
    let max_tokens = config.max_tokens.unwrap_or(1024);

    match config.kind.to_lowercase().as_str() {
        "claude" | "anthropic" => {
            let api_key = api_key(config, "ANTHROPIC_API_KEY")?;
            let mut claude = Claude::new(api_key, config.model.clone())
                .with_max_tokens(max_tokens)
                .with_temperature(config.temperature);
            if let Some(url) = &config.base_url {
                claude = claude.with_base_url(url);
            }
            Ok(Box::new(claude))
        }
        "openai" => {
            let api_key = api_key(config, "OPENAI_API_KEY")?;
            let mut openai = OpenAi::new(api_key, config.model.clone())
                .with_max_tokens(max_tokens)
                .with_temperature(config.temperature);
            if let Some(url) = &config.base_url {
                openai = openai.with_base_url(url);
            }
            Ok(Box::new(openai))
        }
        other => Err(Error::Config(format!(
            "resolver '{}' has unknown kind '{other}' (expected claude or openai)",
            config.name
        ))),
    }
}

fn api_key(config: &ResolverConfig, default_env: &str) -> Result<String, Error> {
    resolve_key(config, default_env, |var| std::env::var(var).ok())
}

// inline key wins, then the configured env var, then the kind's default
fn resolve_key(
    config: &ResolverConfig,
    default_env: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, Error> {
    if let Some(key) = &config.api_key {
        return Ok(key.clone());
    }

    let var = config.api_key_env.as_deref().unwrap_or(default_env);
    lookup(var).ok_or_else(|| {
        Error::Config(format!(
            "resolver '{}' needs an api key: set {var} or api_key",
            config.name
        ))
    })
}
