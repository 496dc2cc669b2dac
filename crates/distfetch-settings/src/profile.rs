//! Layered settings: a TOML profile overlaid with the process environment.
//!
//! ```toml
//! features = "distlocks userfetch"
//!
//! [vars]
//! DISTDIR = "/var/cache/distfiles"
//! GENTOO_MIRRORS = "https://distfiles.gentoo.org"
//!
//! [thirdpartymirrors]
//! gnu = ["https://ftpmirror.gnu.org", "https://ftp.gnu.org/gnu"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::keys;
use crate::settings::{MapSettings, MirrorGroups};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProfile {
    features:          Option<FeatureValue>,
    vars:              BTreeMap<String, VarValue>,
    thirdpartymirrors: MirrorGroups,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureValue {
    Tokens(String),
    List(Vec<String>),
}

/// Environment values arrive type-sniffed (`1` becomes an integer), so
/// every scalar is folded back to its string form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VarValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl VarValue {
    fn into_string(self) -> String {
        match self {
            VarValue::Text(s) => s,
            VarValue::Int(n) => n.to_string(),
            VarValue::Float(n) => n.to_string(),
            VarValue::Bool(b) => b.to_string(),
        }
    }
}

pub struct SettingsProfile;

impl SettingsProfile {
    /// Load `path` and overlay the recognized environment variables.
    pub fn load(path: impl AsRef<Path>) -> Result<MapSettings> {
        Self::from_figment(Self::figment(path.as_ref()))
    }

    /// Load `path` alone, ignoring the environment.
    pub fn load_file(path: impl AsRef<Path>) -> Result<MapSettings> {
        Self::from_figment(Figment::new().merge(Toml::file(path.as_ref())))
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::new().merge(Toml::file(path)).merge(
            Env::raw()
                .only(keys::ENVIRONMENT_KEYS)
                .map(|key| format!("vars.{}", key.as_str().to_ascii_uppercase()).into()),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<MapSettings> {
        let raw: RawProfile = figment.extract()?;
        let mut builder = MapSettings::builder();

        for (key, value) in raw.vars {
            builder = builder.var(key.to_ascii_uppercase(), value.into_string());
        }
        match raw.features {
            Some(FeatureValue::Tokens(tokens)) => builder = builder.features(tokens),
            Some(FeatureValue::List(list)) => builder = builder.features(list.join(" ")),
            None => {}
        }
        for (name, urls) in raw.thirdpartymirrors {
            if urls.is_empty() {
                return Err(Error::Malformed(format!(
                    "third-party mirror group '{}' has no URLs",
                    name
                )));
            }
            builder = builder.thirdparty_mirror(name, urls);
        }

        Ok(builder.build())
    }
}
