use crate::route::GroupOptions;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Top-level route-attributes configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RouteAttributesConfig {
    /// When false, `register_routes` registers nothing
    pub enabled: bool,
    /// Global middleware applied to every discovered route
    pub middleware: Vec<String>,
    pub app: AppConfig,
    /// Controller directories in declaration order
    pub directories: Directories,
}

impl Default for RouteAttributesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            middleware: Vec::new(),
            app: AppConfig::default(),
            directories: Directories(vec![(
                DirectoryKey::Index(0),
                DirectoryConfig::Simple(PathBuf::from("app/Http/Controllers")),
            )]),
        }
    }
}

/// The host application's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root namespace of the application, e.g. `App`
    pub namespace: String,
    /// Directory the application namespace maps to
    pub path: PathBuf,
    /// Route cache file; routes count as cached while it exists
    pub route_cache: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            namespace: "App".to_string(),
            path: PathBuf::from("app"),
            route_cache: None,
        }
    }
}

/// Key of a directory entry: its position in a list, or a string key.
///
/// A string key is a namespace for the simple form and a path for the
/// extended form. Numeric string keys (JSON objects) count as positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryKey {
    Index(usize),
    Namespace(String),
}

impl DirectoryKey {
    fn from_str_key(key: &str) -> Self {
        match key.parse::<usize>() {
            Ok(index) => DirectoryKey::Index(index),
            Err(_) => DirectoryKey::Namespace(key.to_string()),
        }
    }
}

impl fmt::Display for DirectoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryKey::Index(i) => write!(f, "#{i}"),
            DirectoryKey::Namespace(key) => f.write_str(key),
        }
    }
}

impl<'de> Deserialize<'de> for DirectoryKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = DirectoryKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a directory index or a string key")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                usize::try_from(v)
                    .map(DirectoryKey::Index)
                    .map_err(|_| E::custom("directory index out of range"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                usize::try_from(v)
                    .map(DirectoryKey::Index)
                    .map_err(|_| E::custom("directory index must not be negative"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(DirectoryKey::from_str_key(v))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

/// One configured directory, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DirectoryConfig {
    /// `- app/Http/Controllers` or `'Modules\Blog': modules/blog`
    Simple(PathBuf),
    Extended(ExtendedDirectory),
}

/// Extended directory entry: explicit namespace and base path plus group
/// options applied to every route found under it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExtendedDirectory {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub base_path: Option<PathBuf>,
    #[serde(flatten)]
    pub options: GroupOptions,
}

/// Directory entries in declaration order.
///
/// Accepts a list (keys are positions) or a map (keys are namespaces or
/// paths), or a mix of both through numeric map keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directories(pub Vec<(DirectoryKey, DirectoryConfig)>);

impl Directories {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &(DirectoryKey, DirectoryConfig)> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for Directories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DirectoriesVisitor;

        impl<'de> Visitor<'de> for DirectoriesVisitor {
            type Value = Directories;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list or map of controller directories")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some(entry) = seq.next_element::<DirectoryConfig>()? {
                    entries.push((DirectoryKey::Index(entries.len()), entry));
                }
                Ok(Directories(entries))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some((key, value)) = map.next_entry::<DirectoryKey, DirectoryConfig>()? {
                    entries.push((key, value));
                }
                Ok(Directories(entries))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Directories::default())
            }
        }

        deserializer.deserialize_any(DirectoriesVisitor)
    }
}
