//! Profile based credential config, compatible with the OCI CLI config file
//! layout (`~/.oci/config`).
//!
//! A config file is a sequence of `[profile]` sections holding `key=value`
//! pairs. Pairs appearing before the first section belong to the implicit
//! `default` profile. Resolving a named profile inherits any field it does
//! not define from `default`.

use std::collections::HashMap;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::path::Path;

use log::debug;

use crate::utils::Redact;
use crate::Error;
use crate::Result;

/// Name of the implicit fallback profile.
const DEFAULT_PROFILE: &str = "default";

/// Fields a resolved profile must carry. `region` is intentionally absent,
/// signing does not need it.
const REQUIRED_FIELDS: [&str; 4] = ["user", "fingerprint", "key_file", "tenancy"];

const KEY_FILE: &str = "key_file";
const PASS_PHRASE: &str = "pass_phrase";

/// A fully resolved credential profile.
///
/// Immutable once returned; all required fields are guaranteed non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Profile {
    /// UserID the requests are signed for.
    pub user: String,
    /// Fingerprint of the API key.
    pub fingerprint: String,
    /// Path to the API private key file.
    pub key_file: String,
    /// TenancyID the user belongs to.
    pub tenancy: String,
    /// Passphrase for the private key, when the key file is encrypted.
    pub pass_phrase: Option<String>,
}

impl Debug for Profile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("user", &self.user)
            .field("fingerprint", &self.fingerprint)
            .field("key_file", &Redact::from(&self.key_file))
            .field("tenancy", &self.tenancy)
            .field("pass_phrase", &Redact::from(&self.pass_phrase))
            .finish()
    }
}

impl Profile {
    /// Load `path` and resolve `profile` in one step.
    ///
    /// `profile` is matched case-insensitively; `None` resolves the
    /// `default` profile.
    pub fn from_config_file(path: impl AsRef<Path>, profile: Option<&str>) -> Result<Self> {
        debug!(
            "loading credential config for profile [{}]",
            profile.unwrap_or(DEFAULT_PROFILE)
        );
        ConfigFile::load(path)?.resolve(profile)
    }
}

/// One line of a config file, as seen by the parser.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Blank,
    Comment,
    /// Section header, name lowercased.
    Section(String),
    /// Key/value pair, key lowercased, value cleaned. Empty values are kept
    /// here and dropped at insert time.
    Pair(String, String),
    MalformedSection,
    MalformedPair,
}

fn classify(raw: &str) -> Line {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with('#') || line.starts_with('!') {
        return Line::Comment;
    }
    if line.starts_with('[') {
        return match line.rfind(']') {
            Some(end) => {
                let name = line[1..end].trim();
                if name.is_empty() {
                    Line::MalformedSection
                } else {
                    Line::Section(name.to_lowercase())
                }
            }
            None => Line::MalformedSection,
        };
    }
    match line.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Line::Pair(key.trim().to_lowercase(), clean_value(value))
        }
        _ => Line::MalformedPair,
    }
}

/// Strip optional surrounding quotes and a trailing `#` comment from a raw
/// value. Escaped quotes inside a value are not supported, the value ends at
/// the first `"` or `#`.
fn clean_value(raw: &str) -> String {
    let v = raw.trim_start();
    let v = v.strip_prefix('"').unwrap_or(v);
    let end = v.find(['"', '#']).unwrap_or(v.len());
    v[..end].trim().to_string()
}

/// Parsed view of a credential config file: profiles by lowercase name, each
/// a map of lowercase keys to trimmed values.
#[derive(Debug, Default)]
pub struct ConfigFile {
    profiles: HashMap<String, HashMap<String, String>>,
}

impl ConfigFile {
    /// Read and parse the config file at `path`.
    ///
    /// An empty path fails before any I/O; read failures are surfaced with
    /// the underlying I/O error as source.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::config_invalid("path to the config file is required"));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse config file content.
    pub fn parse(content: &str) -> Result<Self> {
        let mut profiles: HashMap<String, HashMap<String, String>> = HashMap::new();
        // Parser state: no section seen yet, or the name of the current one.
        let mut current: Option<String> = None;

        for raw in content.lines() {
            match classify(raw) {
                Line::Blank | Line::Comment => {}
                Line::Section(name) => {
                    // A re-declared section starts over, earlier pairs are
                    // discarded.
                    profiles.insert(name.clone(), HashMap::new());
                    current = Some(name);
                }
                Line::Pair(key, value) => {
                    let profile = current.get_or_insert_with(|| DEFAULT_PROFILE.to_string());
                    let section = profiles.entry(profile.clone()).or_default();
                    if !value.is_empty() {
                        section.insert(key, value);
                    }
                }
                Line::MalformedSection => {
                    return Err(Error::config_invalid(format!(
                        "config file is malformed, profile name line {:?} is invalid",
                        raw.trim()
                    )));
                }
                Line::MalformedPair => {
                    return Err(Error::config_invalid(format!(
                        "config file is malformed, line {:?} is invalid",
                        raw.trim()
                    )));
                }
            }
        }

        Ok(Self { profiles })
    }

    /// Resolve one effective profile.
    ///
    /// With `Some(name)`, the profile must exist and inherits missing fields
    /// from `default`. With `None`, only `default` is evaluated. Resolution
    /// never mutates the parsed document.
    pub fn resolve(&self, profile: Option<&str>) -> Result<Profile> {
        match profile {
            Some(name) => self.resolve_named(name),
            None => self.resolve_default(),
        }
    }

    fn resolve_named(&self, requested: &str) -> Result<Profile> {
        let name = requested.to_lowercase();
        let Some(section) = self.profiles.get(&name) else {
            return Err(Error::config_invalid(format!(
                "no profile {requested:?} in config file"
            )));
        };

        let chain = [name.as_str(), DEFAULT_PROFILE];
        let mut resolved = self.resolve_required(&chain).map_err(|missing| {
            Error::config_invalid(format!(
                "required fields {missing:?} not present in config file"
            ))
        })?;

        // The passphrase only follows the key file: an inherited pass_phrase
        // is used solely when the key_file came from `default` as well.
        if section.contains_key(PASS_PHRASE) || !section.contains_key(KEY_FILE) {
            resolved.pass_phrase = self.lookup(&chain, PASS_PHRASE);
        }

        Ok(resolved)
    }

    fn resolve_default(&self) -> Result<Profile> {
        let chain = [DEFAULT_PROFILE];
        let mut resolved = self.resolve_required(&chain).map_err(|missing| {
            Error::config_invalid(format!(
                "required fields {missing:?} not present in the default profile in config file"
            ))
        })?;
        resolved.pass_phrase = self.lookup(&chain, PASS_PHRASE);

        Ok(resolved)
    }

    /// Resolve all required fields over the lookup chain, or report every
    /// missing field at once.
    fn resolve_required(
        &self,
        chain: &[&str],
    ) -> std::result::Result<Profile, Vec<&'static str>> {
        let mut missing = Vec::new();
        let mut field = |name: &'static str| {
            self.lookup(chain, name).unwrap_or_else(|| {
                missing.push(name);
                String::new()
            })
        };

        let profile = Profile {
            user: field(REQUIRED_FIELDS[0]),
            fingerprint: field(REQUIRED_FIELDS[1]),
            key_file: field(REQUIRED_FIELDS[2]),
            tenancy: field(REQUIRED_FIELDS[3]),
            pass_phrase: None,
        };

        if missing.is_empty() {
            Ok(profile)
        } else {
            Err(missing)
        }
    }

    /// Look `key` up over an ordered chain of profile names, first hit wins.
    /// Profiles absent from the document act as empty sources.
    fn lookup(&self, chain: &[&str], key: &str) -> Option<String> {
        chain
            .iter()
            .find_map(|profile| self.profiles.get(*profile)?.get(key))
            .cloned()
    }
}
