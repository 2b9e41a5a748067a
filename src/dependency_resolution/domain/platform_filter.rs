use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A single platform a dependency edge or artifact can be restricted to.
///
/// Declaration order is the canonical order used when filter sets are
/// compared or printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFilter {
    Ios,
    Macos,
    Tvos,
    Catalyst,
    Driverkit,
    Watchos,
    Visionos,
}

impl PlatformFilter {
    /// Every platform of the universe, in canonical order.
    pub const ALL: [PlatformFilter; 7] = [
        PlatformFilter::Ios,
        PlatformFilter::Macos,
        PlatformFilter::Tvos,
        PlatformFilter::Catalyst,
        PlatformFilter::Driverkit,
        PlatformFilter::Watchos,
        PlatformFilter::Visionos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformFilter::Ios => "ios",
            PlatformFilter::Macos => "macos",
            PlatformFilter::Tvos => "tvos",
            PlatformFilter::Catalyst => "catalyst",
            PlatformFilter::Driverkit => "driverkit",
            PlatformFilter::Watchos => "watchos",
            PlatformFilter::Visionos => "visionos",
        }
    }
}

impl std::str::FromStr for PlatformFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlatformFilter::ALL
            .into_iter()
            .find(|platform| platform.as_str() == s.to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Invalid platform: {}. Expected one of: ios, macos, tvos, catalyst, driverkit, watchos, visionos",
                    s
                )
            })
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of platforms an edge, path or reference is active for.
///
/// `All` is the identity of [`intersection`](Self::intersection) and absorbs
/// under [`union`](Self::union). `Only` holds a sorted set so comparison and
/// iteration never depend on hashing. An `Only` set naming every platform
/// is normalized to `All`; an empty `Only` set means the path is never active.
///
/// The derived `Ord` puts `All` first and compares `Only` sets as sorted
/// member lists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PlatformFilters {
    #[default]
    All,
    Only(BTreeSet<PlatformFilter>),
}

impl PlatformFilters {
    /// Builds a filter set from explicit platforms, normalizing the full
    /// universe to `All`.
    pub fn only(platforms: impl IntoIterator<Item = PlatformFilter>) -> Self {
        let set: BTreeSet<PlatformFilter> = platforms.into_iter().collect();
        if set.len() == PlatformFilter::ALL.len() {
            PlatformFilters::All
        } else {
            PlatformFilters::Only(set)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, PlatformFilters::All)
    }

    /// True when no platform remains, i.e. the path can never be active.
    pub fn is_empty(&self) -> bool {
        matches!(self, PlatformFilters::Only(set) if set.is_empty())
    }

    pub fn contains(&self, platform: PlatformFilter) -> bool {
        match self {
            PlatformFilters::All => true,
            PlatformFilters::Only(set) => set.contains(&platform),
        }
    }

    /// Combines filters along a path: both restrictions must hold.
    pub fn intersection(&self, other: &PlatformFilters) -> PlatformFilters {
        match (self, other) {
            (PlatformFilters::All, other) => other.clone(),
            (this, PlatformFilters::All) => this.clone(),
            (PlatformFilters::Only(a), PlatformFilters::Only(b)) => {
                PlatformFilters::Only(a.intersection(b).copied().collect())
            }
        }
    }

    /// Combines filters across alternative paths: either path suffices.
    pub fn union(&self, other: &PlatformFilters) -> PlatformFilters {
        match (self, other) {
            (PlatformFilters::All, _) | (_, PlatformFilters::All) => PlatformFilters::All,
            (PlatformFilters::Only(a), PlatformFilters::Only(b)) => {
                PlatformFilters::only(a.union(b).copied())
            }
        }
    }

    /// Sorted member list, or `None` for `All`.
    pub fn platforms(&self) -> Option<Vec<PlatformFilter>> {
        match self {
            PlatformFilters::All => None,
            PlatformFilters::Only(set) => Some(set.iter().copied().collect()),
        }
    }
}

impl FromIterator<PlatformFilter> for PlatformFilters {
    fn from_iter<I: IntoIterator<Item = PlatformFilter>>(iter: I) -> Self {
        PlatformFilters::only(iter)
    }
}

impl fmt::Display for PlatformFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformFilters::All => f.write_str("all"),
            PlatformFilters::Only(set) if set.is_empty() => f.write_str("none"),
            PlatformFilters::Only(set) => {
                let names: Vec<&str> = set.iter().map(PlatformFilter::as_str).collect();
                f.write_str(&names.join(","))
            }
        }
    }
}

/// Serialized as `"all"` or as the sorted list of platform names.
impl Serialize for PlatformFilters {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PlatformFilters::All => serializer.serialize_str("all"),
            PlatformFilters::Only(set) => serializer.collect_seq(set.iter()),
        }
    }
}

/// Accepts the serialized forms: `"all"` or a list of platform names.
impl<'de> Deserialize<'de> for PlatformFilters {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Keyword(String),
            List(Vec<PlatformFilter>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Keyword(keyword) if keyword == "all" => Ok(PlatformFilters::All),
            Repr::Keyword(other) => Err(serde::de::Error::custom(format!(
                "expected \"all\" or a list of platforms, found \"{}\"",
                other
            ))),
            Repr::List(platforms) => Ok(PlatformFilters::only(platforms)),
        }
    }
}
