use super::platform_filter::PlatformFilters;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Whether an SDK must be present at link time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdkStatus {
    Required,
    Optional,
}

/// Where an SDK comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdkSource {
    System,
    Developer,
}

/// Artifact categories in the order generated build settings place them.
///
/// The declaration order *is* the kind rank: SDKs first, bundles last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Sdk,
    Product,
    Library,
    Framework,
    XcFramework,
    Bundle,
}

impl ReferenceKind {
    /// Every kind, lowest rank first.
    pub const ALL: [ReferenceKind; 6] = [
        ReferenceKind::Sdk,
        ReferenceKind::Product,
        ReferenceKind::Library,
        ReferenceKind::Framework,
        ReferenceKind::XcFramework,
        ReferenceKind::Bundle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Sdk => "sdk",
            ReferenceKind::Product => "product",
            ReferenceKind::Library => "library",
            ReferenceKind::Framework => "framework",
            ReferenceKind::XcFramework => "xcframework",
            ReferenceKind::Bundle => "bundle",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The build-consumable form of a resolved graph node.
///
/// Equality is structural. `Library`, `Framework` and `XcFramework` are
/// identified by path only; `Bundle`, `Sdk` and `Product` include their
/// platform filters in their identity, so two of them differing only in
/// filters are distinct entries.
///
/// `Ord` ranks by [`ReferenceKind`] first, then by path or name, then by the
/// remaining fields. Paths compare as whole strings, not component by
/// component, so `/F/Core-UI.framework` sorts before `/F/Core/UI.framework`.
/// `Eq` is defined through `Ord`, so sorting any multiset of references
/// yields one sequence regardless of input order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DependencyReference {
    XcFramework {
        path: PathBuf,
    },
    Framework {
        path: PathBuf,
    },
    Library {
        path: PathBuf,
    },
    Bundle {
        path: PathBuf,
        platform_filters: PlatformFilters,
    },
    Sdk {
        path: PathBuf,
        status: SdkStatus,
        source: SdkSource,
        platform_filters: PlatformFilters,
    },
    Product {
        target: String,
        product_name: String,
        platform_filters: PlatformFilters,
    },
}

impl DependencyReference {
    pub fn kind(&self) -> ReferenceKind {
        match self {
            DependencyReference::Sdk { .. } => ReferenceKind::Sdk,
            DependencyReference::Product { .. } => ReferenceKind::Product,
            DependencyReference::Library { .. } => ReferenceKind::Library,
            DependencyReference::Framework { .. } => ReferenceKind::Framework,
            DependencyReference::XcFramework { .. } => ReferenceKind::XcFramework,
            DependencyReference::Bundle { .. } => ReferenceKind::Bundle,
        }
    }

    /// Platform filters for the variants that carry them.
    pub fn platform_filters(&self) -> Option<&PlatformFilters> {
        match self {
            DependencyReference::Bundle {
                platform_filters, ..
            }
            | DependencyReference::Sdk {
                platform_filters, ..
            }
            | DependencyReference::Product {
                platform_filters, ..
            } => Some(platform_filters),
            DependencyReference::XcFramework { .. }
            | DependencyReference::Framework { .. }
            | DependencyReference::Library { .. } => None,
        }
    }

    /// Path or `target/product` name, used for display and as primary sort key.
    pub fn display_name(&self) -> String {
        match self {
            DependencyReference::XcFramework { path }
            | DependencyReference::Framework { path }
            | DependencyReference::Library { path }
            | DependencyReference::Bundle { path, .. }
            | DependencyReference::Sdk { path, .. } => path.display().to_string(),
            DependencyReference::Product {
                target,
                product_name,
                ..
            } => format!("{}/{}", target, product_name),
        }
    }

    /// Deduplicates by identity and returns the references in canonical order.
    pub fn sorted_unique(
        references: impl IntoIterator<Item = DependencyReference>,
    ) -> Vec<DependencyReference> {
        references
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Tie-break between two references of the same kind.
    fn cmp_within_kind(&self, other: &Self) -> Ordering {
        use DependencyReference::*;

        match (self, other) {
            (XcFramework { path: a }, XcFramework { path: b })
            | (Framework { path: a }, Framework { path: b })
            | (Library { path: a }, Library { path: b }) => cmp_paths(a, b),
            (
                Bundle {
                    path: a,
                    platform_filters: fa,
                },
                Bundle {
                    path: b,
                    platform_filters: fb,
                },
            ) => cmp_paths(a, b).then_with(|| fa.cmp(fb)),
            (
                Sdk {
                    path: a,
                    status: sa,
                    source: ra,
                    platform_filters: fa,
                },
                Sdk {
                    path: b,
                    status: sb,
                    source: rb,
                    platform_filters: fb,
                },
            ) => cmp_paths(a, b)
                .then_with(|| sa.cmp(sb))
                .then_with(|| ra.cmp(rb))
                .then_with(|| fa.cmp(fb)),
            (
                Product {
                    target: ta,
                    product_name: pa,
                    platform_filters: fa,
                },
                Product {
                    target: tb,
                    product_name: pb,
                    platform_filters: fb,
                },
            ) => ta
                .cmp(tb)
                .then_with(|| pa.cmp(pb))
                .then_with(|| fa.cmp(fb)),
            // Different kinds never reach here; `cmp` ranks them first.
            _ => self.kind().cmp(&other.kind()),
        }
    }
}

/// Byte-wise comparison of the whole path string.
fn cmp_paths(a: &Path, b: &Path) -> Ordering {
    a.as_os_str().cmp(b.as_os_str())
}

impl PartialEq for DependencyReference {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DependencyReference {}

impl Ord for DependencyReference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind()
            .cmp(&other.kind())
            .then_with(|| self.cmp_within_kind(other))
    }
}

impl PartialOrd for DependencyReference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DependencyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}", self.kind(), self.display_name())?;
        if let DependencyReference::Sdk { status, source, .. } = self {
            write!(f, ", {:?}, {:?}", status, source)?;
        }
        if let Some(filters) = self.platform_filters() {
            write!(f, ", [{}]", filters)?;
        }
        write!(f, ")")
    }
}
