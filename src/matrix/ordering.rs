//! Row orderings and scope classification.

use super::error::MatrixError;
use crate::graph::{Dependency, Scope};

/// Strategy deciding the row/column sequence of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum MatrixOrdering {
    /// The graph's default layout, by instability
    #[default]
    Instability,
    /// Ascending display names
    Natural,
}

impl MatrixOrdering {
    /// The ordering the graph lays rows out in by default.
    pub fn collaborator_default() -> Self {
        Self::Instability
    }

    /// Returns true if this is the graph's default layout.
    pub fn is_collaborator_default(self) -> bool {
        self == Self::collaborator_default()
    }
}

impl std::str::FromStr for MatrixOrdering {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "instability" | "default" => Ok(Self::Instability),
            "natural" | "alphabetic" => Ok(Self::Natural),
            _ => Err(MatrixError::UnsupportedOrdering(s.to_string())),
        }
    }
}

impl std::fmt::Display for MatrixOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instability => write!(f, "instability"),
            Self::Natural => write!(f, "natural"),
        }
    }
}

/// Which end of a dependency a scope query asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// The depending item
    Source,
    /// The item depended upon
    Target,
}

impl std::str::FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" | "dependant" => Ok(Self::Source),
            "target" | "dependee" => Ok(Self::Target),
            _ => Err(format!(
                "Unknown endpoint: '{}'. Valid endpoints: source, target",
                s
            )),
        }
    }
}

/// Scope classification reported by matrix queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DependencyScope {
    /// Package-level item
    Packages,
    /// Class-level item
    Classes,
    /// No dependency, or a scope with no matrix classification
    #[default]
    Unknown,
}

impl DependencyScope {
    /// Classifies a graph scope by its index.
    pub fn from_scope(scope: Scope) -> Self {
        match scope.index() {
            1 => Self::Packages,
            2 => Self::Classes,
            _ => Self::Unknown,
        }
    }

    /// Classifies one endpoint of a dependency.
    pub fn of(dependency: &Dependency, endpoint: Endpoint) -> Self {
        let scope = match endpoint {
            Endpoint::Source => dependency.dependant_scope(),
            Endpoint::Target => dependency.dependee_scope(),
        };
        Self::from_scope(scope)
    }
}

impl std::fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Packages => write!(f, "packages"),
            Self::Classes => write!(f, "classes"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Dependable;
    use std::sync::Arc;

    #[test]
    fn test_ordering_from_str() {
        assert_eq!(
            "natural".parse::<MatrixOrdering>().unwrap(),
            MatrixOrdering::Natural
        );
        assert_eq!(
            "INSTABILITY".parse::<MatrixOrdering>().unwrap(),
            MatrixOrdering::Instability
        );
        assert_eq!(
            "default".parse::<MatrixOrdering>().unwrap(),
            MatrixOrdering::Instability
        );
        assert_eq!(
            "random".parse::<MatrixOrdering>(),
            Err(MatrixError::UnsupportedOrdering("random".to_string()))
        );
    }

    #[test]
    fn test_ordering_display_round_trips() {
        for ordering in [MatrixOrdering::Instability, MatrixOrdering::Natural] {
            assert_eq!(ordering.to_string().parse::<MatrixOrdering>().unwrap(), ordering);
        }
    }

    #[test]
    fn test_collaborator_default() {
        assert!(MatrixOrdering::Instability.is_collaborator_default());
        assert!(!MatrixOrdering::Natural.is_collaborator_default());
        assert_eq!(MatrixOrdering::default(), MatrixOrdering::collaborator_default());
    }

    #[test]
    fn test_endpoint_from_str() {
        assert_eq!("source".parse::<Endpoint>().unwrap(), Endpoint::Source);
        assert_eq!("Dependee".parse::<Endpoint>().unwrap(), Endpoint::Target);
        assert!("middle".parse::<Endpoint>().is_err());
    }

    #[test]
    fn test_scope_classification() {
        assert_eq!(DependencyScope::from_scope(Scope::Packages), DependencyScope::Packages);
        assert_eq!(DependencyScope::from_scope(Scope::Classes), DependencyScope::Classes);
        assert_eq!(DependencyScope::from_scope(Scope::Locations), DependencyScope::Unknown);
    }

    #[test]
    fn test_scope_of_endpoint() {
        let pkg = Arc::new(Dependable::new("core", "app.core", Scope::Packages));
        let class = Arc::new(Dependable::new("View", "app.ui.View", Scope::Classes));
        let dep = Dependency::new(pkg, class, 1);

        assert_eq!(DependencyScope::of(&dep, Endpoint::Source), DependencyScope::Packages);
        assert_eq!(DependencyScope::of(&dep, Endpoint::Target), DependencyScope::Classes);
    }
}
