//! Description acquisition: resolves one API description through an ordered chain of strategies.
//!
//! Each strategy either produces a description or fails softly; failures are logged and the
//! next strategy in priority order is tried. The static scan never fails, so whenever it is part
//! of the chain the acquisition cannot be exhausted.

pub mod introspect;
pub mod remote;
pub mod static_scan;

pub use introspect::{
    AppCandidate, CandidateLocator, ExporterBinary, ExporterLocator, IntrospectionStrategy,
};
pub use remote::RemoteFetch;
pub use static_scan::{ScanConfig, StaticScan};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

use crate::description::ResolvedDescription;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Remote,
    Introspection,
    Static,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Remote => "remote",
            StrategyKind::Introspection => "introspection",
            StrategyKind::Static => "static",
        }
    }

    /// Full chain when `self` is the preferred strategy
    pub fn priority_order(self) -> [StrategyKind; 3] {
        match self {
            StrategyKind::Remote => [
                StrategyKind::Remote,
                StrategyKind::Introspection,
                StrategyKind::Static,
            ],
            StrategyKind::Introspection => [
                StrategyKind::Introspection,
                StrategyKind::Remote,
                StrategyKind::Static,
            ],
            StrategyKind::Static => [
                StrategyKind::Static,
                StrategyKind::Remote,
                StrategyKind::Introspection,
            ],
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one successful strategy produced
#[derive(Debug, Clone)]
pub struct Attempt {
    pub resolved: ResolvedDescription,
    /// Where the description came from: a URL, a candidate name, or `fallback`
    pub detail: String,
}

pub trait AcquisitionStrategy {
    fn kind(&self) -> StrategyKind;

    fn attempt(&self) -> anyhow::Result<Attempt>;
}

/// The resolved description together with the strategy that produced it
#[derive(Debug, Clone)]
pub struct Acquired {
    pub resolved: ResolvedDescription,
    pub source: StrategyKind,
    pub detail: String,
}

impl Acquired {
    pub fn source_line(&self) -> String {
        format!("Description source: {} ({})", self.source, self.detail)
    }
}

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("could not obtain an API description from any source (tried: {})", join_kinds(.tried))]
    Exhausted { tried: Vec<StrategyKind> },
}

fn join_kinds(kinds: &[StrategyKind]) -> String {
    kinds
        .iter()
        .map(StrategyKind::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct SpecAcquisitor {
    strategies: Vec<Box<dyn AcquisitionStrategy>>,
}

impl SpecAcquisitor {
    pub fn new(strategies: Vec<Box<dyn AcquisitionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> impl Iterator<Item = StrategyKind> + '_ {
        self.strategies.iter().map(|s| s.kind())
    }

    /// Runs the chain starting from `preferred`.
    ///
    /// A description with no keys counts as a failure for every strategy except the static
    /// scan, whose empty result is still the answer.
    pub fn acquire(&self, preferred: StrategyKind) -> Result<Acquired, AcquireError> {
        let mut tried = Vec::new();

        for kind in preferred.priority_order() {
            let Some(strategy) = self.strategies.iter().find(|s| s.kind() == kind) else {
                continue;
            };
            tried.push(kind);

            match strategy.attempt() {
                Ok(attempt) if attempt.resolved.is_empty() && kind != StrategyKind::Static => {
                    debug!(strategy = %kind, "Strategy produced an empty description, skipping");
                }
                Ok(attempt) => {
                    info!(
                        strategy = %kind,
                        detail = %attempt.detail,
                        operations = attempt.resolved.description.operation_count(),
                        "Resolved API description"
                    );
                    return Ok(Acquired {
                        resolved: attempt.resolved,
                        source: kind,
                        detail: attempt.detail,
                    });
                }
                Err(e) => {
                    debug!(strategy = %kind, error = %e, "Strategy failed");
                }
            }
        }

        Err(AcquireError::Exhausted { tried })
    }
}
