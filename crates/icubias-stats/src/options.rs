//! Options shared by the comparison tests.

use std::fmt;
use std::str::FromStr;

use anofox_statistics::parametric::ttest::Alternative as BackendAlternative;
use statrs::distribution::ContinuousCDF;

/// Alternative hypothesis of a test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alternative {
    #[default]
    TwoSided,
    Less,
    Greater,
}

impl Alternative {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwoSided => "two-sided",
            Self::Less => "less",
            Self::Greater => "greater",
        }
    }

    /// p-value of a statistic `t` under a distribution symmetric around zero.
    pub(crate) fn symmetric_p_value<D: ContinuousCDF<f64, f64>>(self, dist: &D, t: f64) -> f64 {
        let sf = |x: f64| {
            if x == f64::INFINITY {
                0.0
            } else if x == f64::NEG_INFINITY {
                1.0
            } else {
                dist.sf(x)
            }
        };
        let p = match self {
            Self::TwoSided => 2.0 * sf(t.abs()),
            // Symmetry: cdf(t) == sf(-t).
            Self::Less => sf(-t),
            Self::Greater => sf(t),
        };
        p.clamp(0.0, 1.0)
    }

    /// One-sided p-value from a two-sided one whose statistic has the sign
    /// of `estimate`, for a null distribution symmetric around zero.
    pub(crate) fn from_two_sided(self, two_sided: f64, estimate: f64) -> f64 {
        let half = two_sided / 2.0;
        let p = match self {
            Self::TwoSided => two_sided,
            Self::Greater if estimate > 0.0 => half,
            Self::Less if estimate < 0.0 => half,
            Self::Greater | Self::Less => 1.0 - half,
        };
        p.clamp(0.0, 1.0)
    }
}

impl From<Alternative> for BackendAlternative {
    fn from(alternative: Alternative) -> Self {
        match alternative {
            Alternative::TwoSided => Self::TwoSided,
            Alternative::Less => Self::Less,
            Alternative::Greater => Self::Greater,
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alternative {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "two-sided" | "two_sided" | "twosided" => Ok(Self::TwoSided),
            "less" => Ok(Self::Less),
            "greater" => Ok(Self::Greater),
            other => Err(format!("unknown alternative '{other}'")),
        }
    }
}

/// Which labels of the grouping column take part in a k-sample test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GroupSelection {
    /// Every non-missing label, in order of first appearance.
    #[default]
    All,
    /// Exactly these labels; each must be present.
    Only(Vec<String>),
}

impl GroupSelection {
    pub fn from_labels(labels: &[String]) -> Self {
        if labels.is_empty() {
            Self::All
        } else {
            Self::Only(labels.to_vec())
        }
    }
}

/// Treatment of missing values. Missing values are always dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingPolicy {
    #[default]
    Omit,
}
