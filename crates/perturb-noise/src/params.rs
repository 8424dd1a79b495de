//! Typed description of a noise configuration tag.
//!
//! [`NoiseParams`] sits between the raw configuration tree and a validated
//! [`NoiseModel`]: [`from_node`](NoiseParams::from_node) is the only place a
//! model name is compared as a string, and
//! [`into_model`](NoiseParams::into_model) applies the parameter rules.  It also
//! deserializes with `serde`, so typed configs can embed it directly:
//!
//! ```
//! use perturb_noise::params::NoiseParams;
//!
//! let params: NoiseParams = toml::from_str("model = \"gaussian\"\nstddev = 0.1").unwrap();
//! assert_eq!(params, NoiseParams::Gaussian { mean: 0.0, stddev: 0.1 });
//! ```

use perturb_core::config::ConfigNode;
use perturb_core::error::ConfigError;
use serde::{Deserialize, Serialize};

use crate::model::{NoiseError, NoiseModel};

/// Names accepted for the `model` attribute.
pub const MODEL_NAMES: [&str; 3] = ["none", "uniform", "gaussian"];

const fn default_stddev() -> f64 {
    1.0
}

/// Unvalidated noise parameters as read from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum NoiseParams {
    #[default]
    None,
    Uniform {
        #[serde(default)]
        level: f64,
    },
    Gaussian {
        #[serde(default)]
        mean: f64,
        #[serde(default = "default_stddev")]
        stddev: f64,
    },
}

impl NoiseParams {
    /// Read a noise tag.
    ///
    /// `model` is required; `none` reads nothing else, `uniform` reads
    /// `level` (default 0.0), `gaussian` reads `stddev` (default 1.0) and
    /// `mean` (default 0.0).
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingField`] when `model` is absent,
    /// [`ConfigError::InvalidValue`] for an unknown model name or an
    /// unparsable parameter.
    pub fn from_node(node: &ConfigNode) -> Result<Self, ConfigError> {
        let model: String = node.attribute("model")?;
        match model.as_str() {
            "none" => Ok(Self::None),
            "uniform" => Ok(Self::Uniform {
                level: node.attribute_or("level", 0.0)?,
            }),
            "gaussian" => Ok(Self::Gaussian {
                stddev: node.attribute_or("stddev", default_stddev())?,
                mean: node.attribute_or("mean", 0.0)?,
            }),
            other => Err(ConfigError::invalid(
                "model",
                format!(
                    "unknown noise model `{other}`, expected one of {}",
                    MODEL_NAMES.join(", ")
                ),
            )),
        }
    }

    /// Read the child tag `tag` of `parent`.  A missing tag reads as
    /// [`NoiseParams::None`].
    ///
    /// # Errors
    ///
    /// Same as [`from_node`](Self::from_node).
    pub fn from_child(parent: &ConfigNode, tag: &str) -> Result<Self, ConfigError> {
        parent.child(tag).map_or(Ok(Self::None), Self::from_node)
    }

    /// Validate the parameters and build the model.
    ///
    /// # Errors
    ///
    /// [`NoiseError`] when a parameter is out of range (negative `level` or
    /// `stddev`, non-finite values).
    pub fn into_model(self) -> Result<NoiseModel, NoiseError> {
        match self {
            Self::None => Ok(NoiseModel::None),
            Self::Uniform { level } => NoiseModel::uniform(level),
            Self::Gaussian { mean, stddev } => NoiseModel::gaussian(mean, stddev),
        }
    }

    /// Parse and validate in one step.
    ///
    /// # Errors
    ///
    /// Any error of [`from_node`](Self::from_node), or a validation error
    /// converted to [`ConfigError::InvalidValue`].
    pub fn parse_model(node: &ConfigNode) -> Result<NoiseModel, ConfigError> {
        Ok(Self::from_node(node)?.into_model()?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn node(model: &str) -> ConfigNode {
        ConfigNode::new("noise").with_attribute("model", model)
    }

    // -- from_node --

    #[test]
    fn none_reads_no_parameters() {
        let n = node("none").with_attribute("level", "garbage");
        assert_eq!(NoiseParams::from_node(&n).unwrap(), NoiseParams::None);
    }

    #[test]
    fn uniform_level_defaults_to_zero() {
        assert_eq!(
            NoiseParams::from_node(&node("uniform")).unwrap(),
            NoiseParams::Uniform { level: 0.0 }
        );
    }

    #[test]
    fn gaussian_defaults() {
        assert_eq!(
            NoiseParams::from_node(&node("gaussian")).unwrap(),
            NoiseParams::Gaussian {
                mean: 0.0,
                stddev: 1.0
            }
        );
    }

    #[test]
    fn gaussian_reads_parameters() {
        let n = node("gaussian")
            .with_attribute("mean", 0.1)
            .with_attribute("stddev", 0.2);
        assert_eq!(
            NoiseParams::from_node(&n).unwrap(),
            NoiseParams::Gaussian {
                mean: 0.1,
                stddev: 0.2
            }
        );
    }

    #[test]
    fn missing_model_is_missing_field() {
        let err = NoiseParams::from_node(&ConfigNode::new("noise")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "model"));
    }

    #[test]
    fn unknown_model_names_field() {
        let err = NoiseParams::from_node(&node("bogus")).unwrap_err();
        assert_eq!(err.field(), Some("model"));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn model_names_are_case_sensitive() {
        assert!(NoiseParams::from_node(&node("Uniform")).is_err());
    }

    #[test]
    fn unparsable_level_names_field() {
        let n = node("uniform").with_attribute("level", "high");
        assert_eq!(NoiseParams::from_node(&n).unwrap_err().field(), Some("level"));
    }

    #[test]
    fn missing_child_is_none() {
        let parent = ConfigNode::new("battery");
        assert_eq!(
            NoiseParams::from_child(&parent, "noise").unwrap(),
            NoiseParams::None
        );
    }

    // -- into_model / parse_model --

    #[test]
    fn negative_level_fails_validation() {
        let n = node("uniform").with_attribute("level", -0.5);
        let err = NoiseParams::parse_model(&n).unwrap_err();
        assert_eq!(err.field(), Some("level"));
    }

    #[test]
    fn negative_stddev_fails_validation() {
        let n = node("gaussian").with_attribute("stddev", -1);
        let err = NoiseParams::parse_model(&n).unwrap_err();
        assert_eq!(err.field(), Some("stddev"));
    }

    #[test]
    fn zero_level_builds_none() {
        let n = node("uniform").with_attribute("level", 0);
        assert_eq!(NoiseParams::parse_model(&n).unwrap(), NoiseModel::None);
    }

    // -- serde --

    #[test]
    fn deserializes_from_toml() {
        let params: NoiseParams = toml::from_str("model = \"uniform\"\nlevel = 0.1").unwrap();
        assert_eq!(params, NoiseParams::Uniform { level: 0.1 });
        let params: NoiseParams = toml::from_str("model = \"none\"").unwrap();
        assert_eq!(params, NoiseParams::None);
    }

    #[test]
    fn deserialize_rejects_unknown_model() {
        assert!(toml::from_str::<NoiseParams>("model = \"bogus\"").is_err());
    }

    #[test]
    fn serializes_with_model_tag() {
        let text = toml::to_string(&NoiseParams::Gaussian {
            mean: 0.5,
            stddev: 2.0,
        })
        .unwrap();
        assert!(text.contains("model = \"gaussian\""));
        assert!(text.contains("stddev = 2.0"));
    }
}
