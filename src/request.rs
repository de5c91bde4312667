//! Request decoding and parameter validation.
//!
//! A request names one transform kind plus a flat parameter object. Each
//! kind accepts a fixed set of keys; anything else is rejected before the
//! root is even looked at.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::EngineError;
use crate::fs_ops::Scope;
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    AddPrefix,
    AddSuffix,
    DeleteMatches,
    ExtractNumeric,
    InitialPrefix,
    StripPrefix,
    Flatten,
}

impl TransformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::AddPrefix => "add_prefix",
            TransformKind::AddSuffix => "add_suffix",
            TransformKind::DeleteMatches => "delete_matches",
            TransformKind::ExtractNumeric => "extract_numeric",
            TransformKind::InitialPrefix => "initial_prefix",
            TransformKind::StripPrefix => "strip_prefix",
            TransformKind::Flatten => "flatten",
        }
    }

    /// The one required string key for this kind, if any.
    fn required_key(&self) -> Option<&'static str> {
        match self {
            TransformKind::AddPrefix => Some("prefix"),
            TransformKind::AddSuffix => Some("suffix"),
            TransformKind::DeleteMatches => Some("pattern"),
            _ => None,
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated parameters, one variant per transform kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformParams {
    AddPrefix { prefix: String },
    AddSuffix { suffix: String },
    DeleteMatches { pattern: String },
    ExtractNumeric,
    InitialPrefix,
    StripPrefix,
    Flatten,
}

/// What the engine does with validated parameters.
#[derive(Debug, Clone)]
pub enum Operation {
    Rename(Transform),
    Flatten,
}

impl TransformParams {
    pub fn kind(&self) -> TransformKind {
        match self {
            TransformParams::AddPrefix { .. } => TransformKind::AddPrefix,
            TransformParams::AddSuffix { .. } => TransformKind::AddSuffix,
            TransformParams::DeleteMatches { .. } => TransformKind::DeleteMatches,
            TransformParams::ExtractNumeric => TransformKind::ExtractNumeric,
            TransformParams::InitialPrefix => TransformKind::InitialPrefix,
            TransformParams::StripPrefix => TransformKind::StripPrefix,
            TransformParams::Flatten => TransformKind::Flatten,
        }
    }

    /// Decode the parameter object for `kind`. Unknown and missing keys are errors.
    pub fn from_map(kind: TransformKind, params: &Map<String, Value>) -> Result<Self, EngineError> {
        let required = kind.required_key();
        if let Some(unknown) = params.keys().find(|k| Some(k.as_str()) != required) {
            return Err(EngineError::params(
                kind.as_str(),
                format!("unknown parameter '{unknown}'"),
            ));
        }
        let value = match required {
            Some(key) => match params.get(key) {
                Some(Value::String(s)) => s.clone(),
                Some(_) => {
                    return Err(EngineError::params(
                        kind.as_str(),
                        format!("parameter '{key}' must be a string"),
                    ));
                }
                None => {
                    return Err(EngineError::params(
                        kind.as_str(),
                        format!("missing parameter '{key}'"),
                    ));
                }
            },
            None => String::new(),
        };
        let params = match kind {
            TransformKind::AddPrefix => TransformParams::AddPrefix { prefix: value },
            TransformKind::AddSuffix => TransformParams::AddSuffix { suffix: value },
            TransformKind::DeleteMatches => TransformParams::DeleteMatches { pattern: value },
            TransformKind::ExtractNumeric => TransformParams::ExtractNumeric,
            TransformKind::InitialPrefix => TransformParams::InitialPrefix,
            TransformKind::StripPrefix => TransformParams::StripPrefix,
            TransformKind::Flatten => TransformParams::Flatten,
        };
        params.validate()?;
        Ok(params)
    }

    /// Reject values that can never produce a sensible rename.
    pub fn validate(&self) -> Result<(), EngineError> {
        let (key, value) = match self {
            TransformParams::AddPrefix { prefix } => ("prefix", prefix),
            TransformParams::AddSuffix { suffix } => ("suffix", suffix),
            TransformParams::DeleteMatches { pattern } => ("pattern", pattern),
            _ => return Ok(()),
        };
        if value.is_empty() {
            return Err(EngineError::params(
                self.kind().as_str(),
                format!("parameter '{key}' must not be empty"),
            ));
        }
        if key != "pattern" && value.chars().any(std::path::is_separator) {
            return Err(EngineError::params(
                self.kind().as_str(),
                format!("parameter '{key}' must not contain a path separator"),
            ));
        }
        Ok(())
    }

    /// Compile into an operation. Patterns are compiled here, before any scan.
    pub fn build(&self) -> Result<Operation, EngineError> {
        self.validate()?;
        let op = match self {
            TransformParams::AddPrefix { prefix } => Operation::Rename(Transform::AddPrefix(prefix.clone())),
            TransformParams::AddSuffix { suffix } => Operation::Rename(Transform::AddSuffix(suffix.clone())),
            TransformParams::DeleteMatches { pattern } => Operation::Rename(Transform::delete_matches(pattern)?),
            TransformParams::ExtractNumeric => Operation::Rename(Transform::ExtractNumeric),
            TransformParams::InitialPrefix => Operation::Rename(Transform::initial_prefix()),
            TransformParams::StripPrefix => Operation::Rename(Transform::StripPrefix),
            TransformParams::Flatten => Operation::Flatten,
        };
        Ok(op)
    }
}

/// Wire form of a request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Request {
    pub root_path: PathBuf,
    #[serde(default)]
    pub scope: Option<Scope>,
    pub transform_kind: TransformKind,
    #[serde(default)]
    pub transform_params: Map<String, Value>,
}

/// A validated request, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub root: PathBuf,
    pub scope: Scope,
    pub params: TransformParams,
}

impl Request {
    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        serde_json::from_str(text).map_err(|e| EngineError::params("request", e.to_string()))
    }

    pub fn into_job(self) -> Result<Job, EngineError> {
        let params = TransformParams::from_map(self.transform_kind, &self.transform_params)?;
        Ok(Job {
            root: self.root_path,
            scope: self.scope.unwrap_or_default(),
            params,
        })
    }
}
