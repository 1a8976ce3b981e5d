//! Response contracts and handler replies.
//!
//! # Design Decisions
//! - A contract is an ordered list of `(status code, codec)` branches; the
//!   OR-merge concatenates branches, so a reply is encoded by the first branch
//!   whose code matches and whose codec recognises the data
//! - Documentation metadata is keyed by status code and merged right-biased

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::codec::{Shape, SharedCodec};

/// What a handler hands back to the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub code: u16,
    pub data: Value,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl Reply {
    pub fn new(code: u16, data: impl Into<Value>) -> Self {
        Self {
            code,
            data: data.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Build a reply with the given status code and payload.
pub fn respond(code: u16, data: impl Into<Value>) -> Reply {
    Reply::new(code, data)
}

/// Per-status documentation overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseMetadata {
    pub description: Option<String>,
    pub schema_name: Option<String>,
    pub example: Option<Value>,
}

impl ResponseMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn schema_name(mut self, name: impl Into<String>) -> Self {
        self.schema_name = Some(name.into());
        self
    }

    pub fn example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ResponseBranch {
    pub code: u16,
    pub codec: SharedCodec,
}

#[derive(Debug, Clone, Default)]
pub enum ResponseContract {
    #[default]
    Absent,
    Present {
        branches: Vec<ResponseBranch>,
        metadata: BTreeMap<u16, ResponseMetadata>,
    },
}

impl ResponseContract {
    pub fn new(code: u16, codec: SharedCodec) -> Self {
        ResponseContract::Present {
            branches: vec![ResponseBranch { code, codec }],
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(code: u16, codec: SharedCodec, metadata: ResponseMetadata) -> Self {
        ResponseContract::Present {
            branches: vec![ResponseBranch { code, codec }],
            metadata: BTreeMap::from([(code, metadata)]),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, ResponseContract::Present { .. })
    }

    /// OR-merge: accepts whatever either side accepts.
    pub fn or(self, other: ResponseContract) -> ResponseContract {
        match (self, other) {
            (ResponseContract::Absent, other) => other,
            (this, ResponseContract::Absent) => this,
            (
                ResponseContract::Present {
                    mut branches,
                    mut metadata,
                },
                ResponseContract::Present {
                    branches: right_branches,
                    metadata: right_metadata,
                },
            ) => {
                branches.extend(right_branches);
                metadata.extend(right_metadata);
                ResponseContract::Present { branches, metadata }
            }
        }
    }

    pub fn branches(&self) -> &[ResponseBranch] {
        match self {
            ResponseContract::Absent => &[],
            ResponseContract::Present { branches, .. } => branches,
        }
    }

    pub fn metadata(&self) -> Option<&BTreeMap<u16, ResponseMetadata>> {
        match self {
            ResponseContract::Absent => None,
            ResponseContract::Present { metadata, .. } => Some(metadata),
        }
    }

    /// Encode a reply into its wire form. `None` when no contract is declared.
    pub fn encode(&self, reply: Reply) -> Option<Reply> {
        let ResponseContract::Present { branches, .. } = self else {
            return None;
        };

        let branch = branches
            .iter()
            .find(|b| b.code == reply.code && b.codec.is(&reply.data))
            .or_else(|| branches.iter().find(|b| b.code == reply.code));

        let data = match branch {
            Some(branch) => branch.codec.encode(&reply.data),
            None => {
                tracing::warn!(code = reply.code, "Reply status code not declared by the response contract");
                reply.data
            }
        };

        Some(Reply { data, ..reply })
    }

    /// Shape of the encoded reply: `{code, data}` or a union of those.
    pub fn shape(&self) -> Option<Shape> {
        let branches = self.branches();
        let mut shapes: Vec<Shape> = branches
            .iter()
            .map(|b| Shape::Record {
                name: None,
                fields: vec![
                    ("code".to_string(), Shape::Literal(json!(b.code))),
                    ("data".to_string(), b.codec.shape()),
                ],
            })
            .collect();
        match shapes.len() {
            0 => None,
            1 => shapes.pop(),
            _ => Some(Shape::Union(shapes)),
        }
    }
}

impl PartialEq for ResponseContract {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.metadata() == other.metadata()
    }
}
