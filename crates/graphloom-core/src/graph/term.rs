//! Terms of a triple: IRI references, blank node labels, and literals
//!
//! Terms are the atoms of the triple model. Subjects and predicates are
//! always [`Iri`]s (blank node labels ride along as IRIs with a `_:`
//! prefix); objects may additionally be [`Literal`]s.

use serde::{Deserialize, Serialize};

/// An opaque URI-like identifier for a graph node or predicate
///
/// Also carries blank node labels (`_:b0`), which serialize without
/// angle brackets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Iri(String);

impl Iri {
    /// Create a new IRI from its string form
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the raw string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this is a blank node label rather than a real IRI
    pub fn is_blank(&self) -> bool {
        self.0.starts_with("_:")
    }

    /// Derive a human-readable display label
    ///
    /// Takes the segment after the last `#` or `/` delimiter and replaces
    /// underscores with spaces, so `http://example.org/ns#Ada_Lovelace`
    /// becomes `Ada Lovelace`.
    pub fn label(&self) -> String {
        let tail = self
            .0
            .rsplit(['#', '/'])
            .next()
            .unwrap_or(self.0.as_str());
        tail.replace('_', " ")
    }
}

impl std::fmt::Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A literal value: a raw string plus optional datatype or language tag
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// Raw string value
    pub value: String,
    /// Optional datatype IRI (e.g. xsd:integer)
    pub datatype: Option<Iri>,
    /// Optional language tag (e.g. "en")
    pub language: Option<String>,
}

impl Literal {
    /// Create a plain string literal
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Create a typed literal
    pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
        Self {
            value: value.into(),
            datatype: Some(datatype),
            language: None,
        }
    }

    /// Create a language-tagged literal
    pub fn with_language(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    /// Display label: the raw value verbatim
    pub fn label(&self) -> &str {
        &self.value
    }
}

/// An object-position term: either a node reference or a literal
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// A node reference
    Iri(Iri),
    /// A literal value
    Literal(Literal),
}

impl Term {
    /// Derive the display label for this term
    pub fn label(&self) -> String {
        match self {
            Term::Iri(iri) => iri.label(),
            Term::Literal(lit) => lit.label().to_string(),
        }
    }

    /// Stable identifier for the presentation model
    ///
    /// IRIs use their raw string form; literals use a quoted lexical form
    /// so a literal `"London"` and a node `London` never collide.
    pub fn key(&self) -> String {
        match self {
            Term::Iri(iri) => iri.as_str().to_string(),
            Term::Literal(lit) => {
                let mut key = format!("\"{}\"", lit.value);
                if let Some(lang) = &lit.language {
                    key.push('@');
                    key.push_str(lang);
                } else if let Some(dt) = &lit.datatype {
                    key.push_str("^^");
                    key.push_str(dt.as_str());
                }
                key
            }
        }
    }

    /// Get the IRI if this term is a node reference
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}
