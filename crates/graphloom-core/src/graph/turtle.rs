//! Turtle codec for triple graphs
//!
//! Parses and serializes the subset of the Terse RDF Triple Language the
//! pipeline reads and writes: `@prefix` directives, IRI references,
//! prefixed names, blank node labels, the `a` keyword, quoted and long
//! string literals with escapes, language tags, datatype annotations,
//! bare numeric and boolean literals, object lists (`,`), predicate
//! lists (`;`), and `#` comments.
//!
//! The codec round-trips: `parse(serialize(g))` yields a graph that is
//! triple-set-equal to `g` (ordering and prefix choice may differ).

use std::collections::BTreeMap;

use crate::error::{Error, Result};

use super::model::{Triple, TripleGraph};
use super::term::{Iri, Literal, Term};

/// The rdf:type predicate, written as `a` in Turtle
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

/// Parse a Turtle document into a graph
///
/// Fails with [`Error::Parse`] carrying the byte offset of the first
/// malformed token.
pub fn parse(text: &str) -> Result<TripleGraph> {
    Parser::new(text).parse_document()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    prefixes: BTreeMap<String, String>,
    graph: TripleGraph,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            prefixes: BTreeMap::new(),
            graph: TripleGraph::new(),
        }
    }

    fn parse_document(mut self) -> Result<TripleGraph> {
        loop {
            self.skip_ws();
            if self.at_end() {
                return Ok(self.graph);
            }
            if self.peek() == Some('@') {
                self.parse_directive()?;
            } else {
                self.parse_statement()?;
            }
        }
    }

    // ---- directives ----

    fn parse_directive(&mut self) -> Result<()> {
        if self.rest().starts_with("@prefix") {
            self.advance("@prefix".len());
            self.skip_ws();
            let prefix = self.take_while(is_prefix_char);
            self.expect(':')?;
            self.skip_ws();
            let namespace = self.parse_iriref()?;
            self.skip_ws();
            self.expect('.')?;
            self.prefixes
                .insert(prefix.clone(), namespace.as_str().to_string());
            self.graph.bind_prefix(prefix, namespace.as_str());
            Ok(())
        } else {
            let directive = self.rest().split_whitespace().next().unwrap_or("@");
            Err(self.err(format!("unsupported directive '{}'", directive)))
        }
    }

    // ---- statements ----

    fn parse_statement(&mut self) -> Result<()> {
        let subject = self.parse_resource()?;
        loop {
            self.skip_ws();
            let predicate = self.parse_predicate()?;
            loop {
                self.skip_ws();
                let object = self.parse_object()?;
                self.graph
                    .insert(Triple::new(subject.clone(), predicate.clone(), object));
                self.skip_ws();
                if self.peek() == Some(',') {
                    self.bump();
                } else {
                    break;
                }
            }
            match self.peek() {
                Some(';') => {
                    self.bump();
                    self.skip_ws();
                    // a trailing ';' before '.' is permitted
                    if self.peek() == Some('.') {
                        self.bump();
                        return Ok(());
                    }
                }
                Some('.') => {
                    self.bump();
                    return Ok(());
                }
                _ => return Err(self.err("expected ',', ';' or '.'")),
            }
        }
    }

    fn parse_predicate(&mut self) -> Result<Iri> {
        if self.peek() == Some('a') {
            let after = self.input[self.pos + 1..].chars().next();
            let terminates = after.map(|c| c.is_whitespace() || c == '<').unwrap_or(true);
            if terminates {
                self.bump();
                return Ok(Iri::new(RDF_TYPE));
            }
        }
        self.parse_resource()
    }

    /// A subject- or predicate-position resource: IRI ref, prefixed name
    /// or blank node label
    fn parse_resource(&mut self) -> Result<Iri> {
        match self.peek() {
            Some('<') => self.parse_iriref(),
            Some('_') => self.parse_blank_node(),
            Some('"') | Some('\'') => Err(self.err("literal not allowed here")),
            Some(_) => self.parse_prefixed_name(),
            None => Err(self.err("unexpected end of input")),
        }
    }

    fn parse_object(&mut self) -> Result<Term> {
        match self.peek() {
            Some('<') => Ok(Term::Iri(self.parse_iriref()?)),
            Some('"') | Some('\'') => self.parse_literal(),
            Some('_') => Ok(Term::Iri(self.parse_blank_node()?)),
            Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => self.parse_numeric(),
            Some('.') if self.next_is_digit_after(1) => self.parse_numeric(),
            Some(_) => {
                if self.lookahead_is_prefixed_name() {
                    Ok(Term::Iri(self.parse_prefixed_name()?))
                } else if self.rest().starts_with("true") {
                    self.advance(4);
                    Ok(Term::Literal(Literal::typed("true", Iri::new(XSD_BOOLEAN))))
                } else if self.rest().starts_with("false") {
                    self.advance(5);
                    Ok(Term::Literal(Literal::typed("false", Iri::new(XSD_BOOLEAN))))
                } else {
                    Err(self.err("expected an IRI, prefixed name or literal"))
                }
            }
            None => Err(self.err("unexpected end of input")),
        }
    }

    // ---- terms ----

    fn parse_iriref(&mut self) -> Result<Iri> {
        self.expect('<')?;
        let start = self.pos;
        loop {
            match self.peek() {
                Some('>') => {
                    let iri = &self.input[start..self.pos];
                    self.bump();
                    return Ok(Iri::new(iri));
                }
                Some('\n') | None => return Err(self.err("unterminated IRI reference")),
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn parse_blank_node(&mut self) -> Result<Iri> {
        if !self.rest().starts_with("_:") {
            return Err(self.err("expected blank node label"));
        }
        self.advance(2);
        let name = self.take_while(|c| c.is_alphanumeric() || c == '_' || c == '-');
        if name.is_empty() {
            return Err(self.err("empty blank node label"));
        }
        Ok(Iri::new(format!("_:{}", name)))
    }

    fn parse_prefixed_name(&mut self) -> Result<Iri> {
        let offset = self.pos;
        let prefix = self.take_while(is_prefix_char);
        self.expect(':')?;
        let mut local = self.take_while(is_local_char);
        // trailing dots belong to the statement terminator, not the name
        while local.ends_with('.') {
            local.pop();
            self.pos -= 1;
        }
        match self.prefixes.get(&prefix) {
            Some(namespace) => Ok(Iri::new(format!("{}{}", namespace, local))),
            None => Err(Error::parse(
                format!("undefined prefix '{}:'", prefix),
                offset,
            )),
        }
    }

    fn parse_literal(&mut self) -> Result<Term> {
        let quote = self.peek().ok_or_else(|| self.err("expected a literal"))?;
        let long_delim: String = std::iter::repeat(quote).take(3).collect();
        let long = self.rest().starts_with(&long_delim);
        if long {
            self.advance(3);
        } else {
            self.bump();
        }

        let mut value = String::new();
        loop {
            if long && self.rest().starts_with(&long_delim) {
                self.advance(3);
                break;
            }
            match self.peek() {
                Some(c) if !long && c == quote => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    value.push(self.parse_escape()?);
                }
                Some('\n') if !long => return Err(self.err("unterminated string literal")),
                Some(c) => {
                    self.bump();
                    value.push(c);
                }
                None => return Err(self.err("unterminated string literal")),
            }
        }

        // optional language tag or datatype annotation
        if self.peek() == Some('@') {
            self.bump();
            let lang = self.take_while(|c| c.is_ascii_alphanumeric() || c == '-');
            if lang.is_empty() {
                return Err(self.err("empty language tag"));
            }
            Ok(Term::Literal(Literal::with_language(value, lang)))
        } else if self.rest().starts_with("^^") {
            self.advance(2);
            let datatype = match self.peek() {
                Some('<') => self.parse_iriref()?,
                _ => self.parse_prefixed_name()?,
            };
            Ok(Term::Literal(Literal::typed(value, datatype)))
        } else {
            Ok(Term::Literal(Literal::new(value)))
        }
    }

    fn parse_escape(&mut self) -> Result<char> {
        let c = self.peek().ok_or_else(|| self.err("unterminated escape"))?;
        self.bump();
        match c {
            't' => Ok('\t'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            'b' => Ok('\u{0008}'),
            'f' => Ok('\u{000C}'),
            '"' => Ok('"'),
            '\'' => Ok('\''),
            '\\' => Ok('\\'),
            'u' => self.parse_unicode_escape(4),
            'U' => self.parse_unicode_escape(8),
            other => Err(self.err(format!("invalid escape '\\{}'", other))),
        }
    }

    fn parse_unicode_escape(&mut self, digits: usize) -> Result<char> {
        let start = self.pos;
        let hex: String = self.rest().chars().take(digits).collect();
        if hex.len() < digits || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::parse("invalid unicode escape", start));
        }
        self.advance(hex.len());
        let code = u32::from_str_radix(&hex, 16)
            .map_err(|_| Error::parse("invalid unicode escape", start))?;
        char::from_u32(code).ok_or_else(|| Error::parse("invalid unicode code point", start))
    }

    fn parse_numeric(&mut self) -> Result<Term> {
        let start = self.pos;
        if matches!(self.peek(), Some('+') | Some('-')) {
            self.bump();
        }
        let mut has_dot = false;
        let mut has_exponent = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.bump();
            } else if c == '.' && !has_dot && !has_exponent && self.next_is_digit_after(1) {
                has_dot = true;
                self.bump();
            } else if (c == 'e' || c == 'E') && !has_exponent {
                has_exponent = true;
                self.bump();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.bump();
                }
            } else {
                break;
            }
        }
        let lexical = &self.input[start..self.pos];
        if !lexical.chars().any(|c| c.is_ascii_digit()) {
            return Err(Error::parse("malformed numeric literal", start));
        }
        let datatype = if has_exponent {
            XSD_DOUBLE
        } else if has_dot {
            XSD_DECIMAL
        } else {
            XSD_INTEGER
        };
        Ok(Term::Literal(Literal::typed(lexical, Iri::new(datatype))))
    }

    // ---- lexing helpers ----

    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn advance(&mut self, bytes: usize) {
        self.pos += bytes;
    }

    fn next_is_digit_after(&self, bytes: usize) -> bool {
        self.input[self.pos + bytes..]
            .chars()
            .next()
            .map(|c| c.is_ascii_digit())
            .unwrap_or(false)
    }

    fn skip_ws(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.bump(),
                Some('#') => {
                    while let Some(c) = self.peek() {
                        self.bump();
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if pred(c) {
                self.bump();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn lookahead_is_prefixed_name(&self) -> bool {
        let mut chars = self.rest().chars();
        loop {
            match chars.next() {
                Some(c) if is_prefix_char(c) => continue,
                Some(':') => return true,
                _ => return false,
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(self.err(format!("expected '{}'", expected)))
        }
    }

    fn err(&self, reason: impl Into<String>) -> Error {
        Error::parse(reason, self.pos)
    }
}

fn is_prefix_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

fn is_local_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.' || c == '%'
}

// ---- serialization ----

/// Serialize a graph as Turtle
///
/// Never fails for a well-formed graph. Triples are grouped by subject
/// with `;` and by predicate with `,`; bound prefixes are applied where
/// the remainder forms a safe local name.
pub fn serialize(graph: &TripleGraph) -> String {
    let prefixes = graph.prefixes();
    let mut out = String::new();

    for (prefix, namespace) in prefixes {
        out.push_str(&format!("@prefix {}: <{}> .\n", prefix, namespace));
    }
    if !prefixes.is_empty() && !graph.is_empty() {
        out.push('\n');
    }

    let triples: Vec<&Triple> = graph.iter().collect();
    let mut i = 0;
    while i < triples.len() {
        let subject = triples[i].subject.clone();
        out.push_str(&render_resource(&subject, prefixes));
        let mut first_predicate = true;
        while i < triples.len() && triples[i].subject == subject {
            let predicate = triples[i].predicate.clone();
            if first_predicate {
                out.push(' ');
            } else {
                out.push_str(" ;\n    ");
            }
            first_predicate = false;
            out.push_str(&render_predicate(&predicate, prefixes));
            let mut first_object = true;
            while i < triples.len()
                && triples[i].subject == subject
                && triples[i].predicate == predicate
            {
                if first_object {
                    out.push(' ');
                } else {
                    out.push_str(", ");
                }
                first_object = false;
                out.push_str(&render_term(&triples[i].object, prefixes));
                i += 1;
            }
        }
        out.push_str(" .\n");
    }
    out
}

fn render_predicate(iri: &Iri, prefixes: &BTreeMap<String, String>) -> String {
    if iri.as_str() == RDF_TYPE {
        "a".to_string()
    } else {
        render_resource(iri, prefixes)
    }
}

fn render_resource(iri: &Iri, prefixes: &BTreeMap<String, String>) -> String {
    if iri.is_blank() {
        return iri.as_str().to_string();
    }
    // longest matching namespace wins
    let mut best: Option<(&str, &str)> = None;
    for (prefix, namespace) in prefixes {
        if let Some(local) = iri.as_str().strip_prefix(namespace.as_str()) {
            if is_safe_local_name(local)
                && best.map(|(_, ns)| namespace.len() > ns.len()).unwrap_or(true)
            {
                best = Some((prefix.as_str(), namespace.as_str()));
            }
        }
    }
    match best {
        Some((prefix, namespace)) => {
            format!("{}:{}", prefix, &iri.as_str()[namespace.len()..])
        }
        None => format!("<{}>", iri.as_str()),
    }
}

fn is_safe_local_name(local: &str) -> bool {
    !local.is_empty()
        && !local.ends_with('.')
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

fn render_term(term: &Term, prefixes: &BTreeMap<String, String>) -> String {
    match term {
        Term::Iri(iri) => render_resource(iri, prefixes),
        Term::Literal(lit) => render_literal(lit, prefixes),
    }
}

fn render_literal(lit: &Literal, prefixes: &BTreeMap<String, String>) -> String {
    if let Some(datatype) = &lit.datatype {
        match datatype.as_str() {
            XSD_INTEGER if is_bare_integer(&lit.value) => return lit.value.clone(),
            XSD_DECIMAL if is_bare_decimal(&lit.value) => return lit.value.clone(),
            XSD_BOOLEAN if lit.value == "true" || lit.value == "false" => {
                return lit.value.clone();
            }
            _ => {}
        }
    }
    let mut out = String::with_capacity(lit.value.len() + 2);
    out.push('"');
    for c in lit.value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    if let Some(lang) = &lit.language {
        out.push('@');
        out.push_str(lang);
    } else if let Some(datatype) = &lit.datatype {
        out.push_str("^^");
        out.push_str(&render_resource(datatype, prefixes));
    }
    out
}

fn is_bare_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_bare_decimal(s: &str) -> bool {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    match body.split_once('.') {
        Some((whole, frac)) => {
            !frac.is_empty()
                && whole.chars().all(|c| c.is_ascii_digit())
                && frac.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_document() {
        let graph = parse("").unwrap();
        assert!(graph.is_empty());

        let graph = parse("# just a comment\n").unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_parse_basic_statement() {
        let graph = parse(
            "@prefix : <http://example.org/> .\n\
             :Ada :bornIn :London .\n",
        )
        .unwrap();

        assert_eq!(graph.len(), 1);
        let triple = graph.iter().next().unwrap();
        assert_eq!(triple.subject.as_str(), "http://example.org/Ada");
        assert_eq!(triple.predicate.as_str(), "http://example.org/bornIn");
    }

    #[test]
    fn test_parse_type_keyword() {
        let graph = parse(
            "@prefix : <http://example.org/> .\n\
             @prefix foaf: <http://xmlns.com/foaf/0.1/> .\n\
             :Ada a foaf:Person .\n",
        )
        .unwrap();

        let triple = graph.iter().next().unwrap();
        assert_eq!(triple.predicate.as_str(), RDF_TYPE);
    }

    #[test]
    fn test_parse_predicate_and_object_lists() {
        let graph = parse(
            "@prefix : <http://example.org/> .\n\
             :Google :foundedBy :LarryPage, :SergeyBrin ;\n\
                 :headquarteredIn :California .\n",
        )
        .unwrap();

        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_parse_literals() {
        let graph = parse(
            "@prefix : <http://example.org/> .\n\
             @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n\
             :Ada :name \"Ada Lovelace\" ;\n\
                 :born \"1815\"^^xsd:integer ;\n\
                 :motto \"she said \\\"notes\\\"\"@en .\n",
        )
        .unwrap();

        assert_eq!(graph.len(), 3);
        let values: Vec<String> = graph
            .iter()
            .filter_map(|t| match &t.object {
                Term::Literal(l) => Some(l.value.clone()),
                _ => None,
            })
            .collect();
        assert!(values.contains(&"she said \"notes\"".to_string()));
    }

    #[test]
    fn test_parse_bare_numerals_and_booleans() {
        let graph = parse(
            "@prefix : <http://example.org/> .\n\
             :Google :founded 1998 ;\n\
                 :share 0.42 ;\n\
                 :public true .\n",
        )
        .unwrap();

        let datatypes: Vec<&str> = graph
            .iter()
            .filter_map(|t| match &t.object {
                Term::Literal(l) => l.datatype.as_ref().map(|d| d.as_str()),
                _ => None,
            })
            .collect();
        assert!(datatypes.contains(&XSD_INTEGER));
        assert!(datatypes.contains(&XSD_DECIMAL));
        assert!(datatypes.contains(&XSD_BOOLEAN));
    }

    #[test]
    fn test_parse_long_string() {
        let graph = parse(
            "@prefix : <http://example.org/> .\n\
             :Ada :note \"\"\"first line\nsecond line\"\"\" .\n",
        )
        .unwrap();

        let triple = graph.iter().next().unwrap();
        match &triple.object {
            Term::Literal(l) => assert_eq!(l.value, "first line\nsecond line"),
            _ => panic!("expected literal"),
        }
    }

    #[test]
    fn test_parse_blank_nodes() {
        let graph = parse(
            "@prefix : <http://example.org/> .\n\
             _:b0 :partOf :Google .\n",
        )
        .unwrap();

        let triple = graph.iter().next().unwrap();
        assert!(triple.subject.is_blank());
    }

    #[test]
    fn test_undefined_prefix_reports_offset() {
        let text = "@prefix : <http://example.org/> .\n:Ada foaf:knows :Babbage .\n";
        let err = parse(text).unwrap_err();
        match err {
            Error::Parse { reason, offset } => {
                assert!(reason.contains("foaf"));
                assert_eq!(offset, text.find("foaf").unwrap());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unterminated_string_fails() {
        let err = parse(
            "@prefix : <http://example.org/> .\n\
             :Ada :name \"Ada .\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_missing_terminator_fails() {
        let err = parse(
            "@prefix : <http://example.org/> .\n\
             :Ada :bornIn :London\n:Babbage :bornIn :London .",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_base_directive_unsupported() {
        let err = parse("@base <http://example.org/> .\n").unwrap_err();
        match err {
            Error::Parse { reason, .. } => assert!(reason.contains("@base")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_serialize_groups_subjects() {
        let mut graph = TripleGraph::new();
        graph.bind_prefix("", "http://example.org/");
        graph.insert(Triple::new(
            Iri::new("http://example.org/Ada"),
            Iri::new("http://example.org/bornIn"),
            Iri::new("http://example.org/London"),
        ));
        graph.insert(Triple::new(
            Iri::new("http://example.org/Ada"),
            Iri::new("http://example.org/name"),
            Literal::new("Ada Lovelace"),
        ));

        let turtle = serialize(&graph);
        assert!(turtle.contains("@prefix : <http://example.org/> ."));
        assert!(turtle.contains(";"));
        // one statement block for the single subject
        assert_eq!(turtle.matches(" .\n").count(), 1 + 1); // prefix line + statement
    }

    #[test]
    fn test_serialize_uses_a_for_rdf_type() {
        let mut graph = TripleGraph::new();
        graph.bind_prefix("", "http://example.org/");
        graph.insert(Triple::new(
            Iri::new("http://example.org/Ada"),
            Iri::new(RDF_TYPE),
            Iri::new("http://example.org/Person"),
        ));

        let turtle = serialize(&graph);
        assert!(turtle.contains(":Ada a :Person ."));
    }

    #[test]
    fn test_round_trip_preserves_triples() {
        let mut graph = TripleGraph::new();
        graph.bind_prefix("", "http://example.org/");
        graph.bind_prefix("xsd", "http://www.w3.org/2001/XMLSchema#");
        graph.insert(Triple::new(
            Iri::new("http://example.org/Ada"),
            Iri::new(RDF_TYPE),
            Iri::new("http://example.org/Person"),
        ));
        graph.insert(Triple::new(
            Iri::new("http://example.org/Ada"),
            Iri::new("http://example.org/note"),
            Literal::new("line one\nline two\t\"quoted\" \\slash"),
        ));
        graph.insert(Triple::new(
            Iri::new("http://example.org/Ada"),
            Iri::new("http://example.org/born"),
            Literal::typed("1815", Iri::new(XSD_INTEGER)),
        ));
        graph.insert(Triple::new(
            Iri::new("http://example.org/Ada"),
            Iri::new("http://example.org/motto"),
            Literal::with_language("poetical science", "en"),
        ));
        graph.insert(Triple::new(
            Iri::new("_:b0"),
            Iri::new("http://example.org/mentions"),
            Iri::new("http://example.org/Ada"),
        ));

        let reparsed = parse(&serialize(&graph)).unwrap();
        assert_eq!(reparsed, graph);
    }

    #[test]
    fn test_round_trip_without_prefixes() {
        let graph = TripleGraph::from_triples([Triple::new(
            Iri::new("http://example.org/Ada"),
            Iri::new("http://example.org/bornIn"),
            Iri::new("http://example.org/London"),
        )]);

        let turtle = serialize(&graph);
        assert!(turtle.contains("<http://example.org/Ada>"));
        assert_eq!(parse(&turtle).unwrap(), graph);
    }

    #[test]
    fn test_local_names_with_dots_are_not_shortened() {
        // "v1.2" ends in no dot but contains one; shortening must not
        // produce a name the parser would split at the terminator
        let graph = TripleGraph::from_triples([Triple::new(
            Iri::new("http://example.org/v1."),
            Iri::new("http://example.org/rel"),
            Iri::new("http://example.org/x"),
        )]);
        let mut graph = graph;
        graph.bind_prefix("", "http://example.org/");

        let reparsed = parse(&serialize(&graph)).unwrap();
        assert_eq!(reparsed, graph);
    }

    #[test]
    fn test_round_trip_unicode_escape() {
        let graph = parse(
            "@prefix : <http://example.org/> .\n\
             :Ada :symbol \"\\u2192 arrow\" .\n",
        )
        .unwrap();
        let triple = graph.iter().next().unwrap();
        match &triple.object {
            Term::Literal(l) => assert_eq!(l.value, "→ arrow"),
            _ => panic!("expected literal"),
        }
        assert_eq!(parse(&serialize(&graph)).unwrap(), graph);
    }
}
