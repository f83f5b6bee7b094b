//! Model path expressions such as `user.name` or `obj['abc'].items[0]`.

use std::fmt;

use crate::error::BindError;
use crate::value::Value;

/// How many elements an assignment may append to a list in one step.
pub const MAX_LIST_GROWTH: usize = 1024;

/// One step of a [`ModelPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member, from `.name` or `['name']`.
    Key(String),
    /// List element, from `[0]`.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// A parsed, assignable location inside a model root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPath {
    source: String,
    segments: Vec<Segment>,
}

impl ModelPath {
    /// Parse a path expression.
    ///
    /// Accepts an identifier followed by any number of `.identifier`,
    /// `['key']`, `["key"]` or `[index]` accessors.
    pub fn parse(source: &str) -> Result<Self, BindError> {
        let segments = PathParser::new(source).parse()?;
        Ok(Self {
            source: source.trim().to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Look the path up in `root`; `None` when any step is missing.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |current, segment| match (segment, current) {
                (Segment::Key(key), Value::Map(map)) => map.get(key),
                (Segment::Index(index), Value::List(items)) => items.get(*index),
                _ => None,
            })
    }

    /// Store `value` at the path, creating missing intermediate containers.
    pub fn assign(&self, root: &mut Value, value: Value) -> Result<(), BindError> {
        let Some((last, parents)) = self.segments.split_last() else {
            return Err(self.syntax_error(1, "Empty expression"));
        };

        let mut current = root;
        for segment in parents {
            current = self.child_mut(current, segment)?;
        }
        *self.child_mut(current, last)? = value;
        Ok(())
    }

    fn child_mut<'a>(
        &self,
        parent: &'a mut Value,
        segment: &Segment,
    ) -> Result<&'a mut Value, BindError> {
        if parent.is_null() {
            *parent = match segment {
                Segment::Key(_) => Value::empty_map(),
                Segment::Index(_) => Value::List(Vec::new()),
            };
        }

        match (segment, parent) {
            (Segment::Key(key), Value::Map(map)) => {
                Ok(map.entry(key.clone()).or_insert(Value::Null))
            }
            (Segment::Index(index), Value::List(items)) => {
                let index = *index;
                if index >= items.len() {
                    let len = items.len();
                    let new_len = index
                        .checked_add(1)
                        .filter(|new_len| new_len - len <= MAX_LIST_GROWTH)
                        .ok_or_else(|| BindError::IndexOutOfRange {
                            path: self.source.clone(),
                            index,
                            len,
                        })?;
                    items.resize(new_len, Value::Null);
                }
                Ok(&mut items[index])
            }
            (segment, other) => Err(BindError::NotAssignable {
                path: self.source.clone(),
                segment: segment.to_string(),
                found: other.type_name(),
            }),
        }
    }

    fn syntax_error(&self, column: usize, message: &str) -> BindError {
        BindError::Syntax {
            path: self.source.clone(),
            column,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct PathParser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> PathParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<Vec<Segment>, BindError> {
        let mut segments = Vec::new();

        self.skip_whitespace();
        segments.push(Segment::Key(self.identifier()?));

        loop {
            self.skip_whitespace();
            let Some(c) = self.peek() else {
                return Ok(segments);
            };
            match c {
                '.' => {
                    self.pos += 1;
                    segments.push(Segment::Key(self.identifier()?));
                }
                '[' => {
                    self.pos += 1;
                    self.skip_whitespace();
                    segments.push(self.bracket()?);
                    self.skip_whitespace();
                    self.expect(']')?;
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn identifier(&mut self) -> Result<String, BindError> {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
            Some(_) => return Err(self.unexpected()),
            None => return Err(self.error("Unexpected end of expression")),
        }
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '$')
        {
            self.pos += 1;
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn bracket(&mut self) -> Result<Segment, BindError> {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                let start = self.pos;
                self.pos += 1;
                let mut key = String::new();
                loop {
                    match self.peek() {
                        Some(c) if c == quote => {
                            self.pos += 1;
                            return Ok(Segment::Key(key));
                        }
                        Some('\\') => {
                            self.pos += 1;
                            if let Some(escaped) = self.peek() {
                                key.push(escaped);
                                self.pos += 1;
                            }
                        }
                        Some(c) => {
                            key.push(c);
                            self.pos += 1;
                        }
                        None => {
                            self.pos = start;
                            return Err(self.error("Unterminated quote"));
                        }
                    }
                }
            }
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.pos += 1;
                }
                let digits: String = self.chars[start..self.pos].iter().collect();
                digits.parse().map(Segment::Index).map_err(|_| {
                    self.pos = start;
                    self.error("Index out of range")
                })
            }
            Some(_) => Err(self.unexpected()),
            None => Err(self.error("Unexpected end of expression")),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), BindError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.unexpected()),
            None => Err(self.error(&format!("Expected '{}'", expected))),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    /// Error naming the token at the current position.
    fn unexpected(&self) -> BindError {
        let token = self.token_at_cursor();
        self.error(&format!("Token '{}' is an unexpected token", token))
    }

    fn token_at_cursor(&self) -> String {
        let rest = &self.chars[self.pos..];
        match rest.first() {
            Some(&quote) if quote == '\'' || quote == '"' => {
                let end = rest[1..]
                    .iter()
                    .position(|&c| c == quote)
                    .map_or(rest.len(), |i| i + 2);
                rest[..end].iter().collect()
            }
            Some(c) if c.is_ascii_alphanumeric() => rest
                .iter()
                .take_while(|c| c.is_ascii_alphanumeric() || **c == '_')
                .collect(),
            Some(c) => c.to_string(),
            None => String::new(),
        }
    }

    fn error(&self, message: &str) -> BindError {
        BindError::Syntax {
            path: self.source.to_string(),
            column: self.pos + 1,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted() {
        let path = ModelPath::parse("user.name").expect("parse");
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("user".to_string()),
                Segment::Key("name".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_brackets() {
        let path = ModelPath::parse("obj['abc'].items[2]").expect("parse");
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("obj".to_string()),
                Segment::Key("abc".to_string()),
                Segment::Key("items".to_string()),
                Segment::Index(2),
            ]
        );
    }

    #[test]
    fn test_syntax_error_reports_token_and_column() {
        let err = ModelPath::parse("throw ''").expect_err("should fail");
        assert_eq!(
            err,
            BindError::Syntax {
                path: "throw ''".to_string(),
                column: 7,
                message: "Token '''' is an unexpected token".to_string(),
            }
        );
    }

    #[test]
    fn test_assign_grows_list() {
        let path = ModelPath::parse("items[2]").expect("parse");
        let mut root = Value::empty_map();
        path.assign(&mut root, Value::from("c")).expect("assign");
        assert_eq!(path.resolve(&root), Some(&Value::from("c")));
        assert_eq!(
            ModelPath::parse("items[0]").expect("parse").resolve(&root),
            Some(&Value::Null)
        );
    }

    #[test]
    fn test_assign_rejects_huge_index() {
        let path = ModelPath::parse("a[18446744073709551615]").expect("parse");
        let mut root = Value::empty_map();
        assert_eq!(
            path.assign(&mut root, Value::from(1)),
            Err(BindError::IndexOutOfRange {
                path: "a[18446744073709551615]".to_string(),
                index: usize::MAX,
                len: 0,
            })
        );

        let far = ModelPath::parse("a[1000000000000]").expect("parse");
        assert!(matches!(
            far.assign(&mut root, Value::from(1)),
            Err(BindError::IndexOutOfRange { len: 0, .. })
        ));
    }

    #[test]
    fn test_syntax_error_on_empty() {
        assert!(matches!(
            ModelPath::parse(""),
            Err(BindError::Syntax { column: 1, .. })
        ));
    }

    #[test]
    fn test_assign_creates_intermediate_maps() {
        let mut root = Value::empty_map();
        let path = ModelPath::parse("obj['abc'].name").expect("parse");
        path.assign(&mut root, Value::from("Misko")).expect("assign");
        assert_eq!(path.resolve(&root), Some(&Value::from("Misko")));
    }

    #[test]
    fn test_assign_into_scalar_fails() {
        let mut root = Value::empty_map();
        ModelPath::parse("name")
            .expect("parse")
            .assign(&mut root, Value::from("x"))
            .expect("assign");

        let err = ModelPath::parse("name.first")
            .expect("parse")
            .assign(&mut root, Value::from("y"))
            .expect_err("should fail");
        assert!(matches!(err, BindError::NotAssignable { found: "string", .. }));
    }

    #[test]
    fn test_resolve_missing_is_none() {
        let root = Value::empty_map();
        let path = ModelPath::parse("a.b.c").expect("parse");
        assert_eq!(path.resolve(&root), None);
    }
}
