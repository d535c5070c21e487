use crate::error::RouterError;
use crate::params::Params;

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use smallvec::SmallVec;

const STAR: char = '*';
const SLASH: char = '/';

const WILDCARD: &str = "(?:/.*)?";
const BARE_WILDCARD: &str = "(?:.*)?";
const CAPTURE: &str = "/([^/]+)";
const OPTIONAL_CAPTURE: &str = "(?:/([^/]+))?";
const TAIL: &str = "/*$";

/// A compiled path template.
///
/// Templates are made of literal text, `/:name` captures, `/:name?`
/// optional captures and `*` wildcards. A pattern always matches the
/// whole path, trailing slashes aside.
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: Box<str>,
    regex: Regex,
    keys: SmallVec<[Box<str>; 4]>,
    wildcard: bool,
}

impl PathPattern {
    pub fn compile(template: &str) -> Result<Self, RouterError> {
        let mut source = String::with_capacity(template.len() + 16);
        source.push('^');

        let mut keys: SmallVec<[Box<str>; 4]> = SmallVec::new();
        let mut wildcard = false;
        let mut literal = String::new();

        let mut rest = template;
        while let Some(ch) = rest.chars().next() {
            if ch == STAR || rest.starts_with("/*") {
                flush_literal(&mut source, &mut literal);
                if ch == SLASH {
                    source.push_str(WILDCARD);
                    rest = &rest[2..];
                } else {
                    source.push_str(BARE_WILDCARD);
                    rest = &rest[1..];
                }
                wildcard = rest.is_empty();
                continue;
            }

            if let Some(after) = rest.strip_prefix("/:") {
                let len = capture_name_len(after);
                if len > 0 {
                    let name = &after[..len];
                    if keys.iter().any(|k| &**k == name) {
                        return Err(RouterError::DuplicateParam(name.to_owned()));
                    }
                    let optional = after[len..].starts_with('?');

                    flush_literal(&mut source, &mut literal);
                    source.push_str(if optional { OPTIONAL_CAPTURE } else { CAPTURE });
                    keys.push(name.into());

                    rest = &after[len + usize::from(optional)..];
                    continue;
                }
            }

            literal.push(ch);
            rest = &rest[ch.len_utf8()..];
        }

        flush_literal(&mut source, &mut literal);
        source.push_str(TAIL);

        let regex = Regex::new(&source)?;

        Ok(Self {
            template: template.into(),
            regex,
            keys,
            wildcard,
        })
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;
        let mut params = Params::new();
        for (i, name) in self.keys.iter().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                params.push(name, m.as_str());
            }
        }
        Some(params)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(|k| &**k)
    }

    /// Whether the template ends in a wildcard.
    pub fn has_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn as_regex_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl FromStr for PathPattern {
    type Err = RouterError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

#[inline]
fn capture_name_len(s: &str) -> usize {
    s.bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count()
}

#[inline]
fn flush_literal(source: &mut String, literal: &mut String) {
    if !literal.is_empty() {
        source.push_str(&regex::escape(literal));
        literal.clear();
    }
}

#[cfg(test)]
fn collect(pattern: &PathPattern, path: &str) -> Option<Vec<(String, String)>> {
    let params = pattern.captures(path)?;
    Some(
        params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect(),
    )
}

#[test]
fn static_template() {
    let p = PathPattern::compile("/todos").unwrap();
    assert!(p.is_match("/todos"));
    assert!(p.is_match("/todos/"));
    assert!(!p.is_match("/todo"));
    assert!(!p.is_match("/todosx"));
    assert!(!p.is_match("/todos/13"));
    assert!(!p.is_match("/api/todos"));
    assert_eq!(p.keys().count(), 0);
    assert!(!p.has_wildcard());
}

#[test]
fn literal_metacharacters() {
    let p = PathPattern::compile("/files/a.txt").unwrap();
    assert!(p.is_match("/files/a.txt"));
    assert!(!p.is_match("/files/aXtxt"));

    let p = PathPattern::compile("/a+b/(c)").unwrap();
    assert!(p.is_match("/a+b/(c)"));
    assert!(!p.is_match("/aab/c"));
}

#[test]
fn named_captures() {
    let p = PathPattern::compile("/u/:uid/p/:pid").unwrap();
    assert_eq!(p.keys().collect::<Vec<_>>(), ["uid", "pid"]);

    let caps = collect(&p, "/u/asd/p/123").unwrap();
    assert_eq!(
        caps,
        [
            ("uid".to_owned(), "asd".to_owned()),
            ("pid".to_owned(), "123".to_owned())
        ]
    );

    assert!(p.captures("/u/asd/p").is_none());
    assert!(p.captures("/u//p/123").is_none());
    assert!(p.captures("/u/asd/p/123/more").is_none());
}

#[test]
fn optional_capture() {
    let p = PathPattern::compile("/todos/:id?").unwrap();

    let caps = p.captures("/todos").unwrap();
    assert!(caps.is_empty());
    assert_eq!(caps.get("id"), None);

    let caps = p.captures("/todos/13").unwrap();
    assert_eq!(caps.get("id"), Some("13"));

    assert!(p.captures("/todos/13/14").is_none());
    assert!(p.captures("/todo").is_none());
}

#[test]
fn wildcard() {
    let p = PathPattern::compile("/foo/*").unwrap();
    assert!(p.has_wildcard());
    assert!(p.is_match("/foo"));
    assert!(p.is_match("/foo/"));
    assert!(p.is_match("/foo/bar/baz"));
    assert!(!p.is_match("/foobar"));
    assert!(!p.is_match("/bar"));

    let p = PathPattern::compile("*").unwrap();
    assert!(p.has_wildcard());
    assert!(p.is_match("/"));
    assert!(p.is_match("/anything/at/all"));

    let p = PathPattern::compile("/a/*/c").unwrap();
    assert!(!p.has_wildcard());
    assert!(p.is_match("/a/b/c"));
    assert!(p.is_match("/a/x/y/c"));
    assert!(p.is_match("/a/c"));
}

#[test]
fn capture_then_wildcard() {
    let p = PathPattern::compile("/user/:uid/*").unwrap();
    let caps = p.captures("/user/asd/file/home/.bashrc").unwrap();
    assert_eq!(caps.get("uid"), Some("asd"));
    assert_eq!(caps.len(), 1);
    assert_eq!(p.captures("/user/asd").unwrap().get("uid"), Some("asd"));
}

#[test]
fn colon_without_name_is_literal() {
    let p = PathPattern::compile("/a/:/b").unwrap();
    assert!(p.is_match("/a/:/b"));
    assert_eq!(p.keys().count(), 0);

    let p = PathPattern::compile("/time:now").unwrap();
    assert!(p.is_match("/time:now"));
    assert!(!p.is_match("/time/now"));
}

#[test]
fn duplicate_capture_name() {
    let err = PathPattern::compile("/u/:id/p/:id").unwrap_err();
    assert!(matches!(err, RouterError::DuplicateParam(ref name) if name == "id"));
}

#[test]
fn compile_is_deterministic() {
    let a: PathPattern = "/todos/:id?/tags/*".parse().unwrap();
    let b: PathPattern = "/todos/:id?/tags/*".parse().unwrap();
    assert_eq!(a.as_regex_str(), b.as_regex_str());
    for path in &["/todos", "/todos/1/tags", "/todos/1/tags/x/y", "/nope"] {
        assert_eq!(collect(&a, path), collect(&b, path));
    }
    assert_eq!(a.to_string(), "/todos/:id?/tags/*");
}
