//! Parser for discovery documents.
//!
//! A discovery endpoint answers with an HTML fragment whose `<head>` holds
//! `<meta name="docker-*" content="...">` tags. Only that subset is
//! understood: `head`, `meta`, comments and interleaved text. Any other
//! element is rejected.

use signpost_core::{Action, Entries, Entry, Scope};
use tracing::debug;

use crate::error::{DiscoveryError, Result};

/// Recognized meta tag names. Adding a tag here forces every match below
/// to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaTag {
    Scope,
    Registry,
    RegistryPull,
    RegistryPush,
    Index,
    Namespace,
}

impl MetaTag {
    fn parse(name: &str) -> Result<Self> {
        match name.trim() {
            "docker-scope" => Ok(Self::Scope),
            "docker-registry" => Ok(Self::Registry),
            "docker-registry-pull" => Ok(Self::RegistryPull),
            "docker-registry-push" => Ok(Self::RegistryPush),
            "docker-index" => Ok(Self::Index),
            "docker-namespace" => Ok(Self::Namespace),
            other => Err(DiscoveryError::UnsupportedMetaName {
                name: other.to_string(),
            }),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Scope => "docker-scope",
            Self::Registry => "docker-registry",
            Self::RegistryPull => "docker-registry-pull",
            Self::RegistryPush => "docker-registry-push",
            Self::Index => "docker-index",
            Self::Namespace => "docker-namespace",
        }
    }

    /// Actions synthesized from one tag; `docker-registry` fans out to both
    /// `pull` and `push`.
    const fn actions(self) -> &'static [Action] {
        match self {
            Self::Scope => &[],
            Self::Registry => &[Action::Pull, Action::Push],
            Self::RegistryPull => &[Action::Pull],
            Self::RegistryPush => &[Action::Push],
            Self::Index => &[Action::Index],
            Self::Namespace => &[Action::Namespace],
        }
    }
}

#[derive(Debug)]
enum Token {
    Start {
        name: String,
        attrs: Vec<(String, String)>,
    },
    End {
        name: String,
    },
    Eof,
}

/// Tokenizer for the `<head>`/`<meta>` subset.
///
/// Element and attribute names are lowercased; attribute values stay
/// verbatim. Comments, `<!...>`/`<?...>` directives and text between tags
/// are skipped.
struct Tokenizer<'a> {
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn malformed(reason: &str) -> DiscoveryError {
        DiscoveryError::MalformedDocument {
            reason: reason.to_string(),
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        loop {
            let Some(lt) = self.rest.find('<') else {
                self.rest = "";
                return Ok(Token::Eof);
            };
            self.rest = &self.rest[lt..];
            if let Some(after) = self.rest.strip_prefix("<!--") {
                self.rest = after.find("-->").map_or("", |end| &after[end + 3..]);
                continue;
            }
            if self.rest.starts_with("<!") || self.rest.starts_with("<?") {
                self.rest = self.rest.find('>').map_or("", |end| &self.rest[end + 1..]);
                continue;
            }
            if let Some(after) = self.rest.strip_prefix("</") {
                let end = after
                    .find('>')
                    .ok_or_else(|| Self::malformed("unterminated close tag"))?;
                let name = after[..end].trim().to_ascii_lowercase();
                self.rest = &after[end + 1..];
                return Ok(Token::End { name });
            }
            return self.start_tag();
        }
    }

    fn start_tag(&mut self) -> Result<Token> {
        let after = &self.rest[1..];
        let name_len = after
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .unwrap_or(after.len());
        let name = after[..name_len].to_ascii_lowercase();
        if name.is_empty() {
            return Err(Self::malformed("empty tag name"));
        }
        self.rest = &after[name_len..];
        let attrs = self.attributes()?;
        Ok(Token::Start { name, attrs })
    }

    fn attributes(&mut self) -> Result<Vec<(String, String)>> {
        let mut attrs = Vec::new();
        loop {
            self.rest = self.rest.trim_start();
            match self.rest.chars().next() {
                None => return Err(Self::malformed("unterminated tag")),
                Some('>') => {
                    self.rest = &self.rest[1..];
                    return Ok(attrs);
                }
                Some('/') => {
                    // self-closing slash; the '>' is handled next round
                    self.rest = &self.rest[1..];
                }
                Some(_) => {
                    let key_len = self
                        .rest
                        .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
                        .unwrap_or(self.rest.len());
                    let key = self.rest[..key_len].to_ascii_lowercase();
                    self.rest = self.rest[key_len..].trim_start();
                    let value = if let Some(after_eq) = self.rest.strip_prefix('=') {
                        self.rest = after_eq.trim_start();
                        self.attribute_value()?
                    } else {
                        String::new()
                    };
                    attrs.push((key, value));
                }
            }
        }
    }

    fn attribute_value(&mut self) -> Result<String> {
        match self.rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &self.rest[1..];
                let end = inner
                    .find(quote)
                    .ok_or_else(|| Self::malformed("unterminated attribute value"))?;
                let value = inner[..end].to_string();
                self.rest = &inner[end + 1..];
                Ok(value)
            }
            _ => {
                let end = self
                    .rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(self.rest.len());
                let value = self.rest[..end].to_string();
                self.rest = &self.rest[end..];
                Ok(value)
            }
        }
    }
}

/// Parses a discovery document, binding every entry to the document scope.
///
/// `name` is the requested name; it becomes the document scope when no
/// `docker-scope` tag is present.
///
/// # Errors
///
/// Returns the parser errors of [`DiscoveryError`]: unexpected elements or
/// attributes, unsupported or malformed meta tags, duplicate scopes,
/// invalid scope strings, and [`DiscoveryError::NoEntries`] for documents
/// carrying no routing entries at all.
pub fn parse_discovery_document(body: &str, name: &str) -> Result<Entries> {
    let mut tokenizer = Tokenizer::new(body);
    let mut doc_scope: Option<Scope> = None;
    let mut parsed: Vec<(Action, Vec<String>)> = Vec::new();
    let mut saw_tag = false;
    loop {
        match tokenizer.next_token()? {
            Token::Eof => break,
            Token::Start { name: tag, attrs } => {
                match tag.as_str() {
                    "head" => {
                        if saw_tag {
                            return Err(DiscoveryError::UnexpectedElement { element: tag });
                        }
                    }
                    "meta" => parse_meta_tag(&attrs, &mut doc_scope, &mut parsed)?,
                    _ => return Err(DiscoveryError::UnexpectedElement { element: tag }),
                }
                saw_tag = true;
            }
            Token::End { name: tag } => match tag.as_str() {
                "head" => break,
                "meta" => {}
                _ => return Err(DiscoveryError::UnexpectedElement { element: tag }),
            },
        }
    }
    if !saw_tag || parsed.is_empty() {
        return Err(DiscoveryError::NoEntries);
    }
    let scope = match doc_scope {
        Some(scope) => scope,
        None => Scope::parse(name)?,
    };
    let mut entries = Entries::new();
    for (action, args) in parsed {
        entries.add(Entry::new(scope.clone(), action, args))?;
    }
    debug!(name, scope = %scope, count = entries.len(), "parsed discovery document");
    Ok(entries)
}

fn parse_meta_tag(
    attrs: &[(String, String)],
    doc_scope: &mut Option<Scope>,
    parsed: &mut Vec<(Action, Vec<String>)>,
) -> Result<()> {
    if attrs.is_empty() {
        return Err(DiscoveryError::MalformedMetaTag {
            reason: "no attributes".to_string(),
        });
    }
    let mut tag: Option<MetaTag> = None;
    let mut content: Option<&str> = None;
    for (key, value) in attrs {
        match key.as_str() {
            "name" => {
                if tag.is_some() {
                    return Err(DiscoveryError::MalformedMetaTag {
                        reason: "more than one name attribute".to_string(),
                    });
                }
                tag = Some(MetaTag::parse(value)?);
            }
            "content" => {
                if content.is_some() {
                    return Err(DiscoveryError::MalformedMetaTag {
                        reason: "more than one content attribute".to_string(),
                    });
                }
                content = Some(value.as_str());
            }
            other => {
                return Err(DiscoveryError::UnknownAttribute {
                    attribute: other.to_string(),
                })
            }
        }
    }
    let Some(tag) = tag else {
        return Err(DiscoveryError::MalformedMetaTag {
            reason: "missing name attribute".to_string(),
        });
    };
    let args: Vec<String> = content
        .map(|c| c.split_whitespace().map(String::from).collect())
        .unwrap_or_default();
    match tag {
        MetaTag::Scope => {
            if content.is_none() {
                return Err(DiscoveryError::MissingContent {
                    tag: tag.as_str().to_string(),
                });
            }
            if args.len() != 1 {
                return Err(DiscoveryError::MalformedMetaTag {
                    reason: "docker-scope expects a single value".to_string(),
                });
            }
            let scope = Scope::parse(&args[0])?;
            match doc_scope {
                Some(first) => {
                    return Err(DiscoveryError::MultipleScopes {
                        first: first.clone(),
                        second: scope,
                    })
                }
                None => *doc_scope = Some(scope),
            }
        }
        MetaTag::Namespace => {
            // the content attribute must be present, though it may be empty
            if content.is_none() {
                return Err(DiscoveryError::MissingContent {
                    tag: tag.as_str().to_string(),
                });
            }
            parsed.push((Action::Namespace, args));
        }
        MetaTag::Registry | MetaTag::RegistryPull | MetaTag::RegistryPush | MetaTag::Index => {
            if content.is_none() || args.is_empty() {
                return Err(DiscoveryError::MissingContent {
                    tag: tag.as_str().to_string(),
                });
            }
            for &action in tag.actions() {
                parsed.push((action, args.clone()));
            }
        }
    }
    Ok(())
}
