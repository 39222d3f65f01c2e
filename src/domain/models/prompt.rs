//! Prompt templates with named `{placeholder}` fields.
//!
//! `{{` and `}}` render as literal braces, so templates can embed JSON
//! examples for the model to imitate.

use std::fmt::Write as _;
use thiserror::Error;

/// A named field a template may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Configured number of calls per subcategory.
    Calls,
    /// 1-based index of the current call.
    Call,
    Category,
    SubCategory,
    Questions,
    Ranks,
    /// Joined adjective list.
    Prompt,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "calls" => Some(Self::Calls),
            "call" => Some(Self::Call),
            "category" => Some(Self::Category),
            "sub_category" => Some(Self::SubCategory),
            "questions" => Some(Self::Questions),
            "ranks" => Some(Self::Ranks),
            "prompt" => Some(Self::Prompt),
            _ => None,
        }
    }
}

/// Values substituted into a template.
#[derive(Debug, Clone)]
pub struct PromptParams<'a> {
    pub calls: u32,
    pub call: u32,
    pub category: &'a str,
    pub sub_category: &'a str,
    pub questions: u32,
    pub ranks: u32,
    pub prompt: &'a str,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown placeholder {{{0}}}")]
    UnknownPlaceholder(String),

    #[error("unclosed '{{' at byte {0}")]
    Unclosed(usize),

    #[error("single '}}' at byte {0}, use '}}}}' for a literal brace")]
    StrayClose(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Placeholder),
}

/// A parsed, validated prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse template text, rejecting unknown placeholders and unbalanced braces.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::Unclosed(pos));
                    }
                    let field = Placeholder::from_name(name.trim())
                        .ok_or(TemplateError::UnknownPlaceholder(name))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(TemplateError::StrayClose(pos)),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// Render the template with the given parameters.
    pub fn render(&self, params: &PromptParams<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            // Writing into a String cannot fail.
            let _ = match segment {
                Segment::Literal(text) => out.write_str(text),
                Segment::Field(Placeholder::Calls) => write!(out, "{}", params.calls),
                Segment::Field(Placeholder::Call) => write!(out, "{}", params.call),
                Segment::Field(Placeholder::Category) => out.write_str(params.category),
                Segment::Field(Placeholder::SubCategory) => out.write_str(params.sub_category),
                Segment::Field(Placeholder::Questions) => write!(out, "{}", params.questions),
                Segment::Field(Placeholder::Ranks) => write!(out, "{}", params.ranks),
                Segment::Field(Placeholder::Prompt) => out.write_str(params.prompt),
            };
        }
        out
    }

    /// Placeholders referenced by this template, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(p) => Some(*p),
            Segment::Literal(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PromptParams<'static> {
        PromptParams {
            calls: 3,
            call: 2,
            category: "Science",
            sub_category: "Physics",
            questions: 10,
            ranks: 6,
            prompt: "tricky, fun",
        }
    }

    #[test]
    fn test_render_all_placeholders() {
        let template = PromptTemplate::parse(
            "{questions} {prompt} questions about {category}/{sub_category}, {ranks} ranks, call {call} of {calls}",
        )
        .unwrap();

        assert_eq!(
            template.render(&params()),
            "10 tricky, fun questions about Science/Physics, 6 ranks, call 2 of 3"
        );
    }

    #[test]
    fn test_doubled_braces_are_literal() {
        let template =
            PromptTemplate::parse(r#"Answer as {{"question": {{"en": "..."}}}} about {category}"#)
                .unwrap();

        assert_eq!(
            template.render(&params()),
            r#"Answer as {"question": {"en": "..."}} about Science"#
        );
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        let err = PromptTemplate::parse("about {topic}").unwrap_err();
        assert_eq!(err, TemplateError::UnknownPlaceholder("topic".to_string()));
    }

    #[test]
    fn test_unbalanced_braces_rejected() {
        assert_eq!(
            PromptTemplate::parse("oops {category").unwrap_err(),
            TemplateError::Unclosed(5)
        );
        assert_eq!(
            PromptTemplate::parse("oops } here").unwrap_err(),
            TemplateError::StrayClose(5)
        );
    }

    #[test]
    fn test_plain_text_renders_unchanged() {
        let template = PromptTemplate::parse("Give me more.").unwrap();
        assert_eq!(template.render(&params()), "Give me more.");
        assert_eq!(template.placeholders().count(), 0);
    }

    #[test]
    fn test_placeholders_in_order() {
        let template = PromptTemplate::parse("{category} {ranks} {category}").unwrap();
        let found: Vec<_> = template.placeholders().collect();
        assert_eq!(
            found,
            vec![Placeholder::Category, Placeholder::Ranks, Placeholder::Category]
        );
    }
}
