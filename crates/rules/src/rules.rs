//! Rule string grammar
//!
//! A rule string is a comma separated list of rules, each `name` or
//! `name=param`. A `|` inside one rule forms an alternative group. Commas and
//! pipes inside a parameter are written `0x2C` and `0x7C`.
//!
//! ```text
//! required,min=3,max=32
//! omitempty,hexcolor|rgb|rgba
//! required_if=country:US region:EU
//! required_with_all=street,city
//! eqfield=password
//! ```
//!
//! Field lists and `Field:literal` pairs are space separated. A comma segment
//! following a list rule continues the list when it cannot start a rule of
//! its own:
//!
//! - after a field list, any segment without `=` or `|` other than `-` and
//!   `omitempty` is another target, even when it shares a name with a leaf
//!   rule or an alias. `required_with_all=street,city` reads the same as
//!   `required_with_all=street city`;
//! - after a pair list, any segment holding `:` and no `=` is another pair.
//!
//! Parameterless leaf rules therefore go before a field list, never after it.
//!
//! An alias stands for a rule string and is expanded once: its body is not
//! searched for further aliases. An alias whose body is a single alternative
//! group may also be used as a branch, so `email|iscolor` expands to
//! `email|hexcolor|rgb|rgba|hsl|hsla`.

use std::collections::BTreeMap;

use crate::compare::CompareOp;
use crate::constraints::{ConditionalKind, PresenceKind};
use crate::error::CompileErrorKind;

/// Skips the field entirely, including nested validation.
pub const SKIP: &str = "-";
/// Skips the remaining rules of an empty field.
pub const OMIT_EMPTY: &str = "omitempty";
/// Runs the remaining rules only when every pair matches.
pub const SKIP_UNLESS: &str = "skip_unless";

/// Aliases every validator understands.
pub const BUILTIN_ALIASES: &[(&str, &str)] = &[("iscolor", "hexcolor|rgb|rgba|hsl|hsla")];

/// One parsed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSpec {
    /// `-`
    Skip,
    /// `omitempty`
    OmitEmpty,
    /// `skip_unless=Field:literal ...`
    SkipUnless(Vec<(String, String)>),
    /// A rule served by the leaf registry.
    Leaf {
        /// Rule name.
        name: String,
        /// Unescaped parameter.
        param: Option<String>,
    },
    /// `eqfield`, `nefield`, `gtfield`, `gtefield`, `ltfield`, `ltefield`.
    Relational {
        /// Operator applied as `anchor op target`.
        op: CompareOp,
        /// Dotted target path.
        target: String,
    },
    /// `required_with*`, `required_without*`, `excluded_*`.
    Presence {
        /// Rule family member.
        kind: PresenceKind,
        /// Dotted target paths.
        targets: Vec<String>,
    },
    /// `required_if`, `required_unless`.
    Conditional {
        /// Rule family member.
        kind: ConditionalKind,
        /// Target paths with the literal each is matched against.
        pairs: Vec<(String, String)>,
    },
    /// `a|b|c`
    Any(Vec<RuleSpec>),
}

impl RuleSpec {
    /// The tag used as the violation code.
    #[must_use]
    pub fn tag(&self) -> String {
        match self {
            Self::Skip => SKIP.to_owned(),
            Self::OmitEmpty => OMIT_EMPTY.to_owned(),
            Self::SkipUnless(_) => SKIP_UNLESS.to_owned(),
            Self::Leaf { name, .. } => name.clone(),
            Self::Relational { op, .. } => relational_tag(*op).to_owned(),
            Self::Presence { kind, .. } => kind.tag().to_owned(),
            Self::Conditional { kind, .. } => kind.tag().to_owned(),
            Self::Any(branches) => branches
                .iter()
                .map(Self::tag)
                .collect::<Vec<_>>()
                .join("|"),
        }
    }

    /// True for `-`, `omitempty` and `skip_unless`.
    #[must_use]
    pub fn is_gate(&self) -> bool {
        matches!(self, Self::Skip | Self::OmitEmpty | Self::SkipUnless(_))
    }

    fn list_mut(&mut self) -> Option<ListMut<'_>> {
        match self {
            Self::Presence { targets, .. } => Some(ListMut::Fields(targets)),
            Self::Conditional { kind, pairs } => Some(ListMut::Pairs(kind.tag(), pairs)),
            Self::SkipUnless(pairs) => Some(ListMut::Pairs(SKIP_UNLESS, pairs)),
            _ => None,
        }
    }
}

enum ListMut<'a> {
    Fields(&'a mut Vec<String>),
    Pairs(&'static str, &'a mut Vec<(String, String)>),
}

impl ListMut<'_> {
    fn continues_with(&self, segment: &str) -> bool {
        if segment.contains(['=', '|']) {
            return false;
        }
        match self {
            Self::Fields(_) => !matches!(segment, SKIP | OMIT_EMPTY),
            Self::Pairs(..) => segment.contains(':'),
        }
    }

    fn extend(self, segment: &str) -> Result<(), CompileErrorKind> {
        match self {
            Self::Fields(targets) => {
                targets.extend(segment.split_whitespace().map(str::to_owned));
            }
            Self::Pairs(rule, pairs) => {
                for pair in segment.split_whitespace() {
                    pairs.push(parse_pair(rule, pair)?);
                }
            }
        }
        Ok(())
    }
}

/// The rule tag for a relational operator.
#[must_use]
pub fn relational_tag(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Eq => "eqfield",
        CompareOp::Ne => "nefield",
        CompareOp::Gt => "gtfield",
        CompareOp::Gte => "gtefield",
        CompareOp::Lt => "ltfield",
        CompareOp::Lte => "ltefield",
    }
}

fn relational_op(name: &str) -> Option<CompareOp> {
    CompareOp::ALL
        .into_iter()
        .find(|op| relational_tag(*op) == name)
}

/// Whether `name` belongs to the gates or the cross-field families.
///
/// Reserved names cannot be registered as leaf rules.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    matches!(name, SKIP | OMIT_EMPTY | SKIP_UNLESS)
        || relational_op(name).is_some()
        || PresenceKind::from_tag(name).is_some()
        || ConditionalKind::from_tag(name).is_some()
}

/// Replaces `0x2C` and `0x7C` with `,` and `|`.
#[must_use]
pub fn unescape(param: &str) -> String {
    param.replace("0x2C", ",").replace("0x7C", "|")
}

// ============================================================================
// PARSER
// ============================================================================

/// Parses rule strings against a set of aliases.
#[derive(Debug, Clone, Copy)]
pub struct RuleParser<'a> {
    aliases: &'a BTreeMap<String, String>,
}

impl<'a> RuleParser<'a> {
    /// Creates a parser.
    #[must_use]
    pub fn new(aliases: &'a BTreeMap<String, String>) -> Self {
        Self { aliases }
    }

    /// Parses a complete rule string. An empty string yields no rules.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileErrorKind`] for empty segments, malformed
    /// parameters and gates inside alternative groups.
    pub fn parse(&self, raw: &str) -> Result<Vec<RuleSpec>, CompileErrorKind> {
        let mut specs = Vec::new();
        if raw.trim().is_empty() {
            return Ok(specs);
        }

        for segment in segments(raw) {
            let segment = segment?;
            if extend_last(&mut specs, segment)? {
                continue;
            }
            match self.alias(segment) {
                Some(body) => {
                    for part in segments(body) {
                        let part = part?;
                        if !extend_last(&mut specs, part)? {
                            specs.push(self.parse_segment(part, false)?);
                        }
                    }
                }
                None => specs.push(self.parse_segment(segment, true)?),
            }
        }

        Ok(specs)
    }

    fn alias(&self, name: &str) -> Option<&'a str> {
        self.aliases.get(name).map(String::as_str).or_else(|| {
            BUILTIN_ALIASES
                .iter()
                .find(|(alias, _)| *alias == name)
                .map(|(_, body)| *body)
        })
    }

    fn parse_segment(&self, segment: &str, expand: bool) -> Result<RuleSpec, CompileErrorKind> {
        if !segment.contains('|') {
            return parse_rule(segment);
        }

        let mut branches = Vec::new();
        for branch in segment.split('|') {
            let branch = branch.trim();
            if branch.is_empty() {
                return Err(CompileErrorKind::EmptyRule);
            }
            match self.alias(branch).filter(|_| expand) {
                Some(body) if !body.contains(',') => {
                    for part in body.split('|') {
                        branches.push(parse_branch(part.trim())?);
                    }
                }
                Some(_) => return Err(CompileErrorKind::NotAlternative(branch.to_owned())),
                None => branches.push(parse_branch(branch)?),
            }
        }
        Ok(RuleSpec::Any(branches))
    }
}

fn segments(raw: &str) -> impl Iterator<Item = Result<&str, CompileErrorKind>> {
    raw.split(',').map(|segment| {
        let segment = segment.trim();
        if segment.is_empty() {
            Err(CompileErrorKind::EmptyRule)
        } else {
            Ok(segment)
        }
    })
}

/// Appends `segment` to the list of the last rule when it continues it.
fn extend_last(specs: &mut [RuleSpec], segment: &str) -> Result<bool, CompileErrorKind> {
    let Some(list) = specs.last_mut().and_then(RuleSpec::list_mut) else {
        return Ok(false);
    };
    if !list.continues_with(segment) {
        return Ok(false);
    }
    list.extend(segment)?;
    Ok(true)
}

fn parse_branch(branch: &str) -> Result<RuleSpec, CompileErrorKind> {
    let spec = parse_rule(branch)?;
    if spec.is_gate() {
        return Err(CompileErrorKind::NotAlternative(spec.tag()));
    }
    Ok(spec)
}

/// Parses one rule without alias expansion or alternative groups.
fn parse_rule(segment: &str) -> Result<RuleSpec, CompileErrorKind> {
    let (name, param) = match segment.split_once('=') {
        Some((name, param)) => (name.trim(), Some(unescape(param.trim()))),
        None => (segment.trim(), None),
    };
    if name.is_empty() {
        return Err(CompileErrorKind::EmptyRule);
    }

    let required = |param: Option<String>| {
        param
            .filter(|p| !p.is_empty())
            .ok_or_else(|| CompileErrorKind::MissingParameter(name.to_owned()))
    };
    let no_param = |param: &Option<String>| match param {
        Some(_) => Err(CompileErrorKind::UnexpectedParameter(name.to_owned())),
        None => Ok(()),
    };

    if name == SKIP {
        no_param(&param)?;
        return Ok(RuleSpec::Skip);
    }
    if name == OMIT_EMPTY {
        no_param(&param)?;
        return Ok(RuleSpec::OmitEmpty);
    }
    if name == SKIP_UNLESS {
        return Ok(RuleSpec::SkipUnless(parse_pairs(name, &required(param)?)?));
    }
    if let Some(op) = relational_op(name) {
        let target = required(param)?;
        if target.contains(char::is_whitespace) {
            return Err(CompileErrorKind::InvalidParameter {
                rule: name.to_owned(),
                param: target,
                reason: "expected a single field".into(),
            });
        }
        return Ok(RuleSpec::Relational { op, target });
    }
    if let Some(kind) = PresenceKind::from_tag(name) {
        let targets = required(param)?
            .split_whitespace()
            .map(str::to_owned)
            .collect();
        return Ok(RuleSpec::Presence { kind, targets });
    }
    if let Some(kind) = ConditionalKind::from_tag(name) {
        let pairs = parse_pairs(name, &required(param)?)?;
        return Ok(RuleSpec::Conditional { kind, pairs });
    }

    Ok(RuleSpec::Leaf {
        name: name.to_owned(),
        param,
    })
}

fn parse_pairs(rule: &str, param: &str) -> Result<Vec<(String, String)>, CompileErrorKind> {
    param
        .split_whitespace()
        .map(|pair| parse_pair(rule, pair))
        .collect()
}

fn parse_pair(rule: &str, pair: &str) -> Result<(String, String), CompileErrorKind> {
    match pair.split_once(':') {
        Some((field, literal)) if !field.is_empty() => Ok((field.to_owned(), literal.to_owned())),
        _ => Err(CompileErrorKind::InvalidParameter {
            rule: rule.to_owned(),
            param: pair.to_owned(),
            reason: "expected `Field:value`".into(),
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================
