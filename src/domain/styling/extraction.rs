//! Extraction pipeline: locating a structured payload in free text.
//!
//! Each [`ExtractionStrategy`] proposes one candidate span. Strategies run in
//! a fixed order and the first candidate that parses as a JSON object, either
//! directly or after one [`repair`](super::repair::repair) pass, wins.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use super::repair::repair;

/// Span-locating strategies in the order the pipeline tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// First `{` to its balanced closing `}`.
    DirectSpan,
    /// Body of the first markdown code fence.
    FencedBlock,
    /// From the anchor field name to the close of its enclosing object.
    AnchoredSpan,
    /// First `{` to last `}` anywhere in the text.
    GreedyEndpoints,
    /// Key/value-looking lines re-wrapped in braces.
    LineReconstruction,
}

impl ExtractionStrategy {
    /// All strategies in pipeline order.
    pub fn all() -> &'static [ExtractionStrategy] {
        &[
            ExtractionStrategy::DirectSpan,
            ExtractionStrategy::FencedBlock,
            ExtractionStrategy::AnchoredSpan,
            ExtractionStrategy::GreedyEndpoints,
            ExtractionStrategy::LineReconstruction,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStrategy::DirectSpan => "direct_span",
            ExtractionStrategy::FencedBlock => "fenced_block",
            ExtractionStrategy::AnchoredSpan => "anchored_span",
            ExtractionStrategy::GreedyEndpoints => "greedy_endpoints",
            ExtractionStrategy::LineReconstruction => "line_reconstruction",
        }
    }

    /// Proposes a candidate span, or `None` if this strategy finds nothing.
    pub fn locate(&self, text: &str, anchors: &[String]) -> Option<String> {
        match self {
            ExtractionStrategy::DirectSpan => direct_span(text),
            ExtractionStrategy::FencedBlock => fenced_block(text),
            ExtractionStrategy::AnchoredSpan => anchored_span(text, anchors),
            ExtractionStrategy::GreedyEndpoints => greedy_endpoints(text),
            ExtractionStrategy::LineReconstruction => line_reconstruction(text),
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a strategy located a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(String),
    NotFound,
}

/// What happened when a located span was parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    NotAttempted,
    Parsed,
    ParsedAfterRepair,
    Unparseable,
}

/// One strategy's contribution to an extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionAttempt {
    pub strategy: ExtractionStrategy,
    pub outcome: AttemptOutcome,
    pub parse: ParseStatus,
}

/// The winning span and its parsed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub strategy: ExtractionStrategy,
    pub text: String,
    pub payload: Map<String, Value>,
    pub repaired: bool,
}

/// Result of running the pipeline over one response.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Found {
        candidate: Candidate,
        attempts: Vec<ExtractionAttempt>,
    },
    NotFound {
        attempts: Vec<ExtractionAttempt>,
    },
}

impl Extraction {
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            Extraction::Found { candidate, .. } => Some(candidate),
            Extraction::NotFound { .. } => None,
        }
    }

    pub fn attempts(&self) -> &[ExtractionAttempt] {
        match self {
            Extraction::Found { attempts, .. } | Extraction::NotFound { attempts } => attempts,
        }
    }

    pub fn into_candidate(self) -> Option<Candidate> {
        match self {
            Extraction::Found { candidate, .. } => Some(candidate),
            Extraction::NotFound { .. } => None,
        }
    }
}

/// Runs the strategies in order over raw service text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionPipeline {
    anchors: Vec<String>,
}

impl ExtractionPipeline {
    /// Creates a pipeline without an anchor; `AnchoredSpan` never matches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pipeline anchored on a field name. Both the given spelling
    /// and its camelCase form are recognized (`body_shape`, `bodyShape`).
    pub fn anchored_on(field: &str) -> Self {
        let mut anchors = vec![field.to_string()];
        let camel = to_camel_case(field);
        if camel != field {
            anchors.push(camel);
        }
        Self { anchors }
    }

    pub fn anchors(&self) -> &[String] {
        &self.anchors
    }

    /// Locates and parses the payload.
    pub fn extract(&self, raw: &str) -> Extraction {
        let text = strip_control_chars(raw);
        let mut attempts = Vec::with_capacity(ExtractionStrategy::all().len());

        for &strategy in ExtractionStrategy::all() {
            let Some(span) = strategy.locate(&text, &self.anchors) else {
                attempts.push(ExtractionAttempt {
                    strategy,
                    outcome: AttemptOutcome::NotFound,
                    parse: ParseStatus::NotAttempted,
                });
                continue;
            };

            let (parse, payload) = match parse_object(&span) {
                Some(payload) => (ParseStatus::Parsed, Some(payload)),
                None => match parse_object(&repair(&span)) {
                    Some(payload) => (ParseStatus::ParsedAfterRepair, Some(payload)),
                    None => (ParseStatus::Unparseable, None),
                },
            };

            attempts.push(ExtractionAttempt {
                strategy,
                outcome: AttemptOutcome::Success(span.clone()),
                parse,
            });

            if let Some(payload) = payload {
                return Extraction::Found {
                    candidate: Candidate {
                        strategy,
                        text: span,
                        payload,
                        repaired: parse == ParseStatus::ParsedAfterRepair,
                    },
                    attempts,
                };
            }
        }

        Extraction::NotFound { attempts }
    }
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn strip_control_chars(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect()
}

/// Byte index of the `}` that brings `depth` back to zero, scanning from
/// `from` and skipping string literals. `depth` is the nesting level at
/// `from`: 0 when starting on an opening brace, 1 when starting inside one.
fn closing_brace(text: &str, from: usize, mut depth: usize) -> Option<usize> {
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in text[from..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                if depth <= 1 {
                    return Some(from + offset);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

fn direct_span(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let end = closing_brace(text, start, 0)?;
    Some(text[start..=end].to_string())
}

fn fenced_block(text: &str) -> Option<String> {
    let open = text.find("```")?;
    let after = &text[open + 3..];

    // Skip a language label such as `json` when it sits alone on the fence line.
    let body_start = match after.find('\n') {
        Some(newline) if after[..newline].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            newline + 1
        }
        _ => 0,
    };

    let body = &after[body_start..];
    let close = body.find("```")?;
    let block = body[..close].trim();
    if block.is_empty() {
        None
    } else {
        Some(block.to_string())
    }
}

fn anchored_span(text: &str, anchors: &[String]) -> Option<String> {
    let start = anchors
        .iter()
        .filter_map(|anchor| anchor_position(text, anchor))
        .min()?;
    let end = closing_brace(text, start, 1)?;
    Some(format!("{{{}", &text[start..=end]))
}

/// Position of the first use of `anchor` as an object key, quoted or bare.
fn anchor_position(text: &str, anchor: &str) -> Option<usize> {
    if anchor.is_empty() {
        return None;
    }

    let quoted = format!("\"{}\"", anchor);
    let quoted_hit = text
        .match_indices(&quoted)
        .map(|(idx, _)| idx)
        .find(|&idx| followed_by_colon(text, idx + quoted.len()));

    let bare_hit = text
        .match_indices(anchor)
        .map(|(idx, _)| idx)
        .find(|&idx| {
            let preceded_ok = text[..idx]
                .chars()
                .next_back()
                .map_or(true, |c| !(c.is_alphanumeric() || c == '_' || c == '"'));
            preceded_ok && followed_by_colon(text, idx + anchor.len())
        });

    match (quoted_hit, bare_hit) {
        (Some(q), Some(b)) => Some(q.min(b)),
        (q, b) => q.or(b),
    }
}

fn followed_by_colon(text: &str, from: usize) -> bool {
    text[from..].chars().find(|c| !c.is_whitespace()) == Some(':')
}

fn greedy_endpoints(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(text[start..=end].to_string())
    } else {
        None
    }
}

fn line_reconstruction(text: &str) -> Option<String> {
    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| {
            line.contains(':') && line.chars().any(|c| matches!(c, '"' | '\'' | '[' | ']'))
        })
        .map(|line| line.trim_start_matches('{').trim_end_matches('}').trim())
        .filter(|line| !line.is_empty())
        .map(|line| {
            if line.ends_with(',') || line.ends_with('[') || line.ends_with('{') {
                line.to_string()
            } else {
                format!("{},", line)
            }
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(format!("{{\n{}\n}}", lines.join("\n")))
    }
}

fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
