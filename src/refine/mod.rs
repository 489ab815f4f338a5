//! Stylesheet rewrites for refinement prompts.
//!
//! Rules work on the stylesheet text, not on parsed CSS. A declaration that is
//! written in a shape the patterns do not expect (rem units, shorthand, three
//! digit hex) is left as is.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::wire::Artifact;

pub const MODIFIED_MARKER: &str = "\n/* Modified based on user request */";

static FONT_SIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"font-size:\s*\d+px").unwrap());
static PADDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"padding:\s*\d+px").unwrap());
static WIDTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"width:\s*\d+px").unwrap());
static HEIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"height:\s*\d+px").unwrap());
static BACKGROUND_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"background-color:\s*#[0-9a-fA-F]{6}").unwrap());
// `background-color` must not be caught here, hence the guard group.
static COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(^|[^-\w])color:\s*#[0-9a-fA-F]{6}").unwrap());
static GRADIENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"background:\s*linear-gradient\([^)]*\)").unwrap());
static BORDER_RADIUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"border-radius:\s*\d+px").unwrap());

struct Palette {
    background: &'static str,
    gradient: &'static str,
}

const RED: Palette = Palette {
    background: "background-color: #dc2626",
    gradient: "background: linear-gradient(45deg, #ff4444, #cc0000)",
};

const BLUE: Palette = Palette {
    background: "background-color: #3b82f6",
    gradient: "background: linear-gradient(45deg, #3b82f6, #1d4ed8)",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Enlarge,
    Red,
    Blue,
    Round,
    Annotate,
}

impl Rule {
    /// Trigger phrases in priority order. `Annotate` is the catch-all.
    const TRIGGERS: [(Rule, &'static [&'static str]); 4] = [
        (Rule::Enlarge, &["larger", "bigger"]),
        (Rule::Red, &["red"]),
        (Rule::Blue, &["blue"]),
        (Rule::Round, &["rounded", "circle"]),
    ];

    pub fn for_prompt(prompt: &str) -> Rule {
        let p = prompt.to_lowercase();
        Self::TRIGGERS
            .iter()
            .find(|(_, phrases)| phrases.iter().any(|ph| p.contains(ph)))
            .map(|(rule, _)| *rule)
            .unwrap_or(Rule::Annotate)
    }

    pub fn apply(&self, stylesheet: &str) -> String {
        match self {
            Rule::Enlarge => {
                let s = FONT_SIZE.replace_all(stylesheet, "font-size: 20px");
                let s = PADDING.replace_all(&s, "padding: 16px 32px");
                let s = WIDTH.replace_all(&s, "width: 250px");
                HEIGHT.replace_all(&s, "height: 100px").into_owned()
            }
            Rule::Red => recolor(stylesheet, &RED),
            Rule::Blue => recolor(stylesheet, &BLUE),
            Rule::Round => BORDER_RADIUS.replace_all(stylesheet, "border-radius: 25px").into_owned(),
            Rule::Annotate => format!("{stylesheet}{MODIFIED_MARKER}"),
        }
    }
}

fn recolor(stylesheet: &str, palette: &Palette) -> String {
    let s = BACKGROUND_COLOR.replace_all(stylesheet, palette.background);
    let s = COLOR.replace_all(&s, "${1}color: white");
    GRADIENT.replace_all(&s, palette.gradient).into_owned()
}

/// Apply the first matching rule to `current`. Markup is carried over as is.
pub fn refine(current: &Artifact, prompt: &str) -> (Rule, Artifact) {
    let rule = Rule::for_prompt(prompt);
    let stylesheet = rule.apply(&current.stylesheet);
    (rule, Artifact { markup: current.markup.clone(), stylesheet })
}
