use crate::wire::Artifact;

const CREATION_TERMS: [&str; 5] = ["create", "make", "build", "generate", "new"];

const COMPONENT_TERMS: [&str; 9] = [
    "car", "vehicle", "automobile", "button", "card", "navbar", "nav", "header", "menu",
];

/// Keyword heuristic: a creation verb plus a component noun means "start
/// over". Plain substring matching, so negations ("don't make a button") and
/// word fragments still count.
pub fn is_new_component_request(prompt: &str) -> bool {
    let p = prompt.to_lowercase();
    let has_creation = CREATION_TERMS.iter().any(|t| p.contains(t));
    let has_component = COMPONENT_TERMS.iter().any(|t| p.contains(t));
    has_creation && has_component
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    New,
    Refine,
}

/// Per-request decision, computed once from the prompt and the session's
/// current artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub mode: Mode,
    pub new_component_request: bool,
    pub has_existing_artifact: bool,
}

impl Analysis {
    pub fn is_iterative(&self) -> bool {
        self.mode == Mode::Refine
    }
}

pub fn analyze(prompt: &str, current: Option<&Artifact>) -> Analysis {
    let new_component_request = is_new_component_request(prompt);
    let has_existing_artifact = current.map(Artifact::is_complete).unwrap_or(false);
    let mode = if new_component_request || !has_existing_artifact {
        Mode::New
    } else {
        Mode::Refine
    };
    Analysis { mode, new_component_request, has_existing_artifact }
}
