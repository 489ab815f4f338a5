use crate::wire::Artifact;

fn output_contract() -> &'static str {
r#"Output Contract:
- Return EXACTLY ONE JSON object (no markdown, no prose, no code fences):
  { "markup": string, "stylesheet": string }
- "markup" is a complete React function component (JSX), default-exported.
- "stylesheet" is plain CSS for the class names used in the markup.
- Both fields must be non-empty."#
}

fn style_guidance() -> &'static str {
r#"Component Conventions:
- Modern, responsive, well-styled; sensible spacing and typographic scale.
- Semantic HTML and accessible labels; keyboard reachable controls.
- Class-based styling only; no inline styles, no CSS-in-JS, no external UI kits."#
}

/// System message. A refinement gets one extra line so the model edits instead
/// of starting over.
pub fn system_prompt(refining: bool) -> String {
    let mut s = format!(
        "You are a React component generator. Generate ONLY valid React JSX components with CSS styling.\n\n{}\n\n{}",
        output_contract(),
        style_guidance(),
    );
    if refining {
        s.push_str("\n\nThis is an iterative refinement. Modify the existing component based on the user request.");
    }
    s
}

pub fn user_prompt(prompt: &str, current: Option<&Artifact>) -> String {
    match current {
        Some(a) => format!(
            "Current component:\nJSX: {}\nCSS: {}\n\nUser request: {}\n\nModify the component according to the user's request. Return only valid JSON with markup and stylesheet properties.",
            a.markup, a.stylesheet, prompt
        ),
        None => format!(
            "Create a React component for: {}. Return only valid JSON with markup and stylesheet properties.",
            prompt
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refinement_adds_context_line() {
        assert!(!system_prompt(false).contains("iterative refinement"));
        assert!(system_prompt(true).contains("iterative refinement"));
    }

    #[test]
    fn user_prompt_embeds_current_artifact() {
        let a = Artifact::new("<Card/>", ".card{}");
        let u = user_prompt("make it blue", Some(&a));
        assert!(u.contains("JSX: <Card/>"));
        assert!(u.contains("CSS: .card{}"));
        assert!(u.contains("User request: make it blue"));

        let fresh = user_prompt("a pricing card", None);
        assert!(fresh.starts_with("Create a React component for: a pricing card."));
    }
}
