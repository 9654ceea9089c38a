use crate::bot::comment::CommentTarget;

/// Something the bot can do with a changed file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Ask the completion API to explain the file.
    Explain,
    /// Run the file in the execution sandbox.
    Execute,
}

impl Action {
    /// Actions in the order in which they are performed on a single file.
    pub const ALL: [Action; 2] = [Action::Explain, Action::Execute];

    /// Literal text that requests this action.
    pub fn token(self) -> &'static str {
        match self {
            Action::Explain => "/explain",
            Action::Execute => "/execute",
        }
    }
}

/// Returns the actions requested by `text` for the file `filename`.
///
/// Tokens are matched case-sensitively anywhere in the text. When the text comes from a review
/// comment, `comment_path` must be equal to `filename`, otherwise nothing is requested for
/// that file.
pub fn detect_actions(
    text: Option<&str>,
    comment_path: Option<&str>,
    filename: &str,
) -> Vec<Action> {
    let Some(text) = text else {
        return vec![];
    };
    if comment_path.is_some_and(|path| path != filename) {
        return vec![];
    }
    Action::ALL
        .into_iter()
        .filter(|action| text.contains(action.token()))
        .collect()
}

/// Text that may request some actions, together with the place where results should go.
#[derive(Debug)]
pub struct Trigger {
    text: Option<String>,
    target: CommentTarget,
}

impl Trigger {
    pub fn new(text: Option<String>, target: CommentTarget) -> Self {
        Self { text, target }
    }

    pub fn target(&self) -> &CommentTarget {
        &self.target
    }

    /// Does the text contain at least one trigger token?
    pub fn has_tokens(&self) -> bool {
        self.text
            .as_deref()
            .is_some_and(|text| Action::ALL.iter().any(|a| text.contains(a.token())))
    }

    pub fn actions_for(&self, filename: &str) -> Vec<Action> {
        let comment_path = match &self.target {
            CommentTarget::Issue => None,
            CommentTarget::Review(anchor) => Some(anchor.path.as_str()),
        };
        detect_actions(self.text.as_deref(), comment_path, filename)
    }
}
