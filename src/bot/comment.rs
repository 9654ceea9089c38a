use crate::github::CommitSha;

/// Position in a pull request diff that a review comment is attached to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewAnchor {
    pub commit_id: CommitSha,
    pub path: String,
    pub position: Option<u64>,
}

/// Where should a result of the bot be posted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommentTarget {
    /// Top-level comment on the pull request conversation.
    Issue,
    /// Reply anchored to the diff location of the triggering review comment.
    Review(ReviewAnchor),
}

/// A comment that can be posted to a pull request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    text: String,
}

impl Comment {
    pub fn new(text: String) -> Self {
        Self { text }
    }

    pub fn render(&self) -> &str {
        &self.text
    }
}

pub fn explanation_comment(target: &CommentTarget, filename: &str, explanation: &str) -> Comment {
    let banner = match target {
        CommentTarget::Issue => format!(
            "################################ Explanation for changes in **{filename}** #################################"
        ),
        CommentTarget::Review(_) => {
            format!("########## Explanation for changes in {filename} ###########")
        }
    };
    with_banner(banner, explanation)
}

pub fn execution_comment(target: &CommentTarget, filename: &str, output: &str) -> Comment {
    let banner = match target {
        CommentTarget::Issue => format!(
            "################################## Output for changes in **{filename}** ##################################"
        ),
        CommentTarget::Review(_) => {
            format!("############ Output for changes in {filename} #############")
        }
    };
    with_banner(banner, output)
}

fn with_banner(banner: String, body: &str) -> Comment {
    Comment::new(format!("{banner}\n\n{body}\n"))
}
