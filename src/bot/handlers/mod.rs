use tracing::Instrument;

use crate::bot::comment::{execution_comment, explanation_comment};
use crate::bot::event::BotEvent;
use crate::bot::{
    Action, BotContext, ChangedFile, Comment, CommentTarget, RepositoryClient, ReviewAnchor,
    Trigger,
};
use crate::github::{CommitSha, PullRequestNumber};
use crate::utils::logging::LogError;

/// This function handles a single bot event.
pub async fn handle_bot_event<Client: RepositoryClient>(
    event: BotEvent,
    ctx: &BotContext,
    repo: &Client,
) -> anyhow::Result<()> {
    let span = tracing::info_span!(
        "PR",
        pr = format!("{}#{}", event.repository(), event.pr_number())
    );
    let (pr_number, head_sha, trigger) = match event {
        BotEvent::PullRequest(payload) => (
            payload.pr_number,
            payload.head_sha,
            Trigger::new(payload.body, CommentTarget::Issue),
        ),
        BotEvent::ReviewComment(payload) => (
            payload.pr_number,
            payload.head_sha,
            Trigger::new(
                payload.body,
                CommentTarget::Review(ReviewAnchor {
                    commit_id: payload.commit_id,
                    path: payload.path,
                    position: payload.position,
                }),
            ),
        ),
    };
    handle_trigger(ctx, repo, pr_number, &head_sha, trigger)
        .instrument(span)
        .await
}

/// Performs the actions requested by `trigger` on every changed file of the pull request, one
/// file at a time.
async fn handle_trigger<Client: RepositoryClient>(
    ctx: &BotContext,
    repo: &Client,
    pr: PullRequestNumber,
    head_sha: &CommitSha,
    trigger: Trigger,
) -> anyhow::Result<()> {
    if !trigger.has_tokens() {
        tracing::debug!("Ignoring event without trigger tokens");
        return Ok(());
    }

    let files = match repo.list_changed_files(pr).await {
        Ok(files) => files,
        Err(error) => {
            tracing::error!("Cannot list changed files: {error}");
            return Ok(());
        }
    };
    if files.is_empty() {
        tracing::warn!("No files found in the pull request.");
        return Ok(());
    }

    for filename in files {
        let actions = trigger.actions_for(&filename);
        if actions.is_empty() {
            tracing::trace!("No action requested for {filename}");
            continue;
        }

        let file = match repo.get_file_content(&filename, head_sha).await {
            Ok(content) => ChangedFile { filename, content },
            Err(error) => {
                tracing::warn!("Skipping {filename}: {error}");
                continue;
            }
        };

        for action in actions {
            let span = tracing::info_span!("Action", ?action, file = %file.filename);
            let result = run_action(ctx, repo, pr, trigger.target(), action, &file)
                .instrument(span.clone())
                .await;
            if let Err(error) = result {
                span.log_error(error);
            }
        }
    }
    Ok(())
}

async fn run_action<Client: RepositoryClient>(
    ctx: &BotContext,
    repo: &Client,
    pr: PullRequestNumber,
    target: &CommentTarget,
    action: Action,
    file: &ChangedFile,
) -> anyhow::Result<()> {
    let ChangedFile {
        filename,
        content: code,
    } = file;
    let comment = match action {
        Action::Explain => match ctx.completion.explain(code).await {
            Ok(explanation) => explanation_comment(target, filename, &explanation),
            Err(error) => {
                tracing::error!("Cannot explain {filename}: {error}");
                if !ctx.settings.comment_on_failed_explanation {
                    return Ok(());
                }
                explanation_comment(target, filename, "")
            }
        },
        Action::Execute => match ctx.execution.execute(filename, code).await {
            Ok(output) if !output.is_empty() => execution_comment(target, filename, &output),
            Ok(_) => {
                tracing::debug!("Execution of {filename} produced no output");
                return Ok(());
            }
            Err(error) => {
                tracing::error!("Cannot execute {filename}: {error}");
                return Ok(());
            }
        },
    };
    publish_comment(repo, pr, target, comment).await
}

async fn publish_comment<Client: RepositoryClient>(
    repo: &Client,
    pr: PullRequestNumber,
    target: &CommentTarget,
    comment: Comment,
) -> anyhow::Result<()> {
    match target {
        CommentTarget::Issue => repo.post_comment(pr, comment).await,
        CommentTarget::Review(anchor) => repo.post_review_comment(pr, anchor, comment).await,
    }
}
