//! Scene continuation stack machinery
//!
//! Pages are queued front-to-back; `advance` drains one page per
//! "Continue" click. A branch option prepends its own pages so they play
//! before the enclosing sequence resumes. Pages are cloned at push time -
//! two stack frames never share a node with each other or with the
//! registered script they came from.

use suncrest_domain::{DomainError, Instruction, Page, SceneOption};
use tracing::debug;

use crate::interpreter::{exec_all, ExecCtx};

pub const CONTINUE_LABEL: &str = "Continue";

/// Append pages behind everything already queued.
pub fn push_pages_back(ctx: &mut ExecCtx<'_>, pages: Vec<Page>) {
    debug!(count = pages.len(), "queueing scene pages");
    for page in pages {
        ctx.world.scene.stack.push_back(page);
    }
    ensure_continue(ctx);
}

/// Insert pages ahead of the queue, preserving their order. Used by
/// branch choices: the branch body plays out, then the outer sequence
/// resumes.
pub fn push_pages_front(ctx: &mut ExecCtx<'_>, pages: Vec<Page>) {
    debug!(count = pages.len(), "prepending branch pages");
    for page in pages.into_iter().rev() {
        ctx.world.scene.stack.push_front(page);
    }
    ensure_continue(ctx);
}

/// Pop and run the next queued page. No-op when the stack is empty (the
/// synthetic Continue option is only ever present while pages remain, so
/// this is unreachable through normal play).
pub fn advance(ctx: &mut ExecCtx<'_>) -> Result<(), DomainError> {
    let Some(page) = ctx.world.scene.stack.pop_front() else {
        return Ok(());
    };
    debug!(remaining = ctx.world.scene.stack.len(), "advancing scene");
    ctx.world.scene.clear_display();
    exec_all(ctx, &page)?;
    ensure_continue(ctx);
    Ok(())
}

/// Inject the synthetic "Continue" option iff pages remain and the
/// display holds no options of its own. The last page of a sequence
/// therefore ends with zero options, not a dead Continue. Also run after
/// an option body executes: a body that produced no options of its own
/// must not strand the queued pages.
pub fn ensure_continue(ctx: &mut ExecCtx<'_>) {
    let scene = &mut ctx.world.scene;
    if scene.options.is_empty() && scene.has_pending_pages() {
        scene.add_option(SceneOption::new(
            CONTINUE_LABEL,
            Instruction::new("advanceScene"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::rng::ScriptedRoller;
    use suncrest_domain::{script, ContentItem, WorldState, WorldTime};

    fn fixture() -> (Registry, WorldState, ScriptedRoller) {
        (
            Registry::new(),
            WorldState::new(WorldTime::from_seconds(0), "home"),
            ScriptedRoller::default(),
        )
    }

    fn shown_text(world: &WorldState) -> Vec<&str> {
        world
            .scene
            .content
            .iter()
            .map(|item| match item {
                ContentItem::Paragraph { text } => text.as_str(),
                ContentItem::Speech { text, .. } => text.as_str(),
            })
            .collect()
    }

    #[test]
    fn three_pages_need_exactly_two_continues() {
        let (registry, mut world, mut roller) = fixture();
        let mut ctx = ExecCtx::new(&mut world, &registry, &mut roller);

        let pages = vec![
            vec![script::text("one")],
            vec![script::text("two")],
            vec![script::text("three")],
        ];
        push_pages_back(&mut ctx, pages);
        advance(&mut ctx).expect("page one");
        assert_eq!(shown_text(ctx.world), vec!["one"]);
        assert_eq!(ctx.world.scene.options.len(), 1);

        advance(&mut ctx).expect("page two");
        assert_eq!(shown_text(ctx.world), vec!["two"]);
        assert_eq!(ctx.world.scene.options.len(), 1);

        advance(&mut ctx).expect("page three");
        assert_eq!(shown_text(ctx.world), vec!["three"]);
        // Stack drained: no third Continue to click.
        assert!(ctx.world.scene.options.is_empty());
        assert!(!ctx.world.scene.has_pending_pages());
    }

    #[test]
    fn branch_pages_play_before_the_outer_sequence_resumes() {
        let (registry, mut world, mut roller) = fixture();
        let mut ctx = ExecCtx::new(&mut world, &registry, &mut roller);

        push_pages_back(&mut ctx, vec![vec![script::text("outer tail")]]);
        push_pages_front(&mut ctx, vec![vec![script::text("branch body")]]);

        advance(&mut ctx).expect("branch page");
        assert_eq!(shown_text(ctx.world), vec!["branch body"]);
        assert_eq!(ctx.world.scene.options.len(), 1);

        advance(&mut ctx).expect("outer page");
        assert_eq!(shown_text(ctx.world), vec!["outer tail"]);
        assert!(ctx.world.scene.options.is_empty());
    }

    #[test]
    fn branch_on_the_last_page_resumes_nothing() {
        let (registry, mut world, mut roller) = fixture();
        let mut ctx = ExecCtx::new(&mut world, &registry, &mut roller);

        // Stack already empty - a branch chosen on the final page.
        push_pages_front(&mut ctx, vec![vec![script::text("branch body")]]);
        advance(&mut ctx).expect("branch page");
        assert_eq!(shown_text(ctx.world), vec!["branch body"]);
        assert!(ctx.world.scene.options.is_empty());
    }

    #[test]
    fn page_with_its_own_options_suppresses_continue() {
        let (registry, mut world, mut roller) = fixture();
        let mut ctx = ExecCtx::new(&mut world, &registry, &mut roller);

        push_pages_back(
            &mut ctx,
            vec![
                vec![
                    script::text("pick"),
                    script::option("Wave", script::text("you wave")),
                ],
                vec![script::text("later")],
            ],
        );
        advance(&mut ctx).expect("page with options");
        assert_eq!(ctx.world.scene.options.len(), 1);
        assert_eq!(ctx.world.scene.options[0].label, "Wave");
    }

    #[test]
    fn advance_on_empty_stack_is_a_no_op() {
        let (registry, mut world, mut roller) = fixture();
        let mut ctx = ExecCtx::new(&mut world, &registry, &mut roller);
        advance(&mut ctx).expect("no-op");
        assert!(ctx.world.scene.content.is_empty());
    }
}
